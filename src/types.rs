/// Número de sensores flex en el guante
pub const NUM_FLEX: usize = 4;
/// Ejes del acelerómetro y del giroscopio
pub const NUM_ACCEL: usize = 3;
pub const NUM_GYRO: usize = 3;
/// Canales totales por lectura: Flex1..Flex4, AccelX..Z, GyroX..Z
pub const NUM_CHANNELS: usize = NUM_FLEX + NUM_ACCEL + NUM_GYRO; // 10

/// Velocidad del enlace serial del firmware
pub const BAUD_RATE: u32 = 9600;

/// Primera columna del encabezado CSV que el firmware reenvía por el puerto.
/// Cualquier línea que empiece así se descarta, no es una lectura.
pub const HEADER_SENTINEL: &str = "Flex1";

/// Encabezado canónico de los CSV de captura (mismo orden que el cable)
pub const CSV_COLUMNS: [&str; NUM_CHANNELS] = [
    "Flex1",
    "Flex2",
    "Flex3",
    "Flex4",
    "Accelerometer_X",
    "Accelerometer_Y",
    "Accelerometer_Z",
    "Gyroscope_X",
    "Gyroscope_Y",
    "Gyroscope_Z",
];

/// Una lectura completa del guante: 4 flex + IMU de 6 ejes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorFrame {
    /// Lecturas analógicas de los sensores flex: [Flex1, Flex2, Flex3, Flex4]
    pub flex: [f32; NUM_FLEX],
    /// Aceleración: [x, y, z]
    pub accel: [f32; NUM_ACCEL],
    /// Velocidad angular: [x, y, z]
    pub gyro: [f32; NUM_GYRO],
}

impl SensorFrame {
    /// Construye un frame desde los 10 valores en el orden del cable
    pub fn from_values(values: [f32; NUM_CHANNELS]) -> Self {
        let mut frame = Self::default();
        frame.flex.copy_from_slice(&values[0..NUM_FLEX]);
        frame.accel.copy_from_slice(&values[NUM_FLEX..NUM_FLEX + NUM_ACCEL]);
        frame.gyro.copy_from_slice(&values[NUM_FLEX + NUM_ACCEL..NUM_CHANNELS]);
        frame
    }

    /// Aplana el frame al vector de 10 features en el orden del cable
    pub fn to_values(&self) -> [f32; NUM_CHANNELS] {
        let mut values = [0.0f32; NUM_CHANNELS];
        values[0..NUM_FLEX].copy_from_slice(&self.flex);
        values[NUM_FLEX..NUM_FLEX + NUM_ACCEL].copy_from_slice(&self.accel);
        values[NUM_FLEX + NUM_ACCEL..NUM_CHANNELS].copy_from_slice(&self.gyro);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_roundtrip() {
        let values = [321.0, 292.0, 287.0, 279.0, 0.5, -0.5, 9.8, 0.0, -15.0, -16.0];
        let frame = SensorFrame::from_values(values);

        assert_eq!(frame.flex, [321.0, 292.0, 287.0, 279.0]);
        assert_eq!(frame.accel, [0.5, -0.5, 9.8]);
        assert_eq!(frame.gyro, [0.0, -15.0, -16.0]);
        assert_eq!(frame.to_values(), values);
    }
}
