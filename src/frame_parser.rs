use crate::types::{SensorFrame, HEADER_SENTINEL, NUM_CHANNELS};

/// Convierte una línea cruda del puerto serial en un SensorFrame validado.
///
/// Reglas de rechazo, en orden (la primera que aplica gana):
/// 1. línea vacía
/// 2. eco del encabezado del firmware (empieza con "Flex1")
/// 3. cantidad de campos distinta de 10
/// 4. algún campo que no parsea como float finito
///
/// Las líneas inválidas son ruido normal del cable (líneas parciales,
/// basura de encoding): el caller las descarta en silencio y sigue leyendo.
pub fn parse_line(raw: &str) -> Option<SensorFrame> {
    if raw.is_empty() {
        return None;
    }

    if raw.starts_with(HEADER_SENTINEL) {
        return None;
    }

    let mut values = [0.0f32; NUM_CHANNELS];
    let mut count = 0;

    for field in raw.split(',') {
        if count == NUM_CHANNELS {
            // Más de 10 campos
            return None;
        }

        let value: f32 = field.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }

        values[count] = value;
        count += 1;
    }

    if count != NUM_CHANNELS {
        return None;
    }

    Some(SensorFrame::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_line_preserves_order() {
        // Vector documentado de los scripts de predicción
        let frame = parse_line("321,292,287,279,0,0,0,0,0,0").unwrap();
        assert_eq!(frame.flex, [321.0, 292.0, 287.0, 279.0]);
        assert_eq!(frame.accel, [0.0, 0.0, 0.0]);
        assert_eq!(frame.gyro, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_valid_line_with_negatives_and_spaces() {
        let frame = parse_line("319, 308, 301, 294, 0, 0, 0, 0, -15, -16").unwrap();
        assert_eq!(frame.flex, [319.0, 308.0, 301.0, 294.0]);
        assert_eq!(frame.gyro, [0.0, -15.0, -16.0]);
    }

    #[test]
    fn test_rejects_empty_line() {
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_rejects_header_echo() {
        // El encabezado completo que reenvía el firmware
        assert!(parse_line(
            "Flex1,Flex2,Flex3,Flex4,Accelerometer_X,Accelerometer_Y,\
             Accelerometer_Z,Gyroscope_X,Gyroscope_Y,Gyroscope_Z"
        )
        .is_none());
        // El centinela manda aunque el resto sí sean 10 números
        assert!(parse_line("Flex1,2,3,4,5,6,7,8,9,0").is_none());
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        assert!(parse_line("1,2,3,4,5,6,7,8,9").is_none()); // 9 campos
        assert!(parse_line("1,2,3,4,5,6,7,8,9,10,11").is_none()); // 11 campos
    }

    #[test]
    fn test_rejects_non_numeric_garbage() {
        assert!(parse_line("abc,def").is_none());
        assert!(parse_line("321,292,287,xyz,0,0,0,0,0,0").is_none());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        assert!(parse_line("nan,292,287,279,0,0,0,0,0,0").is_none());
        assert!(parse_line("321,inf,287,279,0,0,0,0,0,0").is_none());
    }

    #[test]
    fn test_rejects_partial_line() {
        // Línea cortada a mitad de transmisión
        assert!(parse_line("321,292,2").is_none());
    }
}
