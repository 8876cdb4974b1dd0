use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;

use crate::types::{SensorFrame, NUM_CHANNELS};

/// Carga las lecturas de un CSV de captura en el formato del logger:
/// encabezado Flex1..Gyroscope_Z y una lectura de 10 valores por fila.
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<SensorFrame>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut frames = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() != NUM_CHANNELS {
            bail!(
                "La fila {} tiene {} columnas, se esperaban {}",
                row_idx + 1,
                record.len(),
                NUM_CHANNELS
            );
        }

        let mut values = [0.0f32; NUM_CHANNELS];
        for (col, field) in record.iter().enumerate() {
            values[col] = field.trim().parse().with_context(|| {
                format!("Valor no numérico en fila {}, columna {}", row_idx + 1, col + 1)
            })?;
        }

        frames.push(SensorFrame::from_values(values));
    }

    if frames.is_empty() {
        return Err(anyhow!("El CSV {:?} no contiene lecturas", path));
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CSV_COLUMNS;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_logged_frames() {
        let header = CSV_COLUMNS.join(",");
        let file = write_csv(&format!(
            "{}\n321,292,287,279,0,0,0,0,0,0\n319,308,301,294,0,0,0,0,-15,-16\n",
            header
        ));

        let frames = load_frames_from_csv(file.path()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].flex, [321.0, 292.0, 287.0, 279.0]);
        assert_eq!(frames[1].gyro, [0.0, -15.0, -16.0]);
    }

    #[test]
    fn test_rejects_wrong_column_count() {
        let header = CSV_COLUMNS.join(",");
        let file = write_csv(&format!("{}\n1,2,3\n", header));

        assert!(load_frames_from_csv(file.path()).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_cell() {
        let header = CSV_COLUMNS.join(",");
        let file = write_csv(&format!("{}\n321,292,287,abc,0,0,0,0,0,0\n", header));

        assert!(load_frames_from_csv(file.path()).is_err());
    }

    #[test]
    fn test_rejects_empty_file() {
        let header = CSV_COLUMNS.join(",");
        let file = write_csv(&format!("{}\n", header));

        assert!(load_frames_from_csv(file.path()).is_err());
    }
}
