use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Inconsistent scaler: mean has {mean} values, scale has {scale}")]
    InconsistentArtifact { mean: usize, scale: usize },

    #[error("Invalid feature size: expected {expected}, got {actual}")]
    InvalidFeatureSize { expected: usize, actual: usize },
}

/// Normalizador estándar de sklearn exportado por el pipeline de
/// entrenamiento como scaler.json: {"mean": [...], "scale": [...]}.
/// Aplica (x - mean) / scale por canal.
#[derive(Debug, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScalerError> {
        let content = fs::read_to_string(path)?;
        let scaler: StandardScaler = serde_json::from_str(&content)?;

        if scaler.mean.len() != scaler.scale.len() {
            return Err(ScalerError::InconsistentArtifact {
                mean: scaler.mean.len(),
                scale: scaler.scale.len(),
            });
        }

        Ok(scaler)
    }

    /// Cantidad de features que el scaler espera
    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    /// Normaliza un vector de features con la media y escala persistidas
    pub fn transform(&self, values: &[f32]) -> Result<Vec<f32>, ScalerError> {
        if values.len() != self.mean.len() {
            return Err(ScalerError::InvalidFeatureSize {
                expected: self.mean.len(),
                actual: values.len(),
            });
        }

        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scaler_from_json(json: &str) -> Result<StandardScaler, ScalerError> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        StandardScaler::load(file.path())
    }

    #[test]
    fn test_transform_applies_mean_and_scale() {
        let scaler =
            scaler_from_json(r#"{"mean": [10.0, 0.0, -2.0], "scale": [2.0, 1.0, 4.0]}"#).unwrap();

        let out = scaler.transform(&[14.0, 3.0, -2.0]).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_transform_rejects_wrong_dimension() {
        let scaler = scaler_from_json(r#"{"mean": [0.0, 0.0], "scale": [1.0, 1.0]}"#).unwrap();

        let err = scaler.transform(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            ScalerError::InvalidFeatureSize { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_load_rejects_inconsistent_artifact() {
        let err = scaler_from_json(r#"{"mean": [0.0, 0.0], "scale": [1.0]}"#).unwrap_err();
        assert!(matches!(
            err,
            ScalerError::InconsistentArtifact { mean: 2, scale: 1 }
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        assert!(matches!(
            scaler_from_json("{not json").unwrap_err(),
            ScalerError::JsonError(_)
        ));
    }
}
