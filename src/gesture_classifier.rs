use crate::scaler::{ScalerError, StandardScaler};
use crate::types::{SensorFrame, NUM_CHANNELS};
use ort::session::Session;
use ort::value::TensorElementType;
use ort::value::ValueType;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("ONNX Runtime error: {0}")]
    OnnxError(#[from] ort::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Scaler error: {0}")]
    ScalerError(#[from] ScalerError),

    #[error("Missing ONNX {kind}")]
    MissingIo { kind: &'static str },

    #[error("Model returned an empty output tensor")]
    EmptyOutput,
}

#[derive(Debug, Deserialize)]
struct ClassesJson {
    index_to_class: HashMap<String, String>,
}

/// Generación de entrenamiento del artefacto. Los esquemas de etiquetas y
/// de features no son compatibles entre generaciones, así que la generación
/// activa se inyecta explícitamente en vez de asumir una tabla fija.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelGeneration {
    /// Generación actual: hi/yes/no/rest sobre 10 features
    FourClass,
    /// Generación vieja: hi/ok sobre 11 features (la 11ª siempre fue 0)
    Binary,
}

impl ModelGeneration {
    /// Tabla índice → etiqueta usada cuando no hay classes.json persistido
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            ModelGeneration::FourClass => &["hi", "yes", "no", "rest"],
            ModelGeneration::Binary => &["hi", "ok"],
        }
    }

    /// Cantidad de features que el modelo de esta generación consume
    pub fn feature_count(&self) -> usize {
        match self {
            ModelGeneration::FourClass => NUM_CHANNELS,
            ModelGeneration::Binary => NUM_CHANNELS + 1,
        }
    }
}

/// Forma de entrada que el clasificador concreto espera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Ensamble de árboles: una fila de N features [1, N]
    FlatVector,
    /// Red recurrente: secuencia de N pasos con 1 feature [1, N, 1]
    Sequential,
}

/// Configuración explícita del clasificador: qué modelo, de qué generación,
/// y con qué artefactos de preprocesamiento. Se construye en el arranque y
/// se pasa al motor; no hay estado global escondido.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    pub kind: ModelKind,
    pub generation: ModelGeneration,
    pub scaler_path: Option<PathBuf>,
    pub classes_path: Option<PathBuf>,
}

impl ClassifierConfig {
    /// Artefactos estándar para una combinación generación × tipo de modelo,
    /// resueltos dentro de un directorio base
    pub fn standard(dir: impl AsRef<Path>, kind: ModelKind, generation: ModelGeneration) -> Self {
        let dir = dir.as_ref();
        let (model, scaler) = match (kind, generation) {
            (ModelKind::FlatVector, ModelGeneration::FourClass) => {
                ("random_forest_10_features.onnx", None)
            }
            (ModelKind::FlatVector, ModelGeneration::Binary) => {
                ("random_forest_11_features.onnx", None)
            }
            (ModelKind::Sequential, ModelGeneration::FourClass) => {
                ("bilstm_sign_model.onnx", Some("scaler.json"))
            }
            (ModelKind::Sequential, ModelGeneration::Binary) => {
                ("bilstm_sign_11_features.onnx", Some("scaler.json"))
            }
        };

        // El label encoder persistido solo existe en la generación de 4 clases
        let classes = match generation {
            ModelGeneration::FourClass => Some(dir.join("classes.json")),
            ModelGeneration::Binary => None,
        };

        Self {
            model_path: dir.join(model),
            kind,
            generation,
            scaler_path: scaler.map(|s| dir.join(s)),
            classes_path: classes,
        }
    }
}

/// De dónde sale la clase predicha en los outputs del modelo
enum OutputSource {
    /// Tensor f32 de probabilidades por clase (softmax): argmax
    Probabilities(String),
    /// Tensor i64 con el índice de clase ya decidido (ensamble de árboles)
    ClassIndex(String),
}

/// Resultado de una clasificación
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub index: usize,
    /// Score de la clase ganadora; None cuando el modelo solo emite el índice
    pub confidence: Option<f32>,
}

pub struct GestureClassifier {
    session: Session,
    labels: Vec<String>,
    scaler: Option<StandardScaler>,
    kind: ModelKind,
    num_features: usize,
    input_name: String,
    output: OutputSource,
}

impl GestureClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        // Etiquetas: el encoder persistido manda; si no existe, la tabla fija
        // de la generación configurada
        let labels = match &config.classes_path {
            Some(path) if path.exists() => Self::load_classes(path)?,
            _ => config
                .generation
                .labels()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let scaler = match &config.scaler_path {
            Some(path) => Some(StandardScaler::load(path)?),
            None => None,
        };

        let session = Session::builder()?.commit_from_file(&config.model_path)?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or(ClassifierError::MissingIo { kind: "input" })?;

        // Preferir un tensor f32 (probabilidades); si no hay, el tensor i64
        // con el índice de clase que exportan los ensambles de árboles
        let prob_output = session
            .outputs()
            .iter()
            .find(|output| {
                matches!(
                    output.dtype(),
                    ValueType::Tensor {
                        ty: TensorElementType::Float32,
                        ..
                    }
                )
            })
            .map(|output| OutputSource::Probabilities(output.name().to_string()));

        let index_output = session
            .outputs()
            .iter()
            .find(|output| {
                matches!(
                    output.dtype(),
                    ValueType::Tensor {
                        ty: TensorElementType::Int64,
                        ..
                    }
                )
            })
            .map(|output| OutputSource::ClassIndex(output.name().to_string()));

        let output = prob_output
            .or(index_output)
            .ok_or(ClassifierError::MissingIo { kind: "output" })?;

        eprintln!("[ONNX] Modelo cargado: {:?}", config.model_path);
        eprintln!("[ONNX] Clases: {:?}", labels);

        Ok(Self {
            session,
            labels,
            scaler,
            kind: config.kind,
            num_features: config.generation.feature_count(),
            input_name,
            output,
        })
    }

    fn load_classes(path: impl AsRef<Path>) -> Result<Vec<String>, ClassifierError> {
        let content = fs::read_to_string(path)?;
        let data: ClassesJson = serde_json::from_str(&content)?;

        // Convertir HashMap a Vec ordenado por índice
        let mut pairs: Vec<(usize, String)> = data
            .index_to_class
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
            .collect();

        pairs.sort_by_key(|(idx, _)| *idx);
        Ok(pairs.into_iter().map(|(_, name)| name).collect())
    }

    /// Clasifica una lectura validada. Un error acá nunca es transitorio:
    /// significa que el artefacto y la entrada no calzan, y el caller debe
    /// abortar en vez de reintentar.
    pub fn classify(&mut self, frame: &SensorFrame) -> Result<Prediction, ClassifierError> {
        let features = self.prepare_features(frame)?;

        let shape = match self.kind {
            ModelKind::FlatVector => vec![1_usize, self.num_features],
            ModelKind::Sequential => vec![1_usize, self.num_features, 1],
        };

        let input_value = ort::value::Value::from_array((shape, features))?;

        let outputs = self.session.run(ort::inputs![
            self.input_name.as_str() => &input_value,
        ])?;

        let (index, confidence) = match &self.output {
            OutputSource::Probabilities(name) => {
                let (_, scores) = outputs[name.as_str()].try_extract_tensor::<f32>()?;
                if scores.is_empty() {
                    return Err(ClassifierError::EmptyOutput);
                }
                let index = argmax(scores);
                (index, Some(scores[index]))
            }
            OutputSource::ClassIndex(name) => {
                let (_, indices) = outputs[name.as_str()].try_extract_tensor::<i64>()?;
                let index = *indices.first().ok_or(ClassifierError::EmptyOutput)?;
                (index.max(0) as usize, None)
            }
        };

        Ok(Prediction {
            label: label_for(&self.labels, index),
            index,
            confidence,
        })
    }

    /// Aplana el frame, rellena el canal fantasma de la generación vieja y
    /// aplica el scaler persistido si la generación lo usa
    fn prepare_features(&self, frame: &SensorFrame) -> Result<Vec<f32>, ClassifierError> {
        let mut features = frame.to_values().to_vec();
        // La generación de 11 features siempre entrenó con la última columna en 0
        features.resize(self.num_features, 0.0);

        match &self.scaler {
            Some(scaler) => Ok(scaler.transform(&features)?),
            None => Ok(features),
        }
    }

    /// Etiquetas activas, en orden de índice
    pub fn get_labels(&self) -> &[String] {
        &self.labels
    }
}

/// Índice del score máximo; empates se resuelven al índice más bajo
pub fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

/// Decodifica un índice de clase a etiqueta; fuera de rango → "unknown"
pub fn label_for(labels: &[String], index: usize) -> String {
    labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}
