/*
Reproducción offline: clasifica lecturas ya capturadas en un CSV.

Sirve para validar un artefacto entrenado sin guante conectado, usando los
mismos CSV que escribe data_logger.

    ./target/release/predict_csv capturas/hi.csv
    ./target/release/predict_csv --bilstm --dir modelos/ capturas/hi.csv
*/

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use flexlingo::csv_loader::load_frames_from_csv;
use flexlingo::gesture_classifier::{
    ClassifierConfig, GestureClassifier, ModelGeneration, ModelKind,
};

struct Options {
    csv_path: PathBuf,
    model_dir: PathBuf,
    kind: ModelKind,
    generation: ModelGeneration,
}

fn parse_args() -> Result<Options> {
    let mut csv_path: Option<PathBuf> = None;
    let mut model_dir = PathBuf::from(".");
    let mut kind = ModelKind::FlatVector;
    let mut generation = ModelGeneration::FourClass;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bilstm" => kind = ModelKind::Sequential,
            "--legacy" => generation = ModelGeneration::Binary,
            "--dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| anyhow!("--dir necesita una carpeta"))?;
                model_dir = PathBuf::from(dir);
            }
            _ => {
                if csv_path.is_some() {
                    bail!("Uso: predict_csv [--bilstm] [--legacy] [--dir <carpeta>] <archivo.csv>");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar un archivo CSV"))?;
    Ok(Options {
        csv_path,
        model_dir,
        kind,
        generation,
    })
}

fn main() -> Result<()> {
    let opts = parse_args()?;
    println!("🎞️  Clasificando lecturas desde {:?}", opts.csv_path);

    let frames = load_frames_from_csv(&opts.csv_path)?;
    println!("📄 {} lecturas cargadas", frames.len());

    let config = ClassifierConfig::standard(&opts.model_dir, opts.kind, opts.generation);
    let mut classifier = GestureClassifier::new(&config)?;

    let mut tally: BTreeMap<String, usize> = BTreeMap::new();

    for (idx, frame) in frames.iter().enumerate() {
        let prediction = classifier.classify(frame)?;

        match prediction.confidence {
            Some(conf) => println!(
                "  {:>4}: {:<8} ({:.1}%)",
                idx + 1,
                prediction.label,
                conf * 100.0
            ),
            None => println!("  {:>4}: {}", idx + 1, prediction.label),
        }

        *tally.entry(prediction.label).or_insert(0) += 1;
    }

    println!("\nResumen por etiqueta:");
    for (label, count) in &tally {
        println!("  {:<8} {:>5}", label, count);
    }

    Ok(())
}
