/*
Flex Lingo — predicción de gestos del guante en un solo disparo

Lee lecturas del guante (4 flex + IMU de 6 ejes) por el puerto serial,
espera la primera línea válida, la clasifica con el modelo ONNX configurado
y escribe exactamente una línea "<etiqueta> <HH:MM:SS>" en stdout.

El proceso está pensado para que un orquestador externo lance una invocación
por predicción y parsee esa única línea: todo el diagnóstico va por stderr.

Para ejecutar:
    ./target/release/flexlingo /dev/ttyUSB0
    ./target/release/flexlingo --bilstm COM7
    ./target/release/flexlingo --legacy --dir modelos/ COM7
*/

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use chrono::Local;

use flexlingo::frame_parser::parse_line;
use flexlingo::gesture_classifier::{
    ClassifierConfig, GestureClassifier, ModelGeneration, ModelKind,
};
use flexlingo::interrupt;
use flexlingo::serial_reader::SerialReader;

struct Options {
    port: Option<String>,
    model_dir: PathBuf,
    kind: ModelKind,
    generation: ModelGeneration,
}

fn parse_args() -> Result<Options> {
    let mut port: Option<String> = None;
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
                    .ok_or_else(|| anyhow::anyhow!("--dir necesita una carpeta"))?;
                model_dir = PathBuf::from(dir);
            }
            _ if arg.starts_with("--") => {
                bail!("Opción desconocida: {}", arg);
            }
            _ => {
                if port.is_some() {
                    bail!("Solo se acepta un puerto serial");
                }
                port = Some(arg);
            }
        }
    }

    Ok(Options {
        port,
        model_dir,
        kind,
        generation,
    })
}

fn print_usage() {
    eprintln!("Uso: flexlingo [--bilstm] [--legacy] [--dir <carpeta-modelos>] <puerto-serial>");

    let ports = SerialReader::list_ports();
    if ports.is_empty() {
        eprintln!("⚠️  No se detectó ningún puerto serial");
    } else {
        eprintln!("Puertos detectados: {}", ports.join(", "));
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let opts = parse_args()?;

    let Some(port_name) = opts.port else {
        print_usage();
        return Ok(ExitCode::FAILURE);
    };

    interrupt::install()?;

    let config = ClassifierConfig::standard(&opts.model_dir, opts.kind, opts.generation);
    let mut classifier = GestureClassifier::new(&config)?;
    eprintln!("✅ Clasificador cargado");

    let mut reader = SerialReader::open(&port_name)?;
    eprintln!("🔌 Puerto abierto: {} @ 9600", port_name);
    eprintln!("🎯 Esperando una lectura válida...");

    loop {
        if interrupt::interrupted() {
            // El puerto se libera al salir del scope, sin salida parcial
            eprintln!("🛑 Interrumpido, cerrando puerto");
            return Ok(ExitCode::from(130));
        }

        // Timeout → None → seguir esperando; línea inválida → descartar.
        // Solo un error de IO real o de inferencia corta el loop.
        let Some(line) = reader.read_line()? else {
            continue;
        };

        let Some(frame) = parse_line(&line) else {
            continue;
        };

        let prediction = classifier.classify(&frame)?;
        let timestamp = Local::now().format("%H:%M:%S");
        println!("{} {}", prediction.label, timestamp);

        return Ok(ExitCode::SUCCESS);
    }
}
