/*
Captura de datos del guante a CSV para entrenamiento.

Lee lecturas válidas del puerto serial y las va anotando en un CSV con el
encabezado canónico Flex1..Gyroscope_Z, hasta juntar la cantidad pedida
(1020 por defecto) o hasta que llegue Ctrl-C.

    ./target/release/data_logger /dev/ttyUSB0
    ./target/release/data_logger --max 500 --salida hi.csv COM7
*/

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use flexlingo::frame_parser::parse_line;
use flexlingo::interrupt;
use flexlingo::serial_reader::SerialReader;
use flexlingo::types::CSV_COLUMNS;

const DEFAULT_MAX_RECORDS: usize = 1020;
const DEFAULT_OUTPUT: &str = "hand_sensor_data.csv";

struct Options {
    port: String,
    output: PathBuf,
    max_records: usize,
}

fn parse_args() -> Result<Options> {
    let mut port: Option<String> = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    let mut max_records = DEFAULT_MAX_RECORDS;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--salida" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--salida necesita un archivo"))?;
                output = PathBuf::from(path);
            }
            "--max" => {
                let n = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max necesita un número"))?;
                max_records = n
                    .parse()
                    .with_context(|| format!("--max inválido: {}", n))?;
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

    let port = port.ok_or_else(|| {
        anyhow::anyhow!("Uso: data_logger [--max <n>] [--salida <archivo.csv>] <puerto-serial>")
    })?;

    Ok(Options {
        port,
        output,
        max_records,
    })
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

    interrupt::install()?;

    let mut reader = SerialReader::open(&opts.port)?;
    eprintln!("🔌 Conectado a {} @ 9600", opts.port);
    eprintln!(
        "📝 Capturando {} lecturas en {:?}...\n",
        opts.max_records, opts.output
    );

    let mut writer = csv::Writer::from_path(&opts.output)
        .with_context(|| format!("No se pudo crear el CSV {:?}", opts.output))?;
    writer.write_record(CSV_COLUMNS)?;

    let mut count = 0;
    while count < opts.max_records {
        if interrupt::interrupted() {
            writer.flush()?;
            eprintln!("\n🛑 Interrumpido: {} lecturas guardadas", count);
            return Ok(ExitCode::from(130));
        }

        let Some(line) = reader.read_line()? else {
            continue;
        };

        let Some(frame) = parse_line(&line) else {
            continue;
        };

        let values = frame.to_values();
        writer.write_record(values.iter().map(|v| v.to_string()))?;
        count += 1;
        eprintln!("[{}] {}", count, line);
    }

    writer.flush()?;
    eprintln!("\n✅ {} lecturas guardadas en {:?}", count, opts.output);

    Ok(ExitCode::SUCCESS)
}
