use std::collections::VecDeque;
use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::types::BAUD_RATE;

/// Timeout de cada intento de lectura. Que venza no es un error: el guante
/// puede estar quieto y el enlace legítimamente en silencio.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Arma líneas de texto desde el chorro de bytes del puerto. Tolera lecturas
/// parciales (la línea queda pendiente hasta que llegue el '\n'), CRLF y
/// bytes que no son UTF-8 válido (decodificación lossy: el campo roto después
/// no parsea como número y la línea se descarta entera).
#[derive(Default)]
pub struct LineFramer {
    partial: Vec<u8>,
    ready: VecDeque<String>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alimenta bytes crudos recién leídos del puerto
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.partial)
                    .trim_end_matches('\r')
                    .to_string();
                self.ready.push_back(line);
                self.partial.clear();
            } else {
                self.partial.push(byte);
            }
        }
    }

    /// Siguiente línea completa, si hay alguna
    pub fn next_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }
}

/// Conexión serial al guante con framing por líneas.
/// El puerto se libera al soltar el handle, en cualquier camino de salida.
pub struct SerialReader {
    port: Box<dyn serialport::SerialPort>,
    framer: LineFramer,
}

impl SerialReader {
    /// Abre el puerto a 9600 baudios con timeout de lectura acotado.
    /// Fallar acá es fatal para el proceso: no hay reintento.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("No se pudo abrir el puerto serial {}", port_name))?;

        Ok(Self {
            port,
            framer: LineFramer::new(),
        })
    }

    /// Puertos seriales detectados en el sistema
    pub fn list_ports() -> Vec<String> {
        serialport::available_ports()
            .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
            .unwrap_or_default()
    }

    /// Siguiente línea completa del puerto. Ok(None) significa "todavía
    /// nada": venció el timeout o la línea sigue a medias. Un error de IO
    /// real (no timeout) sí se propaga.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.framer.next_line() {
            return Ok(Some(line));
        }

        let mut buf = [0u8; 256];
        match self.port.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(n) => self.framer.feed(&buf[..n]),
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::Interrupted =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e).context("Error de lectura en el puerto serial"),
        }

        Ok(self.framer.next_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framer_complete_line() {
        let mut framer = LineFramer::new();
        framer.feed(b"321,292,287,279,0,0,0,0,0,0\n");

        assert_eq!(
            framer.next_line().as_deref(),
            Some("321,292,287,279,0,0,0,0,0,0")
        );
        assert!(framer.next_line().is_none());
    }

    #[test]
    fn test_framer_partial_then_rest() {
        let mut framer = LineFramer::new();
        framer.feed(b"321,292,");
        assert!(framer.next_line().is_none());

        framer.feed(b"287,279,0,0,0,0,0,0\n");
        assert_eq!(
            framer.next_line().as_deref(),
            Some("321,292,287,279,0,0,0,0,0,0")
        );
    }

    #[test]
    fn test_framer_multiple_lines_one_read() {
        let mut framer = LineFramer::new();
        framer.feed(b"1,2,3\n4,5,6\n7,8");

        assert_eq!(framer.next_line().as_deref(), Some("1,2,3"));
        assert_eq!(framer.next_line().as_deref(), Some("4,5,6"));
        assert!(framer.next_line().is_none());
    }

    #[test]
    fn test_framer_strips_carriage_return() {
        let mut framer = LineFramer::new();
        framer.feed(b"1,2,3\r\n");
        assert_eq!(framer.next_line().as_deref(), Some("1,2,3"));
    }

    #[test]
    fn test_framer_empty_lines_survive() {
        // El parser decide qué hacer con líneas vacías, no el framer
        let mut framer = LineFramer::new();
        framer.feed(b"\n\n");
        assert_eq!(framer.next_line().as_deref(), Some(""));
        assert_eq!(framer.next_line().as_deref(), Some(""));
    }

    #[test]
    fn test_framer_tolerates_encoding_noise() {
        let mut framer = LineFramer::new();
        framer.feed(b"3\xff21,2\n");

        // Lossy: la línea sale, con el byte roto reemplazado
        let line = framer.next_line().unwrap();
        assert!(line.contains('\u{fffd}'));
    }
}
