use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc::c_int;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

// Bandera global que levanta el handler; el loop de lectura la consulta en
// cada vuelta para soltar el puerto y salir limpio.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_signal(_signal: c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Instala el handler de SIGINT/SIGTERM. Sin SA_RESTART: la lectura serial
/// bloqueada despierta con EINTR y el loop ve la bandera enseguida.
pub fn install() -> Result<(), nix::Error> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );

    unsafe {
        signal::sigaction(Signal::SIGINT, &action)?;
        signal::sigaction(Signal::SIGTERM, &action)?;
    }

    Ok(())
}

/// True una vez que llegó una señal de terminación
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_set_on_signal() {
        install().unwrap();
        assert!(!interrupted());

        signal::raise(Signal::SIGINT).unwrap();
        assert!(interrupted());
    }
}
