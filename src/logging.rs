//! Logging initialisation.
//!
//! The library only emits `tracing` events. Binaries call [`init_logging`]
//! once at start-up to install a subscriber.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: 0 = info, 1 = debug, 2+ = trace.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `verbose`. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("logging initialised at verbosity {verbose}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "info");
        assert_eq!(level_for_verbosity(1), "debug");
        assert_eq!(level_for_verbosity(7), "trace");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(0);
        init_logging(2);
    }
}
