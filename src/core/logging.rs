//! Tracing setup for the binary
//!
//! Log lines go to stderr so they never interleave with the board the REPL
//! prints on stdout. `RUST_LOG` wins over the default filter.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid. Calling this
/// twice is harmless; the second call is ignored.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
