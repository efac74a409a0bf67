//! Diagnostic output.
//!
//! Stdout carries the protocol, so every log line goes to stderr.

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `pyresolve=debug`
pub const LOG_ENV: &str = "PYRESOLVE_LOG";

/// Install the global subscriber.
///
/// `PYRESOLVE_LOG` wins over `default_filter`. Calling this twice is harmless;
/// the second installation attempt is ignored.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
