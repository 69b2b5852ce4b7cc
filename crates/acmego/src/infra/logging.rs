//! Diagnostic logging on stderr.
//!
//! Standard output belongs to command results (acme shows it in +Errors), so
//! log lines always go to stderr.

use std::str::FromStr;

use tracing::Level;

/// Resolve the effective level from the configured name and `-v` count.
pub fn level(configured: &str, verbosity: u8) -> Level {
    let base = Level::from_str(configured.trim()).unwrap_or(Level::WARN);
    (0..verbosity).fold(base, |level, _| raise(level))
}

fn raise(level: Level) -> Level {
    match level {
        Level::ERROR => Level::WARN,
        Level::WARN => Level::INFO,
        Level::INFO => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();
}
