//! Diagnostic logging setup.
//!
//! Business events go to the `log` table (see `db::log`); this is the
//! operator-facing stream on stderr.

use tracing::Level;

/// Install the global fmt subscriber. Safe to call more than once: only the
/// first call wins.
pub fn init(level: &str, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        level.parse().unwrap_or(Level::WARN)
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
