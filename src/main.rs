//! careclock entrypoint.

use careclock::run;
use careclock::ui::messages::error;

/// Exit status for failures worth retrying (EX_TEMPFAIL).
const EXIT_RETRYABLE: i32 = 75;

fn main() {
    if let Err(e) = run() {
        error(format!("Error [{}]: {}", e.code(), e));
        let status = if e.is_retryable() { EXIT_RETRYABLE } else { 1 };
        std::process::exit(status);
    }
}
