use crate::cli::commands::optional_identity;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::core::watcher::BoundaryTracker;
use crate::errors::AppResult;
use crate::models::location::LatLng;
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead};
use tracing::debug;

/// Read `lat,lng` samples from stdin until EOF and print boundary alerts.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let who = optional_identity(cli)?;
    if who.as_ref().is_some_and(|w| w.is_manager()) {
        info("Boundary alerts are only raised for care workers.");
        return Ok(());
    }

    let svc = AttendanceService::open(cfg)?;
    let mut tracker = BoundaryTracker::new();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(sample) = LatLng::parse(line) else {
            warning(format!("Ignoring malformed sample '{line}' (expected lat,lng)"));
            continue;
        };

        // perimeter and shift state are re-read per sample: either may change while watching
        let perimeter = svc.get_perimeter()?;
        let clocked_in = match &who {
            Some(w) => svc.open_shift(&w.worker_id)?.is_some(),
            None => false,
        };

        let alert = tracker.observe(perimeter.as_ref(), sample, clocked_in);
        debug!(%sample, inside = ?tracker.was_inside(), clocked_in, "sample");

        if let Some(alert) = alert {
            println!("{}", alert.message());
        }
    }

    Ok(())
}
