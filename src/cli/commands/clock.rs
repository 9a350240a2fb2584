use crate::cli::commands::identity;
use crate::cli::parser::{ClockAction, Cli, Commands};
use crate::config::Config;
use crate::core::aggregator::duration_hours;
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::models::location::LatLng;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_status;
use crate::utils::time;

/// `clock in`, `clock out` and `status`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let who = identity(cli)?;
    let mut svc = AttendanceService::open(cfg)?;

    match &cli.command {
        Commands::Clock {
            action: ClockAction::In { lat, lng, note },
        } => {
            let rec = svc.clock_in(&who, LatLng::new(*lat, *lng), note.as_deref())?;
            success(format!(
                "{} clocked in at {} (shift #{})",
                who.display_name,
                time::format_local(Some(&rec.clock_in_time)),
                rec.id
            ));
        }

        Commands::Clock {
            action: ClockAction::Out { lat, lng, note },
        } => {
            let rec = svc.clock_out(&who, LatLng::new(*lat, *lng), note.as_deref())?;
            success(format!(
                "{} clocked out at {} after {}",
                who.display_name,
                time::format_local(rec.clock_out_time.as_ref()),
                time::hours2readable(duration_hours(&rec, svc.now()))
            ));
        }

        Commands::Status => match svc.open_shift(&who.worker_id)? {
            Some(open) => {
                println!("🟢 Status     : {}", colorize_status("Active", true));
                println!(
                    "🕒 Clocked in : {}",
                    time::format_local(Some(&open.clock_in_time))
                );
                println!("📍 Location   : {}", open.clock_in_location);
                println!(
                    "⏱️  Running    : {}",
                    time::hours2readable(duration_hours(&open, svc.now()))
                );
            }
            None => info(format!("{} is not clocked in.", who.worker_id)),
        },

        _ => {}
    }

    Ok(())
}
