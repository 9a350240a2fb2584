use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Reset { yes, workers } = &cli.command else {
        return Ok(());
    };

    if !*yes {
        return Err(AppError::Validation(
            "reset deletes every shift record; pass --yes to confirm".into(),
        ));
    }

    let who = identity(cli)?;
    let mut svc = AttendanceService::open(cfg)?;
    let summary = svc.reset(&who, *workers)?;

    success(format!(
        "Removed {} shift records and {} workers.",
        summary.shifts, summary.workers
    ));
    Ok(())
}
