use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;

/// `backup`: managers only, the copy holds every worker's locations and notes.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Backup {
        file,
        compress,
        force,
    } = &cli.command
    else {
        return Ok(());
    };

    identity(cli)?.require_manager()?;

    let svc = AttendanceService::open(cfg)?;
    if let Some(summary) = BackupLogic::backup(svc.pool(), &expand_tilde(file), *compress, *force)? {
        success(format!(
            "Backup created: {} ({} shift records, {} perimeter revisions{})",
            summary.path.display(),
            summary.shifts,
            summary.perimeters,
            if summary.compressed { ", zipped" } else { "" }
        ));
    }

    Ok(())
}
