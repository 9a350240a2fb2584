use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::db::log::audit_quietly;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::export::logic::ExportFilter;
use crate::utils::path::expand_tilde;
use crate::utils::time;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        format,
        file,
        for_worker,
        from,
        to,
        force,
    } = &cli.command
    else {
        return Ok(());
    };

    // exports cover other workers' records
    let who = identity(cli)?;
    if !who.is_manager() && for_worker.as_deref().is_some_and(|w| w != who.worker_id) {
        return Err(AppError::Forbidden(
            "only managers can export other workers' shifts".into(),
        ));
    }

    let filter = ExportFilter {
        worker_id: if who.is_manager() {
            for_worker.clone()
        } else {
            Some(who.worker_id.clone())
        },
        from: from.as_deref().map(time::parse_bound).transpose()?,
        to: to.as_deref().map(time::parse_upper_bound).transpose()?,
    };

    let path = expand_tilde(file);
    let svc = AttendanceService::open(cfg)?;
    let count = ExportLogic::export(&svc.pool().conn, *format, &path, &filter, *force)?;

    audit_quietly(
        &svc.pool().conn,
        "export",
        &path.to_string_lossy(),
        &format!("{count} shift records as {}", format.as_str()),
    );

    Ok(())
}
