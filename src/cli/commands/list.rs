use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::aggregator::{duration_hours, round2};
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use crate::utils::table::{Column, Table};
use crate::utils::time;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::List {
        for_worker,
        from,
        to,
    } = &cli.command
    else {
        return Ok(());
    };

    let who = identity(cli)?;
    let from = from.as_deref().map(time::parse_bound).transpose()?;
    let to = to.as_deref().map(time::parse_upper_bound).transpose()?;

    let svc = AttendanceService::open(cfg)?;
    let records = svc.list_shifts(&who, for_worker.as_deref(), from.as_ref(), to.as_ref())?;

    if records.is_empty() {
        warning("No shift records found.");
        return Ok(());
    }

    let now = svc.now();
    let mut table = Table::new(vec![
        Column::new("ID"),
        Column::new("Worker"),
        Column::new("In"),
        Column::new("Out"),
        Column::new("Hours"),
        Column::new("Location"),
        Column::new("Note"),
    ]);

    for r in &records {
        table.add_row(vec![
            r.id.to_string(),
            r.worker_id.clone(),
            time::format_local(Some(&r.clock_in_time)),
            time::format_local(r.clock_out_time.as_ref()),
            format!("{:.2}", round2(duration_hours(r, now))),
            r.latest_location().to_string(),
            r.latest_note().unwrap_or("--").to_string(),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
