use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::models::shift::ShiftStatus;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};
use crate::utils::time;

/// `overview` and `active`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let who = identity(cli)?;
    let svc = AttendanceService::open(cfg)?;

    match &cli.command {
        Commands::Overview => {
            let rows = svc.staff_overview(&who)?;
            if rows.is_empty() {
                info("No care worker has clocked in yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("Worker"),
                Column::new("Name"),
                Column::new("Status"),
                Column::new("Last in"),
                Column::new("Last out"),
                Column::new("Location"),
                Column::new("Notes"),
            ]);
            for r in &rows {
                table.add_row(vec![
                    r.worker_id.clone(),
                    r.display_name.clone(),
                    r.status.label().to_string(),
                    time::format_local(r.last_clock_in.as_ref()),
                    time::format_local(r.last_clock_out.as_ref()),
                    r.location.map(|l| l.to_string()).unwrap_or_else(|| "--".into()),
                    r.notes.clone().unwrap_or_else(|| "--".into()),
                ]);
            }
            print!("{}", table.render());

            let active = rows.iter().filter(|r| r.status == ShiftStatus::Active).count();
            println!("\n{active} of {} active", rows.len());
        }

        Commands::Active => {
            let rows = svc.active_staff(&who)?;
            if rows.is_empty() {
                info("Nobody is clocked in.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("Worker"),
                Column::new("Name"),
                Column::new("Email"),
                Column::new("Since"),
                Column::new("Location"),
                Column::new("Notes"),
            ]);
            for r in &rows {
                table.add_row(vec![
                    r.worker_id.clone(),
                    r.display_name.clone(),
                    r.email.clone(),
                    time::format_local(Some(&r.clock_in_time)),
                    r.location.to_string(),
                    r.notes.clone().unwrap_or_else(|| "--".into()),
                ]);
            }
            print!("{}", table.render());
        }

        _ => {}
    }

    Ok(())
}
