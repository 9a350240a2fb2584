use crate::cli::commands::identity;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::service::AttendanceService;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Stats { json } = &cli.command else {
        return Ok(());
    };

    let who = identity(cli)?;
    let svc = AttendanceService::open(cfg)?;
    let stats = svc.dashboard_stats(&who)?;

    if *json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    header("Today");
    println!("Care staff        : {}", stats.total_staff_count);
    println!("Clocked in now    : {}", stats.active_staff_count);
    println!("Clock-ins today   : {}", stats.clock_ins_today);
    println!("Avg hours today   : {:.2}", stats.average_hours_today);
    println!();

    header("Average hours per weekday");
    let mut daily = Table::new(vec![Column::new("Day"), Column::new("Avg hours")]);
    for d in &stats.daily_stats {
        daily.add_row(vec![d.day.clone(), format!("{:.2}", d.avg_hours)]);
    }
    print!("{}", daily.render());
    println!();

    header(format!("Hours in the last {} days", cfg.weekly_window_days));
    let mut weekly = Table::new(vec![
        Column::new("Worker"),
        Column::new("Name"),
        Column::new("Hours"),
    ]);
    for s in &stats.weekly_hours_by_staff {
        weekly.add_row(vec![
            s.worker_id.clone(),
            s.staff_name.clone(),
            format!("{:.2}", s.total_hours),
        ]);
    }
    if weekly.is_empty() {
        println!("--");
    } else {
        print!("{}", weekly.render());
    }

    Ok(())
}
