use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time;
use rusqlite::OptionalExtension;
use std::fs;

/// Row counts and time span of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct DbStats {
    pub workers: i64,
    pub shifts: i64,
    pub open_shifts: i64,
    pub perimeters: i64,
    pub first_clock_in: Option<String>,
    pub last_clock_in: Option<String>,
}

pub fn collect(pool: &DbPool) -> AppResult<DbStats> {
    let count = |sql: &str| -> rusqlite::Result<i64> { pool.conn.query_row(sql, [], |r| r.get(0)) };

    let first_clock_in: Option<String> = pool
        .conn
        .query_row(
            "SELECT clock_in_time FROM shifts ORDER BY clock_in_time ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_clock_in: Option<String> = pool
        .conn
        .query_row(
            "SELECT clock_in_time FROM shifts ORDER BY clock_in_time DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(DbStats {
        workers: count("SELECT COUNT(*) FROM workers")?,
        shifts: count("SELECT COUNT(*) FROM shifts")?,
        open_shifts: count("SELECT COUNT(*) FROM shifts WHERE clock_out_time IS NULL")?,
        perimeters: count("SELECT COUNT(*) FROM perimeters")?,
        first_clock_in,
        last_clock_in,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    let stats = collect(pool)?;
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    println!("{}• Workers:{} {}{}{}", CYAN, RESET, GREEN, stats.workers, RESET);
    println!(
        "{}• Shift records:{} {}{}{} ({} open)",
        CYAN, RESET, GREEN, stats.shifts, RESET, stats.open_shifts
    );
    println!(
        "{}• Perimeter revisions:{} {}",
        CYAN, RESET, stats.perimeters
    );

    //
    // 3) DATE RANGE
    //
    let fmt = |raw: &Option<String>| match raw.as_deref().and_then(time::from_db) {
        Some(ts) => time::format_local(Some(&ts)),
        None => format!("{GREY}--{RESET}"),
    };

    println!("{}• Clock-in range:{}", CYAN, RESET);
    println!("    from: {}", fmt(&stats.first_clock_in));
    println!("    to:   {}", fmt(&stats.last_clock_in));

    println!();
    Ok(())
}
