use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

/// Ensure that the `log` table exists. Applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_initial_schema",
        description: "Created perimeters, workers and shifts tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS perimeters (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            center_latitude  REAL NOT NULL,
            center_longitude REAL NOT NULL,
            radius_km        REAL NOT NULL CHECK(radius_km > 0),
            updated_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workers (
            id           TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            email        TEXT NOT NULL DEFAULT '',
            role         TEXT NOT NULL CHECK(role IN ('MANAGER','CARE_WORKER')),
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS shifts (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id             TEXT NOT NULL REFERENCES workers(id),
            clock_in_time         TEXT NOT NULL,
            clock_in_latitude     REAL NOT NULL,
            clock_in_longitude    REAL NOT NULL,
            clock_in_note         TEXT,
            clock_out_time        TEXT,
            clock_out_latitude    REAL,
            clock_out_longitude   REAL,
            clock_out_note        TEXT,
            CHECK(clock_out_time IS NULL OR clock_out_time >= clock_in_time)
        );

        CREATE INDEX IF NOT EXISTS idx_perimeters_updated ON perimeters(updated_at);
        CREATE INDEX IF NOT EXISTS idx_shifts_worker_open ON shifts(worker_id, clock_out_time);
        CREATE INDEX IF NOT EXISTS idx_shifts_clock_in ON shifts(clock_in_time);
        "#,
    },
    Migration {
        version: "20250310_0002_open_shift_guard",
        description: "Added unique index allowing one open shift per worker",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ux_shifts_one_open
            ON shifts(worker_id) WHERE clock_out_time IS NULL;
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()?;
    info!(version = m.version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations, oldest first.
///
/// Invoked by `db::initialize::init_db()`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
