use crate::errors::{AppError, AppResult};
use crate::models::location::LatLng;
use crate::models::perimeter::Perimeter;
use crate::models::shift::ShiftRecord;
use crate::models::worker::{Identity, Role, Worker};
use crate::utils::time;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub(crate) const SHIFT_COLUMNS: &str = "id, worker_id, clock_in_time, clock_in_latitude, clock_in_longitude, clock_in_note, \
     clock_out_time, clock_out_latitude, clock_out_longitude, clock_out_note";

fn conversion_error(col: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(AppError::InvalidDate(format!("{col}: {value}"))),
    )
}

fn get_ts(row: &Row, col: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    time::from_db(&raw).ok_or_else(|| conversion_error(col, &raw))
}

fn get_opt_ts(row: &Row, col: &str) -> Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| time::from_db(&s).ok_or_else(|| conversion_error(col, &s)))
        .transpose()
}

pub fn map_shift_row(row: &Row) -> Result<ShiftRecord> {
    let out_lat: Option<f64> = row.get("clock_out_latitude")?;
    let out_lng: Option<f64> = row.get("clock_out_longitude")?;

    Ok(ShiftRecord {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        clock_in_time: get_ts(row, "clock_in_time")?,
        clock_in_location: LatLng::new(
            row.get("clock_in_latitude")?,
            row.get("clock_in_longitude")?,
        ),
        clock_in_note: row.get("clock_in_note")?,
        clock_out_time: get_opt_ts(row, "clock_out_time")?,
        clock_out_location: match (out_lat, out_lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        },
        clock_out_note: row.get("clock_out_note")?,
    })
}

pub fn map_worker_row(row: &Row) -> Result<Worker> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::Validation(format!("Invalid role: {role_str}"))),
        )
    })?;

    Ok(Worker {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
        email: row.get("email")?,
        role,
        created_at: get_ts(row, "created_at")?,
    })
}

pub fn map_perimeter_row(row: &Row) -> Result<Perimeter> {
    Ok(Perimeter {
        id: row.get("id")?,
        center: LatLng::new(row.get("center_latitude")?, row.get("center_longitude")?),
        radius_km: row.get("radius_km")?,
        updated_at: get_ts(row, "updated_at")?,
    })
}

// ---------------------------
// Perimeter
// ---------------------------

pub fn load_current_perimeter(conn: &Connection) -> AppResult<Option<Perimeter>> {
    let p = conn
        .query_row(
            "SELECT id, center_latitude, center_longitude, radius_km, updated_at
             FROM perimeters
             ORDER BY updated_at DESC, id DESC
             LIMIT 1",
            [],
            map_perimeter_row,
        )
        .optional()?;
    Ok(p)
}

pub fn insert_perimeter(
    conn: &Connection,
    center: LatLng,
    radius_km: f64,
    updated_at: &DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO perimeters (center_latitude, center_longitude, radius_km, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            center.latitude,
            center.longitude,
            radius_km,
            time::to_db(updated_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ---------------------------
// Workers
// ---------------------------

pub fn load_worker(conn: &Connection, id: &str) -> AppResult<Option<Worker>> {
    let w = conn
        .query_row(
            "SELECT id, display_name, email, role, created_at FROM workers WHERE id = ?1",
            [id],
            map_worker_row,
        )
        .optional()?;
    Ok(w)
}

pub fn load_workers(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt = conn.prepare(
        "SELECT id, display_name, email, role, created_at FROM workers ORDER BY display_name, id",
    )?;
    let rows = stmt.query_map([], map_worker_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert the worker if unknown. An existing row keeps its role; only a
/// placeholder display name is refreshed.
pub fn ensure_worker(conn: &Connection, who: &Identity, now: &DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "INSERT INTO workers (id, display_name, email, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
         WHERE workers.display_name = '' OR workers.display_name = 'unknown'",
        params![
            who.worker_id,
            who.display_name,
            who.email,
            who.role.to_db_str(),
            time::to_db(now)
        ],
    )?;
    Ok(())
}

// ---------------------------
// Shifts
// ---------------------------

pub fn load_open_shift(conn: &Connection, worker_id: &str) -> AppResult<Option<ShiftRecord>> {
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE worker_id = ?1 AND clock_out_time IS NULL
         ORDER BY clock_in_time DESC
         LIMIT 1"
    );
    let s = conn.query_row(&sql, [worker_id], map_shift_row).optional()?;
    Ok(s)
}

pub fn load_shift(conn: &Connection, id: i64) -> AppResult<ShiftRecord> {
    let sql = format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_shift_row)?)
}

pub fn insert_shift(
    conn: &Connection,
    worker_id: &str,
    at: &DateTime<Utc>,
    location: LatLng,
    note: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO shifts (worker_id, clock_in_time, clock_in_latitude, clock_in_longitude, clock_in_note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            worker_id,
            time::to_db(at),
            location.latitude,
            location.longitude,
            note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Close an open shift. Returns the number of rows touched (0 when the
/// shift was closed concurrently).
pub fn close_shift(
    conn: &Connection,
    id: i64,
    at: &DateTime<Utc>,
    location: LatLng,
    note: Option<&str>,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE shifts
         SET clock_out_time = ?2, clock_out_latitude = ?3, clock_out_longitude = ?4, clock_out_note = ?5
         WHERE id = ?1 AND clock_out_time IS NULL",
        params![
            id,
            time::to_db(at),
            location.latitude,
            location.longitude,
            note
        ],
    )?;
    Ok(n)
}

/// Shift records filtered by worker and `[from, to]` on clock-in time,
/// newest clock-in first.
pub fn load_shifts(
    conn: &Connection,
    worker_id: Option<&str>,
    from: Option<&DateTime<Utc>>,
    to: Option<&DateTime<Utc>>,
) -> AppResult<Vec<ShiftRecord>> {
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE (?1 IS NULL OR worker_id = ?1)
           AND (?2 IS NULL OR clock_in_time >= ?2)
           AND (?3 IS NULL OR clock_in_time <= ?3)
         ORDER BY clock_in_time DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![worker_id, from.map(time::to_db), to.map(time::to_db)],
        map_shift_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every record that clocked in at or after `since`, plus every open
/// shift regardless of age: the working set of the dashboard.
pub fn load_dashboard_snapshot(
    conn: &Connection,
    since: &DateTime<Utc>,
) -> AppResult<Vec<ShiftRecord>> {
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE clock_in_time >= ?1 OR clock_out_time IS NULL
         ORDER BY clock_in_time DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([time::to_db(since)], map_shift_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The single latest record (by clock-in time) of every worker that has one.
pub fn load_latest_shift_per_worker(conn: &Connection) -> AppResult<Vec<ShiftRecord>> {
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts s
         WHERE s.id = (
             SELECT id FROM shifts
             WHERE worker_id = s.worker_id
             ORDER BY clock_in_time DESC, id DESC
             LIMIT 1
         )
         ORDER BY s.clock_in_time DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_shift_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_open_shifts(conn: &Connection) -> AppResult<Vec<ShiftRecord>> {
    let sql = format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE clock_out_time IS NULL
         ORDER BY clock_in_time DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_shift_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
