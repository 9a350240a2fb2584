//! Shift ledger: the clock-in/clock-out state machine.
//!
//! A worker is `IN` while a shift record without clock-out exists and `OUT`
//! otherwise. Both transitions run inside `BEGIN IMMEDIATE` transactions:
//! the write lock is taken before the open-shift check, so two concurrent
//! clock-ins for the same worker are serialized and the loser observes the
//! winner's open shift. The partial unique index on open shifts backs this
//! up at the storage level.

use crate::core::perimeter::PerimeterStore;
use crate::db::log::audit_quietly;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::location::LatLng;
use crate::models::perimeter::Perimeter;
use crate::models::shift::{ActiveStaff, ShiftRecord, ShiftStatus, StaffOverview};
use crate::models::worker::{Identity, Role};
use crate::utils::time;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, TransactionBehavior};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Counts removed by an administrative reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    pub shifts: usize,
    pub workers: usize,
}

pub struct ShiftLedger;

fn clean_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|n| !n.is_empty())
}

fn is_open_shift_conflict(e: &rusqlite::Error) -> bool {
    e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation)
}

impl ShiftLedger {
    /// Open a shift for `who` at `now`.
    ///
    /// `perimeter` is the snapshot the location is validated against; the
    /// caller's own "within range" opinion is never consulted.
    pub fn clock_in(
        conn: &mut Connection,
        who: &Identity,
        perimeter: Option<&Perimeter>,
        location: LatLng,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<ShiftRecord> {
        // out-of-range degrees are never inside, whatever the distance math says
        let check = PerimeterStore::contains(perimeter, location);
        if !location.is_valid() || !check.inside {
            debug!(
                worker_id = %who.worker_id,
                distance_m = ?check.distance_m,
                radius_m = ?check.radius_m,
                "clock-in rejected: outside perimeter"
            );
            return Err(AppError::NotInPerimeter {
                distance_m: check.distance_m,
                radius_m: check.radius_m,
            });
        }

        let now = time::truncate(now);
        let note = clean_note(note);

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        queries::ensure_worker(&tx, who, &now)?;

        if queries::load_open_shift(&tx, &who.worker_id)?.is_some() {
            return Err(AppError::AlreadyClockedIn {
                worker_id: who.worker_id.clone(),
            });
        }

        let id = match queries::insert_shift(&tx, &who.worker_id, &now, location, note) {
            Ok(id) => id,
            Err(e) if is_open_shift_conflict(&e) => {
                return Err(AppError::AlreadyClockedIn {
                    worker_id: who.worker_id.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let record = queries::load_shift(&tx, id)?;
        tx.commit()?;

        info!(worker_id = %who.worker_id, shift_id = id, "clocked in");
        audit_quietly(
            conn,
            "clock_in",
            &who.worker_id,
            &format!("shift {id} opened at {location}"),
        );

        Ok(record)
    }

    /// Close the worker's open shift. No perimeter check: clocking out
    /// from outside the work area is allowed.
    pub fn clock_out(
        conn: &mut Connection,
        worker_id: &str,
        location: LatLng,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<ShiftRecord> {
        if !location.is_valid() {
            return Err(AppError::Validation(format!(
                "clock-out location must be finite degrees, got {}, {}",
                location.latitude, location.longitude
            )));
        }

        let note = clean_note(note);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let open = queries::load_open_shift(&tx, worker_id)?.ok_or_else(|| AppError::NoOpenShift {
            worker_id: worker_id.to_string(),
        })?;

        // a clock stepping backwards must not produce a negative shift
        let at = time::truncate(now).max(open.clock_in_time);

        if queries::close_shift(&tx, open.id, &at, location, note)? == 0 {
            return Err(AppError::NoOpenShift {
                worker_id: worker_id.to_string(),
            });
        }

        let record = queries::load_shift(&tx, open.id)?;
        tx.commit()?;

        info!(worker_id, shift_id = open.id, "clocked out");
        audit_quietly(
            conn,
            "clock_out",
            worker_id,
            &format!("shift {} closed at {location}", open.id),
        );

        Ok(record)
    }

    pub fn get_open_shift(conn: &Connection, worker_id: &str) -> AppResult<Option<ShiftRecord>> {
        queries::load_open_shift(conn, worker_id)
    }

    /// Records ordered by clock-in time, newest first.
    pub fn list_shifts(
        conn: &Connection,
        worker_id: Option<&str>,
        from: Option<&DateTime<Utc>>,
        to: Option<&DateTime<Utc>>,
    ) -> AppResult<Vec<ShiftRecord>> {
        queries::load_shifts(conn, worker_id, from, to)
    }

    /// Latest-record view of every care worker who has clocked in at least once.
    pub fn staff_overview(conn: &Connection) -> AppResult<Vec<StaffOverview>> {
        let workers: HashMap<String, _> = queries::load_workers(conn)?
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect();

        let open: HashSet<String> = queries::load_open_shifts(conn)?
            .into_iter()
            .map(|s| s.worker_id)
            .collect();

        let mut out = Vec::new();
        for latest in queries::load_latest_shift_per_worker(conn)? {
            let Some(worker) = workers.get(&latest.worker_id) else {
                continue;
            };
            if worker.role != Role::CareWorker {
                continue;
            }

            let status = if open.contains(&worker.id) {
                ShiftStatus::Active
            } else {
                ShiftStatus::NotActive
            };

            out.push(StaffOverview {
                worker_id: worker.id.clone(),
                display_name: worker.display_name.clone(),
                status,
                last_clock_in: Some(latest.clock_in_time),
                last_clock_out: latest.clock_out_time,
                location: Some(latest.latest_location()),
                notes: latest.latest_note().map(str::to_string),
            });
        }

        Ok(out)
    }

    /// Every open shift with its worker, newest clock-in first.
    pub fn active_staff(conn: &Connection) -> AppResult<Vec<ActiveStaff>> {
        let workers: HashMap<String, _> = queries::load_workers(conn)?
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect();

        let out = queries::load_open_shifts(conn)?
            .into_iter()
            .filter_map(|s| {
                let w = workers.get(&s.worker_id)?;
                Some(ActiveStaff {
                    worker_id: w.id.clone(),
                    display_name: w.display_name.clone(),
                    email: w.email.clone(),
                    clock_in_time: s.clock_in_time,
                    location: s.clock_in_location,
                    notes: s.clock_in_note,
                })
            })
            .collect();

        Ok(out)
    }

    /// Administrative wipe of shift history (and optionally workers).
    pub fn reset(conn: &mut Connection, include_workers: bool) -> AppResult<ResetSummary> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let shifts = tx.execute("DELETE FROM shifts", [])?;
        let workers = if include_workers {
            tx.execute("DELETE FROM workers", [])?
        } else {
            0
        };

        tx.commit()?;

        info!(shifts, workers, "ledger reset");
        audit_quietly(
            conn,
            "reset",
            "",
            &format!("removed {shifts} shift records and {workers} workers"),
        );

        Ok(ResetSummary { shifts, workers })
    }
}
