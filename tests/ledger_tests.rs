use careclock::core::aggregator::duration_hours;
use careclock::core::clock::{Clock, FixedClock};
use careclock::core::ledger::ShiftLedger;
use careclock::core::perimeter::PerimeterStore;
use careclock::core::service::AttendanceService;
use careclock::db::initialize::init_db;
use careclock::db::pool::DbPool;
use careclock::db::queries;
use careclock::models::location::LatLng;
use careclock::models::perimeter::Perimeter;
use careclock::models::shift::ShiftStatus;
use careclock::models::worker::{Identity, Role};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration as StdDuration, Instant};
use tempfile::TempDir;

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, h, m, 0).unwrap()
}

fn carer(id: &str) -> Identity {
    Identity::new(id, Role::CareWorker, &format!("{id}@example.com"), "").unwrap()
}

fn manager() -> Identity {
    Identity::new("mgr", Role::Manager, "mgr@example.com", "Mia").unwrap()
}

/// Fresh file-backed database with the schema applied.
fn temp_db() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite").to_string_lossy().to_string();
    let pool = DbPool::open(&path, 2_000).unwrap();
    init_db(&pool.conn).unwrap();
    (dir, path)
}

fn unit_perimeter(pool: &mut DbPool) -> Perimeter {
    let admin = manager().perimeter_admin().unwrap();
    PerimeterStore::set(&mut pool.conn, &admin, LatLng::new(0.0, 0.0), 1.0, t(8, 0)).unwrap()
}

#[test]
fn full_shift_scenario() {
    let (_dir, path) = temp_db();
    let clock = Arc::new(FixedClock::new(t(8, 0)));
    let mut svc = AttendanceService::new(DbPool::open(&path, 2_000).unwrap(), clock.clone(), 7);

    svc.set_perimeter(&manager(), LatLng::new(0.0, 0.0), 1.0)
        .unwrap();

    clock.set(t(9, 0));
    let ann = carer("ann");
    svc.clock_in(&ann, LatLng::new(0.0, 0.0), Some("  ward A  "))
        .unwrap();

    let overview = svc.staff_overview(&manager()).unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].status, ShiftStatus::Active);
    assert_eq!(overview[0].notes.as_deref(), Some("ward A"));

    let err = svc
        .clock_in(&ann, LatLng::new(0.0, 0.0), None)
        .unwrap_err();
    assert_eq!(err.code(), "ALREADY_CLOCKED_IN");

    clock.set(t(17, 0));
    let closed = svc
        .clock_out(&ann, LatLng::new(0.0, 0.02), Some("done"))
        .unwrap();
    assert_eq!(duration_hours(&closed, clock.now()), 8.0);
    assert_eq!(closed.clock_out_location, Some(LatLng::new(0.0, 0.02)));

    let overview = svc.staff_overview(&manager()).unwrap();
    assert_eq!(overview[0].status, ShiftStatus::NotActive);
    assert_eq!(overview[0].location, Some(LatLng::new(0.0, 0.02)));
    assert_eq!(overview[0].notes.as_deref(), Some("done"));
}

#[test]
fn clock_in_is_rejected_outside_and_accepted_at_center() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    // 0.018° of longitude at the equator is ~2 km, twice the radius
    let err = ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.018),
        None,
        t(9, 0),
    )
    .unwrap_err();
    assert_eq!(err.code(), "NOT_IN_PERIMETER");
    assert!(ShiftLedger::get_open_shift(&pool.conn, "ann").unwrap().is_none());

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();
}

#[test]
fn clock_in_without_perimeter_fails_closed() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();

    let err = ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        None,
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap_err();
    assert_eq!(err.code(), "NOT_IN_PERIMETER");
}

#[test]
fn out_of_range_clock_in_location_is_rejected() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let admin = manager().perimeter_admin().unwrap();
    let polar =
        PerimeterStore::set(&mut pool.conn, &admin, LatLng::new(89.995, 0.0), 5.0, t(8, 0))
            .unwrap();

    // haversine happily measures past the pole, so only the range check stops this
    let err = ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&polar),
        LatLng::new(90.02, 0.0),
        None,
        t(9, 0),
    )
    .unwrap_err();
    assert_eq!(err.code(), "NOT_IN_PERIMETER");
    assert!(ShiftLedger::get_open_shift(&pool.conn, "ann").unwrap().is_none());

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&polar),
        LatLng::new(89.99, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();
}

#[test]
fn lock_contention_surfaces_as_retryable_timeout() {
    let (_dir, path) = temp_db();
    let mut holder = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut holder);

    holder.conn.execute_batch("BEGIN IMMEDIATE").unwrap();

    let mut waiter = DbPool::open(&path, 100).unwrap();
    let started = Instant::now();
    let err = ShiftLedger::clock_in(
        &mut waiter.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap_err();

    assert_eq!(err.code(), "STORAGE_TIMEOUT");
    assert!(err.is_retryable());
    assert!(started.elapsed() < StdDuration::from_secs(5));

    holder.conn.execute_batch("ROLLBACK").unwrap();

    assert!(ShiftLedger::get_open_shift(&waiter.conn, "ann").unwrap().is_none());
    assert!(queries::load_worker(&waiter.conn, "ann").unwrap().is_none());

    // once the lock is gone the same call goes through
    ShiftLedger::clock_in(
        &mut waiter.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();
}

#[test]
fn clock_out_without_open_shift() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();

    let err = ShiftLedger::clock_out(&mut pool.conn, "ghost", LatLng::new(0.0, 0.0), None, t(9, 0))
        .unwrap_err();
    assert_eq!(err.code(), "NO_OPEN_SHIFT");
}

#[test]
fn clock_out_never_precedes_clock_in() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();

    let closed =
        ShiftLedger::clock_out(&mut pool.conn, "ann", LatLng::new(0.0, 0.0), None, t(8, 0))
            .unwrap();
    assert_eq!(closed.clock_out_time, Some(t(9, 0)));
    assert_eq!(duration_hours(&closed, t(10, 0)), 0.0);
}

#[test]
fn workers_are_created_lazily_and_keep_their_role() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    assert!(queries::load_worker(&pool.conn, "ann").unwrap().is_none());

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();
    ShiftLedger::clock_out(&mut pool.conn, "ann", LatLng::new(0.0, 0.0), None, t(10, 0)).unwrap();

    let w = queries::load_worker(&pool.conn, "ann").unwrap().unwrap();
    assert_eq!(w.role, Role::CareWorker);
    assert_eq!(w.display_name, "ann");

    // a later identity claiming another role does not rewrite the stored one
    let promoted = Identity::new("ann", Role::Manager, "ann@example.com", "Ann B").unwrap();
    ShiftLedger::clock_in(
        &mut pool.conn,
        &promoted,
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(11, 0),
    )
    .unwrap();

    let w = queries::load_worker(&pool.conn, "ann").unwrap().unwrap();
    assert_eq!(w.role, Role::CareWorker);
    assert_eq!(w.display_name, "ann");
}

#[test]
fn list_shifts_filters_by_worker_and_range() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    for (who, h) in [("ann", 9), ("bob", 10), ("ann", 13)] {
        ShiftLedger::clock_in(
            &mut pool.conn,
            &carer(who),
            Some(&p),
            LatLng::new(0.0, 0.0),
            None,
            t(h, 0),
        )
        .unwrap();
        ShiftLedger::clock_out(&mut pool.conn, who, LatLng::new(0.0, 0.0), None, t(h + 1, 0))
            .unwrap();
    }

    let ann = ShiftLedger::list_shifts(&pool.conn, Some("ann"), None, None).unwrap();
    assert_eq!(ann.len(), 2);
    assert_eq!(ann[0].clock_in_time, t(13, 0));

    let morning =
        ShiftLedger::list_shifts(&pool.conn, None, Some(&t(9, 30)), Some(&t(12, 0))).unwrap();
    assert_eq!(morning.len(), 1);
    assert_eq!(morning[0].worker_id, "bob");
}

#[test]
fn list_shifts_upper_bound_is_inclusive() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(13, 0),
    )
    .unwrap();

    let exact =
        ShiftLedger::list_shifts(&pool.conn, None, Some(&t(13, 0)), Some(&t(13, 0))).unwrap();
    assert_eq!(exact.len(), 1);

    let before =
        ShiftLedger::list_shifts(&pool.conn, None, None, Some(&t(12, 59))).unwrap();
    assert!(before.is_empty());
}

#[test]
fn concurrent_clock_ins_open_exactly_one_shift() {
    let (_dir, path) = temp_db();
    {
        let mut pool = DbPool::open(&path, 2_000).unwrap();
        unit_perimeter(&mut pool);
    }

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut pool = DbPool::open(&path, 5_000).unwrap();
                let p = PerimeterStore::get(&pool.conn).unwrap();
                barrier.wait();
                ShiftLedger::clock_in(
                    &mut pool.conn,
                    &carer("ann"),
                    p.as_ref(),
                    LatLng::new(0.0, 0.0),
                    None,
                    Utc::now(),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    for r in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(r.code(), "ALREADY_CLOCKED_IN");
    }

    let pool = DbPool::open(&path, 2_000).unwrap();
    assert_eq!(queries::load_open_shifts(&pool.conn).unwrap().len(), 1);
}

#[test]
fn reset_removes_shifts_but_keeps_perimeter() {
    let (_dir, path) = temp_db();
    let mut pool = DbPool::open(&path, 2_000).unwrap();
    let p = unit_perimeter(&mut pool);

    ShiftLedger::clock_in(
        &mut pool.conn,
        &carer("ann"),
        Some(&p),
        LatLng::new(0.0, 0.0),
        None,
        t(9, 0),
    )
    .unwrap();

    let summary = ShiftLedger::reset(&mut pool.conn, true).unwrap();
    assert_eq!(summary.shifts, 1);
    assert_eq!(summary.workers, 1);
    assert!(ShiftLedger::get_open_shift(&pool.conn, "ann").unwrap().is_none());
    assert!(PerimeterStore::get(&pool.conn).unwrap().is_some());
}

#[derive(Debug, Clone, Copy)]
enum Op {
    In(usize),
    Out(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![(0usize..3).prop_map(Op::In), (0usize..3).prop_map(Op::Out)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any interleaving of clock-ins and clock-outs leaves at most one open
    /// shift per worker, and each call succeeds exactly when the worker's
    /// state allows it.
    #[test]
    fn prop_at_most_one_open_shift(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut pool = DbPool::open(":memory:", 100).unwrap();
        init_db(&pool.conn).unwrap();
        let p = unit_perimeter(&mut pool);

        let names = ["ann", "bob", "cid"];
        let mut open = [false; 3];
        let mut now = t(6, 0);

        for op in ops {
            now += Duration::minutes(7);
            match op {
                Op::In(i) => {
                    let res = ShiftLedger::clock_in(
                        &mut pool.conn,
                        &carer(names[i]),
                        Some(&p),
                        LatLng::new(0.0, 0.0),
                        None,
                        now,
                    );
                    prop_assert_eq!(res.is_ok(), !open[i]);
                    if let Err(e) = res {
                        prop_assert_eq!(e.code(), "ALREADY_CLOCKED_IN");
                    }
                    open[i] = true;
                }
                Op::Out(i) => {
                    let res = ShiftLedger::clock_out(
                        &mut pool.conn,
                        names[i],
                        LatLng::new(0.0, 0.0),
                        None,
                        now,
                    );
                    prop_assert_eq!(res.is_ok(), open[i]);
                    if let Err(e) = res {
                        prop_assert_eq!(e.code(), "NO_OPEN_SHIFT");
                    }
                    open[i] = false;
                }
            }

            let open_rows = queries::load_open_shifts(&pool.conn).unwrap();
            for name in names {
                let n = open_rows.iter().filter(|s| s.worker_id == name).count();
                prop_assert!(n <= 1);
            }
            prop_assert_eq!(open_rows.len(), open.iter().filter(|o| **o).count());
        }
    }
}
