//! Attendance service: one connection, one clock, one configuration.
//!
//! The ledger and aggregator take `now` and the perimeter snapshot as
//! arguments; this is the only place that reads the clock and fetches the
//! snapshot before handing both over.

use crate::config::Config;
use crate::core::aggregator::{self, DashboardStats};
use crate::core::clock::{Clock, SystemClock};
use crate::core::ledger::{ResetSummary, ShiftLedger};
use crate::core::perimeter::{Containment, PerimeterStore};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::location::LatLng;
use crate::models::perimeter::Perimeter;
use crate::models::shift::{ActiveStaff, ShiftRecord, StaffOverview};
use crate::models::worker::Identity;
use chrono::{DateTime, Duration, Local, Utc};
use std::sync::Arc;

pub struct AttendanceService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    window_days: i64,
}

impl AttendanceService {
    /// Open the configured database, applying pending migrations.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        Self::open_with_clock(cfg, Arc::new(SystemClock))
    }

    pub fn open_with_clock(cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let pool = DbPool::open(&cfg.database, cfg.busy_timeout_ms)?;
        init_db(&pool.conn)?;
        Ok(Self::new(pool, clock, cfg.weekly_window_days))
    }

    pub fn new(pool: DbPool, clock: Arc<dyn Clock>, window_days: i64) -> Self {
        Self {
            pool,
            clock,
            window_days,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock_in(
        &mut self,
        who: &Identity,
        location: LatLng,
        note: Option<&str>,
    ) -> AppResult<ShiftRecord> {
        let now = self.clock.now();
        let perimeter = PerimeterStore::get(&self.pool.conn)?;
        ShiftLedger::clock_in(
            &mut self.pool.conn,
            who,
            perimeter.as_ref(),
            location,
            note,
            now,
        )
    }

    pub fn clock_out(
        &mut self,
        who: &Identity,
        location: LatLng,
        note: Option<&str>,
    ) -> AppResult<ShiftRecord> {
        let now = self.clock.now();
        ShiftLedger::clock_out(&mut self.pool.conn, &who.worker_id, location, note, now)
    }

    pub fn set_perimeter(
        &mut self,
        who: &Identity,
        center: LatLng,
        radius_km: f64,
    ) -> AppResult<Perimeter> {
        let admin = who.perimeter_admin()?;
        let now = self.clock.now();
        PerimeterStore::set(&mut self.pool.conn, &admin, center, radius_km, now)
    }

    pub fn get_perimeter(&self) -> AppResult<Option<Perimeter>> {
        PerimeterStore::get(&self.pool.conn)
    }

    /// Advisory answer only; clock-in re-checks on its own.
    pub fn check_location(&self, point: LatLng) -> AppResult<Containment> {
        let perimeter = PerimeterStore::get(&self.pool.conn)?;
        Ok(PerimeterStore::contains(perimeter.as_ref(), point))
    }

    pub fn open_shift(&self, worker_id: &str) -> AppResult<Option<ShiftRecord>> {
        ShiftLedger::get_open_shift(&self.pool.conn, worker_id)
    }

    /// Care workers see their own records; managers may list anyone's.
    pub fn list_shifts(
        &self,
        who: &Identity,
        worker_id: Option<&str>,
        from: Option<&DateTime<Utc>>,
        to: Option<&DateTime<Utc>>,
    ) -> AppResult<Vec<ShiftRecord>> {
        let target = if who.is_manager() {
            worker_id
        } else {
            match worker_id {
                Some(id) if id != who.worker_id => {
                    return Err(AppError::Forbidden(
                        "only managers can list other workers' shifts".into(),
                    ));
                }
                _ => Some(who.worker_id.as_str()),
            }
        };
        ShiftLedger::list_shifts(&self.pool.conn, target, from, to)
    }

    /// Dashboard figures in the local time zone.
    pub fn dashboard_stats(&self, who: &Identity) -> AppResult<DashboardStats> {
        who.require_manager()?;
        let now = self.clock.now().with_timezone(&Local);
        self.dashboard_stats_at(&now)
    }

    /// Dashboard figures against an explicit "now"; its time zone decides
    /// what "today" and weekday mean.
    pub fn dashboard_stats_at<Tz: chrono::TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> AppResult<DashboardStats> {
        let since = now.with_timezone(&Utc) - Duration::days(self.window_days.max(1));
        let records = queries::load_dashboard_snapshot(&self.pool.conn, &since)?;
        let workers = queries::load_workers(&self.pool.conn)?;
        Ok(aggregator::dashboard_stats(
            &records,
            &workers,
            now,
            self.window_days,
        ))
    }

    pub fn staff_overview(&self, who: &Identity) -> AppResult<Vec<StaffOverview>> {
        who.require_manager()?;
        ShiftLedger::staff_overview(&self.pool.conn)
    }

    pub fn active_staff(&self, who: &Identity) -> AppResult<Vec<ActiveStaff>> {
        who.require_manager()?;
        ShiftLedger::active_staff(&self.pool.conn)
    }

    pub fn reset(&mut self, who: &Identity, include_workers: bool) -> AppResult<ResetSummary> {
        who.require_manager()?;
        ShiftLedger::reset(&mut self.pool.conn, include_workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::models::worker::Role;
    use chrono::TimeZone;

    fn service(at: DateTime<Utc>) -> (AttendanceService, Arc<FixedClock>) {
        let pool = DbPool::open(":memory:", 100).unwrap();
        init_db(&pool.conn).unwrap();
        let clock = Arc::new(FixedClock::new(at));
        (AttendanceService::new(pool, clock.clone(), 7), clock)
    }

    fn manager() -> Identity {
        Identity::new("mgr", Role::Manager, "mgr@example.com", "Mia").unwrap()
    }

    fn carer(id: &str) -> Identity {
        Identity::new(id, Role::CareWorker, &format!("{id}@example.com"), id).unwrap()
    }

    #[test]
    fn care_worker_cannot_set_perimeter() {
        let (mut svc, _) = service(Utc::now());
        let err = svc
            .set_perimeter(&carer("ann"), LatLng::new(0.0, 0.0), 1.0)
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert!(svc.get_perimeter().unwrap().is_none());
    }

    #[test]
    fn clock_in_uses_the_service_clock() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let (mut svc, clock) = service(t0);
        svc.set_perimeter(&manager(), LatLng::new(0.0, 0.0), 1.0)
            .unwrap();

        let rec = svc
            .clock_in(&carer("ann"), LatLng::new(0.0, 0.0), Some("morning"))
            .unwrap();
        assert_eq!(rec.clock_in_time, t0);

        clock.set(t0 + Duration::hours(8));
        let closed = svc
            .clock_out(&carer("ann"), LatLng::new(0.0, 0.02), None)
            .unwrap();
        assert_eq!(closed.clock_out_time, Some(t0 + Duration::hours(8)));
        assert_eq!(aggregator::duration_hours(&closed, clock.now()), 8.0);
    }

    #[test]
    fn care_worker_only_lists_own_shifts() {
        let (mut svc, _) = service(Utc::now());
        svc.set_perimeter(&manager(), LatLng::new(0.0, 0.0), 1.0)
            .unwrap();
        svc.clock_in(&carer("ann"), LatLng::new(0.0, 0.0), None)
            .unwrap();
        svc.clock_in(&carer("bob"), LatLng::new(0.0, 0.0), None)
            .unwrap();

        let own = svc.list_shifts(&carer("ann"), None, None, None).unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].worker_id, "ann");

        let err = svc
            .list_shifts(&carer("ann"), Some("bob"), None, None)
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        let all = svc.list_shifts(&manager(), None, None, None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn dashboard_requires_a_manager() {
        let (svc, _) = service(Utc::now());
        assert_eq!(
            svc.dashboard_stats(&carer("ann")).unwrap_err().code(),
            "FORBIDDEN"
        );
        let stats = svc.dashboard_stats(&manager()).unwrap();
        assert_eq!(stats.total_staff_count, 0);
        assert!(stats.weekly_hours_by_staff.is_empty());
    }

    #[test]
    fn dashboard_counts_active_and_weekly_hours() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 4, 8, 0, 0).unwrap();
        let (mut svc, clock) = service(t0);
        svc.set_perimeter(&manager(), LatLng::new(0.0, 0.0), 1.0)
            .unwrap();

        svc.clock_in(&carer("ann"), LatLng::new(0.0, 0.0), None)
            .unwrap();
        svc.clock_in(&carer("bob"), LatLng::new(0.0, 0.0), None)
            .unwrap();
        clock.set(t0 + Duration::hours(4));
        svc.clock_out(&carer("bob"), LatLng::new(0.0, 0.0), None)
            .unwrap();

        let stats = svc.dashboard_stats_at(&(t0 + Duration::hours(5))).unwrap();
        assert_eq!(stats.total_staff_count, 2);
        assert_eq!(stats.active_staff_count, 1);
        assert_eq!(stats.clock_ins_today, 2);
        // ann 5h running + bob 4h closed
        assert_eq!(stats.average_hours_today, 4.5);
        assert_eq!(stats.weekly_hours_by_staff.len(), 1);
        assert_eq!(stats.weekly_hours_by_staff[0].worker_id, "bob");
        assert_eq!(stats.weekly_hours_by_staff[0].total_hours, 4.0);
    }
}
