//! Current work perimeter: validated replacement and snapshot reads.

use crate::core::geo;
use crate::db::log::audit_quietly;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::location::LatLng;
use crate::models::perimeter::Perimeter;
use crate::models::worker::PerimeterAdmin;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

/// Outcome of an advisory containment check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub inside: bool,
    pub distance_m: Option<f64>,
    pub radius_m: Option<f64>,
}

pub struct PerimeterStore;

impl PerimeterStore {
    /// Latest perimeter, read in a single statement so center and radius
    /// always come from the same row.
    pub fn get(conn: &Connection) -> AppResult<Option<Perimeter>> {
        queries::load_current_perimeter(conn)
    }

    pub fn validate(center: LatLng, radius_km: f64) -> AppResult<()> {
        if !center.is_valid() {
            return Err(AppError::Validation(format!(
                "center coordinates must be finite degrees, got {}, {}",
                center.latitude, center.longitude
            )));
        }
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AppError::Validation(format!(
                "radius must be a positive number of kilometers, got {radius_km}"
            )));
        }
        Ok(())
    }

    /// Supersede the current perimeter with a new row. The history stays,
    /// but only the newest row is authoritative.
    pub fn set(
        conn: &mut Connection,
        admin: &PerimeterAdmin,
        center: LatLng,
        radius_km: f64,
        now: DateTime<Utc>,
    ) -> AppResult<Perimeter> {
        Self::validate(center, radius_km)?;

        let now = crate::utils::time::truncate(now);
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // updated_at must never go backwards, or "latest wins" would pick
        // the wrong row after a clock adjustment
        let updated_at = match queries::load_current_perimeter(&tx)? {
            Some(prev) if prev.updated_at > now => prev.updated_at,
            _ => now,
        };

        let id = queries::insert_perimeter(&tx, center, radius_km, &updated_at)?;
        tx.commit()?;

        info!(
            perimeter_id = id,
            manager = admin.manager_id(),
            lat = center.latitude,
            lng = center.longitude,
            radius_km,
            "perimeter updated"
        );
        audit_quietly(
            conn,
            "perimeter",
            admin.manager_id(),
            &format!("center {center}, radius {radius_km} km"),
        );

        Ok(Perimeter {
            id,
            center,
            radius_km,
            updated_at,
        })
    }

    /// Containment against an explicit perimeter snapshot. No perimeter
    /// means nothing is inside.
    pub fn contains(perimeter: Option<&Perimeter>, point: LatLng) -> Containment {
        match perimeter {
            Some(p) => Containment {
                inside: geo::is_within(point, p.center, p.radius_meters()),
                distance_m: Some(geo::distance_meters(point, p.center)),
                radius_m: Some(p.radius_meters()),
            },
            None => Containment {
                inside: false,
                distance_m: None,
                radius_m: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::models::worker::{Identity, Role};
    use chrono::{Duration, TimeZone};

    fn admin() -> PerimeterAdmin {
        Identity::new("mgr", Role::Manager, "mgr@example.com", "Manager")
            .unwrap()
            .perimeter_admin()
            .unwrap()
    }

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        init_db(&c).unwrap();
        c
    }

    #[test]
    fn unconfigured_perimeter_contains_nothing() {
        let c = conn();
        assert!(PerimeterStore::get(&c).unwrap().is_none());
        let res = PerimeterStore::contains(None, LatLng::new(0.0, 0.0));
        assert!(!res.inside);
        assert_eq!(res.distance_m, None);
    }

    #[test]
    fn invalid_radius_or_center_is_rejected() {
        let mut c = conn();
        let now = Utc::now();
        for r in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = PerimeterStore::set(&mut c, &admin(), LatLng::new(0.0, 0.0), r, now)
                .unwrap_err();
            assert_eq!(err.code(), "VALIDATION");
        }
        let err = PerimeterStore::set(&mut c, &admin(), LatLng::new(f64::NAN, 0.0), 1.0, now)
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
        assert!(PerimeterStore::get(&c).unwrap().is_none());
    }

    #[test]
    fn latest_perimeter_wins() {
        let mut c = conn();
        let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

        PerimeterStore::set(&mut c, &admin(), LatLng::new(0.0, 0.0), 1.0, t0).unwrap();
        let second = PerimeterStore::set(
            &mut c,
            &admin(),
            LatLng::new(45.0, 9.0),
            0.5,
            t0 + Duration::minutes(5),
        )
        .unwrap();

        let current = PerimeterStore::get(&c).unwrap().unwrap();
        assert_eq!(current, second);
        assert_eq!(current.radius_meters(), 500.0);
    }

    #[test]
    fn backwards_clock_still_supersedes() {
        let mut c = conn();
        let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

        PerimeterStore::set(&mut c, &admin(), LatLng::new(0.0, 0.0), 1.0, t0).unwrap();
        PerimeterStore::set(
            &mut c,
            &admin(),
            LatLng::new(1.0, 1.0),
            2.0,
            t0 - Duration::hours(1),
        )
        .unwrap();

        let current = PerimeterStore::get(&c).unwrap().unwrap();
        assert_eq!(current.center, LatLng::new(1.0, 1.0));
        assert_eq!(current.radius_km, 2.0);
    }

    #[test]
    fn contains_reports_distance() {
        let p = Perimeter {
            id: 1,
            center: LatLng::new(0.0, 0.0),
            radius_km: 1.0,
            updated_at: Utc::now(),
        };
        let near = PerimeterStore::contains(Some(&p), LatLng::new(0.0, 0.005));
        assert!(near.inside);
        let far = PerimeterStore::contains(Some(&p), LatLng::new(0.0, 0.02));
        assert!(!far.inside);
        assert!(far.distance_m.unwrap() > 2000.0);
        assert_eq!(far.radius_m, Some(1000.0));
    }
}
