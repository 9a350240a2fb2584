use super::location::LatLng;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Circular geofence. Only the most recently updated row is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Perimeter {
    pub id: i64,
    pub center: LatLng,
    pub radius_km: f64,
    pub updated_at: DateTime<Utc>,
}

impl Perimeter {
    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}
