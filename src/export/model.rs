// src/export/model.rs

use crate::models::shift::ShiftRecord;
use crate::utils::time;
use serde::Serialize;

/// Flat shape of a shift record for CSV / JSON export.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShiftExport {
    pub id: i64,
    pub worker_id: String,
    pub clock_in_time: String,
    pub clock_in_latitude: f64,
    pub clock_in_longitude: f64,
    pub clock_in_note: String,
    pub clock_out_time: String,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
    pub clock_out_note: String,
}

impl From<&ShiftRecord> for ShiftExport {
    fn from(r: &ShiftRecord) -> Self {
        Self {
            id: r.id,
            worker_id: r.worker_id.clone(),
            clock_in_time: time::to_db(&r.clock_in_time),
            clock_in_latitude: r.clock_in_location.latitude,
            clock_in_longitude: r.clock_in_location.longitude,
            clock_in_note: r.clock_in_note.clone().unwrap_or_default(),
            clock_out_time: r
                .clock_out_time
                .as_ref()
                .map(time::to_db)
                .unwrap_or_default(),
            clock_out_latitude: r.clock_out_location.map(|l| l.latitude),
            clock_out_longitude: r.clock_out_location.map(|l| l.longitude),
            clock_out_note: r.clock_out_note.clone().unwrap_or_default(),
        }
    }
}
