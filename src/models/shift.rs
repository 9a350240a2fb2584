use super::location::LatLng;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One clock-in/clock-out cycle.
///
/// `clock_out_time`, `clock_out_location` and `clock_out_note` are set
/// together by the matching clock-out and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftRecord {
    pub id: i64,
    pub worker_id: String,
    pub clock_in_time: DateTime<Utc>,
    pub clock_in_location: LatLng,
    pub clock_in_note: Option<String>,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub clock_out_location: Option<LatLng>,
    pub clock_out_note: Option<String>,
}

impl ShiftRecord {
    pub fn is_open(&self) -> bool {
        self.clock_out_time.is_none()
    }

    /// Location and note of whichever side happened last.
    pub fn latest_location(&self) -> LatLng {
        self.clock_out_location.unwrap_or(self.clock_in_location)
    }

    pub fn latest_note(&self) -> Option<&str> {
        if self.is_open() {
            self.clock_in_note.as_deref()
        } else {
            self.clock_out_note.as_deref()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShiftStatus {
    Active,
    #[serde(rename = "Not Active")]
    NotActive,
}

impl ShiftStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ShiftStatus::Active => "Active",
            ShiftStatus::NotActive => "Not Active",
        }
    }
}

/// Per-worker projection of the latest shift, for supervisor overviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffOverview {
    pub worker_id: String,
    pub display_name: String,
    pub status: ShiftStatus,
    pub last_clock_in: Option<DateTime<Utc>>,
    pub last_clock_out: Option<DateTime<Utc>>,
    pub location: Option<LatLng>,
    pub notes: Option<String>,
}

/// An open shift joined with its worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveStaff {
    pub worker_id: String,
    pub display_name: String,
    pub email: String,
    pub clock_in_time: DateTime<Utc>,
    pub location: LatLng,
    pub notes: Option<String>,
}
