//! Read-side attendance statistics.
//!
//! Every function here is pure: the same records, workers and `now` always
//! give the same answer. Calendar questions ("today", "which weekday") are
//! answered in the time zone carried by `now`.

use crate::models::shift::ShiftRecord;
use crate::models::worker::{Role, Worker};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Weekdays reported by [`daily_stats`]. Sunday is left out on purpose.
pub const REPORTED_WEEKDAYS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub day: String,
    pub avg_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffHours {
    pub worker_id: String,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCounts {
    pub total_staff_count: usize,
    pub active_staff_count: usize,
    pub clock_ins_today: usize,
    pub average_hours_today: f64,
}

/// Weekly total with the display name resolved for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffHoursRow {
    pub worker_id: String,
    pub staff_name: String,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_staff_count: usize,
    pub active_staff_count: usize,
    pub average_hours_today: f64,
    pub clock_ins_today: usize,
    pub daily_stats: Vec<DailyStat>,
    pub weekly_hours_by_staff: Vec<StaffHoursRow>,
}

fn weekday_name(d: Weekday) -> &'static str {
    match d {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Hours worked; an open shift runs provisionally until `now`.
/// A shift starting after `now` counts as zero.
pub fn duration_hours(record: &ShiftRecord, now: DateTime<Utc>) -> f64 {
    let end = record.clock_out_time.unwrap_or(now);
    let ms = (end - record.clock_in_time).num_milliseconds().max(0);
    ms as f64 / 3_600_000.0
}

/// Mean duration, open shifts included. Zero for no records.
pub fn average_hours(records: &[ShiftRecord], now: DateTime<Utc>) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| duration_hours(r, now)).sum();
    total / records.len() as f64
}

/// Average duration per clock-in weekday, Monday to Saturday.
/// A weekday without records reports zero.
pub fn daily_stats<Tz: TimeZone>(records: &[ShiftRecord], now: &DateTime<Tz>) -> Vec<DailyStat> {
    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);

    let mut acc: HashMap<Weekday, (f64, usize)> = HashMap::new();
    for r in records {
        let day = r.clock_in_time.with_timezone(&tz).weekday();
        let slot = acc.entry(day).or_insert((0.0, 0));
        slot.0 += duration_hours(r, now_utc);
        slot.1 += 1;
    }

    REPORTED_WEEKDAYS
        .iter()
        .map(|d| {
            let avg_hours = match acc.get(d) {
                Some((total, n)) if *n > 0 => total / *n as f64,
                _ => 0.0,
            };
            DailyStat {
                day: weekday_name(*d).to_string(),
                avg_hours,
            }
        })
        .collect()
}

fn window_start<Tz: TimeZone>(now: &DateTime<Tz>, window_days: i64) -> DateTime<Utc> {
    now.with_timezone(&Utc) - Duration::days(window_days)
}

/// Records inside the trailing window that have a clock-out.
pub fn completed_in_window<Tz: TimeZone>(
    records: &[ShiftRecord],
    now: &DateTime<Tz>,
    window_days: i64,
) -> Vec<ShiftRecord> {
    let start = window_start(now, window_days);
    records
        .iter()
        .filter(|r| r.clock_out_time.is_some() && r.clock_in_time >= start)
        .cloned()
        .collect()
}

/// Completed hours per worker over the trailing `window_days`.
///
/// Open shifts are excluded here, unlike [`average_hours`].
/// Sorted by total hours, largest first.
pub fn weekly_hours_by_staff<Tz: TimeZone>(
    records: &[ShiftRecord],
    now: &DateTime<Tz>,
    window_days: i64,
) -> Vec<StaffHours> {
    let now_utc = now.with_timezone(&Utc);
    let start = window_start(now, window_days);

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records
        .iter()
        .filter(|r| r.clock_out_time.is_some() && r.clock_in_time >= start)
    {
        *totals.entry(r.worker_id.as_str()).or_insert(0.0) += duration_hours(r, now_utc);
    }

    let mut out: Vec<StaffHours> = totals
        .into_iter()
        .map(|(worker_id, total_hours)| StaffHours {
            worker_id: worker_id.to_string(),
            total_hours,
        })
        .collect();

    out.sort_by(|a, b| {
        b.total_hours
            .total_cmp(&a.total_hours)
            .then_with(|| a.worker_id.cmp(&b.worker_id))
    });
    out
}

fn is_same_day<Tz: TimeZone>(ts: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    ts.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Headline counters for the supervisor dashboard.
pub fn dashboard_counts<Tz: TimeZone>(
    records: &[ShiftRecord],
    workers: &[Worker],
    now: &DateTime<Tz>,
) -> DashboardCounts {
    let now_utc = now.with_timezone(&Utc);

    let total_staff_count = workers.iter().filter(|w| w.role == Role::CareWorker).count();

    let active_staff_count = records
        .iter()
        .filter(|r| r.is_open())
        .map(|r| r.worker_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let today: Vec<ShiftRecord> = records
        .iter()
        .filter(|r| is_same_day(&r.clock_in_time, now))
        .cloned()
        .collect();

    let clock_ins_today = today
        .iter()
        .map(|r| r.worker_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardCounts {
        total_staff_count,
        active_staff_count,
        clock_ins_today,
        average_hours_today: average_hours(&today, now_utc),
    }
}

/// Full dashboard as presented to supervisors: counters, per-weekday
/// averages and weekly totals, rounded to two decimals.
///
/// Per-weekday averages are computed over the same completed, in-window
/// records as the weekly totals.
pub fn dashboard_stats<Tz: TimeZone>(
    records: &[ShiftRecord],
    workers: &[Worker],
    now: &DateTime<Tz>,
    window_days: i64,
) -> DashboardStats {
    let counts = dashboard_counts(records, workers, now);
    let window = completed_in_window(records, now, window_days);

    let names: HashMap<&str, &str> = workers
        .iter()
        .map(|w| (w.id.as_str(), w.display_name.as_str()))
        .collect();

    let daily = daily_stats(&window, now)
        .into_iter()
        .map(|d| DailyStat {
            avg_hours: round2(d.avg_hours),
            ..d
        })
        .collect();

    let weekly = weekly_hours_by_staff(records, now, window_days)
        .into_iter()
        .map(|s| StaffHoursRow {
            staff_name: names
                .get(s.worker_id.as_str())
                .map(|n| n.to_string())
                .unwrap_or_else(|| s.worker_id.clone()),
            total_hours: round2(s.total_hours),
            worker_id: s.worker_id,
        })
        .collect();

    DashboardStats {
        total_staff_count: counts.total_staff_count,
        active_staff_count: counts.active_staff_count,
        average_hours_today: round2(counts.average_hours_today),
        clock_ins_today: counts.clock_ins_today,
        daily_stats: daily,
        weekly_hours_by_staff: weekly,
    }
}
