use crate::errors::AppResult;
use crate::export::model::ShiftExport;
use csv::Writer;
use std::path::Path;

/// Write shift records as CSV, header row first.
pub fn write_csv(path: &Path, rows: &[ShiftExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    // no rows → serialize never ran, emit the header on its own
    if rows.is_empty() {
        wtr.write_record([
            "id",
            "worker_id",
            "clock_in_time",
            "clock_in_latitude",
            "clock_in_longitude",
            "clock_in_note",
            "clock_out_time",
            "clock_out_latitude",
            "clock_out_longitude",
            "clock_out_note",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
