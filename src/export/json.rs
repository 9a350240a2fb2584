use crate::errors::AppResult;
use crate::export::model::ShiftExport;
use std::path::Path;

/// Write shift records as pretty-printed JSON.
pub fn write_json(path: &Path, rows: &[ShiftExport]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    Ok(())
}
