// src/export/logic.rs

use crate::core::ledger::ShiftLedger;
use crate::errors::AppResult;
use crate::export::csv::write_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::write_json;
use crate::export::model::ShiftExport;
use crate::export::{ExportFormat, notify_export_success};
use crate::ui::messages::warning;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

/// Optional filters applied to exported shift records.
#[derive(Debug, Default, Clone)]
pub struct ExportFilter {
    pub worker_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export shift records, newest clock-in first. Returns the row count.
    pub fn export(
        conn: &Connection,
        format: ExportFormat,
        path: &Path,
        filter: &ExportFilter,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let records = ShiftLedger::list_shifts(
            conn,
            filter.worker_id.as_deref(),
            filter.from.as_ref(),
            filter.to.as_ref(),
        )?;

        if records.is_empty() {
            warning("No shift records match the export filter.");
        }

        let rows: Vec<ShiftExport> = records.iter().map(ShiftExport::from).collect();

        match format {
            ExportFormat::Csv => write_csv(path, &rows)?,
            ExportFormat::Json => write_json(path, &rows)?,
        }

        notify_export_success(&format.as_str().to_uppercase(), rows.len(), path);
        Ok(rows.len())
    }
}
