//! Point-in-time copies of the attendance database.
//!
//! The copy is taken with `VACUUM INTO`, so committed rows still sitting in
//! the WAL are included and no file-level copy of a live database happens.

use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::FileOptions;

/// What ended up in a backup.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupSummary {
    pub path: PathBuf,
    pub shifts: i64,
    pub perimeters: i64,
    pub compressed: bool,
}

pub struct BackupLogic;

impl BackupLogic {
    /// Snapshot the ledger into `dest`, optionally zipped next to it.
    ///
    /// Returns `None` when the user declines to overwrite an existing file.
    pub fn backup(
        pool: &DbPool,
        dest: &Path,
        compress: bool,
        force: bool,
    ) -> AppResult<Option<BackupSummary>> {
        let final_path = if compress {
            dest.with_extension("zip")
        } else {
            dest.to_path_buf()
        };

        if final_path.exists() && !force && !confirm_overwrite(&final_path)? {
            println!("❌ Backup cancelled by user.");
            return Ok(None);
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // VACUUM INTO refuses to overwrite
        if dest.exists() {
            fs::remove_file(dest)?;
        }

        let target = dest
            .to_str()
            .ok_or_else(|| AppError::Other(format!("non UTF-8 path: {}", dest.display())))?;
        pool.conn
            .execute_batch(&format!("VACUUM INTO '{}'", target.replace('\'', "''")))?;

        let (shifts, perimeters) = verify_copy(dest)?;

        if compress {
            compress_backup(dest, &final_path)?;
            if let Err(e) = fs::remove_file(dest) {
                warn!(error = %e, "failed to remove uncompressed backup");
            }
        }

        info!(path = %final_path.display(), shifts, perimeters, "backup written");
        audit_quietly(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            &format!("{shifts} shift records, {perimeters} perimeter revisions"),
        );

        Ok(Some(BackupSummary {
            path: final_path,
            shifts,
            perimeters,
            compressed: compress,
        }))
    }
}

fn confirm_overwrite(path: &Path) -> AppResult<bool> {
    println!(
        "⚠️  The file '{}' already exists.\nDo you want to overwrite it? [y/N]: ",
        path.display()
    );
    print!("> ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Open the copy and count what it holds; a copy that cannot be
/// read back is an error, not a backup.
fn verify_copy(path: &Path) -> AppResult<(i64, i64)> {
    let conn = Connection::open(path)?;

    let integrity: String = conn.query_row("PRAGMA quick_check", [], |r| r.get(0))?;
    if integrity != "ok" {
        return Err(AppError::Other(format!(
            "backup {} failed integrity check: {integrity}",
            path.display()
        )));
    }

    let shifts = conn.query_row("SELECT COUNT(*) FROM shifts", [], |r| r.get(0))?;
    let perimeters = conn.query_row("SELECT COUNT(*) FROM perimeters", [], |r| r.get(0))?;
    Ok((shifts, perimeters))
}

fn compress_backup(src: &Path, zip_path: &Path) -> AppResult<()> {
    let entry_name = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Other(format!("invalid backup path: {}", src.display())))?;

    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry_name, options)
        .map_err(io::Error::other)?;

    let mut f = fs::File::open(src)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    Ok(())
}
