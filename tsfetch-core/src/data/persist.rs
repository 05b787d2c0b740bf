//! CSV persistence for the canonical table.
//!
//! Writes are atomic: the table goes to `<path>.tmp` first and is renamed
//! into place, so a failed run never leaves a half-written output file.

use super::schema::{CanonicalTable, CANONICAL_COLUMNS};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The only fatal error of a run.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: csv::Error },

    #[error("failed to move {} into place: {source}", path.display())]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `table` to `path` as CSV with the canonical header, replacing any
/// existing file.
pub fn write_csv(table: &CanonicalTable, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_path = tmp_path_for(path);
    if let Err(e) = write_records(table, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        PersistError::Rename {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn write_records(table: &CanonicalTable, tmp_path: &Path) -> Result<(), PersistError> {
    let wrap = |source: csv::Error| PersistError::Write {
        path: tmp_path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(tmp_path).map_err(wrap)?;
    writer.write_record(CANONICAL_COLUMNS).map_err(wrap)?;
    for record in table.records() {
        writer.write_record(record.to_fields()).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
