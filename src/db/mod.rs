use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::data::YearStore;
use thiserror::Error;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum StoreErr {
    #[error("Not a valid year: {0}")]
    InvalidYear(i32),
    #[error("No timesheet file is opened")]
    NoActiveFile,
    #[error("Cannot open file '{0}': {1}")]
    CannotOpen(PathBuf, std::io::Error),
    #[error("Invalid timesheet file {0}: {1}")]
    InvalidFile(PathBuf, serde_json::Error),
    #[error("Failed to write {0}")]
    FailedToWrite(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreErr>;

/// A year of sessions persisted as a single JSON document. The whole
/// file is replaced on every save.
pub struct YearFile;

impl YearFile {
    /// Creates a fresh 12-month store on disk and returns it.
    pub fn create(path: &Path, year: i32) -> StoreResult<YearStore> {
        if year <= 0 {
            return Err(StoreErr::InvalidYear(year));
        }
        let store = YearStore::new(year);
        Self::save(path, &store)?;
        log::info!("Created {} for year {}", path.display(), year);
        Ok(store)
    }

    pub fn load(path: &Path) -> StoreResult<YearStore> {
        let file = File::open(path).map_err(|e| StoreErr::CannotOpen(path.to_path_buf(), e))?;
        let reader = BufReader::new(file);
        let mut store: YearStore = serde_json::from_reader(reader)
            .map_err(|e| StoreErr::InvalidFile(path.to_path_buf(), e))?;
        store.fill_missing();
        log::info!(
            "Loaded {} ({} sessions)",
            path.display(),
            store.session_count()
        );
        Ok(store)
    }

    pub fn save(path: &Path, store: &YearStore) -> StoreResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)
            .map_err(|e| StoreErr::CannotOpen(path.to_path_buf(), e))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, store)
            .map_err(|_| StoreErr::FailedToWrite(path.to_path_buf()))?;

        log::info!("Stored {}", path.display());
        Ok(())
    }
}
