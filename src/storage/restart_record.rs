//! Last-restart record

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::{write_atomic, StoreError};
use crate::types::time::{format_timestamp, parse_timestamp};

/// Single-value file holding the time of the last successful restart.
#[derive(Debug, Clone)]
pub struct RestartRecordStore {
    path: PathBuf,
}

impl RestartRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored timestamp.
    ///
    /// - `Ok(None)` if the record has never been written
    /// - `Err(Malformed)` if the content is not `YYYY-MM-DD HH:MM:SS`
    /// - `Err(Io)` for any other read failure
    pub fn load(&self) -> Result<Option<NaiveDateTime>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| StoreError::Malformed {
                path: self.path.clone(),
                reason: format!("expected YYYY-MM-DD HH:MM:SS, found {:?}", raw.trim()),
            })
    }

    /// Overwrite the record with `at`.
    pub fn store(&self, at: NaiveDateTime) -> Result<(), StoreError> {
        write_atomic(&self.path, format_timestamp(at).as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = RestartRecordStore::new(dir.path().join("last_restart.timestamp"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn store_then_load() {
        let dir = tempdir().unwrap();
        let store = RestartRecordStore::new(dir.path().join("last_restart.timestamp"));
        store.store(at(14, 50)).unwrap();
        assert_eq!(store.load().unwrap(), Some(at(14, 50)));
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "2025-08-16 14:50:00"
        );
    }

    #[test]
    fn store_overwrites() {
        let dir = tempdir().unwrap();
        let store = RestartRecordStore::new(dir.path().join("last_restart.timestamp"));
        store.store(at(14, 50)).unwrap();
        store.store(at(16, 30)).unwrap();
        assert_eq!(store.load().unwrap(), Some(at(16, 30)));
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last_restart.timestamp");
        std::fs::write(&path, "not a timestamp").unwrap();
        let err = RestartRecordStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn directory_in_place_of_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = RestartRecordStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
