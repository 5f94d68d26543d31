//! Durable stores
//!
//! Two single-value files shared across invocations:
//! - [`RestartRecordStore`]: last successful restart, `YYYY-MM-DD HH:MM:SS`
//! - [`StatusStore`]: JSON status snapshot read by the viewer
//!
//! Both are overwritten, never appended, through [`write_atomic`]: a reader
//! sees either the old or the new content, never a torn write, and
//! overlapping writers each publish a complete file (the last rename wins). [`ProcessLock`] optionally serialises invocations.

pub mod lockfile;
mod restart_record;
mod status;

pub use lockfile::{LockError, ProcessLock};
pub use restart_record::RestartRecordStore;
pub use status::StatusStore;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed content in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write `contents` to `path` atomically (write temp file, then rename).
///
/// Each call writes its own uniquely named temp file in the target's
/// directory, so the rename never crosses a filesystem and concurrent
/// writers never share a temp path. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if path.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        ));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path)?;
    Ok(())
}
