//! Invocation lock
//!
//! Keeps two watchdog passes (a scheduled `check` overlapping a `run` loop,
//! say) from racing on the restart record. Only taken when
//! `storage.lock_dir` is configured.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;

/// Lock acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error(
        "another watchdog pass is already running (PID: {pid}); \
         if no other pass is running, remove the stale lock file {}",
        .path.display()
    )]
    Held { pid: u32, path: PathBuf },
    #[error(
        "lock file {} exists but names no PID; treating it as held",
        .path.display()
    )]
    Unverified { path: PathBuf },
    #[error("lock file I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What an existing lock file says about its holder.
enum Holder {
    Live(u32),
    /// Safe to remove, as long as the file still reads `contents`
    Stale { contents: String },
    Unverified,
    Vanished,
}

/// PID lock file, removed again on drop.
///
/// The file is published with its PID already written (link of a private
/// temp file, failing if the lock exists), so no contender ever reads an
/// empty lock.
#[derive(Debug)]
pub struct ProcessLock {
    lock_path: PathBuf,
    owned: bool,
}

impl ProcessLock {
    const LOCK_FILE_NAME: &'static str = ".heartbeat-watchdog.lock";

    /// A lock file without a PID is only taken over once it is this old.
    const UNVERIFIED_GRACE: Duration = Duration::from_secs(300);

    const MAX_ATTEMPTS: usize = 3;

    /// Acquire the lock in `lock_dir`, creating the directory if needed.
    ///
    /// A lock file whose PID no longer belongs to a watchdog process is
    /// treated as stale and replaced.
    pub fn acquire<P: AsRef<Path>>(lock_dir: P) -> Result<Self, LockError> {
        let lock_dir = lock_dir.as_ref();
        fs::create_dir_all(lock_dir).map_err(|source| LockError::Io {
            path: lock_dir.to_path_buf(),
            source,
        })?;

        let lock_path = lock_dir.join(Self::LOCK_FILE_NAME);
        let io_err = |source| LockError::Io {
            path: lock_path.clone(),
            source,
        };
        let pid = std::process::id();

        for _ in 0..Self::MAX_ATTEMPTS {
            let mut candidate = NamedTempFile::new_in(lock_dir).map_err(io_err)?;
            writeln!(candidate, "{pid}").map_err(io_err)?;

            match candidate.persist_noclobber(&lock_path) {
                Ok(_) => {
                    tracing::debug!(pid, path = %lock_path.display(), "Acquired process lock");
                    return Ok(Self {
                        lock_path,
                        owned: true,
                    });
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(io_err(e.error)),
            }

            match Self::inspect(&lock_path) {
                Holder::Live(holder) => {
                    return Err(LockError::Held {
                        pid: holder,
                        path: lock_path,
                    })
                }
                Holder::Unverified => return Err(LockError::Unverified { path: lock_path }),
                Holder::Vanished => {}
                Holder::Stale { contents } => {
                    tracing::info!(
                        holder = contents.trim(),
                        "Removing stale lock file from previous pass"
                    );
                    Self::remove_if_unchanged(&lock_path, &contents).map_err(io_err)?;
                }
            }
        }

        Err(LockError::Unverified { path: lock_path })
    }

    fn inspect(lock_path: &Path) -> Holder {
        let contents = match fs::read_to_string(lock_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Holder::Vanished,
            Err(_) => return Holder::Unverified,
        };

        match contents.trim().parse::<u32>() {
            Ok(pid) if Self::is_process_running(pid) => Holder::Live(pid),
            Ok(_) => Holder::Stale { contents },
            Err(_) if Self::older_than(lock_path, Self::UNVERIFIED_GRACE) => {
                Holder::Stale { contents }
            }
            Err(_) => Holder::Unverified,
        }
    }

    fn older_than(path: &Path, age: Duration) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|elapsed| elapsed > age)
    }

    /// Remove the lock only if it still holds what was judged stale, so a
    /// lock a faster contender just published is left alone.
    fn remove_if_unchanged(lock_path: &Path, judged: &str) -> io::Result<()> {
        match fs::read_to_string(lock_path) {
            Ok(current) if current == judged => match fs::remove_file(lock_path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        // A recycled PID belonging to some other program does not count.
        fs::read_to_string(format!("/proc/{pid}/cmdline"))
            .is_ok_and(|cmdline| cmdline.contains("watchdog"))
    }

    #[cfg(not(unix))]
    fn is_process_running(_pid: u32) -> bool {
        true
    }

    /// Release the lock (called automatically on drop)
    pub fn release(&mut self) {
        if self.owned {
            if let Err(e) = fs::remove_file(&self.lock_path) {
                tracing::warn!("Failed to remove lock file: {}", e);
            } else {
                tracing::debug!("Released process lock at {:?}", self.lock_path);
            }
            self.owned = false;
        }
    }

    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        self.release();
    }
}
