//! Single-instance run lock.
//!
//! A marker file holds the pid of the running process. A marker older than
//! the staleness threshold is presumed abandoned by a killed run and is
//! reclaimed; a younger one refuses acquisition. The guard removes the
//! marker on drop, so every exit path of the supervisor releases it.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use storyloom_error::{LockError, LockErrorKind};
use tracing::{info, warn};

/// Held for the duration of a supervised run.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock, reclaiming a stale marker if one exists.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` when a marker younger than `stale_after` exists;
    /// `Io` when the marker cannot be inspected, removed, or written.
    pub fn acquire(path: &Path, stale_after: Duration) -> Result<RunLock, LockError> {
        if let Some(age) = marker_age(path)? {
            if age > stale_after {
                warn!(
                    age_minutes = age.as_secs() / 60,
                    "Stale lock marker found; reclaiming"
                );
                std::fs::remove_file(path)
                    .map_err(|e| LockError::new(LockErrorKind::Io(e.to_string())))?;
            } else {
                return Err(LockError::new(LockErrorKind::AlreadyRunning {
                    age_minutes: age.as_secs_f64() / 60.0,
                }));
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| LockError::new(LockErrorKind::Io(e.to_string())))?;
        }
        std::fs::write(path, std::process::id().to_string())
            .map_err(|e| LockError::new(LockErrorKind::Io(e.to_string())))?;

        info!(path = %path.display(), "Acquired run lock");
        Ok(RunLock {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Released run lock"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove lock marker"),
        }
    }
}

/// Age of the marker, `None` if it does not exist.
fn marker_age(path: &Path) -> Result<Option<Duration>, LockError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LockError::new(LockErrorKind::Io(e.to_string()))),
    };

    let modified = metadata
        .modified()
        .map_err(|e| LockError::new(LockErrorKind::Io(e.to_string())))?;

    // A marker stamped in the future counts as brand new.
    let age = SystemTime::now()
        .duration_since(modified)
        .unwrap_or_default();
    Ok(Some(age))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    const STALE_AFTER: Duration = Duration::from_secs(30 * 60);

    fn temp_marker(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("storyloom_lock_{}_{}", std::process::id(), name))
    }

    fn backdate(path: &Path, by: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn test_acquire_without_marker() {
        let path = temp_marker("fresh");
        std::fs::remove_file(&path).ok();

        {
            let _lock = RunLock::acquire(&path, STALE_AFTER).unwrap();
            assert!(path.exists());
        }
        // Guard drop releases the marker.
        assert!(!path.exists());
    }

    #[test]
    fn test_stale_marker_is_reclaimed() {
        let path = temp_marker("stale");
        std::fs::write(&path, "1").unwrap();
        backdate(&path, Duration::from_secs(45 * 60));

        let lock = RunLock::acquire(&path, STALE_AFTER).unwrap();
        assert!(path.exists());
        drop(lock);
        assert!(!path.exists());
    }

    #[test]
    fn test_recent_marker_refuses_acquisition() {
        let path = temp_marker("recent");
        std::fs::write(&path, "1").unwrap();
        backdate(&path, Duration::from_secs(10 * 60));

        let err = RunLock::acquire(&path, STALE_AFTER).unwrap_err();
        assert!(matches!(err.kind, LockErrorKind::AlreadyRunning { .. }));
        // The competing run's marker is left alone.
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
