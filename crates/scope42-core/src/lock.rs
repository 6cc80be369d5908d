use crate::error::ErrorCode;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

/// File name of the advisory lock at the workspace root.
pub const LOCK_FILE: &str = ".scope42.lock";

/// How long writers wait for another process to release the lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Advisory lock errors for workspace writes.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("{}: lock timed out after {waited:?} at {}", ErrorCode::LockContention.code(), .path.display())]
    Timeout { path: PathBuf, waited: Duration },
    #[error("{}: {0}", ErrorCode::ItemWriteFailed.code())]
    Io(#[from] io::Error),
}

impl LockError {
    /// Machine-readable code associated with this lock error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Timeout { .. } => ErrorCode::LockContention,
            Self::Io(_) => ErrorCode::ItemWriteFailed,
        }
    }

    /// Optional remediation hint for users and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// RAII guard for the workspace-wide exclusive lock held while writing.
///
/// The lock only serializes writers; detecting that another process changed
/// the workspace in between is the job of the persistence fingerprints.
#[derive(Debug)]
pub struct WorkspaceLock {
    file: File,
}

impl WorkspaceLock {
    /// Acquire an exclusive advisory lock on `path`, polling until `timeout`.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "lock path has no parent")
        })?;
        fs::create_dir_all(parent)?;

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            if file.try_lock_exclusive().is_ok() {
                return Ok(Self { file });
            }

            if start.elapsed() >= timeout {
                return Err(LockError::Timeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    /// Explicitly release the lock. Release also happens automatically on drop.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::{LockError, WorkspaceLock};
    use crate::error::ErrorCode;
    use std::{
        sync::{Arc, Barrier},
        thread,
        time::Duration,
    };

    #[test]
    fn lock_allows_acquire_and_release() -> Result<(), LockError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("basic.lock");
        let lock = WorkspaceLock::acquire(&path, Duration::from_millis(50))?;
        assert!(path.is_file());
        lock.release();
        Ok(())
    }

    #[test]
    fn lock_times_out_when_held() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("timeout.lock");
        let _guard = WorkspaceLock::acquire(&path, Duration::from_millis(50)).unwrap();
        let err = WorkspaceLock::acquire(&path, Duration::from_millis(20)).unwrap_err();

        assert!(matches!(err, LockError::Timeout { path: ref p, .. } if *p == path));
        assert_eq!(err.code(), ErrorCode::LockContention);
        assert!(err.hint().is_some());
    }

    #[test]
    fn lock_release_allows_follow_up_lock() -> Result<(), LockError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("release-followup.lock");
        {
            let _first = WorkspaceLock::acquire(&path, Duration::from_millis(50))?;
        }

        let _second = WorkspaceLock::acquire(&path, Duration::from_millis(50))?;
        Ok(())
    }

    #[test]
    fn contention_is_resolved_after_writer_releases() -> Result<(), LockError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("thread.lock");

        let held = Arc::new(Barrier::new(2));
        let done = Arc::new(Barrier::new(2));

        let held_thread = Arc::clone(&held);
        let done_thread = Arc::clone(&done);
        let path_in_thread = path.clone();
        let handle = thread::spawn(move || {
            let _writer =
                WorkspaceLock::acquire(&path_in_thread, Duration::from_millis(200)).unwrap();
            held_thread.wait();
            done_thread.wait();
        });

        held.wait();
        assert!(matches!(
            WorkspaceLock::acquire(&path, Duration::from_millis(20)),
            Err(LockError::Timeout { .. })
        ));
        done.wait();
        handle.join().unwrap();

        let follow_up = WorkspaceLock::acquire(&path, Duration::from_millis(50))?;
        follow_up.release();
        Ok(())
    }
}
