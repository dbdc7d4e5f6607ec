//! Advisory locking of the ledger.
//!
//! The lock is an OS file lock (`flock` on Unix, `LockFileEx` on Windows) on
//! `<ledger>.lock`, never on the ledger itself, so readers stay unblocked.
//! The OS releases it when the holding process exits, so a crashed publisher
//! cannot leave a stale lock behind.

use crate::error::PublishError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// How often a blocked publisher retries the lock.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The lock file for a ledger: same directory, `.lock` appended to the name.
pub fn lock_path_for(ledger_path: &Path) -> PathBuf {
    let mut name = ledger_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    ledger_path.with_file_name(name)
}

/// An exclusive lock on a ledger, released on drop.
#[derive(Debug)]
pub struct LedgerLock {
    file: File,
    path: PathBuf,
}

impl LedgerLock {
    /// Take the lock, retrying every [`DEFAULT_POLL_INTERVAL`] until `timeout`.
    pub fn acquire(ledger_path: &Path, timeout: Duration) -> Result<LedgerLock, PublishError> {
        Self::acquire_with_poll(ledger_path, timeout, DEFAULT_POLL_INTERVAL)
    }

    /// Take the lock with a custom retry interval.
    ///
    /// A zero `timeout` makes exactly one attempt. A `timeout` too large to
    /// add to the current instant waits without a deadline.
    pub fn acquire_with_poll(
        ledger_path: &Path,
        timeout: Duration,
        poll: Duration,
    ) -> Result<LedgerLock, PublishError> {
        let path = lock_path_for(ledger_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| PublishError::Lock {
                lock_path: path.clone(),
                source,
            })?;

        let deadline = Instant::now().checked_add(timeout);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    log::debug!("Acquired lock {}", path.display());
                    return Ok(LedgerLock { file, path });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {}
                Err(source) => {
                    return Err(PublishError::Lock {
                        lock_path: path,
                        source,
                    })
                }
            }

            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(PublishError::LockTimeout {
                            lock_path: path,
                            timeout,
                        });
                    }
                    poll.min(deadline - now)
                }
                None => poll,
            };
            thread::sleep(wait);
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        match FileExt::unlock(&self.file) {
            Ok(()) => log::debug!("Released lock {}", self.path.display()),
            Err(e) => log::warn!("Failed to release lock {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_for() {
        assert_eq!(
            lock_path_for(Path::new("/data/ip-ranges_2024-05-01.csv")),
            PathBuf::from("/data/ip-ranges_2024-05-01.csv.lock")
        );
        assert_eq!(
            lock_path_for(Path::new("ledger.csv")),
            PathBuf::from("ledger.csv.lock")
        );
    }

    #[test]
    fn test_second_acquire_times_out() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let held = LedgerLock::acquire(&ledger, Duration::ZERO).unwrap();
        assert!(held.path().exists());

        let started = Instant::now();
        let err = LedgerLock::acquire_with_poll(
            &ledger,
            Duration::from_millis(150),
            Duration::from_millis(10),
        )
        .unwrap_err();
        assert!(matches!(err, PublishError::LockTimeout { .. }));
        assert!(started.elapsed() >= Duration::from_millis(150));
        assert!(!ledger.exists(), "locking must not create the ledger");
    }

    #[test]
    fn test_released_on_drop() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        {
            let _lock = LedgerLock::acquire(&ledger, Duration::ZERO).unwrap();
        }
        let again = LedgerLock::acquire(&ledger, Duration::ZERO);
        assert!(again.is_ok());
    }

    #[test]
    fn test_released_on_panic() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let result = std::panic::catch_unwind(|| {
            let _lock = LedgerLock::acquire(&ledger, Duration::ZERO).unwrap();
            panic!("write failed while holding the lock");
        });
        assert!(result.is_err());
        assert!(LedgerLock::acquire(&ledger, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_waits_for_release() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let held = LedgerLock::acquire(&ledger, Duration::ZERO).unwrap();

        let waiter_ledger = ledger.clone();
        let waiter = thread::spawn(move || {
            LedgerLock::acquire_with_poll(
                &waiter_ledger,
                Duration::from_secs(5),
                Duration::from_millis(5),
            )
            .map(|_| ())
        });
        thread::sleep(Duration::from_millis(100));
        drop(held);
        assert!(waiter.join().unwrap().is_ok());
    }

    #[test]
    fn test_unbounded_timeout_does_not_overflow() {
        let dir = tempdir().unwrap();
        let ledger = dir.path().join("ledger.csv");
        let huge = Duration::from_secs_f64(1e19);
        assert!(LedgerLock::acquire(&ledger, Duration::MAX).is_ok());

        let held = LedgerLock::acquire(&ledger, huge).unwrap();
        let waiter_ledger = ledger.clone();
        let waiter = thread::spawn(move || {
            LedgerLock::acquire_with_poll(&waiter_ledger, huge, Duration::from_millis(5))
                .map(|_| ())
        });
        thread::sleep(Duration::from_millis(50));
        drop(held);
        assert!(waiter.join().unwrap().is_ok());
    }
}
