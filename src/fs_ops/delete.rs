//! Retrying recursive delete.
//!
//! Some platforms release handles of just-copied files with a short delay, so an
//! immediate `remove_dir_all` can fail spuriously. We retry a bounded number of
//! times with a fixed sleep in between.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::DeleteError;

use super::helpers::hint_for;

pub const DEFAULT_DELETE_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELETE_BACKOFF: Duration = Duration::from_millis(100);

/// Removes a tree in one attempt. The seam retries are layered on.
pub trait TreeRemover {
    fn remove_tree(&self, path: &Path) -> io::Result<()>;
}

/// `fs::remove_dir_all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdRemover;

impl TreeRemover for StdRemover {
    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[derive(Debug, Clone)]
pub struct RetryingDeleter<D = StdRemover> {
    remover: D,
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryingDeleter<StdRemover> {
    fn default() -> Self {
        Self::new(StdRemover, DEFAULT_DELETE_ATTEMPTS, DEFAULT_DELETE_BACKOFF)
    }
}

impl<D: TreeRemover> RetryingDeleter<D> {
    /// `max_attempts` below 1 is treated as 1.
    pub fn new(remover: D, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            remover,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Remove `path` recursively. Returns the number of attempts it took.
    /// A path that is already gone counts as removed.
    pub fn delete(&self, path: &Path) -> Result<u32, DeleteError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.remover.remove_tree(path) {
                Ok(()) => {
                    debug!(path = %path.display(), attempt, "removed tree");
                    return Ok(attempt);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), attempt, "tree already gone");
                    return Ok(attempt);
                }
                Err(e) if attempt >= self.max_attempts => {
                    return Err(DeleteError {
                        path: path.to_path_buf(),
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        hint = hint_for(&e).unwrap_or(""),
                        "remove failed; retrying"
                    );
                    thread::sleep(self.backoff);
                }
            }
        }
    }
}
