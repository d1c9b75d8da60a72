//! Atomic rename seam.
//! - `StdRenamer` is a plain `fs::rename`, followed on Unix by a best-effort fsync of
//!   the destination's parent so the new directory entry is persisted.
//! - No overwrite handling: the relocator has already refused existing destinations.

use std::fs;
use std::io;
use std::path::Path;

/// Single-step move of `src` to `dst`. Fails across devices.
pub trait Renamer {
    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdRenamer;

impl Renamer for StdRenamer {
    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::rename(src, dst)?;

        // Ignore fsync errors to avoid turning a successful rename into a failure.
        #[cfg(unix)]
        if let Some(parent) = dst.parent() {
            let _ = fs::File::open(parent).and_then(|d| d.sync_all());
        }

        Ok(())
    }
}
