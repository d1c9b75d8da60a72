//! Free-space preflight for the fallback copy.

use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::CopyError;
use crate::platform::free_space_bytes;

/// Headroom kept on the destination filesystem beyond the payload itself.
const CUSHION: u64 = 4 * 1024 * 1024;

pub(super) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Total size of the regular files under `root` (links not followed).
pub(super) fn tree_size(root: &Path) -> Result<u64, CopyError> {
    let mut total: u64 = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| CopyError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_file() {
            let len = entry
                .metadata()
                .map_err(|e| CopyError::Walk {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?
                .len();
            total = total.saturating_add(len);
        }
    }
    Ok(total)
}

/// Fail with `InsufficientSpace` if `required` bytes (plus cushion) will not fit under `dest`.
/// A failing free-space query is logged and treated as "enough space".
pub(super) fn ensure_space_for_copy(dest: &Path, required: u64) -> Result<(), CopyError> {
    let Some(anchor) = dest.ancestors().find(|p| p.exists()) else {
        return Ok(());
    };
    let available = match free_space_bytes(anchor) {
        Ok(n) => n,
        Err(e) => {
            warn!(
                path = %anchor.display(),
                error = %e,
                "could not query free space; skipping preflight"
            );
            return Ok(());
        }
    };
    debug!(
        dest = %dest.display(),
        required = %format_bytes(required),
        available = %format_bytes(available),
        "free-space preflight"
    );
    if available < required.saturating_add(CUSHION) {
        return Err(CopyError::InsufficientSpace {
            dest: dest.to_path_buf(),
            required,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sums_nested_files() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("a/b")).unwrap();
        fs::write(td.path().join("x"), vec![0u8; 10]).unwrap();
        fs::write(td.path().join("a/b/y"), vec![0u8; 32]).unwrap();
        assert_eq!(tree_size(td.path()).unwrap(), 42);
    }

    #[test]
    fn absurd_requirement_is_rejected() {
        let td = tempdir().unwrap();
        let dest = td.path().join("not/yet/there");
        let err = ensure_space_for_copy(&dest, u64::MAX - 1).unwrap_err();
        assert!(matches!(err, CopyError::InsufficientSpace { .. }));
    }

    #[test]
    fn formats_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
