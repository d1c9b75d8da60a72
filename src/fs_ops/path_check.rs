//! Path resolution and existence probes.
//!
//! `normalize` is purely lexical after making the path absolute: it never
//! follows symlinks and works for destinations that do not exist yet.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Absolute form of `path` with `.` and `..` segments removed.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let abs = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for comp in abs.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to go above the root/prefix, which is what we want.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Ok(true) for an existing directory, Ok(false) when missing or not a directory,
/// Err when the state cannot be determined.
pub fn probe_dir(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Boolean existence check. Errors collapse to `false`; the error is logged.
pub fn dir_exists(path: &Path) -> bool {
    match probe_dir(path) {
        Ok(is_dir) => is_dir,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot determine whether directory exists");
            false
        }
    }
}

/// True if anything is present at `path` (symlinks are not followed).
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// `path` with every existing ancestor's symlinks resolved: the deepest existing
/// ancestor is canonicalized and the not-yet-existing rest is appended. `path`
/// must already be absolute and lexically clean.
pub fn resolve_links(path: &Path) -> io::Result<PathBuf> {
    for anchor in path.ancestors() {
        if fs::symlink_metadata(anchor).is_err() {
            continue;
        }
        // A dangling link canonicalizes to NotFound; keep climbing past it.
        match dunce::canonicalize(anchor) {
            Ok(real) => {
                let rest = path.strip_prefix(anchor).unwrap_or(Path::new(""));
                return Ok(if rest.as_os_str().is_empty() {
                    real
                } else {
                    real.join(rest)
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn normalize_strips_dot_segments() {
        let td = tempdir().unwrap();
        let messy = td.path().join("a").join(".").join("b").join("..").join("c");
        let clean = normalize(&messy).unwrap();
        assert_eq!(clean, td.path().join("a").join("c"));
    }

    #[test]
    fn normalize_relative_becomes_absolute() {
        let p = normalize(Path::new("some/rel/../dir")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("some/dir"));
    }

    #[test]
    fn normalize_empty_is_error() {
        assert!(normalize(Path::new("")).is_err());
    }

    #[test]
    fn probe_distinguishes_file_dir_missing() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        fs::write(&f, "x").unwrap();
        assert!(probe_dir(td.path()).unwrap());
        assert!(!probe_dir(&f).unwrap());
        assert!(!probe_dir(&td.path().join("missing")).unwrap());
        assert!(dir_exists(td.path()));
        assert!(!dir_exists(&f));
        assert!(entry_exists(&f));
    }

    #[test]
    fn resolve_links_keeps_missing_tail() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        let p = base.join("not/there/yet");
        assert_eq!(resolve_links(&p).unwrap(), p);
    }

    #[cfg(unix)]
    #[test]
    fn resolve_links_follows_symlinked_ancestor() {
        let td = tempdir().unwrap();
        let base = dunce::canonicalize(td.path()).unwrap();
        fs::create_dir_all(base.join("real")).unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("alias")).unwrap();
        assert_eq!(
            resolve_links(&base.join("alias/go/proj")).unwrap(),
            base.join("real/go/proj")
        );
    }
}
