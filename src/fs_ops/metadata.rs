//! Metadata mirroring for copied entries.
//! - Permission bits (mode on Unix, readonly attribute on Windows) are mandatory:
//!   failures propagate to the caller.
//! - Timestamps (atime, mtime) are best-effort: failures are logged and ignored.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

/// Set `dest`'s permission bits to those recorded in `src_meta`.
pub fn apply_permissions(dest: &Path, src_meta: &fs::Metadata) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o7777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode))?;
        trace!(
            path = %dest.display(),
            mode = format!("{:o}", mode),
            "set permissions on destination"
        );
    }
    #[cfg(not(unix))]
    {
        let ro = src_meta.permissions().readonly();
        let mut perms = fs::metadata(dest)?.permissions();
        perms.set_readonly(ro);
        fs::set_permissions(dest, perms)?;
        trace!(path = %dest.display(), readonly = ro, "set readonly attribute on destination");
    }
    Ok(())
}

/// Copy atime/mtime from `src_meta` onto `dest`, logging on failure.
pub fn preserve_times(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    if let Err(e) = set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
    } else {
        trace!(path = %dest.display(), "set atime/mtime on destination");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    #[test]
    fn permissions_are_mirrored() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, "a").unwrap();
        fs::write(&dst, "b").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

        apply_permissions(&dst, &fs::metadata(&src).unwrap()).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn mtime_is_preserved() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, "a").unwrap();
        fs::write(&dst, "b").unwrap();
        let old = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(3600));
        filetime::set_file_mtime(&src, old).unwrap();

        preserve_times(&dst, &fs::metadata(&src).unwrap());
        let got = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
        assert_eq!(got.unix_seconds(), old.unix_seconds());
    }
}
