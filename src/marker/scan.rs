//! Marker discovery under the sort directory.
//! Unreadable or invalid markers are logged and skipped; only a failure to read
//! the sort directory itself is returned as an error.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::MarkerEntry;
use super::parse::parse_marker_file;
use crate::config::{Config, ScanMode};

/// Scan `cfg.sort_dir` using the configured mode.
pub fn scan(cfg: &Config) -> io::Result<Vec<MarkerEntry>> {
    match cfg.scan_mode {
        ScanMode::Direct => scan_direct(&cfg.sort_dir, &cfg.marker_name, &cfg.accepted_categories),
        ScanMode::Recursive => {
            scan_recursive(&cfg.sort_dir, &cfg.marker_name, &cfg.accepted_categories)
        }
    }
}

/// Check each immediate subdirectory of `root` for a marker.
pub fn scan_direct<S: AsRef<str>>(
    root: &Path,
    marker_name: &str,
    accepted: &[S],
) -> io::Result<Vec<MarkerEntry>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        // file_type does not follow symlinks.
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        if let Some(m) = inspect(&entry.path(), marker_name, accepted) {
            found.push(m);
        }
    }
    found.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(found)
}

/// Walk the whole tree below `root`. A marked directory is not descended into:
/// it moves as a unit. Symlinks are not followed.
pub fn scan_recursive<S: AsRef<str>>(
    root: &Path,
    marker_name: &str,
    accepted: &[S],
) -> io::Result<Vec<MarkerEntry>> {
    // Surface an unreadable root as an error rather than an empty result.
    fs::read_dir(root)?;

    let mut found = Vec::new();
    let mut it = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    while let Some(res) = it.next() {
        let entry = match res {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable path during scan");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();
        if !dir.join(marker_name).is_file() {
            continue;
        }
        if let Some(m) = inspect(dir, marker_name, accepted) {
            found.push(m);
        }
        it.skip_current_dir();
    }
    found.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(found)
}

fn inspect<S: AsRef<str>>(dir: &Path, marker_name: &str, accepted: &[S]) -> Option<MarkerEntry> {
    let marker = dir.join(marker_name);
    if !marker.is_file() {
        return None;
    }
    match parse_marker_file(&marker, accepted) {
        Ok(Some(category)) => {
            debug!(dir = %dir.display(), %category, "found marker");
            Some(MarkerEntry {
                dir: dir.to_path_buf(),
                category,
            })
        }
        Ok(None) => {
            warn!(marker = %marker.display(), "marker has no type, skipping");
            None
        }
        Err(e) => {
            warn!(marker = %marker.display(), error = %e, "failed to parse marker, skipping");
            None
        }
    }
}
