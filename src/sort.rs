//! Sort driver: turns marker entries into relocation requests and runs them.
//!
//! Each entry moves to `<sort_dir>/<sanitized category>/<dir name>`. Requests run
//! one after another; a failure is recorded and the next request still runs.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::RelocateError;
use crate::fs_ops::{
    Copier, RelocationOutcome, RelocationRequest, Relocator, Renamer, RetryingDeleter,
    StdRemover, StdRenamer, TreeCopier, TreeRemover,
};
use crate::marker::MarkerEntry;
use crate::sanitize::sanitize;
use crate::shutdown::CancelFlag;

/// Totals for one sort run.
#[derive(Debug, Default)]
pub struct SortReport {
    /// Relocated with a single rename.
    pub moved: usize,
    /// Relocated through copy + remove.
    pub copied: usize,
    /// Not attempted (dry-run, or cancelled before their turn).
    pub skipped: usize,
    pub failed: Vec<(RelocationRequest, RelocateError)>,
}

impl SortReport {
    pub fn succeeded(&self) -> usize {
        self.moved + self.copied
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Destination for `entry` under `sort_dir`.
pub fn destination_for(sort_dir: &Path, entry: &MarkerEntry) -> Option<PathBuf> {
    let name = entry.dir.file_name()?;
    Some(sort_dir.join(sanitize(&entry.category)).join(name))
}

/// Build requests for `entries`. Entries already at their destination, or whose
/// directory has no final name component, are left out.
pub fn plan(sort_dir: &Path, entries: &[MarkerEntry]) -> Vec<RelocationRequest> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(dest) = destination_for(sort_dir, entry) else {
            warn!(dir = %entry.dir.display(), "cannot derive a destination name, skipping");
            continue;
        };
        if dest == entry.dir {
            debug!(dir = %entry.dir.display(), category = %entry.category, "already in place");
            continue;
        }
        out.push(RelocationRequest::new(&entry.dir, dest, &entry.category));
    }
    out
}

/// The relocator the binary uses, configured from `cfg`.
pub fn relocator_for(cfg: &Config, cancel: &CancelFlag) -> Relocator {
    let copier = Copier::new()
        .preserve_times(cfg.preserve_times)
        .check_free_space(cfg.check_free_space)
        .with_cancel(cancel.clone());
    let deleter = RetryingDeleter::new(StdRemover, cfg.delete_attempts, cfg.delete_backoff);
    Relocator::new(StdRenamer, copier, deleter)
}

/// Run `requests` in order. With `dry_run` nothing is touched and every request
/// is counted as skipped. A raised `cancel` stops before the next request.
pub fn execute<R, C, D>(
    relocator: &Relocator<R, C, D>,
    requests: Vec<RelocationRequest>,
    dry_run: bool,
    cancel: &CancelFlag,
) -> SortReport
where
    R: Renamer,
    C: TreeCopier,
    D: TreeRemover,
{
    let mut report = SortReport::default();
    let total = requests.len();

    for (idx, req) in requests.into_iter().enumerate() {
        if cancel.is_requested() {
            report.skipped += total - idx;
            warn!(remaining = total - idx, "Interrupted; remaining directories left in place");
            break;
        }
        if dry_run {
            info!(
                src = %req.source.display(),
                dest = %req.destination.display(),
                category = %req.category,
                "Dry-run: would relocate"
            );
            report.skipped += 1;
            continue;
        }

        match relocator.relocate(&req) {
            Ok(RelocationOutcome::Moved) => report.moved += 1,
            Ok(RelocationOutcome::CopiedAndRemoved) => report.copied += 1,
            Err(e) => {
                error!(
                    code = e.code(),
                    phase = %e.phase(),
                    src = %req.source.display(),
                    dest = %req.destination.display(),
                    error = %e,
                    "Relocation failed"
                );
                report.failed.push((req, e));
            }
        }
    }

    info!(
        moved = report.moved,
        copied = report.copied,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Sort finished"
    );
    report
}
