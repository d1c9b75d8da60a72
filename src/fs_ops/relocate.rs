//! Directory relocation state machine.
//!
//! Validating -> AttemptingAtomicMove -> (Done | CopyingTree -> DeletingSource) -> Verifying.
//!
//! The rename is always tried first; the copy + delete fallback only runs when it
//! fails. Nothing is rolled back: a failed fallback leaves the source intact and the
//! destination as far as the copy got, and the error says which state that is.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

use crate::errors::{Phase, RelocateError};

use super::atomic::{Renamer, StdRenamer};
use super::copy::{Copier, TreeCopier};
use super::delete::{RetryingDeleter, StdRemover, TreeRemover};
use super::helpers::{hint_for, is_cross_device};
use super::path_check;

/// One directory to move. `category` is carried for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: String,
}

impl RelocationRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            category: category.into(),
        }
    }
}

/// How a successful relocation was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationOutcome {
    /// A single atomic rename.
    Moved,
    /// Rename failed; the tree was copied and the source removed.
    CopiedAndRemoved,
}

impl fmt::Display for RelocationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelocationOutcome::Moved => f.write_str("atomic rename"),
            RelocationOutcome::CopiedAndRemoved => f.write_str("copy and remove"),
        }
    }
}

pub struct Relocator<R = StdRenamer, C = Copier, D = StdRemover> {
    renamer: R,
    copier: C,
    deleter: RetryingDeleter<D>,
}

impl Default for Relocator {
    fn default() -> Self {
        Self::new(StdRenamer, Copier::default(), RetryingDeleter::default())
    }
}

impl<R: Renamer, C: TreeCopier, D: TreeRemover> Relocator<R, C, D> {
    pub fn new(renamer: R, copier: C, deleter: RetryingDeleter<D>) -> Self {
        Self {
            renamer,
            copier,
            deleter,
        }
    }

    /// Move `req.source` to `req.destination`.
    pub fn relocate(&self, req: &RelocationRequest) -> Result<RelocationOutcome, RelocateError> {
        let span = info_span!("relocate", category = %req.category);
        let _guard = span.enter();

        let (src, dst) = self.validate(req)?;

        debug!(
            phase = %Phase::AttemptingAtomicMove,
            src = %src.display(),
            dest = %dst.display()
        );
        let outcome = match self.renamer.rename(&src, &dst) {
            Ok(()) => {
                info!(src = %src.display(), dest = %dst.display(), "Renamed directory atomically");
                RelocationOutcome::Moved
            }
            Err(e) => {
                warn!(
                    src = %src.display(),
                    dest = %dst.display(),
                    error = %e,
                    cross_device = is_cross_device(&e),
                    hint = hint_for(&e).unwrap_or(""),
                    "Atomic rename failed, falling back to copy+remove"
                );
                self.copy_then_remove(&src, &dst)?;
                RelocationOutcome::CopiedAndRemoved
            }
        };

        verify(&src, &dst, outcome)?;
        Ok(outcome)
    }

    fn validate(&self, req: &RelocationRequest) -> Result<(PathBuf, PathBuf), RelocateError> {
        debug!(
            phase = %Phase::Validating,
            src = %req.source.display(),
            dest = %req.destination.display()
        );
        let src = resolve(&req.source)?;
        let dst = resolve(&req.destination)?;

        if dst.starts_with(&src) {
            return Err(RelocateError::DestinationInsideSource {
                source_dir: src,
                destination: dst,
            });
        }

        match path_check::probe_dir(&src) {
            Ok(true) => {}
            Ok(false) => {
                return Err(RelocateError::SourceMissing {
                    path: src,
                    probe_error: None,
                });
            }
            Err(e) => {
                warn!(path = %src.display(), error = %e, "cannot stat source directory");
                return Err(RelocateError::SourceMissing {
                    path: src,
                    probe_error: Some(e.to_string()),
                });
            }
        }

        // Same check through symlinks: `dst` may reach into `src` via a linked ancestor.
        let real_src = dunce::canonicalize(&src).map_err(|source| RelocateError::InvalidPath {
            path: src.clone(),
            source,
        })?;
        let real_dst = path_check::resolve_links(&dst).map_err(|source| {
            RelocateError::InvalidPath {
                path: dst.clone(),
                source,
            }
        })?;
        if real_dst.starts_with(&real_src) {
            return Err(RelocateError::DestinationInsideSource {
                source_dir: src,
                destination: dst,
            });
        }

        if path_check::entry_exists(&dst) {
            return Err(RelocateError::DestinationExists { path: dst });
        }

        ensure_parent_dir(&dst)?;
        Ok((src, dst))
    }

    fn copy_then_remove(&self, src: &Path, dst: &Path) -> Result<(), RelocateError> {
        debug!(phase = %Phase::CopyingTree, src = %src.display(), dest = %dst.display());
        let stats = self
            .copier
            .copy_tree(src, dst)
            .map_err(|source| RelocateError::CopyFailed {
                source_dir: src.to_path_buf(),
                destination: dst.to_path_buf(),
                destination_written: path_check::entry_exists(dst),
                source,
            })?;

        debug!(phase = %Phase::DeletingSource, src = %src.display(), files = stats.files);
        let attempts = self
            .deleter
            .delete(src)
            .map_err(|source| RelocateError::SourceCleanupFailed {
                source_dir: src.to_path_buf(),
                destination: dst.to_path_buf(),
                source,
            })?;

        info!(
            src = %src.display(),
            dest = %dst.display(),
            files = stats.files,
            bytes = stats.bytes,
            delete_attempts = attempts,
            "Copied directory contents and removed source"
        );
        Ok(())
    }
}

/// Create `dst`'s parent and any missing ancestors. Safe to call repeatedly.
pub fn ensure_parent_dir(dst: &Path) -> Result<(), RelocateError> {
    let Some(parent) = dst.parent() else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|source| RelocateError::ParentCreateFailed {
        path: parent.to_path_buf(),
        source,
    })
}

fn resolve(path: &Path) -> Result<PathBuf, RelocateError> {
    path_check::normalize(path).map_err(|source| RelocateError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

/// Postcondition: source gone, destination present as a directory.
fn verify(src: &Path, dst: &Path, outcome: RelocationOutcome) -> Result<(), RelocateError> {
    debug!(phase = %Phase::Verifying, src = %src.display(), dest = %dst.display());
    if path_check::dir_exists(src) {
        return Err(RelocateError::SourceStillPresent {
            path: src.to_path_buf(),
            outcome,
        });
    }
    if !path_check::dir_exists(dst) {
        return Err(RelocateError::DestinationMissing {
            path: dst.to_path_buf(),
            outcome,
        });
    }
    Ok(())
}
