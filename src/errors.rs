//! Typed error definitions for filesort.
//! The relocation core reports every failure through [`RelocateError`], so callers can
//! tell which phase failed and what was left on disk without parsing log text.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::helpers::describe_io;
use crate::fs_ops::RelocationOutcome;

/// Position of a relocation in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    AttemptingAtomicMove,
    CopyingTree,
    DeletingSource,
    Verifying,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Validating => "validating",
            Phase::AttemptingAtomicMove => "atomic_move",
            Phase::CopyingTree => "copying_tree",
            Phase::DeletingSource => "deleting_source",
            Phase::Verifying => "verifying",
        };
        f.write_str(s)
    }
}

/// What a failed relocation left behind, so an operator knows what to clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residue {
    /// Nothing was mutated (except possibly freshly created destination ancestors).
    Untouched,
    /// Source intact; destination may hold part of the tree.
    SourceWithPartialDestination,
    /// Source intact; destination holds a complete copy.
    SourceWithCompleteDestination,
    /// A primitive reported success but the postcondition did not hold.
    Unknown,
}

/// Failure while duplicating a tree in the fallback path.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{}", describe_io(.op, .path, .source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed walking source tree at '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("unsupported entry type at '{}'", .path.display())]
    Unsupported { path: PathBuf },

    #[error("copy interrupted before '{}'", .path.display())]
    Interrupted { path: PathBuf },

    #[error(
        "not enough free space in '{}': need {required} bytes, have {available} bytes",
        .dest.display()
    )]
    InsufficientSpace {
        dest: PathBuf,
        required: u64,
        available: u64,
    },
}

impl CopyError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| CopyError::Io { op, path, source }
    }
}

/// Deletion still failing after every retry.
#[derive(Debug, Error)]
#[error("removing '{}' failed after {attempts} attempt(s): {source}", .path.display())]
pub struct DeleteError {
    pub path: PathBuf,
    pub attempts: u32,
    #[source]
    pub source: io::Error,
}

/// A marker file that could not be read or understood.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("cannot read marker '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: expected key=value, got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unknown key '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: category '{value}' is not in the accepted list")]
    NotAccepted { line: usize, value: String },
}

#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("cannot resolve path '{}': {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "destination '{}' is inside source '{}'",
        .destination.display(),
        .source_dir.display()
    )]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination: PathBuf,
    },

    #[error("source directory '{}' does not exist{}", .path.display(), fmt_probe(.probe_error))]
    SourceMissing {
        path: PathBuf,
        /// Stat error text when existence could not be determined at all.
        probe_error: Option<String>,
    },

    #[error("destination '{}' already exists", .path.display())]
    DestinationExists { path: PathBuf },

    #[error("cannot create parent directory '{}': {source}", .path.display())]
    ParentCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "copying '{}' -> '{}' failed: {source}",
        .source_dir.display(),
        .destination.display()
    )]
    CopyFailed {
        source_dir: PathBuf,
        destination: PathBuf,
        /// Whether anything exists at `destination` after the failure.
        destination_written: bool,
        #[source]
        source: CopyError,
    },

    #[error(
        "copied '{}' to '{}' but could not remove the source: {source}",
        .source_dir.display(),
        .destination.display()
    )]
    SourceCleanupFailed {
        source_dir: PathBuf,
        destination: PathBuf,
        #[source]
        source: DeleteError,
    },

    #[error("source '{}' still exists after {outcome}", .path.display())]
    SourceStillPresent {
        path: PathBuf,
        outcome: RelocationOutcome,
    },

    #[error("destination '{}' is not a directory after {outcome}", .path.display())]
    DestinationMissing {
        path: PathBuf,
        outcome: RelocationOutcome,
    },
}

fn fmt_probe(probe: &Option<String>) -> String {
    match probe {
        Some(e) => format!(" (could not stat: {e})"),
        None => String::new(),
    }
}

impl RelocateError {
    /// Stable machine-friendly tag, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            RelocateError::InvalidPath { .. } => "invalid_path",
            RelocateError::DestinationInsideSource { .. } => "destination_inside_source",
            RelocateError::SourceMissing { .. } => "source_missing",
            RelocateError::DestinationExists { .. } => "destination_exists",
            RelocateError::ParentCreateFailed { .. } => "parent_create_failed",
            RelocateError::CopyFailed { .. } => "copy_failed",
            RelocateError::SourceCleanupFailed { .. } => "source_cleanup_failed",
            RelocateError::SourceStillPresent { .. } => "source_still_present",
            RelocateError::DestinationMissing { .. } => "destination_missing",
        }
    }

    /// Phase in which the relocation stopped.
    pub fn phase(&self) -> Phase {
        match self {
            RelocateError::InvalidPath { .. }
            | RelocateError::DestinationInsideSource { .. }
            | RelocateError::SourceMissing { .. }
            | RelocateError::DestinationExists { .. }
            | RelocateError::ParentCreateFailed { .. } => Phase::Validating,
            RelocateError::CopyFailed { .. } => Phase::CopyingTree,
            RelocateError::SourceCleanupFailed { .. } => Phase::DeletingSource,
            RelocateError::SourceStillPresent { .. } | RelocateError::DestinationMissing { .. } => {
                Phase::Verifying
            }
        }
    }

    pub fn residue(&self) -> Residue {
        if let RelocateError::CopyFailed {
            destination_written: false,
            ..
        } = self
        {
            return Residue::Untouched;
        }
        match self.phase() {
            Phase::Validating | Phase::AttemptingAtomicMove => Residue::Untouched,
            Phase::CopyingTree => Residue::SourceWithPartialDestination,
            Phase::DeletingSource => Residue::SourceWithCompleteDestination,
            Phase::Verifying => Residue::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residue_follows_phase() {
        let e = RelocateError::DestinationExists {
            path: PathBuf::from("/x"),
        };
        assert_eq!(e.phase(), Phase::Validating);
        assert_eq!(e.residue(), Residue::Untouched);

        let e = RelocateError::SourceCleanupFailed {
            source_dir: PathBuf::from("/a"),
            destination: PathBuf::from("/b"),
            source: DeleteError {
                path: PathBuf::from("/a"),
                attempts: 3,
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        };
        assert_eq!(e.code(), "source_cleanup_failed");
        assert_eq!(e.residue(), Residue::SourceWithCompleteDestination);
    }

    #[test]
    fn copy_that_wrote_nothing_is_untouched() {
        let failed = |destination_written| RelocateError::CopyFailed {
            source_dir: PathBuf::from("/a"),
            destination: PathBuf::from("/b"),
            destination_written,
            source: CopyError::InsufficientSpace {
                dest: PathBuf::from("/b"),
                required: 10,
                available: 1,
            },
        };
        assert_eq!(failed(false).residue(), Residue::Untouched);
        assert_eq!(failed(true).residue(), Residue::SourceWithPartialDestination);
        assert_eq!(failed(false).phase(), Phase::CopyingTree);
    }

    #[test]
    fn source_missing_mentions_probe_error() {
        let e = RelocateError::SourceMissing {
            path: PathBuf::from("/nope"),
            probe_error: Some("permission denied".into()),
        };
        let msg = e.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("permission denied"));

        let e = RelocateError::SourceMissing {
            path: PathBuf::from("/nope"),
            probe_error: None,
        };
        assert!(!e.to_string().contains("could not stat"));
    }
}
