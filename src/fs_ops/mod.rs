//! Filesystem operations: the directory relocation core.

pub mod atomic;
pub mod copy;
pub mod delete;
pub mod helpers;
pub mod metadata;
pub mod path_check;
pub mod relocate;
mod space;

pub use atomic::{Renamer, StdRenamer};
pub use copy::{Copier, CopyStats, TreeCopier};
pub use delete::{
    DEFAULT_DELETE_ATTEMPTS, DEFAULT_DELETE_BACKOFF, RetryingDeleter, StdRemover, TreeRemover,
};
pub use helpers::io_error_with_help;
pub use path_check::{dir_exists, normalize, probe_dir};
pub use relocate::{RelocationOutcome, RelocationRequest, Relocator, ensure_parent_dir};
