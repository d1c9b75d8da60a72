//! Core library for `filesort`.
//!
//! Finds project directories carrying a `.filesort` marker, works out which
//! category folder they belong in and relocates them there. The relocation
//! itself lives in [`fs_ops`]: rename first, copy + retrying delete as the
//! fallback, and a postcondition check either way.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod marker;
pub mod output;
pub mod platform;
pub mod sanitize;
pub mod shutdown;
pub mod sort;

pub use config::{
    Config, LoadResult, LogLevel, ScanMode, default_config_path, load_config_from_xml_path,
    path_has_symlink_ancestor,
};
pub use errors::{CopyError, DeleteError, MarkerError, Phase, RelocateError, Residue};
pub use fs_ops::{
    Copier, CopyStats, RelocationOutcome, RelocationRequest, Relocator, RetryingDeleter,
};
pub use marker::MarkerEntry;
pub use sanitize::sanitize;
pub use shutdown::CancelFlag;
pub use sort::{SortReport, execute, plan, relocator_for};
