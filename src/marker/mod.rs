//! Marker files.
//! A directory opts into sorting by carrying a small `key=value` file (default
//! `.filesort`) whose `type` names its category.

mod parse;
mod scan;

use std::path::PathBuf;

pub use parse::{parse_marker_file, parse_marker_str};
pub use scan::{scan, scan_direct, scan_recursive};

/// A directory with a usable marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEntry {
    /// Directory holding the marker.
    pub dir: PathBuf,
    /// Category from the marker's `type` line (not yet sanitized).
    pub category: String,
}
