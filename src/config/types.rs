//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel and ScanMode are small enums with forgiving string parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::MARKER_NAME_DEFAULT;
use crate::fs_ops::{DEFAULT_DELETE_ATTEMPTS, DEFAULT_DELETE_BACKOFF};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Where to look for marker files under the sort directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Only the immediate subdirectories.
    #[default]
    Direct,
    /// The whole tree.
    Recursive,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Direct => f.write_str("direct"),
            ScanMode::Recursive => f.write_str("recursive"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "shallow" => Ok(ScanMode::Direct),
            "recursive" | "deep" => Ok(ScanMode::Recursive),
            _ => Err(format!("invalid scan mode: '{s}' (expected direct or recursive)")),
        }
    }
}

/// Runtime configuration, built from the XML file and CLI overrides.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root that is scanned for markers and receives the category folders
    pub sort_dir: PathBuf,
    /// Category labels a marker may declare
    pub accepted_categories: Vec<String>,
    pub scan_mode: ScanMode,
    /// File name of the per-directory marker
    pub marker_name: String,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, log planned moves but do not modify the filesystem
    pub dry_run: bool,
    /// Copy atime/mtime in the fallback copy
    pub preserve_times: bool,
    /// Check destination free space before a fallback copy
    pub check_free_space: bool,
    /// Total attempts when removing a copied source
    pub delete_attempts: u32,
    /// Sleep between removal attempts
    pub delete_backoff: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sort_dir: PathBuf::new(),
            accepted_categories: Vec::new(),
            scan_mode: ScanMode::Direct,
            marker_name: MARKER_NAME_DEFAULT.to_string(),
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
            preserve_times: false,
            check_free_space: true,
            delete_attempts: DEFAULT_DELETE_ATTEMPTS,
            delete_backoff: DEFAULT_DELETE_BACKOFF,
        }
    }
}

impl Config {
    /// Construct a Config with a sort dir and accepted categories; other fields use defaults.
    pub fn new<I, S>(sort_dir: impl Into<PathBuf>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sort_dir: sort_dir.into(),
            accepted_categories: categories.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parsing() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse(" verbose "), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("bogus".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Info.to_string(), "info");
    }

    #[test]
    fn scan_mode_parsing() {
        assert_eq!("Recursive".parse::<ScanMode>(), Ok(ScanMode::Recursive));
        assert_eq!("direct".parse::<ScanMode>(), Ok(ScanMode::Direct));
        assert!("sideways".parse::<ScanMode>().is_err());
    }

    #[test]
    fn new_fills_defaults() {
        let cfg = Config::new("/tmp/sort", ["go", "rust"]);
        assert_eq!(cfg.accepted_categories, vec!["go", "rust"]);
        assert_eq!(cfg.marker_name, ".filesort");
        assert_eq!(cfg.delete_attempts, 3);
    }
}
