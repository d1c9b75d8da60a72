//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug and wins over it.
//! - Path flags have surrounding quotes stripped (PowerShell/CMD leave them in).

use clap::{Parser, ValueHint};
use std::path::{Path, PathBuf};

use crate::config::types::{Config, LogLevel, ScanMode};

/// Sort project directories into category folders based on their marker file.
/// CLI flags override config values (which are loaded from XML).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Sort marked project directories into category folders"
)]
pub struct Args {
    /// Use this config file instead of searching for one.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the sort directory (normally configured via XML).
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the sort directory")]
    pub sort_dir: Option<PathBuf>,

    /// Look for markers in the whole tree, not only immediate subdirectories.
    #[arg(short = 'r', long, help = "Scan the whole tree below the sort directory")]
    pub recursive: bool,

    /// Dry-run: log actions but do not modify the filesystem.
    #[arg(
        long,
        help = "Show what would be done, but do not modify files/directories"
    )]
    pub dry_run: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Copy timestamps when a directory has to be copied instead of renamed.
    #[arg(long, help = "Preserve atime/mtime in the copy fallback")]
    pub preserve_times: bool,

    /// Print where filesort will look for the config file, then exit.
    #[arg(
        long,
        help = "Print the config file locations filesort searches and exit"
    )]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Explicit config path, quotes stripped.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.as_deref().map(strip_quotes)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dir) = &self.sort_dir {
            cfg.sort_dir = strip_quotes(dir);
        }
        if self.recursive {
            cfg.scan_mode = ScanMode::Recursive;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(strip_quotes(file));
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.preserve_times {
            cfg.preserve_times = true;
        }
    }
}

// Trim surrounding single/double quotes and one trailing separator.
fn strip_quotes(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    let trimmed = s.trim();
    let mut inner = trimmed.trim_matches(|c| c == '\'' || c == '"').to_string();
    if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
        inner.pop();
    }
    PathBuf::from(inner)
}

pub fn parse() -> Args {
    Args::parse()
}
