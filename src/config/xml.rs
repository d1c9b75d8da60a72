//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Walks the discovery list and creates a template when nothing is found.
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::paths::{
    CONFIG_ENV, config_search_paths, default_config_path, default_log_path, expand_home,
    path_has_symlink_ancestor,
};
use super::types::{Config, LogLevel, ScanMode};
use crate::fs_ops::{DEFAULT_DELETE_ATTEMPTS, DEFAULT_DELETE_BACKOFF};
use crate::platform::write_config_secure_new_0600;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    sort_dir: Option<String>,
    accepted_categories: Option<XmlCategories>,
    scan_mode: Option<String>,
    marker_name: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    preserve_times: Option<bool>,
    check_free_space: Option<bool>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    delete_attempts: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    delete_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlCategories {
    #[serde(rename = "category", default)]
    items: Vec<String>,
}

/// Outcome of config discovery.
#[derive(Debug)]
pub enum LoadResult {
    /// A config file was found and parsed.
    Loaded { config: Config, path: PathBuf },
    /// Nothing was found; a template was written here for the user to edit.
    CreatedTemplate(PathBuf),
}

// Trims surrounding whitespace before parsing an optional integer.
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<u64>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config, validating the enumerated fields.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.sort_dir.as_deref()) {
        cfg.sort_dir = expand_home(Path::new(s));
    }
    if let Some(list) = parsed.accepted_categories {
        cfg.accepted_categories = list
            .items
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if let Some(s) = non_empty(parsed.scan_mode.as_deref()) {
        cfg.scan_mode = s.parse::<ScanMode>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.marker_name.as_deref()) {
        cfg.marker_name = s.to_string();
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(|s| expand_home(Path::new(s)));
    if let Some(b) = parsed.preserve_times {
        cfg.preserve_times = b;
    }
    if let Some(b) = parsed.check_free_space {
        cfg.check_free_space = b;
    }
    cfg.delete_attempts = match parsed.delete_attempts {
        Some(n) => u32::try_from(n).context("delete_attempts is too large")?,
        None => DEFAULT_DELETE_ATTEMPTS,
    };
    cfg.delete_backoff = parsed
        .delete_backoff_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DELETE_BACKOFF);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg =
        xml_to_config(parsed).with_context(|| format!("invalid config '{}'", path.display()))?;
    debug!(path = %path.display(), sort_dir = %cfg.sort_dir.display(), "loaded config");
    Ok(cfg)
}

/// Find and load the config. An explicit path or $FILESORT_CONFIG must exist;
/// otherwise the first existing candidate wins, and a template is created at the
/// per-user default location when there is none.
pub fn load_or_init(explicit: Option<&Path>) -> Result<LoadResult> {
    let pinned = explicit.map(expand_home).or_else(|| {
        env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(|v| expand_home(Path::new(&v)))
    });
    if let Some(path) = pinned {
        if !path.is_file() {
            bail!("config file '{}' does not exist", path.display());
        }
        let config = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded { config, path });
    }

    for candidate in config_search_paths(None) {
        if candidate.is_file() {
            let config = load_config_from_xml_path(&candidate)?;
            return Ok(LoadResult::Loaded {
                config,
                path: candidate,
            });
        }
    }

    let path = default_config_path()
        .context("no config.xml found and no default config location could be determined")?;
    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Write a commented template config (0600 on Unix). Refuses symlinked ancestors.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/filesort.log".into());

    let content = format!(
        "<!--\n  filesort configuration (XML)\n\n    sort_dir             -> directory scanned for marker files; category folders are created here\n    accepted_categories  -> labels a marker's `type=` line may use\n    scan_mode            -> direct (immediate subdirectories) | recursive (whole tree)\n    marker_name          -> marker file name (default .filesort)\n    log_level            -> quiet | normal | info | debug\n    log_file             -> optional log file (stdout is always used)\n    delete_attempts      -> tries when removing a copied source (fallback path)\n    delete_backoff_ms    -> pause between those tries\n    preserve_times       -> copy timestamps in the fallback copy\n    check_free_space     -> refuse a fallback copy that would not fit\n\n  CLI flags override XML values.\n-->\n<config>\n  <sort_dir>~/Coding</sort_dir>\n  <accepted_categories>\n    <category>go</category>\n    <category>rust</category>\n    <category>python</category>\n  </accepted_categories>\n  <scan_mode>direct</scan_mode>\n  <marker_name>.filesort</marker_name>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <delete_attempts>{}</delete_attempts>\n  <delete_backoff_ms>{}</delete_backoff_ms>\n  <preserve_times>false</preserve_times>\n  <check_free_space>true</check_free_space>\n</config>\n",
        suggested_log,
        DEFAULT_DELETE_ATTEMPTS,
        DEFAULT_DELETE_BACKOFF.as_millis()
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
