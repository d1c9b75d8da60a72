//! Config validation logic.
//! Ensures the sort directory exists (creating it if needed) and is writable, then
//! resolves it to a canonical path. Also checks the category list and marker name.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use super::paths::expand_home;
use super::types::Config;
use crate::fs_ops::io_error_with_help;

/// Validate `cfg` in place; `sort_dir` is replaced by its canonical form.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.sort_dir.as_os_str().is_empty() {
        bail!("sort_dir is not set; add <sort_dir> to the config or pass --sort-dir");
    }
    let expanded = expand_home(&cfg.sort_dir);
    let sort_dir = std::path::absolute(&expanded)
        .with_context(|| format!("cannot resolve sort_dir '{}'", expanded.display()))?;

    ensure_dir_is_or_create(&sort_dir, "sort_dir")?;
    ensure_writable(&sort_dir, "sort_dir")?;
    cfg.sort_dir = dunce::canonicalize(&sort_dir)
        .with_context(|| format!("cannot canonicalize sort_dir '{}'", sort_dir.display()))?;

    cfg.accepted_categories = cfg
        .accepted_categories
        .iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if cfg.accepted_categories.is_empty() {
        bail!("accepted_categories is empty; list at least one <category>");
    }

    let marker = cfg.marker_name.trim();
    if marker.is_empty() || marker.contains(['/', '\\']) || marker == "." || marker == ".." {
        bail!("marker_name '{}' must be a plain file name", cfg.marker_name);
    }
    cfg.marker_name = marker.to_string();

    if cfg.delete_attempts == 0 {
        bail!("delete_attempts must be at least 1");
    }

    info!(
        "Config validated: sort_dir='{}' categories={} scan_mode={} log_file='{}'",
        cfg.sort_dir.display(),
        cfg.accepted_categories.join(","),
        cfg.scan_mode,
        cfg.log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".into())
    );
    Ok(())
}

/// Ensure directory exists (create if missing). If exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{name} exists but isn't a directory: {}", path.display());
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .map_err(io_error_with_help("create directory", path))
            .with_context(|| format!("Failed to create {name}"))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    let probe = path.join(format!(".filesort_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
        .with_context(|| {
            format!("Cannot write to {name} '{}'; check permissions", path.display())
        })?;
    let _ = fs::remove_file(&probe);
    debug!("{name} writable: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cfg_for(dir: &Path) -> Config {
        Config::new(dir, ["go", " rust ", ""])
    }

    #[test]
    fn creates_missing_sort_dir_and_trims_categories() {
        let td = tempdir().unwrap();
        let dir = td.path().join("a/b/sorted");
        let mut cfg = cfg_for(&dir);
        validate_and_normalize(&mut cfg).unwrap();
        assert!(dir.is_dir());
        assert_eq!(cfg.sort_dir, dunce::canonicalize(&dir).unwrap());
        assert_eq!(cfg.accepted_categories, vec!["go", "rust"]);
    }

    #[test]
    fn rejects_file_as_sort_dir() {
        let td = tempdir().unwrap();
        let file = td.path().join("f");
        fs::write(&file, "x").unwrap();
        let mut cfg = cfg_for(&file);
        assert!(validate_and_normalize(&mut cfg).is_err());
    }

    #[test]
    fn rejects_empty_categories_and_bad_marker() {
        let td = tempdir().unwrap();
        let mut cfg = Config::new(td.path(), Vec::<String>::new());
        assert!(validate_and_normalize(&mut cfg).is_err());

        let mut cfg = cfg_for(td.path());
        cfg.marker_name = "a/b".into();
        assert!(validate_and_normalize(&mut cfg).is_err());
    }
}
