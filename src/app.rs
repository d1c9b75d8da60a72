//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler, validates
//! the sort directory, scans for markers and runs the sort.

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info};

use filesort::cli::Args;
use filesort::config::{
    CONFIG_ENV, LoadResult, config_search_paths, load_or_init, validate_and_normalize,
};
use filesort::output as out;
use filesort::{CancelFlag, marker, sort};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_locations(&args);
        return Ok(());
    }

    // Create template config if none exists (before logging init)
    let (mut cfg, cfg_path) = match load_or_init(args.config_path().as_deref())? {
        LoadResult::Loaded { config, path } => (config, path),
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template filesort config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit the file to set `sort_dir` and the `accepted_categories` your markers use, then re-run this command.",
            );
            out::print_info(&format!(
                "To use a different location pass --config or set {CONFIG_ENV}."
            ));
            return Ok(());
        }
    };

    // Apply CLI overrides (CLI wins)
    args.apply_overrides(&mut cfg);

    // Initialize logging; the guard must outlive the run
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.request();
            out::print_warn("Received interrupt; finishing the current step and stopping...");
        })
        .context("failed to install signal handler")?;
    }

    debug!(config = %cfg_path.display(), "Starting filesort: {:?}", args);

    let result = (|| -> Result<()> {
        validate_and_normalize(&mut cfg)?;

        let entries = marker::scan(&cfg)
            .with_context(|| format!("cannot scan sort_dir '{}'", cfg.sort_dir.display()))?;
        info!(found = entries.len(), mode = %cfg.scan_mode, "Scanned for markers");

        let requests = sort::plan(&cfg.sort_dir, &entries);
        if requests.is_empty() {
            out::print_info("Nothing to sort.");
            return Ok(());
        }
        if cfg.dry_run {
            requests.iter().for_each(out::print_planned);
        }

        let relocator = sort::relocator_for(&cfg, &cancel);
        let report = sort::execute(&relocator, requests, cfg.dry_run, &cancel);
        out::print_report(&report);

        if report.has_failures() {
            error!(failed = report.failed.len(), "Some directories were not relocated");
            bail!("{} relocation(s) failed", report.failed.len());
        }
        Ok(())
    })();

    // Flush the file appender before exit
    drop(guard_opt);

    result
}

fn print_config_locations(args: &Args) {
    let candidates = config_search_paths(args.config_path().as_deref());
    out::print_info("filesort looks for its config in this order:");
    for path in &candidates {
        let state = if path.is_file() { "exists" } else { "missing" };
        out::print_user(&format!("  {} ({state})", path.display()));
    }
    match candidates.iter().find(|p| p.is_file()) {
        Some(p) => out::print_info(&format!("Active config: {}", p.display())),
        None => out::print_info(
            "No config file exists yet. Run without --print-config to create a template.",
        ),
    }
}
