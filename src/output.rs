//! User-facing messages.
//! Small wrappers around stdout/stderr printing with consistent prefixes. Colors
//! are enabled only when stdout is a TTY.

use owo_colors::OwoColorize;

use crate::fs_ops::RelocationRequest;
use crate::sort::SortReport;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// One line per planned move, for --dry-run. Plain so it can be scripted against.
pub fn print_planned(req: &RelocationRequest) {
    println!(
        "would move '{}' -> '{}' ({})",
        req.source.display(),
        req.destination.display(),
        req.category
    );
}

/// End-of-run summary; failures go to stderr with their code.
pub fn print_report(report: &SortReport) {
    let line = format!(
        "{} relocated ({} renamed, {} copied), {} skipped, {} failed",
        report.succeeded(),
        report.moved,
        report.copied,
        report.skipped,
        report.failed.len()
    );
    if report.has_failures() {
        print_warn(&line);
        for (req, err) in &report.failed {
            print_error(&format!("[{}] {}: {}", err.code(), req.source.display(), err));
        }
    } else {
        print_success(&line);
    }
}

/// Print a plain user-facing line (no prefix).
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
