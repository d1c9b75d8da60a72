use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

use assert_cmd::prelude::*;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("filesort"))
}

fn write_config(dir: &TempDir, sort_dir: &std::path::Path) -> assert_fs::fixture::ChildPath {
    let cfg = dir.child("config.xml");
    cfg.write_str(&format!(
        "<config>\n  <sort_dir>{}</sort_dir>\n  <accepted_categories>\n    <category>go</category>\n  </accepted_categories>\n  <log_level>quiet</log_level>\n</config>\n",
        sort_dir.display()
    ))
    .unwrap();
    cfg
}

#[test]
fn print_config_lists_locations() {
    let td = TempDir::new().unwrap();
    let cfg = write_config(&td, td.path());
    bin()
        .arg("--print-config")
        .arg("--config")
        .arg(cfg.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.xml (exists)"));
}

#[test]
fn sorts_using_env_config() {
    let td = TempDir::new().unwrap();
    let sort_dir = td.child("code");
    sort_dir.child("svc/.filesort").write_str("type=go\n").unwrap();
    sort_dir.child("svc/main.go").write_str("package main\n").unwrap();
    let cfg = write_config(&td, sort_dir.path());

    bin()
        .env("FILESORT_CONFIG", cfg.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 relocated"));

    sort_dir.child("go/svc/main.go").assert(predicate::path::is_file());
    sort_dir.child("svc").assert(predicate::path::missing());
}

#[test]
fn dry_run_reports_without_moving() {
    let td = TempDir::new().unwrap();
    let sort_dir = td.child("code");
    sort_dir.child("svc/.filesort").write_str("type=go\n").unwrap();
    let cfg = write_config(&td, sort_dir.path());

    bin()
        .arg("--config")
        .arg(cfg.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("would move"));

    sort_dir.child("svc/.filesort").assert(predicate::path::is_file());
    sort_dir.child("go").assert(predicate::path::missing());
}

#[test]
fn failed_relocation_gives_nonzero_exit() {
    let td = TempDir::new().unwrap();
    let sort_dir = td.child("code");
    sort_dir.child("svc/.filesort").write_str("type=go\n").unwrap();
    sort_dir.child("go/svc/keep.txt").write_str("x").unwrap();
    let cfg = write_config(&td, sort_dir.path());

    bin()
        .arg("--config")
        .arg(cfg.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination_exists"));

    sort_dir.child("svc/.filesort").assert(predicate::path::is_file());
}

#[test]
fn missing_explicit_config_fails() {
    let td = TempDir::new().unwrap();
    bin()
        .arg("--config")
        .arg(td.path().join("nope.xml"))
        .assert()
        .failure();
}

#[cfg(target_os = "linux")]
#[test]
fn creates_template_when_nothing_found() {
    let td = TempDir::new().unwrap();
    let xdg = td.child("xdg");
    bin()
        .current_dir(td.path())
        .env_remove("FILESORT_CONFIG")
        .env("XDG_CONFIG_HOME", xdg.path())
        .env("HOME", td.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("template"));

    xdg.child("filesort/config.xml").assert(predicate::path::is_file());
}
