use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

use filesort::config::{CONFIG_ENV, LoadResult, load_or_init, validate_and_normalize};
use filesort::{LogLevel, ScanMode, load_config_from_xml_path};

#[test]
fn reads_every_field() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let sort_dir = td.path().join("sorted");
    let xml = format!(
        r#"<config>
  <sort_dir>{}</sort_dir>
  <accepted_categories>
    <category>go</category>
    <category> rust </category>
  </accepted_categories>
  <scan_mode>recursive</scan_mode>
  <marker_name>.project</marker_name>
  <log_level>debug</log_level>
  <log_file>{}</log_file>
  <delete_attempts> 5 </delete_attempts>
  <delete_backoff_ms>250</delete_backoff_ms>
  <preserve_times>true</preserve_times>
  <check_free_space>false</check_free_space>
</config>"#,
        sort_dir.display(),
        td.path().join("fs.log").display()
    );
    fs::write(&cfg_path, xml).unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.sort_dir, sort_dir);
    assert_eq!(cfg.accepted_categories, vec!["go", "rust"]);
    assert_eq!(cfg.scan_mode, ScanMode::Recursive);
    assert_eq!(cfg.marker_name, ".project");
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file, Some(td.path().join("fs.log")));
    assert_eq!(cfg.delete_attempts, 5);
    assert_eq!(cfg.delete_backoff, Duration::from_millis(250));
    assert!(cfg.preserve_times);
    assert!(!cfg.check_free_space);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config><sort_dir>/srv/code</sort_dir><log_file>  </log_file></config>",
    )
    .unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.sort_dir, PathBuf::from("/srv/code"));
    assert!(cfg.accepted_categories.is_empty());
    assert_eq!(cfg.scan_mode, ScanMode::Direct);
    assert_eq!(cfg.marker_name, ".filesort");
    assert_eq!(cfg.log_file, None);
    assert_eq!(cfg.delete_attempts, 3);
    assert_eq!(cfg.delete_backoff, Duration::from_millis(100));
    assert!(cfg.check_free_space);
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><sort_dir>/x</config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());

    fs::write(&cfg_path, "<config><delete_attempts>many</delete_attempts></config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn loaded_config_validates_and_creates_sort_dir() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let sort_dir = td.path().join("new/sorted");
    fs::write(
        &cfg_path,
        format!(
            "<config><sort_dir>{}</sort_dir><accepted_categories><category>go</category></accepted_categories></config>",
            sort_dir.display()
        ),
    )
    .unwrap();

    let mut cfg = load_config_from_xml_path(&cfg_path).unwrap();
    validate_and_normalize(&mut cfg).unwrap();
    assert!(sort_dir.is_dir());
    assert!(cfg.sort_dir.is_absolute());
}

#[test]
#[serial]
fn env_variable_selects_config() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("from_env.xml");
    fs::write(&cfg_path, "<config><sort_dir>/from/env</sort_dir></config>").unwrap();

    // Serialized so no other test sees the variable.
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg_path);
    }
    let result = load_or_init(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    match result.unwrap() {
        LoadResult::Loaded { config, path } => {
            assert_eq!(path, cfg_path);
            assert_eq!(config.sort_dir, PathBuf::from("/from/env"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
#[serial]
fn explicit_path_wins_over_env_and_must_exist() {
    let td = tempdir().unwrap();
    let env_cfg = td.path().join("env.xml");
    let flag_cfg = td.path().join("flag.xml");
    fs::write(&env_cfg, "<config><sort_dir>/env</sort_dir></config>").unwrap();
    fs::write(&flag_cfg, "<config><sort_dir>/flag</sort_dir></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &env_cfg);
    }
    let chosen = load_or_init(Some(&flag_cfg));
    let missing = load_or_init(Some(&td.path().join("absent.xml")));
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    match chosen.unwrap() {
        LoadResult::Loaded { config, .. } => assert_eq!(config.sort_dir, PathBuf::from("/flag")),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(missing.is_err());
}
