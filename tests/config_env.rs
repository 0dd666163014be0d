// tests/config_env.rs
// Config file resolution and env overrides. Env is process-global: run serially.

use std::{env, fs, path::PathBuf};

use sms_spam_guard::config::{ENV_CONFIG_PATH, ENV_HOT_RELOAD, ENV_MODEL_PATHS};
use sms_spam_guard::GuardConfig;

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_MODEL_PATHS);
    env::remove_var(ENV_HOT_RELOAD);
}

#[serial_test::serial]
#[test]
fn missing_config_file_means_defaults() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("absent.toml"));

    let cfg = GuardConfig::load().unwrap();
    assert_eq!(cfg, GuardConfig::default());
    clear_env();
}

#[serial_test::serial]
#[test]
fn file_then_env_overrides() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("guard.toml");
    fs::write(
        &path,
        r#"
[model]
paths = ["from_file.json"]
poll_secs = 10

[limits]
max_message_length = 160
"#,
    )
    .unwrap();
    env::set_var(ENV_CONFIG_PATH, &path);

    // 1) file only
    let cfg = GuardConfig::load().unwrap();
    assert_eq!(cfg.model.paths, vec![PathBuf::from("from_file.json")]);
    assert_eq!(cfg.model.poll_secs, 10);
    assert!(!cfg.model.hot_reload);
    assert_eq!(cfg.limits.max_message_length, 160);

    // 2) env wins for model paths and hot reload
    env::set_var(ENV_MODEL_PATHS, " a.json, ,b.json ");
    env::set_var(ENV_HOT_RELOAD, "1");
    let cfg = GuardConfig::load().unwrap();
    assert_eq!(
        cfg.model.paths,
        vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
    );
    assert!(cfg.model.hot_reload);
    assert_eq!(cfg.limits.max_message_length, 160);

    // 3) anything but "1" disables
    env::set_var(ENV_HOT_RELOAD, "yes");
    assert!(!GuardConfig::load().unwrap().model.hot_reload);

    clear_env();
}

#[serial_test::serial]
#[test]
fn malformed_config_file_is_an_error() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("guard.toml");
    fs::write(&path, "[model\npaths = ").unwrap();
    env::set_var(ENV_CONFIG_PATH, &path);

    let err = GuardConfig::load().unwrap_err();
    assert!(format!("{err:#}").contains("guard.toml"));
    clear_env();
}

#[serial_test::serial]
#[test]
fn sample_config_in_repo_parses() {
    let cfg = GuardConfig::load_from_file("config/spam_guard.toml").unwrap();
    assert_eq!(cfg.model.paths.len(), 3);
    assert_eq!(cfg.limits.max_message_length, 1000);
}
