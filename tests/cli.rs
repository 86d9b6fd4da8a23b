//! Integration tests for top-level CLI behavior.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const VALID: &str = r#"
region: ap-southeast-1
contacts:
  - alias: lmhung
    name: L M Hung
    channels:
      - { type: EMAIL, address: lmhung@example.com }
      - { type: SMS, address: "+84900000001" }
  - alias: ntquy
    name: N T Quy
    channels:
      - { type: VOICE, address: "+84900000002" }
response_plans:
  - name: prod-critical
    contacts: [lmhung, ntquy]
"#;

fn run_oncall(args: &[&str], envs: &[(&str, &Path)]) -> Output {
    let bin = env!("CARGO_BIN_EXE_oncall");
    let mut command = Command::new(bin);
    command
        .args(args)
        .env_remove("ONCALL_CONFIG")
        .env_remove("ONCALL_RECORD")
        .env_remove("ONCALL_REPLAY")
        .env("RUST_LOG", "oncall=warn");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("failed to run oncall binary")
}

fn write_config(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("oncall_cli_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("oncall.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_accepts_good_config() {
    let config = write_config("valid", VALID);
    let output = run_oncall(&["--config", config.to_str().unwrap(), "validate"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Configuration OK: 2 contact(s), 3 channel(s), 1 response plan(s)"));
    assert!(stdout.contains("ap-southeast-1"));
}

#[test]
fn validate_rejects_undefined_alias() {
    let config = write_config(
        "invalid",
        "response_plans:\n  - name: p\n    contacts: [ghost]\n",
    );
    let output = run_oncall(&["--config", config.to_str().unwrap(), "validate"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("invalid configuration"));
    assert!(stderr.contains("undefined contact ghost"));
}

#[test]
fn missing_config_shows_error() {
    let output = run_oncall(&["--config", "/nonexistent/oncall.yaml", "apply"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("failed to read config /nonexistent/oncall.yaml"));
}

#[test]
fn config_path_can_come_from_environment() {
    let config = write_config("env", VALID);
    let output = run_oncall(&["validate"], &[("ONCALL_CONFIG", config.as_path())]);
    assert!(output.status.success());
}

#[test]
fn help_lists_subcommands() {
    let output = run_oncall(&["--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("apply"));
    assert!(stdout.contains("delete"));
    assert!(stdout.contains("validate"));
}

#[test]
fn delete_help_shows_flags() {
    let output = run_oncall(&["delete", "--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--yes"));
}

#[cfg(not(feature = "aws"))]
#[test]
fn apply_without_aws_support_explains_how_to_enable_it() {
    let config = write_config("noaws", VALID);
    let output = run_oncall(&["--config", config.to_str().unwrap(), "apply"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--features aws"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_oncall(&["nonsense"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn replay_directory_without_cassettes_is_an_error() {
    let config = write_config("replay_empty", VALID);
    let empty = config.parent().unwrap().join("cassettes");
    std::fs::create_dir_all(&empty).unwrap();

    let output = run_oncall(
        &["--config", config.to_str().unwrap(), "apply"],
        &[("ONCALL_REPLAY", empty.as_path())],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("No contacts, plans, identity cassette(s)"));
    assert!(!stderr.contains("panicked"));
}
