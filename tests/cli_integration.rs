//! CLI smoke tests.
//!
//! Every command takes explicit `--shortcuts-file` / `--config-file` flags,
//! so the tests never depend on a Steam installation being present.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

const STEAM_SKELETON: &str = "\"InstallConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"Valve\"\n\t\t{\n\t\t\t\"Steam\"\n\t\t\t{\n\t\t\t}\n\t\t}\n\t}\n}\n";

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_add_help() {
    let output = run(&["add", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Register one application as a non-Steam shortcut"));
}

#[test]
fn test_add_then_list() {
    let dir = TempDir::new().unwrap();
    let shortcuts = dir.path().join("shortcuts.vdf");
    let shortcuts_arg = shortcuts.to_str().unwrap();

    let output = run(&[
        "add",
        "--name",
        "Test Game",
        "--exe",
        "/usr/bin/true",
        "--shortcuts-file",
        shortcuts_arg,
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Registered 'Test Game'"));

    let output = run(&["list", "--shortcuts-file", shortcuts_arg, "--json"]);
    assert!(output.status.success());
    let entries: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON from list --json");
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert!(entries[0]["app_id"].as_u64().unwrap() >= 1_000_000_000);
}

#[test]
fn test_add_rejects_empty_name() {
    let dir = TempDir::new().unwrap();
    let shortcuts = dir.path().join("shortcuts.vdf");

    let output = run(&[
        "add",
        "--name",
        "",
        "--exe",
        "/usr/bin/true",
        "--shortcuts-file",
        shortcuts.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(!shortcuts.exists());
}

#[test]
fn test_set_compat_dry_run_does_not_modify() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.vdf");
    fs::write(&config, STEAM_SKELETON).unwrap();

    let output = run(&[
        "set-compat",
        "123456789",
        "proton-9",
        "--config-file",
        config.to_str().unwrap(),
        "--dry-run",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would map app ID 123456789"));
    assert_eq!(fs::read_to_string(&config).unwrap(), STEAM_SKELETON);
}

#[test]
fn test_set_compat_applies() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.vdf");
    fs::write(&config, STEAM_SKELETON).unwrap();

    let output = run(&[
        "set-compat",
        "123456789",
        "proton-9",
        "--config-file",
        config.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("\"123456789\""));
    assert!(content.contains("\"name\" \"proton-9\""));
}

#[test]
fn test_apply_manifest() {
    let dir = TempDir::new().unwrap();
    let shortcuts = dir.path().join("shortcuts.vdf");
    let config = dir.path().join("config.vdf");
    fs::write(&config, STEAM_SKELETON).unwrap();

    let manifest = dir.path().join("apps.toml");
    fs::write(
        &manifest,
        r#"[meta]
name = "test batch"

[[apps]]
name = "First"
exe = "/usr/bin/true"

[[apps]]
name = "Second"
exe = "/usr/bin/false"
compat_tool = "proton-9"
"#,
    )
    .unwrap();

    let output = run(&[
        "apply",
        manifest.to_str().unwrap(),
        "--shortcuts-file",
        shortcuts.to_str().unwrap(),
        "--config-file",
        config.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("Summary:"));
    assert!(stdout.contains("2 registered"));
    assert!(shortcuts.exists());
    assert!(fs::read_to_string(&config).unwrap().contains("proton-9"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run(&[
        "set-compat",
        "1",
        "proton-9",
        "--config-file",
        "/nonexistent/config.vdf",
    ]);
    assert!(!output.status.success());
}
