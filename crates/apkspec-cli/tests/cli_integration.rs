//! CLI subprocess integration tests.
//!
//! These tests invoke the `apkspec` binary as a subprocess and verify exit
//! codes, stdout/stderr content, and JSON output stability.

use std::process::Command;

fn apkspec_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apkspec"))
}

fn write_manifest(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("buildozer.spec");
    std::fs::write(&path, content).unwrap();
    path
}

const VALID_MANIFEST: &str = r"[app]
title = Pest Repeller
package.name = pestrepeller
package.domain = org.example
source.dir = .
source.main = main.py
version = 1.0.0
requirements = python3,
    kivy==2.3.0,
    kivymd,
    numpy
orientation = portrait
fullscreen = 0

android.permissions = RECORD_AUDIO, INTERNET
android.api = 33
android.minapi = 21
android.archs = arm64-v8a, armeabi-v7a
android.accept_sdk_license = True

[buildozer]
log_level = 2
";

#[test]
fn cli_version_exits_zero() {
    let output = apkspec_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "apkspec --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("apkspec"),
        "version output must contain 'apkspec': {stdout}"
    );
}

#[test]
fn cli_help_lists_subcommands() {
    let output = apkspec_bin().arg("--help").output().unwrap();
    assert!(output.status.success(), "apkspec --help must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validate"), "help must list 'validate'");
    assert!(stdout.contains("fields"), "help must list 'fields'");
}

#[test]
fn validate_accepts_valid_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), VALID_MANIFEST);

    let output = apkspec_bin()
        .args(["validate", &manifest.to_string_lossy()])
        .output()
        .unwrap();

    assert!(output.status.success(), "valid manifest must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("package: org.example.pestrepeller"));
    assert!(stdout.contains("version: 1.0.0"));
    assert!(stdout.contains("kivy==2.3.0"));
}

#[test]
fn validate_json_output_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), VALID_MANIFEST);

    let run = || {
        let output = apkspec_bin()
            .args(["--json", "validate", &manifest.to_string_lossy()])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first, second, "JSON output must be byte-identical");

    let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed["package_name"], "pestrepeller");
    assert_eq!(parsed["version"], "1.0.0");
    assert_eq!(parsed["api_level"], 33);
    assert_eq!(
        parsed["permissions"],
        serde_json::json!(["INTERNET", "RECORD_AUDIO"])
    );
    assert_eq!(
        parsed["architectures"],
        serde_json::json!(["armeabi-v7a", "arm64-v8a"])
    );
}

#[test]
fn validate_reports_every_field_error() {
    let dir = tempfile::tempdir().unwrap();
    // Broken version and unknown orientation are two independent errors.
    let manifest = write_manifest(
        dir.path(),
        "[app]\ntitle = App\npackage.name = app\npackage.domain = org.example\nsource.main = main.py\nversion = 1.0\norientation = sideways\n",
    );

    let output = apkspec_bin()
        .args(["validate", &manifest.to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1), "invalid manifest must exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<_> = stderr.lines().collect();
    assert_eq!(lines.len(), 2, "one diagnostic per line: {stderr}");
    assert!(stderr.contains("version"));
    assert!(stderr.contains("orientation"));
}

#[test]
fn validate_json_diagnostics_are_a_structured_list() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        dir.path(),
        "[app]\ntitle = App\npackage.name = app\npackage.domain = org.example\nsource.main = main.py\nversion = 1.0.0\nandroid.api = 21\nandroid.minapi = 33\n",
    );

    let output = apkspec_bin()
        .args(["--json", "validate", &manifest.to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let list = parsed.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["stage"], "validator");
    assert_eq!(list[0]["field"], "android.minapi");
}

#[test]
fn validate_parse_error_names_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(dir.path(), "title = before any section\n");

    let output = apkspec_bin()
        .args(["validate", &manifest.to_string_lossy()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1"), "loader error must cite line: {stderr}");
}

#[test]
fn validate_unreadable_manifest_exits_two() {
    let output = apkspec_bin()
        .args(["validate", "/nonexistent/buildozer.spec"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read manifest"));
}

#[test]
fn fields_lists_the_schema() {
    let output = apkspec_bin().arg("fields").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("package.name"));
    assert!(stdout.contains("android.archs"));
    assert!(stdout.contains("[buildozer]"));
}

#[test]
fn fields_json_reports_requiredness() {
    let output = apkspec_bin().args(["--json", "fields"]).output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let list = parsed.as_array().unwrap();
    let version = list
        .iter()
        .find(|f| f["key"] == "version")
        .expect("version field listed");
    assert_eq!(version["required"], true);
}

#[test]
fn completions_generate_for_bash() {
    let output = apkspec_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(!output.stdout.is_empty());
}
