//! End-to-end CLI integration tests using test fixtures.
//!
//! Each fixture in `tests/fixtures/` contains an `inventory.json` served as the storage
//! provider, plus golden reports (`expected.report.json`, `expected.remediation.json`) whose
//! timestamps use the "__TIMESTAMP__" placeholder.
//!
//! Inventories are copied into a temp dir first so approve runs never touch the fixtures.

use assert_cmd::Command;
use bucketguard_test_util::normalize_nondeterministic;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a Command for the bucketguard binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn bucketguard_cmd() -> Command {
    Command::cargo_bin("bucketguard").expect("bucketguard binary not found - run `cargo build` first")
}

/// Get the path to the test fixtures directory
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("bucketguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Copy a fixture's files into a fresh temp dir.
fn stage_fixture(fixture_name: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src = fixtures_dir().join(fixture_name);
    for entry in std::fs::read_dir(&src).expect("Failed to read fixture dir") {
        let entry = entry.expect("Failed to read fixture entry");
        std::fs::copy(entry.path(), temp_dir.path().join(entry.file_name()))
            .expect("Failed to copy fixture file");
    }
    temp_dir
}

/// A command rooted in `dir`, with no config file and narration disabled.
fn cmd_in(dir: &Path) -> Command {
    let mut cmd = bucketguard_cmd();
    cmd.current_dir(dir).env_remove("GOOGLE_API_KEY");
    cmd
}

fn read_json(path: &Path) -> Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    serde_json::from_str(&content).expect("Failed to parse JSON")
}

fn load_expected(fixture_name: &str, file: &str) -> Value {
    read_json(&fixtures_dir().join(fixture_name).join(file))
}

fn assert_reports_match(actual: Value, expected: Value, fixture_name: &str) {
    let actual_normalized = normalize_nondeterministic(actual);
    let expected_normalized = normalize_nondeterministic(expected);

    assert_eq!(
        actual_normalized,
        expected_normalized,
        "Report mismatch for fixture '{}'.\n\nActual:\n{}\n\nExpected:\n{}",
        fixture_name,
        serde_json::to_string_pretty(&actual_normalized).unwrap(),
        serde_json::to_string_pretty(&expected_normalized).unwrap()
    );
}

/// Run `scan` in a staged copy of the fixture; returns (exit code, report, staged dir).
fn run_scan_on_fixture(fixture_name: &str, extra: &[&str]) -> (i32, Value, TempDir) {
    let dir = stage_fixture(fixture_name);
    let output = cmd_in(dir.path())
        .arg("scan")
        .args(extra)
        .output()
        .expect("Failed to run command");
    let exit_code = output.status.code().unwrap_or(-1);
    let report = read_json(&dir.path().join("findings.json"));
    (exit_code, report, dir)
}

// ============================================================================
// scan
// ============================================================================

#[test]
fn fixture_clean_passes() {
    let (exit_code, report, _dir) = run_scan_on_fixture("clean", &[]);
    assert_eq!(exit_code, 0, "clean fixture should exit with 0");
    assert_reports_match(report, load_expected("clean", "expected.report.json"), "clean");
}

#[test]
fn fixture_clean_prints_ok_message() {
    let dir = stage_fixture("clean");
    cmd_in(dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] No security issues found!"));
}

#[test]
fn fixture_exposed_fails_on_critical() {
    let (exit_code, report, _dir) = run_scan_on_fixture("exposed", &[]);
    assert_eq!(exit_code, 2, "critical findings should exit with 2");
    assert_reports_match(
        report,
        load_expected("exposed", "expected.report.json"),
        "exposed",
    );
}

#[test]
fn fixture_exposed_passes_with_fail_on_none() {
    let (exit_code, report, _dir) = run_scan_on_fixture("exposed", &["--fail-on", "NONE"]);
    assert_eq!(exit_code, 0);
    assert_eq!(report["summary"]["critical"], 2);
}

#[test]
fn allowlist_limits_scanned_buckets() {
    let (exit_code, report, _dir) =
        run_scan_on_fixture("exposed", &["--allow-buckets", "vault, site"]);
    assert_eq!(exit_code, 2);
    assert_eq!(report["scanned_count"], 2);
    let buckets: Vec<&str> = report["findings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["bucket"].as_str().unwrap())
        .collect();
    assert_eq!(buckets, vec!["site"]);
}

#[test]
fn empty_allowlist_flag_overrides_config_allowlist() {
    let dir = stage_fixture("exposed");
    std::fs::write(
        dir.path().join("bucketguard.toml"),
        "allow_buckets = [\"vault\"]\n",
    )
    .unwrap();
    let output = cmd_in(dir.path())
        .args(["scan", "--allow-buckets", ","])
        .output()
        .expect("Failed to run command");
    assert_eq!(output.status.code(), Some(2));
    let report = read_json(&dir.path().join("findings.json"));
    assert_eq!(report["scanned_count"], 3);
}

#[test]
fn config_file_sets_fail_on() {
    let dir = stage_fixture("access_denied");
    std::fs::write(dir.path().join("bucketguard.toml"), "fail_on = \"HIGH\"\n").unwrap();
    cmd_in(dir.path()).arg("scan").assert().code(2);
}

#[test]
fn fixture_access_denied_is_high_not_fatal() {
    let (exit_code, report, _dir) = run_scan_on_fixture("access_denied", &[]);
    assert_eq!(exit_code, 0, "HIGH is below the default CRITICAL threshold");
    assert_reports_match(
        report,
        load_expected("access_denied", "expected.report.json"),
        "access_denied",
    );
}

#[test]
fn scan_writes_markdown_when_requested() {
    let dir = stage_fixture("exposed");
    cmd_in(dir.path())
        .args(["scan", "--markdown-out", "out/report.md"])
        .assert()
        .code(2);
    let md = std::fs::read_to_string(dir.path().join("out/report.md")).unwrap();
    assert!(md.starts_with("# Bucketguard scan report"));
    assert!(md.contains("`logs`"));
}

#[test]
fn missing_inventory_is_fatal() {
    let dir = TempDir::new().unwrap();
    cmd_in(dir.path())
        .arg("scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bucketguard error"))
        .stderr(predicate::str::contains("open inventory"));
    assert!(!dir.path().join("findings.json").exists());
}

#[test]
fn listing_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("inventory.json"),
        r#"{"list_error": {"code": "InvalidAccessKeyId"}, "buckets": []}"#,
    )
    .unwrap();
    cmd_in(dir.path())
        .arg("scan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("list buckets"));
}

#[test]
fn invalid_config_is_fatal() {
    let dir = stage_fixture("clean");
    std::fs::write(
        dir.path().join("bucketguard.toml"),
        "[checks.\"s3.unknown\"]\nenabled = true\n",
    )
    .unwrap();
    cmd_in(dir.path()).arg("scan").assert().code(1);
}

// ============================================================================
// remediate
// ============================================================================

#[test]
fn dry_run_leaves_inventory_unchanged() {
    let (_, _, dir) = run_scan_on_fixture("exposed", &[]);
    let before = std::fs::read(dir.path().join("inventory.json")).unwrap();

    cmd_in(dir.path())
        .arg("remediate")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    let after = std::fs::read(dir.path().join("inventory.json")).unwrap();
    assert_eq!(before, after);

    let report = read_json(&dir.path().join("remediation.json"));
    assert_eq!(report["approve_mode"], false);
    assert_eq!(report["targets"], 2);
    assert_eq!(report["summary"]["dry_run"], 2);
    for action in report["actions"].as_array().unwrap() {
        assert_eq!(action["status"], "DRY_RUN");
        assert!(action["error"].is_null());
    }
}

#[test]
fn dry_run_does_not_need_an_inventory() {
    let dir = stage_fixture("missing_bucket");
    std::fs::remove_file(dir.path().join("inventory.json")).unwrap();
    cmd_in(dir.path()).arg("remediate").assert().success();
}

#[test]
fn approve_isolates_write_failure() {
    let (scan_code, _, dir) = run_scan_on_fixture("write_failure", &[]);
    assert_eq!(scan_code, 2);

    cmd_in(dir.path())
        .args(["remediate", "--approve"])
        .assert()
        .code(1);

    assert_reports_match(
        read_json(&dir.path().join("remediation.json")),
        load_expected("write_failure", "expected.remediation.json"),
        "write_failure",
    );

    // Successful writes are persisted; the failed bucket is untouched.
    let inventory = read_json(&dir.path().join("inventory.json"));
    let buckets = inventory["buckets"].as_array().unwrap();
    assert_eq!(buckets[0]["public_access_block"]["IgnorePublicAcls"], true);
    assert!(buckets[1].get("public_access_block").is_none());
    assert_eq!(buckets[2]["public_access_block"]["BlockPublicAcls"], true);
}

#[test]
fn rescan_after_approve_only_reports_the_failed_bucket() {
    let (_, _, dir) = run_scan_on_fixture("write_failure", &[]);
    cmd_in(dir.path())
        .args(["remediate", "--approve"])
        .assert()
        .code(1);

    cmd_in(dir.path()).arg("scan").assert().code(2);
    let report = read_json(&dir.path().join("findings.json"));
    assert_eq!(report["summary"]["critical"], 1);
    assert_eq!(report["findings"][0]["bucket"], "two");
}

#[test]
fn reapplying_is_idempotent() {
    let (_, _, dir) = run_scan_on_fixture("exposed", &[]);
    cmd_in(dir.path())
        .args(["remediate", "--approve"])
        .assert()
        .success();
    let first = std::fs::read(dir.path().join("inventory.json")).unwrap();

    cmd_in(dir.path())
        .args(["remediate", "--approve"])
        .assert()
        .success();
    let second = std::fs::read(dir.path().join("inventory.json")).unwrap();
    assert_eq!(first, second);

    let report = read_json(&dir.path().join("remediation.json"));
    assert_eq!(report["summary"]["applied"], 2);
}

#[test]
fn missing_bucket_is_skipped() {
    let dir = stage_fixture("missing_bucket");
    cmd_in(dir.path())
        .args(["remediate", "--approve"])
        .assert()
        .success();

    let report = read_json(&dir.path().join("remediation.json"));
    assert_eq!(report["targets"], 1);
    assert_eq!(report["summary"]["skipped"], 1);
    assert_eq!(report["actions"][0]["status"], "SKIPPED");
    assert_eq!(
        report["actions"][0]["error"],
        "Missing bucket name in finding."
    );
}

#[test]
fn missing_findings_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    cmd_in(dir.path())
        .args(["remediate", "--input", "nope.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read findings"));
    assert!(!dir.path().join("remediation.json").exists());
}

#[test]
fn malformed_findings_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("findings.json"), "{ not json").unwrap();
    cmd_in(dir.path())
        .arg("remediate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("load findings"));
    assert!(!dir.path().join("remediation.json").exists());
}

// ============================================================================
// md / explain / narrative
// ============================================================================

#[test]
fn md_renders_remediation_report() {
    let (_, _, dir) = run_scan_on_fixture("exposed", &[]);
    cmd_in(dir.path()).arg("remediate").assert().success();
    cmd_in(dir.path())
        .args(["md", "--report", "remediation.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**DRY RUN**"));
}

#[test]
fn md_renders_scan_report_to_file() {
    let (_, _, dir) = run_scan_on_fixture("access_denied", &[]);
    cmd_in(dir.path())
        .args(["md", "--output", "report.md"])
        .assert()
        .success();
    let md = std::fs::read_to_string(dir.path().join("report.md")).unwrap();
    assert!(md.contains("[HIGH] `locked`"));
}

#[test]
fn explain_known_check() {
    bucketguard_cmd()
        .args(["explain", "s3.public_access_block"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Block Public Access"));
}

#[test]
fn explain_unknown_identifier_fails() {
    bucketguard_cmd()
        .args(["explain", "s3.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("s3.default_encryption"));
}

#[test]
fn narrate_without_credential_writes_placeholder() {
    let dir = stage_fixture("clean");
    cmd_in(dir.path())
        .args(["scan", "--narrative-out", "narrative.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AI analysis"));
    let text = std::fs::read_to_string(dir.path().join("narrative.txt")).unwrap();
    assert_eq!(
        text,
        "AI analysis skipped: GOOGLE_API_KEY not configured\n"
    );
}

#[test]
fn unwritable_narrative_file_keeps_scan_exit_code() {
    let dir = stage_fixture("exposed");
    std::fs::write(dir.path().join("blocker"), "not a directory").unwrap();
    let output = cmd_in(dir.path())
        .args(["scan", "--narrative-out", "blocker/narrative.txt"])
        .output()
        .expect("Failed to run command");
    assert_eq!(output.status.code(), Some(2));
    assert!(dir.path().join("findings.json").exists());
}
