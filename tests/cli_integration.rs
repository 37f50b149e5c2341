//! CLI integration tests for gtd
//!
//! These tests run the `gtd` binary against the fixture files and scratch
//! copies of them, checking that reads, updates and appends work together.

mod common;

use common::*;
use gtd_records::Format;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command instance for the gtd binary, isolated from user settings
fn gtd_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("gtd"));
    cmd.env("GTD_SETTINGS", dir.path().join("settings.toml"))
        .env_remove("GTD_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn copy_fixture(dir: &TempDir, format: Format) -> PathBuf {
    scratch_fixture(dir, format, &[])
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_summarizes_fixture() {
    let dir = TempDir::new().unwrap();

    for format in Format::ALL {
        gtd_cmd(&dir)
            .arg("check")
            .arg(fixture(format))
            .assert()
            .success()
            .stdout(predicate::str::contains("OK: 4 item(s), 2 active"))
            .stdout(predicate::str::contains("next_action  2"));
    }
}

#[test]
fn test_check_json_format() {
    let dir = TempDir::new().unwrap();

    let json = json_stdout(gtd_cmd(&dir).args(["--output", "json", "check"]).arg(fixture(Format::Jsonl)));
    assert_eq!(json["valid"], true);
    assert_eq!(json["items"], 4);
    assert_eq!(json["by_kind"]["waiting_for"], 1);
    assert_eq!(json["dangling_references"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_reports_dangling_projects() {
    let dir = TempDir::new().unwrap();
    let path = scratch_fixture(
        &dir,
        Format::Org,
        &[(":SUPERIOR_PROJECTS: project-id\n:END:", ":SUPERIOR_PROJECTS: p-gone\n:END:")],
    );

    gtd_cmd(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("waiting-for-id -> p-gone"));
}

// =============================================================================
// List and Show Tests
// =============================================================================

#[test]
fn test_list_filters_by_kind_and_activity() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .args(["list", "--kind", "next_action", "--active"])
        .arg(fixture(Format::Org))
        .assert()
        .success()
        .stdout(predicate::str::contains(STANDALONE_ID))
        .stdout(predicate::str::contains(ACTION_WITH_PROJECT_ID).not())
        .stdout(predicate::str::contains(PROJECT_ID).not());
}

#[test]
fn test_list_json_format() {
    let dir = TempDir::new().unwrap();

    let json = json_stdout(gtd_cmd(&dir).args(["-o", "json", "list"]).arg(fixture(Format::Org)));
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["id"], ACTION_WITH_PROJECT_ID);
    assert_eq!(items[0]["type"], "next_action");
    assert_eq!(items[0]["contexts"][0]["name"], "test_context");
    assert_eq!(items[0]["is_active"], false);
}

#[test]
fn test_show_project_lists_its_items() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .args(["show", PROJECT_ID])
        .arg(fixture(Format::Jsonl))
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Test project"))
        .stdout(predicate::str::contains("Status: COMPLETE (inactive)"))
        .stdout(predicate::str::contains("Items:"))
        .stdout(predicate::str::contains(WAITING_ID));
}

#[test]
fn test_show_unknown_item() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .args(["show", "nope"])
        .arg(fixture(Format::Org))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not found: nope"));
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_set_status_writes_back() {
    for format in Format::ALL {
        let dir = TempDir::new().unwrap();
        let path = copy_fixture(&dir, format);

        gtd_cmd(&dir)
            .args(["set-status", WAITING_ID, "RECEIVED"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("WAITING -> RECEIVED"));

        gtd_cmd(&dir)
            .args(["show", WAITING_ID])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Status: RECEIVED (inactive)"));
    }
}

#[test]
fn test_set_status_rejects_unknown_status() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, Format::Org);
    let before = fs::read_to_string(&path).unwrap();

    gtd_cmd(&dir)
        .args(["set-status", PROJECT_ID, "NOTVALID"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status 'NOTVALID' for project"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_add_appends_item() {
    for format in Format::ALL {
        let dir = TempDir::new().unwrap();
        let path = copy_fixture(&dir, format);

        let json = json_stdout(
            gtd_cmd(&dir)
                .args(["-o", "json", "add", "next_action", "Buy boxes", "--status", "NEXT"])
                .args(["--project", PROJECT_ID, "--context", "errands"])
                .arg("--file")
                .arg(&path),
        );
        let id = json["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("n-"));

        let listed = json_stdout(gtd_cmd(&dir).args(["-o", "json", "show", &id]).arg(&path));
        assert_eq!(listed["title"], "Buy boxes");
        assert_eq!(listed["superior_projects"][0], PROJECT_ID);
        assert_eq!(listed["contexts"][0]["name"], "errands");
    }
}

#[test]
fn test_add_to_new_file_uses_config_from_other_files() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("inbox.org");

    gtd_cmd(&dir)
        .args(["add", "project", "Plan trip", "--status", "ACTIVE", "--file"])
        .arg(&target)
        .arg(fixture(Format::Org))
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project: p-"));

    let content = fs::read_to_string(&target).unwrap();
    assert!(content.starts_with("* Plan trip\n:PROPERTIES:\n:ID: p-"));
    assert!(content.contains(":STATUS: ACTIVE\n"));
}

#[test]
fn test_add_rejects_status_of_other_type() {
    let dir = TempDir::new().unwrap();
    let path = copy_fixture(&dir, Format::Jsonl);

    gtd_cmd(&dir)
        .args(["add", "waiting_for", "Reply", "--status", "NEXT", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status 'NEXT' for waiting_for"));
}

// =============================================================================
// Input Resolution Tests
// =============================================================================

#[test]
fn test_missing_file_error() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .arg("check")
        .arg(dir.path().join("absent.org"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file"));
}

#[test]
fn test_unsupported_type_error() {
    let dir = TempDir::new().unwrap();
    let path = scratch_fixture(
        &dir,
        Format::Jsonl,
        &[("\"type\": \"project\"", "\"type\": \"something_unsupported\"")],
    );

    gtd_cmd(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported GTD type: 'something_unsupported'"));
}

#[test]
fn test_format_flag_for_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gtd.txt");
    fs::copy(fixture(Format::Org), &path).unwrap();

    gtd_cmd(&dir)
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot infer file format"));

    gtd_cmd(&dir)
        .args(["check", "--format", "org"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_settings_supply_default_files() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, &fixture(Format::Jsonl));

    gtd_cmd(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 4 item(s)"));
}

#[test]
fn test_no_files_error() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input files"));
}

fn write_settings(dir: &TempDir, file: &Path) {
    let path = toml::Value::String(file.display().to_string());
    let content = format!("default_format = \"jsonl\"\nfiles = [{}]\n", path);
    fs::write(dir.path().join("settings.toml"), content).unwrap();
}

// =============================================================================
// Verbose Tests
// =============================================================================

#[test]
fn test_verbose_flag() {
    let dir = TempDir::new().unwrap();

    gtd_cmd(&dir)
        .args(["--verbose", "check"])
        .arg(fixture(Format::Org))
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose]"));
}
