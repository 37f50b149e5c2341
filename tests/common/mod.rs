//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use gtd_records::{Context, Format, Item, NextAction, Project, Status, WaitingFor};
use tempfile::TempDir;

pub const PROJECT_ID: &str = "project-id";
pub const STANDALONE_ID: &str = "standalone-action-id";
pub const ACTION_WITH_PROJECT_ID: &str = "action-with-project-id";
pub const WAITING_ID: &str = "waiting-for-id";

/// Path of the four-item fixture for a format
pub fn fixture(format: Format) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("gtd.{}", format.extension()))
}

/// Copies the fixture into a scratch dir, applying text replacements
pub fn scratch_fixture(dir: &TempDir, format: Format, replacements: &[(&str, &str)]) -> PathBuf {
    let mut content = fs::read_to_string(fixture(format)).unwrap();
    for (from, to) in replacements {
        assert!(content.contains(from), "fixture has no '{}'", from);
        content = content.replacen(from, to, 1);
    }

    let path = dir.path().join(format!("gtd.{}", format.extension()));
    fs::write(&path, content).unwrap();
    path
}

/// The items both fixtures must build to
pub fn expected_items() -> Vec<Item> {
    vec![
        NextAction::new(ACTION_WITH_PROJECT_ID, "Action with project", Status::inactive("DONE"))
            .with_superior_project(PROJECT_ID)
            .with_context(Context::new("test_context"))
            .into(),
        Project::new(PROJECT_ID, "Test project", Status::inactive("COMPLETE")).into(),
        NextAction::new(STANDALONE_ID, "Standalone action", Status::active("NEXT")).into(),
        WaitingFor::new(WAITING_ID, "Waiting for reply", Status::active("WAITING"))
            .with_superior_project(PROJECT_ID)
            .into(),
    ]
}
