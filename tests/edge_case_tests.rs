//! Edge cases around source validation and unusual target state

mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
fn blueprint_cmd() -> Command {
    Command::cargo_bin("blueprint").unwrap()
}

#[test]
fn test_source_path_is_a_file() {
    let workspace = TestWorkspace::new();
    workspace.write_file("not-a-dir", "just a file\n");

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .args(["install", "--claude", "--global", "--source"])
        .arg(workspace.config_dir("not-a-dir"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Blueprint source tree not found"));
}

#[test]
fn test_source_missing_docs_tree() {
    let workspace = TestWorkspace::new();
    workspace.write_file("partial/commands/bp/help.md", "# Help\n");

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .args(["install", "--claude", "--global", "--source"])
        .arg(workspace.config_dir("partial"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Blueprint source tree not found"));
}

#[test]
fn test_empty_commands_tree_fails_verification() {
    let workspace = TestWorkspace::new();
    std::fs::create_dir_all(workspace.config_dir("sparse").join("commands/bp")).unwrap();
    workspace.write_file("sparse/blueprint/core.md", "# Core\n");

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .args(["install", "--claude", "--global", "--source"])
        .arg(workspace.config_dir("sparse"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to install commands/bp: directory is empty",
        ))
        .stderr(predicate::str::contains("Installation incomplete!"));
}

#[test]
fn test_config_dir_tilde_expansion() {
    let workspace = TestWorkspace::new();
    let source = workspace.create_source_tree();

    blueprint_cmd()
        .env("HOME", &workspace.path)
        .env("BLUEPRINT_SOURCE_DIR", &source)
        .args([
            "install",
            "--claude",
            "--global",
            "--config-dir",
            "~/claude-alt",
        ])
        .assert()
        .success();

    assert!(workspace.file_exists("claude-alt/blueprint/core.md"));
}

#[test]
fn test_config_dir_path_occupied_by_file() {
    let workspace = TestWorkspace::new();
    let source = workspace.create_source_tree();
    workspace.write_file("claude", "a file where the dir should be\n");

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .env("BLUEPRINT_SOURCE_DIR", &source)
        .args(["install", "--claude", "--global"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_non_markdown_source_files_copied_verbatim() {
    let workspace = TestWorkspace::new();
    let source = workspace.create_source_tree();
    workspace.write_file("source/blueprint/assets/diagram.svg", "<svg></svg>");

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .env("BLUEPRINT_SOURCE_DIR", &source)
        .args(["install", "--claude", "--global"])
        .assert()
        .success();

    assert_eq!(
        workspace.read_file("claude/blueprint/assets/diagram.svg"),
        "<svg></svg>"
    );
}

#[test]
fn test_attribution_removed_when_opted_out() {
    let workspace = TestWorkspace::new();
    let source = workspace.create_source_tree();
    workspace.write_file(
        "claude/settings.json",
        r#"{"attribution": {"commit": ""}}"#,
    );

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .env("BLUEPRINT_SOURCE_DIR", &source)
        .args(["install", "--claude", "--global"])
        .assert()
        .success();

    let doc = workspace.read_file("claude/blueprint/workflows/execute.md");
    assert!(!doc.contains("Co-Authored-By"));
}

#[test]
fn test_attribution_replaced_with_custom_trailer() {
    let workspace = TestWorkspace::new();
    let source = workspace.create_source_tree();
    workspace.write_file(
        "claude/settings.json",
        r#"{"attribution": {"commit": "Me <me@example.com>"}}"#,
    );

    blueprint_cmd()
        .env("CLAUDE_CONFIG_DIR", workspace.config_dir("claude"))
        .env("BLUEPRINT_SOURCE_DIR", &source)
        .args(["install", "--claude", "--global"])
        .assert()
        .success();

    let doc = workspace.read_file("claude/blueprint/workflows/execute.md");
    assert!(doc.contains("Co-Authored-By: Me <me@example.com>"));
    assert!(!doc.contains("bp@example.com"));
}
