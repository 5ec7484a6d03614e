//! End-to-end tests for the `decoalesce` binary.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("decoalesce").unwrap()
}

#[test]
fn test_help_mentions_config_file() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CONFIGURATION FILE (.decoalesce.toml)"));
}

#[test]
fn test_dry_run_is_the_default() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("A.swift");
    let source = "let x = a ?? b\n";
    fs::write(&file, source).unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY-RUN]"))
        .stdout(predicate::str::contains("Would rewrite"))
        .stdout(predicate::str::contains("1 of 1 file(s) would change"));

    // Nothing written back without --apply
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}

#[test]
fn test_apply_rewrites_in_place() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("A.swift");
    fs::write(&file, "    let name = user.nickname ?? \"Guest\"\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewrote:"))
        .stdout(predicate::str::contains("1 of 1 file(s) changed"));

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("if let tempName = user.nickname {"));
    assert!(!content.contains("??"));
}

#[test]
fn test_unresolved_lines_are_surfaced() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("A.swift"),
        "let merged = a?.b ?? c?.d ?? e\n",
    )
    .unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unresolved:"))
        .stdout(predicate::str::contains("nested coalescing chain"))
        .stdout(predicate::str::contains("1 unresolved line(s)"));
}

#[test]
fn test_json_output_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("A.swift"), "return v ?? 0\n").unwrap();

    let output = cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["files_scanned"], 1);
    assert_eq!(parsed["files_changed"], 1);
    assert_eq!(parsed["reports"][0]["status"], "changed");
}

#[test]
fn test_per_file_errors_do_not_fail_the_process() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("Good.swift");
    fs::write(&good, "let x = a ?? b\n").unwrap();
    let missing = dir.path().join("Gone.swift");

    cmd()
        .arg(&missing)
        .arg(&good)
        .arg("--apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("does not exist"))
        .stdout(predicate::str::contains("1 error(s)"));
}

#[test]
fn test_missing_root_exits_nonzero() {
    cmd()
        .arg("--root")
        .arg("/no/such/dir")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_quiet_mode_only_summary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("A.swift"), "let x = a ?? b\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done!"))
        .stdout(predicate::str::contains("Would rewrite").not());
}

#[test]
fn test_exclude_folder_flag() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Generated")).unwrap();
    fs::write(dir.path().join("Generated/G.swift"), "let x = a ?? b\n").unwrap();
    fs::write(dir.path().join("A.swift"), "let y = c ?? d\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--exclude-folder")
        .arg("Generated")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1 file(s) would change"));
}

#[test]
fn test_paths_conflict_with_root() {
    cmd()
        .arg("some/path")
        .arg("--root")
        .arg("other")
        .assert()
        .code(1);
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".decoalesce.toml"),
        "[decoalesce]\nexclude_folders = [\"Legacy\"]\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("Legacy")).unwrap();
    fs::write(dir.path().join("Legacy/L.swift"), "let x = a ?? b\n").unwrap();
    fs::write(dir.path().join("A.swift"), "let y = c ?? d\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files_scanned\": 1"));
}

#[test]
fn test_policy_flag_enables_hoisting() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("A.swift");
    fs::write(&file, "let t = a?.b?.c ?? d\n").unwrap();

    cmd()
        .arg("--root")
        .arg(dir.path())
        .arg("--policy")
        .arg("hoist")
        .arg("--apply")
        .assert()
        .success();

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("tempValue0"));
    assert!(!content.contains("??"));
}
