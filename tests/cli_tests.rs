//! CLI integration tests.

mod support;

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

use matchweek::testkit::{config, league};
use support::files::{self, PROTECTED_SLOT_ONE};

/// Command running inside `dir` so no stray `matchweek.toml` is picked up.
fn matchweek(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("matchweek");
    cmd.current_dir(dir).env("RUST_LOG", "error");
    cmd
}

/// League and config files for the four-participant double round robin.
fn small_season(dir: &Path, slots: u32) {
    files::write(dir, "league.json", &league::to_json(&league::four()));
    files::write(dir, "matchweek.toml", &config::double_round_robin_toml(slots));
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    matchweek(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("schedule"))
        .stdout(predicate::str::contains("diagnose"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_names_the_tool() {
    let dir = tempfile::tempdir().unwrap();
    matchweek(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("matchweek"));
}

#[test]
fn generate_writes_matchup_file() {
    let dir = tempfile::tempdir().unwrap();
    small_season(dir.path(), 6);

    matchweek(dir.path())
        .args(["generate", "--league", "league.json", "--output", "matchups.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matchups"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("matchups.json")).unwrap()).unwrap();
    assert_eq!(written["matchups"].as_array().unwrap().len(), 12);
}

#[test]
fn schedule_json_reports_every_game() {
    let dir = tempfile::tempdir().unwrap();
    small_season(dir.path(), 6);
    files::write(dir.path(), "fixed.json", PROTECTED_SLOT_ONE);

    let output = matchweek(dir.path())
        .args(["--json", "schedule", "--league", "league.json", "--protected", "fixed.json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["command"], "schedule");
    assert!(document["generated_at"].is_string());
    let games = document["schedule"]["games"].as_array().unwrap();
    assert_eq!(games.len(), 12);
    let fixed: Vec<_> = games.iter().filter(|g| g["protected"] == true).collect();
    assert_eq!(fixed.len(), 2);
    assert!(fixed.iter().all(|g| g["slot"] == 1));
}

#[test]
fn schedule_prints_a_table() {
    let dir = tempfile::tempdir().unwrap();
    small_season(dir.path(), 6);

    matchweek(dir.path())
        .args(["schedule", "--league", "league.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visitor"))
        .stdout(predicate::str::contains("highs"));
}

#[test]
fn infeasible_schedule_exits_nonzero_with_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    files::write(dir.path(), "league.json", &league::to_json(&league::four()));
    files::write(
        dir.path(),
        "tight.toml",
        &config::double_round_robin_toml(6).replace("max_per_slot = 2", "max_per_slot = 1"),
    );

    matchweek(dir.path())
        .args(["--config", "tight.toml", "schedule", "--league", "league.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Infeasible"))
        .stderr(predicate::str::contains("no schedule satisfies the constraints"));
}

#[test]
fn diagnose_blocking_report_fails() {
    let dir = tempfile::tempdir().unwrap();
    files::write(dir.path(), "league.json", &league::to_json(&league::four()));
    files::write(
        dir.path(),
        "matchweek.toml",
        &config::double_round_robin_toml(6).replace("max_per_slot = 2", "max_per_slot = 1"),
    );

    matchweek(dir.path())
        .args(["diagnose", "--league", "league.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("open slots hold only 6"))
        .stderr(predicate::str::contains("no schedule satisfies the constraints"));
}

#[test]
fn diagnose_clean_report_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    small_season(dir.path(), 6);

    matchweek(dir.path())
        .args(["diagnose", "--league", "league.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No feasibility issues found"));
}

#[test]
fn missing_league_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    matchweek(dir.path())
        .args(["generate", "--league", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json").or(predicate::str::contains("No such file")));
}

#[test]
fn config_validate_rejects_bad_value() {
    let dir = tempfile::tempdir().unwrap();
    files::write(dir.path(), "bad.toml", "[repair]\nmax_iterations = 0\n");

    matchweek(dir.path())
        .args(["config", "validate", "--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_iterations"));
}

#[test]
fn config_init_then_validate() {
    let dir = tempfile::tempdir().unwrap();

    matchweek(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(dir.path().join("matchweek.toml").is_file());

    matchweek(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("matchweek.toml is valid"));

    matchweek(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_show_json_uses_defaults_without_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = matchweek(dir.path())
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(document["source"].is_null());
    assert_eq!(document["config"]["constraints"]["slots"], 18);
}
