//! Integration tests for the hos-plan binary.
//!
//! These tests verify end-to-end behavior including:
//! - Schedule printing
//! - Input validation at the command line
//! - JSON/CSV export
//! - Rule overrides from a config file

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test directory with an isolated config file
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let export_dir = temp_dir.path().join("exports");
    let config = format!(
        "[output]\nexport_dir = {:?}\n",
        export_dir.to_string_lossy()
    );
    fs::write(temp_dir.path().join("config.toml"), config).expect("Failed to write config");
    temp_dir
}

/// Helper to get the path to the CLI binary, pointed at the test config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hos-plan"));
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("hos-plan"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Hours-of-service trip schedule planner",
        ));
}

#[test]
fn test_plan_prints_schedule() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "500", "--cycle-used", "0"])
        .args(["--pickup", "Fort Worth", "--to", "Denver"])
        .args(["--start-date", "2026-10-18"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 1 (2026-10-18)"))
        .stdout(predicate::str::contains("01:00-02:00  ON_DUTY  PICKUP (Fort Worth)"))
        .stdout(predicate::str::contains("10:00-10:30  ON_DUTY  BREAK"))
        .stdout(predicate::str::contains("Day 2 (2026-10-19)"))
        .stdout(predicate::str::contains("DROPOFF (Denver)"))
        .stdout(predicate::str::contains("Days: 2"));
}

#[test]
fn test_plan_zero_distance() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to schedule"));
}

#[test]
fn test_plan_rejects_cycle_out_of_range() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "500", "--cycle-used", "75"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle hours used must be between"));
}

#[test]
fn test_plan_rejects_negative_cycle() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "500", "--cycle-used", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}

#[test]
fn test_plan_rejects_bad_start_date() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "500", "--start-date", "18/10/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_plan_reports_exhausted_cycle() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "3000", "--cycle-used", "62"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Duty cycle exhausted"));
}

#[test]
fn test_plan_writes_json_and_csv() {
    let temp_dir = setup_test_dir();
    let json_path = temp_dir.path().join("out/plan.json");
    let csv_path = temp_dir.path().join("out/logs.csv");

    cli(temp_dir.path())
        .args(["plan", "--distance", "1500", "--cycle-used", "10"])
        .args(["--start-date", "2026-10-18"])
        .arg("--json")
        .arg(&json_path)
        .arg("--csv")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan written"));

    let json = fs::read_to_string(&json_path).expect("Failed to read plan JSON");
    let plan: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    let stops = plan["stops"].as_array().expect("stops array");
    assert_eq!(stops.first().unwrap()["type"], "PICKUP");
    assert_eq!(stops.last().unwrap()["type"], "DROPOFF");
    assert_eq!(plan["daily_logs"][0]["date"], "2026-10-18");

    let csv = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("day,date,status,start_minute,end_minute,duration_minutes")
    );
    assert_eq!(lines.next(), Some("1,2026-10-18,OFF,0,60,60"));
}

#[test]
fn test_plan_export_uses_configured_dir() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--distance", "800", "--export"])
        .assert()
        .success();

    let exported: Vec<_> = fs::read_dir(temp_dir.path().join("exports"))
        .expect("Export dir not created")
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(exported.len(), 2);
    assert!(exported
        .iter()
        .any(|p| p.extension().map_or(false, |e| e == "json")));
    assert!(exported
        .iter()
        .any(|p| p.extension().map_or(false, |e| e == "csv")));
}

#[test]
fn test_rules_prints_defaults() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_daily_drive_hours = 11.0"))
        .stdout(predicate::str::contains("speed_mph = 55.0"));
}

#[test]
fn test_config_overrides_rules() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[rules]\nspeed_mph = 50.0\nbreak_minutes = 45\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("speed_mph = 50.0"))
        .stdout(predicate::str::contains("break_minutes = 45"));

    // 500 miles at 50 mph is 10 hours: break after 8, lasting 45 minutes
    cli(temp_dir.path())
        .args(["plan", "--distance", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00-10:45  ON_DUTY  BREAK"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[rules]\nspeed_mph = 0.0\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["plan", "--distance", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("speed_mph"));
}

#[test]
fn test_config_without_driving_room_is_rejected() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[rules]\noff_duty_start_minutes = 1440\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["plan", "--distance", "605"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("off_duty_start_minutes"));
}
