#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::{NamedTempFile, tempdir};

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("TIMELINE_BOARD_CONFIG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_starts_from_seed_board() {
    run_cli("lanes\nquit\n")
        .success()
        .stdout(str_contains("Recruit translators"))
        .stdout(str_contains("Timeline 2021-01-14 -> 2021-05-01 (107 days, 6 lanes)"));
}

#[test]
fn cli_rejects_backwards_dates() {
    run_cli("add 2021-02-10 2021-02-01 Backwards\nquit\n")
        .success()
        .stdout(str_contains("Error: item start date 2021-02-10 must be on or before end date 2021-02-01"));
}

#[test]
fn cli_delete_command_removes_item() {
    run_cli("delete 16\ndelete 16\nquit\n")
        .success()
        .stdout(str_contains("Deleted item 16."))
        .stdout(str_contains("Item 16 not found."));
}

#[test]
fn cli_shift_and_move() {
    run_cli("shift 16 3\nmove 16 done\nboard\nquit\n")
        .success()
        .stdout(str_contains("Shifted item 16 by 3 days."))
        .stdout(str_contains("2021-05-04"))
        .stdout(str_contains("Moved item 16 to ✅ Done."))
        .stdout(str_contains("✅ Done (1)"));
}

#[test]
fn cli_unknown_status_is_reported() {
    run_cli("move 1 blocked\nquit\n")
        .success()
        .stdout(str_contains("Error: unknown status 'blocked'"));
}

#[test]
fn cli_zoom_steps_and_floor() {
    let assert = run_cli("zoom in\nzoom out\nzoom out\nzoom out\nquit\n").success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(output.contains("Zoom: 17 px/day"));
    assert!(output.contains("Zoom: 12 px/day"));
    assert!(output.contains("Zoom: 7 px/day"));
    assert!(output.contains("Zoom: 5 px/day"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "add 2021-06-01 2021-06-03 Persisted task\nsave json {path}\nadd 2021-06-05 2021-06-05 Temp\nload json {path}\nshow\nquit\n"
    );

    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(output.contains("Items loaded from"));
    let after_reload = output.split("Items loaded from").last().unwrap_or_default();
    assert!(after_reload.contains("Persisted task"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary item should not appear after reload:\n{after_reload}"
    );
}

#[test]
fn cli_save_csv_writes_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("items.csv");

    run_cli(&format!("save csv {}\nquit\n", path.display()))
        .success()
        .stdout(str_contains("Items saved to"));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("id,name,start,end,status,description"));
    assert_eq!(raw.lines().count(), 17);
}

#[test]
fn cli_uses_configured_json_store() {
    let dir = tempdir().unwrap();
    let board_path = dir.path().join("board.json");
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        serde_json::json!({ "storage": { "path": board_path } }).to_string(),
    )
    .unwrap();

    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("TIMELINE_BOARD_CONFIG", &config_path)
        .write_stdin("rename 1 Hire translators\nquit\n")
        .assert()
        .success()
        .stdout(str_contains("Updated item 1."));

    let stored = fs::read_to_string(&board_path).unwrap();
    assert!(stored.contains("Hire translators"));
}

#[test]
fn cli_zoom_accepts_pixels_per_day() {
    run_cli("help\nzoom 20\nzoom -3\nquit\n")
        .success()
        .stdout(str_contains("zoom [in|out|<px>]"))
        .stdout(str_contains("Zoom: 20 px/day"))
        .stdout(str_contains("Usage: zoom [in|out|<pixels-per-day>]"));
}
