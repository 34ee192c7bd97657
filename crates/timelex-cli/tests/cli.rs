use assert_cmd::Command;
use predicates::prelude::*;

fn timelex() -> Command {
    Command::cargo_bin("timelex").unwrap()
}

#[test]
fn test_iso_renders_a_known_instant_in_utc() {
    timelex()
        .args(["iso", "1348331662", "120000", "--utc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Date: '2012-09-22'"))
        .stdout(predicate::str::contains("Time: '16:34:22'"))
        .stdout(predicate::str::contains("Full: '2012-09-22T16:34:22,120000'"))
        .stdout(predicate::str::contains(
            "Zone: '2012-09-22 16:34:22.120000+0000'",
        ));
}

#[test]
fn test_resolve_accepts_a_clock_time() {
    timelex()
        .args(["resolve", "12:30", "--utc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12:30:00"));
}

#[test]
fn test_resolve_emits_json_when_asked() {
    timelex()
        .args(["resolve", "today", "--utc", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"usec\""))
        .stdout(predicate::str::contains("00:00:00"));
}

#[test]
fn test_resolve_reports_unknown_formats() {
    timelex()
        .args(["resolve", "definitely not a time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized timestamp format"));
}
