#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cli").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn interactive_session_computes_schedule() {
    cli()
        .args(["--region", "kr"])
        .write_stdin(
            "start 2025-05-27\nadd Analysis, 3\nadd Design, 4\ntasks\ncompute\nquit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 'Design' (4 days)."))
        .stdout(predicate::str::contains("  2. Design (4 days)"))
        .stdout(predicate::str::contains(
            "Design     | 2025-05-30 → 2025-06-05 | 4 days",
        ))
        .stdout(predicate::str::contains("Next working day: 2025-06-09"));
}

#[test]
fn compute_flag_prints_report_and_exits() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = dir.path().join("tasks.txt");
    fs::write(&tasks, "# plan\nAnalysis, 3\nDesign, 4\n").unwrap();

    cli()
        .args(["--start", "2025-05-27", "--region", "us", "--compute", "--tasks"])
        .arg(&tasks)
        .assert()
        .success()
        .stdout(predicate::str::contains("Start date: 2025-05-27"))
        .stdout(predicate::str::contains("Total working days: 7"));
}

#[test]
fn compute_flag_without_tasks_fails() {
    cli()
        .args(["--start", "2025-05-27", "--compute"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task list is empty"));
}

#[test]
fn bad_start_date_fails_at_startup() {
    cli()
        .args(["--start", "27/05/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed date '27/05/2025'"));
}

#[test]
fn errors_do_not_end_the_session() {
    cli()
        .write_stdin("add Analysis, 0\nfrobnicate\nisworkday 2025-10-09\nnext 2025-10-02\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: invalid duration '0'"))
        .stdout(predicate::str::contains("Unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("2025-10-09 is not a working day."))
        .stdout(predicate::str::contains(
            "Next working day after 2025-10-02: 2025-10-10",
        ));
}

#[test]
fn holidays_command_lists_year() {
    cli()
        .write_stdin("holidays 2025\nholidays 2031\nholidays next\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-10-06 (Mon)"))
        .stdout(predicate::str::contains("has no data for 2031"))
        .stdout(predicate::str::contains("Invalid year 'next'. Usage: holidays <year>"))
        .stdout(predicate::str::contains("YYYY-MM-DD").not());
}

#[test]
fn calendar_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.json");
    let path = path.to_str().unwrap();

    cli()
        .args(["--region", "us"])
        .write_stdin(format!("calendar save {path}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Calendar saved to"));
    let saved = fs::read_to_string(path).unwrap();
    assert!(saved.contains("\"us\""), "{saved}");

    cli()
        .write_stdin(format!("calendar load {path}\nisworkday 2025-07-04\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Calendar loaded from"))
        .stdout(predicate::str::contains("2025-07-04 is not a working day."));
}

#[test]
fn exports_write_files() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("schedule.csv");
    let json_path = dir.path().join("schedule.json");
    let script = format!(
        "start 2025-05-27\nadd Analysis, 3\ncsv {}\njson {}\ntable\n",
        csv_path.display(),
        json_path.display()
    );

    cli()
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("| Analysis |"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("task,start,end,duration\n"));
    assert!(csv.contains("Analysis,2025-05-27,2025-05-29,3"));
    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.contains("\"final_end\": \"2025-05-29\""), "{json}");
}
