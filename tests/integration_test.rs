//! Integration tests for the arcade engine CLI.
//!
//! These tests run the actual binary against the fixture files in `tests/data`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

fn engine() -> Command {
    let mut cmd = Command::cargo_bin("arcade-engine").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("ARCADE_VENUE_NAME");
    cmd
}

/// Run the binary over the standard fixtures and return stdout
fn run_fixtures() -> String {
    let assert = engine()
        .arg(test_data_path("games.txt"))
        .arg(test_data_path("customers.txt"))
        .arg(test_data_path("transactions.txt"))
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_report_totals() {
    let report = run_fixtures();

    // 240 (darts off-peak) + 800 (Charlie, VR racing peak) + 800 (Nina)
    assert!(report.contains("Total revenue: £18.40"), "{}", report);
    assert!(report.contains("Standard attractions: 2"));
    assert!(report.contains("Active attractions: 1"));
    assert!(report.contains("Virtual reality attractions: 3"));
}

#[test]
fn test_report_analytics() {
    let report = run_fixtures();

    // off-peak prices: 240, 107, 197, 450, 760, 600 -> (240 + 450) / 2
    assert!(report.contains("Median off-peak price: £3.45"), "{}", report);
    assert!(report.contains("Richest customer: Nina (NW0001) with £42.00"));
    assert!(report.starts_with("====== Level Up! Report ======"));
}

#[test]
fn test_diagnostics_on_stderr_do_not_abort() {
    engine()
        .arg(test_data_path("games.txt"))
        .arg(test_data_path("customers.txt"))
        .arg(test_data_path("transactions.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Line 7"))
        .stderr(predicate::str::contains("unknown attraction type"))
        .stderr(predicate::str::contains("below the minimum age"))
        .stderr(predicate::str::contains("Customer with ID ZZ0000 does not exist"))
        .stderr(predicate::str::contains("invalid PLAY format"));
}

#[test]
fn test_venue_name_from_environment() {
    engine()
        .env("ARCADE_VENUE_NAME", "Galaxian")
        .arg(test_data_path("games.txt"))
        .arg(test_data_path("customers.txt"))
        .arg(test_data_path("transactions.txt"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("====== Galaxian Report ======"));
}

#[test]
fn test_customers_csv_output() {
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("customers.csv");

    engine()
        .arg(test_data_path("games.txt"))
        .arg(test_data_path("customers.txt"))
        .arg(test_data_path("transactions.txt"))
        .arg(&output_path)
        .assert()
        .success();

    let csv = fs::read_to_string(&output_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id,name,age,discount,balance",
            "AB1234,Sam,20,none,760",
            "CM1234,Natalie,10,staff,1000",
            "NW0001,Nina,30,student,4200",
            "ST1234,Charlie,19,student,200",
        ]
    );
}

#[test]
fn test_missing_file_error() {
    engine()
        .arg("nonexistent.txt")
        .arg(test_data_path("customers.txt"))
        .arg(test_data_path("transactions.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: I/O error"));
}

#[test]
fn test_missing_argument_error() {
    engine()
        .arg(test_data_path("games.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}
