//! Smoke tests to verify command wiring

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn visamap() -> Command {
    let mut cmd = Command::cargo_bin("visamap").unwrap();
    // Keep a developer's DATABASE_URL out of the dry-run tests
    cmd.env_remove("DATABASE_URL");
    cmd
}

// === Help Tests ===

#[test]
fn test_serve_help() {
    visamap()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"));
}

#[test]
fn test_import_help() {
    visamap()
        .arg("import")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Drop and recreate the table"));
}

#[test]
fn test_completions_bash() {
    visamap()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("visamap"));
}

// === Lookup Tests ===

#[test]
fn test_lookup_special_case_name() {
    visamap()
        .arg("lookup")
        .arg("Ivory Coast")
        .assert()
        .success()
        .stdout(predicate::str::contains("CI"));
}

#[test]
fn test_lookup_iso_code() {
    visamap()
        .arg("lookup")
        .arg("de")
        .assert()
        .success()
        .stdout(predicate::str::contains("DE -> Germany"));
}

#[test]
fn test_lookup_unknown() {
    visamap()
        .arg("lookup")
        .arg("Other and unknown")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No country found"));
}

// === Import Tests ===

#[test]
fn test_import_dry_run() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Year,Quarter,Nationality,Visa type group,Case outcome,Decisions\n\
         2024,2024 Q1,India,Work,Issued,\"1,200\"\n\
         oops,2024 Q1,India,Work,Issued,5"
    )
    .unwrap();

    visamap()
        .arg("import")
        .arg(file.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\": 1"))
        .stdout(predicate::str::contains("\"inserted\": 0"));
}

#[test]
fn test_import_missing_file() {
    visamap()
        .arg("import")
        .arg("/no/such/file.csv")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_import_without_database_url() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Year,Nationality,Decisions\n2024,Chile,3").unwrap();

    visamap()
        .current_dir(std::env::temp_dir())
        .env("HOME", file.path().parent().unwrap())
        .arg("import")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}
