use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_malformed_rows_are_skipped() {
    let accounts = common::accounts_file();
    let inventory = common::inventory_file();
    let requests = common::csv_file(&[
        "type, username, pin, amount, overdraft",
        "withdrawal, clint_west, 1234, 100, false",
        // Unknown request type
        "deposit, clint_west, 1234, 100, false",
        // Text in amount field
        "withdrawal, clint_west, 1234, lots, false",
        // Not a boolean
        "withdrawal, clint_west, 1234, 100, maybe",
        "withdrawal, clint_west, 1234, 200, false",
    ]);

    let mut cmd = Command::new(cargo_bin!("atm-engine"));
    cmd.arg(requests.path())
        .arg("--accounts")
        .arg(accounts.path())
        .arg("--inventory")
        .arg(inventory.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading request"))
        .stdout(predicate::str::contains(
            "clint_west,withdrawal,success,700,200,50x2,Please collect your cash",
        ))
        .stdout(predicate::str::contains(
            "clint_west,withdrawal,success,500,200,50x4,Please collect your cash",
        ));
}

#[test]
fn test_requests_without_seed_data() {
    let requests = common::csv_file(&[
        "type, username, pin, amount, overdraft",
        "withdrawal, clint_west, 1234, 100, false",
        "balance, clint_west, 1234",
    ]);

    let mut cmd = Command::new(cargo_bin!("atm-engine"));
    cmd.arg(requests.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "clint_west,withdrawal,account_not_found,,,,Bank account not found",
        ))
        .stdout(predicate::str::contains(
            "clint_west,balance,account_not_found,,,,Bank account not found",
        ));
}

#[test]
fn test_duplicate_denominations_fail_startup() {
    let inventory = common::csv_file(&["value, count", "50, 10", "50, 5"]);
    let requests = common::csv_file(&["type, username, pin, amount, overdraft"]);

    let mut cmd = Command::new(cargo_bin!("atm-engine"));
    cmd.arg(requests.path())
        .arg("--inventory")
        .arg(inventory.path());

    cmd.assert().failure();
}

#[test]
fn test_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("atm-engine"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
