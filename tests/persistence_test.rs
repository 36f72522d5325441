#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");
    let accounts = common::accounts_file();
    let inventory = common::inventory_file();

    // 1. First run: seed the store and withdraw
    let requests1 = common::csv_file(&[
        "type, username, pin, amount, overdraft",
        "withdrawal, clint_west, 1234, 500, false",
    ]);

    let output1 = Command::new(cargo_bin!("atm-engine"))
        .arg(requests1.path())
        .arg("--db-path")
        .arg(&db_path)
        .arg("--accounts")
        .arg(accounts.path())
        .arg("--inventory")
        .arg(inventory.path())
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("clint_west,withdrawal,success,300,200,50x10"));

    // 2. Second run: no seed files, state comes from the database
    let requests2 = common::csv_file(&[
        "type, username, pin, amount, overdraft",
        "withdrawal, clint_west, 1234, 100, false",
        "balance, clint_west, 1234",
    ]);
    let inventory_out = dir.path().join("inventory_out.csv");

    let output2 = Command::new(cargo_bin!("atm-engine"))
        .arg(requests2.path())
        .arg("--db-path")
        .arg(&db_path)
        .arg("--inventory-out")
        .arg(&inventory_out)
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);

    // The fifties were used up in the first run
    assert!(stdout2.contains("clint_west,withdrawal,success,200,200,20x5"));
    assert!(stdout2.contains("clint_west,balance,balance,200,200,,"));

    let written = std::fs::read_to_string(&inventory_out).unwrap();
    assert_eq!(written, "value,count\n50,0\n20,25\n10,30\n5,20\n");
}
