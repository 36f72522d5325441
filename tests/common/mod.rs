use std::io::Write;
use tempfile::NamedTempFile;

/// Writes `lines` into a temporary file that lives as long as the handle.
pub fn csv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

pub fn accounts_file() -> NamedTempFile {
    csv_file(&[
        "username, pin, balance, overdraft",
        "clint_west, 1234, 800, 200",
        "russell_gladiator, 4321, 2000, 0",
    ])
}

pub fn inventory_file() -> NamedTempFile {
    csv_file(&["value, count", "50, 10", "20, 30", "10, 30", "5, 20"])
}
