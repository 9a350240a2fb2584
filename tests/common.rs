#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn cc() -> Command {
    cargo_bin_cmd!("careclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_careclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    for suffix in ["", "-wal", "-shm"] {
        fs::remove_file(format!("{db_path}{suffix}")).ok();
    }
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB and set a 1 km perimeter around (0, 0)
pub fn init_db_with_perimeter(db_path: &str) {
    cc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    cc().args([
        "--db",
        db_path,
        "--worker",
        "mgr",
        "--role",
        "manager",
        "perimeter",
        "set",
        "--lat",
        "0",
        "--lng",
        "0",
        "--radius-km",
        "1",
    ])
    .assert()
    .success();
}

/// `careclock --db <db> --worker <id> clock in --lat <lat> --lng <lng>`
pub fn clock(db_path: &str, worker: &str, dir: &str, lat: &str, lng: &str) -> Command {
    let mut cmd = cc();
    cmd.args([
        "--db", db_path, "--worker", worker, "clock", dir, "--lat", lat, "--lng", lng,
    ]);
    cmd
}
