#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_insights::{
    core::{BudgetSession, FixedClock},
    ledger::{Expense, Ledger},
    utils::persistence::{save_snapshot_to_file, Snapshot, CURRENT_SCHEMA_VERSION},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid test date")
}

/// Session whose clock is frozen at noon on the given day.
pub fn session_on(year: i32, month: u32, day: u32) -> BudgetSession {
    BudgetSession::new(Box::new(FixedClock(at(year, month, day))))
}

/// Ledger with one record per entry, one hour apart starting 2024-06-01.
pub fn ledger_of(entries: &[(&str, f64)]) -> Ledger {
    let start = at(2024, 6, 1);
    entries
        .iter()
        .enumerate()
        .map(|(index, (category, amount))| {
            Expense::new(
                *category,
                *amount,
                format!("{category} #{index}"),
                start + Duration::hours(index as i64),
            )
        })
        .collect()
}

/// Writes a snapshot file into a fresh temp directory and returns its path.
pub fn write_snapshot(total_budget: f64, entries: &[(&str, f64)], categories: &[&str]) -> PathBuf {
    let snapshot = Snapshot {
        total_budget,
        expenses: ledger_of(entries),
        categories: categories.iter().copied().collect(),
        export_date: at(2024, 6, 3),
        schema_version: CURRENT_SCHEMA_VERSION,
    };
    let path = temp_dir().join("export.json");
    save_snapshot_to_file(&snapshot, &path).expect("write snapshot");
    path
}
