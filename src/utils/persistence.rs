use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::InsightsError,
    ledger::{CategorySet, Ledger},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Exportable session state: budget, ledger and registered categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub total_budget: f64,
    #[serde(default)]
    pub expenses: Ledger,
    #[serde(default)]
    pub categories: CategorySet,
    pub export_date: DateTime<Utc>,
    #[serde(default = "Snapshot::schema_version_default")]
    pub schema_version: u8,
}

impl Snapshot {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Rejects content the session could never have produced.
    pub fn validate(&self) -> Result<(), InsightsError> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(InsightsError::InvalidSnapshot(format!(
                "schema version {} is newer than supported version {}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        if !self.total_budget.is_finite() || self.total_budget < 0.0 {
            return Err(InsightsError::InvalidSnapshot(format!(
                "total budget must be a non-negative number, got {}",
                self.total_budget
            )));
        }
        if let Some(bad) = self
            .expenses
            .expenses()
            .iter()
            .find(|expense| !expense.amount.is_finite() || expense.amount <= 0.0)
        {
            return Err(InsightsError::InvalidSnapshot(format!(
                "expense {} has non-positive amount {}",
                bad.id, bad.amount
            )));
        }
        Ok(())
    }
}

/// Writes the snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot_to_file(snapshot: &Snapshot, path: &Path) -> Result<(), InsightsError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads and validates a snapshot from disk.
pub fn load_snapshot_from_file(path: &Path) -> Result<Snapshot, InsightsError> {
    let data = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    snapshot.validate()?;
    Ok(snapshot)
}
