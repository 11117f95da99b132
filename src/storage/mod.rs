//! Storage layer for BudgetPilot
//!
//! A single durable key-value file, written atomically, holding the active
//! budgeting period.

pub mod file_io;
pub mod kv;
pub mod period_state;

pub use file_io::{read_json, write_json_atomic};
pub use kv::KvStore;
pub use period_state::{PeriodStateStore, PERIOD_STATE_KEY};

use crate::config::paths::BudgetPilotPaths;
use crate::error::BudgetPilotError;

/// Open the period store under the configured data directory
pub fn open_period_store(paths: &BudgetPilotPaths) -> Result<PeriodStateStore, BudgetPilotError> {
    paths.ensure_directories()?;
    Ok(PeriodStateStore::new(KvStore::new(paths.local_store_file())))
}
