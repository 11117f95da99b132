//! Persisted active period
//!
//! Stored under a single key so it survives restarts. Missing or malformed
//! entries fall back to the current calendar month rather than failing.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::kv::KvStore;
use crate::error::BudgetPilotResult;
use crate::models::{PeriodSelection, PeriodState};

/// Key the active period is stored under
pub const PERIOD_STATE_KEY: &str = "budgetpilot:period-state";

/// Reads and writes the active period
#[derive(Debug, Clone)]
pub struct PeriodStateStore {
    kv: KvStore,
}

impl PeriodStateStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Load the persisted period, or a fresh current-month period
    pub fn load(&self, today: NaiveDate) -> PeriodState {
        let fallback = || PeriodState::unsaved(PeriodSelection::current_month(today));

        let Some(raw) = self.kv.get(PERIOD_STATE_KEY) else {
            debug!("no persisted period, using current month");
            return fallback();
        };

        match serde_json::from_value::<PeriodState>(raw) {
            Ok(state) if state.period_start <= state.period_end => state,
            Ok(state) => {
                warn!(
                    start = %state.period_start,
                    end = %state.period_end,
                    "persisted period has start after end, discarding"
                );
                fallback()
            }
            Err(err) => {
                warn!(error = %err, "persisted period is malformed, discarding");
                fallback()
            }
        }
    }

    pub fn save(&self, state: &PeriodState) -> BudgetPilotResult<()> {
        self.kv.set(PERIOD_STATE_KEY, serde_json::to_value(state)?)
    }
}
