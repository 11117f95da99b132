//! User settings for BudgetPilot
//!
//! Manages the budgeting service endpoint, gesture thresholds and logging
//! preferences.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::BudgetPilotPaths;
use crate::error::BudgetPilotError;

/// User settings for BudgetPilot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the budgeting service routes
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token sent with every service request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Horizontal distance (px) a swipe must reach to fire
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f64,

    /// Vertical distance (px) a pull must reach to refresh
    #[serde(default = "default_pull_threshold")]
    pub pull_threshold: f64,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api/budgetpilot".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_swipe_threshold() -> f64 {
    50.0
}

fn default_pull_threshold() -> f64 {
    80.0
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
            swipe_threshold: default_swipe_threshold(),
            pull_threshold: default_pull_threshold(),
            log_filter: default_log_filter(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BudgetPilotPaths) -> Result<Self, BudgetPilotError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BudgetPilotError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetPilotError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPilotPaths) -> Result<(), BudgetPilotError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BudgetPilotError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BudgetPilotError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
