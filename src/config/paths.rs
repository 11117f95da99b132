//! Path management for BudgetPilot
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGETPILOT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `budgetpilot`
//!    (`~/.config/budgetpilot` on Linux, `%APPDATA%\budgetpilot\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetPilotError;

/// Manages all paths used by BudgetPilot
#[derive(Debug, Clone)]
pub struct BudgetPilotPaths {
    base_dir: PathBuf,
}

impl BudgetPilotPaths {
    /// Create a new BudgetPilotPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetPilotError> {
        let base_dir = if let Ok(custom) = std::env::var("BUDGETPILOT_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the durable key-value store
    pub fn local_store_file(&self) -> PathBuf {
        self.base_dir.join("local-store.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BudgetPilotError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetPilotError::Io(format!("Failed to create base directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetPilotError> {
    ProjectDirs::from("", "", "budgetpilot")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BudgetPilotError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPilotPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.local_store_file(),
            temp_dir.path().join("local-store.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("budgetpilot");
        let paths = BudgetPilotPaths::with_base_dir(base.clone());

        paths.ensure_directories().unwrap();
        assert!(base.exists());
    }
}
