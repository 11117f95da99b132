//! Configuration module for BudgetPilot
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BudgetPilotPaths;
pub use settings::Settings;
