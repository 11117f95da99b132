//! BudgetPilot - period budgeting client
//!
//! This library holds the client-side logic of the BudgetPilot budgeting
//! workflow: picking a budget period, driving the remote planning pipeline
//! (create → recommend → autofill → compute), rebalancing a needs/wants/assets
//! split, and recognizing the swipe and pull-to-refresh gestures a touch UI
//! feeds it. It is UI-framework independent; the bundled CLI is one host.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory and settings
//! - `error`: Custom error types
//! - `models`: Periods, workflow status, allocation splits, service payloads
//! - `storage`: Durable key-value store holding the active period
//! - `services`: Budgeting service seam, workflow controller, rebalancer
//! - `gestures`: Swipe and pull-to-refresh reducers
//! - `cli` / `display`: Terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use budgetpilot::config::{BudgetPilotPaths, Settings};
//! use budgetpilot::services::{HttpBudgetingService, PeriodWorkflow};
//!
//! let paths = BudgetPilotPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = budgetpilot::storage::open_period_store(&paths)?;
//! let workflow = PeriodWorkflow::new(HttpBudgetingService::new(&settings)?, store, today);
//! let dashboard = workflow.run_all(workflow.selection()).await?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod gestures;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetPilotError, BudgetPilotResult};
