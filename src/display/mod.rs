//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables, bars, and status indicators.

pub mod dashboard;
pub mod report;

pub use dashboard::{
    format_allocation, format_dashboard, format_period_status, format_recommendations,
};
