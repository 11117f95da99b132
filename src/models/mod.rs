//! Core data models for BudgetPilot
//!
//! Periods and their workflow status, the needs/wants/assets split, and the
//! payloads the budgeting service returns.

pub mod allocation;
pub mod dashboard;
pub mod period;
pub mod workflow;

pub use allocation::{AllocationSplit, AllocationValidity, Band, BandAmounts};
pub use dashboard::{
    BudgetOverview, CategoryBudget, DashboardSnapshot, Insight, PeriodComparison,
    Recommendation, TrendPoint,
};
pub use period::{PeriodSelection, PeriodState, PeriodType};
pub use workflow::{transition, PeriodStatus, Stage, WorkflowEvent};
