//! Service layer for BudgetPilot
//!
//! Business logic on top of the models: the budgeting service seam, the
//! period workflow controller and the allocation rebalancer.

pub mod allocation;
pub mod budgeting;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use allocation::{AllocationRebalancer, AllocationSnapshot};
pub use budgeting::{BudgetingService, HttpBudgetingService};
pub use workflow::PeriodWorkflow;
