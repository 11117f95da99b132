//! Payloads returned by the budgeting service
//!
//! Every numeric field defaults to zero so partially populated rows from the
//! service still deserialize.

use serde::{Deserialize, Serialize};

use super::allocation::AllocationSplit;

/// One scored budget plan suggestion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub plan_code: String,
    pub score: f64,
    pub needs_budget_pct: f64,
    pub wants_budget_pct: f64,
    pub savings_budget_pct: f64,
    pub recommendation_reason: Option<String>,
    pub period_id: Option<String>,
}

impl Recommendation {
    /// Seed split for the rebalancer; savings map to the assets band
    pub fn split(&self) -> AllocationSplit {
        AllocationSplit::new(
            self.needs_budget_pct,
            self.wants_budget_pct,
            self.savings_budget_pct,
        )
    }
}

/// Plan vs actuals for one period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetOverview {
    pub period_label: Option<String>,
    pub plan_code: Option<String>,
    pub plan_name: Option<String>,
    pub income_amt: f64,
    pub needs_plan: f64,
    pub needs_spent: f64,
    pub needs_variance: f64,
    pub wants_plan: f64,
    pub wants_spent: f64,
    pub wants_variance: f64,
    pub assets_plan: f64,
    pub assets_spent: f64,
    pub assets_variance: f64,
}

/// Planned share of a single category within a band
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryBudget {
    pub band: String,
    pub category: String,
    pub planned_pct: f64,
    pub planned_amount: f64,
}

/// One point of the recent-periods trend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub period_id: String,
    pub period_label: String,
    pub period: String,
    pub needs_spent: f64,
    pub wants_spent: f64,
    pub assets_spent: f64,
    pub needs_plan: f64,
    pub wants_plan: f64,
    pub assets_plan: f64,
    pub income: f64,
}

/// Explanation card for the active period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: Option<String>,
    pub title: String,
    pub message: String,
    pub value: Option<String>,
    pub action: Option<String>,
}

/// Spend change against the previous period, in percent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PeriodComparison {
    pub needs_change: f64,
    pub wants_change: f64,
    pub assets_change: f64,
    pub period_label: Option<String>,
    pub previous_period_label: Option<String>,
}

/// Everything the dashboard shows for one period
///
/// Each part is loaded independently; a failed load leaves its default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardSnapshot {
    pub overview: Option<BudgetOverview>,
    pub categories: Vec<CategoryBudget>,
    pub trends: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
    pub comparison: Option<PeriodComparison>,
}

impl DashboardSnapshot {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
