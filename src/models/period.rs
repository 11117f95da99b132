//! Budget period representation
//!
//! A period is a `(type, start, end)` selection plus the opaque id the
//! budgeting service assigned to it. An empty id means the period has not
//! been created yet.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetPilotError, BudgetPilotResult};

/// Kind of budgeting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    #[default]
    Monthly,
    Quarterly,
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = BudgetPilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "custom" => Ok(Self::Custom),
            other => Err(BudgetPilotError::Validation(format!(
                "Unknown period type: {}",
                other
            ))),
        }
    }
}

/// The `(type, start, end)` tuple a user has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodSelection {
    pub period_type: PeriodType,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodSelection {
    pub fn new(period_type: PeriodType, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            period_type,
            start,
            end,
        }
    }

    /// Monthly selection covering the calendar month containing `today`
    pub fn current_month(today: NaiveDate) -> Self {
        let (start, end) = month_range(today);
        Self::new(PeriodType::Monthly, start, end)
    }

    /// Default selection for a period type, containing `today`
    ///
    /// Custom periods start out as the current calendar month.
    pub fn default_for(period_type: PeriodType, today: NaiveDate) -> Self {
        let (start, end) = match period_type {
            PeriodType::Monthly | PeriodType::Custom => month_range(today),
            PeriodType::Quarterly => quarter_range(today),
        };
        Self::new(period_type, start, end)
    }

    /// Reject ranges whose start is after their end
    pub fn validate(&self) -> BudgetPilotResult<()> {
        if self.start > self.end {
            return Err(BudgetPilotError::invalid_range(self.start, self.end));
        }
        Ok(())
    }
}

impl fmt::Display for PeriodSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.period_type,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Persisted form of the active period
///
/// Stored as `{periodId, periodType, periodStart, periodEnd}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodState {
    pub period_id: String,
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl PeriodState {
    /// A not-yet-created period for the given selection
    pub fn unsaved(selection: PeriodSelection) -> Self {
        Self::with_id(String::new(), selection)
    }

    pub fn with_id(period_id: impl Into<String>, selection: PeriodSelection) -> Self {
        Self {
            period_id: period_id.into(),
            period_type: selection.period_type,
            period_start: selection.start,
            period_end: selection.end,
        }
    }

    pub fn selection(&self) -> PeriodSelection {
        PeriodSelection::new(self.period_type, self.period_start, self.period_end)
    }

    pub fn is_created(&self) -> bool {
        !self.period_id.is_empty()
    }
}

fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    (start, last_day_before(start, 1).unwrap_or(date))
}

fn quarter_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_month = (date.month0() / 3) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
    (start, last_day_before(start, 3).unwrap_or(date))
}

/// Day before `start + months`
fn last_day_before(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .and_then(|next| next.pred_opt())
}
