//! Needs / wants / assets percentage split
//!
//! The three bands are expected to sum to 100. The check is advisory: an
//! unbalanced split is reported as invalid but never corrected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BudgetPilotError;

/// Tolerance for the advisory `sum == 100` check
pub const SUM_TOLERANCE: f64 = 0.1;

/// One of the three top-level allocation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Needs,
    Wants,
    Assets,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Assets => "assets",
        };
        f.write_str(name)
    }
}

impl FromStr for Band {
    type Err = BudgetPilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "needs" => Ok(Self::Needs),
            "wants" => Ok(Self::Wants),
            "assets" | "savings" => Ok(Self::Assets),
            other => Err(BudgetPilotError::Validation(format!("Unknown band: {}", other))),
        }
    }
}

/// Percentages for the three bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationSplit {
    pub needs_pct: f64,
    pub wants_pct: f64,
    pub assets_pct: f64,
}

impl AllocationSplit {
    pub fn new(needs_pct: f64, wants_pct: f64, assets_pct: f64) -> Self {
        Self {
            needs_pct,
            wants_pct,
            assets_pct,
        }
    }

    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Needs => self.needs_pct,
            Band::Wants => self.wants_pct,
            Band::Assets => self.assets_pct,
        }
    }

    pub fn total(&self) -> f64 {
        self.needs_pct + self.wants_pct + self.assets_pct
    }

    pub fn validity(&self) -> AllocationValidity {
        if (self.total() - 100.0).abs() < SUM_TOLERANCE {
            AllocationValidity::Valid
        } else {
            AllocationValidity::Invalid
        }
    }

    /// Currency amounts for each band at the given income
    pub fn amounts(&self, income: f64) -> BandAmounts {
        BandAmounts {
            needs: self.needs_pct / 100.0 * income,
            wants: self.wants_pct / 100.0 * income,
            assets: self.assets_pct / 100.0 * income,
        }
    }

    /// Apply one slider edit and return the rebalanced split
    ///
    /// Editing `needs` spreads the remainder over wants and assets in their
    /// existing ratio. When both are zero the ratio divisor falls back to 1,
    /// so the freed percentage lands in neither band.
    ///
    /// Editing `wants` or `assets` keeps `needs` fixed and sets the other
    /// non-needs band to whatever is left. With fractional inputs the total
    /// is 100 up to `f64` rounding, far inside [`SUM_TOLERANCE`].
    pub fn rebalance(&self, band: Band, value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };

        match band {
            Band::Needs => {
                let needs = value.clamp(0.0, 100.0);
                let remaining = 100.0 - needs;
                let pool = self.wants_pct + self.assets_pct;
                let divisor = if pool == 0.0 { 1.0 } else { pool };
                let wants_ratio = self.wants_pct / divisor;
                let assets_ratio = self.assets_pct / divisor;

                Self::new(needs, remaining * wants_ratio, remaining * assets_ratio)
            }
            Band::Wants => {
                let (wants, assets) = self.split_remainder(value);
                Self::new(self.needs_pct, wants, assets)
            }
            Band::Assets => {
                let (assets, wants) = self.split_remainder(value);
                Self::new(self.needs_pct, wants, assets)
            }
        }
    }

    /// Clamp the edited band to what needs leaves over; the other band gets the rest
    fn split_remainder(&self, value: f64) -> (f64, f64) {
        let available = (100.0 - self.needs_pct).max(0.0);
        let edited = value.clamp(0.0, available);
        (edited, 100.0 - self.needs_pct - edited)
    }
}

impl Default for AllocationSplit {
    fn default() -> Self {
        Self::new(50.0, 30.0, 20.0)
    }
}

/// Band amounts in currency units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandAmounts {
    pub needs: f64,
    pub wants: f64,
    pub assets: f64,
}

/// Result of the advisory sum check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationValidity {
    Valid,
    Invalid,
}

impl fmt::Display for AllocationValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("Valid"),
            Self::Invalid => f.write_str("Invalid"),
        }
    }
}
