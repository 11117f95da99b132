//! Interactive allocation rebalancing
//!
//! Holds the in-memory split while a user drags band sliders. Every edit
//! rebalances, recomputes amounts and hands the result to the caller's
//! callback; persisting a committed split is the caller's job.

use tracing::debug;

use crate::models::{AllocationSplit, AllocationValidity, Band, BandAmounts};

/// Split, amounts and advisory validity after an edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationSnapshot {
    pub split: AllocationSplit,
    pub amounts: BandAmounts,
    pub validity: AllocationValidity,
}

/// Rebalances a needs/wants/assets split under single-slider edits
pub struct AllocationRebalancer<F>
where
    F: FnMut(&AllocationSnapshot),
{
    initial: AllocationSplit,
    current: AllocationSplit,
    income: f64,
    on_change: F,
}

impl<F> AllocationRebalancer<F>
where
    F: FnMut(&AllocationSnapshot),
{
    pub fn new(initial: AllocationSplit, income: f64, on_change: F) -> Self {
        Self {
            initial,
            current: initial,
            income,
            on_change,
        }
    }

    pub fn split(&self) -> AllocationSplit {
        self.current
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            split: self.current,
            amounts: self.current.amounts(self.income),
            validity: self.current.validity(),
        }
    }

    /// Move one band's slider to `value`
    pub fn edit(&mut self, band: Band, value: f64) -> AllocationSnapshot {
        self.current = self.current.rebalance(band, value);
        debug!(
            %band,
            value,
            needs = self.current.needs_pct,
            wants = self.current.wants_pct,
            assets = self.current.assets_pct,
            "allocation rebalanced"
        );
        self.notify()
    }

    /// Restore the split the rebalancer started with
    pub fn reset(&mut self) -> AllocationSnapshot {
        self.current = self.initial;
        self.notify()
    }

    fn notify(&mut self) -> AllocationSnapshot {
        let snapshot = self.snapshot();
        (self.on_change)(&snapshot);
        snapshot
    }
}
