//! Period workflow state machine
//!
//! `NotCreated --Created--> Pending --AggregateComputed--> Ready`, with
//! `SelectionChanged` returning to `NotCreated` from anywhere. Transitions
//! are pure so they can be tested without a service or a store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the planning pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Create,
    Recommend,
    Commit,
    Autofill,
    Compute,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Create,
        Stage::Recommend,
        Stage::Commit,
        Stage::Autofill,
        Stage::Compute,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "Create period",
            Self::Recommend => "Generate recommendations",
            Self::Commit => "Commit plan",
            Self::Autofill => "Autofill categories",
            Self::Compute => "Compute aggregate",
        };
        f.write_str(label)
    }
}

/// Where the active period is in the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodStatus {
    #[default]
    NotCreated,
    Pending { period_id: String },
    Ready { period_id: String },
}

impl PeriodStatus {
    /// Status implied by a persisted id; aggregates are not persisted so a
    /// known id restores as `Pending`
    pub fn from_period_id(period_id: &str) -> Self {
        if period_id.is_empty() {
            Self::NotCreated
        } else {
            Self::Pending {
                period_id: period_id.to_string(),
            }
        }
    }

    pub fn period_id(&self) -> Option<&str> {
        match self {
            Self::NotCreated => None,
            Self::Pending { period_id } | Self::Ready { period_id } => Some(period_id),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotCreated => "not created",
            Self::Pending { .. } => "pending",
            Self::Ready { .. } => "ready",
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// The service upserted the period
    Created { period_id: String },
    /// Recommendations arrived; an embedded id is adopted
    RecommendationsGenerated { period_id: Option<String> },
    /// The service computed the period aggregate
    AggregateComputed { period_id: String },
    /// The user picked a different type or date range
    SelectionChanged,
    /// Any stage failed
    StageFailed(Stage),
}

/// Apply one event to a status
pub fn transition(state: &PeriodStatus, event: &WorkflowEvent) -> PeriodStatus {
    match event {
        WorkflowEvent::Created { period_id } => PeriodStatus::from_period_id(period_id),
        WorkflowEvent::RecommendationsGenerated {
            period_id: Some(period_id),
        } if !period_id.is_empty() && state.period_id() != Some(period_id.as_str()) => {
            PeriodStatus::Pending {
                period_id: period_id.clone(),
            }
        }
        WorkflowEvent::AggregateComputed { period_id } => match state {
            PeriodStatus::NotCreated => PeriodStatus::NotCreated,
            PeriodStatus::Pending { .. } | PeriodStatus::Ready { .. } => PeriodStatus::Ready {
                period_id: period_id.clone(),
            },
        },
        WorkflowEvent::SelectionChanged => PeriodStatus::NotCreated,
        WorkflowEvent::RecommendationsGenerated { .. } | WorkflowEvent::StageFailed(_) => {
            state.clone()
        }
    }
}
