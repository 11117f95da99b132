//! In-memory budgeting service for tests
//!
//! Records every call, hands out deterministic period ids per selection and
//! can be told to fail individual operations or hold an upsert open.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::budgeting::BudgetingService;
use crate::error::{BudgetPilotError, BudgetPilotResult};
use crate::models::{
    BudgetOverview, CategoryBudget, Insight, PeriodComparison, PeriodSelection, Recommendation,
    TrendPoint,
};

#[derive(Default)]
pub struct RecordingService {
    calls: Mutex<Vec<String>>,
    ids: Mutex<HashMap<PeriodSelection, String>>,
    failing: Mutex<HashSet<&'static str>>,
    recommendation_period: Mutex<Option<String>>,
    upsert_gate: Mutex<Option<std::sync::Arc<Notify>>>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation answer with a service error
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    /// Embed this id in generated recommendations
    pub fn recommend_with_period(&self, period_id: &str) {
        *self.recommendation_period.lock().unwrap() = Some(period_id.to_string());
    }

    /// Hold every upsert until the returned notifier fires
    pub fn gate_upserts(&self) -> std::sync::Arc<Notify> {
        let gate = std::sync::Arc::new(Notify::new());
        *self.upsert_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    fn record(&self, operation: &'static str, arg: &str) -> BudgetPilotResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, arg));
        if self.failing.lock().unwrap().contains(operation) {
            return Err(BudgetPilotError::Service {
                status: 400,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BudgetingService for RecordingService {
    async fn upsert_period(&self, selection: &PeriodSelection) -> BudgetPilotResult<String> {
        let gate = self.upsert_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("upsert", &selection.to_string())?;

        let mut ids = self.ids.lock().unwrap();
        let next = format!("period-{}", ids.len() + 1);
        Ok(ids.entry(*selection).or_insert(next).clone())
    }

    async fn generate_recommendations(
        &self,
        selection: &PeriodSelection,
    ) -> BudgetPilotResult<Vec<Recommendation>> {
        self.record("recommend", &selection.to_string())?;
        let period_id = self.recommendation_period.lock().unwrap().clone();
        Ok(vec![
            Recommendation {
                plan_code: "BAL_50_30_20".into(),
                score: 0.9,
                needs_budget_pct: 50.0,
                wants_budget_pct: 30.0,
                savings_budget_pct: 20.0,
                recommendation_reason: Some("Balanced".into()),
                period_id: period_id.clone(),
            },
            Recommendation {
                plan_code: "SAVER_40_20_40".into(),
                score: 0.7,
                needs_budget_pct: 40.0,
                wants_budget_pct: 20.0,
                savings_budget_pct: 40.0,
                recommendation_reason: None,
                period_id,
            },
        ])
    }

    async fn commit_plan(
        &self,
        period_id: &str,
        plan_code: &str,
        _notes: Option<&str>,
    ) -> BudgetPilotResult<()> {
        self.record("commit", &format!("{}/{}", period_id, plan_code))
    }

    async fn autofill_categories(&self, period_id: &str) -> BudgetPilotResult<()> {
        self.record("autofill", period_id)
    }

    async fn compute_aggregate(&self, period_id: &str) -> BudgetPilotResult<()> {
        self.record("compute", period_id)
    }

    async fn overview(&self, period_id: &str) -> BudgetPilotResult<BudgetOverview> {
        self.record("overview", period_id)?;
        Ok(BudgetOverview {
            period_label: Some("Monthly: Jan 2024".into()),
            income_amt: 5000.0,
            needs_plan: 2500.0,
            needs_spent: 2600.0,
            needs_variance: 100.0,
            ..BudgetOverview::default()
        })
    }

    async fn category_budgets(&self, period_id: &str) -> BudgetPilotResult<Vec<CategoryBudget>> {
        self.record("categories", period_id)?;
        Ok(vec![CategoryBudget {
            band: "needs".into(),
            category: "Groceries".into(),
            planned_pct: 12.0,
            planned_amount: 600.0,
        }])
    }

    async fn trends(&self, period_id: &str) -> BudgetPilotResult<Vec<TrendPoint>> {
        self.record("trends", period_id)?;
        Ok(vec![TrendPoint {
            period_id: period_id.to_string(),
            period_label: "Monthly: Jan 2024".into(),
            period: "Jan 2024".into(),
            ..TrendPoint::default()
        }])
    }

    async fn insights(&self, period_id: &str) -> BudgetPilotResult<Vec<Insight>> {
        self.record("insights", period_id)?;
        Ok(vec![Insight {
            kind: "warning".into(),
            title: "Needs Overspend".into(),
            message: "Over by 100".into(),
            ..Insight::default()
        }])
    }

    async fn comparison(&self, period_id: &str) -> BudgetPilotResult<Option<PeriodComparison>> {
        self.record("comparison", period_id)?;
        Ok(Some(PeriodComparison {
            needs_change: 4.0,
            ..PeriodComparison::default()
        }))
    }
}
