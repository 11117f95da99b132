//! Budget period workflow controller
//!
//! Drives create → recommend → autofill → compute against the budgeting
//! service, keeps the active period in the local store and publishes status
//! changes to subscribers.
//!
//! The controller is meant for a single-threaded executor. State lives in
//! `RefCell`s that are never borrowed across an `.await`, so different stages
//! can be awaited concurrently while a repeated call of a running stage fails
//! fast with [`BudgetPilotError::StageInFlight`]. Responses are applied in the
//! order they arrive; there is no request sequencing.

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{info, warn};

use super::budgeting::BudgetingService;
use crate::error::{BudgetPilotError, BudgetPilotResult};
use crate::models::{
    transition, DashboardSnapshot, PeriodSelection, PeriodState, PeriodStatus, PeriodType,
    Recommendation, Stage, WorkflowEvent,
};
use crate::storage::PeriodStateStore;

#[derive(Debug, Clone)]
struct WorkflowState {
    selection: PeriodSelection,
    status: PeriodStatus,
    recommendations: Vec<Recommendation>,
    dashboard: DashboardSnapshot,
    error: Option<String>,
}

/// Clears a stage's in-flight flag when the stage finishes, however it finishes
struct InFlightGuard<'a> {
    stages: &'a RefCell<HashSet<Stage>>,
    stage: Stage,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.stages.borrow_mut().remove(&self.stage);
    }
}

/// Orchestrates the period planning pipeline
pub struct PeriodWorkflow<S> {
    service: S,
    store: PeriodStateStore,
    state: RefCell<WorkflowState>,
    in_flight: RefCell<HashSet<Stage>>,
    status_tx: watch::Sender<PeriodStatus>,
}

impl<S: BudgetingService> PeriodWorkflow<S> {
    /// Restore the controller from the local store
    pub fn new(service: S, store: PeriodStateStore, today: NaiveDate) -> Self {
        let persisted = store.load(today);
        let status = PeriodStatus::from_period_id(&persisted.period_id);
        let (status_tx, _) = watch::channel(status.clone());

        Self {
            service,
            store,
            state: RefCell::new(WorkflowState {
                selection: persisted.selection(),
                status,
                recommendations: Vec::new(),
                dashboard: DashboardSnapshot::default(),
                error: None,
            }),
            in_flight: RefCell::new(HashSet::new()),
            status_tx,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn selection(&self) -> PeriodSelection {
        self.state.borrow().selection
    }

    pub fn status(&self) -> PeriodStatus {
        self.state.borrow().status.clone()
    }

    /// Active period id, empty when the period has not been created
    pub fn period_id(&self) -> String {
        self.state
            .borrow()
            .status
            .period_id()
            .unwrap_or_default()
            .to_string()
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.state.borrow().recommendations.clone()
    }

    pub fn dashboard(&self) -> DashboardSnapshot {
        self.state.borrow().dashboard.clone()
    }

    /// Message for the dismissible error banner
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.state.borrow_mut().error = None;
    }

    pub fn is_in_flight(&self, stage: Stage) -> bool {
        self.in_flight.borrow().contains(&stage)
    }

    /// Receive every status transition
    pub fn subscribe(&self) -> watch::Receiver<PeriodStatus> {
        self.status_tx.subscribe()
    }

    /// Pick a new type or date range; drops the period and everything derived from it
    pub fn change_selection(&self, selection: PeriodSelection) -> BudgetPilotResult<()> {
        selection.validate()?;

        {
            let mut state = self.state.borrow_mut();
            if state.selection == selection {
                return Ok(());
            }
            state.selection = selection;
            state.recommendations.clear();
            state.dashboard = DashboardSnapshot::default();
        }

        info!(%selection, "period selection changed");
        self.apply(WorkflowEvent::SelectionChanged);
        self.persist();
        Ok(())
    }

    /// Switch period type, using that type's default range around `today`
    pub fn select_period_type(
        &self,
        period_type: PeriodType,
        today: NaiveDate,
    ) -> BudgetPilotResult<()> {
        self.change_selection(PeriodSelection::default_for(period_type, today))
    }

    /// Stage 1: upsert the period on the service
    pub async fn create_period(&self, selection: PeriodSelection) -> BudgetPilotResult<String> {
        selection.validate()?;
        let _guard = self.begin(Stage::Create)?;

        info!(%selection, "creating period");
        match self.service.upsert_period(&selection).await {
            Ok(period_id) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.selection = selection;
                    state.recommendations.clear();
                    state.dashboard = DashboardSnapshot::default();
                    state.error = None;
                }
                self.apply(WorkflowEvent::Created {
                    period_id: period_id.clone(),
                });
                self.persist();
                Ok(period_id)
            }
            Err(err) => Err(self.fail(Stage::Create, err)),
        }
    }

    /// Stage 2: ask the service for plan recommendations
    ///
    /// Works without a created period. When the response carries a period id
    /// the controller adopts it, so the explicit create step can be skipped.
    pub async fn generate_recommendations(
        &self,
        selection: PeriodSelection,
    ) -> BudgetPilotResult<Vec<Recommendation>> {
        selection.validate()?;
        let _guard = self.begin(Stage::Recommend)?;

        info!(%selection, "generating recommendations");
        match self.service.generate_recommendations(&selection).await {
            Ok(items) => {
                let embedded = items
                    .iter()
                    .filter_map(|item| item.period_id.as_deref())
                    .find(|id| !id.is_empty())
                    .map(str::to_string);

                {
                    let mut state = self.state.borrow_mut();
                    if let Some(period_id) = &embedded {
                        if state.status.period_id() != Some(period_id.as_str()) {
                            state.dashboard = DashboardSnapshot::default();
                        }
                        state.selection = selection;
                    }
                    state.recommendations = items.clone();
                    state.error = None;
                }

                if let Some(period_id) = embedded {
                    info!(period_id = %period_id, "adopting period from recommendations");
                    self.apply(WorkflowEvent::RecommendationsGenerated {
                        period_id: Some(period_id),
                    });
                    self.persist();
                }
                Ok(items)
            }
            Err(err) => Err(self.fail(Stage::Recommend, err)),
        }
    }

    /// Commit one recommended plan to the period
    pub async fn commit_plan(
        &self,
        period_id: &str,
        plan_code: &str,
        notes: Option<&str>,
    ) -> BudgetPilotResult<()> {
        require_period(period_id)?;
        if plan_code.trim().is_empty() {
            return Err(BudgetPilotError::Validation("plan required".into()));
        }
        let _guard = self.begin(Stage::Commit)?;

        info!(period_id, plan_code, "committing plan");
        match self.service.commit_plan(period_id, plan_code, notes).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(Stage::Commit, err)),
        }
    }

    /// Stage 3: let the service fill category budgets for the period
    pub async fn autofill_categories(&self, period_id: &str) -> BudgetPilotResult<()> {
        require_period(period_id)?;
        let _guard = self.begin(Stage::Autofill)?;

        info!(period_id, "autofilling categories");
        match self.service.autofill_categories(period_id).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(Stage::Autofill, err)),
        }
    }

    /// Stage 4: compute the period aggregate, then reload the dashboard
    ///
    /// Only the active period can be computed; a stale id left over from a
    /// previous selection is rejected before any request is made.
    pub async fn compute_aggregate(&self, period_id: &str) -> BudgetPilotResult<DashboardSnapshot> {
        require_period(period_id)?;
        self.require_active(period_id)?;
        let _guard = self.begin(Stage::Compute)?;

        info!(period_id, "computing aggregate");
        if let Err(err) = self.service.compute_aggregate(period_id).await {
            return Err(self.fail(Stage::Compute, err));
        }

        self.apply(WorkflowEvent::AggregateComputed {
            period_id: period_id.to_string(),
        });
        Ok(self.reload_dashboard(period_id).await)
    }

    /// Fetch overview, categories, trends, insights and comparison together
    ///
    /// A failed fetch leaves that part at its empty default; the reload as a
    /// whole never fails. The result is only kept when `period_id` is still
    /// the active period once every fetch has returned.
    pub async fn reload_dashboard(&self, period_id: &str) -> DashboardSnapshot {
        let (overview, categories, trends, insights, comparison) = tokio::join!(
            self.service.overview(period_id),
            self.service.category_budgets(period_id),
            self.service.trends(period_id),
            self.service.insights(period_id),
            self.service.comparison(period_id),
        );

        let snapshot = DashboardSnapshot {
            overview: or_default("overview", overview.map(Some)),
            categories: or_default("categories", categories),
            trends: or_default("trends", trends),
            insights: or_default("insights", insights),
            comparison: or_default("comparison", comparison),
        };

        {
            let mut state = self.state.borrow_mut();
            if state.status.period_id() == Some(period_id) {
                state.dashboard = snapshot.clone();
            } else {
                warn!(period_id, "period changed during reload, discarding dashboard");
            }
        }
        snapshot
    }

    /// Run every stage in order for a selection
    pub async fn run_all(&self, selection: PeriodSelection) -> BudgetPilotResult<DashboardSnapshot> {
        self.create_period(selection).await?;
        self.generate_recommendations(selection).await?;
        // recommendations may have adopted a different period
        let period_id = self.period_id();
        self.autofill_categories(&period_id).await?;
        self.compute_aggregate(&period_id).await
    }

    fn begin(&self, stage: Stage) -> BudgetPilotResult<InFlightGuard<'_>> {
        if !self.in_flight.borrow_mut().insert(stage) {
            return Err(BudgetPilotError::StageInFlight(stage));
        }
        Ok(InFlightGuard {
            stages: &self.in_flight,
            stage,
        })
    }

    fn require_active(&self, period_id: &str) -> BudgetPilotResult<()> {
        let state = self.state.borrow();
        if state.status.period_id() != Some(period_id) {
            return Err(BudgetPilotError::Validation(format!(
                "period {} is not the active period",
                period_id
            )));
        }
        Ok(())
    }

    fn apply(&self, event: WorkflowEvent) {
        let next = {
            let mut state = self.state.borrow_mut();
            let next = transition(&state.status, &event);
            if next == state.status {
                return;
            }
            state.status = next.clone();
            next
        };

        info!(status = next.label(), period_id = next.period_id().unwrap_or(""), "period status changed");
        self.status_tx.send_replace(next);
    }

    fn fail(&self, stage: Stage, err: BudgetPilotError) -> BudgetPilotError {
        warn!(stage = %stage, error = %err, "stage failed");
        self.state.borrow_mut().error = Some(err.banner_message());
        self.apply(WorkflowEvent::StageFailed(stage));
        err
    }

    fn persist(&self) {
        let snapshot = {
            let state = self.state.borrow();
            PeriodState::with_id(
                state.status.period_id().unwrap_or_default(),
                state.selection,
            )
        };
        if let Err(err) = self.store.save(&snapshot) {
            warn!(error = %err, "failed to persist period state");
        }
    }
}

fn require_period(period_id: &str) -> BudgetPilotResult<()> {
    if period_id.trim().is_empty() {
        return Err(BudgetPilotError::period_required());
    }
    Ok(())
}

fn or_default<T: Default>(part: &str, result: BudgetPilotResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(part, error = %err, "dashboard fetch failed, showing empty");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::RecordingService;
    use crate::storage::KvStore;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> PeriodSelection {
        PeriodSelection::new(PeriodType::Monthly, date(2024, 1, 1), date(2024, 1, 31))
    }

    fn store(dir: &TempDir) -> PeriodStateStore {
        PeriodStateStore::new(KvStore::new(dir.path().join("local-store.json")))
    }

    fn workflow(dir: &TempDir) -> PeriodWorkflow<RecordingService> {
        PeriodWorkflow::new(RecordingService::new(), store(dir), date(2024, 1, 15))
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        let first = wf.create_period(january()).await.unwrap();
        let second = wf.create_period(january()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(wf.service().count("upsert"), 2);
        assert_eq!(
            wf.status(),
            PeriodStatus::Pending {
                period_id: first.clone()
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_range() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let selection =
            PeriodSelection::new(PeriodType::Custom, date(2024, 2, 1), date(2024, 1, 1));

        let err = wf.create_period(selection).await.unwrap_err();
        assert!(err.is_validation());
        assert!(wf.service().calls().is_empty());
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn test_autofill_requires_period() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        let err = wf.autofill_categories("").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: period required");
        assert!(wf.service().calls().is_empty());
    }

    #[tokio::test]
    async fn test_compute_requires_period() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        assert!(wf.compute_aggregate("").await.unwrap_err().is_validation());
        assert!(wf.service().calls().is_empty());
    }

    #[tokio::test]
    async fn test_full_pipeline_reaches_ready() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let mut updates = wf.subscribe();

        let snapshot = wf.run_all(january()).await.unwrap();
        let period_id = wf.period_id();

        assert_eq!(wf.status(), PeriodStatus::Ready { period_id });
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_ready());

        assert!(snapshot.overview.is_some());
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.insights.len(), 1);
        assert_eq!(wf.recommendations().len(), 2);
        assert_eq!(wf.dashboard(), snapshot);
    }

    #[tokio::test]
    async fn test_reload_degrades_each_part() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.service().fail("overview");
        wf.service().fail("trends");

        let period_id = wf.create_period(january()).await.unwrap();
        let snapshot = wf.compute_aggregate(&period_id).await.unwrap();

        assert!(snapshot.overview.is_none());
        assert!(snapshot.trends.is_empty());
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.insights.len(), 1);
        assert!(snapshot.comparison.is_some());
        assert!(wf.status().is_ready());
    }

    #[tokio::test]
    async fn test_stage_failure_keeps_state_and_sets_banner() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let period_id = wf.create_period(january()).await.unwrap();
        wf.compute_aggregate(&period_id).await.unwrap();
        let before = wf.dashboard();

        wf.service().fail("autofill");
        let err = wf.autofill_categories(&period_id).await.unwrap_err();

        assert!(err.is_service());
        assert!(wf.status().is_ready());
        assert_eq!(wf.dashboard(), before);
        assert_eq!(wf.error().as_deref(), Some("autofill failed"));
        assert!(!wf.is_in_flight(Stage::Autofill));

        wf.dismiss_error();
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_create_stays_not_created() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.service().fail("upsert");

        assert!(wf.create_period(january()).await.is_err());
        assert_eq!(wf.status(), PeriodStatus::NotCreated);
        assert_eq!(wf.error().as_deref(), Some("upsert failed"));
    }

    #[tokio::test]
    async fn test_changing_type_resets_ready_period() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.run_all(january()).await.unwrap();
        assert!(wf.status().is_ready());

        wf.select_period_type(PeriodType::Quarterly, date(2024, 1, 15))
            .unwrap();

        assert_eq!(wf.status(), PeriodStatus::NotCreated);
        assert!(wf.recommendations().is_empty());
        assert!(wf.dashboard().is_empty());
        assert_eq!(wf.selection().end, date(2024, 3, 31));
        assert_eq!(wf.period_id(), "");
    }

    #[tokio::test]
    async fn test_compute_rejects_id_from_previous_selection() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let old_id = wf.create_period(january()).await.unwrap();

        wf.select_period_type(PeriodType::Quarterly, date(2024, 1, 15))
            .unwrap();
        let err = wf.compute_aggregate(&old_id).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(wf.status(), PeriodStatus::NotCreated);
        assert!(wf.dashboard().is_empty());
        assert_eq!(wf.service().count("compute"), 0);
        assert_eq!(wf.service().count("overview"), 0);
        assert!(wf.error().is_none());
    }

    #[tokio::test]
    async fn test_reload_for_inactive_period_keeps_dashboard() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        let snapshot = wf.reload_dashboard("not-active").await;

        assert!(snapshot.overview.is_some());
        assert!(wf.dashboard().is_empty());
    }

    #[tokio::test]
    async fn test_adopting_new_period_clears_dashboard() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.run_all(january()).await.unwrap();
        assert!(!wf.dashboard().is_empty());

        wf.service().recommend_with_period("other");
        wf.generate_recommendations(january()).await.unwrap();

        assert_eq!(
            wf.status(),
            PeriodStatus::Pending {
                period_id: "other".into()
            }
        );
        assert!(wf.dashboard().is_empty());
        assert_eq!(wf.recommendations().len(), 2);
    }

    #[tokio::test]
    async fn test_adopting_same_period_keeps_dashboard() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.run_all(january()).await.unwrap();
        let period_id = wf.period_id();
        let before = wf.dashboard();

        wf.service().recommend_with_period(&period_id);
        wf.generate_recommendations(january()).await.unwrap();

        assert_eq!(wf.status(), PeriodStatus::Ready { period_id });
        assert_eq!(wf.dashboard(), before);
    }

    #[tokio::test]
    async fn test_same_selection_is_not_a_change() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let period_id = wf.create_period(january()).await.unwrap();

        wf.change_selection(january()).unwrap();
        assert_eq!(wf.status(), PeriodStatus::Pending { period_id });
    }

    #[tokio::test]
    async fn test_recommendations_adopt_period_id() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        wf.service().recommend_with_period("cold-start");

        wf.generate_recommendations(january()).await.unwrap();

        assert_eq!(
            wf.status(),
            PeriodStatus::Pending {
                period_id: "cold-start".into()
            }
        );
        assert_eq!(wf.service().count("upsert"), 0);

        wf.autofill_categories("cold-start").await.unwrap();
    }

    #[tokio::test]
    async fn test_recommendations_without_period_keep_status() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        let items = wf.generate_recommendations(january()).await.unwrap();
        assert_eq!(items[0].plan_code, "BAL_50_30_20");
        assert_eq!(wf.status(), PeriodStatus::NotCreated);
    }

    #[tokio::test]
    async fn test_commit_plan() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);

        assert!(wf.commit_plan("", "BAL", None).await.unwrap_err().is_validation());
        assert!(wf.commit_plan("p1", " ", None).await.unwrap_err().is_validation());

        wf.commit_plan("p1", "BAL", Some("from test")).await.unwrap();
        assert_eq!(wf.service().calls(), vec!["commit:p1/BAL".to_string()]);
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let period_id = {
            let wf = workflow(&dir);
            wf.create_period(january()).await.unwrap()
        };

        let restored = workflow(&dir);
        assert_eq!(restored.selection(), january());
        assert_eq!(restored.status(), PeriodStatus::Pending { period_id });
    }

    #[tokio::test]
    async fn test_same_stage_rejected_while_in_flight() {
        let dir = TempDir::new().unwrap();
        let wf = workflow(&dir);
        let gate = wf.service().gate_upserts();

        let (first, second, autofill, ()) = tokio::join!(
            wf.create_period(january()),
            async {
                tokio::task::yield_now().await;
                assert!(wf.is_in_flight(Stage::Create));
                wf.create_period(january()).await
            },
            async {
                tokio::task::yield_now().await;
                wf.autofill_categories("p-existing").await
            },
            async {
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                gate.notify_one();
            },
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(BudgetPilotError::StageInFlight(Stage::Create))
        ));
        assert!(autofill.is_ok());
        assert!(!wf.is_in_flight(Stage::Create));
        assert_eq!(wf.service().count("upsert"), 1);
    }
}
