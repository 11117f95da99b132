//! Budgeting service client
//!
//! The budgeting backend owns recommendations, aggregates and category plans.
//! The client only calls it; `BudgetingService` is the seam the workflow is
//! written against, `HttpBudgetingService` the production implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::{BudgetPilotError, BudgetPilotResult};
use crate::models::{
    BudgetOverview, CategoryBudget, Insight, PeriodComparison, PeriodSelection, Recommendation,
    TrendPoint,
};

/// Operations the budgeting backend exposes
#[async_trait]
pub trait BudgetingService: Send + Sync {
    /// Create or look up the period for a selection; identical selections
    /// yield the same id
    async fn upsert_period(&self, selection: &PeriodSelection) -> BudgetPilotResult<String>;

    async fn generate_recommendations(
        &self,
        selection: &PeriodSelection,
    ) -> BudgetPilotResult<Vec<Recommendation>>;

    async fn commit_plan(
        &self,
        period_id: &str,
        plan_code: &str,
        notes: Option<&str>,
    ) -> BudgetPilotResult<()>;

    async fn autofill_categories(&self, period_id: &str) -> BudgetPilotResult<()>;

    async fn compute_aggregate(&self, period_id: &str) -> BudgetPilotResult<()>;

    async fn overview(&self, period_id: &str) -> BudgetPilotResult<BudgetOverview>;

    async fn category_budgets(&self, period_id: &str) -> BudgetPilotResult<Vec<CategoryBudget>>;

    async fn trends(&self, period_id: &str) -> BudgetPilotResult<Vec<TrendPoint>>;

    async fn insights(&self, period_id: &str) -> BudgetPilotResult<Vec<Insight>>;

    async fn comparison(&self, period_id: &str) -> BudgetPilotResult<Option<PeriodComparison>>;
}

#[derive(Serialize)]
struct PeriodBody<'a> {
    period_type: &'a str,
    period_start: String,
    period_end: String,
}

impl<'a> PeriodBody<'a> {
    fn new(selection: &'a PeriodSelection) -> Self {
        Self {
            period_type: selection.period_type.as_str(),
            period_start: format_date(selection.start),
            period_end: format_date(selection.end),
        }
    }
}

#[derive(Serialize)]
struct PeriodIdBody<'a> {
    period_id: &'a str,
}

#[derive(Serialize)]
struct CommitBody<'a> {
    period_id: &'a str,
    plan_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[derive(Deserialize)]
struct UpsertResponse {
    period_id: String,
}

#[derive(Deserialize)]
struct Items<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct Insights {
    #[serde(default)]
    insights: Vec<Insight>,
}

/// HTTP client for the budgeting service routes
#[derive(Clone)]
pub struct HttpBudgetingService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBudgetingService {
    /// Build a client from settings
    pub fn new(settings: &Settings) -> BudgetPilotResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| BudgetPilotError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            token: settings.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> BudgetPilotResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        decode(request.send().await?).await
    }

    async fn get<T>(&self, path: &str, period_id: &str) -> BudgetPilotResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(path, period_id, "GET");
        let mut request = self
            .client
            .get(self.url(path))
            .query(&[("period_id", period_id)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        decode(request.send().await?).await
    }
}

#[async_trait]
impl BudgetingService for HttpBudgetingService {
    async fn upsert_period(&self, selection: &PeriodSelection) -> BudgetPilotResult<String> {
        let response: UpsertResponse = self
            .post("/periods/upsert", &PeriodBody::new(selection))
            .await?;
        Ok(response.period_id)
    }

    async fn generate_recommendations(
        &self,
        selection: &PeriodSelection,
    ) -> BudgetPilotResult<Vec<Recommendation>> {
        let response: Items<Recommendation> = self
            .post("/recommendations/generate", &PeriodBody::new(selection))
            .await?;
        Ok(response.items)
    }

    async fn commit_plan(
        &self,
        period_id: &str,
        plan_code: &str,
        notes: Option<&str>,
    ) -> BudgetPilotResult<()> {
        let body = CommitBody {
            period_id,
            plan_code,
            notes,
        };
        let _: serde_json::Value = self.post("/commit/period", &body).await?;
        Ok(())
    }

    async fn autofill_categories(&self, period_id: &str) -> BudgetPilotResult<()> {
        let _: serde_json::Value = self
            .post("/categories/autofill", &PeriodIdBody { period_id })
            .await?;
        Ok(())
    }

    async fn compute_aggregate(&self, period_id: &str) -> BudgetPilotResult<()> {
        let _: serde_json::Value = self
            .post("/aggregate/compute", &PeriodIdBody { period_id })
            .await?;
        Ok(())
    }

    async fn overview(&self, period_id: &str) -> BudgetPilotResult<BudgetOverview> {
        self.get("/overview", period_id).await
    }

    async fn category_budgets(&self, period_id: &str) -> BudgetPilotResult<Vec<CategoryBudget>> {
        let response: Items<CategoryBudget> = self.get("/categories/period", period_id).await?;
        Ok(response.items)
    }

    async fn trends(&self, period_id: &str) -> BudgetPilotResult<Vec<TrendPoint>> {
        let response: Items<TrendPoint> = self.get("/trends", period_id).await?;
        Ok(response.items)
    }

    async fn insights(&self, period_id: &str) -> BudgetPilotResult<Vec<Insight>> {
        let response: Insights = self.get("/insights/explain", period_id).await?;
        Ok(response.insights)
    }

    async fn comparison(&self, period_id: &str) -> BudgetPilotResult<Option<PeriodComparison>> {
        self.get("/comparison", period_id).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> BudgetPilotResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BudgetPilotError::Service {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| BudgetPilotError::Json(format!("Unexpected service response: {}", e)))
}

/// Pull the human-readable message out of an error body
///
/// The backend answers `{"detail": "..."}`; anything else is passed through.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<Detail>(body) {
        Ok(Detail {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(Detail { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "request failed".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodType;

    #[test]
    fn test_error_message_detail_string() {
        assert_eq!(
            error_message(r#"{"detail": "Failed to upsert period: bad date"}"#),
            "Failed to upsert period: bad date"
        );
    }

    #[test]
    fn test_error_message_structured_detail() {
        assert_eq!(
            error_message(r#"{"detail": [{"loc": ["body"]}]}"#),
            r#"[{"loc":["body"]}]"#
        );
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "request failed");
    }

    #[test]
    fn test_period_body_wire_format() {
        let selection = PeriodSelection::new(
            PeriodType::Quarterly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        let json = serde_json::to_value(PeriodBody::new(&selection)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "period_type": "quarterly",
                "period_start": "2024-01-01",
                "period_end": "2024-03-31"
            })
        );
    }

    #[test]
    fn test_commit_body_omits_missing_notes() {
        let body = CommitBody {
            period_id: "p1",
            plan_code: "BAL",
            notes: None,
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, serde_json::json!({"period_id": "p1", "plan_code": "BAL"}));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let settings = Settings {
            api_base_url: "http://localhost:8000/api/budgetpilot/".into(),
            ..Settings::default()
        };
        let service = HttpBudgetingService::new(&settings).unwrap();
        assert_eq!(service.base_url(), "http://localhost:8000/api/budgetpilot");
        assert_eq!(
            service.url("/periods/upsert"),
            "http://localhost:8000/api/budgetpilot/periods/upsert"
        );
    }
}
