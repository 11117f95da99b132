//! Dashboard display formatting
//!
//! Formats the period status, recommendations, allocation split and
//! dashboard snapshot for terminal output.

use super::report::{
    double_separator, format_amount, format_amount_colored, format_bar, format_change,
    format_percentage, separator, truncate,
};
use crate::models::{
    BudgetOverview, DashboardSnapshot, PeriodComparison, PeriodSelection, PeriodStatus,
    Recommendation,
};
use crate::services::AllocationSnapshot;

const WIDTH: usize = 64;

/// Format the active period and its workflow status
pub fn format_period_status(selection: &PeriodSelection, status: &PeriodStatus) -> String {
    let mut output = String::new();
    output.push_str(&format!("Period:    {}\n", selection));
    output.push_str(&format!("Status:    {}\n", status.label()));
    if let Some(id) = status.period_id() {
        output.push_str(&format!("Period ID: {}\n", id));
    }
    output
}

/// Format scored plan recommendations as a table
pub fn format_recommendations(items: &[Recommendation]) -> String {
    if items.is_empty() {
        return "No recommendations.".to_string();
    }

    let code_width = items
        .iter()
        .map(|r| r.plan_code.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<code_width$}  {:>6}  {:>6}  {:>6}  {:>6}  {}\n",
        "Plan",
        "Score",
        "Needs",
        "Wants",
        "Assets",
        "Reason",
        code_width = code_width,
    ));
    output.push_str(&format!(
        "{:-<code_width$}  {:->6}  {:->6}  {:->6}  {:->6}  {:-<20}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        code_width = code_width,
    ));

    for item in items {
        output.push_str(&format!(
            "{:<code_width$}  {:>6.2}  {:>6}  {:>6}  {:>6}  {}\n",
            item.plan_code,
            item.score,
            format_percentage(item.needs_budget_pct),
            format_percentage(item.wants_budget_pct),
            format_percentage(item.savings_budget_pct),
            truncate(item.recommendation_reason.as_deref().unwrap_or(""), 40),
            code_width = code_width,
        ));
    }

    output
}

/// Format a rebalanced split with its amounts and validity
pub fn format_allocation(snapshot: &AllocationSnapshot, symbol: &str) -> String {
    let split = &snapshot.split;
    let amounts = &snapshot.amounts;
    let rows = [
        ("Needs", split.needs_pct, amounts.needs),
        ("Wants", split.wants_pct, amounts.wants),
        ("Assets", split.assets_pct, amounts.assets),
    ];

    let mut output = String::new();
    for (name, pct, amount) in rows {
        output.push_str(&format!(
            "{:<8} {:>7.2}%  {}  {:>14}\n",
            name,
            pct,
            format_bar(pct, 100.0, 20),
            format_amount(amount, symbol),
        ));
    }
    output.push_str(&format!("{}\n", separator(WIDTH)));
    output.push_str(&format!(
        "{:<8} {:>7.2}%  {}\n",
        "Total",
        split.total(),
        snapshot.validity
    ));
    output
}

/// Format everything loaded for a period
pub fn format_dashboard(snapshot: &DashboardSnapshot, symbol: &str) -> String {
    if snapshot.is_empty() {
        return "No dashboard data for this period.".to_string();
    }

    let mut output = String::new();

    if let Some(overview) = &snapshot.overview {
        output.push_str(&format_overview(overview, symbol));
    }

    if !snapshot.categories.is_empty() {
        output.push_str("\nCategories\n");
        output.push_str(&format!("{}\n", separator(WIDTH)));
        for row in &snapshot.categories {
            output.push_str(&format!(
                "{:<8} {:<24} {:>7}  {:>14}\n",
                row.band,
                truncate(&row.category, 24),
                format_percentage(row.planned_pct),
                format_amount(row.planned_amount, symbol),
            ));
        }
    }

    if !snapshot.trends.is_empty() {
        let max = snapshot
            .trends
            .iter()
            .map(|t| t.needs_spent + t.wants_spent + t.assets_spent)
            .fold(0.0, f64::max);

        output.push_str("\nTrends\n");
        output.push_str(&format!("{}\n", separator(WIDTH)));
        for point in &snapshot.trends {
            let spent = point.needs_spent + point.wants_spent + point.assets_spent;
            let label = if point.period_label.is_empty() {
                &point.period
            } else {
                &point.period_label
            };
            output.push_str(&format!(
                "{:<14} {}  {:>14}\n",
                truncate(label, 14),
                format_bar(spent, max, 24),
                format_amount(spent, symbol),
            ));
        }
    }

    if let Some(comparison) = &snapshot.comparison {
        output.push_str(&format_comparison(comparison));
    }

    if !snapshot.insights.is_empty() {
        output.push_str("\nInsights\n");
        output.push_str(&format!("{}\n", separator(WIDTH)));
        for insight in &snapshot.insights {
            let icon = insight.icon.as_deref().unwrap_or("•");
            output.push_str(&format!("{} {}\n", icon, insight.title));
            if !insight.message.is_empty() {
                output.push_str(&format!("  {}\n", insight.message));
            }
        }
    }

    output
}

fn format_overview(overview: &BudgetOverview, symbol: &str) -> String {
    let title = overview
        .period_label
        .as_deref()
        .unwrap_or("Budget Overview");
    let plan = overview
        .plan_name
        .as_deref()
        .or(overview.plan_code.as_deref())
        .unwrap_or("no plan committed");

    let mut output = String::new();
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", double_separator(WIDTH)));
    output.push_str(&format!("Plan:   {}\n", plan));
    output.push_str(&format!("Income: {}\n\n", format_amount(overview.income_amt, symbol)));
    output.push_str(&format!(
        "{:<8} {:>14} {:>14} {:>14}\n",
        "", "Planned", "Spent", "Variance"
    ));

    let rows = [
        ("Needs", overview.needs_plan, overview.needs_spent, overview.needs_variance),
        ("Wants", overview.wants_plan, overview.wants_spent, overview.wants_variance),
        ("Assets", overview.assets_plan, overview.assets_spent, overview.assets_variance),
    ];
    for (name, plan, spent, variance) in rows {
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            name,
            format_amount(plan, symbol),
            format_amount(spent, symbol),
            format_amount_colored(variance, symbol),
        ));
    }
    output
}

fn format_comparison(comparison: &PeriodComparison) -> String {
    let against = comparison
        .previous_period_label
        .as_deref()
        .unwrap_or("previous period");

    let mut output = String::new();
    output.push_str(&format!("\nCompared with {}\n", against));
    output.push_str(&format!("{}\n", separator(WIDTH)));
    output.push_str(&format!("Needs  {}\n", format_change(comparison.needs_change)));
    output.push_str(&format!("Wants  {}\n", format_change(comparison.wants_change)));
    output.push_str(&format!("Assets {}\n", format_change(comparison.assets_change)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationSplit, Insight, PeriodType};
    use chrono::NaiveDate;

    #[test]
    fn test_period_status_shows_id() {
        let selection = PeriodSelection::new(
            PeriodType::Monthly,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );

        let output = format_period_status(&selection, &PeriodStatus::NotCreated);
        assert!(output.contains("not created"));
        assert!(!output.contains("Period ID"));

        let output = format_period_status(
            &selection,
            &PeriodStatus::Ready {
                period_id: "p-1".into(),
            },
        );
        assert!(output.contains("ready"));
        assert!(output.contains("p-1"));
    }

    #[test]
    fn test_recommendations_table() {
        let items = vec![Recommendation {
            plan_code: "BAL_50_30_20".into(),
            score: 0.91,
            needs_budget_pct: 50.0,
            wants_budget_pct: 30.0,
            savings_budget_pct: 20.0,
            recommendation_reason: Some("Balanced".into()),
            period_id: None,
        }];

        let output = format_recommendations(&items);
        assert!(output.contains("BAL_50_30_20"));
        assert!(output.contains("0.91"));
        assert!(output.contains("Balanced"));
        assert_eq!(format_recommendations(&[]), "No recommendations.");
    }

    #[test]
    fn test_allocation_shows_validity() {
        let split = AllocationSplit::new(60.0, 30.0, 20.0);
        let snapshot = AllocationSnapshot {
            split,
            amounts: split.amounts(1000.0),
            validity: split.validity(),
        };

        let output = format_allocation(&snapshot, "₹");
        assert!(output.contains("Invalid"));
        assert!(output.contains("₹600.00"));
    }

    #[test]
    fn test_empty_dashboard() {
        assert_eq!(
            format_dashboard(&DashboardSnapshot::default(), "₹"),
            "No dashboard data for this period."
        );
    }

    #[test]
    fn test_dashboard_sections() {
        let snapshot = DashboardSnapshot {
            overview: Some(BudgetOverview {
                period_label: Some("January 2024".into()),
                plan_code: Some("BAL_50_30_20".into()),
                income_amt: 50000.0,
                ..BudgetOverview::default()
            }),
            insights: vec![Insight {
                title: "Wants are up".into(),
                message: "Dining out doubled".into(),
                ..Insight::default()
            }],
            comparison: Some(PeriodComparison {
                wants_change: 12.5,
                ..PeriodComparison::default()
            }),
            ..DashboardSnapshot::default()
        };

        let output = format_dashboard(&snapshot, "₹");
        assert!(output.contains("January 2024"));
        assert!(output.contains("BAL_50_30_20"));
        assert!(output.contains("₹50,000.00"));
        assert!(output.contains("Wants are up"));
        assert!(output.contains("▲ 12.5%"));
        assert!(!output.contains("Categories"));
    }
}
