//! Period CLI commands
//!
//! Implements CLI commands for selecting the budget period and driving the
//! planning pipeline against the budgeting service.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_dashboard, format_period_status, format_recommendations};
use crate::error::{BudgetPilotError, BudgetPilotResult};
use crate::models::{PeriodSelection, PeriodType};
use crate::services::{BudgetingService, PeriodWorkflow};

/// Period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Show the active period and its status
    Show,

    /// Select a period type or date range
    Select {
        /// Period type (monthly, quarterly, custom)
        #[arg(short = 't', long = "type")]
        period_type: Option<PeriodType>,
        /// Range start (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// Range end (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<NaiveDate>,
    },

    /// Create the selected period on the service
    Create,

    /// Generate plan recommendations for the selected period
    Recommend,

    /// Commit a recommended plan to the active period
    Commit {
        /// Plan code (e.g., "BAL_50_30_20")
        plan: String,
        /// Optional notes stored with the plan
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Autofill category budgets for the active period
    Autofill,

    /// Compute the period aggregate and show the dashboard
    Compute,

    /// Run create, recommend, autofill and compute in order
    Run,
}

/// Handle a period command
pub async fn handle_period_command<S: BudgetingService>(
    workflow: &PeriodWorkflow<S>,
    settings: &Settings,
    today: NaiveDate,
    cmd: PeriodCommands,
) -> BudgetPilotResult<()> {
    match cmd {
        PeriodCommands::Show => {
            print!(
                "{}",
                format_period_status(&workflow.selection(), &workflow.status())
            );
        }

        PeriodCommands::Select {
            period_type,
            start,
            end,
        } => {
            match (start, end) {
                (Some(start), Some(end)) => {
                    let period_type = period_type.unwrap_or(workflow.selection().period_type);
                    workflow.change_selection(PeriodSelection::new(period_type, start, end))?;
                }
                (None, None) => {
                    let period_type = period_type.ok_or_else(|| {
                        BudgetPilotError::Validation(
                            "Provide --type or both --start and --end".into(),
                        )
                    })?;
                    workflow.select_period_type(period_type, today)?;
                }
                _ => {
                    return Err(BudgetPilotError::Validation(
                        "Both --start and --end are required for a custom range".into(),
                    ));
                }
            }
            print!(
                "{}",
                format_period_status(&workflow.selection(), &workflow.status())
            );
        }

        PeriodCommands::Create => {
            let period_id = workflow.create_period(workflow.selection()).await?;
            println!("Created period: {}", period_id);
        }

        PeriodCommands::Recommend => {
            let items = workflow.generate_recommendations(workflow.selection()).await?;
            print!("{}", format_recommendations(&items));
            println!();

            let period_id = workflow.period_id();
            if !period_id.is_empty() {
                println!("Period: {}", period_id);
            }
        }

        PeriodCommands::Commit { plan, notes } => {
            let period_id = workflow.period_id();
            workflow
                .commit_plan(&period_id, &plan, notes.as_deref())
                .await?;
            println!("Committed plan '{}' to period {}", plan, period_id);
        }

        PeriodCommands::Autofill => {
            let period_id = workflow.period_id();
            workflow.autofill_categories(&period_id).await?;
            println!("Category budgets filled for period {}", period_id);
        }

        PeriodCommands::Compute => {
            let period_id = workflow.period_id();
            let snapshot = workflow.compute_aggregate(&period_id).await?;
            println!("{}", format_dashboard(&snapshot, &settings.currency_symbol));
        }

        PeriodCommands::Run => {
            let status = workflow.subscribe();
            let snapshot = workflow.run_all(workflow.selection()).await?;
            println!(
                "Period {} is {}",
                workflow.period_id(),
                status.borrow().label()
            );
            println!();
            println!("{}", format_dashboard(&snapshot, &settings.currency_symbol));
        }
    }

    Ok(())
}

/// Reload and show the dashboard for the active period
pub async fn handle_dashboard_command<S: BudgetingService>(
    workflow: &PeriodWorkflow<S>,
    settings: &Settings,
) -> BudgetPilotResult<()> {
    let period_id = workflow.period_id();
    if period_id.is_empty() {
        return Err(BudgetPilotError::period_required());
    }

    let snapshot = workflow.reload_dashboard(&period_id).await;
    println!("{}", format_dashboard(&snapshot, &settings.currency_symbol));
    Ok(())
}
