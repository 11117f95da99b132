use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use budgetpilot::cli::{
    handle_allocate_command, handle_dashboard_command, handle_gesture_command,
    handle_period_command, AllocateArgs, GestureCommands, PeriodCommands,
};
use budgetpilot::config::{paths::BudgetPilotPaths, settings::Settings};
use budgetpilot::services::{HttpBudgetingService, PeriodWorkflow};
use budgetpilot::storage::open_period_store;

#[derive(Parser)]
#[command(
    name = "budgetpilot",
    author = "Kaylee Beyene",
    version,
    about = "Budget period planning from the command line",
    long_about = "BudgetPilot plans a budgeting period against the BudgetPilot service: \
                  pick a period, generate plan recommendations, autofill categories \
                  and compute the dashboard. It also rebalances needs/wants/assets \
                  splits and replays touch gestures offline."
)]
struct Cli {
    /// Budgeting service base URL
    #[arg(long, global = true, env = "BUDGETPILOT_API_URL")]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget period workflow commands
    #[command(subcommand)]
    Period(PeriodCommands),

    /// Show the dashboard for the active period
    Dashboard,

    /// Rebalance a needs/wants/assets split
    #[command(alias = "alloc")]
    Allocate(AllocateArgs),

    /// Replay touch gestures
    #[command(subcommand)]
    Gesture(GestureCommands),

    /// Show current configuration and paths
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = BudgetPilotPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }

    let filter = if cli.verbose {
        "debug"
    } else {
        settings.log_filter.as_str()
    };
    budgetpilot::logging::init(filter);

    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Period(cmd)) => {
            let workflow = PeriodWorkflow::new(
                HttpBudgetingService::new(&settings)?,
                open_period_store(&paths)?,
                today,
            );
            handle_period_command(&workflow, &settings, today, cmd).await?;
        }
        Some(Commands::Dashboard) => {
            let workflow = PeriodWorkflow::new(
                HttpBudgetingService::new(&settings)?,
                open_period_store(&paths)?,
                today,
            );
            handle_dashboard_command(&workflow, &settings).await?;
        }
        Some(Commands::Allocate(args)) => {
            handle_allocate_command(&settings, args)?;
        }
        Some(Commands::Gesture(cmd)) => {
            handle_gesture_command(&settings, cmd).await?;
        }
        Some(Commands::Config) => {
            println!("BudgetPilot Configuration");
            println!("=========================");
            println!("Data directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Local store:     {}", paths.local_store_file().display());
            println!();
            println!("Settings:");
            println!("  Service URL:     {}", settings.api_base_url);
            println!(
                "  API token:       {}",
                if settings.api_token.is_some() { "set" } else { "not set" }
            );
            println!("  Request timeout: {}s", settings.request_timeout_secs);
            println!("  Swipe threshold: {}px", settings.swipe_threshold);
            println!("  Pull threshold:  {}px", settings.pull_threshold);
            println!("  Log filter:      {}", settings.log_filter);
        }
        None => {
            println!("BudgetPilot - budget period planning");
            println!();
            println!("Run 'budgetpilot --help' for usage information.");
            println!("Run 'budgetpilot period show' to see the active period.");
        }
    }

    Ok(())
}
