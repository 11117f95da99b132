//! Allocation CLI command
//!
//! Replays slider edits through the rebalancer and prints the resulting
//! split, amounts and validity.

use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_allocation;
use crate::display::report::format_amount;
use crate::error::BudgetPilotResult;
use crate::models::{AllocationSplit, Band};
use crate::services::AllocationRebalancer;

/// Arguments for `allocate`
#[derive(Args)]
pub struct AllocateArgs {
    /// Starting needs percentage
    #[arg(long, default_value = "50")]
    pub needs: f64,
    /// Starting wants percentage
    #[arg(long, default_value = "30")]
    pub wants: f64,
    /// Starting assets (savings) percentage
    #[arg(long, default_value = "20")]
    pub assets: f64,
    /// Income the percentages apply to
    #[arg(short, long, default_value = "0")]
    pub income: f64,
    /// Slider edit as band=value, applied in order (repeatable)
    #[arg(short, long = "set", value_name = "BAND=VALUE", value_parser = parse_edit)]
    pub edits: Vec<(Band, f64)>,
}

/// Handle the allocate command
pub fn handle_allocate_command(settings: &Settings, args: AllocateArgs) -> BudgetPilotResult<()> {
    let initial = AllocationSplit::new(args.needs, args.wants, args.assets);
    let mut rebalancer = AllocationRebalancer::new(initial, args.income, |snapshot| {
        println!(
            "  needs {:.2}%  wants {:.2}%  assets {:.2}%  ({})",
            snapshot.split.needs_pct,
            snapshot.split.wants_pct,
            snapshot.split.assets_pct,
            snapshot.validity
        );
    });

    for (band, value) in args.edits {
        println!("Set {} to {}", band, value);
        rebalancer.edit(band, value);
    }

    if rebalancer.split() != initial {
        println!();
    }
    println!(
        "Income: {}",
        format_amount(rebalancer.income(), &settings.currency_symbol)
    );
    print!(
        "{}",
        format_allocation(&rebalancer.snapshot(), &settings.currency_symbol)
    );
    Ok(())
}

fn parse_edit(s: &str) -> Result<(Band, f64), String> {
    let (band, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected BAND=VALUE, got '{}'", s))?;
    let band: Band = band.parse().map_err(|e| format!("{}", e))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid percentage '{}'", value))?;
    Ok((band, value))
}
