//! Gesture CLI commands
//!
//! Replays a coordinate path through the gesture recognizers. The first
//! point is the touch start, the rest are moves, and the path ends with a
//! touch end.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{BudgetPilotError, BudgetPilotResult};
use crate::gestures::{parse_path, PullToRefresh, SwipeRecognizer};

/// Gesture subcommands
#[derive(Subcommand)]
pub enum GestureCommands {
    /// Replay a horizontal swipe
    Swipe {
        /// Touch path as "x,y x,y ..."
        #[arg(short, long, allow_hyphen_values = true)]
        path: String,
        /// Override the swipe threshold in pixels
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Replay a pull-to-refresh
    Pull {
        /// Touch path as "x,y x,y ..."
        #[arg(short, long, allow_hyphen_values = true)]
        path: String,
        /// Page scroll offset while the gesture runs
        #[arg(short, long, default_value = "0")]
        scroll: f64,
        /// Override the pull threshold in pixels
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

/// Handle a gesture command
pub async fn handle_gesture_command(settings: &Settings, cmd: GestureCommands) -> BudgetPilotResult<()> {
    match cmd {
        GestureCommands::Swipe { path, threshold } => {
            let points = parse_path(&path)?;
            let (first, rest) = points
                .split_first()
                .ok_or_else(|| BudgetPilotError::Validation("Path is empty".into()))?;

            let threshold = threshold.unwrap_or(settings.swipe_threshold);
            let mut recognizer = SwipeRecognizer::new(
                threshold,
                || println!("Swiped left"),
                || println!("Swiped right"),
            );

            recognizer.on_touch_start(first.x, first.y);
            for point in rest {
                recognizer.on_touch_move(point.x, point.y);
            }
            let distance = recognizer.state().distance;
            if recognizer.on_touch_end().is_none() {
                println!(
                    "No swipe (distance {:.1}, threshold {:.1})",
                    distance, threshold
                );
            }
        }

        GestureCommands::Pull {
            path,
            scroll,
            threshold,
        } => {
            let points = parse_path(&path)?;
            let (first, rest) = points
                .split_first()
                .ok_or_else(|| BudgetPilotError::Validation("Path is empty".into()))?;

            let pull = PullToRefresh::new(threshold.unwrap_or(settings.pull_threshold));
            pull.on_touch_start(first.y, scroll);
            for point in rest {
                pull.on_touch_move(point.y, scroll);
            }
            println!("Pull progress: {:.0}%", pull.progress() * 100.0);

            let refreshed = pull
                .on_touch_end(|| async {
                    println!("Refreshing...");
                    Ok::<(), BudgetPilotError>(())
                })
                .await;
            if !refreshed {
                println!("No refresh");
            }
        }
    }

    Ok(())
}

