//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod allocation;
pub mod gesture;
pub mod period;

pub use allocation::{handle_allocate_command, AllocateArgs};
pub use gesture::{handle_gesture_command, GestureCommands};
pub use period::{handle_dashboard_command, handle_period_command, PeriodCommands};
