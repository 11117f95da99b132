//! Touch gesture recognizers
//!
//! Gestures are pure reducers over primitive coordinate events, so they can
//! be driven by any host event loop and replayed deterministically. Each
//! recognizer instance owns its own state.

pub mod pull_refresh;
pub mod swipe;

pub use pull_refresh::{PullEffect, PullEvent, PullState, PullToRefresh, DEFAULT_PULL_THRESHOLD};
pub use swipe::{SwipeDirection, SwipeRecognizer, SwipeState, DEFAULT_SWIPE_THRESHOLD};

use std::str::FromStr;

use crate::error::BudgetPilotError;

/// Client coordinates of a touch point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point {
    type Err = BudgetPilotError;

    /// Parse `"x,y"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BudgetPilotError::Validation(format!("Invalid point '{}', expected x,y", s));
        let (x, y) = s.trim().split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

/// Raw touch input for the swipe recognizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start(Point),
    Move(Point),
    End,
}

/// Parse a whitespace-separated coordinate path like `"0,0 -30,2 -60,4"`
pub fn parse_path(path: &str) -> Result<Vec<Point>, BudgetPilotError> {
    path.split_whitespace().map(str::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!("-60,4.5".parse::<Point>().unwrap(), Point::new(-60.0, 4.5));
        assert_eq!(" 1 , 2 ".parse::<Point>().unwrap(), Point::new(1.0, 2.0));
        assert!("12".parse::<Point>().is_err());
        assert!("a,b".parse::<Point>().is_err());
    }

    #[test]
    fn test_parse_path() {
        let path = parse_path("0,0 -30,2  -60,4").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[2], Point::new(-60.0, 4.0));
        assert!(parse_path("0,0 x").is_err());
        assert!(parse_path("").unwrap().is_empty());
    }
}
