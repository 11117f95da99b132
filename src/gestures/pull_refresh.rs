//! Pull-to-refresh recognizer
//!
//! Arms only when the page is scrolled to the very top and no refresh is
//! running. While armed, downward movement tracks the pull distance (clamped
//! to twice the threshold); any upward movement or scrolling disarms it.
//! Releasing past the threshold triggers one refresh.

use std::cell::Cell;
use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

/// Default pull distance that triggers a refresh, in pixels
pub const DEFAULT_PULL_THRESHOLD: f64 = 80.0;

/// Touch input plus the page scroll offset at that moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PullEvent {
    Start { y: f64, scroll_y: f64 },
    Move { y: f64, scroll_y: f64 },
    End,
    /// The refresh callback settled, successfully or not
    RefreshFinished,
}

/// What the host should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullEffect {
    /// Suppress the host's native scroll for this move
    PreventDefault,
    /// Run the refresh callback
    Refresh,
}

/// Transient state of one pull gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PullState {
    /// Set while the gesture is armed
    pub start_y: Option<f64>,
    /// Clamped to `[0, 2 * threshold]`
    pub pull_distance: f64,
    pub refreshing: bool,
}

impl PullState {
    pub fn is_armed(&self) -> bool {
        self.start_y.is_some()
    }

    /// Pull progress relative to the threshold; at most 2.0
    pub fn progress(&self, threshold: f64) -> f64 {
        if threshold <= 0.0 {
            return 0.0;
        }
        self.pull_distance / threshold
    }
}

/// Advance the pull state by one event
pub fn reduce(state: PullState, event: PullEvent, threshold: f64) -> (PullState, Vec<PullEffect>) {
    match event {
        PullEvent::Start { y, scroll_y } => {
            let start_y = (scroll_y == 0.0 && !state.refreshing).then_some(y);
            (
                PullState {
                    start_y,
                    pull_distance: 0.0,
                    ..state
                },
                Vec::new(),
            )
        }
        PullEvent::Move { y, scroll_y } => {
            let Some(start_y) = state.start_y else {
                return (state, Vec::new());
            };
            let delta = y - start_y;
            if delta > 0.0 && scroll_y == 0.0 {
                (
                    PullState {
                        pull_distance: delta.min(2.0 * threshold),
                        ..state
                    },
                    vec![PullEffect::PreventDefault],
                )
            } else {
                (
                    PullState {
                        start_y: None,
                        pull_distance: 0.0,
                        ..state
                    },
                    Vec::new(),
                )
            }
        }
        PullEvent::End => {
            let triggered = state.is_armed() && state.pull_distance >= threshold;
            debug!(pull_distance = state.pull_distance, triggered, "pull ended");
            let next = PullState {
                start_y: None,
                pull_distance: 0.0,
                refreshing: state.refreshing || triggered,
            };
            let effects = if triggered {
                vec![PullEffect::Refresh]
            } else {
                Vec::new()
            };
            (next, effects)
        }
        PullEvent::RefreshFinished => (
            PullState {
                refreshing: false,
                ..state
            },
            Vec::new(),
        ),
    }
}

/// Pull-to-refresh recognizer for one scroll container
///
/// State sits in a `Cell` so the host can read it and feed new touches while
/// a refresh started by [`PullToRefresh::on_touch_end`] is still awaited.
#[derive(Debug, Clone)]
pub struct PullToRefresh {
    state: Cell<PullState>,
    threshold: f64,
}

impl PullToRefresh {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: Cell::new(PullState::default()),
            threshold,
        }
    }

    pub fn state(&self) -> PullState {
        self.state.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.get().refreshing
    }

    pub fn progress(&self) -> f64 {
        self.state.get().progress(self.threshold)
    }

    pub fn on_touch_start(&self, y: f64, scroll_y: f64) {
        self.handle(PullEvent::Start { y, scroll_y });
    }

    /// Returns true when the host should suppress its native scroll
    pub fn on_touch_move(&self, y: f64, scroll_y: f64) -> bool {
        self.handle(PullEvent::Move { y, scroll_y })
            .contains(&PullEffect::PreventDefault)
    }

    /// Finish the gesture, running `refresh` if the pull went far enough
    ///
    /// Refresh errors are logged and swallowed; `refreshing` is cleared
    /// either way. Returns whether a refresh ran.
    pub async fn on_touch_end<F, Fut, E>(&self, refresh: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let effects = self.handle(PullEvent::End);
        if !effects.contains(&PullEffect::Refresh) {
            return false;
        }

        if let Err(err) = refresh().await {
            warn!(error = %err, "refresh failed");
        }
        self.handle(PullEvent::RefreshFinished);
        true
    }

    pub fn handle(&self, event: PullEvent) -> Vec<PullEffect> {
        let (next, effects) = reduce(self.state.get(), event, self.threshold);
        self.state.set(next);
        effects
    }
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new(DEFAULT_PULL_THRESHOLD)
    }
}
