//! Horizontal swipe recognizer
//!
//! A touch sequence becomes at most one left or right swipe. The recorded
//! distance is overwritten (never accumulated) by every horizontal-dominant
//! move, and the decision is taken on touch end with a plain `>=` threshold.

use tracing::debug;

use super::{Point, TouchEvent};

/// Default horizontal distance a swipe must cover, in pixels
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

/// Transient state of one swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeState {
    pub touch_start: Option<Point>,
    /// Signed horizontal distance, unbounded
    pub distance: f64,
    pub active: bool,
}

/// Direction of a recognized swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Advance the swipe state by one touch event
pub fn reduce(
    state: SwipeState,
    event: TouchEvent,
    threshold: f64,
) -> (SwipeState, Option<SwipeDirection>) {
    match event {
        TouchEvent::Start(point) => (
            SwipeState {
                touch_start: Some(point),
                distance: state.distance,
                active: true,
            },
            None,
        ),
        TouchEvent::Move(point) => {
            let Some(start) = state.touch_start else {
                return (state, None);
            };
            let dx = point.x - start.x;
            let dy = point.y - start.y;
            if dx.abs() > dy.abs() {
                (SwipeState { distance: dx, ..state }, None)
            } else {
                (state, None)
            }
        }
        TouchEvent::End => {
            let direction = if state.distance.abs() >= threshold {
                if state.distance < 0.0 {
                    Some(SwipeDirection::Left)
                } else {
                    Some(SwipeDirection::Right)
                }
            } else {
                None
            };
            debug!(distance = state.distance, ?direction, "swipe ended");
            (SwipeState::default(), direction)
        }
    }
}

/// Swipe recognizer for one element, firing caller-supplied callbacks
pub struct SwipeRecognizer<L, R>
where
    L: FnMut(),
    R: FnMut(),
{
    state: SwipeState,
    threshold: f64,
    on_swipe_left: L,
    on_swipe_right: R,
}

impl<L, R> SwipeRecognizer<L, R>
where
    L: FnMut(),
    R: FnMut(),
{
    pub fn new(threshold: f64, on_swipe_left: L, on_swipe_right: R) -> Self {
        Self {
            state: SwipeState::default(),
            threshold,
            on_swipe_left,
            on_swipe_right,
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        self.handle(TouchEvent::Start(Point::new(x, y)));
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) {
        self.handle(TouchEvent::Move(Point::new(x, y)));
    }

    pub fn on_touch_end(&mut self) -> Option<SwipeDirection> {
        self.handle(TouchEvent::End)
    }

    /// Feed one event; callbacks run before this returns
    pub fn handle(&mut self, event: TouchEvent) -> Option<SwipeDirection> {
        let (next, direction) = reduce(self.state, event, self.threshold);
        self.state = next;
        match direction {
            Some(SwipeDirection::Left) => (self.on_swipe_left)(),
            Some(SwipeDirection::Right) => (self.on_swipe_right)(),
            None => {}
        }
        direction
    }
}
