// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe recognition: a touch that moved past a threshold along its dominant axis.
//!
//! ## Usage
//!
//! 1) Start tracking with [`SwipeState::start`] on `touchstart`.
//! 2) Call [`SwipeState::touch_move`] for every `touchmove`. A touch that never
//!    moved never swipes, however far apart its start and end points are.
//! 3) On `touchend`, [`SwipeState::end`] returns the recognized direction.
//!
//! The travel is `end - start`. The dominant axis is the one with the larger
//! absolute travel; ties go to the horizontal axis. Positive horizontal travel
//! maps to [`SwipeDirection::Left`], negative to [`SwipeDirection::Right`],
//! positive vertical travel to [`SwipeDirection::Up`], negative to
//! [`SwipeDirection::Down`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use touchstory_gesture::{GestureConfig, SwipeDirection};
//! use touchstory_gesture::swipe::SwipeState;
//!
//! let config = GestureConfig::default();
//! let mut swipe = SwipeState::default();
//!
//! swipe.start(Point::new(50.0, 50.0));
//! swipe.touch_move();
//! assert_eq!(swipe.end(Point::new(45.0, 10.0), &config), Some(SwipeDirection::Down));
//! ```

use kurbo::Point;

use crate::{GestureConfig, SwipeDirection};

/// Tracks swipe state between touch events.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SwipeState {
    /// Where the current touch started.
    pub start_pos: Option<Point>,
    /// Whether at least one move was seen since the start.
    pub moved: bool,
}

impl SwipeState {
    /// Starts tracking a new touch at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.moved = false;
    }

    /// Records that the touch moved.
    pub fn touch_move(&mut self) {
        self.moved = true;
    }

    /// Ends the touch at `pos` and returns the swipe direction, if any.
    pub fn end(&mut self, pos: Point, config: &GestureConfig) -> Option<SwipeDirection> {
        if !self.moved {
            return None;
        }
        let start = self.start_pos?;
        let travel = pos - start;
        let threshold = config.swipe_threshold;
        if abs(travel.x) >= abs(travel.y) {
            if travel.x > threshold {
                Some(SwipeDirection::Left)
            } else if travel.x < -threshold {
                Some(SwipeDirection::Right)
            } else {
                None
            }
        } else if travel.y > threshold {
            Some(SwipeDirection::Up)
        } else if travel.y < -threshold {
            Some(SwipeDirection::Down)
        } else {
            None
        }
    }
}

#[inline]
fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}
