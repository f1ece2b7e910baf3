// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long tap recognition: a touch held still until a hold timer fires.
//!
//! [`LongTapState`] does not run timers itself. It stores the caller's timer
//! handle `T` and tells the caller which handle to cancel:
//!
//! 1) On `touchstart`, [`LongTapState::begin`] records the start and returns a
//!    still-pending timer from a previous touch, which the caller cancels. The
//!    caller then schedules the hold timer and hands it over with
//!    [`LongTapState::arm`].
//! 2) On `touchmove`, [`LongTapState::touch_move`] returns the timer to cancel
//!    once the touch strays more than `long_tap_slop` on either axis.
//! 3) On `touchend`, [`LongTapState::end`] returns the timer to cancel: a touch
//!    released before the hold time is not a long tap.
//! 4) When the hold timer fires, the caller calls [`LongTapState::fired`] and
//!    delivers the gesture.
//!
//! ```
//! use kurbo::Point;
//! use touchstory_gesture::GestureConfig;
//! use touchstory_gesture::long_tap::LongTapState;
//!
//! let config = GestureConfig::default();
//! let mut long_tap = LongTapState::<u32>::default();
//!
//! assert_eq!(long_tap.begin(Point::new(10.0, 10.0)), None);
//! long_tap.arm(7);
//! assert_eq!(long_tap.touch_move(Point::new(13.0, 12.0), &config), None);
//! assert_eq!(long_tap.touch_move(Point::new(20.0, 10.0), &config), Some(7));
//! assert!(!long_tap.is_pending());
//! ```

use kurbo::Point;

use crate::{GestureConfig, beyond};

/// Tracks a pending long tap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LongTapState<T> {
    /// Where the current touch started.
    pub start_pos: Option<Point>,
    timer: Option<T>,
}

impl<T> Default for LongTapState<T> {
    fn default() -> Self {
        Self {
            start_pos: None,
            timer: None,
        }
    }
}

impl<T> LongTapState<T> {
    /// Starts a new touch at `pos`, returning the previous touch's pending timer.
    pub fn begin(&mut self, pos: Point) -> Option<T> {
        self.start_pos = Some(pos);
        self.timer.take()
    }

    /// Stores the hold timer scheduled for the current touch.
    pub fn arm(&mut self, timer: T) {
        self.timer = Some(timer);
    }

    /// Handles a move to `pos`, returning the timer to cancel if the touch moved
    /// too far.
    pub fn touch_move(&mut self, pos: Point, config: &GestureConfig) -> Option<T> {
        let start = self.start_pos?;
        if self.timer.is_some() && beyond(start, pos, config.long_tap_slop) {
            self.timer.take()
        } else {
            None
        }
    }

    /// Handles the end of the touch, returning the timer to cancel.
    pub fn end(&mut self) -> Option<T> {
        self.timer.take()
    }

    /// Marks the hold timer as fired.
    pub fn fired(&mut self) {
        self.timer = None;
    }

    /// Returns `true` while a hold timer is armed.
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }
}
