// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double tap recognition.
//!
//! Two state machines cooperate:
//!
//! - [`DoubleTapState`] lives with each binding. It sees the binding's own
//!   `touchstart`/`touchend` and decides whether a tap completes a pair.
//! - [`GraceTracker`] is process-wide and only used on iOS, where the second
//!   tap of a double tap may be swallowed by the platform. It watches every touch
//!   at the document body and says when the first tap of a potential pair should
//!   arm a grace timer. If the timer expires without the pair being completed or
//!   a `click` arriving, the caller replays the first tap as a *fake* tap.
//!
//! ## Pair predicate
//!
//! A `touchend` at time `t` completes a double tap when all of these hold:
//!
//! - it is a tap (movement below `tap_slop` on both axes);
//! - the previous `touchend` of the binding was less than `double_tap_interval`
//!   ago;
//! - a first tap was recorded and lies less than `double_tap_slop` away on both
//!   axes;
//! - the caller's `accept` check passes (delegation bookkeeping or a fake tap).
//!
//! A tap arriving `double_tap_interval` or later after the previous end records
//! itself as the first tap of a new pair. A touch that moved resets the pair.
//!
//! ```
//! use kurbo::Point;
//! use touchstory_gesture::GestureConfig;
//! use touchstory_gesture::double_tap::{DoubleTapOutcome, DoubleTapState};
//!
//! let config = GestureConfig::default();
//! let mut state = DoubleTapState::default();
//!
//! state.start(Point::new(100.0, 100.0));
//! let first = state.end(Point::new(100.0, 100.0), 1_000, &config, || true);
//! assert_eq!(first, DoubleTapOutcome::FirstTap);
//!
//! state.start(Point::new(110.0, 105.0));
//! let second = state.end(Point::new(110.0, 105.0), 1_300, &config, || true);
//! assert_eq!(second, DoubleTapOutcome::DoubleTap);
//! ```

use kurbo::Point;

use crate::{GestureConfig, within};

/// What a `touchend` meant for a [`DoubleTapState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DoubleTapOutcome {
    /// The tap completed a double tap; the pair was reset.
    DoubleTap,
    /// The tap was recorded as the first of a potential pair.
    FirstTap,
    /// A tap arrived too soon after the previous end to start a pair but did not
    /// complete one either.
    Ignored,
    /// The touch moved; any pending pair was discarded.
    Reset,
}

/// Per-binding double tap state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DoubleTapState {
    /// Where the current touch started.
    pub start_pos: Option<Point>,
    /// End position of the recorded first tap.
    pub last_end: Option<Point>,
    /// Time of the previous `touchend`, recorded or not.
    pub last_time: Option<u64>,
}

impl DoubleTapState {
    /// Records the start of a touch.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
    }

    /// Handles a `touchend` at `pos` and `time`.
    ///
    /// `accept` runs only when the spatial and temporal predicates already hold.
    pub fn end(
        &mut self,
        pos: Point,
        time: u64,
        config: &GestureConfig,
        accept: impl FnOnce() -> bool,
    ) -> DoubleTapOutcome {
        let is_tap = self
            .start_pos
            .is_some_and(|start| within(start, pos, config.tap_slop));
        let quick = self
            .last_time
            .is_some_and(|last| time.saturating_sub(last) < config.double_tap_interval);
        self.last_time = Some(time);

        if !is_tap {
            self.last_end = None;
            return DoubleTapOutcome::Reset;
        }
        if !quick {
            self.last_end = Some(pos);
            return DoubleTapOutcome::FirstTap;
        }
        let paired = self
            .last_end
            .is_some_and(|last| within(last, pos, config.double_tap_slop));
        if paired && accept() {
            self.last_end = None;
            DoubleTapOutcome::DoubleTap
        } else {
            DoubleTapOutcome::Ignored
        }
    }

    /// Forgets the recorded first tap.
    pub fn reset(&mut self) {
        self.last_end = None;
    }
}

/// Process-wide tracker deciding when a lone first tap arms the grace timer.
///
/// A fresh tracker waits for the first `touchend` of a pair. Every `touchend`
/// toggles between "first" and "second", and [`GraceTracker::reset`] returns it
/// to "first" (on `click`, on grace expiry).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraceTracker {
    touch_start: Option<u64>,
    awaiting_first: bool,
}

impl Default for GraceTracker {
    fn default() -> Self {
        Self {
            touch_start: None,
            awaiting_first: true,
        }
    }
}

impl GraceTracker {
    /// Records the time a touch started.
    pub fn touch_start(&mut self, time: u64) {
        self.touch_start = Some(time);
    }

    /// Handles a `touchend` at `time`.
    ///
    /// Returns `true` if this end is the first of a potential pair and the touch
    /// was short enough to count as a tap, i.e. when the grace timer should arm.
    pub fn touch_end(&mut self, time: u64, config: &GestureConfig) -> bool {
        if !self.awaiting_first {
            self.awaiting_first = true;
            return false;
        }
        self.awaiting_first = false;
        self.touch_start
            .is_some_and(|start| time.saturating_sub(start) < config.double_tap_max_hold)
    }

    /// Waits for the first tap of a new pair.
    pub fn reset(&mut self) {
        self.awaiting_first = true;
    }

    /// Returns `true` while the tracker waits for the first tap of a pair.
    pub fn awaiting_first(&self) -> bool {
        self.awaiting_first
    }
}
