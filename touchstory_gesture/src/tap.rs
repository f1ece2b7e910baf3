// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition: a touch that ends within a small box around its start.
//!
//! ## Usage
//!
//! 1) On `touchstart`, call [`TapState::start`] with the first touch's position.
//! 2) On `touchend`, call [`TapState::end`] with the changed touch's position; it
//!    returns `true` when the touch qualifies as a tap.

use kurbo::Point;

use crate::{GestureConfig, within};

/// Tracks the start of the current touch.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TapState {
    /// Where the current touch started.
    pub start_pos: Option<Point>,
}

impl TapState {
    /// Records the start of a touch.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
    }

    /// Returns `true` if a touch ending at `pos` is a tap.
    ///
    /// A touch end without a recorded start never taps.
    pub fn end(&mut self, pos: Point, config: &GestureConfig) -> bool {
        self.start_pos
            .is_some_and(|start| within(start, pos, config.tap_slop))
    }
}
