// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=touchstory_gesture --heading-base-level=0

//! Touchstory Gesture: small state machines that recognize touch gestures.
//!
//! Each module handles one gesture and tracks just enough state between raw
//! touch events to decide whether the gesture completed:
//!
//! - [`tap`]: a touch that ends where it started
//! - [`double_tap`]: two taps close in time and space, plus the body-level
//!   grace tracker used on iOS
//! - [`long_tap`]: a touch held still until a timer fires
//! - [`swipe`]: a touch that moved far enough along a dominant axis
//!
//! The machines do not own timers, handlers or element trees. They accept
//! positions and timestamps, and answer with decisions the caller acts on. The
//! `touchstory_events` crate wires them to raw event streams.
//!
//! All thresholds live in [`GestureConfig`]; its [`Default`] carries the values
//! the recognizers are tuned for.
//!
//! ## Tap
//!
//! ```rust
//! use kurbo::Point;
//! use touchstory_gesture::GestureConfig;
//! use touchstory_gesture::tap::TapState;
//!
//! let config = GestureConfig::default();
//! let mut tap = TapState::default();
//!
//! tap.start(Point::new(100.0, 100.0));
//! assert!(tap.end(Point::new(103.0, 104.0), &config));
//!
//! tap.start(Point::new(100.0, 100.0));
//! assert!(!tap.end(Point::new(110.0, 100.0), &config));
//! ```
//!
//! ## Swipe
//!
//! ```rust
//! use kurbo::Point;
//! use touchstory_gesture::{GestureConfig, SwipeDirection, SwipeFilter};
//! use touchstory_gesture::swipe::SwipeState;
//!
//! let config = GestureConfig::default();
//! let mut swipe = SwipeState::default();
//!
//! swipe.start(Point::new(0.0, 0.0));
//! swipe.touch_move();
//! let direction = swipe.end(Point::new(30.0, 0.0), &config);
//! assert_eq!(direction, Some(SwipeDirection::Left));
//! assert!(SwipeFilter::Any.accepts(SwipeDirection::Left));
//! assert!(!SwipeFilter::Right.accepts(SwipeDirection::Left));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std` compatible.

#![no_std]

use kurbo::Point;

pub mod double_tap;
pub mod long_tap;
pub mod swipe;
pub mod tap;

/// Raw `touchstart` event name.
pub const TOUCH_START: &str = "touchstart";
/// Raw `touchmove` event name.
pub const TOUCH_MOVE: &str = "touchmove";
/// Raw `touchend` event name.
pub const TOUCH_END: &str = "touchend";
/// Raw `click` event name.
pub const CLICK: &str = "click";

/// Spatial and temporal thresholds of the recognizers.
///
/// Distances are in CSS pixels, durations in milliseconds. Comparisons are
/// strict: a tap with exactly `tap_slop` movement is not a tap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Maximum per-axis movement between start and end of a tap.
    pub tap_slop: f64,
    /// Maximum time between the ends of two taps forming a double tap.
    pub double_tap_interval: u64,
    /// Maximum per-axis distance between the ends of two taps forming a double tap.
    pub double_tap_slop: f64,
    /// Touches held at least this long never start a double tap.
    pub double_tap_max_hold: u64,
    /// Grace window after a lone first tap before it is replayed (iOS).
    pub double_tap_grace: u64,
    /// Hold time after which a still touch becomes a long tap.
    pub long_tap_delay: u64,
    /// Movement beyond this (per axis) cancels a pending long tap.
    pub long_tap_slop: f64,
    /// Minimum travel on the dominant axis for a swipe.
    pub swipe_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 6.0,
            double_tap_interval: 501,
            double_tap_slop: 45.0,
            double_tap_max_hold: 501,
            double_tap_grace: 400,
            long_tap_delay: 750,
            long_tap_slop: 5.0,
            swipe_threshold: 20.0,
        }
    }
}

/// A swipe direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Positive horizontal travel.
    Left,
    /// Negative horizontal travel.
    Right,
    /// Positive vertical travel.
    Up,
    /// Negative vertical travel.
    Down,
}

/// Which swipes a binding is interested in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwipeFilter {
    /// Any qualifying swipe (`swipe`).
    Any,
    /// Only [`SwipeDirection::Left`] (`swipeLeft`).
    Left,
    /// Only [`SwipeDirection::Right`] (`swipeRight`).
    Right,
    /// Only [`SwipeDirection::Up`] (`swipeUp`).
    Up,
    /// Only [`SwipeDirection::Down`] (`swipeDown`).
    Down,
}

impl SwipeFilter {
    /// Returns `true` if a swipe in `direction` satisfies this filter.
    #[must_use]
    pub fn accepts(self, direction: SwipeDirection) -> bool {
        matches!(
            (self, direction),
            (Self::Any, _)
                | (Self::Left, SwipeDirection::Left)
                | (Self::Right, SwipeDirection::Right)
                | (Self::Up, SwipeDirection::Up)
                | (Self::Down, SwipeDirection::Down)
        )
    }
}

/// The gesture kinds, each selecting one recognizer.
///
/// The directional swipe names share the swipe recognizer and differ only in
/// their [`SwipeFilter`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// `tap`
    Tap,
    /// `doubleTap`
    DoubleTap,
    /// `longTap`
    LongTap,
    /// `swipe` and its directional aliases.
    Swipe(SwipeFilter),
}

impl Gesture {
    /// Every gesture kind with its public name.
    pub const ALL: [Self; 8] = [
        Self::Tap,
        Self::DoubleTap,
        Self::LongTap,
        Self::Swipe(SwipeFilter::Any),
        Self::Swipe(SwipeFilter::Left),
        Self::Swipe(SwipeFilter::Right),
        Self::Swipe(SwipeFilter::Up),
        Self::Swipe(SwipeFilter::Down),
    ];

    /// Looks up a gesture by its event type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gesture| gesture.name() == name)
    }

    /// The event type name handlers observe when the gesture fires.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::DoubleTap => "doubleTap",
            Self::LongTap => "longTap",
            Self::Swipe(SwipeFilter::Any) => "swipe",
            Self::Swipe(SwipeFilter::Left) => "swipeLeft",
            Self::Swipe(SwipeFilter::Right) => "swipeRight",
            Self::Swipe(SwipeFilter::Up) => "swipeUp",
            Self::Swipe(SwipeFilter::Down) => "swipeDown",
        }
    }

    /// The raw event types the recognizer listens to.
    ///
    /// Double tap lists `click` because the iOS path needs it; on other
    /// platforms nothing is bound for it.
    #[must_use]
    pub const fn raw_types(self) -> &'static [&'static str] {
        match self {
            Self::Tap => &[TOUCH_START, TOUCH_END],
            Self::DoubleTap => &[TOUCH_START, TOUCH_END, CLICK],
            Self::LongTap | Self::Swipe(_) => &[TOUCH_START, TOUCH_MOVE, TOUCH_END],
        }
    }
}

/// Returns `true` if `a` and `b` are less than `limit` apart on both axes.
#[inline]
pub(crate) fn within(a: Point, b: Point, limit: f64) -> bool {
    let d = b - a;
    -limit < d.x && d.x < limit && -limit < d.y && d.y < limit
}

/// Returns `true` if `a` and `b` are more than `limit` apart on either axis.
#[inline]
pub(crate) fn beyond(a: Point, b: Point, limit: f64) -> bool {
    let d = b - a;
    d.x > limit || d.x < -limit || d.y > limit || d.y < -limit
}
