// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=touchstory_timing --heading-base-level=0

//! Touchstory Timing: a host-agnostic timer queue.
//!
//! [`TimerQueue`] holds payloads keyed by a deadline in milliseconds. It never
//! reads a clock: the host decides what "now" is and drains due timers with
//! [`TimerQueue::pop_due`]. This keeps gesture recognition deterministic and
//! lets tests advance time explicitly.
//!
//! - Timers with equal deadlines fire in scheduling order.
//! - [`TimerQueue::cancel`] is idempotent: cancelling a timer that already fired
//!   or was already cancelled returns `None` and changes nothing.
//!
//! ```
//! use touchstory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let hold = timers.schedule(750, "long tap");
//! let grace = timers.schedule(400, "double tap grace");
//!
//! assert_eq!(timers.next_deadline(), Some(400));
//! assert!(timers.pop_due(399).is_none());
//! assert_eq!(timers.pop_due(400), Some((grace, "double tap grace")));
//!
//! assert_eq!(timers.cancel(hold), Some("long tap"));
//! assert_eq!(timers.cancel(hold), None);
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use core::fmt;

use hashbrown::HashMap;

/// Identifies a scheduled timer.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw id.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimerId").field(&self.0).finish()
    }
}

/// A queue of pending timers ordered by deadline.
pub struct TimerQueue<T> {
    /// Pending payloads keyed by `(deadline, id)`; ids break deadline ties.
    pending: BTreeMap<(u64, TimerId), T>,
    deadlines: HashMap<TimerId, u64>,
    next: u64,
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.deadlines.len())
            .field("next_deadline", &self.next_deadline())
            .finish_non_exhaustive()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
            next: 0,
        }
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Returns `true` if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Schedules `payload` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next);
        self.next += 1;
        self.pending.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancels a pending timer and returns its payload.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.pending.remove(&(deadline, id))
    }

    /// Returns `true` while `id` has neither fired nor been cancelled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// The earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Removes and returns the earliest timer due at `now`, if any.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, T)> {
        let &(deadline, id) = self.pending.keys().next()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        let payload = self.pending.remove(&(deadline, id))?;
        Some((id, payload))
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }
}
