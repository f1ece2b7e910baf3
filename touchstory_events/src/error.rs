// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// A native listener could not be attached.
///
/// Returned by [`Events::on`](crate::Events::on) and
/// [`Events::one`](crate::Events::one). Nothing is recorded for the failed
/// raw event type; bindings made earlier in the same call stay in place.
#[derive(Clone, PartialEq, Eq)]
pub struct ListenError<E> {
    /// Raw event type that failed to attach.
    pub event_type: String,
    /// Whether a capture listener was requested.
    pub capture: bool,
    /// The host's error.
    pub source: E,
}

impl<E: fmt::Debug> fmt::Debug for ListenError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenError")
            .field("event_type", &self.event_type)
            .field("capture", &self.capture)
            .field("source", &self.source)
            .finish()
    }
}

impl<E: fmt::Debug> fmt::Display for ListenError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to attach {} listener for `{}`: {:?}",
            if self.capture { "capture" } else { "bubble" },
            self.event_type,
            self.source
        )
    }
}

impl<E: fmt::Debug> core::error::Error for ListenError<E> {}
