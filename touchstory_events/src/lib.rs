// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=touchstory_events --heading-base-level=0

//! Touchstory Events: multiplexed event dispatch with delegation and touch
//! gestures.
//!
//! ## Overview
//!
//! [`Events`] keeps any number of logical handlers per element and event type
//! behind a single native listener. Handlers can be namespaced (`click.menu`),
//! delegated to descendants matching a simple selector, carry extra data, or
//! run once. Gesture names (`tap`, `doubleTap`, `longTap`, `swipe` and the four
//! directional swipes) bind recognizers from `touchstory_gesture` that turn raw
//! touch sequences into gesture events.
//!
//! The crate owns no element tree and no clock. A [`Host`] resolves selectors,
//! reports parents, describes elements and attaches native listeners. When a
//! native listener fires, the host passes its [`ListenerId`] and the
//! [`RawEvent`] to [`Events::deliver`] and applies the returned [`Outcome`].
//! Gesture timers run when the host calls [`Events::tick`].
//!
//! ## Workflow
//!
//! 1) Implement [`Host`] for your element tree.
//! 2) Bind with [`Events::on`], [`Events::one`]; unbind with [`Events::un`].
//! 3) Forward native events to [`Events::deliver`], in capture then bubble
//!    order along the target's path.
//! 4) Call [`Events::tick`] as time passes, or sleep until
//!    [`Events::next_deadline`].
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use touchstory_events::{ElementInfo, Elements, Events, Handler, Host, ListenerId, RawEvent};
//!
//! #[derive(Default)]
//! struct Page {
//!     listeners: Vec<(u32, String, ListenerId)>,
//! }
//!
//! impl Host for Page {
//!     type Handle = u32;
//!     type Error = ();
//!
//!     fn parent(&self, handle: &u32) -> Option<u32> {
//!         (*handle > 0).then_some(0)
//!     }
//!
//!     fn element(&self, _: &u32) -> Option<ElementInfo<'_>> {
//!         Some(ElementInfo { tag_name: "div", id: "", class_name: "" })
//!     }
//!
//!     fn add_listener(&mut self, handle: &u32, ty: &str, id: ListenerId, _: bool) -> Result<(), ()> {
//!         self.listeners.push((*handle, ty.into(), id));
//!         Ok(())
//!     }
//!
//!     fn remove_listener(&mut self, _: &u32, _: &str, id: ListenerId, _: bool) {
//!         self.listeners.retain(|(_, _, l)| *l != id);
//!     }
//! }
//!
//! let mut events = Events::new(Page::default());
//! let taps = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&taps);
//! let on_tap = Handler::<Page>::new(move |_, event| {
//!     assert_eq!(event.event_type, "tap");
//!     counter.set(counter.get() + 1);
//! });
//! events.on(&Elements::single(1), "tap", &on_tap).unwrap();
//!
//! // Deliver a touch to every listener the host attached for its type.
//! let send = |events: &mut Events<Page>, mut raw: RawEvent<u32>| {
//!     let ids: Vec<_> = events
//!         .host()
//!         .listeners
//!         .iter()
//!         .filter(|(_, ty, _)| *ty == raw.event_type)
//!         .map(|(_, _, id)| *id)
//!         .collect();
//!     for id in ids {
//!         events.deliver(id, &mut raw);
//!     }
//! };
//! send(&mut events, RawEvent::touch_start(1, Point::new(100.0, 100.0), 0));
//! send(&mut events, RawEvent::touch_end(1, Point::new(103.0, 104.0), 80));
//! assert_eq!(taps.get(), 1);
//!
//! events.un(&Elements::single(1), "tap", &on_tap);
//! assert!(events.host().listeners.is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod delegate;
mod dispatch;
mod elements;
mod error;
mod event;
mod events;
mod gestures;
mod handler;
mod host;

pub use elements::Elements;
pub use error::ListenError;
pub use event::{Event, Modifiers, Outcome, Payload, RawEvent, Touch};
pub use events::{Events, EventsConfig};
pub use handler::{Binding, Flow, Handler};
pub use host::{ElementInfo, Host, ListenerId};

pub use touchstory_cache::{CacheIndex, VirtualRoot};
pub use touchstory_gesture::{Gesture, GestureConfig, SwipeDirection, SwipeFilter};

#[cfg(test)]
pub(crate) mod tests_support {
    use alloc::vec::Vec;

    use crate::{ElementInfo, Host, ListenerId};

    /// A host with a flat tree that accepts every listener.
    #[derive(Debug, Default)]
    pub(crate) struct NullHost {
        pub(crate) attached: Vec<(u32, ListenerId)>,
    }

    impl Host for NullHost {
        type Handle = u32;
        type Error = ();

        fn parent(&self, _: &u32) -> Option<u32> {
            None
        }

        fn element(&self, _: &u32) -> Option<ElementInfo<'_>> {
            None
        }

        fn add_listener(&mut self, handle: &u32, _: &str, listener: ListenerId, _: bool) -> Result<(), ()> {
            self.attached.push((*handle, listener));
            Ok(())
        }

        fn remove_listener(&mut self, _: &u32, _: &str, listener: ListenerId, _: bool) {
            self.attached.retain(|(_, l)| *l != listener);
        }
    }
}
