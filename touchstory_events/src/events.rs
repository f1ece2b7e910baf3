// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public binding surface.

use alloc::boxed::Box;
use core::fmt;

use hashbrown::HashMap;
use touchstory_cache::{CacheIndex, ScopedCache, VirtualRoot};
use touchstory_gesture::{Gesture, GestureConfig};
use touchstory_timing::TimerQueue;

use crate::dispatch::{BindOptions, Listener, Slot, data_name};
use crate::elements::Elements;
use crate::error::ListenError;
use crate::event::Payload;
use crate::gestures::DoubleTapShared;
use crate::handler::Binding;
use crate::host::{Host, ListenerId};

pub(crate) type TimerTask<H> = Box<dyn FnOnce(&mut Events<H>)>;

/// Configuration of an [`Events`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EventsConfig {
    /// Recognizer thresholds.
    pub gestures: GestureConfig,
    /// Enable the iOS double tap workaround: body capture listeners, a grace
    /// timer after a lone tap, and fake replay of that tap.
    pub ios_double_tap: bool,
}

/// Event registry and dispatcher bound to one [`Host`].
///
/// `on`, `one`, `un` and `fire` take the handles to act on and a
/// whitespace-separated list of `type[.namespace]` tokens. Gesture names
/// (`tap`, `doubleTap`, `longTap`, `swipe`, `swipeLeft`, `swipeRight`,
/// `swipeUp`, `swipeDown`) bind recognizers; anything else binds the raw event.
///
/// The host calls [`Events::deliver`] when a native listener fires and
/// [`Events::tick`] when time advances.
pub struct Events<H: Host> {
    pub(crate) host: H,
    pub(crate) config: EventsConfig,
    pub(crate) cache: ScopedCache<H::Handle, Slot<H>>,
    pub(crate) listeners: HashMap<ListenerId, Listener<H::Handle>>,
    pub(crate) timers: TimerQueue<TimerTask<H>>,
    pub(crate) double_tap: DoubleTapShared<H::Handle>,
    pub(crate) next_listener: u64,
    pub(crate) next_entry: u64,
    pub(crate) now: u64,
}

impl<H: Host> fmt::Debug for Events<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events")
            .field("config", &self.config)
            .field("scopes", &self.cache.len())
            .field("listeners", &self.listeners.len())
            .field("timers", &self.timers)
            .field("double_tap", &self.double_tap)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Events<H> {
    /// Creates a dispatcher with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, EventsConfig::default())
    }

    /// Creates a dispatcher with `config`.
    pub fn with_config(host: H, config: EventsConfig) -> Self {
        let mut cache = ScopedCache::new();
        for root in VirtualRoot::ALL {
            if let Some(handle) = host.virtual_root(root) {
                cache.reserve(root, handle);
            }
        }
        Self {
            host,
            config,
            cache,
            listeners: HashMap::new(),
            timers: TimerQueue::new(),
            double_tap: DoubleTapShared::default(),
            next_listener: 0,
            next_entry: 0,
            now: 0,
        }
    }

    /// Resolves `selector` through the host.
    pub fn query(&self, selector: &str, context: Option<&H::Handle>) -> Elements<H::Handle> {
        self.host.query(selector.trim(), context).into()
    }

    /// Binds `binding` for every type in `types` on every handle.
    ///
    /// A binding without a handler is ignored. Fails when the host refuses a
    /// native listener; bindings made before the failure stay in place.
    pub fn on(
        &mut self,
        elements: &Elements<H::Handle>,
        types: &str,
        binding: impl Into<Binding<H>>,
    ) -> Result<(), ListenError<H::Error>> {
        self.bind(elements, types, binding.into(), false)
    }

    /// Like [`Events::on`], but each binding removes itself before its handler
    /// first runs.
    ///
    /// For gestures that is when the gesture is recognized.
    pub fn one(
        &mut self,
        elements: &Elements<H::Handle>,
        types: &str,
        binding: impl Into<Binding<H>>,
    ) -> Result<(), ListenError<H::Error>> {
        self.bind(elements, types, binding.into(), true)
    }

    /// Removes bindings.
    ///
    /// With a handler, the first binding of that handler goes; with
    /// [`Binding::any`], every binding of the type does. A namespace narrows the
    /// match, and the selector must be the one the binding was made with.
    /// Removing something that is not bound does nothing.
    pub fn un(&mut self, elements: &Elements<H::Handle>, types: &str, binding: impl Into<Binding<H>>) {
        let binding = binding.into();
        for token in types.split_ascii_whitespace() {
            let Some(opts) = options(token, &binding, false) else {
                continue;
            };
            for handle in elements {
                match opts.gesture {
                    Some(gesture) => self.teardown_gesture(handle, gesture, &opts),
                    None => self.remove_event(handle, &opts),
                }
            }
        }
    }

    /// Fires every type in `types` at every handle, bubbling through parents.
    ///
    /// `data` reaches handlers as [`Event::extra_data`](crate::Event::extra_data)
    /// in place of their own extra data.
    pub fn fire(&mut self, elements: &Elements<H::Handle>, types: &str, data: Option<Payload>) {
        for token in types.split_ascii_whitespace() {
            let (event_type, namespace) = split_type(token);
            if event_type.is_empty() {
                continue;
            }
            for handle in elements {
                self.fire_event(handle, event_type, namespace, data.clone());
            }
        }
    }

    /// Runs every gesture timer due at `now`.
    pub fn tick(&mut self, now: u64) {
        self.now = self.now.max(now);
        while let Some((timer, task)) = self.timers.pop_due(now) {
            tracing::trace!(?timer, now, "timer fired");
            task(&mut *self);
        }
    }

    /// The earliest pending timer deadline, for hosts that sleep until then.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// The latest time seen through [`Events::deliver`] or [`Events::tick`].
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EventsConfig {
        &self.config
    }

    /// Number of entries behind the native `event_type` listener of `handle`,
    /// optionally for delegation to `selector`.
    ///
    /// Gesture bindings count under the raw types they use.
    #[must_use]
    pub fn handler_count(&self, handle: &H::Handle, event_type: &str, selector: Option<&str>) -> usize {
        self.handler_list(handle, &data_name(selector, event_type))
            .map_or(0, |list| list.entries.len())
    }

    /// Returns `true` if a native `event_type` listener is attached to `handle`.
    #[must_use]
    pub fn has_listener(&self, handle: &H::Handle, event_type: &str, selector: Option<&str>) -> bool {
        self.handler_list(handle, &data_name(selector, event_type)).is_some()
    }

    /// The cache index of `handle`, if it holds any bindings or is a virtual root.
    #[must_use]
    pub fn cache_index(&self, handle: &H::Handle) -> Option<CacheIndex> {
        self.cache.index_of(handle)
    }

    fn bind(
        &mut self,
        elements: &Elements<H::Handle>,
        types: &str,
        binding: Binding<H>,
        once: bool,
    ) -> Result<(), ListenError<H::Error>> {
        if binding.handler.is_none() {
            tracing::warn!(types, "ignoring binding without a handler");
            return Ok(());
        }
        for token in types.split_ascii_whitespace() {
            let Some(opts) = options(token, &binding, once) else {
                continue;
            };
            for handle in elements {
                match opts.gesture {
                    Some(gesture) => self.setup_gesture(handle, gesture, &opts)?,
                    None => self.add_event(handle, &opts)?,
                }
            }
        }
        Ok(())
    }
}

/// Splits `type.namespace`. Anything after a second dot is ignored.
fn split_type(token: &str) -> (&str, Option<&str>) {
    let mut parts = token.split('.');
    let event_type = parts.next().unwrap_or_default();
    let namespace = parts.next().filter(|ns| !ns.is_empty());
    (event_type, namespace)
}

fn options<H: Host>(token: &str, binding: &Binding<H>, once: bool) -> Option<BindOptions<H>> {
    let (event_type, namespace) = split_type(token);
    if event_type.is_empty() {
        return None;
    }
    Some(BindOptions {
        event_type: event_type.into(),
        gesture: Gesture::from_name(event_type),
        selector: binding.selector.clone(),
        namespace: namespace.map(Into::into),
        extra_data: binding.extra_data.clone(),
        handler: binding.handler.clone(),
        capture: binding.capture,
        once,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_type_forms() {
        assert_eq!(split_type("click"), ("click", None));
        assert_eq!(split_type("click.menu"), ("click", Some("menu")));
        assert_eq!(split_type("click."), ("click", None));
        assert_eq!(split_type("click.a.b"), ("click", Some("a")));
        assert_eq!(split_type(".menu"), ("", Some("menu")));
    }
}
