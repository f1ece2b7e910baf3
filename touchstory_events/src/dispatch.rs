// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch core: one native listener per (handle, data name), many handlers.
//!
//! Every logical subscription is a [`HandlerEntry`] in a [`HandlerList`] stored
//! in the scoped cache under its *data name*: the raw event type, prefixed with
//! `selector_` for delegated bindings. The list owns the [`ListenerId`] of the
//! single native listener that fans out to its entries.
//!
//! - The native listener is attached when a list receives its first entry and
//!   detached when its last entry goes; the cache slot goes with it.
//! - Entries run in registration order. The order is snapshotted when dispatch
//!   starts: entries removed by an earlier handler are skipped, entries added
//!   during dispatch wait for the next event.
//! - Gesture recognizers store their internal raw handlers as ordinary entries
//!   whose type is the gesture name. A parallel list of [`SpecialEntry`] values,
//!   stored under `special_[selector_]<gesture>_<raw>`, maps the user's handler
//!   to those internal handlers so unbinding by the user's handler works.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use touchstory_gesture::{Gesture, TOUCH_END};

use crate::delegate;
use crate::error::ListenError;
use crate::event::{Event, Outcome, Payload, RawEvent};
use crate::events::Events;
use crate::gestures::GestureBinding;
use crate::handler::{Flow, Handler};
use crate::host::{Host, ListenerId};

/// Identifies a handler entry for the lifetime of an [`Events`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntryId(pub(crate) u64);

/// One logical subscription.
pub(crate) struct HandlerEntry<H: Host> {
    pub(crate) id: EntryId,
    /// Raw type for plain bindings, gesture name for recognizer internals.
    pub(crate) event_type: String,
    pub(crate) namespace: Option<String>,
    pub(crate) handler: Handler<H>,
    pub(crate) extra_data: Option<Payload>,
    pub(crate) remove_on_fire: bool,
}

/// All subscriptions behind one native listener.
pub(crate) struct HandlerList<H: Host> {
    pub(crate) listener: ListenerId,
    /// Raw type the native listener was attached for.
    pub(crate) event_type: String,
    pub(crate) capture: bool,
    pub(crate) entries: Vec<HandlerEntry<H>>,
}

/// Maps a user handler to the internal raw handler a recognizer made for it.
pub(crate) struct SpecialEntry<H: Host> {
    pub(crate) original: Handler<H>,
    pub(crate) internal: Handler<H>,
    pub(crate) binding: Rc<GestureBinding<H>>,
}

impl<H: Host> Clone for SpecialEntry<H> {
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            internal: self.internal.clone(),
            binding: Rc::clone(&self.binding),
        }
    }
}

/// A value in the scoped cache.
pub(crate) enum Slot<H: Host> {
    Handlers(HandlerList<H>),
    Specials(Vec<SpecialEntry<H>>),
}

/// Where a native listener delivers.
#[derive(Clone, Debug)]
pub(crate) struct Listener<K> {
    pub(crate) handle: K,
    pub(crate) selector: Option<String>,
    pub(crate) data_name: String,
}

/// The parameters threaded through add, remove and the gesture glue.
pub(crate) struct BindOptions<H: Host> {
    /// Raw event type.
    pub(crate) event_type: String,
    /// Set when the binding belongs to a recognizer.
    pub(crate) gesture: Option<Gesture>,
    pub(crate) selector: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) extra_data: Option<Payload>,
    pub(crate) handler: Option<Handler<H>>,
    pub(crate) capture: bool,
    pub(crate) once: bool,
}

impl<H: Host> Clone for BindOptions<H> {
    fn clone(&self) -> Self {
        Self {
            event_type: self.event_type.clone(),
            gesture: self.gesture,
            selector: self.selector.clone(),
            namespace: self.namespace.clone(),
            extra_data: self.extra_data.clone(),
            handler: self.handler.clone(),
            capture: self.capture,
            once: self.once,
        }
    }
}

impl<H: Host> BindOptions<H> {
    /// The same binding retargeted at one of its gesture's raw types.
    pub(crate) fn for_raw(&self, raw: &str, handler: Option<Handler<H>>) -> Self {
        Self {
            event_type: raw.into(),
            handler,
            ..self.clone()
        }
    }

    pub(crate) fn data_name(&self) -> String {
        data_name(self.selector.as_deref(), &self.event_type)
    }

    /// Type recorded on the entry.
    pub(crate) fn entry_type(&self) -> &str {
        match self.gesture {
            Some(gesture) => gesture.name(),
            None => &self.event_type,
        }
    }

    pub(crate) fn special_name(&self) -> Option<String> {
        self.gesture
            .map(|gesture| special_name(self.selector.as_deref(), gesture, &self.event_type))
    }
}

pub(crate) fn data_name(selector: Option<&str>, raw: &str) -> String {
    match selector {
        Some(selector) => format!("{selector}_{raw}"),
        None => raw.into(),
    }
}

pub(crate) fn special_name(selector: Option<&str>, gesture: Gesture, raw: &str) -> String {
    match selector {
        Some(selector) => format!("special_{selector}_{}_{raw}", gesture.name()),
        None => format!("special_{}_{raw}", gesture.name()),
    }
}

impl<H: Host> Events<H> {
    pub(crate) fn handler_list(&self, handle: &H::Handle, data_name: &str) -> Option<&HandlerList<H>> {
        match self.cache.get(handle, data_name) {
            Some(Slot::Handlers(list)) => Some(list),
            _ => None,
        }
    }

    pub(crate) fn specials(&self, handle: &H::Handle, name: &str) -> &[SpecialEntry<H>] {
        match self.cache.get(handle, name) {
            Some(Slot::Specials(specials)) => specials,
            _ => &[],
        }
    }

    /// Appends an entry for `opts` on `handle`, attaching the native listener
    /// when the list is new.
    pub(crate) fn add_event(
        &mut self,
        handle: &H::Handle,
        opts: &BindOptions<H>,
    ) -> Result<(), ListenError<H::Error>> {
        let Some(handler) = opts.handler.clone() else {
            return Ok(());
        };
        let data_name = opts.data_name();
        if self.handler_list(handle, &data_name).is_none() {
            let listener = ListenerId(self.next_listener);
            self.host
                .add_listener(handle, &opts.event_type, listener, opts.capture)
                .map_err(|source| ListenError {
                    event_type: opts.event_type.clone(),
                    capture: opts.capture,
                    source,
                })?;
            self.next_listener += 1;
            tracing::debug!(?handle, %data_name, ?listener, capture = opts.capture, "attached listener");
            self.listeners.insert(
                listener,
                Listener {
                    handle: handle.clone(),
                    selector: opts.selector.clone(),
                    data_name: data_name.clone(),
                },
            );
            self.cache.replace(
                handle.clone(),
                &data_name,
                Slot::Handlers(HandlerList {
                    listener,
                    event_type: opts.event_type.clone(),
                    capture: opts.capture,
                    entries: Vec::new(),
                }),
            );
        }

        let id = EntryId(self.next_entry);
        self.next_entry += 1;
        if let Some(Slot::Handlers(list)) = self.cache.get_mut(handle, &data_name) {
            list.entries.push(HandlerEntry {
                id,
                event_type: opts.entry_type().into(),
                namespace: opts.namespace.clone(),
                handler,
                extra_data: opts.extra_data.clone(),
                remove_on_fire: opts.once && opts.gesture.is_none(),
            });
        }
        Ok(())
    }

    /// Removes the entries `opts` selects from `handle`.
    ///
    /// Entries must match the entry type and, when given, the namespace and the
    /// handler. A handler matches its own entries and, through the special list,
    /// the internal entries a recognizer made for it. With a handler only the
    /// first match goes; without one every match does.
    pub(crate) fn remove_event(&mut self, handle: &H::Handle, opts: &BindOptions<H>) {
        let special_name = opts.special_name();
        let specials: SmallVec<[SpecialEntry<H>; 4]> = special_name
            .as_deref()
            .map(|name| self.specials(handle, name).iter().cloned().collect())
            .unwrap_or_default();
        let entry_type = opts.entry_type();
        let first_only = opts.handler.is_some();
        self.remove_entries(handle, &opts.data_name(), special_name.as_deref(), first_only, |entry| {
            entry.event_type == entry_type
                && opts
                    .namespace
                    .as_ref()
                    .is_none_or(|ns| entry.namespace.as_ref() == Some(ns))
                && opts.handler.as_ref().is_none_or(|h| {
                    entry.handler.same(h)
                        || specials
                            .iter()
                            .any(|s| s.original.same(h) && s.internal.same(&entry.handler))
                })
        });
    }

    /// Shared removal: splices out matching entries, drops their special
    /// entries and tears the list down once it is empty.
    pub(crate) fn remove_entries(
        &mut self,
        handle: &H::Handle,
        data_name: &str,
        special_name: Option<&str>,
        first_only: bool,
        mut hit: impl FnMut(&HandlerEntry<H>) -> bool,
    ) {
        let Some(Slot::Handlers(list)) = self.cache.get_mut(handle, data_name) else {
            return;
        };
        let mut removed: SmallVec<[HandlerEntry<H>; 2]> = SmallVec::new();
        let mut i = 0;
        while i < list.entries.len() {
            if hit(&list.entries[i]) {
                removed.push(list.entries.remove(i));
                if first_only {
                    break;
                }
            } else {
                i += 1;
            }
        }
        if removed.is_empty() {
            return;
        }
        let empty = list.entries.is_empty();
        let listener = list.listener;
        let capture = list.capture;
        let raw = list.event_type.clone();

        if raw == TOUCH_END {
            let double_taps = removed
                .iter()
                .filter(|e| e.event_type == Gesture::DoubleTap.name())
                .count();
            self.double_tap.setup_count = self.double_tap.setup_count.saturating_sub(double_taps);
        }

        if let Some(name) = special_name {
            let mut specials_empty = false;
            if let Some(Slot::Specials(specials)) = self.cache.get_mut(handle, name) {
                specials.retain(|s| {
                    let gone = removed.iter().any(|e| e.handler.same(&s.internal));
                    if gone {
                        s.binding.deactivate();
                    }
                    !gone
                });
                specials_empty = specials.is_empty();
            }
            if specials_empty || empty {
                self.cache.remove(handle, Some(name));
            }
        }

        if empty {
            self.host.remove_listener(handle, &raw, listener, capture);
            self.listeners.remove(&listener);
            self.cache.remove(handle, Some(data_name));
            tracing::debug!(?handle, data_name, ?listener, "detached listener");
        }
    }

    /// Dispatches a native event delivered to `listener`.
    ///
    /// The host calls this from the native listener it attached for `listener`
    /// and applies the returned [`Outcome`] to its native event. Fire data on
    /// `raw` is consumed by the first listener that dispatches it.
    ///
    /// Timers due at the event's time stamp run first, as if [`Events::tick`]
    /// had been called with it.
    pub fn deliver(&mut self, listener: ListenerId, raw: &mut RawEvent<H::Handle>) -> Outcome {
        self.tick(raw.time_stamp);
        let Some(Listener {
            handle,
            selector,
            data_name,
        }) = self.listeners.get(&listener).cloned()
        else {
            return Outcome::default();
        };

        let mut event = Event::from_raw(raw, handle.clone());
        if let Some(selector) = selector.as_deref() {
            match self.delegate_match(&handle, &raw.target, selector) {
                Some(matched) => event.current_target = matched,
                None => return event.outcome(),
            }
        }
        raw.fire_data = None;

        tracing::trace!(?listener, event_type = %raw.event_type, ?handle, "dispatch");
        self.run_handlers(&handle, &data_name, &mut event, None);
        event.outcome()
    }

    /// Walks from `target` up to, but excluding, `bound` and returns the first
    /// element matching `selector`.
    pub(crate) fn delegate_match(
        &self,
        bound: &H::Handle,
        target: &H::Handle,
        selector: &str,
    ) -> Option<H::Handle> {
        let mut node = target.clone();
        while node != *bound {
            if delegate::matches(self.host.element(&node).as_ref(), selector) {
                return Some(node);
            }
            node = self.host.parent(&node)?;
        }
        None
    }

    /// Runs the entries of a list in registration order.
    ///
    /// With `namespace` only entries in that namespace run.
    pub(crate) fn run_handlers(
        &mut self,
        bound: &H::Handle,
        data_name: &str,
        event: &mut Event<H::Handle>,
        namespace: Option<&str>,
    ) {
        let Some(list) = self.handler_list(bound, data_name) else {
            return;
        };
        let ids: SmallVec<[EntryId; 8]> = list.entries.iter().map(|e| e.id).collect();
        let fire_data = event.fire_data.clone();

        for id in ids {
            let Some(entry) = self
                .handler_list(bound, data_name)
                .and_then(|list| list.entries.iter().find(|e| e.id == id))
            else {
                continue;
            };
            if namespace.is_some_and(|ns| entry.namespace.as_deref() != Some(ns)) {
                continue;
            }
            let handler = entry.handler.clone();
            let once = entry.remove_on_fire;
            event.extra_data = fire_data.clone().or_else(|| entry.extra_data.clone());

            if once {
                self.remove_entries(bound, data_name, None, true, |e| e.id == id);
            }
            if handler.call(self, event) == Flow::Cancel {
                event.prevent_default();
                event.stop_propagation();
            }
            event.fire_data = None;
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }
    }

    /// Fires `event_type` at `handle` and bubbles it through the parents.
    ///
    /// Without a namespace every entry of the plain list runs, as if the native
    /// listener had fired; with one only entries in that namespace run.
    /// Bubbling stops once a handler stops propagation or the top is reached.
    pub(crate) fn fire_event(
        &mut self,
        handle: &H::Handle,
        event_type: &str,
        namespace: Option<&str>,
        fire_data: Option<Payload>,
    ) {
        let mut node = handle.clone();
        loop {
            if self.handler_list(&node, event_type).is_some() {
                let raw = RawEvent {
                    current_target: Some(node.clone()),
                    fire_data: fire_data.clone(),
                    ..RawEvent::new(event_type, node.clone(), self.now)
                };
                let mut event = Event::from_raw(&raw, node.clone());
                tracing::trace!(?node, event_type, namespace, "fire");
                self.run_handlers(&node, event_type, &mut event, namespace);
                if event.is_propagation_stopped() {
                    return;
                }
            }
            match self.host.parent(&node) {
                Some(parent) => node = parent,
                None => return,
            }
        }
    }
}
