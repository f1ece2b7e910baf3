// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding glue between the recognizers and the dispatch core.
//!
//! Binding a gesture on a handle creates one [`GestureBinding`] and one state
//! machine for that handle, then registers an internal handler per raw type the
//! gesture needs. Each internal handler is recorded as a special entry next to
//! the user's handler so that unbinding by the user's handler finds it. When a
//! machine reports completion, [`GestureBinding::complete`] calls the user's
//! handler with the event type rewritten to the gesture name.
//!
//! Double tap has extra iOS-only machinery: a pair of capture listeners on the
//! document body, shared by all double tap bindings, arms a grace timer on the
//! first tap of a potential pair. When the timer runs out before a second tap
//! or a `click` arrives, the tap is replayed as a fake `touchend` to the double
//! tap handlers of the nearest bound ancestor.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::mem;

use smallvec::{SmallVec, smallvec};
use touchstory_gesture::double_tap::{DoubleTapOutcome, DoubleTapState, GraceTracker};
use touchstory_gesture::long_tap::LongTapState;
use touchstory_gesture::swipe::SwipeState;
use touchstory_gesture::tap::TapState;
use touchstory_gesture::{CLICK, Gesture, SwipeFilter, TOUCH_END, TOUCH_MOVE, TOUCH_START};
use touchstory_timing::TimerId;

use crate::dispatch::{BindOptions, Slot, SpecialEntry, special_name};
use crate::error::ListenError;
use crate::event::Event;
use crate::events::Events;
use crate::handler::{Flow, Handler};
use crate::host::Host;

/// Namespace of the body listeners installed for iOS double taps.
pub(crate) const BODY_NAMESPACE: &str = "likedoubleTap";

type Internals<H> = SmallVec<[(&'static str, Handler<H>); 3]>;

/// One gesture bound on one handle.
pub(crate) struct GestureBinding<H: Host> {
    gesture: Gesture,
    handler: Handler<H>,
    selector: Option<String>,
    once: bool,
    live: Cell<bool>,
}

impl<H: Host> GestureBinding<H> {
    /// Marks the binding as torn down; pending timers check this before firing.
    pub(crate) fn deactivate(&self) {
        self.live.set(false);
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Delivers a recognized gesture to the user's handler.
    pub(crate) fn complete(&self, events: &mut Events<H>, event: &mut Event<H::Handle>) -> Flow {
        if self.once {
            let opts = BindOptions {
                event_type: String::new(),
                gesture: Some(self.gesture),
                selector: self.selector.clone(),
                namespace: None,
                extra_data: None,
                handler: Some(self.handler.clone()),
                capture: false,
                once: false,
            };
            let bound = event.bound.clone();
            events.teardown_gesture(&bound, self.gesture, &opts);
        }
        tracing::debug!(gesture = self.gesture.name(), target = ?event.target, "gesture recognized");
        let raw_type = mem::replace(&mut event.event_type, self.gesture.name().into());
        let flow = self.handler.call(events, event);
        event.event_type = raw_type;
        flow
    }
}

/// Double tap state shared by every binding of an [`Events`].
#[derive(Debug)]
pub(crate) struct DoubleTapShared<K> {
    /// Live double tap `touchend` entries.
    pub(crate) setup_count: usize,
    /// Body the iOS listeners are installed on.
    pub(crate) body: Option<K>,
    pub(crate) tracker: GraceTracker,
    pub(crate) grace_timer: Option<TimerId>,
}

impl<K> Default for DoubleTapShared<K> {
    fn default() -> Self {
        Self {
            setup_count: 0,
            body: None,
            tracker: GraceTracker::default(),
            grace_timer: None,
        }
    }
}

impl<H: Host> Events<H> {
    /// Binds `gesture` on `handle`.
    pub(crate) fn setup_gesture(
        &mut self,
        handle: &H::Handle,
        gesture: Gesture,
        opts: &BindOptions<H>,
    ) -> Result<(), ListenError<H::Error>> {
        let Some(handler) = opts.handler.clone() else {
            return Ok(());
        };
        let binding = Rc::new(GestureBinding {
            gesture,
            handler: handler.clone(),
            selector: opts.selector.clone(),
            once: opts.once,
            live: Cell::new(true),
        });
        let internals = match gesture {
            Gesture::Tap => tap_handlers(&binding),
            Gesture::DoubleTap => {
                let ios = self.config.ios_double_tap;
                if ios {
                    self.install_body_listeners()?;
                }
                double_tap_handlers(&binding, ios)
            }
            Gesture::LongTap => long_tap_handlers(&binding),
            Gesture::Swipe(filter) => swipe_handlers(&binding, filter),
        };

        for (raw, internal) in internals {
            let raw_opts = opts.for_raw(raw, Some(internal.clone()));
            self.add_event(handle, &raw_opts)?;
            if gesture == Gesture::DoubleTap && raw == TOUCH_END {
                self.double_tap.setup_count += 1;
            }
            let name = special_name(opts.selector.as_deref(), gesture, raw);
            let slot = self
                .cache
                .get_or_insert_with(handle.clone(), &name, || Slot::Specials(Vec::new()));
            if let Slot::Specials(specials) = slot {
                specials.push(SpecialEntry {
                    original: handler.clone(),
                    internal,
                    binding: Rc::clone(&binding),
                });
            }
        }
        Ok(())
    }

    /// Unbinds `gesture` from `handle`, for every raw type it uses.
    pub(crate) fn teardown_gesture(
        &mut self,
        handle: &H::Handle,
        gesture: Gesture,
        opts: &BindOptions<H>,
    ) {
        for raw in gesture.raw_types() {
            self.remove_event(handle, &opts.for_raw(raw, opts.handler.clone()));
        }
        if gesture == Gesture::DoubleTap && self.double_tap.setup_count == 0 {
            self.uninstall_body_listeners();
        }
    }

    fn install_body_listeners(&mut self) -> Result<(), ListenError<H::Error>> {
        if self.double_tap.body.is_some() {
            return Ok(());
        }
        let Some(body) = self.host.body() else {
            tracing::warn!("host has no document body; iOS double tap replay disabled");
            return Ok(());
        };
        self.double_tap.body = Some(body.clone());
        let handlers = [
            (TOUCH_START, Handler::<H>::new(|events: &mut Self, event: &mut Event<H::Handle>| {
                events.double_tap.tracker.touch_start(event.time_stamp);
            })),
            (TOUCH_END, Handler::<H>::new(|events: &mut Self, event: &mut Event<H::Handle>| {
                events.body_touch_end(event);
            })),
        ];
        for (raw, handler) in handlers {
            self.add_event(&body, &body_options(raw, Some(handler)))?;
        }
        tracing::debug!(?body, "installed double tap body listeners");
        Ok(())
    }

    fn uninstall_body_listeners(&mut self) {
        let Some(body) = self.double_tap.body.take() else {
            return;
        };
        for raw in [TOUCH_START, TOUCH_END] {
            self.remove_event(&body, &body_options(raw, None));
        }
        self.cancel_grace_timer();
        self.double_tap.tracker.reset();
        tracing::debug!(?body, "removed double tap body listeners");
    }

    fn body_touch_end(&mut self, event: &Event<H::Handle>) {
        let config = self.config.gestures;
        if !self.double_tap.tracker.touch_end(event.time_stamp, &config) {
            return;
        }
        let Some(node) = self.nearest_double_tap(&event.target) else {
            return;
        };
        self.cancel_grace_timer();
        let deadline = event.time_stamp.saturating_add(config.double_tap_grace);
        let replay = event.clone();
        let timer = self.timers.schedule(
            deadline,
            Box::new(move |events: &mut Self| events.replay_double_tap(&node, &replay, deadline)),
        );
        self.double_tap.grace_timer = Some(timer);
        tracing::trace!(?timer, deadline, "armed double tap grace timer");
    }

    /// Replays a lone tap as a fake `touchend` to the double tap handlers
    /// bound directly on `node`.
    fn replay_double_tap(&mut self, node: &H::Handle, event: &Event<H::Handle>, deadline: u64) {
        self.double_tap.grace_timer = None;
        let name = special_name(None, Gesture::DoubleTap, TOUCH_END);
        let internals: SmallVec<[Handler<H>; 2]> = self
            .specials(node, &name)
            .iter()
            .filter(|s| s.binding.is_live())
            .map(|s| s.internal.clone())
            .collect();
        tracing::debug!(?node, handlers = internals.len(), "replaying fake double tap");
        for internal in internals {
            let mut fake = event.clone();
            fake.event_type = TOUCH_END.into();
            fake.is_fake = true;
            fake.time_stamp = deadline;
            fake.bound = node.clone();
            fake.current_target = node.clone();
            internal.call(self, &mut fake);
        }
        self.double_tap.tracker.reset();
    }

    /// The closest handle at or above `target` with a plain double tap binding.
    fn nearest_double_tap(&self, target: &H::Handle) -> Option<H::Handle> {
        let name = special_name(None, Gesture::DoubleTap, TOUCH_END);
        let mut node = target.clone();
        loop {
            if !self.specials(&node, &name).is_empty() {
                return Some(node);
            }
            node = self.host.parent(&node)?;
        }
    }

    /// Whether a delegated double tap on `bound` covers `target`.
    fn delegated_double_tap(&self, bound: &H::Handle, target: &H::Handle, selector: &str) -> bool {
        self.delegate_match(bound, target, selector).is_some()
            && !self
                .specials(bound, &special_name(Some(selector), Gesture::DoubleTap, TOUCH_END))
                .is_empty()
    }

    fn cancel_grace_timer(&mut self) {
        if let Some(timer) = self.double_tap.grace_timer.take() {
            self.timers.cancel(timer);
        }
    }
}

fn body_options<H: Host>(raw: &str, handler: Option<Handler<H>>) -> BindOptions<H> {
    BindOptions {
        event_type: raw.into(),
        gesture: None,
        selector: None,
        namespace: Some(BODY_NAMESPACE.into()),
        extra_data: None,
        handler,
        capture: true,
        once: false,
    }
}

fn tap_handlers<H: Host>(binding: &Rc<GestureBinding<H>>) -> Internals<H> {
    let state = Rc::new(RefCell::new(TapState::default()));
    let start = {
        let state = Rc::clone(&state);
        Handler::<H>::new(move |_, event| {
            if let Some(pos) = event.touch_point() {
                state.borrow_mut().start(pos);
            }
        })
    };
    let binding = Rc::clone(binding);
    let end = Handler::<H>::new(move |events, event| {
        let config = events.config.gestures;
        let tapped = event
            .changed_touch_point()
            .is_some_and(|pos| state.borrow_mut().end(pos, &config));
        if tapped {
            binding.complete(events, event)
        } else {
            Flow::Continue
        }
    });
    smallvec![(TOUCH_START, start), (TOUCH_END, end)]
}

fn double_tap_handlers<H: Host>(binding: &Rc<GestureBinding<H>>, ios: bool) -> Internals<H> {
    let state = Rc::new(RefCell::new(DoubleTapState::default()));
    let start = {
        let state = Rc::clone(&state);
        Handler::<H>::new(move |events, event| {
            events.cancel_grace_timer();
            if let Some(pos) = event.touch_point() {
                state.borrow_mut().start(pos);
            }
        })
    };
    let end = {
        let binding = Rc::clone(binding);
        Handler::<H>::new(move |events, event| {
            let Some(pos) = event.changed_touch_point() else {
                return Flow::Continue;
            };
            let config = events.config.gestures;
            let outcome = {
                let events = &*events;
                let event = &*event;
                let accept = || {
                    event.is_fake
                        || binding.selector.as_deref().is_none_or(|selector| {
                            events.delegated_double_tap(&event.bound, &event.target, selector)
                        })
                };
                state.borrow_mut().end(pos, event.time_stamp, &config, accept)
            };
            match outcome {
                DoubleTapOutcome::DoubleTap => {
                    events.double_tap.tracker.reset();
                    event.is_fake = false;
                    binding.complete(events, event)
                }
                DoubleTapOutcome::Reset => {
                    events.double_tap.tracker.reset();
                    Flow::Continue
                }
                DoubleTapOutcome::FirstTap | DoubleTapOutcome::Ignored => Flow::Continue,
            }
        })
    };
    let mut internals: Internals<H> = smallvec![(TOUCH_START, start), (TOUCH_END, end)];
    if ios {
        // A delivered click means the platform saw a single tap.
        let click = Handler::<H>::new(|events: &mut Events<H>, _: &mut Event<H::Handle>| {
            if let Some(timer) = events.double_tap.grace_timer.take() {
                events.timers.cancel(timer);
                events.double_tap.tracker.reset();
            }
        });
        internals.push((CLICK, click));
    }
    internals
}

fn long_tap_handlers<H: Host>(binding: &Rc<GestureBinding<H>>) -> Internals<H> {
    let state: Rc<RefCell<LongTapState<TimerId>>> = Rc::new(RefCell::new(LongTapState::default()));
    let start = {
        let state = Rc::clone(&state);
        let binding = Rc::clone(binding);
        Handler::<H>::new(move |events, event| {
            let Some(pos) = event.touch_point() else {
                return;
            };
            let stale = state.borrow_mut().begin(pos);
            if let Some(stale) = stale {
                events.timers.cancel(stale);
            }
            let deadline = event.time_stamp.saturating_add(events.config.gestures.long_tap_delay);
            let mut held = event.clone();
            let task_state = Rc::clone(&state);
            let task_binding = Rc::clone(&binding);
            let timer = events.timers.schedule(
                deadline,
                Box::new(move |events: &mut Events<H>| {
                    task_state.borrow_mut().fired();
                    if task_binding.is_live() {
                        task_binding.complete(events, &mut held);
                    }
                }),
            );
            state.borrow_mut().arm(timer);
            event.prevent_default();
        })
    };
    let moved = {
        let state = Rc::clone(&state);
        Handler::<H>::new(move |events, event| {
            let Some(pos) = event.touch_point() else {
                return;
            };
            let config = events.config.gestures;
            let cancelled = state.borrow_mut().touch_move(pos, &config);
            if let Some(timer) = cancelled {
                events.timers.cancel(timer);
            }
        })
    };
    let end = Handler::<H>::new(move |events, _| {
        let pending = state.borrow_mut().end();
        if let Some(timer) = pending {
            events.timers.cancel(timer);
        }
    });
    smallvec![(TOUCH_START, start), (TOUCH_MOVE, moved), (TOUCH_END, end)]
}

fn swipe_handlers<H: Host>(binding: &Rc<GestureBinding<H>>, filter: SwipeFilter) -> Internals<H> {
    let state = Rc::new(RefCell::new(SwipeState::default()));
    let start = {
        let state = Rc::clone(&state);
        Handler::<H>::new(move |_, event| {
            if let Some(pos) = event.touch_point() {
                state.borrow_mut().start(pos);
            }
        })
    };
    let moved = {
        let state = Rc::clone(&state);
        Handler::<H>::new(move |_, _| state.borrow_mut().touch_move())
    };
    let binding = Rc::clone(binding);
    let end = Handler::<H>::new(move |events, event| {
        let config = events.config.gestures;
        let direction = event
            .changed_touch_point()
            .and_then(|pos| state.borrow_mut().end(pos, &config));
        match direction {
            Some(direction) if filter.accepts(direction) => binding.complete(events, event),
            _ => Flow::Continue,
        }
    });
    smallvec![(TOUCH_START, start), (TOUCH_MOVE, moved), (TOUCH_END, end)]
}
