// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw and uniform event objects.
//!
//! A host hands the dispatcher a [`RawEvent`]: the native event's standard
//! fields. Every multiplexing listener derives its own [`Event`] from it, which
//! is what handlers see. Handlers flag the uniform event; the dispatcher reports
//! the flags back through [`Outcome`] so the host can apply them to the native
//! event.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::Point;

bitflags::bitflags! {
    /// Keyboard modifiers held while the event was generated.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Meta / Command.
        const META = 1 << 2;
        /// Shift.
        const SHIFT = 1 << 3;
    }
}

/// A single touch point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Platform identifier of the touch.
    pub identifier: i64,
    /// Position in client (viewport) coordinates.
    pub client: Point,
}

impl Touch {
    /// Creates the primary touch at `client`.
    #[must_use]
    pub fn at(client: Point) -> Self {
        Self {
            identifier: 0,
            client,
        }
    }
}

/// Cheaply clonable, type-erased user data.
///
/// Used for the extra data attached to a binding and for the data passed to
/// [`Events::fire`](crate::Events::fire).
#[derive(Clone)]
pub struct Payload(Rc<dyn Any>);

impl Payload {
    /// Wraps `value`.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Returns the wrapped value if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Returns `true` if both payloads wrap the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").finish_non_exhaustive()
    }
}

/// A native event as delivered by the host.
#[derive(Clone, Debug)]
pub struct RawEvent<K> {
    /// Native event type, e.g. `touchstart`.
    pub event_type: String,
    /// The element the event originated on.
    pub target: K,
    /// The native current target, when the platform provides one.
    pub current_target: Option<K>,
    /// Time the event was generated, in milliseconds.
    pub time_stamp: u64,
    /// Touches currently on the surface.
    pub touches: Vec<Touch>,
    /// Touches that changed in this event.
    pub changed_touches: Vec<Touch>,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Whether the event bubbles.
    pub bubbles: bool,
    /// Whether the default action can be prevented.
    pub cancelable: bool,
    /// Button or key code.
    pub which: u32,
    /// Whether the default action was already prevented.
    pub default_prevented: bool,
    /// Data attached by a synthetic fire; taken by the first listener that runs.
    pub fire_data: Option<Payload>,
}

impl<K> RawEvent<K> {
    /// Creates a bubbling, cancelable event without touches.
    pub fn new(event_type: impl Into<String>, target: K, time_stamp: u64) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            current_target: None,
            time_stamp,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            modifiers: Modifiers::empty(),
            bubbles: true,
            cancelable: true,
            which: 0,
            default_prevented: false,
            fire_data: None,
        }
    }

    /// A `touchstart` with one touch at `pos`.
    pub fn touch_start(target: K, pos: Point, time_stamp: u64) -> Self {
        let touch = Touch::at(pos);
        Self {
            touches: Vec::from([touch]),
            changed_touches: Vec::from([touch]),
            ..Self::new("touchstart", target, time_stamp)
        }
    }

    /// A `touchmove` with one touch at `pos`.
    pub fn touch_move(target: K, pos: Point, time_stamp: u64) -> Self {
        let touch = Touch::at(pos);
        Self {
            touches: Vec::from([touch]),
            changed_touches: Vec::from([touch]),
            ..Self::new("touchmove", target, time_stamp)
        }
    }

    /// A `touchend` whose lifted touch was at `pos`.
    pub fn touch_end(target: K, pos: Point, time_stamp: u64) -> Self {
        Self {
            changed_touches: Vec::from([Touch::at(pos)]),
            ..Self::new("touchend", target, time_stamp)
        }
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attaches fire data.
    #[must_use]
    pub fn with_fire_data(mut self, data: Payload) -> Self {
        self.fire_data = Some(data);
        self
    }
}

/// What handlers asked for while a raw event was dispatched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// A handler prevented the default action.
    pub default_prevented: bool,
    /// A handler stopped propagation to further elements.
    pub propagation_stopped: bool,
    /// A handler stopped the remaining handlers of the same listener.
    pub immediate_propagation_stopped: bool,
}

/// The uniform event handlers receive.
#[derive(Clone, Debug)]
pub struct Event<K> {
    /// Event type. Gesture recognizers rewrite it to the gesture name.
    pub event_type: String,
    /// The element the raw event originated on.
    pub target: K,
    /// The element the handler runs for: the delegate match when the binding
    /// uses a selector, otherwise the bound element.
    pub current_target: K,
    /// The element whose multiplexing listener is running.
    pub bound: K,
    /// Time the raw event was generated, in milliseconds.
    pub time_stamp: u64,
    /// Touches currently on the surface.
    pub touches: Vec<Touch>,
    /// Touches that changed in this event.
    pub changed_touches: Vec<Touch>,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Whether the event bubbles.
    pub bubbles: bool,
    /// Whether the default action can be prevented.
    pub cancelable: bool,
    /// Button or key code.
    pub which: u32,
    /// Extra data of the running binding, or fire data when present.
    pub extra_data: Option<Payload>,
    /// Fire data of a synthetic event that has not been merged into
    /// [`Event::extra_data`].
    pub fire_data: Option<Payload>,
    /// Set on replayed double tap candidates.
    pub is_fake: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl<K: Clone> Event<K> {
    /// Derives the uniform event a listener bound to `bound` sees.
    pub fn from_raw(raw: &RawEvent<K>, bound: K) -> Self {
        Self {
            event_type: raw.event_type.clone(),
            target: raw.target.clone(),
            current_target: raw.current_target.clone().unwrap_or_else(|| bound.clone()),
            bound,
            time_stamp: raw.time_stamp,
            touches: raw.touches.clone(),
            changed_touches: raw.changed_touches.clone(),
            modifiers: raw.modifiers,
            bubbles: raw.bubbles,
            cancelable: raw.cancelable,
            which: raw.which,
            extra_data: None,
            fire_data: raw.fire_data.clone(),
            is_fake: false,
            default_prevented: raw.default_prevented,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }
}

impl<K> Event<K> {
    /// Position of the first current touch.
    #[must_use]
    pub fn touch_point(&self) -> Option<Point> {
        self.touches.first().map(|t| t.client)
    }

    /// Position of the first changed touch.
    #[must_use]
    pub fn changed_touch_point(&self) -> Option<Point> {
        self.changed_touches.first().map(|t| t.client)
    }

    /// Prevents the default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stops propagation to further elements.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stops the remaining handlers of this listener and propagation.
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
        self.stop_propagation();
    }

    /// Returns `true` once the default action was prevented.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Returns `true` once propagation was stopped.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Returns `true` once immediate propagation was stopped.
    #[must_use]
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// The flags as an [`Outcome`].
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Outcome {
            default_prevented: self.default_prevented,
            propagation_stopped: self.propagation_stopped,
            immediate_propagation_stopped: self.immediate_propagation_stopped,
        }
    }
}
