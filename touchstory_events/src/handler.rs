// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handlers and the binding builder.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::event::{Event, Payload};
use crate::events::Events;
use crate::host::Host;

/// Whether dispatch continues after a handler returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Keep going.
    #[default]
    Continue,
    /// Prevent the default action and stop propagation.
    Cancel,
}

impl From<()> for Flow {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<bool> for Flow {
    /// `false` cancels, `true` continues.
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Self::Continue
        } else {
            Self::Cancel
        }
    }
}

type HandlerFn<H> = dyn Fn(&mut Events<H>, &mut Event<<H as Host>::Handle>) -> Flow;

/// A shared event handler.
///
/// Handlers are compared by identity: two clones of the same `Handler` are the
/// same handler, two handlers built from identical closures are not. Unbinding
/// with [`Events::un`] relies on this.
pub struct Handler<H: Host>(Rc<HandlerFn<H>>);

impl<H: Host> Handler<H> {
    /// Wraps a closure returning `()`, `bool` or [`Flow`].
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&mut Events<H>, &mut Event<H::Handle>) -> R + 'static,
        R: Into<Flow>,
    {
        Self(Rc::new(move |events: &mut Events<H>, event: &mut Event<H::Handle>| {
            f(events, event).into()
        }))
    }

    /// Invokes the handler.
    pub fn call(&self, events: &mut Events<H>, event: &mut Event<H::Handle>) -> Flow {
        (self.0)(events, event)
    }

    /// Returns `true` if both are the same handler.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        core::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl<H: Host> Clone for Handler<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: Host> fmt::Debug for Handler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// The optional arguments of [`Events::on`], [`Events::one`] and [`Events::un`].
///
/// ```
/// # use touchstory_events::{Binding, Handler, Host, Payload};
/// # fn build<H: Host>(handler: Handler<H>) {
/// let binding = Binding::new(handler)
///     .delegate(".item")
///     .with_data(Payload::new("row"));
/// # let _ = binding;
/// # }
/// ```
pub struct Binding<H: Host> {
    pub(crate) handler: Option<Handler<H>>,
    pub(crate) selector: Option<String>,
    pub(crate) extra_data: Option<Payload>,
    pub(crate) capture: bool,
}

impl<H: Host> Binding<H> {
    /// Binds `handler`.
    pub fn new(handler: Handler<H>) -> Self {
        Self {
            handler: Some(handler),
            ..Self::any()
        }
    }

    /// No handler. With [`Events::un`] this removes every handler of the type.
    #[must_use]
    pub fn any() -> Self {
        Self {
            handler: None,
            selector: None,
            extra_data: None,
            capture: false,
        }
    }

    /// Only dispatch when a descendant matching `selector` was hit.
    #[must_use]
    pub fn delegate(mut self, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        self.selector = (!selector.is_empty()).then_some(selector);
        self
    }

    /// Attaches `data` to every event this binding sees.
    #[must_use]
    pub fn with_data(mut self, data: Payload) -> Self {
        self.extra_data = Some(data);
        self
    }

    /// Listen in the capture phase.
    #[must_use]
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// The bound handler, if any.
    #[must_use]
    pub fn handler(&self) -> Option<&Handler<H>> {
        self.handler.as_ref()
    }
}

impl<H: Host> Clone for Binding<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            selector: self.selector.clone(),
            extra_data: self.extra_data.clone(),
            capture: self.capture,
        }
    }
}

impl<H: Host> fmt::Debug for Binding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("handler", &self.handler)
            .field("selector", &self.selector)
            .field("extra_data", &self.extra_data)
            .field("capture", &self.capture)
            .finish()
    }
}

impl<H: Host> From<Handler<H>> for Binding<H> {
    fn from(handler: Handler<H>) -> Self {
        Self::new(handler)
    }
}

impl<H: Host> From<&Handler<H>> for Binding<H> {
    fn from(handler: &Handler<H>) -> Self {
        Self::new(handler.clone())
    }
}
