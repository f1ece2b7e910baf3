// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: everything the dispatcher needs from the surrounding UI.
//!
//! The dispatcher never builds or inspects an element tree on its own. A [`Host`]
//! resolves selectors, reports parents, describes elements for delegate
//! matching, and attaches the native listeners the dispatcher multiplexes onto.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use touchstory_cache::VirtualRoot;

/// Identifies one multiplexing listener.
///
/// The host passes it back to [`Events::deliver`](crate::Events::deliver) when
/// the native event fires.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Returns the raw id.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerId").field(&self.0).finish()
    }
}

/// A borrowed snapshot of the attributes simple selectors look at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementInfo<'a> {
    /// The element's tag name, in any case.
    pub tag_name: &'a str,
    /// The `id` attribute, empty when absent.
    pub id: &'a str,
    /// The raw, whitespace-separated `class` attribute, empty when absent.
    pub class_name: &'a str,
}

/// The UI surface the dispatcher runs on.
///
/// Handles are cheap, comparable references to elements and to the virtual
/// roots. Implementations are expected to be single-threaded.
pub trait Host: Sized + 'static {
    /// Opaque reference to an element, the window or the document.
    type Handle: Clone + Eq + Hash + fmt::Debug + 'static;
    /// Error reported when a native listener cannot be attached.
    type Error: fmt::Debug;

    /// Returns the parent of `handle`, or `None` at the top of the tree.
    fn parent(&self, handle: &Self::Handle) -> Option<Self::Handle>;

    /// Describes `handle` for selector matching.
    ///
    /// Returns `None` for non-elements such as the window or the document; those
    /// never match a delegate selector.
    fn element(&self, handle: &Self::Handle) -> Option<ElementInfo<'_>>;

    /// Resolves `selector` to an ordered list of handles, searching below
    /// `context` or the whole document.
    fn query(&self, selector: &str, context: Option<&Self::Handle>) -> Vec<Self::Handle> {
        let _ = (selector, context);
        Vec::new()
    }

    /// Returns the handle of a virtual root, if the host has one.
    fn virtual_root(&self, root: VirtualRoot) -> Option<Self::Handle> {
        let _ = root;
        None
    }

    /// Returns the document body, used for the iOS double tap listeners.
    fn body(&self) -> Option<Self::Handle> {
        None
    }

    /// Attaches `listener` as a native listener for `event_type` on `handle`.
    fn add_listener(
        &mut self,
        handle: &Self::Handle,
        event_type: &str,
        listener: ListenerId,
        capture: bool,
    ) -> Result<(), Self::Error>;

    /// Detaches a listener previously attached with [`Host::add_listener`].
    fn remove_listener(
        &mut self,
        handle: &Self::Handle,
        event_type: &str,
        listener: ListenerId,
        capture: bool,
    );
}
