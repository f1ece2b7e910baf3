// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=touchstory_cache --heading-base-level=0

//! Touchstory Cache: per-handle scoped key/value storage.
//!
//! A [`ScopedCache`] attaches named slots to opaque handles (elements, the window,
//! the document). Each handle that owns at least one slot is identified by a
//! [`CacheIndex`]:
//!
//! - Indices `0..=2` are reserved for the three [`VirtualRoot`]s and are pinned
//!   with [`ScopedCache::reserve`]. They are never released.
//! - Every other handle receives an index lazily, on its first write. Indices are
//!   allocated monotonically and never reused, so a stale index can never alias a
//!   live handle.
//! - When the last slot of a handle is removed, its scope is dropped and the handle
//!   loses its index. Writing to it again allocates a fresh one.
//!
//! ## Minimal example
//!
//! ```
//! use touchstory_cache::{CacheIndex, ScopedCache, VirtualRoot};
//!
//! let mut cache = ScopedCache::<&str, u32>::new();
//! cache.reserve(VirtualRoot::Document, "document");
//!
//! // `set` keeps an existing value and returns it.
//! *cache.set("button", "clicks", 0) += 1;
//! assert_eq!(cache.set("button", "clicks", 0), &mut 1);
//! assert_eq!(cache.index_of(&"button"), Some(CacheIndex::new(3)));
//!
//! // Removing the last slot releases the index...
//! cache.remove(&"button", Some("clicks"));
//! assert_eq!(cache.index_of(&"button"), None);
//!
//! // ...but never for a virtual root.
//! cache.set("document", "ready", 1);
//! cache.remove(&"document", None);
//! assert_eq!(cache.index_of(&"document"), Some(CacheIndex::DOCUMENT));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Inline slot capacity per handle.
///
/// A handle typically carries one handler list per raw event type it listens to,
/// plus a few gesture bookkeeping lists.
const INLINE_SLOTS: usize = 4;

/// The index identifying a handle's scope inside a [`ScopedCache`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheIndex(u32);

impl CacheIndex {
    /// Reserved index of the window.
    pub const WINDOW: Self = Self(0);
    /// Reserved index of the document.
    pub const DOCUMENT: Self = Self(1);
    /// Reserved index of the document element.
    pub const DOCUMENT_ELEMENT: Self = Self(2);
    /// First index handed out to ordinary handles.
    pub const FIRST_DYNAMIC: Self = Self(3);

    /// Creates an index from its raw value.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` for the indices reserved for virtual roots.
    #[must_use]
    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC.0
    }
}

impl fmt::Debug for CacheIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheIndex").field(&self.0).finish()
    }
}

/// The virtual roots that own a reserved [`CacheIndex`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VirtualRoot {
    /// The top-level window.
    Window,
    /// The document.
    Document,
    /// The document (root) element.
    DocumentElement,
}

impl VirtualRoot {
    /// All virtual roots, in index order.
    pub const ALL: [Self; 3] = [Self::Window, Self::Document, Self::DocumentElement];

    /// Returns the reserved index for this root.
    #[must_use]
    pub const fn index(self) -> CacheIndex {
        match self {
            Self::Window => CacheIndex::WINDOW,
            Self::Document => CacheIndex::DOCUMENT,
            Self::DocumentElement => CacheIndex::DOCUMENT_ELEMENT,
        }
    }
}

/// Named slots of one handle, sorted by name for binary search.
#[derive(Debug)]
struct Scope<V> {
    slots: SmallVec<[(String, V); INLINE_SLOTS]>,
}

impl<V> Scope<V> {
    fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    #[inline]
    fn find(&self, name: &str) -> Result<usize, usize> {
        self.slots
            .binary_search_by(|(slot, _)| slot.as_str().cmp(name))
    }
}

/// Per-handle key/value storage.
///
/// See the [crate documentation](crate) for the index lifecycle.
pub struct ScopedCache<K, V> {
    indices: HashMap<K, CacheIndex>,
    scopes: HashMap<CacheIndex, Scope<V>>,
    next: u32,
}

impl<K, V> fmt::Debug for ScopedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCache")
            .field("handles", &self.indices.len())
            .field("scopes", &self.scopes.len())
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ScopedCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ScopedCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
            scopes: HashMap::new(),
            next: CacheIndex::FIRST_DYNAMIC.0,
        }
    }

    /// Pins `key` to the reserved index of `root`.
    ///
    /// Reserving replaces any index `key` had before; slots stored under the old
    /// index are dropped.
    pub fn reserve(&mut self, root: VirtualRoot, key: K) {
        let index = root.index();
        if let Some(old) = self.indices.insert(key, index) {
            if old != index {
                self.scopes.remove(&old);
            }
        }
    }

    /// Returns the index currently assigned to `key`.
    #[must_use]
    pub fn index_of(&self, key: &K) -> Option<CacheIndex> {
        self.indices.get(key).copied()
    }

    /// Returns `true` if `key` has a slot named `name`.
    #[must_use]
    pub fn contains(&self, key: &K, name: &str) -> bool {
        self.get(key, name).is_some()
    }

    /// Returns the number of handles that currently own at least one slot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if no handle owns a slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns the number of slots owned by `key`.
    #[must_use]
    pub fn slot_count(&self, key: &K) -> usize {
        self.scope(key).map_or(0, |scope| scope.slots.len())
    }

    /// Reads the slot `name` of `key`.
    #[must_use]
    pub fn get(&self, key: &K, name: &str) -> Option<&V> {
        let scope = self.scope(key)?;
        let at = scope.find(name).ok()?;
        Some(&scope.slots[at].1)
    }

    /// Mutably borrows the slot `name` of `key`.
    pub fn get_mut(&mut self, key: &K, name: &str) -> Option<&mut V> {
        let index = self.index_of(key)?;
        let scope = self.scopes.get_mut(&index)?;
        let at = scope.find(name).ok()?;
        Some(&mut scope.slots[at].1)
    }

    /// Writes `value` into the slot `name` of `key` unless the slot already
    /// exists, and returns the slot's value.
    ///
    /// Assigns a cache index to `key` if it has none.
    pub fn set(&mut self, key: K, name: &str, value: V) -> &mut V {
        self.get_or_insert_with(key, name, || value)
    }

    /// Returns the slot `name` of `key`, creating it with `init` if absent.
    pub fn get_or_insert_with(&mut self, key: K, name: &str, init: impl FnOnce() -> V) -> &mut V {
        let index = self.ensure_index(key);
        let scope = self.scopes.entry(index).or_insert_with(Scope::new);
        let at = match scope.find(name) {
            Ok(at) => at,
            Err(at) => {
                scope.slots.insert(at, (String::from(name), init()));
                at
            }
        };
        &mut scope.slots[at].1
    }

    /// Replaces the slot `name` of `key`, returning the previous value.
    pub fn replace(&mut self, key: K, name: &str, value: V) -> Option<V> {
        let index = self.ensure_index(key);
        let scope = self.scopes.entry(index).or_insert_with(Scope::new);
        match scope.find(name) {
            Ok(at) => Some(core::mem::replace(&mut scope.slots[at].1, value)),
            Err(at) => {
                scope.slots.insert(at, (String::from(name), value));
                None
            }
        }
    }

    /// Removes the slot `name` of `key`, or every slot of `key` when `name` is
    /// `None`.
    ///
    /// When the handle is left without slots its scope is dropped and, unless the
    /// handle is a virtual root, its index is released.
    pub fn remove(&mut self, key: &K, name: Option<&str>) -> Option<V> {
        let index = self.index_of(key)?;
        let scope = self.scopes.get_mut(&index)?;
        let removed = match name {
            Some(name) => scope.find(name).ok().map(|at| scope.slots.remove(at).1),
            None => {
                scope.slots.clear();
                None
            }
        };
        if scope.slots.is_empty() {
            self.scopes.remove(&index);
            if !index.is_reserved() {
                self.indices.remove(key);
            }
        }
        removed
    }

    fn scope(&self, key: &K) -> Option<&Scope<V>> {
        self.scopes.get(&self.index_of(key)?)
    }

    fn ensure_index(&mut self, key: K) -> CacheIndex {
        if let Some(index) = self.indices.get(&key) {
            return *index;
        }
        let index = CacheIndex(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("too many cache scopes for CacheIndex (u32)");
        self.indices.insert(key, index);
        index
    }
}
