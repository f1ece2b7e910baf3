// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// An ordered list of handles a call applies to.
///
/// Build one from a single handle, a `Vec`, a slice, an iterator, or
/// [`Events::query`](crate::Events::query). An empty list turns every call into
/// a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elements<K>(Vec<K>);

impl<K> Elements<K> {
    /// An empty list.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A list holding just `handle`.
    #[must_use]
    pub fn single(handle: K) -> Self {
        Self(Vec::from([handle]))
    }

    /// Number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no handles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The handles in order.
    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.0
    }

    /// Iterates over the handles.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.0.iter()
    }
}

impl<K> Default for Elements<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> From<Vec<K>> for Elements<K> {
    fn from(handles: Vec<K>) -> Self {
        Self(handles)
    }
}

impl<K: Clone> From<&[K]> for Elements<K> {
    fn from(handles: &[K]) -> Self {
        Self(handles.to_vec())
    }
}

impl<K> FromIterator<K> for Elements<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, K> IntoIterator for &'a Elements<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
