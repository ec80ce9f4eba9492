// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity.

use core::fmt;

/// A handle to a node in a [`LayoutTree`](super::LayoutTree).
///
/// Contains both a slot index and a generation counter. When a node is
/// removed its slot may be reused, but the generation moves on, so a handle
/// to the removed node never resolves to the new occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Slot index into the tree's slot vector.
    pub(crate) idx: u32,
    /// Must match the slot's generation for the handle to be live.
    pub(crate) generation: u32,
}

impl NodeId {
    /// Reassembles a handle from [`index`](Self::index) and
    /// [`generation`](Self::generation), e.g. after passing it through a
    /// foreign API. The tree validates it on every use.
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}@gen{})", self.idx, self.generation)
    }
}
