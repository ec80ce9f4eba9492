// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node records and arena slots.

use alloc::vec::Vec;

use crate::cache::Cache;
use crate::layout::Layout;

use super::id::NodeId;

/// Everything the tree knows about one node besides its relatives.
#[derive(Clone, Debug)]
pub(crate) struct NodeData<S> {
    pub(crate) style: S,
    /// Result as computed, before pixel snapping.
    pub(crate) unrounded_layout: Layout,
    /// Result after pixel snapping.
    pub(crate) final_layout: Layout,
    pub(crate) has_context: bool,
    /// Bumped on every commit of the active layout variant.
    pub(crate) layout_version: u32,
    /// The `layout_version` the consumer last acknowledged.
    pub(crate) acknowledged_version: u32,
    /// Set when some descendant committed a layout the consumer has not
    /// visited yet.
    pub(crate) dirty_descendant: bool,
    pub(crate) cache: Cache,
}

impl<S> NodeData<S> {
    pub(crate) fn new(style: S, has_context: bool) -> Self {
        Self {
            style,
            unrounded_layout: Layout::new(),
            final_layout: Layout::new(),
            has_context,
            layout_version: 0,
            acknowledged_version: 0,
            dirty_descendant: false,
            cache: Cache::new(),
        }
    }

    #[inline]
    pub(crate) fn has_new_layout(&self) -> bool {
        self.layout_version != self.acknowledged_version
    }

    #[inline]
    pub(crate) fn needs_visit(&self) -> bool {
        self.has_new_layout() || self.dirty_descendant
    }

    pub(crate) fn acknowledge(&mut self) {
        self.acknowledged_version = self.layout_version;
    }
}

/// A live node: record, context and links, present or absent together.
#[derive(Clone, Debug)]
pub(crate) struct NodeEntry<S, C> {
    pub(crate) data: NodeData<S>,
    pub(crate) context: Option<C>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<S, C> NodeEntry<S, C> {
    pub(crate) fn new(style: S, context: Option<C>) -> Self {
        Self {
            data: NodeData::new(style, context.is_some()),
            context,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// One arena position. `entry` is `None` while the slot sits on the free list.
#[derive(Clone, Debug)]
pub(crate) struct Slot<S, C> {
    pub(crate) generation: u32,
    pub(crate) entry: Option<NodeEntry<S, C>>,
}
