// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input-side change reporting.
//!
//! Each [`take_changes`](LayoutTree::take_changes) call drains the change-log
//! channels (see [`dirty`](crate::dirty)) and the lifecycle lists accumulated
//! since the previous call:
//!
//! 1. **STYLE** / **CONTEXT** — Drain dirty slot indices and resolve them to
//!    handles of nodes that are still alive.
//! 2. **TOPOLOGY** — Drain and reduce to a single flag.
//! 3. **Lifecycle** — Move the added and removed lists out. A node created
//!    and removed within one window appears only in `removed`.

use alloc::vec::Vec;

use super::id::NodeId;
use super::store::LayoutTree;
use crate::dirty;

/// The changes reported by a single [`LayoutTree::take_changes`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeChanges {
    /// Live nodes whose style was replaced.
    pub styles: Vec<NodeId>,
    /// Live nodes whose measurement context was replaced or removed.
    pub contexts: Vec<NodeId>,
    /// Nodes created since the last call and still alive.
    pub added: Vec<NodeId>,
    /// Nodes removed since the last call.
    pub removed: Vec<NodeId>,
    /// Whether any child list changed or any node was created or removed.
    pub topology_changed: bool,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.styles.clear();
        self.contexts.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.contexts.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl<S, C> LayoutTree<S, C> {
    /// Drains the change log, returning everything that changed since the
    /// previous call.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), reusing the buffers of
    /// `changes`.
    pub fn take_changes_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();

        let styles: Vec<u32> = self
            .changes
            .drain(dirty::STYLE)
            .deterministic()
            .run()
            .collect();
        changes
            .styles
            .extend(styles.into_iter().filter_map(|idx| self.live_at(idx)));

        let contexts: Vec<u32> = self
            .changes
            .drain(dirty::CONTEXT)
            .deterministic()
            .run()
            .collect();
        changes
            .contexts
            .extend(contexts.into_iter().filter_map(|idx| self.live_at(idx)));

        let topology: Vec<u32> = self
            .changes
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        let slots = &self.slots;
        changes
            .added
            .extend(self.pending_added.drain(..).filter(|node| {
                slots
                    .get(node.idx as usize)
                    .is_some_and(|slot| slot.generation == node.generation && slot.entry.is_some())
            }));
    }

    /// Returns the handle of the node living in slot `idx`, if any.
    fn live_at(&self, idx: u32) -> Option<NodeId> {
        let slot = self.slots.get(idx as usize)?;
        slot.entry.as_ref().map(|_| NodeId {
            idx,
            generation: slot.generation,
        })
    }
}
