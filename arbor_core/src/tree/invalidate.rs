// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache invalidation and the layout version protocol.
//!
//! Two flags travel up the ancestor chain, each with the same
//! stop-at-first-already-marked walk:
//!
//! 1. **Dirtiness** — [`mark_dirty`](LayoutTree::mark_dirty) clears a node's
//!    sizing cache and continues with its parent. A node whose cache is
//!    already empty has had all of its ancestors informed, so the walk ends
//!    there.
//! 2. **Dirty descendant** — committing the active layout variant bumps the
//!    node's layout version and raises `dirty_descendant` on its ancestors,
//!    ending at the first ancestor that already has it raised.
//!
//! The first tells the orchestrator what must be recomputed; the second tells
//! a consumer what changed since it last looked.

use alloc::vec;
use alloc::vec::Vec;

use crate::cache::ClearState;
use crate::error::{TreeOp, TreeResult};
use crate::geometry::Axes;
use crate::layout::{Layout, LayoutOutput, SizingQuery};
#[cfg(feature = "trace-rich")]
use crate::trace::{CacheLookupEvent, DirtyPropagationEvent, LayoutCommitEvent};

use super::id::NodeId;
use super::store::LayoutTree;

/// Which layout variant a write targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Unrounded,
    Final,
}

impl<S, C> LayoutTree<S, C> {
    // -- Dirty API --

    /// Clears the sizing cache of `node` and of each ancestor up to the first
    /// one that is already dirty.
    ///
    /// Mutations call this automatically; call it directly when something the
    /// tree cannot see (such as a context edited through
    /// [`context_mut`](Self::context_mut)) changes a node's measurement.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn mark_dirty(&mut self, node: NodeId) -> TreeResult<()> {
        self.require_node(TreeOp::MarkDirty, node)?;
        self.propagate_dirty(node);
        Ok(())
    }

    /// Returns `true` if `node` has nothing cached, or is not in the tree.
    #[must_use]
    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.entry(node).is_none_or(|e| e.data.cache.is_empty())
    }

    /// Walks from `node` towards the root clearing caches, and returns how
    /// many were cleared.
    pub(crate) fn propagate_dirty(&mut self, node: NodeId) -> u32 {
        let mut cleared = 0;
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(entry) = self.entry_mut(id) else {
                break;
            };
            if entry.data.cache.clear() == ClearState::AlreadyEmpty {
                break;
            }
            cleared += 1;
            current = entry.parent;
        }
        #[cfg(feature = "trace-rich")]
        self.tracer
            .dirty_propagation(&DirtyPropagationEvent { node, cleared });
        cleared
    }

    // -- Layout API --

    /// Returns the active layout of `node`: the final layout when rounding is
    /// enabled, the unrounded one otherwise.
    #[must_use]
    pub fn layout(&self, node: NodeId) -> Option<&Layout> {
        if self.config.use_rounding {
            self.final_layout(node)
        } else {
            self.unrounded_layout(node)
        }
    }

    /// Returns the layout of `node` as computed, before rounding.
    #[must_use]
    pub fn unrounded_layout(&self, node: NodeId) -> Option<&Layout> {
        self.entry(node).map(|e| &e.data.unrounded_layout)
    }

    /// Returns the rounded layout of `node`.
    #[must_use]
    pub fn final_layout(&self, node: NodeId) -> Option<&Layout> {
        self.entry(node).map(|e| &e.data.final_layout)
    }

    /// Stores the unrounded layout of `node`. Commits it if rounding is
    /// disabled.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn set_unrounded_layout(&mut self, node: NodeId, layout: &Layout) -> TreeResult<()> {
        self.write_layout(node, layout, Variant::Unrounded)
    }

    /// Stores the final layout of `node`. Commits it if rounding is enabled.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn set_final_layout(&mut self, node: NodeId, layout: &Layout) -> TreeResult<()> {
        self.write_layout(node, layout, Variant::Final)
    }

    fn write_layout(&mut self, node: NodeId, layout: &Layout, variant: Variant) -> TreeResult<()> {
        let data = &mut self.require_node_mut(TreeOp::SetLayout, node)?.data;
        match variant {
            Variant::Unrounded => data.unrounded_layout = *layout,
            Variant::Final => data.final_layout = *layout,
        }
        let active = if self.config.use_rounding {
            Variant::Final
        } else {
            Variant::Unrounded
        };
        if variant == active {
            self.commit(node, layout);
        }
        Ok(())
    }

    /// Bumps the version of a live node, flags its ancestors and notifies the
    /// listener.
    fn commit(&mut self, node: NodeId, layout: &Layout) {
        let Some(entry) = self.entry_mut(node) else {
            return;
        };
        entry.data.layout_version = entry.data.layout_version.wrapping_add(1);
        #[cfg(feature = "trace-rich")]
        let version = entry.data.layout_version;
        let mut current = entry.parent;

        while let Some(id) = current {
            let Some(ancestor) = self.entry_mut(id) else {
                break;
            };
            if ancestor.data.dirty_descendant {
                break;
            }
            ancestor.data.dirty_descendant = true;
            current = ancestor.parent;
        }

        self.stats.commits += 1;
        #[cfg(feature = "trace-rich")]
        self.tracer
            .layout_commit(&LayoutCommitEvent { node, version });
        if let Some(listener) = self.listener.as_mut() {
            listener(node, Some(layout));
        }
    }

    // -- Version API --

    /// Returns how many times the active layout of `node` has been committed.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn layout_version(&self, node: NodeId) -> TreeResult<u32> {
        Ok(self
            .require_node(TreeOp::LayoutVersion, node)?
            .data
            .layout_version)
    }

    /// Returns whether `node` committed a layout since it was last
    /// acknowledged.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn has_new_layout(&self, node: NodeId) -> TreeResult<bool> {
        Ok(self
            .require_node(TreeOp::LayoutVersion, node)?
            .data
            .has_new_layout())
    }

    /// Returns whether some descendant of `node` committed a layout that has
    /// not been visited.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn has_dirty_descendant(&self, node: NodeId) -> TreeResult<bool> {
        Ok(self
            .require_node(TreeOp::LayoutVersion, node)?
            .data
            .dirty_descendant)
    }

    /// Returns whether a consumer walking the tree must visit `node`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn needs_visit(&self, node: NodeId) -> TreeResult<bool> {
        Ok(self
            .require_node(TreeOp::LayoutVersion, node)?
            .data
            .needs_visit())
    }

    /// Marks the current layout of `node` as seen.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn acknowledge_layout(&mut self, node: NodeId) -> TreeResult<()> {
        self.require_node_mut(TreeOp::Acknowledge, node)?
            .data
            .acknowledge();
        Ok(())
    }

    /// Marks the current layout of `node` as seen and clears its
    /// dirty-descendant flag. Meant for bottom-up walks, once the descendants
    /// have been handled.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn acknowledge_subtree(&mut self, node: NodeId) -> TreeResult<()> {
        let data = &mut self.require_node_mut(TreeOp::Acknowledge, node)?.data;
        data.acknowledge();
        data.dirty_descendant = false;
        Ok(())
    }

    /// Visits the subtree under `root` in pre-order, descending only into
    /// nodes that [need a visit](Self::needs_visit). Returns the nodes with a
    /// new layout and acknowledges everything visited.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `root` is not in the tree.
    pub fn drain_layout_changes(&mut self, root: NodeId) -> TreeResult<Vec<NodeId>> {
        self.require_node(TreeOp::Acknowledge, root)?;
        let mut changed = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let Some(entry) = self.entry_mut(node) else {
                continue;
            };
            if !entry.data.needs_visit() {
                continue;
            }
            if entry.data.has_new_layout() {
                changed.push(node);
            }
            entry.data.acknowledge();
            entry.data.dirty_descendant = false;
            stack.extend(entry.children.iter().rev());
        }
        Ok(changed)
    }

    // -- Cache API --

    /// Looks `query` up in the sizing cache of `node`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn cache_get(&mut self, node: NodeId, query: &SizingQuery) -> TreeResult<Option<LayoutOutput>> {
        let output = self.require_node(TreeOp::Cache, node)?.data.cache.get(query);
        if output.is_some() {
            self.stats.cache_hits += 1;
        } else {
            self.stats.cache_misses += 1;
        }
        #[cfg(feature = "trace-rich")]
        self.tracer.cache_lookup(&CacheLookupEvent {
            node,
            run_mode: query.run_mode,
            hit: output.is_some(),
        });
        Ok(output)
    }

    /// Stores `output` as the result of `query` in the cache of `node`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn cache_store(&mut self, node: NodeId, query: &SizingQuery, output: LayoutOutput) -> TreeResult<()> {
        self.cache_store_with_independence(node, query, output, Axes::splat(false))
    }

    /// Like [`cache_store`](Self::cache_store), declaring per axis whether
    /// `output` is independent of the available space. See
    /// [`Cache::store_with_independence`](crate::cache::Cache::store_with_independence).
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn cache_store_with_independence(
        &mut self,
        node: NodeId,
        query: &SizingQuery,
        output: LayoutOutput,
        space_independent: Axes<bool>,
    ) -> TreeResult<()> {
        self.require_node_mut(TreeOp::Cache, node)?
            .data
            .cache
            .store_with_independence(query, output, space_independent);
        self.stats.cache_stores += 1;
        Ok(())
    }

    /// Empties the cache of `node` alone, without touching its ancestors.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `node` is not in the tree.
    pub fn cache_clear(&mut self, node: NodeId) -> TreeResult<ClearState> {
        Ok(self.require_node_mut(TreeOp::Cache, node)?.data.cache.clear())
    }
}
