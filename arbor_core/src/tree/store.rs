// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot arena with allocation, topology, and style/context management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;
use crate::error::{LayoutError, TreeOp, TreeResult};
use crate::layout::Layout;
use crate::trace::{PassStats, TraceSink, Tracer};

use super::id::NodeId;
use super::node::{NodeEntry, Slot};

/// Construction-time settings for a [`LayoutTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Whether [`compute_layout`](LayoutTree::compute_layout) snaps results
    /// to whole pixels. Decides which layout variant is *active*: the final
    /// (rounded) one when `true`, the unrounded one otherwise.
    pub use_rounding: bool,
    /// Number of node slots to reserve up front.
    pub capacity: usize,
}

impl TreeConfig {
    /// Rounding enabled, no preallocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            use_rounding: true,
            capacity: 0,
        }
    }

    /// Rounding disabled, no preallocation.
    #[must_use]
    pub const fn unrounded() -> Self {
        Self {
            use_rounding: false,
            capacity: 0,
        }
    }

    /// Returns a copy with the given slot reservation.
    #[must_use]
    pub const fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback invoked synchronously when a node's active layout is committed
/// (`Some`) or the node is removed (`None`).
pub type LayoutListener = Box<dyn FnMut(NodeId, Option<&Layout>)>;

/// Arena of layout nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies one slot
/// holding its record, measurement context and links together. Removed nodes
/// are recycled via a free list, and generation counters make stale handles
/// resolve to nothing.
///
/// `S` is the style type and `C` the per-node measurement context. Neither is
/// interpreted by the tree.
pub struct LayoutTree<S, C = ()> {
    // -- Storage --
    pub(crate) slots: Vec<Slot<S, C>>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) live: usize,

    // -- Settings --
    pub(crate) config: TreeConfig,

    // -- Observers --
    pub(crate) listener: Option<LayoutListener>,
    pub(crate) tracer: Tracer,

    // -- Pass bookkeeping --
    pub(crate) stats: PassStats,
    pub(crate) last_pass: Option<PassStats>,
    pub(crate) pass_index: u64,

    // -- Change log --
    pub(crate) changes: DirtyTracker<u32>,
    pub(crate) pending_added: Vec<NodeId>,
    pub(crate) pending_removed: Vec<NodeId>,
}

impl<S, C> fmt::Debug for LayoutTree<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutTree")
            .field("live", &self.live)
            .field("slots", &self.len)
            .field("free", &self.free_list.len())
            .field("config", &self.config)
            .field("has_listener", &self.listener.is_some())
            .field("tracer", &self.tracer)
            .field("last_pass", &self.last_pass)
            .finish_non_exhaustive()
    }
}

impl<S, C> Default for LayoutTree<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> LayoutTree<S, C> {
    /// Creates an empty tree with rounding enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    /// Creates an empty tree with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TreeConfig::new().with_capacity(capacity))
    }

    /// Creates an empty tree with the given settings.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            free_list: Vec::new(),
            len: 0,
            live: 0,
            config,
            listener: None,
            tracer: Tracer::none(),
            stats: PassStats::default(),
            last_pass: None,
            pass_index: 0,
            changes: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Settings API --

    /// Returns the current settings.
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Makes the final (rounded) layout the active variant.
    pub fn enable_rounding(&mut self) {
        self.config.use_rounding = true;
    }

    /// Makes the unrounded layout the active variant.
    pub fn disable_rounding(&mut self) {
        self.config.use_rounding = false;
    }

    /// Installs a sink that receives trace events.
    ///
    /// Without the `trace` feature the sink is dropped immediately.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink + 'static) {
        self.tracer = Tracer::new(Box::new(sink));
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take_sink()
    }

    /// Registers a callback for layout commits and node removals, replacing
    /// any previous one.
    ///
    /// The callback runs on the mutating call's stack, before that call
    /// returns.
    pub fn set_layout_listener(&mut self, listener: impl FnMut(NodeId, Option<&Layout>) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the layout callback.
    pub fn clear_layout_listener(&mut self) {
        self.listener = None;
    }

    // -- Allocation API --

    /// Creates a childless node with no measurement context.
    pub fn new_leaf(&mut self, style: S) -> NodeId {
        self.alloc(style, None)
    }

    /// Creates a childless node carrying a measurement context.
    pub fn new_leaf_with_context(&mut self, style: S, context: C) -> NodeId {
        self.alloc(style, Some(context))
    }

    /// Creates a node with the given children, in order.
    ///
    /// Children that already have a parent are detached from it first, and
    /// that parent is marked dirty.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidChildNode`] if any child is not in the tree. No
    /// node is created in that case.
    pub fn new_with_children(&mut self, style: S, children: &[NodeId]) -> TreeResult<NodeId> {
        let op = TreeOp::NewWithChildren;
        for &child in children {
            self.require_child(op, child)?;
        }
        let node = self.alloc(style, None);
        for &child in children {
            self.detach(child);
            self.link_last(node, child);
        }
        Ok(node)
    }

    /// Removes a node and returns its handle.
    ///
    /// The node is detached from its parent (which is marked dirty). Its own
    /// children are orphaned, not removed: they become roots. The record,
    /// cache and context are dropped, and the handle goes stale. A registered
    /// listener is called with `None`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn remove(&mut self, node: NodeId) -> TreeResult<NodeId> {
        self.require_node(TreeOp::Remove, node)?;
        self.detach(node);
        if let Some(entry) = self.retire(node) {
            for child in entry.children {
                if let Some(orphan) = self.entry_mut(child) {
                    orphan.parent = None;
                }
            }
        }
        Ok(node)
    }

    /// Removes every node. All outstanding handles go stale.
    pub fn clear(&mut self) {
        let live: Vec<NodeId> = self.node_ids().collect();
        for node in live {
            self.retire(node);
        }
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s children.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    /// - [`LayoutError::InvalidChildNode`] if `child` is not in the tree, or
    ///   is `parent` itself or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let op = TreeOp::AddChild;
        self.require_parent(op, parent)?;
        self.require_attachable(op, parent, child)?;
        self.detach(child);
        self.link_last(parent, child);
        self.structure_changed(parent);
        Ok(())
    }

    /// Inserts `child` into `parent`'s children so that it ends up at
    /// `child_index`.
    ///
    /// If `child` is already a child of `parent` it is moved; `child_index`
    /// refers to the list before the move.
    ///
    /// # Errors
    ///
    /// As [`add_child`](Self::add_child), plus
    /// [`LayoutError::ChildIndexOutOfBounds`] if `child_index` is greater
    /// than the child count.
    pub fn insert_child_at_index(
        &mut self,
        parent: NodeId,
        child_index: usize,
        child: NodeId,
    ) -> TreeResult<()> {
        let op = TreeOp::InsertChildAtIndex;
        let child_count = self.child_list(op, parent)?.len();
        self.require_attachable(op, parent, child)?;
        if child_index > child_count {
            return Err(LayoutError::ChildIndexOutOfBounds {
                op,
                parent,
                child_index,
                child_count,
            });
        }

        let mut index = child_index;
        if self.parent(child) == Some(parent) {
            let current = self
                .entry(parent)
                .and_then(|p| p.children.iter().position(|&c| c == child));
            if current.is_some_and(|pos| pos < index) {
                index -= 1;
            }
        }
        self.detach(child);
        self.link(parent, index, child);
        self.structure_changed(parent);
        Ok(())
    }

    /// Replaces all of `parent`'s children.
    ///
    /// Former children become roots. New children are detached from their
    /// previous parents first.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    /// - [`LayoutError::InvalidChildNode`] if any child is not in the tree or
    ///   is `parent` or one of its ancestors. Nothing changes in that case.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> TreeResult<()> {
        let op = TreeOp::SetChildren;
        self.require_parent(op, parent)?;
        for &child in children {
            self.require_attachable(op, parent, child)?;
        }

        let previous = self
            .entry_mut(parent)
            .map(|p| core::mem::take(&mut p.children))
            .unwrap_or_default();
        for former in previous {
            if let Some(entry) = self.entry_mut(former) {
                entry.parent = None;
            }
        }
        for &child in children {
            self.detach(child);
            self.link_last(parent, child);
        }
        self.structure_changed(parent);
        Ok(())
    }

    /// Removes `child` from `parent`'s children and returns it.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    /// - [`LayoutError::InvalidChildNode`] if `child` is not one of its
    ///   children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<NodeId> {
        let op = TreeOp::RemoveChild;
        let index = self
            .child_list(op, parent)?
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::InvalidChildNode { op, child })?;
        self.unlink_at(parent, index)
            .ok_or(LayoutError::InvalidChildNode { op, child })
    }

    /// Removes the child at `child_index` and returns it.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    /// - [`LayoutError::ChildIndexOutOfBounds`] if there is no such child.
    pub fn remove_child_at_index(&mut self, parent: NodeId, child_index: usize) -> TreeResult<NodeId> {
        let op = TreeOp::RemoveChildAtIndex;
        let child_count = self.child_list(op, parent)?.len();
        self.unlink_at(parent, child_index)
            .ok_or(LayoutError::ChildIndexOutOfBounds {
                op,
                parent,
                child_index,
                child_count,
            })
    }

    /// Puts `new_child` in place of the child at `child_index` and returns
    /// the displaced child, which becomes a root.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    /// - [`LayoutError::InvalidChildNode`] if `new_child` is not in the tree
    ///   or is `parent` or one of its ancestors.
    /// - [`LayoutError::ChildIndexOutOfBounds`] if there is no such child.
    pub fn replace_child_at_index(
        &mut self,
        parent: NodeId,
        child_index: usize,
        new_child: NodeId,
    ) -> TreeResult<NodeId> {
        let op = TreeOp::ReplaceChildAtIndex;
        let children = self.child_list(op, parent)?;
        let child_count = children.len();
        let old_child = children
            .get(child_index)
            .copied()
            .ok_or(LayoutError::ChildIndexOutOfBounds {
                op,
                parent,
                child_index,
                child_count,
            })?;
        self.require_attachable(op, parent, new_child)?;
        if old_child == new_child {
            return Ok(old_child);
        }

        // `new_child` may be a sibling, so locate `old_child` after detaching.
        self.detach(new_child);
        if let Some(entry) = self.entry_mut(parent)
            && let Some(pos) = entry.children.iter().position(|&c| c == old_child)
        {
            entry.children[pos] = new_child;
        }
        if let Some(entry) = self.entry_mut(new_child) {
            entry.parent = Some(parent);
        }
        if let Some(entry) = self.entry_mut(old_child) {
            entry.parent = None;
        }
        self.structure_changed(parent);
        Ok(old_child)
    }

    // -- Query API --

    /// Returns whether the handle refers to a live node.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.entry(node).is_some()
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn total_node_count(&self) -> usize {
        self.live
    }

    /// Returns the child at `child_index`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidParentNode`] or
    /// [`LayoutError::ChildIndexOutOfBounds`].
    pub fn child_at_index(&self, parent: NodeId, child_index: usize) -> TreeResult<NodeId> {
        let op = TreeOp::ChildAtIndex;
        let children = self.child_list(op, parent)?;
        children
            .get(child_index)
            .copied()
            .ok_or(LayoutError::ChildIndexOutOfBounds {
                op,
                parent,
                child_index,
                child_count: children.len(),
            })
    }

    /// Returns the number of children of `parent`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    pub fn child_count(&self, parent: NodeId) -> TreeResult<usize> {
        Ok(self.child_list(TreeOp::ChildCount, parent)?.len())
    }

    /// Returns the children of `parent`, in order.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidParentNode`] if `parent` is not in the tree.
    pub fn children(&self, parent: NodeId) -> TreeResult<&[NodeId]> {
        self.child_list(TreeOp::Children, parent)
    }

    /// Returns the parent of `node`, or `None` for roots and absent nodes.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|e| e.parent)
    }

    /// Returns all parentless nodes, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&node| self.parent(node).is_none())
            .collect()
    }

    /// Iterates over every live node, in slot order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0_u32..).zip(&self.slots).filter_map(|(idx, slot)| {
            slot.entry.as_ref().map(|_| NodeId {
                idx,
                generation: slot.generation,
            })
        })
    }

    // -- Style / context API --

    /// Returns the style of `node`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn style(&self, node: NodeId) -> TreeResult<&S> {
        Ok(&self.require_node(TreeOp::Style, node)?.data.style)
    }

    /// Replaces the style of `node` and marks it dirty.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn set_style(&mut self, node: NodeId, style: S) -> TreeResult<()> {
        self.require_node_mut(TreeOp::SetStyle, node)?.data.style = style;
        self.propagate_dirty(node);
        self.changes.mark(node.idx, dirty::STYLE);
        Ok(())
    }

    /// Returns the measurement context of `node`, if it has one.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn context(&self, node: NodeId) -> TreeResult<Option<&C>> {
        Ok(self.require_node(TreeOp::Context, node)?.context.as_ref())
    }

    /// Returns whether `node` carries a measurement context.
    ///
    /// Orchestrators use this to decide between measuring a leaf and laying
    /// out its children.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn has_context(&self, node: NodeId) -> TreeResult<bool> {
        Ok(self.require_node(TreeOp::Context, node)?.data.has_context)
    }

    /// Returns the measurement context of `node` mutably.
    ///
    /// Changes made through the reference do not dirty the node; call
    /// [`mark_dirty`](Self::mark_dirty) if they affect measurement.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn context_mut(&mut self, node: NodeId) -> TreeResult<Option<&mut C>> {
        Ok(self.require_node_mut(TreeOp::Context, node)?.context.as_mut())
    }

    /// Replaces (or with `None`, removes) the measurement context of `node`
    /// and marks it dirty.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`] if `node` is not in the tree.
    pub fn set_node_context(&mut self, node: NodeId, context: Option<C>) -> TreeResult<()> {
        let entry = self.require_node_mut(TreeOp::SetNodeContext, node)?;
        entry.data.has_context = context.is_some();
        entry.context = context;
        self.propagate_dirty(node);
        self.changes.mark(node.idx, dirty::CONTEXT);
        Ok(())
    }

    // -- Internal helpers --

    pub(crate) fn entry(&self, node: NodeId) -> Option<&NodeEntry<S, C>> {
        self.slots
            .get(node.idx as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn entry_mut(&mut self, node: NodeId) -> Option<&mut NodeEntry<S, C>> {
        self.slots
            .get_mut(node.idx as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub(crate) fn require_node(&self, op: TreeOp, node: NodeId) -> TreeResult<&NodeEntry<S, C>> {
        self.entry(node)
            .ok_or(LayoutError::InvalidInputNode { op, node })
    }

    pub(crate) fn require_node_mut(
        &mut self,
        op: TreeOp,
        node: NodeId,
    ) -> TreeResult<&mut NodeEntry<S, C>> {
        self.entry_mut(node)
            .ok_or(LayoutError::InvalidInputNode { op, node })
    }

    fn require_parent(&self, op: TreeOp, parent: NodeId) -> TreeResult<()> {
        if self.contains(parent) {
            Ok(())
        } else {
            Err(LayoutError::InvalidParentNode { op, parent })
        }
    }

    fn require_child(&self, op: TreeOp, child: NodeId) -> TreeResult<()> {
        if self.contains(child) {
            Ok(())
        } else {
            Err(LayoutError::InvalidChildNode { op, child })
        }
    }

    /// Rejects children that are absent, or that would become their own
    /// ancestor under `parent`.
    fn require_attachable(&self, op: TreeOp, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.require_child(op, child)?;
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                return Err(LayoutError::InvalidChildNode { op, child });
            }
            current = self.parent(node);
        }
        Ok(())
    }

    fn child_list(&self, op: TreeOp, parent: NodeId) -> TreeResult<&[NodeId]> {
        self.entry(parent)
            .map(|e| e.children.as_slice())
            .ok_or(LayoutError::InvalidParentNode { op, parent })
    }

    fn alloc(&mut self, style: S, context: Option<C>) -> NodeId {
        let entry = Some(NodeEntry::new(style, context));
        let node = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on retirement.
            let slot = &mut self.slots[idx as usize];
            slot.entry = entry;
            NodeId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = self.len;
            self.len += 1;
            self.slots.push(Slot {
                generation: 0,
                entry,
            });
            NodeId { idx, generation: 0 }
        };

        self.live += 1;
        self.pending_added.push(node);
        self.changes.mark(node.idx, dirty::TOPOLOGY);
        node
    }

    /// Tombstones the slot of a live node and returns what it held.
    fn retire(&mut self, node: NodeId) -> Option<NodeEntry<S, C>> {
        let slot = self
            .slots
            .get_mut(node.idx as usize)
            .filter(|slot| slot.generation == node.generation)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free_list.push(node.idx);
        self.live -= 1;
        self.changes.remove_key(node.idx);
        self.changes.mark(node.idx, dirty::TOPOLOGY);
        self.pending_removed.push(node);
        if let Some(listener) = self.listener.as_mut() {
            listener(node, None);
        }
        Some(entry)
    }

    /// Unlinks `child` from its parent, if any, and dirties that parent.
    fn detach(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.entry_mut(child)?.parent.take()?;
        if let Some(entry) = self.entry_mut(parent)
            && let Some(pos) = entry.children.iter().position(|&c| c == child)
        {
            entry.children.remove(pos);
        }
        self.structure_changed(parent);
        Some(parent)
    }

    /// Removes the child at `index` without validating `parent`.
    fn unlink_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let entry = self.entry_mut(parent)?;
        if index >= entry.children.len() {
            return None;
        }
        let child = entry.children.remove(index);
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = None;
        }
        self.structure_changed(parent);
        Some(child)
    }

    /// Links a parentless `child` at `index` of `parent`'s children.
    fn link(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
        }
        if let Some(entry) = self.entry_mut(parent) {
            entry.children.insert(index, child);
        }
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let index = self.entry(parent).map_or(0, |e| e.children.len());
        self.link(parent, index, child);
    }

    fn structure_changed(&mut self, parent: NodeId) {
        self.propagate_dirty(parent);
        self.changes.mark(parent.idx, dirty::TOPOLOGY);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    fn tree() -> LayoutTree<&'static str, u32> {
        LayoutTree::new()
    }

    fn assert_linked(tree: &LayoutTree<&'static str, u32>) {
        for node in tree.node_ids() {
            for &child in tree.children(node).unwrap() {
                assert_eq!(tree.parent(child), Some(node), "{child:?} under {node:?}");
            }
            if let Some(parent) = tree.parent(node) {
                let count = tree
                    .children(parent)
                    .unwrap()
                    .iter()
                    .filter(|&&c| c == node)
                    .count();
                assert_eq!(count, 1, "{node:?} listed once by {parent:?}");
            }
        }
    }

    #[test]
    fn create_and_remove() {
        let mut tree = tree();
        let node = tree.new_leaf("leaf");
        assert!(tree.contains(node));
        assert_eq!(tree.total_node_count(), 1);
        assert_eq!(tree.remove(node), Ok(node));
        assert!(!tree.contains(node));
        assert_eq!(tree.total_node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = tree();
        let first = tree.new_leaf("first");
        tree.remove(first).unwrap();
        let second = tree.new_leaf("second");

        assert_eq!(first.index(), second.index(), "slot was reused");
        assert_ne!(first.generation(), second.generation());
        assert!(!tree.contains(first));
        assert_eq!(
            tree.style(first),
            Err(LayoutError::InvalidInputNode {
                op: TreeOp::Style,
                node: first,
            })
        );
        assert_eq!(tree.style(second), Ok(&"second"));
    }

    #[test]
    fn add_child_and_query() {
        let mut tree = tree();
        let parent = tree.new_leaf("parent");
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        tree.add_child(parent, a).unwrap();
        tree.add_child(parent, b).unwrap();

        assert_eq!(tree.children(parent), Ok(&[a, b][..]));
        assert_eq!(tree.child_count(parent), Ok(2));
        assert_eq!(tree.child_at_index(parent, 1), Ok(b));
        assert_eq!(tree.parent(a), Some(parent));
        assert_eq!(tree.roots(), vec![parent]);
        assert_linked(&tree);
    }

    #[test]
    fn new_with_children_links_in_order() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let parent = tree.new_with_children("parent", &[b, a]).unwrap();
        assert_eq!(tree.children(parent), Ok(&[b, a][..]));
        assert_linked(&tree);
    }

    #[test]
    fn new_with_children_detaches_from_prior_parent() {
        let mut tree = tree();
        let child = tree.new_leaf("child");
        let old = tree.new_with_children("old", &[child]).unwrap();
        let new = tree.new_with_children("new", &[child]).unwrap();
        assert_eq!(tree.child_count(old), Ok(0));
        assert_eq!(tree.parent(child), Some(new));
        assert_linked(&tree);
    }

    #[test]
    fn new_with_children_rejects_stale_child() {
        let mut tree = tree();
        let stale = tree.new_leaf("stale");
        tree.remove(stale).unwrap();
        let err = tree.new_with_children("parent", &[stale]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidChildNode {
                op: TreeOp::NewWithChildren,
                child: stale,
            }
        );
        assert_eq!(tree.total_node_count(), 0, "no node was created");
    }

    #[test]
    fn reattach_moves_child() {
        let mut tree = tree();
        let p1 = tree.new_leaf("p1");
        let p2 = tree.new_leaf("p2");
        let child = tree.new_leaf("child");
        tree.add_child(p1, child).unwrap();
        tree.add_child(p2, child).unwrap();

        assert_eq!(tree.child_count(p1), Ok(0));
        assert_eq!(tree.children(p2), Ok(&[child][..]));
        assert_eq!(tree.parent(child), Some(p2));
        assert_linked(&tree);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = tree();
        let root = tree.new_leaf("root");
        let mid = tree.new_leaf("mid");
        let leaf = tree.new_leaf("leaf");
        tree.add_child(root, mid).unwrap();
        tree.add_child(mid, leaf).unwrap();

        let self_edge = tree.add_child(mid, mid);
        assert_eq!(
            self_edge,
            Err(LayoutError::InvalidChildNode {
                op: TreeOp::AddChild,
                child: mid,
            })
        );
        assert!(tree.add_child(leaf, root).is_err());
        assert!(tree.set_children(leaf, &[mid]).is_err());
        assert!(tree.insert_child_at_index(leaf, 0, root).is_err());
        assert!(tree.replace_child_at_index(mid, 0, root).is_err());
        assert_eq!(tree.parent(root), None, "tree unchanged");
        assert_linked(&tree);
    }

    #[test]
    fn insert_child_at_index_bounds() {
        let mut tree = tree();
        let parent = tree.new_leaf("parent");
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        tree.add_child(parent, a).unwrap();

        tree.insert_child_at_index(parent, 0, b).unwrap();
        assert_eq!(tree.children(parent), Ok(&[b, a][..]));

        let c = tree.new_leaf("c");
        assert_eq!(
            tree.insert_child_at_index(parent, 3, c),
            Err(LayoutError::ChildIndexOutOfBounds {
                op: TreeOp::InsertChildAtIndex,
                parent,
                child_index: 3,
                child_count: 2,
            })
        );
        tree.insert_child_at_index(parent, 2, c).unwrap();
        assert_eq!(tree.children(parent), Ok(&[b, a, c][..]));
    }

    #[test]
    fn insert_child_at_index_moves_within_parent() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let c = tree.new_leaf("c");
        let parent = tree.new_with_children("parent", &[a, b, c]).unwrap();

        tree.insert_child_at_index(parent, 3, a).unwrap();
        assert_eq!(tree.children(parent), Ok(&[b, c, a][..]));
        tree.insert_child_at_index(parent, 0, c).unwrap();
        assert_eq!(tree.children(parent), Ok(&[c, b, a][..]));
        assert_linked(&tree);
    }

    #[test]
    fn set_children_orphans_previous() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let c = tree.new_leaf("c");
        let parent = tree.new_with_children("parent", &[a, b]).unwrap();

        tree.set_children(parent, &[c, a]).unwrap();
        assert_eq!(tree.children(parent), Ok(&[c, a][..]));
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.parent(c), Some(parent));
        assert_linked(&tree);
    }

    #[test]
    fn remove_child_variants() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let stranger = tree.new_leaf("stranger");
        let parent = tree.new_with_children("parent", &[a, b]).unwrap();

        assert_eq!(tree.remove_child(parent, b), Ok(b));
        assert_eq!(tree.parent(b), None);
        assert_eq!(
            tree.remove_child(parent, stranger),
            Err(LayoutError::InvalidChildNode {
                op: TreeOp::RemoveChild,
                child: stranger,
            })
        );
        assert_eq!(
            tree.remove_child_at_index(parent, 1),
            Err(LayoutError::ChildIndexOutOfBounds {
                op: TreeOp::RemoveChildAtIndex,
                parent,
                child_index: 1,
                child_count: 1,
            })
        );
        assert_eq!(tree.remove_child_at_index(parent, 0), Ok(a));
        assert_eq!(tree.child_count(parent), Ok(0));
        assert_linked(&tree);
    }

    #[test]
    fn replace_child_at_index_swaps() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let c = tree.new_leaf("c");
        let parent = tree.new_with_children("parent", &[a, b]).unwrap();

        assert_eq!(tree.replace_child_at_index(parent, 0, c), Ok(a));
        assert_eq!(tree.children(parent), Ok(&[c, b][..]));
        assert_eq!(tree.parent(a), None);

        // Replacing with a sibling moves it.
        assert_eq!(tree.replace_child_at_index(parent, 1, c), Ok(b));
        assert_eq!(tree.children(parent), Ok(&[c][..]));
        assert_eq!(tree.replace_child_at_index(parent, 0, c), Ok(c));
        assert_linked(&tree);
    }

    #[test]
    fn remove_orphans_children() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let b = tree.new_leaf("b");
        let mid = tree.new_with_children("mid", &[a, b]).unwrap();
        let root = tree.new_with_children("root", &[mid]).unwrap();

        tree.remove(mid).unwrap();
        assert_eq!(tree.child_count(root), Ok(0));
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.parent(b), None);
        assert!(tree.contains(a), "children are not removed");
        assert_eq!(tree.roots(), vec![a, b, root]);
        assert_linked(&tree);
    }

    #[test]
    fn removed_handles_fail_everywhere() {
        let mut tree = tree();
        let live = tree.new_leaf("live");
        let gone = tree.new_leaf("gone");
        tree.remove(gone).unwrap();

        assert!(matches!(
            tree.add_child(gone, live),
            Err(LayoutError::InvalidParentNode { .. })
        ));
        assert!(matches!(
            tree.add_child(live, gone),
            Err(LayoutError::InvalidChildNode { .. })
        ));
        assert!(matches!(
            tree.children(gone),
            Err(LayoutError::InvalidParentNode { .. })
        ));
        assert!(matches!(
            tree.remove(gone),
            Err(LayoutError::InvalidInputNode { .. })
        ));
        assert_eq!(tree.parent(gone), None);
    }

    #[test]
    fn clear_retires_everything() {
        let mut tree = tree();
        let a = tree.new_leaf("a");
        let root = tree.new_with_children("root", &[a]).unwrap();
        tree.clear();
        assert_eq!(tree.total_node_count(), 0);
        assert!(!tree.contains(a));
        assert!(!tree.contains(root));

        let fresh = tree.new_leaf("fresh");
        assert!(tree.contains(fresh));
        assert!(!tree.contains(a) && !tree.contains(root));
    }

    #[test]
    fn context_access() {
        let mut tree = tree();
        let node = tree.new_leaf_with_context("text", 12);
        assert_eq!(tree.has_context(node), Ok(true));
        assert_eq!(tree.context(node), Ok(Some(&12)));
        if let Ok(Some(ctx)) = tree.context_mut(node) {
            *ctx = 14;
        }
        assert_eq!(tree.context(node), Ok(Some(&14)));
        tree.set_node_context(node, None).unwrap();
        assert_eq!(tree.context(node), Ok(None));
        assert_eq!(tree.has_context(node), Ok(false));

        let plain = tree.new_leaf("box");
        assert_eq!(tree.has_context(plain), Ok(false));
        tree.set_node_context(plain, Some(3)).unwrap();
        assert_eq!(tree.has_context(plain), Ok(true));
        tree.remove(plain).unwrap();
        assert_eq!(
            tree.has_context(plain),
            Err(LayoutError::InvalidInputNode {
                op: TreeOp::Context,
                node: plain,
            })
        );
    }

    #[test]
    fn listener_sees_removal() {
        let mut tree = tree();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        tree.set_layout_listener(move |node, layout| {
            log.borrow_mut().push((node, layout.is_some()));
        });
        let node = tree.new_leaf("leaf");
        tree.remove(node).unwrap();
        assert_eq!(*seen.borrow(), [(node, false)]);
    }

    #[test]
    fn config_controls_rounding() {
        let mut tree: LayoutTree<()> = LayoutTree::with_config(TreeConfig::unrounded().with_capacity(8));
        assert!(!tree.config().use_rounding);
        assert_eq!(tree.config().capacity, 8);
        tree.enable_rounding();
        assert!(tree.config().use_rounding);
        tree.disable_rounding();
        assert!(!tree.config().use_rounding);
        assert_eq!(TreeConfig::default(), TreeConfig::new());
    }
}
