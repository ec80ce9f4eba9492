// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout pass entry point and the orchestrator contract.
//!
//! The tree does not know how to size a box. A [`LayoutOrchestrator`]
//! (block, flex, grid, or any mix) walks the tree, consults and fills the
//! per-node sizing caches, and writes unrounded layouts back.
//! [`LayoutTree::compute_layout`] wraps one such walk into a *pass*:
//!
//! ```text
//!   compute_layout(root, space)
//!       │
//!       ├─► Compute: orchestrator.compute_root_layout()
//!       │       └─► compute_cached_layout() per node ─► cache_get / cache_store
//!       │                                            └─► set_unrounded_layout
//!       ├─► Round (if enabled): round_layout() ─► set_final_layout
//!       │
//!       └─► PassStats ─► last_pass_stats() / TraceSink::on_pass_summary
//! ```

use crate::error::{TreeOp, TreeResult};
use crate::geometry::{AvailableSpace, Axes};
use crate::layout::{LayoutOutput, SizingQuery};
use crate::round::round_layout;
use crate::trace::{PassBeginEvent, PassStats, PassSummary, PhaseBeginEvent, PhaseEndEvent, PhaseKind};
use crate::tree::{LayoutTree, NodeId};

/// Sizes and positions a subtree.
///
/// Implementations read styles and contexts from the tree, recurse into
/// children (typically through [`compute_cached_layout`]), and store each
/// node's result with [`LayoutTree::set_unrounded_layout`]. The root's own
/// location is left to the caller.
///
/// Any `FnMut(&mut LayoutTree<S, C>, NodeId, Axes<AvailableSpace>) ->
/// TreeResult<()>` closure is an orchestrator.
pub trait LayoutOrchestrator<S, C> {
    /// Lays out the subtree under `root` within `available_space`.
    ///
    /// # Errors
    ///
    /// Propagates tree errors raised while walking.
    fn compute_root_layout(
        &mut self,
        tree: &mut LayoutTree<S, C>,
        root: NodeId,
        available_space: Axes<AvailableSpace>,
    ) -> TreeResult<()>;
}

impl<S, C, F> LayoutOrchestrator<S, C> for F
where
    F: FnMut(&mut LayoutTree<S, C>, NodeId, Axes<AvailableSpace>) -> TreeResult<()>,
{
    fn compute_root_layout(
        &mut self,
        tree: &mut LayoutTree<S, C>,
        root: NodeId,
        available_space: Axes<AvailableSpace>,
    ) -> TreeResult<()> {
        self(tree, root, available_space)
    }
}

/// Returns the cached output of `node` for `query`, or runs `compute` and
/// caches its result.
///
/// # Errors
///
/// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode) if
/// `node` is not in the tree, or whatever `compute` returns.
pub fn compute_cached_layout<S, C, F>(
    tree: &mut LayoutTree<S, C>,
    node: NodeId,
    query: &SizingQuery,
    compute: F,
) -> TreeResult<LayoutOutput>
where
    F: FnOnce(&mut LayoutTree<S, C>, NodeId, &SizingQuery) -> TreeResult<LayoutOutput>,
{
    if let Some(output) = tree.cache_get(node, query)? {
        return Ok(output);
    }
    let output = compute(tree, node, query)?;
    tree.cache_store(node, query, output)?;
    Ok(output)
}

impl<S, C> LayoutTree<S, C> {
    /// Runs a layout pass over the subtree under `root`.
    ///
    /// The orchestrator computes unrounded layouts; if rounding is enabled
    /// the subtree is then snapped to whole pixels. Counters for the pass are
    /// available afterwards from [`last_pass_stats`](Self::last_pass_stats).
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode)
    /// if `root` is not in the tree, or the first error the orchestrator
    /// returns. A failed pass leaves `last_pass_stats` untouched.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_space: Axes<AvailableSpace>,
        orchestrator: &mut impl LayoutOrchestrator<S, C>,
    ) -> TreeResult<()> {
        self.require_node(TreeOp::ComputeLayout, root)?;
        let pass_index = self.pass_index;
        self.pass_index += 1;
        self.stats = PassStats::default();

        self.tracer.pass_begin(&PassBeginEvent {
            pass_index,
            root,
            available_space,
        });

        self.run_phase(pass_index, PhaseKind::Compute, |tree| {
            orchestrator.compute_root_layout(tree, root, available_space)
        })?;
        if self.config.use_rounding {
            self.run_phase(pass_index, PhaseKind::Round, |tree| round_layout(tree, root))?;
        }

        let stats = self.stats;
        self.last_pass = Some(stats);
        self.tracer.pass_summary(&PassSummary {
            pass_index,
            root,
            stats,
        });
        Ok(())
    }

    /// Returns the counters of the last successful pass.
    #[must_use]
    pub fn last_pass_stats(&self) -> Option<PassStats> {
        self.last_pass
    }

    fn run_phase(
        &mut self,
        pass_index: u64,
        phase: PhaseKind,
        f: impl FnOnce(&mut Self) -> TreeResult<()>,
    ) -> TreeResult<()> {
        self.tracer
            .phase_begin(&PhaseBeginEvent { pass_index, phase });
        let result = f(self);
        self.tracer.phase_end(&PhaseEndEvent { pass_index, phase });
        result
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Size};

    use super::*;
    use crate::error::LayoutError;
    use crate::layout::{Layout, RunMode};
    use crate::tree::TreeConfig;

    /// Stacks children vertically; leaves take the size stored as their
    /// context.
    #[derive(Default)]
    struct Stack {
        measured: Vec<NodeId>,
    }

    impl Stack {
        fn layout_node(
            &mut self,
            tree: &mut LayoutTree<(), Size>,
            node: NodeId,
            query: &SizingQuery,
        ) -> TreeResult<LayoutOutput> {
            compute_cached_layout(tree, node, query, |tree, node, query| {
                self.compute(tree, node, query)
            })
        }

        fn compute(
            &mut self,
            tree: &mut LayoutTree<(), Size>,
            node: NodeId,
            query: &SizingQuery,
        ) -> TreeResult<LayoutOutput> {
            if let Some(&size) = tree.context(node)? {
                self.measured.push(node);
                return Ok(LayoutOutput::from_outer_size(size));
            }
            let children = tree.children(node)?.to_vec();
            let child_query = SizingQuery {
                known_dimensions: Axes::NONE,
                ..*query
            };
            let mut y = 0.0;
            let mut width: f64 = 0.0;
            for (order, child) in (0_u32..).zip(children) {
                let output = self.layout_node(tree, child, &child_query)?;
                if query.run_mode == RunMode::PerformLayout {
                    let layout = Layout {
                        location: Point::new(0.0, y),
                        size: output.size,
                        ..Layout::with_order(order)
                    };
                    tree.set_unrounded_layout(child, &layout)?;
                }
                y += output.size.height;
                width = width.max(output.size.width);
            }
            Ok(LayoutOutput::from_outer_size(Size::new(width, y)))
        }
    }

    impl LayoutOrchestrator<(), Size> for Stack {
        fn compute_root_layout(
            &mut self,
            tree: &mut LayoutTree<(), Size>,
            root: NodeId,
            available_space: Axes<AvailableSpace>,
        ) -> TreeResult<()> {
            let query = SizingQuery::perform_layout(Axes::NONE, available_space);
            let output = self.layout_node(tree, root, &query)?;
            let layout = Layout {
                size: output.size,
                ..Layout::new()
            };
            tree.set_unrounded_layout(root, &layout)
        }
    }

    fn column(config: TreeConfig, heights: &[f64]) -> (LayoutTree<(), Size>, NodeId, Vec<NodeId>) {
        let mut tree = LayoutTree::with_config(config);
        let leaves: Vec<_> = heights
            .iter()
            .map(|&h| tree.new_leaf_with_context((), Size::new(20.0, h)))
            .collect();
        let root = tree.new_with_children((), &leaves).unwrap();
        (tree, root, leaves)
    }

    #[test]
    fn stacks_children() {
        let (mut tree, root, leaves) = column(TreeConfig::unrounded(), &[10.0, 15.0]);
        let mut stack = Stack::default();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();

        assert_eq!(tree.layout(root).map(|l| l.size), Some(Size::new(20.0, 25.0)));
        assert_eq!(tree.layout(leaves[1]).map(|l| l.location), Some(Point::new(0.0, 10.0)));
        assert_eq!(tree.layout(leaves[1]).map(|l| l.order), Some(1));
        assert_eq!(stack.measured, leaves);
    }

    #[test]
    fn clean_tree_is_served_from_cache() {
        let (mut tree, root, _) = column(TreeConfig::unrounded(), &[10.0, 15.0]);
        let mut stack = Stack::default();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();
        let first = tree.last_pass_stats().unwrap();
        assert_eq!(first.cache_misses, 3);
        assert_eq!(first.cache_stores, 3);

        stack.measured.clear();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();
        assert!(stack.measured.is_empty());
        let second = tree.last_pass_stats().unwrap();
        assert_eq!(second.cache_hits, 1, "the root query hits");
        assert_eq!(second.cache_misses, 0);
    }

    #[test]
    fn different_space_misses() {
        let (mut tree, root, _) = column(TreeConfig::unrounded(), &[10.0]);
        let mut stack = Stack::default();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();
        tree.compute_layout(root, Axes::MIN_CONTENT, &mut stack).unwrap();
        assert_eq!(tree.last_pass_stats().map(|s| s.cache_misses), Some(2));
    }

    #[test]
    fn only_dirty_chain_is_recomputed() {
        let (mut tree, root, leaves) = column(TreeConfig::unrounded(), &[10.0, 15.0, 5.0]);
        let mut stack = Stack::default();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();
        tree.drain_layout_changes(root).unwrap();

        stack.measured.clear();
        tree.set_node_context(leaves[0], Some(Size::new(30.0, 20.0)))
            .unwrap();
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut stack).unwrap();

        assert_eq!(stack.measured, [leaves[0]], "siblings were cached");
        assert_eq!(tree.layout(root).map(|l| l.size), Some(Size::new(30.0, 40.0)));
        assert_eq!(tree.layout(leaves[2]).map(|l| l.location.y), Some(35.0));
    }

    #[test]
    fn rounding_pass_runs_when_enabled() {
        let (mut tree, root, leaves) = column(TreeConfig::new(), &[10.3, 10.3, 10.4]);
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut Stack::default())
            .unwrap();

        let rounded: Vec<(f64, f64)> = leaves
            .iter()
            .filter_map(|&leaf| tree.layout(leaf))
            .map(|l| (l.location.y, l.size.height))
            .collect();
        assert_eq!(rounded, [(0.0, 10.0), (10.0, 11.0), (21.0, 10.0)]);
        assert_eq!(tree.unrounded_layout(leaves[1]).map(|l| l.location.y), Some(10.3));
        assert_eq!(tree.layout(root).map(|l| l.size.height), Some(31.0));
    }

    #[test]
    fn commits_follow_the_active_variant() {
        let (mut tree, root, leaves) = column(TreeConfig::new(), &[10.0, 10.0]);
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut Stack::default())
            .unwrap();
        assert_eq!(tree.last_pass_stats().map(|s| s.commits), Some(3));
        assert_eq!(tree.drain_layout_changes(root), Ok(vec![root, leaves[0], leaves[1]]));

        // Nothing changed, so the rounding pass commits nothing.
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut Stack::default())
            .unwrap();
        assert_eq!(tree.last_pass_stats().map(|s| s.commits), Some(0));
        assert_eq!(tree.drain_layout_changes(root), Ok(vec![]));
    }

    #[test]
    fn closures_are_orchestrators() {
        let mut tree: LayoutTree<()> = LayoutTree::with_config(TreeConfig::unrounded());
        let root = tree.new_leaf(());
        let mut fixed = |tree: &mut LayoutTree<()>, node: NodeId, _: Axes<AvailableSpace>| {
            let layout = Layout {
                size: Size::new(7.0, 7.0),
                ..Layout::new()
            };
            tree.set_unrounded_layout(node, &layout)
        };
        tree.compute_layout(root, Axes::MAX_CONTENT, &mut fixed).unwrap();
        assert_eq!(tree.layout(root).map(|l| l.size), Some(Size::new(7.0, 7.0)));
    }

    #[test]
    fn invalid_root_is_rejected() {
        let mut tree: LayoutTree<(), Size> = LayoutTree::new();
        let root = tree.new_leaf(());
        tree.remove(root).unwrap();
        assert_eq!(
            tree.compute_layout(root, Axes::MAX_CONTENT, &mut Stack::default()),
            Err(LayoutError::InvalidInputNode {
                op: TreeOp::ComputeLayout,
                node: root,
            })
        );
        assert_eq!(tree.last_pass_stats(), None);
    }

    #[test]
    fn orchestrator_errors_propagate() {
        let mut tree: LayoutTree<()> = LayoutTree::new();
        let root = tree.new_leaf(());
        let stale = tree.new_leaf(());
        tree.remove(stale).unwrap();
        let mut broken = |tree: &mut LayoutTree<()>, _: NodeId, _: Axes<AvailableSpace>| {
            tree.mark_dirty(stale)
        };
        let err = tree
            .compute_layout(root, Axes::MAX_CONTENT, &mut broken)
            .unwrap_err();
        assert_eq!(err.op(), TreeOp::MarkDirty);
        assert_eq!(tree.last_pass_stats(), None, "failed passes are not recorded");
    }
}
