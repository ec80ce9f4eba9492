// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel snapping of computed layouts.
//!
//! Rounding each box's position and size independently opens one-pixel gaps
//! (or overlaps) between neighbours whose fractional parts round in different
//! directions. Instead, every *edge* is rounded in absolute coordinates and
//! sizes are taken as differences of rounded edges, so two boxes that touch
//! before rounding still touch after it.
//!
//! [`compute_layout`](crate::tree::LayoutTree::compute_layout) runs
//! [`round_layout`] after the orchestrator whenever rounding is enabled.

use alloc::vec;

use kurbo::{Insets, Point, Size, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::error::{TreeOp, TreeResult};
use crate::layout::Layout;
use crate::tree::{LayoutTree, NodeId};

/// Snaps the unrounded layouts of the subtree under `root` and stores them as
/// final layouts.
///
/// Nodes whose rounded layout equals their stored final layout are left
/// alone, so only visible changes are committed.
///
/// # Errors
///
/// [`LayoutError::InvalidInputNode`](crate::LayoutError::InvalidInputNode) if
/// `root` is not in the tree.
pub fn round_layout<S, C>(tree: &mut LayoutTree<S, C>, root: NodeId) -> TreeResult<()> {
    tree.require_node(TreeOp::ComputeLayout, root)?;
    let mut stack = vec![(root, Vec2::ZERO)];
    while let Some((node, parent_origin)) = stack.pop() {
        let Some(unrounded) = tree.unrounded_layout(node).copied() else {
            continue;
        };
        let origin = parent_origin + unrounded.location.to_vec2();
        let rounded = round_box(&unrounded, origin);
        if tree.final_layout(node) != Some(&rounded) {
            tree.set_final_layout(node, &rounded)?;
        }
        if let Ok(children) = tree.children(node) {
            stack.extend(children.iter().rev().map(|&child| (child, origin)));
        }
    }
    Ok(())
}

/// Rounds one box whose border-box origin sits at `origin` in absolute
/// coordinates.
#[must_use]
pub fn round_box(unrounded: &Layout, origin: Vec2) -> Layout {
    let Layout {
        order,
        location,
        size,
        content_size,
        scrollbar_size,
        border,
        padding,
        margin,
    } = *unrounded;
    let (x, y) = (origin.x, origin.y);
    // Width of the span starting `from` units into the box and `len` long.
    let span_x = |from: f64, len: f64| (x + from + len).round() - (x + from).round();
    let span_y = |from: f64, len: f64| (y + from + len).round() - (y + from).round();

    Layout {
        order,
        location: Point::new(location.x.round(), location.y.round()),
        size: Size::new(span_x(0.0, size.width), span_y(0.0, size.height)),
        content_size: Size::new(
            span_x(0.0, content_size.width),
            span_y(0.0, content_size.height),
        ),
        scrollbar_size: Size::new(scrollbar_size.width.round(), scrollbar_size.height.round()),
        border: Insets {
            x0: span_x(0.0, border.x0),
            y0: span_y(0.0, border.y0),
            x1: span_x(size.width - border.x1, border.x1),
            y1: span_y(size.height - border.y1, border.y1),
        },
        padding: Insets {
            x0: span_x(border.x0, padding.x0),
            y0: span_y(border.y0, padding.y0),
            x1: span_x(size.width - border.x1 - padding.x1, padding.x1),
            y1: span_y(size.height - border.y1 - padding.y1, padding.y1),
        },
        margin: Insets {
            x0: margin.x0.round(),
            y0: margin.y0.round(),
            x1: margin.x1.round(),
            y1: margin.y1.round(),
        },
    }
}
