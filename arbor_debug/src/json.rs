// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a layout subtree.
//!
//! [`snapshot`] captures the active layout of every node under a root as a
//! nested [`serde_json::Value`], suitable for golden files or diffing two
//! passes. [`write_snapshot`] serializes it to a writer.

use std::io::{self, Write};

use kurbo::Insets;
use serde_json::{Value, json};

use arbor_core::error::TreeResult;
use arbor_core::tree::{LayoutTree, NodeId};

/// Captures the subtree under `root` as nested JSON objects.
///
/// Nodes that have never been laid out report a zero layout.
///
/// # Errors
///
/// [`LayoutError::InvalidInputNode`](arbor_core::LayoutError::InvalidInputNode)
/// if `root` is not in the tree.
pub fn snapshot<S, C>(tree: &LayoutTree<S, C>, root: NodeId) -> TreeResult<Value> {
    // Pre-order: (node object without children, index of its parent).
    let mut nodes: Vec<(Value, Option<usize>)> = Vec::new();
    let mut stack = vec![(root, None)];
    while let Some((node, parent)) = stack.pop() {
        let index = nodes.len();
        nodes.push((node_value(tree, node)?, parent));
        stack.extend(
            tree.children(node)?
                .iter()
                .rev()
                .map(|&child| (child, Some(index))),
        );
    }

    // Children come after their parent in pre-order, so popping from the end
    // completes every child before its parent. Siblings arrive last first.
    let mut children: Vec<Vec<Value>> = vec![Vec::new(); nodes.len()];
    let mut top = Vec::new();
    while let Some((mut value, parent)) = nodes.pop() {
        let mut own = std::mem::take(&mut children[nodes.len()]);
        own.reverse();
        value["children"] = Value::Array(own);
        match parent {
            Some(parent) => children[parent].push(value),
            None => top.push(value),
        }
    }
    Ok(top.pop().unwrap_or_default())
}

fn node_value<S, C>(tree: &LayoutTree<S, C>, node: NodeId) -> TreeResult<Value> {
    let version = tree.layout_version(node)?;
    let has_new_layout = tree.has_new_layout(node)?;
    let layout = tree.layout(node).copied().unwrap_or_default();
    Ok(json!({
        "id": format!("{node:?}"),
        "order": layout.order,
        "location": { "x": layout.location.x, "y": layout.location.y },
        "size": { "width": layout.size.width, "height": layout.size.height },
        "content_size": {
            "width": layout.content_size.width,
            "height": layout.content_size.height,
        },
        "border": insets(layout.border),
        "padding": insets(layout.padding),
        "margin": insets(layout.margin),
        "layout_version": version,
        "has_new_layout": has_new_layout,
    }))
}

/// Writes a pretty-printed [`snapshot`] of the subtree under `root`.
///
/// # Errors
///
/// Tree errors are reported as [`io::ErrorKind::Other`], alongside any error
/// from `writer`.
pub fn write_snapshot<S, C>(
    tree: &LayoutTree<S, C>,
    root: NodeId,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let value = snapshot(tree, root).map_err(io::Error::other)?;
    serde_json::to_writer_pretty(writer, &value)?;
    Ok(())
}

fn insets(insets: Insets) -> Value {
    json!({
        "left": insets.x0,
        "top": insets.y0,
        "right": insets.x1,
        "bottom": insets.y1,
    })
}
