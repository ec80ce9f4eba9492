// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text rendering of a layout subtree.
//!
//! ```text
//! root [x: 0 y: 0 w: 20 h: 25] v1 (NodeId(2@gen0))
//! ├── a [x: 0 y: 0 w: 20 h: 10] v1 (NodeId(0@gen0))
//! └── b [x: 0 y: 10 w: 20 h: 15] v1 dirty (NodeId(1@gen0))
//! ```
//!
//! Each line shows the label produced from the node's style, its active
//! layout, its layout version, and whether its cache is empty.

use std::fmt::Write;

use arbor_core::error::TreeResult;
use arbor_core::tree::{LayoutTree, NodeId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Branch {
    Root,
    Middle,
    Last,
}

/// Renders the subtree under `root` as an indented tree.
///
/// # Errors
///
/// [`LayoutError::InvalidInputNode`](arbor_core::LayoutError::InvalidInputNode)
/// if `root` is not in the tree.
pub fn print_tree<S, C>(
    tree: &LayoutTree<S, C>,
    root: NodeId,
    label: impl Fn(&S) -> String,
) -> TreeResult<String> {
    let mut out = String::new();
    write_tree(&mut out, tree, root, &label)?;
    Ok(out)
}

/// Like [`print_tree`], appending to an existing string.
///
/// # Errors
///
/// As [`print_tree`].
pub fn write_tree<S, C>(
    out: &mut String,
    tree: &LayoutTree<S, C>,
    root: NodeId,
    label: &dyn Fn(&S) -> String,
) -> TreeResult<()> {
    let mut stack = vec![(root, String::new(), Branch::Root)];
    while let Some((node, prefix, branch)) = stack.pop() {
        write_line(out, tree, node, &prefix, branch, label)?;

        let child_prefix = match branch {
            Branch::Root => String::new(),
            Branch::Middle => format!("{prefix}│   "),
            Branch::Last => format!("{prefix}    "),
        };
        let children = tree.children(node)?;
        let last = children.len().saturating_sub(1);
        stack.extend(children.iter().enumerate().rev().map(|(i, &child)| {
            let branch = if i == last { Branch::Last } else { Branch::Middle };
            (child, child_prefix.clone(), branch)
        }));
    }
    Ok(())
}

fn write_line<S, C>(
    out: &mut String,
    tree: &LayoutTree<S, C>,
    node: NodeId,
    prefix: &str,
    branch: Branch,
    label: &dyn Fn(&S) -> String,
) -> TreeResult<()> {
    let name = label(tree.style(node)?);
    let version = tree.layout_version(node)?;
    let layout = tree.layout(node).copied().unwrap_or_default();
    let connector = match branch {
        Branch::Root => "",
        Branch::Middle => "├── ",
        Branch::Last => "└── ",
    };
    let dirty = if tree.is_dirty(node) { " dirty" } else { "" };
    // Writing into a `String` cannot fail.
    let _ = writeln!(
        out,
        "{prefix}{connector}{name} [x: {} y: {} w: {} h: {}] v{version}{dirty} ({node:?})",
        layout.location.x, layout.location.y, layout.size.width, layout.size.height,
    );
    Ok(())
}
