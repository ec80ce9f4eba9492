// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by [`LayoutTree`](crate::tree::LayoutTree) operations.
//!
//! Every error is a precondition violation by the caller (a stale handle or an
//! out-of-range index). The tree never recovers from them internally; they are
//! returned to the immediate caller with enough context to explain what went
//! wrong.

use core::fmt;

use crate::tree::NodeId;

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, LayoutError>;

/// The tree operation that raised an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeOp {
    /// `new_with_children`
    NewWithChildren,
    /// `add_child`
    AddChild,
    /// `insert_child_at_index`
    InsertChildAtIndex,
    /// `set_children`
    SetChildren,
    /// `remove_child`
    RemoveChild,
    /// `remove_child_at_index`
    RemoveChildAtIndex,
    /// `replace_child_at_index`
    ReplaceChildAtIndex,
    /// `child_at_index`
    ChildAtIndex,
    /// `child_count`
    ChildCount,
    /// `children`
    Children,
    /// `remove`
    Remove,
    /// `style`
    Style,
    /// `set_style`
    SetStyle,
    /// `context`
    Context,
    /// `set_node_context`
    SetNodeContext,
    /// `mark_dirty`
    MarkDirty,
    /// `set_layout`
    SetLayout,
    /// `layout_version`
    LayoutVersion,
    /// `acknowledge`
    Acknowledge,
    /// `cache`
    Cache,
    /// `compute_layout`
    ComputeLayout,
}

impl TreeOp {
    /// Returns the method name the operation corresponds to.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewWithChildren => "new_with_children",
            Self::AddChild => "add_child",
            Self::InsertChildAtIndex => "insert_child_at_index",
            Self::SetChildren => "set_children",
            Self::RemoveChild => "remove_child",
            Self::RemoveChildAtIndex => "remove_child_at_index",
            Self::ReplaceChildAtIndex => "replace_child_at_index",
            Self::ChildAtIndex => "child_at_index",
            Self::ChildCount => "child_count",
            Self::Children => "children",
            Self::Remove => "remove",
            Self::Style => "style",
            Self::SetStyle => "set_style",
            Self::Context => "context",
            Self::SetNodeContext => "set_node_context",
            Self::MarkDirty => "mark_dirty",
            Self::SetLayout => "set_layout",
            Self::LayoutVersion => "layout_version",
            Self::Acknowledge => "acknowledge",
            Self::Cache => "cache",
            Self::ComputeLayout => "compute_layout",
        }
    }
}

impl fmt::Display for TreeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A misuse of the tree API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A child index was past the end of the parent's child list.
    ChildIndexOutOfBounds {
        /// The failing operation.
        op: TreeOp,
        /// The parent whose children were indexed.
        parent: NodeId,
        /// The index that was requested.
        child_index: usize,
        /// The number of children the parent had.
        child_count: usize,
    },
    /// The parent handle does not refer to a live node.
    InvalidParentNode {
        /// The failing operation.
        op: TreeOp,
        /// The stale or unknown handle.
        parent: NodeId,
    },
    /// The child handle does not refer to a live node, or attaching it would
    /// create a cycle.
    InvalidChildNode {
        /// The failing operation.
        op: TreeOp,
        /// The rejected handle.
        child: NodeId,
    },
    /// A node handle does not refer to a live node.
    InvalidInputNode {
        /// The failing operation.
        op: TreeOp,
        /// The stale or unknown handle.
        node: NodeId,
    },
}

impl LayoutError {
    /// Returns the operation that failed.
    #[must_use]
    pub const fn op(&self) -> TreeOp {
        match *self {
            Self::ChildIndexOutOfBounds { op, .. }
            | Self::InvalidParentNode { op, .. }
            | Self::InvalidChildNode { op, .. }
            | Self::InvalidInputNode { op, .. } => op,
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChildIndexOutOfBounds {
                op,
                parent,
                child_index,
                child_count,
            } => write!(
                f,
                "{op}: index {child_index} is out of bounds for {parent:?} with {child_count} children"
            ),
            Self::InvalidParentNode { op, parent } => {
                write!(f, "{op}: parent {parent:?} is not in the tree")
            }
            Self::InvalidChildNode { op, child } => {
                write!(f, "{op}: child {child:?} is not in the tree or cannot be attached there")
            }
            Self::InvalidInputNode { op, node } => {
                write!(f, "{op}: node {node:?} is not in the tree")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn out_of_bounds_message_carries_context() {
        let err = LayoutError::ChildIndexOutOfBounds {
            op: TreeOp::InsertChildAtIndex,
            parent: NodeId::from_raw_parts(3, 1),
            child_index: 7,
            child_count: 2,
        };
        let message = err.to_string();
        assert!(message.starts_with("insert_child_at_index:"), "got: {message}");
        assert!(message.contains("index 7"), "got: {message}");
        assert!(message.contains("2 children"), "got: {message}");
        assert_eq!(err.op(), TreeOp::InsertChildAtIndex);
    }

    #[test]
    fn invalid_node_messages_name_the_node() {
        let node = NodeId::from_raw_parts(9, 0);
        let err = LayoutError::InvalidInputNode {
            op: TreeOp::Style,
            node,
        };
        assert_eq!(err.to_string(), "style: node NodeId(9@gen0) is not in the tree");
    }
}
