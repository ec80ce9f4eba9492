// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tree data model.
//!
//! A *node* is a box in the layout tree. Each node has:
//!
//! - An identity ([`NodeId`]) — a generational handle that goes stale when the
//!   node is removed, so a handle can never reach a different node that later
//!   reuses the slot.
//! - Topology — an optional parent and an ordered child list. Attaching a node
//!   always detaches it from its previous parent, and attachments that would
//!   form a cycle are rejected.
//! - **Inputs** set by the caller: a [style](LayoutTree::set_style) `S` and an
//!   optional [measurement context](LayoutTree::set_node_context) `C`. The
//!   tree stores both without interpreting them.
//! - **Results** written by the orchestrator: an unrounded and a final
//!   [`Layout`](crate::layout::Layout), plus a sizing [`Cache`](crate::cache::Cache).
//!
//! # Incrementality
//!
//! Every input mutation [marks](LayoutTree::mark_dirty) the affected node
//! dirty, which empties its cache and those of its ancestors, so the next
//! pass recomputes exactly the invalidated chain. Committing a result bumps a
//! per-node layout version that consumers compare against their
//! acknowledged version to find what changed; see
//! [`LayoutTree::drain_layout_changes`].
//!
//! Separately, [`LayoutTree::take_changes`] reports which inputs changed, for
//! callers that mirror the tree elsewhere.

mod changes;
mod id;
mod invalidate;
mod node;
mod store;

pub use changes::TreeChanges;
pub use id::NodeId;
pub use store::{LayoutListener, LayoutTree, TreeConfig};
