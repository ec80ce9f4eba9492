// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental layout tree substrate.
//!
//! `arbor_core` stores a tree of styled boxes and everything a layout engine
//! needs to recompute it cheaply after a mutation: per-node sizing caches,
//! dirty propagation, and a version protocol that tells consumers what
//! changed. It is `no_std` compatible (with `alloc`) and does not size boxes
//! itself; block, flex or grid algorithms plug in as orchestrators.
//!
//! # Architecture
//!
//! ```text
//!   Caller mutations (add_child, set_style, ...)
//!       │
//!       ▼
//!   LayoutTree ──► mark_dirty() ──► caches cleared up the ancestor chain
//!       │
//!       ▼
//!   compute_layout(root) ──► LayoutOrchestrator ──► cache_get / cache_store
//!       │                                         └─► set_unrounded_layout
//!       ├─► round_layout() ──► set_final_layout ──► version bump + listener
//!       │
//!       ▼
//!   drain_layout_changes(root) ──► nodes with new layouts (acknowledged)
//! ```
//!
//! **[`tree`]** — Slot arena with generational [`NodeId`] handles, the
//! mutation API, dirty invalidation, the layout version/acknowledgment
//! protocol, and the input change log.
//!
//! **[`cache`]** — Per-node memoization of sizing results keyed on
//! [`SizingQuery`].
//!
//! **[`compute`]** — The [`LayoutOrchestrator`] contract and the
//! [`compute_layout`](LayoutTree::compute_layout) pass entry point.
//!
//! **[`round`]** — Cumulative pixel snapping of computed layouts.
//!
//! **[`layout`]** — Committed [`Layout`] results and per-query
//! [`LayoutOutput`]s.
//!
//! **[`geometry`]** — Axis pairs and [`AvailableSpace`].
//!
//! **[`margin`]** — [`CollapsibleMarginSet`] for CSS margin collapsing.
//!
//! **[`grid`]** — [`TrackCounts`] and grid line coordinate systems.
//!
//! **[`dirty`]** — Change-log channels via `understory_dirty`.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   cache, dirty and commit events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod compute;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod margin;
pub mod round;
pub mod trace;
pub mod tree;

pub use cache::{Cache, ClearState};
pub use compute::{LayoutOrchestrator, compute_cached_layout};
pub use error::{LayoutError, TreeOp, TreeResult};
pub use geometry::{AbsoluteAxis, AvailableSpace, Axes};
pub use grid::{GridLine, OriginZeroLine, TrackCounts};
pub use layout::{Layout, LayoutOutput, RunMode, SizingQuery};
pub use margin::CollapsibleMarginSet;
pub use tree::{LayoutTree, NodeId, TreeChanges, TreeConfig};
