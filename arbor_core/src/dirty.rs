// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change-log channel constants.
//!
//! Alongside the sizing caches (which decide what must be *recomputed*), the
//! tree keeps an input-side change log in an [`understory_dirty`] tracker so a
//! bridge to an external document can sync incrementally. Each channel is an
//! independent category of change, and every channel is local-only: marking
//! a node never marks its relatives.
//!
//! - [`STYLE`] — [`set_style`](crate::tree::LayoutTree::set_style) was called.
//! - [`CONTEXT`] — the measurement context was replaced.
//! - [`TOPOLOGY`] — a child list changed, or a node was created or removed.
//!
//! # Consumption
//!
//! [`LayoutTree::take_changes`](crate::tree::LayoutTree::take_changes) drains
//! all channels and surfaces the results as
//! [`TreeChanges`](crate::tree::TreeChanges).

use understory_dirty::Channel;

/// Style replaced.
pub const STYLE: Channel = Channel::new(0);

/// Measurement context replaced or removed.
pub const CONTEXT: Channel = Channel::new(1);

/// Child list changed, or the node was created or removed.
pub const TOPOLOGY: Channel = Channel::new(2);
