// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layout passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tree calls as a layout pass runs. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! A [`LayoutTree`](crate::tree::LayoutTree) owns a [`Tracer`], which wraps an
//! optional boxed sink installed with
//! [`set_trace_sink`](crate::tree::LayoutTree::set_trace_sink). When the
//! `trace` feature is **off**, every `Tracer` method compiles to nothing and
//! installed sinks are dropped. When **on**, each method performs a single
//! `Option` branch before dispatching.
//!
//! [`PassStats`] are counted regardless of features and are always available
//! from [`last_pass_stats`](crate::tree::LayoutTree::last_pass_stats).
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-node events
//!   ([`CacheLookupEvent`], [`DirtyPropagationEvent`], [`LayoutCommitEvent`])
//!   and the corresponding `TraceSink` methods.

use alloc::boxed::Box;

use crate::geometry::{AvailableSpace, Axes};
#[cfg(feature = "trace-rich")]
use crate::layout::RunMode;
use crate::tree::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a layout pass is being reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// The orchestrator sizing and positioning the tree.
    Compute,
    /// Snapping unrounded results to whole pixels.
    Round,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when [`compute_layout`](crate::tree::LayoutTree::compute_layout)
/// starts.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Root of the pass.
    pub root: NodeId,
    /// Space offered to the root.
    pub available_space: Axes<AvailableSpace>,
}

/// Marks the beginning of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Counters collected over one layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PassStats {
    /// Cache lookups that returned a memoized output.
    pub cache_hits: u32,
    /// Cache lookups that found nothing compatible.
    pub cache_misses: u32,
    /// Outputs written to node caches.
    pub cache_stores: u32,
    /// Active layout results committed.
    pub commits: u32,
}

impl PassStats {
    /// Fraction of lookups that hit, or `None` if there were no lookups.
    #[must_use]
    pub fn hit_rate(&self) -> Option<f64> {
        let lookups = self.cache_hits + self.cache_misses;
        (lookups > 0).then(|| f64::from(self.cache_hits) / f64::from(lookups))
    }
}

/// Emitted when a pass finishes.
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Root of the pass.
    pub root: NodeId,
    /// Counters for the pass.
    pub stats: PassStats,
}

/// A cache lookup on one node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CacheLookupEvent {
    /// The node whose cache was consulted.
    pub node: NodeId,
    /// The run mode of the query.
    pub run_mode: RunMode,
    /// Whether a compatible entry was found.
    pub hit: bool,
}

/// A dirty walk starting at one node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct DirtyPropagationEvent {
    /// The node that was marked dirty.
    pub node: NodeId,
    /// How many caches (the node's included) were cleared before the walk
    /// reached an already dirty node or the root.
    pub cleared: u32,
}

/// An active layout result was committed to a node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LayoutCommitEvent {
    /// The node whose layout changed.
    pub node: NodeId,
    /// The node's layout version after the commit.
    pub version: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tree.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layout pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a pass phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called with the counters of a finished pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called on every cache lookup (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_cache_lookup(&mut self, e: &CacheLookupEvent) {
        _ = e;
    }

    /// Called after every dirty walk (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_dirty_propagation(&mut self, e: &DirtyPropagationEvent) {
        _ = e;
    }

    /// Called on every active layout commit (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layout_commit(&mut self, e: &LayoutCommitEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional boxed [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Removes and returns the installed sink.
    #[inline]
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`CacheLookupEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn cache_lookup(&mut self, e: &CacheLookupEvent) {
        if let Some(s) = &mut self.sink {
            s.on_cache_lookup(e);
        }
    }

    /// Emits a [`DirtyPropagationEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn dirty_propagation(&mut self, e: &DirtyPropagationEvent) {
        if let Some(s) = &mut self.sink {
            s.on_dirty_propagation(e);
        }
    }

    /// Emits a [`LayoutCommitEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layout_commit(&mut self, e: &LayoutCommitEvent) {
        if let Some(s) = &mut self.sink {
            s.on_layout_commit(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
