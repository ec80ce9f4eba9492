// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use arbor_core::geometry::{AvailableSpace, Axes};
use arbor_core::trace::{
    CacheLookupEvent, DirtyPropagationEvent, LayoutCommitEvent, PassBeginEvent, PassSummary,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Compute => "compute",
        PhaseKind::Round => "round",
    }
}

fn space(space: AvailableSpace) -> String {
    match space {
        AvailableSpace::Definite(value) => format!("{value}"),
        AvailableSpace::MinContent => "min-content".into(),
        AvailableSpace::MaxContent => "max-content".into(),
    }
}

fn space_pair(axes: Axes<AvailableSpace>) -> String {
    format!("{}×{}", space(axes.width), space(axes.height))
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} root={:?} space={}",
            e.pass_index,
            e.root,
            space_pair(e.available_space),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] pass={} {}",
            e.pass_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] pass={} {}",
            e.pass_index,
            phase_name(e.phase),
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let hit_rate = s
            .stats
            .hit_rate()
            .map_or_else(|| "-".to_owned(), |rate| format!("{:.0}%", rate * 100.0));
        let _ = writeln!(
            self.writer,
            "[summary] pass={} root={:?} hits={} misses={} ({hit_rate}) stores={} commits={}",
            s.pass_index,
            s.root,
            s.stats.cache_hits,
            s.stats.cache_misses,
            s.stats.cache_stores,
            s.stats.commits,
        );
    }

    fn on_cache_lookup(&mut self, e: &CacheLookupEvent) {
        let outcome = if e.hit { "hit" } else { "miss" };
        let _ = writeln!(
            self.writer,
            "[cache] {:?} {:?} {outcome}",
            e.node, e.run_mode,
        );
    }

    fn on_dirty_propagation(&mut self, e: &DirtyPropagationEvent) {
        let _ = writeln!(self.writer, "[dirty] {:?} cleared={}", e.node, e.cleared);
    }

    fn on_layout_commit(&mut self, e: &LayoutCommitEvent) {
        let _ = writeln!(self.writer, "[commit] {:?} version={}", e.node, e.version);
    }
}
