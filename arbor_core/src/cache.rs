// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node memoization of sizing results.
//!
//! A layout algorithm typically sizes a child several times per pass (once
//! for its min-content contribution, once for max-content, once for real).
//! [`Cache`] remembers the [`LayoutOutput`] of each distinct kind of query so
//! repeat queries within and across passes are free until the node is
//! [marked dirty](crate::tree::LayoutTree::mark_dirty).
//!
//! # Slots
//!
//! Entries live in a fixed set of slots, one per query *class*:
//!
//! | Slot  | Run mode        | Known axes | Free-axis available space       |
//! |-------|-----------------|------------|---------------------------------|
//! | final | `PerformLayout` | any        | any                             |
//! | 0     | `ComputeSize`   | both       | —                               |
//! | 1–2   | `ComputeSize`   | width      | height min-content or not       |
//! | 3–4   | `ComputeSize`   | height     | width min-content or not        |
//! | 5–8   | `ComputeSize`   | neither    | each axis min-content or not    |
//!
//! Storing overwrites the slot of the query's class.
//!
//! # Matching
//!
//! A lookup hits only when the stored known dimensions equal the requested
//! ones exactly and, on every axis without a known dimension, the stored
//! available space is the same constraint as the requested one. A result
//! computed under one constraint is not assumed valid under another.
//!
//! The one widening allowed is explicit: an entry stored with
//! [`store_with_independence`](Cache::store_with_independence) may declare
//! that its output does not depend on the available space along an axis, in
//! which case that axis' available space is ignored when matching.

use crate::geometry::{AvailableSpace, Axes};
use crate::layout::{LayoutOutput, RunMode, SizingQuery};

/// Number of size-only slots.
const MEASURE_SLOTS: usize = 9;

/// Whether [`Cache::clear`] removed anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClearState {
    /// At least one entry was discarded.
    Cleared,
    /// The cache held no entries.
    AlreadyEmpty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CacheEntry {
    known_dimensions: Axes<Option<f64>>,
    available_space: Axes<AvailableSpace>,
    space_independent: Axes<bool>,
    output: LayoutOutput,
}

impl CacheEntry {
    fn matches(&self, query: &SizingQuery) -> bool {
        axis_matches(
            self.known_dimensions.width,
            query.known_dimensions.width,
            self.available_space.width,
            query.available_space.width,
            self.space_independent.width,
        ) && axis_matches(
            self.known_dimensions.height,
            query.known_dimensions.height,
            self.available_space.height,
            query.available_space.height,
            self.space_independent.height,
        )
    }
}

fn axis_matches(
    stored_known: Option<f64>,
    requested_known: Option<f64>,
    stored_space: AvailableSpace,
    requested_space: AvailableSpace,
    space_independent: bool,
) -> bool {
    match (stored_known, requested_known) {
        (Some(a), Some(b)) => a.to_bits() == b.to_bits() && !a.is_nan(),
        (None, None) => space_independent || stored_space.is_same_constraint(requested_space),
        _ => false,
    }
}

/// Memoized sizing results for one node.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    final_layout_entry: Option<CacheEntry>,
    measure_entries: [Option<CacheEntry>; MEASURE_SLOTS],
}

impl Cache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            final_layout_entry: None,
            measure_entries: [None; MEASURE_SLOTS],
        }
    }

    /// Returns the memoized output for `query`, if a compatible entry exists.
    #[must_use]
    pub fn get(&self, query: &SizingQuery) -> Option<LayoutOutput> {
        match query.run_mode {
            RunMode::PerformLayout => self
                .final_layout_entry
                .as_ref()
                .filter(|entry| entry.matches(query))
                .map(|entry| entry.output),
            RunMode::ComputeSize => self
                .measure_entries
                .iter()
                .flatten()
                .find(|entry| entry.matches(query))
                .map(|entry| entry.output),
        }
    }

    /// Stores `output` as the result of `query`.
    pub fn store(&mut self, query: &SizingQuery, output: LayoutOutput) {
        self.store_with_independence(query, output, Axes::splat(false));
    }

    /// Stores `output`, declaring per axis whether it is independent of the
    /// available space.
    ///
    /// Only pass `true` for an axis when the node's result provably does not
    /// react to available space along it (for example a fixed-size leaf).
    pub fn store_with_independence(
        &mut self,
        query: &SizingQuery,
        output: LayoutOutput,
        space_independent: Axes<bool>,
    ) {
        let entry = Some(CacheEntry {
            known_dimensions: query.known_dimensions,
            available_space: query.available_space,
            space_independent,
            output,
        });
        match query.run_mode {
            RunMode::PerformLayout => self.final_layout_entry = entry,
            RunMode::ComputeSize => {
                let slot = slot_index(query.known_dimensions, query.available_space);
                self.measure_entries[slot] = entry;
            }
        }
    }

    /// Returns `true` if no entry is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.final_layout_entry.is_none() && self.measure_entries.iter().all(Option::is_none)
    }

    /// Discards every entry.
    pub fn clear(&mut self) -> ClearState {
        if self.is_empty() {
            return ClearState::AlreadyEmpty;
        }
        self.final_layout_entry = None;
        self.measure_entries = [None; MEASURE_SLOTS];
        ClearState::Cleared
    }
}

/// Maps a size-only query to its slot.
fn slot_index(known: Axes<Option<f64>>, space: Axes<AvailableSpace>) -> usize {
    let min_width = usize::from(space.width == AvailableSpace::MinContent);
    let min_height = usize::from(space.height == AvailableSpace::MinContent);
    match (known.width.is_some(), known.height.is_some()) {
        (true, true) => 0,
        (true, false) => 1 + min_height,
        (false, true) => 3 + min_width,
        (false, false) => 5 + min_width + 2 * min_height,
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;

    fn output(w: f64, h: f64) -> LayoutOutput {
        LayoutOutput::from_outer_size(Size::new(w, h))
    }

    fn probe(width: AvailableSpace, height: AvailableSpace) -> SizingQuery {
        SizingQuery::compute_size(Axes::NONE, Axes::new(width, height))
    }

    #[test]
    fn store_then_get_round_trips() {
        let mut cache = Cache::new();
        let query = probe(AvailableSpace::Definite(100.0), AvailableSpace::MaxContent);
        cache.store(&query, output(40.0, 10.0));
        assert_eq!(cache.get(&query), Some(output(40.0, 10.0)));
    }

    #[test]
    fn unstored_or_mismatched_queries_miss() {
        let mut cache = Cache::new();
        let query = probe(AvailableSpace::Definite(100.0), AvailableSpace::MaxContent);
        assert_eq!(cache.get(&query), None);

        cache.store(&query, output(40.0, 10.0));
        let narrower = probe(AvailableSpace::Definite(80.0), AvailableSpace::MaxContent);
        assert_eq!(cache.get(&narrower), None, "definite space must match exactly");

        let known = SizingQuery::compute_size(Axes::new(Some(40.0), None), query.available_space);
        assert_eq!(cache.get(&known), None, "known dimensions must match");

        let layout = SizingQuery { run_mode: RunMode::PerformLayout, ..query };
        assert_eq!(cache.get(&layout), None, "run modes are cached separately");
    }

    #[test]
    fn available_space_ignored_on_known_axes() {
        let mut cache = Cache::new();
        let known = Axes::new(Some(50.0), Some(20.0));
        cache.store(
            &SizingQuery::compute_size(known, Axes::MAX_CONTENT),
            output(50.0, 20.0),
        );
        let other_space = SizingQuery::compute_size(known, Axes::MIN_CONTENT);
        assert_eq!(cache.get(&other_space), Some(output(50.0, 20.0)));
    }

    #[test]
    fn distinct_classes_coexist() {
        let mut cache = Cache::new();
        let min = probe(AvailableSpace::MinContent, AvailableSpace::MaxContent);
        let max = probe(AvailableSpace::MaxContent, AvailableSpace::MaxContent);
        cache.store(&min, output(10.0, 30.0));
        cache.store(&max, output(60.0, 10.0));
        assert_eq!(cache.get(&min), Some(output(10.0, 30.0)));
        assert_eq!(cache.get(&max), Some(output(60.0, 10.0)));
    }

    #[test]
    fn same_class_overwrites() {
        let mut cache = Cache::new();
        let first = probe(AvailableSpace::Definite(100.0), AvailableSpace::MaxContent);
        let second = probe(AvailableSpace::Definite(200.0), AvailableSpace::MaxContent);
        cache.store(&first, output(100.0, 20.0));
        cache.store(&second, output(200.0, 10.0));
        assert_eq!(cache.get(&first), None, "slot was reused");
        assert_eq!(cache.get(&second), Some(output(200.0, 10.0)));
    }

    #[test]
    fn perform_layout_has_single_slot() {
        let mut cache = Cache::new();
        let a = SizingQuery::perform_layout(Axes::NONE, Axes::MAX_CONTENT);
        let b = SizingQuery::perform_layout(Axes::new(Some(10.0), None), Axes::MAX_CONTENT);
        cache.store(&a, output(1.0, 1.0));
        cache.store(&b, output(10.0, 1.0));
        assert_eq!(cache.get(&a), None);
        assert_eq!(cache.get(&b), Some(output(10.0, 1.0)));
    }

    #[test]
    fn independence_widens_only_flagged_axis() {
        let mut cache = Cache::new();
        let stored = probe(AvailableSpace::Definite(100.0), AvailableSpace::Definite(100.0));
        cache.store_with_independence(&stored, output(30.0, 30.0), Axes::new(true, false));

        let other_width = probe(AvailableSpace::Definite(10.0), AvailableSpace::Definite(100.0));
        assert_eq!(cache.get(&other_width), Some(output(30.0, 30.0)));

        let other_height = probe(AvailableSpace::Definite(100.0), AvailableSpace::Definite(10.0));
        assert_eq!(cache.get(&other_height), None);
    }

    #[test]
    fn clear_reports_prior_state() {
        let mut cache = Cache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.clear(), ClearState::AlreadyEmpty);

        cache.store(&probe(AvailableSpace::MinContent, AvailableSpace::MinContent), output(1.0, 1.0));
        assert!(!cache.is_empty());
        assert_eq!(cache.clear(), ClearState::Cleared);
        assert!(cache.is_empty());
        assert_eq!(cache.clear(), ClearState::AlreadyEmpty);
    }

    #[test]
    fn slot_classes_are_distinct() {
        use AvailableSpace::{Definite, MaxContent, MinContent};
        let free = Axes::NONE;
        assert_eq!(slot_index(free, Axes::new(Definite(1.0), MaxContent)), 5);
        assert_eq!(slot_index(free, Axes::new(MinContent, MaxContent)), 6);
        assert_eq!(slot_index(free, Axes::new(MaxContent, MinContent)), 7);
        assert_eq!(slot_index(free, Axes::new(MinContent, MinContent)), 8);
        assert_eq!(slot_index(Axes::new(Some(1.0), None), Axes::new(MaxContent, MinContent)), 2);
        assert_eq!(slot_index(Axes::new(None, Some(1.0)), Axes::new(MinContent, MaxContent)), 4);
    }
}
