// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid track counts and line coordinate systems.
//!
//! Three coordinate systems describe positions along one grid axis:
//!
//! - [`GridLine`] — the 1-based line numbers authors write. Negative numbers
//!   count backwards from the end of the explicit grid; zero is invalid.
//! - [`OriginZeroLine`] — signed, 0 at the start of the explicit grid. Lines
//!   before the explicit grid (implicit tracks created by placement) are
//!   negative. Arithmetic is simplest here.
//! - Track indices — dense and non-negative, for indexing track storage.
//!
//! [`TrackCounts`] converts between the last two. All conversions are plain
//! affine maps in wrapping `i16` arithmetic; range checking is up to the grid
//! placement code.

use core::ops::Range;

/// A CSS-facing grid line number (1-based, negative from the end).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridLine(pub i16);

/// A grid line in engine coordinates, 0 at the start of the explicit grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OriginZeroLine(pub i16);

impl GridLine {
    /// Converts to an [`OriginZeroLine`] given the number of explicit tracks.
    ///
    /// Returns `None` for line 0, which does not name a line.
    #[must_use]
    pub const fn into_origin_zero_line(self, explicit_track_count: u16) -> Option<OriginZeroLine> {
        let explicit_line_count = (explicit_track_count as i16).wrapping_add(1);
        if self.0 > 0 {
            Some(OriginZeroLine(self.0 - 1))
        } else if self.0 < 0 {
            Some(OriginZeroLine(self.0.wrapping_add(explicit_line_count)))
        } else {
            None
        }
    }
}

impl OriginZeroLine {
    /// Converts to a positive [`GridLine`] given the number of explicit tracks.
    ///
    /// Lines before the explicit grid have no positive spelling and are
    /// expressed as negative lines instead.
    #[must_use]
    pub const fn into_grid_line(self, explicit_track_count: u16) -> GridLine {
        if self.0 >= 0 {
            GridLine(self.0.wrapping_add(1))
        } else {
            GridLine(self.0.wrapping_sub((explicit_track_count as i16).wrapping_add(1)))
        }
    }

    /// Returns the line `offset` tracks after this one.
    #[inline]
    #[must_use]
    pub const fn offset(self, offset: i16) -> Self {
        Self(self.0.wrapping_add(offset))
    }
}

/// Track structure of one grid axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrackCounts {
    /// Implicit tracks before the explicit grid.
    pub negative_implicit: u16,
    /// Tracks of the explicit grid.
    pub explicit: u16,
    /// Implicit tracks after the explicit grid.
    pub positive_implicit: u16,
}

impl TrackCounts {
    /// Creates track counts from the three regions.
    #[inline]
    #[must_use]
    pub const fn from_raw(negative_implicit: u16, explicit: u16, positive_implicit: u16) -> Self {
        Self {
            negative_implicit,
            explicit,
            positive_implicit,
        }
    }

    /// Total number of tracks.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.negative_implicit as usize + self.explicit as usize + self.positive_implicit as usize
    }

    /// Returns `true` if the axis has no tracks at all.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first line of the grid, before any negative implicit tracks.
    #[inline]
    #[must_use]
    pub const fn implicit_start_line(&self) -> OriginZeroLine {
        OriginZeroLine((self.negative_implicit as i16).wrapping_neg())
    }

    /// The last line of the grid, after any positive implicit tracks.
    #[inline]
    #[must_use]
    pub const fn implicit_end_line(&self) -> OriginZeroLine {
        OriginZeroLine((self.explicit as i16).wrapping_add(self.positive_implicit as i16))
    }

    /// Alias of [`implicit_end_line`](Self::implicit_end_line) for callers
    /// reasoning about the positive implicit region.
    #[inline]
    #[must_use]
    pub const fn positive_implicit_end_line(&self) -> OriginZeroLine {
        self.implicit_end_line()
    }

    /// The first line of the explicit grid (always 0).
    #[inline]
    #[must_use]
    pub const fn explicit_start_line(&self) -> OriginZeroLine {
        OriginZeroLine(0)
    }

    /// The last line of the explicit grid.
    #[inline]
    #[must_use]
    pub const fn explicit_end_line(&self) -> OriginZeroLine {
        OriginZeroLine(self.explicit as i16)
    }

    /// Index of the track immediately after `line`.
    #[inline]
    #[must_use]
    pub const fn oz_line_to_next_track(&self, line: OriginZeroLine) -> i16 {
        line.0.wrapping_add(self.negative_implicit as i16)
    }

    /// The line immediately before track `index` (inverse of
    /// [`oz_line_to_next_track`](Self::oz_line_to_next_track)).
    #[inline]
    #[must_use]
    pub const fn track_to_oz_line(&self, index: i16) -> OriginZeroLine {
        OriginZeroLine(index.wrapping_sub(self.negative_implicit as i16))
    }

    /// Track indices covered by the span between two lines.
    #[inline]
    #[must_use]
    pub fn oz_line_range_to_track_range(&self, lines: Range<OriginZeroLine>) -> Range<i16> {
        self.oz_line_to_next_track(lines.start)..self.oz_line_to_next_track(lines.end)
    }
}
