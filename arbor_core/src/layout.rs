// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout results and sizing queries.
//!
//! Two result types flow through the engine:
//!
//! - [`LayoutOutput`] is what a sizing pass returns for one node under one
//!   [`SizingQuery`]. It is what the [sizing cache](crate::cache) memoizes.
//! - [`Layout`] is the committed, positioned box stored on each node and read
//!   by consumers.

use kurbo::{Insets, Point, Size};

use crate::geometry::{AvailableSpace, Axes};
use crate::margin::CollapsibleMarginSet;

/// Whether a sizing pass must produce full geometry or only a size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Compute the node's size and position all of its descendants.
    #[default]
    PerformLayout,
    /// Compute the node's size only. Descendant layouts are not committed.
    ComputeSize,
}

/// The key of a sizing computation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizingQuery {
    /// Axis sizes already fixed by the caller. `None` axes must be measured.
    pub known_dimensions: Axes<Option<f64>>,
    /// The space offered to the node on each axis.
    pub available_space: Axes<AvailableSpace>,
    /// Full layout or size probe.
    pub run_mode: RunMode,
}

impl SizingQuery {
    /// A full layout query.
    #[must_use]
    pub const fn perform_layout(
        known_dimensions: Axes<Option<f64>>,
        available_space: Axes<AvailableSpace>,
    ) -> Self {
        Self {
            known_dimensions,
            available_space,
            run_mode: RunMode::PerformLayout,
        }
    }

    /// A size-only query.
    #[must_use]
    pub const fn compute_size(
        known_dimensions: Axes<Option<f64>>,
        available_space: Axes<AvailableSpace>,
    ) -> Self {
        Self {
            known_dimensions,
            available_space,
            run_mode: RunMode::ComputeSize,
        }
    }
}

/// The result of sizing one node under one [`SizingQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOutput {
    /// Border-box size of the node.
    pub size: Size,
    /// Size of the node's content, which may overflow `size`.
    pub content_size: Size,
    /// Offset of the first baseline on each axis, if the node has one.
    pub first_baselines: Axes<Option<f64>>,
    /// Margins that collapse with the node's top edge.
    pub top_margin: CollapsibleMarginSet,
    /// Margins that collapse with the node's bottom edge.
    pub bottom_margin: CollapsibleMarginSet,
    /// Whether the node is empty enough for its top and bottom margins to
    /// collapse through it.
    pub margins_can_collapse_through: bool,
}

impl Default for LayoutOutput {
    fn default() -> Self {
        Self::HIDDEN
    }
}

impl LayoutOutput {
    /// A node that takes no space and has no baseline.
    pub const HIDDEN: Self = Self {
        size: Size::ZERO,
        content_size: Size::ZERO,
        first_baselines: Axes::NONE,
        top_margin: CollapsibleMarginSet::ZERO,
        bottom_margin: CollapsibleMarginSet::ZERO,
        margins_can_collapse_through: false,
    };

    /// An output with the given border-box size and nothing else.
    #[must_use]
    pub const fn from_outer_size(size: Size) -> Self {
        Self::from_sizes_and_baselines(size, Size::ZERO, Axes::NONE)
    }

    /// An output with a border-box size and a content size.
    #[must_use]
    pub const fn from_sizes(size: Size, content_size: Size) -> Self {
        Self::from_sizes_and_baselines(size, content_size, Axes::NONE)
    }

    /// An output with sizes and first baselines.
    #[must_use]
    pub const fn from_sizes_and_baselines(
        size: Size,
        content_size: Size,
        first_baselines: Axes<Option<f64>>,
    ) -> Self {
        Self {
            size,
            content_size,
            first_baselines,
            top_margin: CollapsibleMarginSet::ZERO,
            bottom_margin: CollapsibleMarginSet::ZERO,
            margins_can_collapse_through: false,
        }
    }
}

/// The committed geometry of one node.
///
/// `location` is relative to the parent's border box. Derived quantities
/// (content box, scroll extents) are computed on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    /// Paint order relative to siblings.
    pub order: u32,
    /// Top-left corner of the border box.
    pub location: Point,
    /// Border-box size.
    pub size: Size,
    /// Size of the content, which may overflow `size`.
    pub content_size: Size,
    /// Space reserved for scrollbars.
    pub scrollbar_size: Size,
    /// Border widths.
    pub border: Insets,
    /// Padding widths.
    pub padding: Insets,
    /// Resolved margins.
    pub margin: Insets,
}

impl Layout {
    /// A layout with all fields zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_order(0)
    }

    /// A zero layout with the given paint order.
    #[must_use]
    pub const fn with_order(order: u32) -> Self {
        Self {
            order,
            location: Point::ORIGIN,
            size: Size::ZERO,
            content_size: Size::ZERO,
            scrollbar_size: Size::ZERO,
            border: Insets::ZERO,
            padding: Insets::ZERO,
            margin: Insets::ZERO,
        }
    }

    /// Horizontal offset of the content box from the border box.
    #[inline]
    #[must_use]
    pub fn content_box_x(&self) -> f64 {
        self.padding.x0 + self.border.x0
    }

    /// Vertical offset of the content box from the border box.
    #[inline]
    #[must_use]
    pub fn content_box_y(&self) -> f64 {
        self.padding.y0 + self.border.y0
    }

    /// Width of the content box.
    #[inline]
    #[must_use]
    pub fn content_box_width(&self) -> f64 {
        self.size.width - self.padding.x0 - self.padding.x1 - self.border.x0 - self.border.x1
    }

    /// Height of the content box.
    #[inline]
    #[must_use]
    pub fn content_box_height(&self) -> f64 {
        self.size.height - self.padding.y0 - self.padding.y1 - self.border.y0 - self.border.y1
    }

    /// Size of the content box.
    #[inline]
    #[must_use]
    pub fn content_box_size(&self) -> Size {
        Size::new(self.content_box_width(), self.content_box_height())
    }

    /// Horizontal distance the content can be scrolled.
    #[must_use]
    pub fn scroll_width(&self) -> f64 {
        (self.content_size.width + self.scrollbar_size.width.min(self.size.width)
            - self.size.width
            + self.border.x1)
            .max(0.0)
    }

    /// Vertical distance the content can be scrolled.
    #[must_use]
    pub fn scroll_height(&self) -> f64 {
        (self.content_size.height + self.scrollbar_size.height.min(self.size.height)
            - self.size.height
            + self.border.y1)
            .max(0.0)
    }
}
