// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis value pairs and sizing constraints.
//!
//! Committed layout results use [`kurbo`] geometry directly. The types here
//! describe the *inputs* to sizing, where each axis may independently be
//! known, unknown, or constrained in a different way.

/// One of the two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbsoluteAxis {
    /// The horizontal axis.
    Horizontal,
    /// The vertical axis.
    Vertical,
}

impl AbsoluteAxis {
    /// Returns the other axis.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// A width/height pair of arbitrary values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Axes<T> {
    /// Value along the horizontal axis.
    pub width: T,
    /// Value along the vertical axis.
    pub height: T,
}

impl<T> Axes<T> {
    /// Creates a pair from its two components.
    #[inline]
    #[must_use]
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    /// Applies `f` to both components.
    #[inline]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Axes<U> {
        Axes {
            width: f(self.width),
            height: f(self.height),
        }
    }

    /// Combines two pairs component-wise.
    #[inline]
    pub fn zip_map<U, R>(self, other: Axes<U>, mut f: impl FnMut(T, U) -> R) -> Axes<R> {
        Axes {
            width: f(self.width, other.width),
            height: f(self.height, other.height),
        }
    }

    /// Returns the component along `axis`.
    #[inline]
    #[must_use]
    pub fn get(&self, axis: AbsoluteAxis) -> &T {
        match axis {
            AbsoluteAxis::Horizontal => &self.width,
            AbsoluteAxis::Vertical => &self.height,
        }
    }

    /// Replaces the component along `axis`.
    #[inline]
    pub fn set(&mut self, axis: AbsoluteAxis, value: T) {
        match axis {
            AbsoluteAxis::Horizontal => self.width = value,
            AbsoluteAxis::Vertical => self.height = value,
        }
    }
}

impl<T: Copy> Axes<T> {
    /// Creates a pair with the same value on both axes.
    #[inline]
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self {
            width: value,
            height: value,
        }
    }
}

impl Axes<Option<f64>> {
    /// Both axes unknown.
    pub const NONE: Self = Self {
        width: None,
        height: None,
    };

    /// Converts a concrete size into a pair of known dimensions.
    #[inline]
    #[must_use]
    pub const fn from_size(size: kurbo::Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
        }
    }

    /// Fills unknown axes from `fallback`.
    #[inline]
    #[must_use]
    pub fn unwrap_or(self, fallback: kurbo::Size) -> kurbo::Size {
        kurbo::Size::new(
            self.width.unwrap_or(fallback.width),
            self.height.unwrap_or(fallback.height),
        )
    }
}

/// The space offered to a node along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AvailableSpace {
    /// A definite extent in layout units.
    Definite(f64),
    /// Size as small as content allows (the min-content contribution).
    MinContent,
    /// Size as large as content wants (the max-content contribution).
    #[default]
    MaxContent,
}

impl AvailableSpace {
    /// Zero definite space.
    pub const ZERO: Self = Self::Definite(0.0);

    /// Returns `true` for [`Definite`](Self::Definite) space.
    #[inline]
    #[must_use]
    pub const fn is_definite(self) -> bool {
        matches!(self, Self::Definite(_))
    }

    /// Returns the definite extent, if any.
    #[inline]
    #[must_use]
    pub const fn into_option(self) -> Option<f64> {
        match self {
            Self::Definite(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the definite extent, or `fallback` for intrinsic constraints.
    #[inline]
    #[must_use]
    pub const fn unwrap_or(self, fallback: f64) -> f64 {
        match self {
            Self::Definite(value) => value,
            _ => fallback,
        }
    }

    /// Returns `true` if both values describe exactly the same constraint.
    ///
    /// Definite extents compare bitwise so that `NaN` never matches and the
    /// comparison stays reflexive for every finite value.
    #[inline]
    #[must_use]
    pub fn is_same_constraint(self, other: Self) -> bool {
        match (self, other) {
            (Self::Definite(a), Self::Definite(b)) => a.to_bits() == b.to_bits() && !a.is_nan(),
            (Self::MinContent, Self::MinContent) | (Self::MaxContent, Self::MaxContent) => true,
            _ => false,
        }
    }
}

impl From<f64> for AvailableSpace {
    fn from(value: f64) -> Self {
        Self::Definite(value)
    }
}

impl From<Option<f64>> for AvailableSpace {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(value) => Self::Definite(value),
            None => Self::MaxContent,
        }
    }
}

impl Axes<AvailableSpace> {
    /// Unconstrained space on both axes.
    pub const MAX_CONTENT: Self = Self {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    };

    /// Minimal space on both axes.
    pub const MIN_CONTENT: Self = Self {
        width: AvailableSpace::MinContent,
        height: AvailableSpace::MinContent,
    };

    /// Definite space taken from a concrete size.
    #[inline]
    #[must_use]
    pub const fn definite(size: kurbo::Size) -> Self {
        Self {
            width: AvailableSpace::Definite(size.width),
            height: AvailableSpace::Definite(size.height),
        }
    }
}
