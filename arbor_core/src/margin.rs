// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collapsible vertical margins for block layout.
//!
//! Adjacent block margins merge into a single gap whose size is the largest
//! positive margin plus the most negative margin among the participants. That
//! rule only ever needs the two extremes, so [`CollapsibleMarginSet`] keeps a
//! running reduction rather than the list of margins it has seen. Folding is
//! associative and commutative: a block pass can accumulate sibling margins in
//! any grouping and still resolve to the same gap.

/// Running accumulator of margins that collapse together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollapsibleMarginSet {
    positive: f64,
    negative: f64,
}

impl CollapsibleMarginSet {
    /// The set containing only zero-sized margins.
    pub const ZERO: Self = Self {
        positive: 0.0,
        negative: 0.0,
    };

    /// Creates a set from a single margin.
    #[inline]
    #[must_use]
    pub fn from_margin(margin: f64) -> Self {
        if margin >= 0.0 {
            Self {
                positive: margin,
                negative: 0.0,
            }
        } else {
            Self {
                positive: 0.0,
                negative: margin,
            }
        }
    }

    /// Folds one more margin into the set.
    #[inline]
    #[must_use]
    pub fn collapse_with_margin(mut self, margin: f64) -> Self {
        if margin >= 0.0 {
            self.positive = self.positive.max(margin);
        } else {
            self.negative = self.negative.min(margin);
        }
        self
    }

    /// Folds another set into this one.
    #[inline]
    #[must_use]
    pub fn collapse_with_set(mut self, other: Self) -> Self {
        self.positive = self.positive.max(other.positive);
        self.negative = self.negative.min(other.negative);
        self
    }

    /// Returns the size of the collapsed gap.
    #[inline]
    #[must_use]
    pub fn resolve(&self) -> f64 {
        self.positive + self.negative
    }

    /// Returns the largest positive margin seen (zero if none).
    #[inline]
    #[must_use]
    pub const fn positive(&self) -> f64 {
        self.positive
    }

    /// Returns the most negative margin seen (zero if none).
    #[inline]
    #[must_use]
    pub const fn negative(&self) -> f64 {
        self.negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_signs_sum_extremes() {
        let set = CollapsibleMarginSet::from_margin(5.0).collapse_with_margin(-3.0);
        assert_eq!(set.resolve(), 2.0);
    }

    #[test]
    fn folding_order_does_not_matter() {
        let a = CollapsibleMarginSet::from_margin(5.0).collapse_with_margin(-8.0);
        let b = CollapsibleMarginSet::from_margin(-8.0).collapse_with_margin(5.0);
        assert_eq!(a, b);
        assert_eq!(a.resolve(), -3.0);
    }

    #[test]
    fn same_sign_keeps_extreme() {
        let positive = CollapsibleMarginSet::from_margin(10.0)
            .collapse_with_margin(4.0)
            .collapse_with_margin(12.0);
        assert_eq!(positive.resolve(), 12.0);

        let negative = CollapsibleMarginSet::from_margin(-2.0).collapse_with_margin(-7.0);
        assert_eq!(negative.resolve(), -7.0);
        assert_eq!(negative.positive(), 0.0);
    }

    #[test]
    fn sets_collapse_associatively() {
        let margins = [3.0, -1.0, 8.0, -6.0, 0.0, 2.5];
        let online = margins
            .iter()
            .fold(CollapsibleMarginSet::ZERO, |set, &m| set.collapse_with_margin(m));

        let (left, right) = margins.split_at(3);
        let fold = |slice: &[f64]| {
            slice
                .iter()
                .fold(CollapsibleMarginSet::ZERO, |set, &m| set.collapse_with_margin(m))
        };
        let grouped = fold(right).collapse_with_set(fold(left));

        assert_eq!(online, grouped);
        assert_eq!(online.resolve(), 2.0);
    }

    #[test]
    fn zero_is_identity() {
        let set = CollapsibleMarginSet::from_margin(-4.0);
        assert_eq!(set.collapse_with_set(CollapsibleMarginSet::ZERO), set);
        assert_eq!(CollapsibleMarginSet::ZERO.resolve(), 0.0);
    }
}
