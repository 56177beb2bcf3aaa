#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! Candidate sets over the digits 1..=9.
//!
//! A [`CandidateSet`] is a 9-bit mask (bits 1 through 9 of a `u16`) recording
//! which values are still legal for a cell, row, or column. The solver only
//! ever removes candidates from the tracked structures, so every mutating
//! operation reports whether it changed anything; iteration yields digits in
//! ascending order, which is what makes the search deterministic.

use std::fmt;

/// Bits 1..=9 set, bit 0 unused.
const ALL_DIGITS: u16 = 0b11_1111_1110;

/// A set of candidate digits 1..=9, packed into a `u16`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateSet(u16);

impl CandidateSet {
    /// The set containing every digit 1..=9.
    #[must_use]
    pub const fn all() -> Self {
        Self(ALL_DIGITS)
    }

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set containing exactly `value`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `value` is in 1..=9.
    #[must_use]
    pub const fn singleton(value: u8) -> Self {
        debug_assert!(value >= 1 && value <= 9);
        Self(1 << value)
    }

    /// Number of digits in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set contains no digits.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `value` is in the set.
    #[must_use]
    pub const fn contains(self, value: u8) -> bool {
        self.0 & (1 << value) != 0
    }

    /// Adds `value` to the set.
    ///
    /// Only used for accumulating scratch masks (e.g. the known values of a
    /// block); the tracked candidate structures are narrowed monotonically
    /// and never gain digits back.
    pub const fn insert(&mut self, value: u8) {
        debug_assert!(value >= 1 && value <= 9);
        self.0 |= 1 << value;
    }

    /// Removes `value` from the set, returning whether it was present.
    pub const fn remove(&mut self, value: u8) -> bool {
        let bit = 1 << value;
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    /// The sole digit in the set, if the set has exactly one element.
    #[must_use]
    pub const fn sole(self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            #[allow(clippy::cast_possible_truncation)]
            Some(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    /// The digits present in both sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// The digits present in either set.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// The digits present in `self` but not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Whether every digit in `self` is also in `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates over the digits in ascending order.
    #[must_use]
    pub const fn iter(self) -> Digits {
        Digits(self.0)
    }
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::all()
    }
}

impl IntoIterator for CandidateSet {
    type Item = u8;
    type IntoIter = Digits;

    fn into_iter(self) -> Digits {
        self.iter()
    }
}

impl fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Ascending iterator over the digits of a [`CandidateSet`].
#[derive(Clone, Copy, Debug)]
pub struct Digits(u16);

impl Iterator for Digits {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let digit = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(digit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Digits {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_digit() {
        let set = CandidateSet::all();
        assert_eq!(set.len(), 9);
        for d in 1..=9 {
            assert!(set.contains(d));
        }
    }

    #[test]
    fn singleton_collapses_to_sole() {
        let set = CandidateSet::singleton(7);
        assert_eq!(set.len(), 1);
        assert_eq!(set.sole(), Some(7));
    }

    #[test]
    fn sole_is_none_unless_exactly_one() {
        assert_eq!(CandidateSet::empty().sole(), None);
        assert_eq!(CandidateSet::all().sole(), None);
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = CandidateSet::all();
        assert!(set.remove(4));
        assert!(!set.remove(4));
        assert_eq!(set.len(), 8);
        assert!(!set.contains(4));
    }

    #[test]
    fn iteration_is_ascending() {
        let mut set = CandidateSet::empty();
        set.insert(9);
        set.insert(2);
        set.insert(5);
        let digits: Vec<u8> = set.iter().collect();
        assert_eq!(digits, vec![2, 5, 9]);
    }

    #[test]
    fn intersection_and_union() {
        let mut a = CandidateSet::empty();
        a.insert(1);
        a.insert(2);
        a.insert(3);
        let mut b = CandidateSet::empty();
        b.insert(3);
        b.insert(4);

        assert_eq!(a.intersection(b).sole(), Some(3));
        assert_eq!(a.union(b).len(), 4);
        assert_eq!(a.difference(b).len(), 2);
        assert!(!a.difference(b).contains(3));
        assert!(a.intersection(b).is_subset(a));
        assert!(!a.is_subset(b));
    }
}
