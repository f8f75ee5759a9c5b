// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Preference Tables
//!
//! One group's strict rankings over the opposite group, stored flattened for
//! cache locality, with a precomputed inverse-rank table so preference
//! queries answer in O(1).
//!
//! ## Motivation
//!
//! Both the stability verifier (O(n²) queries per matching) and the
//! exhaustive enumerator (O(n! · n²) queries per instance) sit on top of
//! "does X prefer A over B". A linear scan of the rank list per query is
//! correct but dominates total runtime; precomputing `position_of` at
//! construction makes every query a pair of array reads.
//!
//! ## Layout
//!
//! For `n` participants each ranking `n` counterparts:
//!
//! - `ranks[who * n + slot]`: the counterpart occupying rank `slot` of
//!   `who`'s list (slot 0 is the most preferred).
//! - `positions[who * n + counterpart]`: the rank slot `counterpart`
//!   occupies in `who`'s list; the inverse of `ranks`.
//!
//! Indices here are raw `usize` values; the typed wrappers live on
//! `Instance`, which knows which side a table belongs to.

use crate::index::Side;
use crate::instance::InstanceError;
use fixedbitset::FixedBitSet;

#[inline(always)]
fn flatten_index(n: usize, who: usize, slot: usize) -> usize {
    who * n + slot
}

/// Strict preference rankings of one participant group over the other.
///
/// Immutable after construction. Each participant's rank list is validated
/// to be a permutation of `0..n` at construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreferenceTable {
    participants: usize,
    /// `ranks[who * n + slot]`: counterpart at rank `slot` of `who`'s list.
    ranks: Vec<usize>,
    /// `positions[who * n + counterpart]`: rank slot of `counterpart` in
    /// `who`'s list. Inverse of `ranks`.
    positions: Vec<usize>,
}

impl PreferenceTable {
    /// Builds a validated preference table from per-participant rank rows.
    ///
    /// Row `who` lists `who`'s counterparts from most to least preferred.
    /// Every row must be a permutation of `0..rows.len()`. The `side` is
    /// used only for error attribution.
    ///
    /// # Errors
    ///
    /// Returns `InstanceError::RankLengthMismatch` if a row has the wrong
    /// length, or `InstanceError::NotAPermutation` if a row repeats or
    /// omits a counterpart.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use troth_model::preference::PreferenceTable;
    /// # use troth_model::index::Side;
    ///
    /// let table =
    ///     PreferenceTable::from_rows(Side::Proposer, vec![vec![1, 0], vec![0, 1]]).unwrap();
    /// assert_eq!(table.participants(), 2);
    /// assert!(table.prefers(0, 1, 0));
    /// ```
    pub fn from_rows(side: Side, rows: Vec<Vec<usize>>) -> Result<Self, InstanceError> {
        let n = rows.len();
        let mut ranks = Vec::with_capacity(n * n);
        let mut positions = vec![0usize; n * n];
        let mut seen = FixedBitSet::with_capacity(n);

        for (who, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(InstanceError::RankLengthMismatch {
                    side,
                    participant: who,
                    expected: n,
                    actual: row.len(),
                });
            }

            seen.clear();
            for (slot, &counterpart) in row.iter().enumerate() {
                if counterpart >= n || seen.contains(counterpart) {
                    return Err(InstanceError::NotAPermutation {
                        side,
                        participant: who,
                    });
                }
                seen.insert(counterpart);
                positions[flatten_index(n, who, counterpart)] = slot;
                ranks.push(counterpart);
            }
        }

        Ok(Self {
            participants: n,
            ranks,
            positions,
        })
    }

    /// Returns the number of participants in this group.
    #[inline]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Returns `who`'s rank list, most preferred first.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `who` is out of bounds.
    #[inline]
    pub fn rank_row(&self, who: usize) -> &[usize] {
        debug_assert!(
            who < self.participants,
            "called `PreferenceTable::rank_row` with participant out of bounds: the len is {} but the index is {}",
            self.participants,
            who
        );

        let n = self.participants;
        &self.ranks[who * n..(who + 1) * n]
    }

    /// Returns the rank slot `counterpart` occupies in `who`'s list
    /// (0 is most preferred).
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `who` or `counterpart` is out of bounds.
    #[inline]
    pub fn position_of(&self, who: usize, counterpart: usize) -> usize {
        debug_assert!(
            who < self.participants,
            "called `PreferenceTable::position_of` with participant out of bounds: the len is {} but the index is {}",
            self.participants,
            who
        );
        debug_assert!(
            counterpart < self.participants,
            "called `PreferenceTable::position_of` with counterpart out of bounds: the len is {} but the index is {}",
            self.participants,
            counterpart
        );

        self.positions[flatten_index(self.participants, who, counterpart)]
    }

    /// Returns `true` iff `who` strictly prefers counterpart `a` over `b`.
    ///
    /// Returns `false` when `a == b`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if any index is out of bounds.
    #[inline]
    pub fn prefers(&self, who: usize, a: usize, b: usize) -> bool {
        self.position_of(who, a) < self.position_of(who, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_accessors() {
        let table = PreferenceTable::from_rows(
            Side::Proposer,
            vec![vec![2, 0, 1], vec![0, 1, 2], vec![1, 2, 0]],
        )
        .unwrap();

        assert_eq!(table.participants(), 3);
        assert_eq!(table.rank_row(0), &[2, 0, 1]);
        assert_eq!(table.rank_row(2), &[1, 2, 0]);

        assert_eq!(table.position_of(0, 2), 0);
        assert_eq!(table.position_of(0, 1), 2);
        assert_eq!(table.position_of(1, 0), 0);
    }

    #[test]
    fn test_prefers_is_strict() {
        let table =
            PreferenceTable::from_rows(Side::Receiver, vec![vec![1, 0], vec![0, 1]]).unwrap();

        assert!(table.prefers(0, 1, 0));
        assert!(!table.prefers(0, 0, 1));

        // Equal counterparts are never preferred over themselves.
        assert!(!table.prefers(0, 1, 1));
        assert!(!table.prefers(1, 0, 0));
    }

    #[test]
    fn test_row_length_mismatch_is_rejected() {
        let err = PreferenceTable::from_rows(Side::Proposer, vec![vec![0, 1], vec![0]])
            .unwrap_err();

        match err {
            InstanceError::RankLengthMismatch {
                side,
                participant,
                expected,
                actual,
            } => {
                assert_eq!(side, Side::Proposer);
                assert_eq!(participant, 1);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected RankLengthMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_entry_is_rejected() {
        let err = PreferenceTable::from_rows(Side::Receiver, vec![vec![1, 1], vec![0, 1]])
            .unwrap_err();

        match err {
            InstanceError::NotAPermutation { side, participant } => {
                assert_eq!(side, Side::Receiver);
                assert_eq!(participant, 0);
            }
            other => panic!("expected NotAPermutation, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_entry_is_rejected() {
        let err =
            PreferenceTable::from_rows(Side::Proposer, vec![vec![0, 2], vec![0, 1]]).unwrap_err();

        assert!(matches!(
            err,
            InstanceError::NotAPermutation {
                side: Side::Proposer,
                participant: 0,
            }
        ));
    }

    #[test]
    fn test_empty_table_is_valid() {
        let table = PreferenceTable::from_rows(Side::Proposer, vec![]).unwrap();
        assert_eq!(table.participants(), 0);
    }
}
