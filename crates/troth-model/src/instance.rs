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

//! # Problem Instances
//!
//! The immutable description of a stable matching problem: two equal-size
//! participant groups, each member carrying a strict ranking of the entire
//! opposite group.
//!
//! Validation is eager and fail-fast. `Instance::new` rejects mismatched
//! group sizes and malformed rank rows before returning, so every `Instance`
//! in circulation is well-formed and the engines never detect a precondition
//! violation mid-run.

use crate::{
    index::{ProposerIndex, ReceiverIndex, Side},
    preference::PreferenceTable,
};

/// The error type for instance construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The two groups have different sizes.
    GroupSizeMismatch { proposers: usize, receivers: usize },
    /// A participant's rank list has the wrong number of entries.
    RankLengthMismatch {
        side: Side,
        participant: usize,
        expected: usize,
        actual: usize,
    },
    /// A participant's rank list repeats or omits a counterpart.
    NotAPermutation { side: Side, participant: usize },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GroupSizeMismatch {
                proposers,
                receivers,
            } => write!(
                f,
                "Group sizes differ: {} proposers but {} receivers",
                proposers, receivers
            ),
            Self::RankLengthMismatch {
                side,
                participant,
                expected,
                actual,
            } => write!(
                f,
                "Rank list of {} {} has {} entries, expected {}",
                side, participant, actual, expected
            ),
            Self::NotAPermutation { side, participant } => write!(
                f,
                "Rank list of {} {} is not a permutation of the opposite group",
                side, participant
            ),
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable stable matching problem instance.
///
/// Holds the preference tables of both groups. Created once, validated
/// eagerly, and borrowed read-only by every algorithm for the lifetime of a
/// run; matchings store only indices into it.
///
/// # Examples
///
/// ```rust
/// # use troth_model::instance::Instance;
///
/// let instance = Instance::new(
///     vec![vec![0, 1], vec![1, 0]],
///     vec![vec![0, 1], vec![1, 0]],
/// )
/// .unwrap();
/// assert_eq!(instance.size(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    proposers: PreferenceTable,
    receivers: PreferenceTable,
}

impl Instance {
    /// Builds a validated instance from per-participant rank rows.
    ///
    /// `proposer_ranks[p]` lists the receivers in `p`'s order of preference,
    /// most preferred first; `receiver_ranks[r]` dually for proposers. Both
    /// groups must have the same size and every row must be a permutation of
    /// `0..n`.
    ///
    /// # Errors
    ///
    /// Returns an `InstanceError` describing the first violation found.
    pub fn new(
        proposer_ranks: Vec<Vec<usize>>,
        receiver_ranks: Vec<Vec<usize>>,
    ) -> Result<Self, InstanceError> {
        if proposer_ranks.len() != receiver_ranks.len() {
            return Err(InstanceError::GroupSizeMismatch {
                proposers: proposer_ranks.len(),
                receivers: receiver_ranks.len(),
            });
        }

        Ok(Self {
            proposers: PreferenceTable::from_rows(Side::Proposer, proposer_ranks)?,
            receivers: PreferenceTable::from_rows(Side::Receiver, receiver_ranks)?,
        })
    }

    /// Returns the size `n` of each group.
    #[inline]
    pub fn size(&self) -> usize {
        self.proposers.participants()
    }

    /// Returns proposer `p`'s rank list over receivers, most preferred first.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `p` is out of bounds.
    #[inline]
    pub fn proposer_rank(&self, p: ProposerIndex) -> &[usize] {
        self.proposers.rank_row(p.get())
    }

    /// Returns receiver `r`'s rank list over proposers, most preferred first.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `r` is out of bounds.
    #[inline]
    pub fn receiver_rank(&self, r: ReceiverIndex) -> &[usize] {
        self.receivers.rank_row(r.get())
    }

    /// Returns the rank slot receiver `r` occupies in proposer `p`'s list
    /// (0 is most preferred).
    #[inline]
    pub fn proposer_position(&self, p: ProposerIndex, r: ReceiverIndex) -> usize {
        self.proposers.position_of(p.get(), r.get())
    }

    /// Returns the rank slot proposer `p` occupies in receiver `r`'s list
    /// (0 is most preferred).
    #[inline]
    pub fn receiver_position(&self, r: ReceiverIndex, p: ProposerIndex) -> usize {
        self.receivers.position_of(r.get(), p.get())
    }

    /// Returns `true` iff proposer `p` strictly prefers receiver `a` over
    /// receiver `b`. Returns `false` when `a == b`.
    #[inline]
    pub fn proposer_prefers(&self, p: ProposerIndex, a: ReceiverIndex, b: ReceiverIndex) -> bool {
        self.proposers.prefers(p.get(), a.get(), b.get())
    }

    /// Returns `true` iff receiver `r` strictly prefers proposer `a` over
    /// proposer `b`. Returns `false` when `a == b`.
    #[inline]
    pub fn receiver_prefers(&self, r: ReceiverIndex, a: ProposerIndex, b: ProposerIndex) -> bool {
        self.receivers.prefers(r.get(), a.get(), b.get())
    }
}

impl std::fmt::Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance (n = {})", self.size())?;
        writeln!(f, "  Proposers")?;
        for p in 0..self.size() {
            writeln!(f, "    {:<4} : {:?}", p, self.proposers.rank_row(p))?;
        }
        writeln!(f, "  Receivers")?;
        for r in 0..self.size() {
            writeln!(f, "    {:<4} : {:?}", r, self.receivers.rank_row(r))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pi(i: usize) -> ProposerIndex {
        ProposerIndex::new(i)
    }

    fn ri(i: usize) -> ReceiverIndex {
        ReceiverIndex::new(i)
    }

    #[test]
    fn test_new_and_typed_accessors() {
        let instance = Instance::new(
            vec![vec![2, 0, 1], vec![1, 2, 0], vec![0, 1, 2]],
            vec![vec![0, 1, 2], vec![2, 1, 0], vec![1, 0, 2]],
        )
        .unwrap();

        assert_eq!(instance.size(), 3);
        assert_eq!(instance.proposer_rank(pi(0)), &[2, 0, 1]);
        assert_eq!(instance.receiver_rank(ri(1)), &[2, 1, 0]);

        assert!(instance.proposer_prefers(pi(0), ri(2), ri(1)));
        assert!(!instance.proposer_prefers(pi(0), ri(1), ri(2)));
        assert!(instance.receiver_prefers(ri(2), pi(1), pi(2)));

        assert_eq!(instance.proposer_position(pi(1), ri(1)), 0);
        assert_eq!(instance.receiver_position(ri(0), pi(2)), 2);
    }

    #[test]
    fn test_group_size_mismatch_is_rejected() {
        let err = Instance::new(vec![vec![0]], vec![]).unwrap_err();
        assert_eq!(
            err,
            InstanceError::GroupSizeMismatch {
                proposers: 1,
                receivers: 0,
            }
        );
    }

    #[test]
    fn test_malformed_receiver_rank_is_rejected() {
        let err = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 0], vec![1, 0]],
        )
        .unwrap_err();

        assert_eq!(
            err,
            InstanceError::NotAPermutation {
                side: Side::Receiver,
                participant: 0,
            }
        );
    }

    #[test]
    fn test_error_display_names_the_offender() {
        let err = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![0, 0]],
        )
        .unwrap_err();

        let rendered = format!("{}", err);
        assert!(rendered.contains("receiver 1"), "got: {}", rendered);
        assert!(rendered.contains("not a permutation"), "got: {}", rendered);
    }

    #[test]
    fn test_display_lists_both_sides() {
        let instance =
            Instance::new(vec![vec![1, 0], vec![0, 1]], vec![vec![0, 1], vec![1, 0]]).unwrap();

        let rendered = format!("{}", instance);
        assert!(rendered.contains("Instance (n = 2)"));
        assert!(rendered.contains("Proposers"));
        assert!(rendered.contains("Receivers"));
        assert!(rendered.contains("[1, 0]"));
    }
}
