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

//! # Matchings
//!
//! A partial-to-complete bijection between proposers and receivers, built
//! incrementally by the engines and consumed by the verifier and reducers.
//!
//! The store is two synchronized partner maps, `proposer -> receiver` and
//! `receiver -> proposer`, so lookup from either side is O(1) and the
//! deferred-acceptance loop stays at O(n²) total instead of the O(n³) a
//! pair-list scan would cost. The maps make duplicate entries for a
//! participant unrepresentable; completeness (every participant matched) is
//! checked separately before verification.

use crate::{
    index::{ProposerIndex, ReceiverIndex},
    instance::Instance,
};

/// An ordered (proposer, receiver) pair denoting a match.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pair {
    proposer: ProposerIndex,
    receiver: ReceiverIndex,
}

impl Pair {
    /// Creates a new pair.
    #[inline]
    pub const fn new(proposer: ProposerIndex, receiver: ReceiverIndex) -> Self {
        Self { proposer, receiver }
    }

    /// Returns the proposer side of the pair.
    #[inline]
    pub const fn proposer(&self) -> ProposerIndex {
        self.proposer
    }

    /// Returns the receiver side of the pair.
    #[inline]
    pub const fn receiver(&self) -> ReceiverIndex {
        self.receiver
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.proposer.get(), self.receiver.get())
    }
}

/// The error type for matchings handed to the verifier or reducers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    /// The matching was built for a different group size than the instance.
    SizeMismatch { expected: usize, actual: usize },
    /// A proposer has no partner in a matching required to be complete.
    UnmatchedProposer(ProposerIndex),
    /// A receiver has no partner in a matching required to be complete.
    UnmatchedReceiver(ReceiverIndex),
}

impl std::fmt::Display for MatchingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "Matching size mismatch: instance has {} participants per side, matching holds {}",
                expected, actual
            ),
            Self::UnmatchedProposer(p) => write!(f, "Proposer {} is unmatched", p.get()),
            Self::UnmatchedReceiver(r) => write!(f, "Receiver {} is unmatched", r.get()),
        }
    }
}

impl std::error::Error for MatchingError {}

/// A matching between proposers and receivers, possibly partial while under
/// construction.
///
/// Mutated only via [`Matching::add_pair`] and [`Matching::remove_pair`];
/// both partner maps are updated together, so the structure can never hold
/// two pairs claiming the same participant.
///
/// # Examples
///
/// ```rust
/// # use troth_model::matching::Matching;
/// # use troth_model::index::{ProposerIndex, ReceiverIndex};
///
/// let mut matching = Matching::new(2);
/// matching.add_pair(ProposerIndex::new(0), ReceiverIndex::new(1));
/// assert_eq!(
///     matching.receiver_of(ProposerIndex::new(0)),
///     Some(ReceiverIndex::new(1))
/// );
/// assert!(!matching.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
    /// `receiver_of[p]`: the partner of proposer `p`, if any.
    receiver_of: Vec<Option<ReceiverIndex>>,
    /// `proposer_of[r]`: the partner of receiver `r`, if any.
    proposer_of: Vec<Option<ProposerIndex>>,
    matched: usize,
}

impl Matching {
    /// Creates an empty matching for groups of `size` participants.
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            receiver_of: vec![None; size],
            proposer_of: vec![None; size],
            matched: 0,
        }
    }

    /// Returns the group size this matching was built for.
    #[inline]
    pub fn size(&self) -> usize {
        self.receiver_of.len()
    }

    /// Returns the number of pairs currently in the matching.
    #[inline]
    pub fn len(&self) -> usize {
        self.matched
    }

    /// Returns `true` if the matching holds no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    /// Returns `true` if every participant on both sides is matched.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.matched == self.size()
    }

    /// Returns the partner of proposer `p`, if any.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `p` is out of bounds.
    #[inline]
    pub fn receiver_of(&self, p: ProposerIndex) -> Option<ReceiverIndex> {
        debug_assert!(
            p.get() < self.size(),
            "called `Matching::receiver_of` with proposer index out of bounds: the len is {} but the index is {}",
            self.size(),
            p.get()
        );

        self.receiver_of[p.get()]
    }

    /// Returns the partner of receiver `r`, if any.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `r` is out of bounds.
    #[inline]
    pub fn proposer_of(&self, r: ReceiverIndex) -> Option<ProposerIndex> {
        debug_assert!(
            r.get() < self.size(),
            "called `Matching::proposer_of` with receiver index out of bounds: the len is {} but the index is {}",
            self.size(),
            r.get()
        );

        self.proposer_of[r.get()]
    }

    /// Adds the pair `(p, r)` to the matching.
    ///
    /// # Panics
    ///
    /// Panics if either participant is already matched; matching the same
    /// participant twice is a caller bug, not a recoverable condition.
    /// In debug builds, also panics if an index is out of bounds.
    pub fn add_pair(&mut self, p: ProposerIndex, r: ReceiverIndex) {
        debug_assert!(
            p.get() < self.size() && r.get() < self.size(),
            "called `Matching::add_pair` with index out of bounds: the len is {} but the pair is ({}, {})",
            self.size(),
            p.get(),
            r.get()
        );
        assert!(
            self.receiver_of[p.get()].is_none(),
            "called `Matching::add_pair` with proposer {} already matched",
            p.get()
        );
        assert!(
            self.proposer_of[r.get()].is_none(),
            "called `Matching::add_pair` with receiver {} already matched",
            r.get()
        );

        self.receiver_of[p.get()] = Some(r);
        self.proposer_of[r.get()] = Some(p);
        self.matched += 1;
    }

    /// Removes the pair `(p, r)` from the matching.
    ///
    /// # Panics
    ///
    /// Panics if `p` and `r` are not currently matched to each other.
    pub fn remove_pair(&mut self, p: ProposerIndex, r: ReceiverIndex) {
        debug_assert!(
            p.get() < self.size() && r.get() < self.size(),
            "called `Matching::remove_pair` with index out of bounds: the len is {} but the pair is ({}, {})",
            self.size(),
            p.get(),
            r.get()
        );
        assert!(
            self.receiver_of[p.get()] == Some(r),
            "called `Matching::remove_pair` with a pair ({}, {}) that is not matched",
            p.get(),
            r.get()
        );

        self.receiver_of[p.get()] = None;
        self.proposer_of[r.get()] = None;
        self.matched -= 1;
    }

    /// Returns the pair list, ascending by proposer index.
    pub fn pairs(&self) -> Vec<Pair> {
        self.receiver_of
            .iter()
            .enumerate()
            .filter_map(|(p, r)| r.map(|r| Pair::new(ProposerIndex::new(p), r)))
            .collect()
    }

    /// Checks that this matching is a complete one-to-one correspondence for
    /// `instance`: built for the same group size, with every proposer and
    /// every receiver matched exactly once.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, scanning proposers then receivers
    /// in ascending index order.
    pub fn validate_complete(&self, instance: &Instance) -> Result<(), MatchingError> {
        if self.size() != instance.size() {
            return Err(MatchingError::SizeMismatch {
                expected: instance.size(),
                actual: self.size(),
            });
        }

        for (p, partner) in self.receiver_of.iter().enumerate() {
            if partner.is_none() {
                return Err(MatchingError::UnmatchedProposer(ProposerIndex::new(p)));
            }
        }
        for (r, partner) in self.proposer_of.iter().enumerate() {
            if partner.is_none() {
                return Err(MatchingError::UnmatchedReceiver(ReceiverIndex::new(r)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Matching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for pair in self.pairs() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", pair)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    fn pi(i: usize) -> ProposerIndex {
        ProposerIndex::new(i)
    }

    fn ri(i: usize) -> ReceiverIndex {
        ReceiverIndex::new(i)
    }

    fn square_instance(n: usize) -> Instance {
        let rows: Vec<Vec<usize>> = (0..n).map(|_| (0..n).collect()).collect();
        Instance::new(rows.clone(), rows).unwrap()
    }

    #[test]
    fn test_add_and_lookup_from_both_sides() {
        let mut matching = Matching::new(3);
        matching.add_pair(pi(1), ri(0));
        matching.add_pair(pi(0), ri(2));

        assert_eq!(matching.len(), 2);
        assert_eq!(matching.receiver_of(pi(1)), Some(ri(0)));
        assert_eq!(matching.proposer_of(ri(0)), Some(pi(1)));
        assert_eq!(matching.receiver_of(pi(2)), None);
        assert_eq!(matching.proposer_of(ri(1)), None);
    }

    #[test]
    fn test_remove_pair_clears_both_maps() {
        let mut matching = Matching::new(2);
        matching.add_pair(pi(0), ri(1));
        matching.remove_pair(pi(0), ri(1));

        assert!(matching.is_empty());
        assert_eq!(matching.receiver_of(pi(0)), None);
        assert_eq!(matching.proposer_of(ri(1)), None);
    }

    #[test]
    #[should_panic(expected = "proposer 0 already matched")]
    fn test_add_pair_panics_on_double_matched_proposer() {
        let mut matching = Matching::new(2);
        matching.add_pair(pi(0), ri(0));
        matching.add_pair(pi(0), ri(1));
    }

    #[test]
    #[should_panic(expected = "receiver 1 already matched")]
    fn test_add_pair_panics_on_double_matched_receiver() {
        let mut matching = Matching::new(2);
        matching.add_pair(pi(0), ri(1));
        matching.add_pair(pi(1), ri(1));
    }

    #[test]
    #[should_panic(expected = "is not matched")]
    fn test_remove_pair_panics_on_absent_pair() {
        let mut matching = Matching::new(2);
        matching.add_pair(pi(0), ri(0));
        matching.remove_pair(pi(0), ri(1));
    }

    #[test]
    fn test_pairs_are_sorted_by_proposer() {
        let mut matching = Matching::new(3);
        matching.add_pair(pi(2), ri(0));
        matching.add_pair(pi(0), ri(1));
        matching.add_pair(pi(1), ri(2));

        let pairs = matching.pairs();
        assert_eq!(
            pairs,
            vec![
                Pair::new(pi(0), ri(1)),
                Pair::new(pi(1), ri(2)),
                Pair::new(pi(2), ri(0)),
            ]
        );
    }

    #[test]
    fn test_validate_complete_accepts_perfect_matching() {
        let instance = square_instance(3);
        let mut matching = Matching::new(3);
        matching.add_pair(pi(0), ri(2));
        matching.add_pair(pi(1), ri(0));
        matching.add_pair(pi(2), ri(1));

        assert!(matching.is_complete());
        assert!(matching.validate_complete(&instance).is_ok());
    }

    #[test]
    fn test_validate_complete_reports_first_unmatched_proposer() {
        let instance = square_instance(3);
        let mut matching = Matching::new(3);
        matching.add_pair(pi(2), ri(1));

        assert_eq!(
            matching.validate_complete(&instance),
            Err(MatchingError::UnmatchedProposer(pi(0)))
        );
    }

    #[test]
    fn test_validate_complete_reports_size_mismatch() {
        let instance = square_instance(3);
        let matching = Matching::new(2);

        assert_eq!(
            matching.validate_complete(&instance),
            Err(MatchingError::SizeMismatch {
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_display_renders_sorted_pairs() {
        let mut matching = Matching::new(2);
        matching.add_pair(pi(1), ri(0));
        matching.add_pair(pi(0), ri(1));

        assert_eq!(format!("{}", matching), "(0, 1) (1, 0)");
    }
}
