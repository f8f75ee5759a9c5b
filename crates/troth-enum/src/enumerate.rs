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

//! Exhaustive enumeration of complete matchings.
//!
//! Every complete matching corresponds to exactly one permutation of the
//! proposers over receiver positions `0..n`: permutation `perm` yields the
//! pairs `(perm[slot], slot)`. Walking permutations in lexicographic order
//! therefore visits each of the `n!` matchings exactly once, in an order
//! that is reproducible across runs and identical however the rank space is
//! sharded.

use crate::extremal::{reduce_extremal, ExtremalSide};
use troth_core::algorithm::permutation::{factorial, Permutations};
use troth_model::{
    index::{ProposerIndex, ReceiverIndex},
    instance::Instance,
    matching::{Matching, Pair},
};
use troth_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::TerminationReason,
    stats::{EnumerationStatistics, EnumerationStatisticsBuilder},
    verify::StabilityVerifier,
};

/// Default maximum instance size the enumerator accepts.
///
/// 10! = 3,628,800 matchings, each carrying an O(n²) stability scan; beyond
/// this the factorial cost stops being interactive on commodity hardware.
pub const DEFAULT_SIZE_LIMIT: usize = 10;

/// The error type for enumeration and extremal reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumerationError {
    /// The instance exceeds the configured size threshold.
    SizeLimitExceeded { size: usize, limit: usize },
    /// A complete enumeration of a well-formed instance produced no stable
    /// matching. Gale-Shapley's existence theorem guarantees at least one,
    /// so this indicates a defect in the enumeration or verification logic,
    /// never a legitimate outcome.
    NoStableMatching,
    /// Extremal pairs were requested over an enumeration that terminated
    /// early; a partial stable set cannot certify extremality.
    IncompleteEnumeration { reason: String },
}

impl std::fmt::Display for EnumerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeLimitExceeded { size, limit } => write!(
                f,
                "Instance size {} exceeds the enumeration limit of {} ({}! matchings)",
                size, limit, limit
            ),
            Self::NoStableMatching => write!(
                f,
                "Complete enumeration found no stable matching; this violates the \
                 Gale-Shapley existence theorem and indicates an internal defect"
            ),
            Self::IncompleteEnumeration { reason } => write!(
                f,
                "Extremal pairs require a complete enumeration, but the run ended early: {}",
                reason
            ),
        }
    }
}

impl std::error::Error for EnumerationError {}

/// An exact-size iterator over the complete matchings of an instance, in
/// lexicographic permutation order.
#[derive(Debug, Clone)]
pub struct AllMatchings {
    permutations: Permutations,
}

impl AllMatchings {
    fn new(size: usize, start_rank: u64, end_rank: u64) -> Self {
        Self {
            permutations: Permutations::range(size, start_rank, end_rank),
        }
    }

    fn matching_from_permutation(perm: &[usize]) -> Matching {
        let mut matching = Matching::new(perm.len());
        for (slot, &p) in perm.iter().enumerate() {
            matching.add_pair(ProposerIndex::new(p), ReceiverIndex::new(slot));
        }
        matching
    }
}

impl Iterator for AllMatchings {
    type Item = Matching;

    fn next(&mut self) -> Option<Self::Item> {
        self.permutations
            .next()
            .map(|perm| Self::matching_from_permutation(&perm))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.permutations.size_hint()
    }
}

impl ExactSizeIterator for AllMatchings {}

impl std::iter::FusedIterator for AllMatchings {}

/// The result of enumerating one rank range: the stable matchings found in
/// that range, how many matchings were visited, and how the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardOutcome {
    stable: Vec<Matching>,
    enumerated: u64,
    reason: TerminationReason,
}

impl ShardOutcome {
    /// Returns the stable matchings found in this range, in visit order.
    #[inline]
    pub fn stable(&self) -> &[Matching] {
        &self.stable
    }

    /// Returns the number of matchings visited.
    #[inline]
    pub fn enumerated(&self) -> u64 {
        self.enumerated
    }

    /// Returns how the run ended.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Decomposes the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (Vec<Matching>, u64, TerminationReason) {
        (self.stable, self.enumerated, self.reason)
    }
}

/// The result of a full stable-matching enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationOutcome {
    stable: Vec<Matching>,
    reason: TerminationReason,
    statistics: EnumerationStatistics,
}

impl EnumerationOutcome {
    /// Constructs a new `EnumerationOutcome`.
    #[inline]
    pub fn new(
        stable: Vec<Matching>,
        reason: TerminationReason,
        statistics: EnumerationStatistics,
    ) -> Self {
        Self {
            stable,
            reason,
            statistics,
        }
    }

    /// Returns the stable matchings, in lexicographic enumeration order.
    #[inline]
    pub fn stable(&self) -> &[Matching] {
        &self.stable
    }

    /// Returns how the run ended.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Returns the enumeration statistics.
    #[inline]
    pub fn statistics(&self) -> &EnumerationStatistics {
        &self.statistics
    }

    /// Consumes the outcome, returning the stable matchings.
    #[inline]
    pub fn into_stable(self) -> Vec<Matching> {
        self.stable
    }
}

/// The exhaustive enumerator.
///
/// Stateless apart from its configuration; a single enumerator can serve
/// sequential runs and be shared (by reference) across worker threads, each
/// enumerating its own rank range.
#[derive(Debug, Clone, Copy)]
pub struct Enumerator {
    size_limit: usize,
}

impl Default for Enumerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Enumerator {
    /// Creates an enumerator with the default size threshold.
    #[inline]
    pub fn new() -> Self {
        Self {
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }

    /// Creates an enumerator with a custom size threshold.
    #[inline]
    pub fn with_size_limit(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Returns the configured size threshold.
    #[inline]
    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    /// Checks the instance against the threshold and returns the total
    /// permutation count on success.
    pub fn permutation_count(&self, instance: &Instance) -> Result<u64, EnumerationError> {
        let size = instance.size();
        if size > self.size_limit {
            return Err(EnumerationError::SizeLimitExceeded {
                size,
                limit: self.size_limit,
            });
        }

        // The threshold caps size far below 21, so the factorial fits u64.
        factorial(size).ok_or(EnumerationError::SizeLimitExceeded {
            size,
            limit: self.size_limit,
        })
    }

    /// Returns an iterator over all `n!` complete matchings of `instance`,
    /// in lexicographic permutation order.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::SizeLimitExceeded` if the instance exceeds
    /// the configured threshold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use troth_enum::enumerate::Enumerator;
    /// # use troth_model::instance::Instance;
    ///
    /// let instance = Instance::new(
    ///     vec![vec![0, 1], vec![1, 0]],
    ///     vec![vec![0, 1], vec![1, 0]],
    /// )
    /// .unwrap();
    ///
    /// let all: Vec<_> = Enumerator::new().all_matchings(&instance).unwrap().collect();
    /// assert_eq!(all.len(), 2);
    /// ```
    pub fn all_matchings(&self, instance: &Instance) -> Result<AllMatchings, EnumerationError> {
        let total = self.permutation_count(instance)?;
        Ok(AllMatchings::new(instance.size(), 0, total))
    }

    /// Enumerates the matchings with lexicographic ranks in `[start, end)`,
    /// keeping the stable ones. The monitor is polled between permutations:
    /// `on_step` after each visit, `search_command` before each visit, and
    /// `on_matching_found` for every stable matching.
    ///
    /// This is the sharding primitive: the orchestrating solver splits
    /// `0..n!` into contiguous ranges, one per worker, and concatenates the
    /// shard results in range order to reproduce the sequential output.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::SizeLimitExceeded` if the instance exceeds
    /// the configured threshold.
    ///
    /// # Panics
    ///
    /// Panics if the rank range is invalid for the instance size.
    pub fn enumerate_range<M>(
        &self,
        instance: &Instance,
        start_rank: u64,
        end_rank: u64,
        monitor: &mut M,
    ) -> Result<ShardOutcome, EnumerationError>
    where
        M: SearchMonitor,
    {
        self.permutation_count(instance)?;

        let verifier = StabilityVerifier::new();
        let mut matchings = AllMatchings::new(instance.size(), start_rank, end_rank);
        let mut stable = Vec::new();
        let mut enumerated: u64 = 0;

        monitor.on_enter_search(instance);

        let reason = loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                break TerminationReason::Aborted(reason);
            }

            let Some(matching) = matchings.next() else {
                break TerminationReason::Exhausted;
            };
            enumerated += 1;

            let report = verifier
                .check(instance, &matching)
                .expect("enumerated matchings are complete by construction");
            if report.is_stable() {
                monitor.on_matching_found(&matching);
                stable.push(matching);
            }

            monitor.on_step();
        };

        monitor.on_exit_search();

        Ok(ShardOutcome {
            stable,
            enumerated,
            reason,
        })
    }

    /// Enumerates the full permutation space and returns the stable
    /// matchings, in lexicographic order, with statistics.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::SizeLimitExceeded` if the instance exceeds
    /// the configured threshold, and `EnumerationError::NoStableMatching` if
    /// a complete (non-aborted) run finds no stable matching, a guaranteed
    /// impossibility for well-formed instances, surfaced loudly rather than
    /// returned as an empty set.
    pub fn stable_matchings<M>(
        &self,
        instance: &Instance,
        monitor: &mut M,
    ) -> Result<EnumerationOutcome, EnumerationError>
    where
        M: SearchMonitor,
    {
        let total = self.permutation_count(instance)?;
        let start_time = std::time::Instant::now();

        let shard = self.enumerate_range(instance, 0, total, monitor)?;
        let (stable, enumerated, reason) = shard.into_parts();

        if reason.is_exhausted() && stable.is_empty() {
            return Err(EnumerationError::NoStableMatching);
        }

        let statistics = EnumerationStatisticsBuilder::new()
            .matchings_enumerated(enumerated)
            .stable_found(stable.len() as u64)
            .used_threads(1)
            .enumeration_duration(start_time.elapsed())
            .build();

        Ok(EnumerationOutcome::new(stable, reason, statistics))
    }

    /// Enumerates the full space and reduces the stable set to one extremal
    /// pair per participant on `side`, sorted by that participant's index.
    ///
    /// # Errors
    ///
    /// Everything `stable_matchings` returns, plus
    /// `EnumerationError::IncompleteEnumeration` if the monitor ended the
    /// run early; a partial stable set cannot certify extremality.
    pub fn extremal_pairs<M>(
        &self,
        instance: &Instance,
        side: ExtremalSide,
        monitor: &mut M,
    ) -> Result<Vec<Pair>, EnumerationError>
    where
        M: SearchMonitor,
    {
        let outcome = self.stable_matchings(instance, monitor)?;
        if let TerminationReason::Aborted(reason) = outcome.reason() {
            return Err(EnumerationError::IncompleteEnumeration {
                reason: reason.clone(),
            });
        }

        reduce_extremal(instance, outcome.stable(), side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use troth_model::generator::InstanceGenerator;
    use troth_search::monitor::no_op::NoOpMonitor;

    fn two_by_two() -> Instance {
        // Proposers rank [0,1] / [1,0]; receivers rank [0,1] / [1,0].
        Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap()
    }

    #[test]
    fn test_all_matchings_count_is_factorial() {
        for n in [1usize, 2, 3, 4, 5] {
            let instance = InstanceGenerator::new(n).with_seed(3).generate();
            let all: Vec<_> = Enumerator::new()
                .all_matchings(&instance)
                .unwrap()
                .collect();
            assert_eq!(all.len() as u64, factorial(n).unwrap());
        }
    }

    #[test]
    fn test_all_matchings_are_valid_bijections() {
        let instance = InstanceGenerator::new(4).with_seed(11).generate();
        for matching in Enumerator::new().all_matchings(&instance).unwrap() {
            assert!(matching.validate_complete(&instance).is_ok());
        }
    }

    #[test]
    fn test_all_matchings_starts_at_identity() {
        let instance = two_by_two();
        let first = Enumerator::new()
            .all_matchings(&instance)
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(format!("{}", first), "(0, 0) (1, 1)");
    }

    #[test]
    fn test_two_by_two_has_both_matchings_stable() {
        let instance = two_by_two();
        let outcome = Enumerator::new()
            .stable_matchings(&instance, &mut NoOpMonitor::new())
            .unwrap();

        assert!(outcome.reason().is_exhausted());
        assert_eq!(outcome.stable().len(), 2);
        assert_eq!(outcome.statistics().matchings_enumerated, 2);
        assert_eq!(outcome.statistics().stable_found, 2);
    }

    #[test]
    fn test_stable_matchings_never_empty_for_random_instances() {
        for seed in 0..10 {
            let instance = InstanceGenerator::new(5).with_seed(seed).generate();
            let outcome = Enumerator::new()
                .stable_matchings(&instance, &mut NoOpMonitor::new())
                .unwrap();
            assert!(!outcome.stable().is_empty());
        }
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let instance = InstanceGenerator::new(5).with_seed(0).generate();
        let err = Enumerator::with_size_limit(4)
            .all_matchings(&instance)
            .unwrap_err();

        assert_eq!(
            err,
            EnumerationError::SizeLimitExceeded { size: 5, limit: 4 }
        );
    }

    #[test]
    fn test_shard_concatenation_matches_sequential_run() {
        let instance = InstanceGenerator::new(5).with_seed(21).generate();
        let enumerator = Enumerator::new();
        let total = enumerator.permutation_count(&instance).unwrap();

        let sequential = enumerator
            .stable_matchings(&instance, &mut NoOpMonitor::new())
            .unwrap();

        let mut sharded = Vec::new();
        for (start, end) in [(0, 40), (40, 41), (41, total)] {
            let shard = enumerator
                .enumerate_range(&instance, start, end, &mut NoOpMonitor::new())
                .unwrap();
            sharded.extend_from_slice(shard.stable());
        }

        assert_eq!(sharded, sequential.stable());
    }

    #[test]
    fn test_interrupt_aborts_enumeration() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use troth_search::monitor::interrupt::InterruptMonitor;

        let instance = InstanceGenerator::new(5).with_seed(2).generate();
        let flag = AtomicBool::new(false);
        flag.store(true, Ordering::Relaxed);

        let shard = Enumerator::new()
            .enumerate_range(
                &instance,
                0,
                120,
                &mut InterruptMonitor::new(&flag),
            )
            .unwrap();

        assert_eq!(shard.enumerated(), 0);
        assert!(matches!(shard.reason(), TerminationReason::Aborted(_)));
    }

    #[test]
    fn test_extremal_pairs_over_aborted_run_is_an_error() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use troth_search::monitor::interrupt::InterruptMonitor;

        let instance = InstanceGenerator::new(4).with_seed(5).generate();
        let flag = AtomicBool::new(false);
        flag.store(true, Ordering::Relaxed);

        let err = Enumerator::new()
            .extremal_pairs(
                &instance,
                ExtremalSide::ProposerOptimal,
                &mut InterruptMonitor::new(&flag),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            EnumerationError::IncompleteEnumeration { .. }
        ));
    }
}
