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

//! # Sharded Orchestrating Solver
//!
//! A high-level orchestrator over the two engines of the workspace: the
//! sequential deferred-acceptance engine and the exhaustive enumerator,
//! whose permutation space is sharded across worker threads with global
//! termination criteria enforced via pluggable monitors (interrupt, time
//! limit, stable-matching limit).
//!
//! ## Motivation
//!
//! Deferred acceptance answers "give me a stable matching" in O(n²), but
//! certifying global extremal properties (every proposer's best stable
//! partner, every receiver's worst) requires the full stable set, and the
//! n! enumeration behind it is embarrassingly parallel: each permutation is
//! checked independently against the read-only instance.
//!
//! ## Highlights
//!
//! - Sharded execution:
//!   - Split `0..n!` into contiguous rank ranges, one per worker, and spawn
//!     each worker with `std::thread::scope`.
//!   - Build a `CompositeMonitor` per thread with interrupt,
//!     stable-matching-limit, and optional time-limit monitors.
//! - Shared state:
//!   - `AtomicBool` stop signal observed by every worker's interrupt monitor.
//!   - `AtomicU64` global stable count backing the matching-limit monitor.
//! - Determinism:
//!   - Shard results are concatenated in rank order, so an exhausted
//!     parallel run returns exactly the sequential enumeration order.
//! - Builder pattern:
//!   - `SolverBuilder` to configure thread count, time limit, matching
//!     limit, and the enumeration size threshold.
//!
//! ## Usage
//!
//! ```rust
//! use troth_model::generator::InstanceGenerator;
//! use troth_solver::solver::SolverBuilder;
//!
//! let instance = InstanceGenerator::new(5).with_seed(7).generate();
//! let mut solver = SolverBuilder::new().with_num_threads(2).build();
//!
//! let matching = solver.run_gale_shapley(&instance);
//! assert!(matching.is_complete());
//!
//! let outcome = solver.stable_matchings(&instance).unwrap();
//! assert!(!outcome.stable().is_empty());
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use troth_da::engine::{DaOutcome, DaSolver};
use troth_enum::{
    enumerate::{
        AllMatchings, EnumerationError, EnumerationOutcome, Enumerator, ShardOutcome,
        DEFAULT_SIZE_LIMIT,
    },
    extremal::{reduce_extremal, ExtremalSide},
};
use troth_model::{
    instance::Instance,
    matching::{Matching, Pair},
};
use troth_search::{
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor,
        matching_limit::MatchingLimitMonitor, time_limit::TimeLimitMonitor,
    },
    result::TerminationReason,
    stats::EnumerationStatisticsBuilder,
};

/// Splits `0..total` into at most `workers` contiguous, non-empty ranges.
fn partition_ranks(total: u64, workers: usize) -> Vec<(u64, u64)> {
    if total == 0 {
        return Vec::new();
    }

    let workers = (workers as u64).clamp(1, total);
    let chunk = total / workers;
    let remainder = total % workers;

    let mut ranges = Vec::with_capacity(workers as usize);
    let mut start = 0;
    for w in 0..workers {
        let len = chunk + u64::from(w < remainder);
        ranges.push((start, start + len));
        start += len;
    }
    debug_assert_eq!(start, total, "rank partition does not cover the space");
    ranges
}

/// The orchestrating solver: deferred acceptance plus sharded enumeration
/// behind one configuration.
pub struct Solver {
    da: DaSolver,
    enumerator: Enumerator,
    num_threads: Option<usize>,
    time_limit: Option<std::time::Duration>,
    matching_limit: Option<u64>,
    /// Shared flag to signal all enumeration workers to stop.
    stop_signal: AtomicBool,
    /// Global count of stable matchings found across all workers.
    stable_count: AtomicU64,
}

impl Solver {
    /// Runs the deferred-acceptance engine and returns the complete, stable,
    /// proposer-optimal matching.
    #[inline]
    pub fn run_gale_shapley(&mut self, instance: &Instance) -> Matching {
        self.da.solve(instance).into_matching()
    }

    /// Runs the deferred-acceptance engine and returns the full outcome,
    /// including engine statistics.
    #[inline]
    pub fn run_deferred_acceptance(&mut self, instance: &Instance) -> DaOutcome {
        self.da.solve(instance)
    }

    /// Returns an iterator over all `n!` complete matchings of `instance`.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::SizeLimitExceeded` if the instance exceeds
    /// the configured size threshold.
    #[inline]
    pub fn all_matchings(&self, instance: &Instance) -> Result<AllMatchings, EnumerationError> {
        self.enumerator.all_matchings(instance)
    }

    /// Enumerates all stable matchings of `instance`, sharding the
    /// permutation space across worker threads.
    ///
    /// Workers share no mutable state beyond the read-only instance, the
    /// stop signal, and the global stable count; each accumulates its own
    /// stable subset, and the shards are concatenated in rank order so an
    /// exhausted run reproduces the sequential enumeration order exactly.
    ///
    /// # Errors
    ///
    /// Returns `EnumerationError::SizeLimitExceeded` above the size
    /// threshold, and `EnumerationError::NoStableMatching` if a complete
    /// run finds no stable matching (an internal consistency violation; the
    /// existence theorem guarantees at least one).
    pub fn stable_matchings(
        &self,
        instance: &Instance,
    ) -> Result<EnumerationOutcome, EnumerationError> {
        let total = self.enumerator.permutation_count(instance)?;
        let start_time = std::time::Instant::now();

        // Reset shared state for this run.
        self.stop_signal.store(false, Ordering::Relaxed);
        self.stable_count.store(0, Ordering::Relaxed);

        let shards = partition_ranks(total, self.worker_count(total));
        let results = self.run_shards_parallel(instance, &shards);

        self.construct_outcome(start_time, results)
    }

    /// Computes one extremal pair per participant on `side`: each
    /// proposer's best stable partner (proposer-optimal) or each receiver's
    /// worst (receiver-pessimal), sorted by that participant's index.
    ///
    /// For `ExtremalSide::ProposerOptimal` the result, taken as a matching,
    /// equals the Gale-Shapley output pair-for-pair.
    ///
    /// # Errors
    ///
    /// Everything `stable_matchings` returns, plus
    /// `EnumerationError::IncompleteEnumeration` if a monitor ended the
    /// enumeration early; a partial stable set cannot certify extremality.
    pub fn compute_extremal_pairs(
        &self,
        instance: &Instance,
        side: ExtremalSide,
    ) -> Result<Vec<Pair>, EnumerationError> {
        let outcome = self.stable_matchings(instance)?;
        if let TerminationReason::Aborted(reason) = outcome.reason() {
            return Err(EnumerationError::IncompleteEnumeration {
                reason: reason.clone(),
            });
        }

        reduce_extremal(instance, outcome.stable(), side)
    }

    /// Signals all enumeration workers to stop at their next permutation
    /// boundary. Safe to call from another thread holding a shared
    /// reference to the solver.
    #[inline]
    pub fn request_stop(&self) {
        self.stop_signal.store(true, Ordering::Relaxed);
    }

    /// Returns the configured enumeration size threshold.
    #[inline]
    pub fn size_limit(&self) -> usize {
        self.enumerator.size_limit()
    }

    fn worker_count(&self, total: u64) -> usize {
        let available = self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        available.max(1).min(total.max(1) as usize)
    }

    /// Internal helper to spawn worker threads and collect shard results.
    fn run_shards_parallel(
        &self,
        instance: &Instance,
        shards: &[(u64, u64)],
    ) -> Vec<ShardOutcome> {
        // Capture references for threads
        let enumerator = &self.enumerator;
        let stop_signal = &self.stop_signal;
        let stable_count = &self.stable_count;
        let time_limit = self.time_limit;
        let matching_limit = self.matching_limit;

        let mut results = Vec::with_capacity(shards.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(shards.len());

            for &(start_rank, end_rank) in shards {
                let handle = scope.spawn(move || {
                    // 1. Build the monitor stack. Always add the interrupt
                    // monitor so this worker can be stopped externally.
                    let mut monitor = CompositeMonitor::new();
                    monitor.add_monitor(InterruptMonitor::new(stop_signal));

                    if let Some(limit) = matching_limit {
                        monitor.add_monitor(MatchingLimitMonitor::new(stable_count, limit));
                    }
                    if let Some(limit) = time_limit {
                        monitor.add_monitor(TimeLimitMonitor::new(limit));
                    }

                    // 2. Enumerate this worker's rank range.
                    enumerator.enumerate_range(instance, start_rank, end_rank, &mut monitor)
                });
                handles.push(handle);
            }

            for handle in handles {
                let shard = handle
                    .join()
                    .expect("enumeration worker thread panicked")
                    .expect("size threshold was checked before spawning workers");
                results.push(shard);
            }
        });

        results
    }

    fn construct_outcome(
        &self,
        start_time: std::time::Instant,
        results: Vec<ShardOutcome>,
    ) -> Result<EnumerationOutcome, EnumerationError> {
        let used_threads = results.len().max(1);

        let mut stable = Vec::new();
        let mut enumerated: u64 = 0;
        let mut abort_reason: Option<String> = None;

        // Results arrive in shard order; simple concatenation preserves the
        // lexicographic enumeration order.
        for shard in results {
            let (shard_stable, shard_enumerated, reason) = shard.into_parts();
            stable.extend(shard_stable);
            enumerated += shard_enumerated;
            if let TerminationReason::Aborted(message) = reason {
                abort_reason.get_or_insert(message);
            }
        }

        let reason = match abort_reason {
            Some(message) => TerminationReason::Aborted(message),
            None => TerminationReason::Exhausted,
        };

        if reason.is_exhausted() && stable.is_empty() {
            return Err(EnumerationError::NoStableMatching);
        }

        let statistics = EnumerationStatisticsBuilder::new()
            .matchings_enumerated(enumerated)
            .stable_found(stable.len() as u64)
            .used_threads(used_threads)
            .enumeration_duration(start_time.elapsed())
            .build();

        Ok(EnumerationOutcome::new(stable, reason, statistics))
    }
}

/// Builder for [`Solver`].
pub struct SolverBuilder {
    num_threads: Option<usize>,
    time_limit: Option<std::time::Duration>,
    matching_limit: Option<u64>,
    size_limit: usize,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            num_threads: None,
            time_limit: None,
            matching_limit: None,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }

    /// Fixes the number of enumeration worker threads. Defaults to the
    /// available parallelism.
    #[inline]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Caps the wall-clock time of an enumeration run.
    #[inline]
    pub fn with_time_limit(mut self, limit: std::time::Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops the enumeration once this many stable matchings have been
    /// found globally across all workers.
    #[inline]
    pub fn with_matching_limit(mut self, limit: u64) -> Self {
        self.matching_limit = Some(limit);
        self
    }

    /// Overrides the enumeration size threshold.
    #[inline]
    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = size_limit;
        self
    }

    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            da: DaSolver::new(),
            enumerator: Enumerator::with_size_limit(self.size_limit),
            num_threads: self.num_threads,
            time_limit: self.time_limit,
            matching_limit: self.matching_limit,
            stop_signal: AtomicBool::new(false),
            stable_count: AtomicU64::new(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use troth_model::generator::InstanceGenerator;
    use troth_search::monitor::no_op::NoOpMonitor;

    #[test]
    fn test_partition_ranks_covers_space_without_gaps() {
        for (total, workers) in [(24u64, 4usize), (25, 4), (5, 8), (1, 1), (120, 7)] {
            let ranges = partition_ranks(total, workers);
            assert!(!ranges.is_empty());
            assert!(ranges.len() <= workers);

            let mut expected_start = 0;
            for &(start, end) in &ranges {
                assert_eq!(start, expected_start);
                assert!(end > start, "empty shard in {:?}", ranges);
                expected_start = end;
            }
            assert_eq!(expected_start, total);
        }
    }

    #[test]
    fn test_partition_ranks_empty_space() {
        assert!(partition_ranks(0, 4).is_empty());
    }

    #[test]
    fn test_gale_shapley_two_by_two_scenario() {
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let mut solver = SolverBuilder::new().build();
        let matching = solver.run_gale_shapley(&instance);
        assert_eq!(format!("{}", matching), "(0, 0) (1, 1)");

        let outcome = solver.stable_matchings(&instance).unwrap();
        assert_eq!(outcome.stable().len(), 2);
        assert_eq!(outcome.statistics().matchings_enumerated, 2);
    }

    #[test]
    fn test_parallel_run_equals_sequential_enumeration() {
        let instance = InstanceGenerator::new(6).with_seed(31).generate();

        let solver = SolverBuilder::new().with_num_threads(4).build();
        let parallel = solver.stable_matchings(&instance).unwrap();

        let sequential = Enumerator::new()
            .stable_matchings(&instance, &mut NoOpMonitor::new())
            .unwrap();

        assert!(parallel.reason().is_exhausted());
        assert_eq!(parallel.stable(), sequential.stable());
        assert_eq!(
            parallel.statistics().matchings_enumerated,
            sequential.statistics().matchings_enumerated
        );
    }

    #[test]
    fn test_extremal_pairs_match_gale_shapley() {
        for seed in [0, 7, 42] {
            let instance = InstanceGenerator::new(6).with_seed(seed).generate();
            let mut solver = SolverBuilder::new().with_num_threads(3).build();

            let pairs = solver
                .compute_extremal_pairs(&instance, ExtremalSide::ProposerOptimal)
                .unwrap();
            let matching = solver.run_gale_shapley(&instance);

            assert_eq!(pairs, matching.pairs(), "divergence at seed {}", seed);
        }
    }

    #[test]
    fn test_size_limit_is_propagated() {
        let instance = InstanceGenerator::new(6).with_seed(1).generate();
        let solver = SolverBuilder::new().with_size_limit(5).build();

        let err = solver.stable_matchings(&instance).unwrap_err();
        assert_eq!(
            err,
            EnumerationError::SizeLimitExceeded { size: 6, limit: 5 }
        );
    }

    #[test]
    fn test_pre_set_stop_signal_is_reset_per_run() {
        let instance = InstanceGenerator::new(4).with_seed(9).generate();
        let solver = SolverBuilder::new().with_num_threads(2).build();

        // A stop requested before the run must not poison the next run;
        // stable_matchings resets the signal on entry.
        solver.request_stop();
        let outcome = solver.stable_matchings(&instance).unwrap();
        assert!(outcome.reason().is_exhausted());
    }

    #[test]
    fn test_matching_limit_aborts_early() {
        // 2x2 instance where both matchings are stable; a limit of 1 stops
        // the run after the first one.
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let solver = SolverBuilder::new()
            .with_num_threads(1)
            .with_matching_limit(1)
            .build();

        let outcome = solver.stable_matchings(&instance).unwrap();
        assert_eq!(outcome.stable().len(), 1);
        assert!(matches!(
            outcome.reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_extremal_over_aborted_run_is_an_error() {
        // A zero time limit terminates every worker at its first command
        // check, before any permutation is visited.
        let instance = InstanceGenerator::new(5).with_seed(3).generate();
        let solver = SolverBuilder::new()
            .with_num_threads(2)
            .with_time_limit(std::time::Duration::ZERO)
            .build();

        let err = solver
            .compute_extremal_pairs(&instance, ExtremalSide::ProposerOptimal)
            .unwrap_err();
        assert!(matches!(
            err,
            EnumerationError::IncompleteEnumeration { .. }
        ));
    }

    #[test]
    fn test_single_participant_instance() {
        let instance = Instance::new(vec![vec![0]], vec![vec![0]]).unwrap();
        let mut solver = SolverBuilder::new().build();

        let matching = solver.run_gale_shapley(&instance);
        assert_eq!(format!("{}", matching), "(0, 0)");

        let outcome = solver.stable_matchings(&instance).unwrap();
        assert_eq!(outcome.stable().len(), 1);
    }
}
