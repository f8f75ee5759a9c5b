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

//! Deferred-acceptance solver for the Stable Matching Problem.
//!
//! This module implements a stateful engine that runs the Gale-Shapley
//! procedure. The `DaSolver` manages reusable internal structures (the
//! per-proposer proposal cursors and the FIFO queue of unmatched proposers),
//! and a fast `reset` keeps capacities while clearing per-run state, so one
//! engine can serve repeated solves without memory churn.
//!
//! Receivers tentatively hold the best offer received so far and trade up
//! only for a strictly preferred proposer; a displaced proposer re-enters
//! the queue and continues down its own rank list. Since each proposer
//! proposes to each receiver at most once, the loop performs at most n²
//! proposal steps and always terminates. The design emphasizes determinism:
//! the queue starts in ascending index order and every displacement is
//! resolved immediately, so an unmodified instance always yields the same
//! matching.

use std::collections::VecDeque;
use troth_model::{
    index::{ProposerIndex, ReceiverIndex},
    instance::Instance,
    matching::Matching,
};

/// Statistics collected during a deferred-acceptance run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaSolverStatistics {
    /// Total proposals made across all proposers.
    pub proposals: u64,
    /// Number of tentative matches broken in favor of a preferred proposer.
    pub displacements: u64,
    /// Total time spent in the solver.
    pub time_total: std::time::Duration,
}

impl DaSolverStatistics {
    #[inline]
    fn on_proposal(&mut self) {
        self.proposals = self.proposals.saturating_add(1);
    }

    #[inline]
    fn on_displacement(&mut self) {
        self.displacements = self.displacements.saturating_add(1);
    }
}

impl std::fmt::Display for DaSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Deferred Acceptance Statistics:")?;
        writeln!(f, "  Proposals: {}", self.proposals)?;
        writeln!(f, "  Displacements: {}", self.displacements)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.time_total.as_secs_f64()
        )
    }
}

/// Result of a deferred-acceptance run: the stable matching plus statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaOutcome {
    matching: Matching,
    statistics: DaSolverStatistics,
}

impl DaOutcome {
    /// Returns the computed matching.
    #[inline]
    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &DaSolverStatistics {
        &self.statistics
    }

    /// Consumes the outcome, returning the matching.
    #[inline]
    pub fn into_matching(self) -> Matching {
        self.matching
    }
}

/// The deferred-acceptance (Gale-Shapley) engine.
///
/// Reuses its cursor and queue storage across solves. The engine holds no
/// instance data; each call to [`DaSolver::solve`] borrows the instance
/// read-only and returns a fresh matching.
///
/// # Examples
///
/// ```rust
/// # use troth_da::engine::DaSolver;
/// # use troth_model::instance::Instance;
///
/// let instance = Instance::new(
///     vec![vec![0, 1], vec![1, 0]],
///     vec![vec![0, 1], vec![1, 0]],
/// )
/// .unwrap();
///
/// let mut solver = DaSolver::new();
/// let outcome = solver.solve(&instance);
/// assert!(outcome.matching().is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DaSolver {
    /// `cursors[p]`: the rank slot proposer `p` proposes to next.
    cursors: Vec<usize>,
    /// FIFO queue of currently unmatched proposers.
    queue: VecDeque<ProposerIndex>,
}

impl DaSolver {
    /// Creates a new engine instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            cursors: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Creates a new engine with preallocated storage for instances of the
    /// given size.
    ///
    /// # Note
    ///
    /// The engine grows its storage on demand either way; preallocation only
    /// moves the allocation cost to construction time.
    #[inline]
    pub fn preallocated(size: usize) -> Self {
        Self {
            cursors: Vec::with_capacity(size),
            queue: VecDeque::with_capacity(size),
        }
    }

    /// Runs deferred acceptance on `instance` and returns the resulting
    /// complete, stable, proposer-optimal matching with statistics.
    ///
    /// The instance is well-formed by construction (`Instance::new`
    /// validates eagerly), so no precondition can fail here; the engine is
    /// deterministic and repeated calls on an unmodified instance return the
    /// same matching.
    pub fn solve(&mut self, instance: &Instance) -> DaOutcome {
        let start_time = std::time::Instant::now();
        let n = instance.size();
        self.reset(n);

        let mut matching = Matching::new(n);
        let mut statistics = DaSolverStatistics::default();

        while let Some(p) = self.queue.pop_front() {
            let cursor = self.cursors[p.get()];
            debug_assert!(
                cursor < n,
                "proposer {} exhausted its rank list while unmatched; instance invariant violated",
                p.get()
            );

            // Propose to the next receiver on p's list; never repeat a proposal.
            let r = ReceiverIndex::new(instance.proposer_rank(p)[cursor]);
            self.cursors[p.get()] = cursor + 1;
            statistics.on_proposal();

            match matching.proposer_of(r) {
                None => {
                    // r is free and tentatively holds the offer.
                    matching.add_pair(p, r);
                }
                Some(q) => {
                    if instance.receiver_prefers(r, p, q) {
                        // r trades up; q re-enters the queue.
                        matching.remove_pair(q, r);
                        matching.add_pair(p, r);
                        self.queue.push_back(q);
                        statistics.on_displacement();
                    } else {
                        // Rejected; p tries its next-preferred receiver later.
                        self.queue.push_back(p);
                    }
                }
            }
        }

        debug_assert!(
            matching.is_complete(),
            "deferred acceptance ended with {} of {} pairs matched",
            matching.len(),
            n
        );

        statistics.time_total = start_time.elapsed();
        DaOutcome {
            matching,
            statistics,
        }
    }

    /// Clears per-run state, keeping allocated capacity.
    fn reset(&mut self, size: usize) {
        self.cursors.clear();
        self.cursors.resize(size, 0);
        self.queue.clear();
        self.queue.extend((0..size).map(ProposerIndex::new));
    }
}
