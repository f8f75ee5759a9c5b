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

//! Extremal reduction over a set of stable matchings.
//!
//! The stable matchings of an instance form a lattice: the proposer-optimal
//! matching assigns every proposer their best stable partner simultaneously,
//! and dually the receiver-pessimal matching assigns every receiver their
//! worst. Scanning the full stable set and keeping, per participant, the
//! best (or worst) partner seen therefore yields a coherent matching, and
//! for the proposer side it must equal the deferred-acceptance output
//! pair-for-pair, which the test suite checks as a first-class property.

use crate::enumerate::EnumerationError;
use troth_model::{
    index::{ProposerIndex, ReceiverIndex},
    instance::Instance,
    matching::{Matching, Pair},
};

/// Which extremal pairing to reduce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtremalSide {
    /// Each proposer's most-preferred partner across all stable matchings.
    ProposerOptimal,
    /// Each receiver's least-preferred partner across all stable matchings.
    ReceiverPessimal,
}

impl std::fmt::Display for ExtremalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtremalSide::ProposerOptimal => write!(f, "proposer-optimal"),
            ExtremalSide::ReceiverPessimal => write!(f, "receiver-pessimal"),
        }
    }
}

/// Reduces a complete stable set to one pair per participant on `side`,
/// sorted by that participant's index.
///
/// "No candidate yet" is modeled as an explicit `Option`, never a sentinel
/// index, so index 0 needs no special casing.
///
/// # Errors
///
/// Returns `EnumerationError::NoStableMatching` if `stable` is empty. The
/// existence theorem guarantees at least one stable matching for every
/// well-formed instance, so an empty set is an internal defect.
///
/// # Panics
///
/// In debug builds, panics if a matching in `stable` is incomplete.
pub fn reduce_extremal(
    instance: &Instance,
    stable: &[Matching],
    side: ExtremalSide,
) -> Result<Vec<Pair>, EnumerationError> {
    if stable.is_empty() {
        return Err(EnumerationError::NoStableMatching);
    }

    match side {
        ExtremalSide::ProposerOptimal => Ok(proposer_optimal_pairs(instance, stable)),
        ExtremalSide::ReceiverPessimal => Ok(receiver_pessimal_pairs(instance, stable)),
    }
}

fn proposer_optimal_pairs(instance: &Instance, stable: &[Matching]) -> Vec<Pair> {
    let n = instance.size();
    let mut pairs = Vec::with_capacity(n);

    for p in (0..n).map(ProposerIndex::new) {
        let mut best: Option<ReceiverIndex> = None;
        for matching in stable {
            let r = partner_of_proposer(matching, p);
            best = Some(match best {
                None => r,
                Some(b) if instance.proposer_prefers(p, r, b) => r,
                Some(b) => b,
            });
        }
        // stable is non-empty, so a candidate always exists.
        if let Some(r) = best {
            pairs.push(Pair::new(p, r));
        }
    }
    pairs
}

fn receiver_pessimal_pairs(instance: &Instance, stable: &[Matching]) -> Vec<Pair> {
    let n = instance.size();
    let mut pairs = Vec::with_capacity(n);

    for r in (0..n).map(ReceiverIndex::new) {
        let mut worst: Option<ProposerIndex> = None;
        for matching in stable {
            let p = partner_of_receiver(matching, r);
            worst = Some(match worst {
                None => p,
                Some(w) if instance.receiver_prefers(r, w, p) => p,
                Some(w) => w,
            });
        }
        if let Some(p) = worst {
            pairs.push(Pair::new(p, r));
        }
    }
    pairs
}

fn partner_of_proposer(matching: &Matching, p: ProposerIndex) -> ReceiverIndex {
    match matching.receiver_of(p) {
        Some(r) => r,
        None => panic!(
            "called `reduce_extremal` with an incomplete matching: proposer {} is unmatched",
            p.get()
        ),
    }
}

fn partner_of_receiver(matching: &Matching, r: ReceiverIndex) -> ProposerIndex {
    match matching.proposer_of(r) {
        Some(p) => p,
        None => panic!(
            "called `reduce_extremal` with an incomplete matching: receiver {} is unmatched",
            r.get()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::Enumerator;
    use troth_da::engine::DaSolver;
    use troth_model::generator::InstanceGenerator;
    use troth_search::monitor::no_op::NoOpMonitor;

    fn pi(i: usize) -> ProposerIndex {
        ProposerIndex::new(i)
    }

    fn ri(i: usize) -> ReceiverIndex {
        ReceiverIndex::new(i)
    }

    fn stable_set(instance: &Instance) -> Vec<Matching> {
        Enumerator::new()
            .stable_matchings(instance, &mut NoOpMonitor::new())
            .unwrap()
            .into_stable()
    }

    #[test]
    fn test_empty_stable_set_is_an_internal_error() {
        let instance = InstanceGenerator::new(3).with_seed(0).generate();
        let err = reduce_extremal(&instance, &[], ExtremalSide::ProposerOptimal).unwrap_err();
        assert_eq!(err, EnumerationError::NoStableMatching);
    }

    #[test]
    fn test_two_by_two_proposer_optimal() {
        // Proposers disagree on their favorite, so both get it: the
        // proposer-optimal matching is {(0,0), (1,1)}.
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let stable = stable_set(&instance);
        assert_eq!(stable.len(), 2);

        let pairs =
            reduce_extremal(&instance, &stable, ExtremalSide::ProposerOptimal).unwrap();
        assert_eq!(pairs, vec![Pair::new(pi(0), ri(0)), Pair::new(pi(1), ri(1))]);
    }

    #[test]
    fn test_two_by_two_receiver_pessimal_equals_proposer_optimal_matching() {
        // In the lattice, the proposer-optimal matching is simultaneously
        // receiver-pessimal.
        let instance = Instance::new(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![1, 0], vec![0, 1]],
        )
        .unwrap();

        let stable = stable_set(&instance);
        let optimal =
            reduce_extremal(&instance, &stable, ExtremalSide::ProposerOptimal).unwrap();
        let pessimal =
            reduce_extremal(&instance, &stable, ExtremalSide::ReceiverPessimal).unwrap();

        let mut pessimal_by_proposer = pessimal.clone();
        pessimal_by_proposer.sort_by_key(|pair| pair.proposer());
        assert_eq!(optimal, pessimal_by_proposer);
    }

    #[test]
    fn test_receiver_pessimal_is_sorted_by_receiver() {
        let instance = InstanceGenerator::new(5).with_seed(13).generate();
        let stable = stable_set(&instance);

        let pairs =
            reduce_extremal(&instance, &stable, ExtremalSide::ReceiverPessimal).unwrap();
        for (i, pair) in pairs.iter().enumerate() {
            assert_eq!(pair.receiver(), ri(i));
        }
    }

    #[test]
    fn test_proposer_optimal_equals_deferred_acceptance() {
        for seed in 0..15 {
            let instance = InstanceGenerator::new(6).with_seed(seed).generate();
            let stable = stable_set(&instance);

            let extremal =
                reduce_extremal(&instance, &stable, ExtremalSide::ProposerOptimal).unwrap();
            let engine = DaSolver::new().solve(&instance).into_matching();

            assert_eq!(
                extremal,
                engine.pairs(),
                "lattice-optimal pairs diverge from deferred acceptance at seed {}",
                seed
            );
        }
    }
}
