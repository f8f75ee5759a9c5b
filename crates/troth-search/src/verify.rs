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

//! # Stability Verification
//!
//! Decides whether a complete matching is stable and, if not, produces a
//! witness blocking pair.
//!
//! A pair `(p, r)` not matched together blocks a matching when `p` strictly
//! prefers `r` over `p`'s partner AND `r` strictly prefers `p` over `r`'s
//! partner. The scan visits all n² ordered combinations, proposer index
//! ascending then receiver index ascending, and stops at the first blocking
//! pair. The fixed order makes the witness deterministic, which test
//! fixtures rely on.

use troth_model::{
    index::{ProposerIndex, ReceiverIndex},
    instance::Instance,
    matching::{Matching, MatchingError, Pair},
};

/// The outcome of a stability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityReport {
    witness: Option<Pair>,
}

impl StabilityReport {
    /// A report for a stable matching.
    #[inline]
    pub const fn stable() -> Self {
        Self { witness: None }
    }

    /// A report carrying the first blocking pair found.
    #[inline]
    pub const fn unstable(witness: Pair) -> Self {
        Self {
            witness: Some(witness),
        }
    }

    /// Returns `true` if no blocking pair exists.
    #[inline]
    pub const fn is_stable(&self) -> bool {
        self.witness.is_none()
    }

    /// Returns the witness blocking pair, if the matching is unstable.
    #[inline]
    pub const fn blocking_pair(&self) -> Option<Pair> {
        self.witness
    }
}

impl std::fmt::Display for StabilityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.witness {
            None => write!(f, "Stable"),
            Some(pair) => write!(f, "Unstable, blocked by {}", pair),
        }
    }
}

/// Checks complete matchings for stability against an instance.
///
/// Stateless; a single verifier can serve any number of checks, including
/// concurrently from enumeration workers (it borrows everything it reads).
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityVerifier;

impl StabilityVerifier {
    /// Creates a new `StabilityVerifier`.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Decides stability of `matching` under `instance`.
    ///
    /// The matching must be complete; completeness is validated before any
    /// stability logic runs.
    ///
    /// # Errors
    ///
    /// Returns a `MatchingError` if the matching is not a complete
    /// one-to-one correspondence for `instance`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use troth_model::instance::Instance;
    /// # use troth_model::matching::Matching;
    /// # use troth_model::index::{ProposerIndex, ReceiverIndex};
    /// # use troth_search::verify::StabilityVerifier;
    ///
    /// let instance = Instance::new(
    ///     vec![vec![0, 1], vec![1, 0]],
    ///     vec![vec![0, 1], vec![1, 0]],
    /// )
    /// .unwrap();
    ///
    /// let mut matching = Matching::new(2);
    /// matching.add_pair(ProposerIndex::new(0), ReceiverIndex::new(0));
    /// matching.add_pair(ProposerIndex::new(1), ReceiverIndex::new(1));
    ///
    /// let report = StabilityVerifier::new().check(&instance, &matching).unwrap();
    /// assert!(report.is_stable());
    /// ```
    pub fn check(
        &self,
        instance: &Instance,
        matching: &Matching,
    ) -> Result<StabilityReport, MatchingError> {
        matching.validate_complete(instance)?;

        let n = instance.size();
        for p in (0..n).map(ProposerIndex::new) {
            // Completeness was just validated, so both partners exist.
            let p_partner = match matching.receiver_of(p) {
                Some(r) => r,
                None => unreachable!("validated matching lost proposer {}", p.get()),
            };

            for r in (0..n).map(ReceiverIndex::new) {
                let r_partner = match matching.proposer_of(r) {
                    Some(q) => q,
                    None => unreachable!("validated matching lost receiver {}", r.get()),
                };

                let proposer_defects = instance.proposer_prefers(p, r, p_partner);
                let receiver_defects = instance.receiver_prefers(r, p, r_partner);
                if proposer_defects && receiver_defects {
                    return Ok(StabilityReport::unstable(Pair::new(p, r)));
                }
            }
        }

        Ok(StabilityReport::stable())
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

    fn identity_matching(n: usize) -> Matching {
        let mut matching = Matching::new(n);
        for i in 0..n {
            matching.add_pair(pi(i), ri(i));
        }
        matching
    }

    #[test]
    fn test_mutually_first_choices_are_stable() {
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let report = StabilityVerifier::new()
            .check(&instance, &identity_matching(2))
            .unwrap();
        assert!(report.is_stable());
        assert_eq!(report.blocking_pair(), None);
    }

    #[test]
    fn test_forced_blocking_pair_is_reported_in_scan_order() {
        // Proposer 1 prefers receiver 0 over its partner 1, and receiver 0
        // prefers proposer 1 over its partner 0: (1, 0) blocks the identity
        // matching. No pair with a lower proposer index blocks it.
        let instance = Instance::new(
            vec![
                vec![1, 0, 2], // proposer 0 is content only with receiver 1
                vec![0, 1, 2], // proposer 1 wants receiver 0
                vec![2, 0, 1],
            ],
            vec![
                vec![1, 0, 2], // receiver 0 wants proposer 1
                vec![1, 0, 2],
                vec![2, 1, 0],
            ],
        )
        .unwrap();

        let report = StabilityVerifier::new()
            .check(&instance, &identity_matching(3))
            .unwrap();

        assert!(!report.is_stable());
        assert_eq!(report.blocking_pair(), Some(Pair::new(pi(1), ri(0))));
    }

    #[test]
    fn test_repeated_checks_return_identical_witness() {
        let instance = Instance::new(
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![1, 0], vec![0, 1]],
        )
        .unwrap();
        let matching = identity_matching(2);
        let verifier = StabilityVerifier::new();

        let first = verifier.check(&instance, &matching).unwrap();
        let second = verifier.check(&instance, &matching).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_incomplete_matching_is_rejected_before_verification() {
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let mut partial = Matching::new(2);
        partial.add_pair(pi(0), ri(0));

        let err = StabilityVerifier::new()
            .check(&instance, &partial)
            .unwrap_err();
        assert_eq!(err, MatchingError::UnmatchedProposer(pi(1)));
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let instance = Instance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![0, 1], vec![1, 0]],
        )
        .unwrap();

        let err = StabilityVerifier::new()
            .check(&instance, &identity_matching(3))
            .unwrap_err();
        assert!(matches!(err, MatchingError::SizeMismatch { .. }));
    }

    #[test]
    fn test_report_display() {
        assert_eq!(format!("{}", StabilityReport::stable()), "Stable");
        assert_eq!(
            format!("{}", StabilityReport::unstable(Pair::new(pi(1), ri(0)))),
            "Unstable, blocked by (1, 0)"
        );
    }
}
