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

//! # Lexicographic Permutation Machinery
//!
//! Checked factorials, in-place lexicographic successor computation,
//! factorial-number-system unranking, and the `Permutations` iterator used
//! to walk (a range of) the permutation space of `0..n` in a fixed,
//! reproducible order.
//!
//! ## Motivation
//!
//! Exhaustive matching enumeration visits all `n!` assignments. Workers
//! sharding that space need two things: a total order on permutations that
//! is identical across runs, and the ability to seek directly to the k-th
//! permutation without stepping through the first k. Lexicographic order
//! plus factorial unranking provides both.
//!
//! ## Highlights
//!
//! - `factorial(n)` returns `None` instead of overflowing `u64` (n > 20).
//! - `unrank(n, rank)` builds the rank-th permutation in O(n²).
//! - `Permutations::new(n)` walks the full space from the identity;
//!   `Permutations::range(n, start, end)` walks the half-open rank range
//!   `[start, end)`, the sharding primitive.
//! - `ExactSizeIterator`: the number of remaining permutations is known.

/// Computes `n!` as a `u64`, or `None` if the result would overflow.
///
/// # Examples
///
/// ```rust
/// # use troth_core::algorithm::permutation::factorial;
///
/// assert_eq!(factorial(0), Some(1));
/// assert_eq!(factorial(5), Some(120));
/// assert_eq!(factorial(21), None);
/// ```
#[inline]
pub fn factorial(n: usize) -> Option<u64> {
    let mut acc: u64 = 1;
    for k in 2..=n as u64 {
        acc = acc.checked_mul(k)?;
    }
    Some(acc)
}

/// Advances `perm` to its lexicographic successor in place.
///
/// Returns `false` (leaving `perm` reversed back to the lexicographically
/// smallest arrangement of its elements) if `perm` was the last permutation.
///
/// # Examples
///
/// ```rust
/// # use troth_core::algorithm::permutation::next_permutation;
///
/// let mut perm = vec![0, 1, 2];
/// assert!(next_permutation(&mut perm));
/// assert_eq!(perm, vec![0, 2, 1]);
///
/// let mut last = vec![2, 1, 0];
/// assert!(!next_permutation(&mut last));
/// ```
pub fn next_permutation(perm: &mut [usize]) -> bool {
    if perm.len() < 2 {
        return false;
    }

    // Longest non-increasing suffix; its predecessor is the pivot.
    let mut i = perm.len() - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        perm.reverse();
        return false;
    }
    let pivot = i - 1;

    // Rightmost element strictly greater than the pivot.
    let mut j = perm.len() - 1;
    while perm[j] <= perm[pivot] {
        j -= 1;
    }
    perm.swap(pivot, j);
    perm[i..].reverse();
    true
}

/// Builds the `rank`-th permutation of `0..n` in lexicographic order using
/// the factorial number system.
///
/// # Panics
///
/// Panics if `n > 20` (factorials beyond `20!` overflow `u64`) or if
/// `rank >= n!`.
///
/// # Examples
///
/// ```rust
/// # use troth_core::algorithm::permutation::unrank;
///
/// assert_eq!(unrank(3, 0), vec![0, 1, 2]);
/// assert_eq!(unrank(3, 5), vec![2, 1, 0]);
/// ```
pub fn unrank(n: usize, rank: u64) -> Vec<usize> {
    let total = factorial(n)
        .unwrap_or_else(|| panic!("called `unrank` with n = {} exceeding factorial range", n));
    assert!(
        rank < total,
        "called `unrank` with rank out of bounds: the space holds {} permutations but the rank is {}",
        total,
        rank
    );

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut perm = Vec::with_capacity(n);
    let mut rank = rank;
    for k in (1..=n).rev() {
        // Factorial of the suffix length cannot overflow here since n! did not.
        let block = factorial(k - 1).unwrap_or(1);
        let pick = (rank / block) as usize;
        rank %= block;
        perm.push(remaining.remove(pick));
    }
    perm
}

/// An iterator over permutations of `0..n` in lexicographic order.
///
/// Yields owned `Vec<usize>` values; cloning per item keeps the API simple
/// and is negligible next to the factorial cost of walking the space.
///
/// # Examples
///
/// ```rust
/// # use troth_core::algorithm::permutation::Permutations;
///
/// let perms: Vec<Vec<usize>> = Permutations::new(3).collect();
/// assert_eq!(perms.len(), 6);
/// assert_eq!(perms[0], vec![0, 1, 2]);
/// assert_eq!(perms[5], vec![2, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Permutations {
    current: Vec<usize>,
    remaining: u64,
}

impl Permutations {
    /// Creates an iterator over all `n!` permutations of `0..n`, starting
    /// at the identity.
    ///
    /// # Panics
    ///
    /// Panics if `n > 20` (the permutation count overflows `u64`).
    #[inline]
    pub fn new(n: usize) -> Self {
        let total = factorial(n).unwrap_or_else(|| {
            panic!(
                "called `Permutations::new` with n = {} exceeding factorial range",
                n
            )
        });
        Self {
            current: (0..n).collect(),
            remaining: total,
        }
    }

    /// Creates an iterator over the half-open lexicographic rank range
    /// `[start, end)` of the permutations of `0..n`.
    ///
    /// This is the sharding primitive: a worker assigned ranks
    /// `[start, end)` seeks directly to its first permutation via
    /// `unrank` and then steps lexicographically.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`, if `end > n!`, or if `n > 20`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use troth_core::algorithm::permutation::Permutations;
    ///
    /// let shard: Vec<Vec<usize>> = Permutations::range(3, 2, 4).collect();
    /// assert_eq!(shard, vec![vec![1, 0, 2], vec![1, 2, 0]]);
    /// ```
    #[inline]
    pub fn range(n: usize, start: u64, end: u64) -> Self {
        let total = factorial(n).unwrap_or_else(|| {
            panic!(
                "called `Permutations::range` with n = {} exceeding factorial range",
                n
            )
        });
        assert!(
            start <= end && end <= total,
            "called `Permutations::range` with invalid rank range: [{}, {}) over a space of {}",
            start,
            end,
            total
        );

        let current = if start == total {
            // Empty tail range; the starting arrangement never gets yielded.
            (0..n).collect()
        } else {
            unrank(n, start)
        };
        Self {
            current,
            remaining: end - start,
        }
    }

    /// Returns the number of permutations not yet yielded.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.current.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            let advanced = next_permutation(&mut self.current);
            debug_assert!(
                advanced,
                "`Permutations` exhausted the space with {} ranks still remaining",
                self.remaining
            );
        }
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // The enumerator guards sizes well below usize::MAX permutations.
        let len = self.remaining as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Permutations {}

impl std::iter::FusedIterator for Permutations {}
