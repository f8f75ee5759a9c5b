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

//! # Troth Enum
//!
//! The exhaustive enumerator of the Troth workspace: walks all `n!` complete
//! matchings of an instance in lexicographic permutation order, filters them
//! for stability, and reduces the stable set to extremal pairings
//! (proposer-optimal / receiver-pessimal).
//!
//! Enumeration cost is factorial, inherent to certifying global extremal
//! properties without the lattice-theoretic shortcut, so the enumerator
//! rejects instances above a configurable size threshold instead of silently
//! hanging, and polls a `SearchMonitor` between permutations so runs can be
//! interrupted or time-bounded. Rank-range enumeration (`enumerate_range`)
//! is the sharding primitive the orchestrating solver spreads across worker
//! threads.

pub mod enumerate;
pub mod extremal;
