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

//! # Troth Core
//!
//! Foundational utilities and combinatorial primitives for the Troth
//! stable matching ecosystem. This crate consolidates reusable building
//! blocks that underpin the higher-level model, engine, and solver crates.
//!
//! ## Modules
//!
//! - `algorithm`: Permutation machinery: checked factorials, in-place
//!   lexicographic successor computation, factorial-number-system unranking,
//!   and the `Permutations` iterator used to walk (a range of) the
//!   permutation space in a fixed, reproducible order.
//! - `utils`: Core helpers such as phantom-tagged, strongly typed indices
//!   (`TypedIndex<T>`) that prevent mixing proposer and receiver index
//!   spaces at compile time.
//!
//! ## Purpose
//!
//! These primitives enable robust, index-heavy code in matching pipelines,
//! reducing accidental bugs (e.g., swapping the two sides of a matching)
//! while keeping runtime overhead at zero.
//!
//! Refer to each module for detailed APIs and examples.

pub mod algorithm;
pub mod utils;
