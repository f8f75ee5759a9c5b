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

//! # Troth Model
//!
//! **The Core Domain Model for the Troth Stable Matching Solver.**
//!
//! This crate defines the fundamental data structures used to represent the
//! **Stable Matching Problem** (Gale-Shapley's stable marriage setting): two
//! equal-size disjoint groups, proposers and receivers, each member ranking
//! every member of the opposite group by strict preference. It serves as the
//! data interchange layer between the problem definition (user input) and the
//! solving engines (`troth_da`, `troth_enum`).
//!
//! ## Architecture
//!
//! The crate is designed around a strict separation of concerns between
//! **construction** and **solving**:
//!
//! * **`index`**: Provides strongly-typed wrappers (`ProposerIndex`,
//!   `ReceiverIndex`) to prevent logical indexing errors.
//! * **`preference`**: Flattened rank storage with a precomputed inverse-rank
//!   table so "does X prefer A over B" answers in O(1).
//! * **`instance`**: The immutable, eagerly validated `Instance` holding both
//!   groups' preference tables.
//! * **`matching`**: A partial-to-complete bijection under construction,
//!   backed by two synchronized partner maps for O(1) lookup from either side.
//! * **`generator`**: Seeded random instance generation for tests, benchmarks,
//!   and demos.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Indices are distinct types. You cannot accidentally
//!     use a `ProposerIndex` to look up a receiver.
//! 2.  **Memory Layout**: Preference data is stored in flattened vectors
//!     rather than nested ones to maximize cache locality during search.
//! 3.  **Fail-Fast**: Constructors validate inputs eagerly so the engines
//!     never encounter an invalid instance mid-run.

pub mod generator;
pub mod index;
pub mod instance;
pub mod matching;
pub mod preference;
