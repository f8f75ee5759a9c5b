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

use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
use std::sync::atomic::{AtomicU64, Ordering};
use troth_model::{instance::Instance, matching::Matching};

/// A monitor that terminates the search when a specified number of stable
/// matchings has been found. The count is kept in an atomic shared across
/// all enumeration workers, so the limit is global rather than per-shard.
#[derive(Debug)]
pub struct MatchingLimitMonitor<'a> {
    matchings_found: &'a AtomicU64,
    matching_limit: u64,
}

impl<'a> MatchingLimitMonitor<'a> {
    /// Creates a new `MatchingLimitMonitor`.
    #[inline]
    pub fn new(matchings_found: &'a AtomicU64, matching_limit: u64) -> Self {
        Self {
            matchings_found,
            matching_limit,
        }
    }

    /// Checks if the matching limit has been reached.
    #[inline]
    fn reached_limit(&self) -> bool {
        self.matchings_found.load(Ordering::Relaxed) >= self.matching_limit
    }
}

impl<'a> SearchMonitor for MatchingLimitMonitor<'a> {
    fn name(&self) -> &str {
        "MatchingLimitMonitor"
    }

    fn on_enter_search(&mut self, _instance: &Instance) {}

    fn on_exit_search(&mut self) {}

    fn on_matching_found(&mut self, _matching: &Matching) {
        self.matchings_found.fetch_add(1, Ordering::Relaxed);
    }

    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("global stable matching limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MatchingLimitMonitor;
    use crate::monitor::search_monitor::{SearchCommand, SearchMonitor};
    use std::sync::atomic::AtomicU64;
    use troth_model::matching::Matching;

    fn dummy_matching() -> Matching {
        // The monitor only counts; the contents are irrelevant.
        Matching::new(0)
    }

    #[test]
    fn test_continue_before_limit_and_terminate_at_limit() {
        let counter = AtomicU64::new(0);
        let limit = 3;
        let mut monitor = MatchingLimitMonitor::new(&counter, limit);

        // Before any matching, command is Continue
        assert!(matches!(monitor.search_command(), SearchCommand::Continue));

        // Feed 2 matchings (< limit)
        monitor.on_matching_found(&dummy_matching());
        assert!(matches!(monitor.search_command(), SearchCommand::Continue));

        monitor.on_matching_found(&dummy_matching());
        assert!(matches!(monitor.search_command(), SearchCommand::Continue));

        // Hitting the limit
        monitor.on_matching_found(&dummy_matching());
        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(_)
        ));

        // Further calls still report Terminate
        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_shared_counter_across_monitors() {
        let counter = AtomicU64::new(0);
        let mut first = MatchingLimitMonitor::new(&counter, 2);
        let mut second = MatchingLimitMonitor::new(&counter, 2);

        first.on_matching_found(&dummy_matching());
        second.on_matching_found(&dummy_matching());

        // Both observe the global count.
        assert!(matches!(first.search_command(), SearchCommand::Terminate(_)));
        assert!(matches!(
            second.search_command(),
            SearchCommand::Terminate(_)
        ));
    }
}
