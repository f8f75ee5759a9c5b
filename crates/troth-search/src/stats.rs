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

/// Statistics collected during an enumeration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationStatistics {
    /// Number of complete matchings visited.
    pub matchings_enumerated: u64,
    /// Number of stable matchings found.
    pub stable_found: u64,
    /// Number of threads used during the run.
    pub used_threads: usize,
    /// Total duration of the run.
    pub enumeration_duration: std::time::Duration,
}

impl std::fmt::Display for EnumerationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Enumeration Statistics:")?;
        writeln!(f, "  Matchings Enumerated: {}", self.matchings_enumerated)?;
        writeln!(f, "  Stable Matchings Found: {}", self.stable_found)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(
            f,
            "  Enumeration Duration (secs): {:.3}",
            self.enumeration_duration.as_secs_f64()
        )
    }
}

/// Builder for `EnumerationStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationStatisticsBuilder {
    matchings_enumerated: u64,
    stable_found: u64,
    used_threads: usize,
    enumeration_duration: std::time::Duration,
}

impl Default for EnumerationStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnumerationStatisticsBuilder {
    /// Creates a new `EnumerationStatisticsBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            matchings_enumerated: 0,
            stable_found: 0,
            used_threads: 1,
            enumeration_duration: std::time::Duration::ZERO,
        }
    }

    /// Sets the number of matchings enumerated.
    #[inline]
    pub fn matchings_enumerated(mut self, matchings_enumerated: u64) -> Self {
        self.matchings_enumerated = matchings_enumerated;
        self
    }

    /// Sets the number of stable matchings found.
    #[inline]
    pub fn stable_found(mut self, stable_found: u64) -> Self {
        self.stable_found = stable_found;
        self
    }

    /// Sets the number of threads used.
    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    /// Sets the total run duration.
    #[inline]
    pub fn enumeration_duration(mut self, enumeration_duration: std::time::Duration) -> Self {
        self.enumeration_duration = enumeration_duration;
        self
    }

    /// Builds the `EnumerationStatistics` instance.
    #[inline]
    pub fn build(self) -> EnumerationStatistics {
        EnumerationStatistics {
            matchings_enumerated: self.matchings_enumerated,
            stable_found: self.stable_found,
            used_threads: self.used_threads,
            enumeration_duration: self.enumeration_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EnumerationStatistics;
    use super::EnumerationStatisticsBuilder;
    use std::time::Duration;

    #[test]
    fn builder_constructs_expected_struct() {
        let stats = EnumerationStatisticsBuilder::new()
            .matchings_enumerated(5040)
            .stable_found(3)
            .used_threads(8)
            .enumeration_duration(Duration::from_millis(1234))
            .build();

        assert_eq!(stats.matchings_enumerated, 5040);
        assert_eq!(stats.stable_found, 3);
        assert_eq!(stats.used_threads, 8);
        assert_eq!(stats.enumeration_duration, Duration::from_millis(1234));
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = EnumerationStatistics {
            matchings_enumerated: 24,
            stable_found: 2,
            used_threads: 4,
            enumeration_duration: Duration::from_millis(1234),
        };

        let rendered = format!("{}", stats);

        assert!(rendered.contains("Enumeration Statistics:"), "missing header");
        assert!(
            rendered.contains("Matchings Enumerated: 24"),
            "missing matchings_enumerated"
        );
        assert!(
            rendered.contains("Stable Matchings Found: 2"),
            "missing stable_found"
        );
        assert!(rendered.contains("Used Threads: 4"), "missing used_threads");
        assert!(
            rendered.contains("Enumeration Duration (secs): 1.234"),
            "duration not formatted to 3 decimals"
        );
    }
}
