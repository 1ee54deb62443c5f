//! Lightweight timing and counting of expensive operations.
//!
//! Stats are kept in an explicit [`PerfStats`] object owned by the frontend and
//! lent to whatever it wants to measure.

use std::collections::VecDeque;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use web_time::Instant;

/// Default number of samples kept by a [`MovingAverage`].
pub const DEFAULT_WINDOW: usize = 120;

/// Average of the most recent samples of a duration.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<Duration>,
    sum: Duration,
}
impl MovingAverage {
    /// Constructs an empty average over the last `window` samples.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            samples: VecDeque::new(),
            sum: Duration::ZERO,
        }
    }

    /// Adds a sample, evicting the oldest one if the window is full.
    pub fn push(&mut self, sample: Duration) {
        if self.samples.len() == self.window
            && let Some(old) = self.samples.pop_front()
        {
            self.sum -= old;
        }
        self.samples.push_back(sample);
        self.sum += sample;
    }

    /// Returns the most recent sample.
    pub fn last(&self) -> Option<Duration> {
        self.samples.back().copied()
    }
    /// Returns the mean of the samples in the window.
    pub fn average(&self) -> Option<Duration> {
        let n = u32::try_from(self.samples.len()).ok().filter(|&n| n > 0)?;
        Some(self.sum / n)
    }
    /// Returns the number of samples in the window.
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    /// Returns whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Named timers and counters.
#[derive(Debug, Clone)]
pub struct PerfStats {
    window: usize,
    timers: IndexMap<&'static str, MovingAverage>,
    counters: IndexMap<&'static str, u64>,
}
impl Default for PerfStats {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
impl PerfStats {
    /// Constructs empty stats whose timers average over `window` samples.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            timers: IndexMap::new(),
            counters: IndexMap::new(),
        }
    }

    /// Starts timing a block. The elapsed time is recorded under `name` when
    /// the returned guard is dropped, however the block exits.
    #[must_use = "the timer stops when the guard is dropped"]
    pub fn time(&mut self, name: &'static str) -> ScopedTimer<'_> {
        ScopedTimer {
            stats: self,
            name,
            start: Instant::now(),
        }
    }

    /// Records a duration under `name`.
    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let window = self.window;
        self.timers
            .entry(name)
            .or_insert_with(|| MovingAverage::new(window))
            .push(elapsed);
    }

    /// Increments the counter `name`.
    pub fn count(&mut self, name: &'static str) {
        self.add(name, 1);
    }
    /// Adds `n` to the counter `name`.
    pub fn add(&mut self, name: &'static str, n: u64) {
        *self.counters.entry(name).or_default() += n;
    }

    /// Returns the value of the counter `name`.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
    /// Returns the timer `name`, if anything has been recorded under it.
    pub fn timer(&self, name: &str) -> Option<&MovingAverage> {
        self.timers.get(name)
    }

    /// Returns a snapshot of every timer and counter, in the order they were
    /// first recorded.
    pub fn summary(&self) -> PerfSummary {
        PerfSummary {
            timers: self
                .timers
                .iter()
                .map(|(&name, t)| TimerSummary {
                    name,
                    samples: t.len(),
                    last_us: t.last().map(|d| d.as_micros()),
                    average_us: t.average().map(|d| d.as_micros()),
                })
                .collect(),
            counters: self.counters.iter().map(|(&k, &v)| (k, v)).collect(),
        }
    }
}

/// Guard that records how long it was alive. See [`PerfStats::time()`].
#[derive(Debug)]
pub struct ScopedTimer<'a> {
    stats: &'a mut PerfStats,
    name: &'static str,
    start: Instant,
}
impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.stats.record(self.name, elapsed);
    }
}

/// Serializable snapshot of [`PerfStats`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct PerfSummary {
    pub timers: Vec<TimerSummary>,
    pub counters: IndexMap<&'static str, u64>,
}

/// Serializable snapshot of one timer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct TimerSummary {
    pub name: &'static str,
    pub samples: usize,
    pub last_us: Option<u128>,
    pub average_us: Option<u128>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_moving_average_window() {
        let mut avg = MovingAverage::new(3);
        assert_eq!(avg.average(), None);
        for ms in [10, 20, 30, 40] {
            avg.push(Duration::from_millis(ms));
        }
        assert_eq!(avg.len(), 3);
        assert_eq!(avg.last(), Some(Duration::from_millis(40)));
        assert_eq!(avg.average(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_scoped_timer_records_on_early_return() {
        fn work(stats: &mut PerfStats, bail: bool) -> Option<()> {
            let _t = stats.time("work");
            if bail {
                return None;
            }
            Some(())
        }

        let mut stats = PerfStats::new(10);
        work(&mut stats, true);
        work(&mut stats, false);
        assert_eq!(stats.timer("work").map(|t| t.len()), Some(2));
        assert!(stats.timer("other").is_none());
    }

    #[test]
    fn test_counters() {
        let mut stats = PerfStats::default();
        stats.count("hits");
        stats.count("hits");
        stats.add("misses", 5);
        assert_eq!(stats.counter("hits"), 2);
        assert_eq!(stats.counter("misses"), 5);
        assert_eq!(stats.counter("nothing"), 0);

        let summary = stats.summary();
        assert_eq!(summary.counters.keys().copied().collect::<Vec<_>>(), vec!["hits", "misses"]);
    }
}
