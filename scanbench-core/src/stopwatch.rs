//! Stopwatch - Cumulative Lap Timing
//!
//! A `Stopwatch` sums wall-clock time and cycles over repeated laps of an
//! operation. Each lap is recorded by a [`LapGuard`] when it drops, so a lap
//! counts whether the operation returned, returned an error, or panicked.

use crate::error::BenchError;
use crate::measure::Timer;
use std::time::Duration;

/// Nanoseconds in one hundredth of a millisecond
const NANOS_PER_CENTI_MS: u128 = 10_000;

/// Accumulates elapsed time and lap count across repeated timed executions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stopwatch {
    label: String,
    elapsed: Duration,
    cycles: u64,
    laps: u64,
}

impl Stopwatch {
    /// Create an empty stopwatch
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            elapsed: Duration::ZERO,
            cycles: 0,
            laps: 0,
        }
    }

    /// Run `op` once and record it as a lap.
    ///
    /// The lap is recorded on every exit path. A panic inside `op` keeps
    /// unwinding after the lap has been added.
    #[inline]
    pub fn lap<R, F>(&mut self, op: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.start_lap();
        std::hint::black_box(op())
    }

    /// Start a lap that is recorded when the returned guard drops
    #[inline]
    pub fn start_lap(&mut self) -> LapGuard<'_> {
        LapGuard {
            timer: Timer::start(),
            stopwatch: self,
        }
    }

    fn record(&mut self, elapsed: Duration, cycles: u64) {
        self.elapsed += elapsed;
        self.cycles = self.cycles.saturating_add(cycles);
        self.laps += 1;
    }

    /// Stopwatch label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total elapsed time over all laps
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total CPU cycles over all laps (0 without a cycle counter)
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of recorded laps
    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Mean lap duration, `None` before the first lap
    pub fn average(&self) -> Option<Duration> {
        if self.laps == 0 {
            return None;
        }
        let nanos = self.elapsed.as_nanos() / u128::from(self.laps);
        let nanos = u64::try_from(nanos).unwrap_or(u64::MAX);
        Some(Duration::from_nanos(nanos))
    }

    /// Total time in hundredths of a millisecond, truncated
    pub fn total_centis(&self) -> u128 {
        self.elapsed.as_nanos() / NANOS_PER_CENTI_MS
    }

    /// Mean lap time in hundredths of a millisecond, truncated
    pub fn average_centis(&self) -> Result<u128, BenchError> {
        if self.laps == 0 {
            return Err(BenchError::NoLaps {
                label: self.label.clone(),
            });
        }
        let per_lap = u128::from(self.laps) * NANOS_PER_CENTI_MS;
        Ok(self.elapsed.as_nanos() / per_lap)
    }

    /// One-line summary of total and average time.
    ///
    /// Fails with [`BenchError::NoLaps`] if nothing has been timed yet.
    pub fn report(&self) -> Result<String, BenchError> {
        let average = self.average_centis()?;
        Ok(format!(
            "{}: {}ms elapsed in {} laps (avg. {}ms / lap)",
            self.label,
            format_centis(self.total_centis()),
            self.laps,
            format_centis(average)
        ))
    }
}

/// Render hundredths of a millisecond as `"<ms>.<hundredths>"`
pub fn format_centis(centis: u128) -> String {
    format!("{}.{:02}", centis / 100, centis % 100)
}

/// Scoped lap: records elapsed time and one lap into its stopwatch on drop
#[must_use = "the lap is recorded when the guard is dropped"]
pub struct LapGuard<'a> {
    stopwatch: &'a mut Stopwatch,
    timer: Timer,
}

impl Drop for LapGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        let (elapsed, cycles) = self.timer.stop();
        self.stopwatch.record(elapsed, cycles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn with_elapsed(label: &str, nanos: u64, laps: u64) -> Stopwatch {
        let mut sw = Stopwatch::new(label);
        sw.elapsed = Duration::from_nanos(nanos);
        sw.laps = laps;
        sw
    }

    #[test]
    fn test_lap_returns_result() {
        let mut sw = Stopwatch::new("sum");
        let total = sw.lap(|| (1..=10u64).sum::<u64>());

        assert_eq!(total, 55);
        assert_eq!(sw.laps(), 1);
    }

    #[test]
    fn test_lap_records_err_results() {
        let mut sw = Stopwatch::new("compile");
        let result: Result<(), &str> = sw.lap(|| Err("rejected"));

        assert!(result.is_err());
        assert_eq!(sw.laps(), 1);
    }

    #[test]
    fn test_lap_records_panics() {
        let mut sw = Stopwatch::new("explode");
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            sw.lap(|| -> u32 {
                std::thread::sleep(Duration::from_millis(2));
                panic!("boom")
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(sw.laps(), 1);
        assert!(sw.elapsed() >= Duration::from_millis(1));
    }

    #[test]
    fn test_laps_are_monotonic() {
        let mut sw = Stopwatch::new("mixed");
        let mut last_elapsed = Duration::ZERO;

        for i in 0..20u64 {
            if i % 3 == 0 {
                let _ = catch_unwind(AssertUnwindSafe(|| sw.lap(|| panic!("lap {i}"))));
            } else {
                sw.lap(|| std::hint::black_box(i * 2));
            }
            assert_eq!(sw.laps(), i + 1);
            assert!(sw.elapsed() >= last_elapsed);
            last_elapsed = sw.elapsed();
        }
    }

    #[test]
    fn test_guard_records_on_drop() {
        let mut sw = Stopwatch::new("guard");
        {
            let _lap = sw.start_lap();
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(sw.laps(), 1);
        assert!(sw.elapsed() >= Duration::from_millis(1));
    }

    #[test]
    fn test_report_truncates() {
        let sw = with_elapsed("compile", 123_450_000, 3);

        assert_eq!(sw.total_centis(), 12_345);
        assert_eq!(sw.average_centis().unwrap(), 4_115);
        assert_eq!(
            sw.report().unwrap(),
            "compile: 123.45ms elapsed in 3 laps (avg. 41.15ms / lap)"
        );
    }

    #[test]
    fn test_report_does_not_round_up() {
        // 0.019999s -> 1999.9 hundredths -> 19.99, never 20.00
        let sw = with_elapsed("scan", 19_999_000, 1);
        assert_eq!(
            sw.report().unwrap(),
            "scan: 19.99ms elapsed in 1 laps (avg. 19.99ms / lap)"
        );

        // Average truncates independently of the total
        let sw = with_elapsed("scan", 100_000_000, 3);
        assert_eq!(format_centis(sw.total_centis()), "100.00");
        assert_eq!(format_centis(sw.average_centis().unwrap()), "33.33");
    }

    #[test]
    fn test_report_without_laps_fails() {
        let sw = Stopwatch::new("idle");

        assert!(sw.average().is_none());
        match sw.report() {
            Err(BenchError::NoLaps { label }) => assert_eq!(label, "idle"),
            other => panic!("expected NoLaps, got {other:?}"),
        }
    }

    #[test]
    fn test_format_centis_pads() {
        assert_eq!(format_centis(0), "0.00");
        assert_eq!(format_centis(7), "0.07");
        assert_eq!(format_centis(1_005), "10.05");
    }
}
