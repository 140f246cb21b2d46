//! Benchmark Execution
//!
//! Every pattern runs through a [`BenchmarkRunner`] with three stopwatches:
//!
//! - `compile`: the prepare stage; compiles the resolved pattern again each
//!   iteration and hands the matcher to both scans
//! - `scan`: collects all matches into a `Vec`
//! - `scan with callback`: counts matches one at a time
//!
//! The two scan counts must agree in every iteration.

use crate::engine::PatternEngine;
use crate::fixture::Fixture;
use crate::patterns::ResolvedPattern;
use indicatif::{ProgressBar, ProgressStyle};
use scanbench_core::{BenchError, BenchmarkRunner, Measurements};
use tracing::{info, warn};

/// Stopwatch label of the compile stage
pub const COMPILE: &str = "compile";
/// Stopwatch label of the eager scan
pub const SCAN: &str = "scan";
/// Stopwatch label of the incremental scan
pub const SCAN_WITH_CALLBACK: &str = "scan with callback";

/// Configuration for suite execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Iterations per pattern
    pub iterations: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            show_progress: true,
        }
    }
}

/// Result of running one pattern
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Benchmark name
    pub name: String,
    /// Pattern that was compiled
    pub pattern: String,
    /// Whether `pattern` is the fallback
    pub used_fallback: bool,
    /// Stopwatches; `consensus` is the match count
    pub measurements: Measurements<usize>,
}

/// Time compile and both scans of `pattern` over `text` for `iterations` rounds.
///
/// `observer` is called after each verified iteration.
pub fn run_scan_benchmark<E, F>(
    engine: &E,
    name: &str,
    pattern: &str,
    text: &str,
    iterations: usize,
    observer: F,
) -> Result<Measurements<usize>, BenchError>
where
    E: PatternEngine,
    F: FnMut(usize),
{
    BenchmarkRunner::with_prepare(name, iterations, COMPILE, || engine.compile(pattern))
        .strategy_with_input(SCAN, |matcher: &E::Matcher| {
            engine.scan(matcher, text).len()
        })
        .strategy_with_input(SCAN_WITH_CALLBACK, |matcher: &E::Matcher| {
            let mut count = 0usize;
            engine.scan_each(matcher, text, |_| count += 1);
            count
        })
        .on_iteration(observer)
        .execute()
}

/// Runs resolved patterns one after another
pub struct Executor {
    config: ExecutionConfig,
}

impl Executor {
    /// Create an executor
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Run every pattern in order, stopping at the first failure
    pub fn execute<E: PatternEngine>(
        &self,
        engine: &E,
        fixture: &Fixture,
        patterns: &[ResolvedPattern<E::Matcher>],
    ) -> Result<Vec<ScanOutcome>, BenchError> {
        let mut outcomes = Vec::with_capacity(patterns.len());

        for resolved in patterns {
            let matches = engine.count(&resolved.matcher, &fixture.text);
            info!(
                benchmark = %resolved.name,
                matches,
                fallback = resolved.used_fallback,
                "running benchmark"
            );

            let pb = self.progress_bar(&resolved.name);
            let result = run_scan_benchmark(
                engine,
                &resolved.name,
                &resolved.pattern,
                &fixture.text,
                self.config.iterations,
                |_| pb.inc(1),
            );

            let measurements = match result {
                Ok(measurements) => {
                    pb.finish_and_clear();
                    measurements
                }
                Err(e) => {
                    warn!(
                        benchmark = %resolved.name,
                        iteration = ?e.iteration(),
                        error = %e,
                        "benchmark aborted"
                    );
                    pb.abandon_with_message(abort_message(&e));
                    return Err(e);
                }
            };

            outcomes.push(ScanOutcome {
                name: resolved.name.clone(),
                pattern: resolved.pattern.clone(),
                used_fallback: resolved.used_fallback,
                measurements,
            });
        }

        Ok(outcomes)
    }

    fn progress_bar(&self, name: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(self.config.iterations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(name.to_string());
        pb
    }
}

/// Progress bar message left behind by a failed benchmark
fn abort_message(err: &BenchError) -> &'static str {
    if err.is_inconsistency() {
        "inconsistent"
    } else {
        "failed"
    }
}
