#![warn(missing_docs)]
//! # scanbench
//!
//! Regular-expression compile and scan throughput, cross-checked.
//!
//! - **Stopwatches**: laps are recorded by a guard, so a lap counts even when
//!   the timed code returns an error or panics
//! - **Verified strategies**: every iteration compares the results of all
//!   strategies and aborts on the first disagreement
//! - **Pattern fallbacks**: a pattern the engine rejects is swapped for its
//!   fallback once, before timing starts
//! - **High-Precision Timing**: RDTSCP cycle counting on x86_64 with Instant fallback
//!
//! ## Quick Start
//!
//! ```ignore
//! use scanbench::prelude::*;
//!
//! let measurements = BenchmarkRunner::new("sum", 10)
//!     .strategy("loop", || (1..=100u64).fold(0, |a, b| a + b))
//!     .strategy("formula", || 100 * 101 / 2)
//!     .execute()?;
//!
//! for sw in measurements.iter() {
//!     println!("{}", sw.report()?);
//! }
//! ```

// Re-export core types
pub use scanbench_core::{
    BenchError, BenchmarkRunner, BoxError, HAS_CYCLE_COUNTER, LapGuard, Measurements, Stopwatch,
    Timer, format_centis,
};

// Re-export CLI building blocks
pub use scanbench_cli::{
    ByteRegex, DEFAULT_FIXTURE, EngineKind, ExecutionConfig, Executor, Fixture, FixtureLoader,
    PatternEngine, PatternError, PatternSpec, PatternTable, ResolvedPattern, ScanConfig,
    ScanOutcome, Span, UnicodeRegex, build_report, run_scan_benchmark, run_suite,
};

// Re-export report types
pub use scanbench_report::{
    BenchmarkReport, FixtureSource, LapReport, OutputFormat, Report, ReportMeta,
    format_human_output, generate_csv_report, generate_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchError, BenchmarkRunner, Measurements, PatternEngine, PatternTable, Stopwatch,
    };
}

/// Run the scanbench CLI.
///
/// Call this from the binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     scanbench::run()
/// }
/// ```
pub use scanbench_cli::run;
