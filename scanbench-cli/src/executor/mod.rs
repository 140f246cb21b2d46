//! Suite Executor
//!
//! Runs the resolved pattern table and turns the stopwatches into a report.
//!
//! ```text
//! PatternTable ──resolve──▶ ResolvedPattern (primary or fallback)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  compile / scan / scan with callback, cross-checked
//! └──────┬──────┘
//!        │ Measurements<usize>
//!        ▼
//! ┌─────────────┐
//! │   report    │  Report with one entry per pattern
//! └─────────────┘
//! ```

mod execution;
mod report;

pub use execution::{ExecutionConfig, Executor, ScanOutcome, run_scan_benchmark};
pub use report::build_report;

use crate::engine::PatternEngine;
use crate::fixture::Fixture;
use crate::patterns::PatternTable;
use scanbench_report::Report;

/// Resolve `table` against `engine`, run every pattern and build the report
pub fn run_suite<E: PatternEngine>(
    engine: &E,
    table: &PatternTable,
    fixture: &Fixture,
    config: &ExecutionConfig,
) -> anyhow::Result<Report> {
    let resolved = table.resolve(engine)?;
    let outcomes = Executor::new(config.clone()).execute(engine, fixture, &resolved)?;
    Ok(build_report(engine, fixture, config, &outcomes)?)
}
