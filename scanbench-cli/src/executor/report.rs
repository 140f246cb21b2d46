//! Report Building
//!
//! Converts executor outcomes into the serializable [`Report`] model.

use super::execution::{ExecutionConfig, ScanOutcome};
use crate::engine::PatternEngine;
use crate::fixture::Fixture;
use scanbench_core::{BenchError, HAS_CYCLE_COUNTER, Stopwatch};
use scanbench_report::{BenchmarkReport, LapReport, Report, ReportMeta};
use std::time::Duration;

/// Build a report from completed benchmarks
pub fn build_report<E: PatternEngine>(
    engine: &E,
    fixture: &Fixture,
    config: &ExecutionConfig,
    outcomes: &[ScanOutcome],
) -> Result<Report, BenchError> {
    let benchmarks = outcomes
        .iter()
        .map(benchmark_report)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            engine: engine.name().to_string(),
            fixture: fixture.source.clone(),
            fixture_bytes: fixture.len(),
            iterations: config.iterations,
            has_cycle_counter: HAS_CYCLE_COUNTER,
        },
        benchmarks,
    })
}

fn benchmark_report(outcome: &ScanOutcome) -> Result<BenchmarkReport, BenchError> {
    let laps = outcome
        .measurements
        .iter()
        .map(lap_report)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BenchmarkReport {
        name: outcome.name.clone(),
        pattern: outcome.pattern.clone(),
        used_fallback: outcome.used_fallback,
        match_count: outcome.measurements.consensus,
        laps,
    })
}

fn lap_report(sw: &Stopwatch) -> Result<LapReport, BenchError> {
    let summary = sw.report()?;
    Ok(LapReport {
        label: sw.label().to_string(),
        laps: sw.laps(),
        total_ns: duration_ns(sw.elapsed()),
        mean_ns: duration_ns(sw.average().unwrap_or_default()),
        cycles: sw.cycles(),
        summary,
    })
}

fn duration_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::UnicodeRegex;
    use crate::executor::run_scan_benchmark;
    use scanbench_report::FixtureSource;

    fn outcome(iterations: usize) -> ScanOutcome {
        let measurements = run_scan_benchmark(
            &UnicodeRegex,
            "Digits",
            r"\d+",
            "a1 b22 c333",
            iterations,
            |_| {},
        )
        .unwrap();
        ScanOutcome {
            name: "Digits".to_string(),
            pattern: r"\d+".to_string(),
            used_fallback: false,
            measurements,
        }
    }

    #[test]
    fn test_build_report() {
        let fixture = Fixture {
            text: "a1 b22 c333".to_string(),
            source: FixtureSource::Fallback,
        };
        let config = ExecutionConfig {
            iterations: 4,
            show_progress: false,
        };

        let report = build_report(&UnicodeRegex, &fixture, &config, &[outcome(4)]).unwrap();
        assert_eq!(report.meta.engine, "regex");
        assert_eq!(report.meta.fixture_bytes, 11);
        assert_eq!(report.meta.iterations, 4);
        assert_eq!(report.meta.version, env!("CARGO_PKG_VERSION"));

        let digits = &report.benchmarks[0];
        assert_eq!(digits.match_count, 3);
        let labels: Vec<_> = digits.laps.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["compile", "scan", "scan with callback"]);

        for lap in &digits.laps {
            assert_eq!(lap.laps, 4);
            assert_eq!(lap.mean_ns, lap.total_ns / 4);
            assert!(lap.summary.starts_with(&format!("{}: ", lap.label)));
            assert!(lap.summary.ends_with("ms / lap)"));
        }
    }

    #[test]
    fn test_duration_ns_saturates() {
        assert_eq!(duration_ns(Duration::from_nanos(1_500)), 1_500);
        assert_eq!(duration_ns(Duration::MAX), u64::MAX);
    }
}
