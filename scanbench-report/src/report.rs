//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per pattern, in run order
    pub benchmarks: Vec<BenchmarkReport>,
}

/// Report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// scanbench version
    pub version: String,
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Regex engine name
    pub engine: String,
    /// Where the scanned text came from
    pub fixture: FixtureSource,
    /// Fixture length in bytes
    pub fixture_bytes: usize,
    /// Iterations per pattern
    pub iterations: usize,
    /// Whether lap cycle counts are meaningful on this machine
    pub has_cycle_counter: bool,
}

/// Origin of the fixture text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FixtureSource {
    /// Read from a file
    File {
        /// Path that was read
        path: PathBuf,
    },
    /// The configured in-memory fallback text
    Fallback,
}

impl fmt::Display for FixtureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureSource::File { path } => write!(f, "{}", path.display()),
            FixtureSource::Fallback => f.write_str("built-in fallback"),
        }
    }
}

/// Result for one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Benchmark name (e.g. "Email")
    pub name: String,
    /// Pattern actually compiled
    pub pattern: String,
    /// Whether the fallback pattern replaced the primary one
    pub used_fallback: bool,
    /// Matches found in the fixture
    pub match_count: usize,
    /// Stopwatches in execution order
    pub laps: Vec<LapReport>,
}

/// One stopwatch's totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapReport {
    /// Stopwatch label
    pub label: String,
    /// Number of laps
    pub laps: u64,
    /// Total wall-clock time
    pub total_ns: u64,
    /// Mean lap time
    pub mean_ns: u64,
    /// Total CPU cycles (0 without a cycle counter)
    pub cycles: u64,
    /// One-line human summary
    pub summary: String,
}

#[cfg(test)]
pub(crate) fn sample_report() -> Report {
    use chrono::TimeZone;

    let lap = |label: &str, total_ns: u64, summary: &str| LapReport {
        label: label.to_string(),
        laps: 2,
        total_ns,
        mean_ns: total_ns / 2,
        cycles: 0,
        summary: summary.to_string(),
    };

    Report {
        meta: ReportMeta {
            version: "0.1.0".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            engine: "regex".to_string(),
            fixture: FixtureSource::Fallback,
            fixture_bytes: 42,
            iterations: 2,
            has_cycle_counter: false,
        },
        benchmarks: vec![BenchmarkReport {
            name: "Email".to_string(),
            pattern: r"[\w\.+-]+@[\w\.-]+\.[\w\.-]{1,3}".to_string(),
            used_fallback: false,
            match_count: 3,
            laps: vec![
                lap(
                    "compile",
                    1_000_000,
                    "compile: 1.00ms elapsed in 2 laps (avg. 0.50ms / lap)",
                ),
                lap(
                    "scan",
                    400_000,
                    "scan: 0.40ms elapsed in 2 laps (avg. 0.20ms / lap)",
                ),
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_round_trip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_fixture_source_tagging() {
        let file = FixtureSource::File {
            path: PathBuf::from("fixtures/scan.txt"),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["kind"], "file");
        assert_eq!(json["path"], "fixtures/scan.txt");

        let fallback = serde_json::to_value(FixtureSource::Fallback).unwrap();
        assert_eq!(fallback["kind"], "fallback");
        assert_eq!(FixtureSource::Fallback.to_string(), "built-in fallback");
    }
}
