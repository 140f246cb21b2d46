//! Harness errors

use thiserror::Error;

/// Boxed error produced by a fallible prepare stage
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while running or reporting a benchmark
#[derive(Debug, Error)]
pub enum BenchError {
    /// A stopwatch was asked for an average before any lap ran
    #[error("Stopwatch '{label}' has no laps to report")]
    NoLaps {
        /// Stopwatch label
        label: String,
    },

    /// The runner was configured with zero iterations
    #[error("Benchmark '{benchmark}' needs at least one iteration")]
    NoIterations {
        /// Benchmark name
        benchmark: String,
    },

    /// The runner has nothing to compare
    #[error("Benchmark '{benchmark}' has no strategies")]
    NoStrategies {
        /// Benchmark name
        benchmark: String,
    },

    /// Two strategies share a label, so their stopwatches would be ambiguous
    #[error("Benchmark '{benchmark}' declares strategy '{label}' more than once")]
    DuplicateStrategy {
        /// Benchmark name
        benchmark: String,
        /// Repeated label
        label: String,
    },

    /// The per-iteration prepare stage failed
    #[error("Benchmark '{benchmark}': '{label}' failed in iteration {iteration}: {source}")]
    Prepare {
        /// Benchmark name
        benchmark: String,
        /// Prepare stage label
        label: String,
        /// 1-based iteration index
        iteration: usize,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// Two strategies produced results that are not equivalent
    #[error(
        "Benchmark '{benchmark}': strategies '{first}' and '{second}' disagree in iteration {iteration} ({detail})"
    )]
    Inconsistency {
        /// Benchmark name
        benchmark: String,
        /// 1-based iteration index
        iteration: usize,
        /// Label of the earlier strategy
        first: String,
        /// Label of the later strategy
        second: String,
        /// Both results, rendered with `Debug`
        detail: String,
    },
}

impl BenchError {
    /// Iteration in which the run was aborted, if any
    pub fn iteration(&self) -> Option<usize> {
        match self {
            BenchError::Prepare { iteration, .. } | BenchError::Inconsistency { iteration, .. } => {
                Some(*iteration)
            }
            _ => None,
        }
    }

    /// Whether this is a cross-strategy disagreement
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, BenchError::Inconsistency { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistency_message_names_both_strategies() {
        let err = BenchError::Inconsistency {
            benchmark: "Email".to_string(),
            iteration: 2,
            first: "scan".to_string(),
            second: "scan with callback".to_string(),
            detail: "4 != 5".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("'scan'"));
        assert!(message.contains("'scan with callback'"));
        assert!(message.contains("iteration 2"));
        assert_eq!(err.iteration(), Some(2));
        assert!(err.is_inconsistency());
    }

    #[test]
    fn test_prepare_keeps_source() {
        let source: BoxError = "bad pattern".into();
        let err = BenchError::Prepare {
            benchmark: "IP".to_string(),
            label: "compile".to_string(),
            iteration: 1,
            source,
        };

        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_inconsistency());
    }
}
