#![warn(missing_docs)]
//! scanbench Report - Output Formats
//!
//! Generates the report in one of:
//! - JSON (machine-readable)
//! - CSV (one row per stopwatch)
//! - Human (plain text, one block per pattern)

mod csv;
mod human;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use human::format_human_output;
pub use json::generate_json_report;
pub use report::{BenchmarkReport, FixtureSource, LapReport, Report, ReportMeta};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl OutputFormat {
    /// Render `report` in this format
    pub fn render(self, report: &Report) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Json => generate_json_report(report),
            OutputFormat::Csv => Ok(generate_csv_report(report)),
            OutputFormat::Human => Ok(format_human_output(report)),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
