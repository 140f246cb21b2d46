//! CSV Output

use crate::report::Report;

const HEADER: &str =
    "benchmark,pattern,used_fallback,matches,stopwatch,laps,total_ns,mean_ns,cycles";

/// Generate a CSV report with one row per stopwatch.
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for bench in &report.benchmarks {
        for lap in &bench.laps {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                escape(&bench.name),
                escape(&bench.pattern),
                bench.used_fallback,
                bench.match_count,
                escape(&lap.label),
                lap.laps,
                lap.total_ns,
                lap.mean_ns,
                lap.cycles
            ));
        }
    }

    output
}

/// Quote a field if it contains a separator, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_report;

    #[test]
    fn test_csv_rows() {
        let csv = generate_csv_report(&sample_report());
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("Email,"));
        assert!(lines[1].ends_with(",compile,2,1000000,500000,0"));
    }

    #[test]
    fn test_patterns_with_commas_are_quoted() {
        let csv = generate_csv_report(&sample_report());
        assert!(csv.contains(r#""[\w\.+-]+@[\w\.-]+\.[\w\.-]{1,3}""#));
        assert_eq!(escape(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(escape("plain"), "plain");
    }
}
