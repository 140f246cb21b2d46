//! Human Output
//!
//! Plain text, one block per pattern:
//!
//! ```text
//! Email: 3 matches
//!     compile: 1.00ms elapsed in 2 laps (avg. 0.50ms / lap)
//!     scan: 0.40ms elapsed in 2 laps (avg. 0.20ms / lap)
//! ```

use crate::report::Report;

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let meta = &report.meta;
    let mut output = String::new();

    output.push_str(&format!(
        "scanbench {} ({} engine, {} iterations)\n",
        meta.version, meta.engine, meta.iterations
    ));
    output.push_str(&format!(
        "fixture: {} ({} bytes)\n",
        meta.fixture, meta.fixture_bytes
    ));

    for bench in &report.benchmarks {
        output.push('\n');
        output.push_str(&format!("{}: {} matches", bench.name, bench.match_count));
        if bench.used_fallback {
            output.push_str(" (fallback pattern)");
        }
        output.push('\n');

        for lap in &bench.laps {
            output.push_str(&format!("    {}\n", lap.summary));
        }
    }

    output
}
