#![warn(missing_docs)]
//! scanbench CLI Library
//!
//! Configuration, regex engines, the pattern table and the suite executor
//! behind the `scanbench` binary. Use `scanbench::run()` (or
//! `scanbench_cli::run()`) from `main`.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     scanbench_cli::run()
//! }
//! ```

mod config;
mod engine;
mod executor;
mod fixture;
mod patterns;

pub use config::*;
pub use engine::{ByteRegex, EngineKind, PatternEngine, PatternError, Span, UnicodeRegex};
pub use executor::{
    ExecutionConfig, Executor, ScanOutcome, build_report, run_scan_benchmark, run_suite,
};
pub use fixture::{DEFAULT_FIXTURE, Fixture, FixtureLoader};
pub use patterns::{PatternSpec, PatternTable, ResolvedPattern};

use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;
use scanbench_report::{OutputFormat, Report};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// scanbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "scanbench")]
#[command(author, version, about = "scanbench - regex compile and scan timing")]
pub struct Cli {
    /// Optional subcommand (List, Run, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter benchmarks by regex pattern on their names
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Iterations per pattern
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Text file to scan
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Regex engine
    #[arg(long, value_enum)]
    pub engine: Option<EngineKind>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover scanbench.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not draw progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Benchmark name filter; a subcommand's own filter takes precedence
    pub fn benchmark_filter(&self) -> &str {
        match &self.command {
            Some(Commands::List { filter: Some(f) } | Commands::Run { filter: Some(f) }) => f,
            _ => &self.filter,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the resolved pattern table
    List {
        /// Filter benchmarks by regex pattern on their names
        filter: Option<String>,
    },
    /// Run benchmarks (default)
    Run {
        /// Filter benchmarks by regex pattern on their names
        filter: Option<String>,
    },
    /// Print a default scanbench.toml
    Init,
}

/// Run the scanbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if a pattern cannot be compiled
/// or two strategies disagree.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the scanbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if matches!(cli.command, Some(Commands::Init)) {
        print!("{}", ScanConfig::default_toml());
        return Ok(());
    }

    let config = ScanConfig::load_or_discover(cli.config.as_deref())
        .context("failed to load configuration")?;
    let config = apply_overrides(&cli, config);

    let pattern = cli.benchmark_filter();
    let filter =
        Regex::new(pattern).with_context(|| format!("invalid benchmark filter `{pattern}`"))?;
    let table = config.pattern_table().filter(&filter);

    match cli.command {
        Some(Commands::List { .. }) => match config.runner.engine {
            EngineKind::Regex => list_patterns(&UnicodeRegex, &table),
            EngineKind::Bytes => list_patterns(&ByteRegex, &table),
        },
        _ => run_benchmarks(&config, &table),
    }
}

const LOG_TARGETS: [&str; 3] = ["scanbench", "scanbench_cli", "scanbench_core"];

fn init_logging(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // A second initialization (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .try_init();
}

/// `RUST_LOG` directives (or `info` for our crates), with `debug` for our
/// crates layered on top when `verbose` is set.
fn log_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let mut filter = match env.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        _ => EnvFilter::new(LOG_TARGETS.map(|t| format!("{t}=info")).join(",")),
    };
    if verbose {
        for target in LOG_TARGETS {
            if let Ok(directive) = format!("{target}=debug").parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Layer CLI flags over the loaded configuration
pub fn apply_overrides(cli: &Cli, mut config: ScanConfig) -> ScanConfig {
    if let Some(iterations) = cli.iterations {
        config.runner.iterations = iterations;
    }
    if let Some(engine) = cli.engine {
        config.runner.engine = engine;
    }
    if cli.no_progress {
        config.runner.progress = false;
    }
    if let Some(path) = &cli.fixture {
        config.fixture.path = Some(path.clone());
    }
    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if let Some(path) = &cli.output {
        config.output.path = Some(path.clone());
    }
    config
}

fn list_patterns<E: PatternEngine>(engine: &E, table: &PatternTable) -> anyhow::Result<()> {
    println!("scanbench patterns ({} engine):", engine.name());

    for resolved in table.resolve(engine)? {
        let fallback = if resolved.used_fallback {
            " [fallback]"
        } else {
            ""
        };
        println!("├── {}{}", resolved.name, fallback);
        println!("│   └── {}", resolved.pattern);
    }

    println!("{} benchmarks found.", table.len());
    Ok(())
}

fn run_benchmarks(config: &ScanConfig, table: &PatternTable) -> anyhow::Result<()> {
    if table.is_empty() {
        println!("No benchmarks found.");
        return Ok(());
    }

    let format: OutputFormat = config.output.format.parse().map_err(anyhow::Error::msg)?;

    let fixture = config.fixture.loader().load();
    let execution = ExecutionConfig {
        iterations: config.runner.iterations,
        show_progress: config.runner.progress,
    };

    info!(
        engine = %config.runner.engine,
        benchmarks = table.len(),
        iterations = execution.iterations,
        fixture = %fixture.source,
        "starting scan suite"
    );

    let report = match config.runner.engine {
        EngineKind::Regex => run_suite(&UnicodeRegex, table, &fixture, &execution)?,
        EngineKind::Bytes => run_suite(&ByteRegex, table, &fixture, &execution)?,
    };

    write_report(&report, format, config.output.path.as_deref())
}

fn write_report(report: &Report, format: OutputFormat, path: Option<&Path>) -> anyhow::Result<()> {
    let output = format.render(report)?;

    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, output)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", output),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["scanbench"]).unwrap();
        assert_eq!(cli.filter, ".*");
        assert!(cli.command.is_none());
        assert!(cli.iterations.is_none());
        assert!(!cli.no_progress);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "scanbench",
            "-n",
            "7",
            "--engine",
            "bytes",
            "--format",
            "json",
            "--no-progress",
            "IP",
        ])
        .unwrap();

        assert_eq!(cli.filter, "IP");
        assert_eq!(cli.iterations, Some(7));
        assert_eq!(cli.engine, Some(EngineKind::Bytes));
        assert_eq!(cli.format.as_deref(), Some("json"));
        assert!(cli.no_progress);

        let cli = Cli::try_parse_from(["scanbench", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List { filter: None }));
        assert!(Cli::try_parse_from(["scanbench", "--engine", "pcre"]).is_err());
    }

    #[test]
    fn test_subcommand_filter() {
        let cli = Cli::try_parse_from(["scanbench", "run", "Email"]).unwrap();
        let expected = Commands::Run {
            filter: Some("Email".to_string()),
        };
        assert_eq!(cli.command, Some(expected));
        assert_eq!(cli.benchmark_filter(), "Email");

        let cli = Cli::try_parse_from(["scanbench", "list", "IP"]).unwrap();
        assert_eq!(cli.benchmark_filter(), "IP");

        let cli = Cli::try_parse_from(["scanbench", "run"]).unwrap();
        assert_eq!(cli.benchmark_filter(), ".*");
    }

    #[test]
    fn test_verbose_layers_over_env_filter() {
        let quiet = log_filter(Some("regex=warn"), false).to_string();
        assert_eq!(quiet, "regex=warn");

        let verbose = log_filter(Some("regex=warn"), true).to_string();
        assert!(verbose.contains("regex=warn"));
        assert!(verbose.contains("scanbench_cli=debug"));
        assert!(verbose.contains("scanbench_core=debug"));

        let default = log_filter(None, false).to_string();
        assert!(default.contains("scanbench=info"));
        assert!(!default.contains("debug"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "scanbench",
            "--iterations",
            "3",
            "--fixture",
            "other.txt",
            "-o",
            "out.csv",
        ])
        .unwrap();

        let config = apply_overrides(&cli, ScanConfig::default());
        assert_eq!(config.runner.iterations, 3);
        assert_eq!(config.runner.engine, EngineKind::Regex);
        assert!(config.runner.progress);
        assert_eq!(config.fixture.path, Some(PathBuf::from("other.txt")));
        assert_eq!(config.output.format, "human");
        assert_eq!(config.output.path, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Fixture {
            text: "x@y.io and 10.0.0.1".to_string(),
            source: scanbench_report::FixtureSource::Fallback,
        };
        let config = ExecutionConfig {
            iterations: 2,
            show_progress: false,
        };
        let report =
            run_suite(&UnicodeRegex, &PatternTable::builtin(), &fixture, &config).unwrap();

        let path = dir.path().join("nested").join("report.csv");
        write_report(&report, OutputFormat::Csv, Some(&path)).unwrap();

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("benchmark,pattern,"));
        // header + 4 patterns * 3 stopwatches
        assert_eq!(csv.lines().count(), 13);
    }
}
