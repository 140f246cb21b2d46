//! Configuration loading from scanbench.toml
//!
//! Configuration can be specified in a `scanbench.toml` file in the project root.
//! The file is discovered by walking up from the current directory; command-line
//! flags override it.

use crate::engine::EngineKind;
use crate::fixture::{DEFAULT_FIXTURE, FixtureLoader};
use crate::patterns::{PatternSpec, PatternTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the configuration file looked up by [`ScanConfig::discover`]
pub const CONFIG_FILE: &str = "scanbench.toml";

/// scanbench configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Fixture configuration
    #[serde(default)]
    pub fixture: FixtureConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Benchmarks to run, in order. Replaces the built-in table when present.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternSpec>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            fixture: FixtureConfig::default(),
            output: OutputConfig::default(),
            patterns: default_patterns(),
        }
    }
}

fn default_patterns() -> Vec<PatternSpec> {
    PatternTable::builtin().specs().to_vec()
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Iterations per pattern
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Regex engine: "regex" or "bytes"
    #[serde(default)]
    pub engine: EngineKind,
    /// Show a progress bar per benchmark
    #[serde(default = "default_progress")]
    pub progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            engine: EngineKind::default(),
            progress: default_progress(),
        }
    }
}

fn default_iterations() -> usize {
    50
}
fn default_progress() -> bool {
    true
}

/// Fixture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Text file to scan; an empty path scans only the fallback text
    #[serde(default = "default_fixture_path")]
    pub path: Option<PathBuf>,
    /// Text scanned when `path` is missing or unreadable
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            path: default_fixture_path(),
            fallback: default_fallback(),
        }
    }
}

impl FixtureConfig {
    /// Loader for the configured fixture, treating an empty `path` as no file
    pub fn loader(&self) -> FixtureLoader {
        let path = self.path.clone().filter(|p| !p.as_os_str().is_empty());
        FixtureLoader::new(path, self.fallback.clone())
    }
}

fn default_fixture_path() -> Option<PathBuf> {
    Some(PathBuf::from("fixtures/scan.txt"))
}
fn default_fallback() -> String {
    DEFAULT_FIXTURE.to_string()
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file (stdout if unset)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl ScanConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                debug!(path = %config_path.display(), "found configuration");
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        warn!(path = %config_path.display(), error = %e, "ignoring invalid configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Load an explicit file, or discover one, or fall back to defaults
    pub fn load_or_discover(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::discover().unwrap_or_default()),
        }
    }

    /// Pattern table built from `patterns`
    pub fn pattern_table(&self) -> PatternTable {
        PatternTable::new(self.patterns.clone())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# scanbench configuration

[runner]
# Iterations per pattern
iterations = 50
# Regex engine: "regex" (UTF-8 text) or "bytes" (raw bytes)
engine = "regex"
# Show a progress bar while a pattern runs
progress = true

[fixture]
# Text file to scan; the fallback text is used if it cannot be read
# (set path = "" to scan only the fallback text)
path = "fixtures/scan.txt"
# fallback = "text scanned when the file is missing"

[output]
# Output format: human, json, csv
format = "human"
# Report file (uncomment to enable, stdout otherwise)
# path = "target/scanbench/report.json"

# Benchmarks, in run order. Listing any replaces the built-in set.
# `fallback` is compiled when the engine rejects `pattern`.
[[patterns]]
name = "All"
pattern = "."

[[patterns]]
name = "Email"
pattern = '[\w\.+-]+@[\w\.-]+\.[\w\.-]+'

[[patterns]]
name = "URI"
pattern = 'https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}(?-u:\b)([-a-zA-Z0-9()@:%_\+.~#?&//=]*)'
fallback = 'https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&//=]*)'

[[patterns]]
name = "IP"
pattern = '(?-u:\b)(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(?-u:\b)'
fallback = '\b(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\b'
"#
        .to_string()
    }
}
