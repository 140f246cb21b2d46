//! Pattern Table
//!
//! Maps each benchmark name to a primary pattern and an optional fallback.
//! The table is resolved against an engine once, before any timing starts:
//! a primary the engine rejects is replaced by its fallback.

use crate::engine::{PatternEngine, PatternError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const OCTET: &str = r"(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])";
const URI_HOST: &str = r"https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}";
const URI_PATH: &str = r"([-a-zA-Z0-9()@:%_\+.~#?&//=]*)";

/// One named benchmark pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Benchmark name
    pub name: String,
    /// Preferred pattern
    pub pattern: String,
    /// Used when the engine rejects `pattern`
    #[serde(default)]
    pub fallback: Option<String>,
}

impl PatternSpec {
    /// Spec without a fallback
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            fallback: None,
        }
    }

    /// Set the fallback pattern
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Compile the primary pattern, or the fallback if the primary is rejected
    pub fn resolve<E: PatternEngine>(
        &self,
        engine: &E,
    ) -> Result<ResolvedPattern<E::Matcher>, PatternError> {
        let primary_err = match engine.compile(&self.pattern) {
            Ok(matcher) => {
                debug!(benchmark = %self.name, pattern = %self.pattern, "compiled primary pattern");
                return Ok(ResolvedPattern {
                    name: self.name.clone(),
                    pattern: self.pattern.clone(),
                    used_fallback: false,
                    matcher,
                });
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            return Err(primary_err);
        };
        warn!(
            benchmark = %self.name,
            engine = engine.name(),
            error = %primary_err,
            "primary pattern rejected, using fallback"
        );
        let matcher = engine.compile(fallback)?;
        Ok(ResolvedPattern {
            name: self.name.clone(),
            pattern: fallback.clone(),
            used_fallback: true,
            matcher,
        })
    }
}

/// A pattern the engine accepted
#[derive(Debug, Clone)]
pub struct ResolvedPattern<M> {
    /// Benchmark name
    pub name: String,
    /// The pattern string that compiled
    pub pattern: String,
    /// Whether `pattern` is the fallback
    pub used_fallback: bool,
    /// Compiled matcher
    pub matcher: M,
}

/// Ordered benchmark-name to pattern table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternTable {
    specs: Vec<PatternSpec>,
}

impl PatternTable {
    /// Table from explicit specs, kept in the given order
    pub fn new(specs: Vec<PatternSpec>) -> Self {
        Self { specs }
    }

    /// The standard benchmark set: everything, e-mail addresses, URIs and IPv4 addresses.
    ///
    /// `URI` and `IP` prefer an ASCII word boundary, which avoids slow
    /// Unicode-aware `\b` handling, and fall back to plain `\b` for engines
    /// without the `(?-u:...)` group syntax.
    pub fn builtin() -> Self {
        let uri = |b: &str| format!("{URI_HOST}{b}{URI_PATH}");
        let ip = |b: &str| format!(r"{b}{OCTET}\.{OCTET}\.{OCTET}\.{OCTET}{b}");

        Self::new(vec![
            PatternSpec::new("All", "."),
            PatternSpec::new("Email", r"[\w\.+-]+@[\w\.-]+\.[\w\.-]+"),
            PatternSpec::new("URI", uri(r"(?-u:\b)")).with_fallback(uri(r"\b")),
            PatternSpec::new("IP", ip(r"(?-u:\b)")).with_fallback(ip(r"\b")),
        ])
    }

    /// Specs in run order
    pub fn specs(&self) -> &[PatternSpec] {
        &self.specs
    }

    /// Look up a spec by benchmark name
    pub fn get(&self, name: &str) -> Option<&PatternSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Number of benchmarks
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Keep only benchmarks whose name matches `filter`
    pub fn filter(&self, filter: &Regex) -> Self {
        Self::new(
            self.specs
                .iter()
                .filter(|spec| filter.is_match(&spec.name))
                .cloned()
                .collect(),
        )
    }

    /// Resolve every spec against `engine`, failing on the first pattern
    /// for which neither the primary nor the fallback compiles
    pub fn resolve<E: PatternEngine>(
        &self,
        engine: &E,
    ) -> Result<Vec<ResolvedPattern<E::Matcher>>, PatternError> {
        self.specs.iter().map(|spec| spec.resolve(engine)).collect()
    }
}
