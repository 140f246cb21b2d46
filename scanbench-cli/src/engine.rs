//! Regex Engines
//!
//! A [`PatternEngine`] compiles a pattern into a matcher and scans text with
//! it, either materializing every match or handing them out one at a time.
//! Both backends come from the `regex` crate: [`UnicodeRegex`] scans `&str`,
//! [`ByteRegex`] scans the same text as raw bytes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A pattern rejected by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pattern `{pattern}`: {message}")]
pub struct PatternError {
    /// The rejected pattern
    pub pattern: String,
    /// Engine diagnostic
    pub message: String,
}

/// Byte range of a match in the scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Length of the match in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the match is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Span {
            start: m.start(),
            end: m.end(),
        }
    }
}

impl From<regex::bytes::Match<'_>> for Span {
    fn from(m: regex::bytes::Match<'_>) -> Self {
        Span {
            start: m.start(),
            end: m.end(),
        }
    }
}

/// Compiles patterns and scans text for non-overlapping matches
pub trait PatternEngine {
    /// Compiled pattern, reusable across texts
    type Matcher;

    /// Short engine name used in reports
    fn name(&self) -> &'static str;

    /// Compile `pattern`
    fn compile(&self, pattern: &str) -> Result<Self::Matcher, PatternError>;

    /// Collect every match, in order
    fn scan(&self, matcher: &Self::Matcher, text: &str) -> Vec<Span>;

    /// Call `f` for every match, in order.
    ///
    /// Each call walks `text` from the start, so it can be repeated.
    fn scan_each<F>(&self, matcher: &Self::Matcher, text: &str, f: F)
    where
        F: FnMut(Span);

    /// Number of matches in `text`
    fn count(&self, matcher: &Self::Matcher, text: &str) -> usize {
        let mut count = 0;
        self.scan_each(matcher, text, |_| count += 1);
        count
    }
}

/// `regex::Regex` over UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeRegex;

impl PatternEngine for UnicodeRegex {
    type Matcher = regex::Regex;

    fn name(&self) -> &'static str {
        "regex"
    }

    fn compile(&self, pattern: &str) -> Result<Self::Matcher, PatternError> {
        regex::Regex::new(pattern).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    }

    fn scan(&self, matcher: &Self::Matcher, text: &str) -> Vec<Span> {
        matcher.find_iter(text).map(Span::from).collect()
    }

    fn scan_each<F>(&self, matcher: &Self::Matcher, text: &str, mut f: F)
    where
        F: FnMut(Span),
    {
        for m in matcher.find_iter(text) {
            f(m.into());
        }
    }
}

/// `regex::bytes::Regex` over the text's UTF-8 bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteRegex;

impl PatternEngine for ByteRegex {
    type Matcher = regex::bytes::Regex;

    fn name(&self) -> &'static str {
        "bytes"
    }

    fn compile(&self, pattern: &str) -> Result<Self::Matcher, PatternError> {
        regex::bytes::Regex::new(pattern).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
    }

    fn scan(&self, matcher: &Self::Matcher, text: &str) -> Vec<Span> {
        matcher.find_iter(text.as_bytes()).map(Span::from).collect()
    }

    fn scan_each<F>(&self, matcher: &Self::Matcher, text: &str, mut f: F)
    where
        F: FnMut(Span),
    {
        for m in matcher.find_iter(text.as_bytes()) {
            f(m.into());
        }
    }
}

/// Engine selection for config files and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// [`UnicodeRegex`]
    #[default]
    Regex,
    /// [`ByteRegex`]
    Bytes,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Regex => f.write_str(UnicodeRegex.name()),
            EngineKind::Bytes => f.write_str(ByteRegex.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "mail ana@example.com or bo@test.org, not @nobody";
    const EMAIL: &str = r"[\w\.+-]+@[\w\.-]+\.[\w\.-]+";

    fn both_agree<E: PatternEngine>(engine: &E, pattern: &str, text: &str) -> usize {
        let matcher = engine.compile(pattern).unwrap();
        let eager = engine.scan(&matcher, text);
        let mut lazy = Vec::new();
        engine.scan_each(&matcher, text, |span| lazy.push(span));
        assert_eq!(eager, lazy);
        eager.len()
    }

    #[test]
    fn test_unicode_scan() {
        let matcher = UnicodeRegex.compile(EMAIL).unwrap();
        let spans = UnicodeRegex.scan(&matcher, TEXT);

        assert_eq!(spans.len(), 2);
        assert_eq!(&TEXT[spans[0].start..spans[0].end], "ana@example.com");
        assert_eq!(spans[1].len(), "bo@test.org".len());
    }

    #[test]
    fn test_engines_agree() {
        for pattern in [".", EMAIL, r"\b\w+\b", "o"] {
            let unicode = both_agree(&UnicodeRegex, pattern, TEXT);
            let bytes = both_agree(&ByteRegex, pattern, TEXT);
            assert_eq!(unicode, bytes, "pattern {pattern}");
        }
    }

    #[test]
    fn test_non_ascii_dot() {
        let text = "naïve café";
        assert_eq!(both_agree(&UnicodeRegex, ".", text), 10);
        assert_eq!(both_agree(&ByteRegex, ".", text), 10);
    }

    #[test]
    fn test_scan_each_restarts() {
        let matcher = ByteRegex.compile("o").unwrap();
        assert_eq!(
            ByteRegex.count(&matcher, TEXT),
            ByteRegex.count(&matcher, TEXT)
        );
    }

    #[test]
    fn test_compile_error() {
        let err = UnicodeRegex.compile(r"foo(?=bar)").unwrap_err();
        assert_eq!(err.pattern, r"foo(?=bar)");
        assert!(err.to_string().starts_with("Invalid pattern `foo(?=bar)`"));
        assert!(ByteRegex.compile("(unclosed").is_err());
    }

    #[test]
    fn test_engine_kind_names() {
        assert_eq!(EngineKind::Regex.to_string(), "regex");
        assert_eq!(EngineKind::Bytes.to_string(), "bytes");
        assert_eq!(EngineKind::default(), EngineKind::Regex);
    }
}
