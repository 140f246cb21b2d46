//! Fixture Loading
//!
//! The scanned text is read from a file once per run. If the file cannot be
//! read, the configured fallback text is used instead and the error is only
//! logged.

use scanbench_report::FixtureSource;
use std::path::PathBuf;
use tracing::{info, warn};

/// Built-in fixture used when no file is configured or readable
pub const DEFAULT_FIXTURE: &str = "\
Release notes are mailed to dev-list@lists.example.org and archived at \
https://www.example.org/releases/index.html?year=2024#latest for reference.
Questions go to support+scan@help.example.com; escalations to ops.team@corp.example.net.
The build farm sits behind 10.0.12.7 and 192.168.100.254, while 256.300.1.1 is a typo \
and 8.8.8.8 answers DNS. Mirrors: http://mirror.example.com/pub/ and \
https://cdn.example.net/assets/v2/app.js?v=3.
Ünïcödé text, tabs\tand digits 0123456789 keep the dot benchmark honest.
";

/// Text to scan and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Fixture contents
    pub text: String,
    /// Origin of `text`
    pub source: FixtureSource,
}

impl Fixture {
    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the fixture is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reads the fixture file, falling back to an in-memory text
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    path: Option<PathBuf>,
    fallback: String,
}

impl FixtureLoader {
    /// Loader for `path` with `fallback` as the substitute text
    pub fn new(path: Option<PathBuf>, fallback: impl Into<String>) -> Self {
        Self {
            path,
            fallback: fallback.into(),
        }
    }

    /// Load the fixture. Never fails: IO errors select the fallback text.
    pub fn load(&self) -> Fixture {
        if let Some(path) = &self.path {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    info!(path = %path.display(), bytes = text.len(), "loaded fixture");
                    return Fixture {
                        text,
                        source: FixtureSource::File { path: path.clone() },
                    };
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "fixture unreadable, using fallback text"
                    );
                }
            }
        }

        Fixture {
            text: self.fallback.clone(),
            source: FixtureSource::Fallback,
        }
    }
}

impl Default for FixtureLoader {
    fn default() -> Self {
        Self::new(None, DEFAULT_FIXTURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a@b.co").unwrap();

        let fixture = FixtureLoader::new(Some(file.path().to_path_buf()), "unused").load();
        assert_eq!(fixture.text, "a@b.co");
        assert_eq!(
            fixture.source,
            FixtureSource::File {
                path: file.path().to_path_buf()
            }
        );
    }

    #[test]
    fn test_missing_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.txt");

        let fixture = FixtureLoader::new(Some(missing), "fallback text").load();
        assert_eq!(fixture.text, "fallback text");
        assert_eq!(fixture.source, FixtureSource::Fallback);
    }

    #[test]
    fn test_no_path_uses_fallback() {
        let fixture = FixtureLoader::default().load();
        assert_eq!(fixture.text, DEFAULT_FIXTURE);
        assert_eq!(fixture.len(), DEFAULT_FIXTURE.len());
        assert!(!fixture.is_empty());
    }
}
