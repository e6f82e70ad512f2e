// LogLens - core/parser.rs
//
// Line parsing against a precompiled regex grammar.
// Core layer: parses one line at a time, never touches the filesystem.
//
// The stream worker only sees the `LineParser` trait, so alternative
// grammars (or test doubles) plug in without touching the ingestion code.

use crate::core::model::Record;
use crate::util::constants;
use crate::util::error::GrammarError;
use regex::Regex;
use std::path::Path;

/// Turns one raw line into a record.
///
/// Implementations must be pure: the same `(line, source)` always yields the
/// same result, and no state carries between calls. They are shared across
/// the UI thread and worker threads.
pub trait LineParser: Send + Sync {
    fn parse_line(&self, line: &str, source: &Path) -> Option<Record>;
}

/// A compiled line grammar.
///
/// Named capture groups:
/// - `message` (required)
/// - `timestamp`, `level`, `app` (optional; empty / file stem when absent)
#[derive(Debug, Clone)]
pub struct Grammar {
    pattern: Regex,
}

impl Grammar {
    /// Compile `pattern`, validating length and required groups.
    pub fn compile(pattern: &str) -> Result<Self, GrammarError> {
        if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
            return Err(GrammarError::PatternTooLong {
                length: pattern.len(),
                max_length: constants::MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| GrammarError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        if !regex.capture_names().flatten().any(|n| n == "message") {
            return Err(GrammarError::MissingGroup { group: "message" });
        }
        Ok(Self { pattern: regex })
    }

    /// Source text of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self {
            pattern: builtin_pattern().clone(),
        }
    }
}

fn builtin_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(constants::DEFAULT_LINE_PATTERN)
            .unwrap_or_else(|e| panic!("built-in line pattern is invalid: {e}"))
    })
}

impl LineParser for Grammar {
    fn parse_line(&self, line: &str, source: &Path) -> Option<Record> {
        if line.trim().is_empty() {
            return None;
        }
        let caps = self.pattern.captures(line)?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };

        let mut app_name = group("app");
        if app_name.is_empty() {
            app_name = file_stem(source);
        }

        Some(Record {
            timestamp: group("timestamp"),
            level: group("level"),
            message: caps
                .name("message")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            app_name,
            source_path: source.to_path_buf(),
        })
    }
}

/// File name without extension, used as the fallback application name and
/// tab title.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}
