// LogLens - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogLens data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/loglens/ or %APPDATA%\LogLens\config\)
    pub config_dir: PathBuf,

    /// Data directory for the session file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[ingest]` section.
    pub ingest: IngestSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[ingest]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct IngestSection {
    /// Records per streamed batch.
    pub batch_size: Option<usize>,
    /// Re-runs allowed after a transient mid-stream failure.
    pub max_retries: Option<u32>,
    /// Delay before each re-run, in ms.
    pub retry_delay_ms: Option<u64>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Rows per page.
    pub page_size: Option<usize>,
    /// Whether new views page their rows.
    pub paging_enabled: Option<bool>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Line grammar regex with named groups.
    pub line_pattern: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Ingest --
    pub batch_size: usize,
    pub max_retries: u32,
    pub retry_delay_ms: u64,

    // -- View --
    pub page_size: usize,
    pub paging_enabled: bool,

    // -- Parsing --
    /// Custom line grammar; `None` uses the built-in pattern.
    pub line_pattern: Option<String>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            batch_size: constants::DEFAULT_BATCH_SIZE,
            max_retries: constants::DEFAULT_MAX_RETRIES,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
            page_size: constants::DEFAULT_PAGE_SIZE,
            paging_enabled: true,
            line_pattern: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning so the
/// application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(&config_path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "Config ignored");
            warnings.push(format!("{e}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Accept `value` if it lies in `range`, otherwise record a warning and keep
/// the default.
fn in_range<T>(
    key: &str,
    value: Option<T>,
    range: std::ops::RangeInclusive<T>,
    default: T,
    warnings: &mut Vec<String>,
) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    match value {
        Some(v) if range.contains(&v) => v,
        Some(v) => {
            let e = ConfigError::ValueOutOfRange {
                field: key.to_string(),
                value: v.to_string(),
                expected: format!("{}-{}", range.start(), range.end()),
            };
            warnings.push(format!("{e}. Using default ({default})."));
            default
        }
        None => default,
    }
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    config.batch_size = in_range(
        "[ingest] batch_size",
        raw.ingest.batch_size,
        constants::MIN_BATCH_SIZE..=constants::MAX_BATCH_SIZE,
        constants::DEFAULT_BATCH_SIZE,
        warnings,
    );
    config.max_retries = in_range(
        "[ingest] max_retries",
        raw.ingest.max_retries,
        0..=constants::ABSOLUTE_MAX_RETRIES,
        constants::DEFAULT_MAX_RETRIES,
        warnings,
    );
    config.retry_delay_ms = in_range(
        "[ingest] retry_delay_ms",
        raw.ingest.retry_delay_ms,
        0..=constants::MAX_RETRY_DELAY_MS,
        constants::DEFAULT_RETRY_DELAY_MS,
        warnings,
    );
    config.page_size = in_range(
        "[view] page_size",
        raw.view.page_size,
        constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE,
        constants::DEFAULT_PAGE_SIZE,
        warnings,
    );

    if let Some(enabled) = raw.view.paging_enabled {
        config.paging_enabled = enabled;
    }

    if let Some(pattern) = raw.parsing.line_pattern {
        if pattern.trim().is_empty() {
            warnings.push(
                "[parsing] line_pattern is empty. Using the built-in pattern.".to_string(),
            );
        } else if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
            warnings.push(format!(
                "[parsing] line_pattern is {} chars, exceeds maximum of {}. Using the built-in pattern.",
                pattern.len(),
                constants::MAX_REGEX_PATTERN_LENGTH,
            ));
        } else {
            config.line_pattern = Some(pattern);
        }
    }

    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(PathBuf::from(file));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), body).unwrap();
    }

    #[test]
    fn test_missing_config_returns_defaults_without_warnings() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[ingest]
batch_size = 250
max_retries = 5
retry_delay_ms = 10

[view]
page_size = 100
paging_enabled = false

[logging]
level = "DEBUG"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay_ms, 10);
        assert_eq!(config.page_size, 100);
        assert!(!config.paging_enabled);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[ingest]
batch_size = 0
max_retries = 999

[view]
page_size = 1

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 4);
        assert_eq!(config.batch_size, constants::DEFAULT_BATCH_SIZE);
        assert_eq!(config.max_retries, constants::DEFAULT_MAX_RETRIES);
        assert_eq!(config.page_size, constants::DEFAULT_PAGE_SIZE);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_malformed_toml_returns_defaults_with_warning() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[ingest\nbatch_size = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }
}
