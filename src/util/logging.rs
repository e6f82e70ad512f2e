// LogLens - util/logging.rs
//
// tracing subscriber setup.
//
// The filter comes from the first of: RUST_LOG, --debug, the [logging] level
// in config.toml, then "info". Output goes to stderr unless [logging] file
// names a writable file, in which case ANSI colours are off.
// Record contents are only ever logged at trace level.

use super::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where the active filter directive came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterSource {
    Environment,
    Directive(String),
}

fn select_filter(env_set: bool, debug_flag: bool, config_level: Option<&str>) -> FilterSource {
    if env_set {
        FilterSource::Environment
    } else if debug_flag {
        FilterSource::Directive("debug".to_string())
    } else {
        let level = config_level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL);
        FilterSource::Directive(level.to_lowercase())
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(debug_flag: bool, config_level: Option<&str>, log_file: Option<&Path>) {
    let source = select_filter(std::env::var_os("RUST_LOG").is_some(), debug_flag, config_level);
    let filter = match &source {
        FilterSource::Environment => EnvFilter::from_default_env(),
        FilterSource::Directive(directive) => EnvFilter::new(directive),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .compact();

    let mut file_error = None;
    let installed = match log_file.map(std::fs::File::create) {
        Some(Ok(file)) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        Some(Err(e)) => {
            file_error = Some(e);
            builder.try_init()
        }
        None => builder.try_init(),
    };
    if installed.is_err() {
        return;
    }

    if let (Some(path), Some(e)) = (log_file, file_error) {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Cannot open log file; logging to stderr"
        );
    }

    tracing::debug!(app = APP_NAME, version = APP_VERSION, filter = ?source, "Logging ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_everything() {
        assert_eq!(select_filter(true, true, Some("trace")), FilterSource::Environment);
    }

    #[test]
    fn test_debug_flag_beats_config_level() {
        assert_eq!(
            select_filter(false, true, Some("warn")),
            FilterSource::Directive("debug".to_string())
        );
    }

    #[test]
    fn test_config_level_then_default() {
        assert_eq!(
            select_filter(false, false, Some(" WARN ")),
            FilterSource::Directive("warn".to_string())
        );
        assert_eq!(
            select_filter(false, false, Some("")),
            FilterSource::Directive(DEFAULT_LOG_LEVEL.to_string())
        );
        assert_eq!(
            select_filter(false, false, None),
            FilterSource::Directive(DEFAULT_LOG_LEVEL.to_string())
        );
    }
}
