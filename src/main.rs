// LogLens - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Line grammar compilation and ingest pipeline construction
// 4. Session restore and files named on the command line
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::ui::...` etc.
pub use loglens::app;
pub use loglens::core;
pub use loglens::platform;
pub use loglens::ui;
pub use loglens::util;

use crate::core::parser::Grammar;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// LogLens - tabbed desktop log viewer.
///
/// Opens large log files in the background, one at a time, into tabs that
/// each keep their own filters, sort order, and paging.
#[derive(Parser, Debug)]
#[command(name = "LogLens", version, about)]
struct Cli {
    /// Log files to open in a new tab.
    files: Vec<PathBuf>,

    /// Directory containing config.toml (overrides the platform default).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Records per streamed batch (overrides config).
    #[arg(short = 'b', long = "batch-size")]
    batch_size: Option<usize>,

    /// Rows per page (overrides config).
    #[arg(short = 'p', long = "page-size")]
    page_size: Option<usize>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Neither restore nor save the session.
    #[arg(long = "no-session")]
    no_session: bool,
}

/// Apply a CLI override if it is inside `range`, otherwise warn.
fn override_in_range(
    name: &str,
    value: Option<usize>,
    range: std::ops::RangeInclusive<usize>,
    target: &mut usize,
    warnings: &mut Vec<String>,
) {
    let Some(value) = value else {
        return;
    };
    if range.contains(&value) {
        *target = value;
    } else {
        warnings.push(format!(
            "--{name} {value} is out of range ({}-{}). Using {target}.",
            range.start(),
            range.end()
        ));
    }
}

fn main() {
    let cli = Cli::parse();

    // Config must be read before logging starts: it selects the level and
    // the log file. Its warnings are logged once the subscriber exists.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (mut config, mut warnings) = platform::config::load_config(&config_dir);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config_dir = %config_dir.display(),
        "LogLens starting"
    );

    override_in_range(
        "batch-size",
        cli.batch_size,
        util::constants::MIN_BATCH_SIZE..=util::constants::MAX_BATCH_SIZE,
        &mut config.batch_size,
        &mut warnings,
    );
    override_in_range(
        "page-size",
        cli.page_size,
        util::constants::MIN_PAGE_SIZE..=util::constants::MAX_PAGE_SIZE,
        &mut config.page_size,
        &mut warnings,
    );

    let grammar = match config.line_pattern.as_deref() {
        Some(pattern) => match Grammar::compile(pattern) {
            Ok(grammar) => grammar,
            Err(e) => {
                warnings.push(format!(
                    "[parsing] line_pattern rejected: {e}. Using the built-in pattern."
                ));
                Grammar::default()
            }
        },
        None => Grammar::default(),
    };
    tracing::debug!(pattern = grammar.pattern(), "Line grammar ready");

    for warning in &warnings {
        tracing::warn!(warning = %warning, "Startup warning");
    }

    let service = app::loader::LoadingService::new(
        Arc::new(grammar),
        app::loader::RetryPolicy::from_config(&config),
    );
    let ingest = app::ingest::IngestController::new(service, config.batch_size);

    let session_path = if cli.no_session {
        None
    } else {
        Some(app::session::session_path(&platform_paths.data_dir))
    };

    let mut state =
        app::state::AppState::new(config, ingest, session_path.clone(), cli.debug);
    for warning in warnings {
        state.push_warning(warning);
    }

    if let Some(data) = session_path.as_deref().and_then(app::session::load) {
        state.restore_session(data);
    }
    if !cli.files.is_empty() {
        state.open_in_new_view(&cli.files);
    }

    tracing::info!(views = state.tab_order.len(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::LogLensApp::new(state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogLens GUI: {e}");
        std::process::exit(1);
    }
}
