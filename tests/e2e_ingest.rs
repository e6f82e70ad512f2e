// LogLens - tests/e2e_ingest.rs
//
// End-to-end tests for the ingest pipeline: loading service, ingest
// controller, view registry, and the application state that glues them.
//
// Uses the fixture files in tests/fixtures/ and temporary files for the
// failure cases.

use loglens::app::ingest::IngestController;
use loglens::app::loader::{LoadingService, RetryPolicy};
use loglens::app::session;
use loglens::app::state::AppState;
use loglens::core::model::{Column, IngestEvent, SearchField, SortOrder, ViewId};
use loglens::core::parser::Grammar;
use loglens::platform::config::AppConfig;
use loglens::platform::fs::FileProbe;
use loglens::util::error::LoadError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn app_state(session_path: Option<PathBuf>) -> AppState {
    let config = AppConfig::default();
    let service = LoadingService::new(Arc::new(Grammar::default()), RetryPolicy::default());
    let ingest = IngestController::new(service, 3);
    AppState::new(config, ingest, session_path, false)
}

/// Pump until the controller has nothing left to do.
fn drain(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while state.ingest_active() {
        assert!(Instant::now() < deadline, "ingest did not settle");
        state.pump_ingest(usize::MAX);
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn e2e_two_files_in_two_views_stay_separate() {
    let mut state = app_state(None);
    let gateway = state
        .open_in_new_view(&[fixture("gateway_sample.log")])
        .unwrap();
    let billing = state
        .open_in_new_view(&[fixture("billing_sample.log")])
        .unwrap();
    drain(&mut state);

    let g = state.views.get(gateway).unwrap();
    let b = state.views.get(billing).unwrap();
    assert_eq!(g.records().len(), 10, "header and continuation lines are skipped");
    assert_eq!(b.records().len(), 4);
    assert_eq!(g.title(), "Gateway");
    assert_eq!(b.title(), "Billing");
    assert!(g.records().iter().all(|r| r.app_name == "Gateway"));
    assert!(b.records().iter().all(|r| r.app_name == "Billing"));
    assert_eq!(state.current_view, Some(billing));
    assert!(state.warnings.is_empty());
    assert_eq!(state.catalog.file_count(), 2);
}

#[test]
fn e2e_crlf_lines_are_parsed_without_carriage_returns() {
    let mut state = app_state(None);
    let id = state
        .open_in_new_view(&[fixture("billing_sample.log")])
        .unwrap();
    drain(&mut state);

    let view = state.views.get(id).unwrap();
    let last = view.records().last().unwrap();
    assert_eq!(last.message, "Nightly batch finished");
    assert_eq!(last.timestamp, "2024-01-15T08:15:30Z");
    assert!(view.records().iter().all(|r| !r.message.ends_with('\r')));
}

#[test]
fn e2e_filters_sort_and_paging_over_merged_view() {
    let mut state = app_state(None);
    let id = state
        .open_in_new_view(&[fixture("gateway_sample.log"), fixture("billing_sample.log")])
        .unwrap();
    drain(&mut state);
    assert_eq!(state.views.get(id).unwrap().records().len(), 14);

    // Level filter spans both files.
    state.views.set_levels(id, ["ERROR"]);
    assert_eq!(state.views.get(id).unwrap().filtered_count(), 3);

    // Plain search is case-insensitive and combines with the level filter.
    state
        .views
        .set_search(id, "gateway", SearchField::Message, false);
    assert_eq!(state.views.get(id).unwrap().filtered_count(), 1);

    // Application filter narrows to one file.
    state.views.set_search(id, "", SearchField::All, false);
    state.views.set_levels(id, Vec::<String>::new());
    state.views.set_app_filter(id, "Billing");
    assert_eq!(state.views.get(id).unwrap().filtered_count(), 4);
    state.views.set_app_filter(id, "");

    let view = state.views.get_mut(id).unwrap();
    view.sort(Column::Timestamp, SortOrder::Ascending);
    assert_eq!(view.record_at(0).unwrap().app_name, "Billing");
    assert_eq!(view.record_at(0).unwrap().message, "Worker pool started (4 threads)");

    view.set_page_size(4);
    assert_eq!(view.paging().total_pages(), 4);
    view.set_page(4);
    assert_eq!(view.row_count(), 2);
    assert_eq!(view.record_at(1).unwrap().message, "Nightly batch finished");
    view.set_page(99);
    assert_eq!(view.paging().current_page(), 4);
}

#[test]
fn e2e_missing_file_reports_error_and_pipeline_continues() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.log");
    let mut state = app_state(None);
    let id = state
        .open_in_new_view(&[missing.clone(), fixture("gateway_sample.log")])
        .unwrap();
    drain(&mut state);

    let view = state.views.get(id).unwrap();
    assert_eq!(view.records().len(), 10);
    assert_eq!(view.loaded_files(), &[fixture("gateway_sample.log")]);
    assert!(view.last_error().is_some());
    assert_eq!(state.warnings.len(), 1);
    assert!(state.warnings[0].contains("missing.log"));
}

/// Accepts every path so failures happen inside the worker.
struct AcceptAll;

impl FileProbe for AcceptAll {
    fn check(&self, _path: &Path) -> Result<u64, LoadError> {
        Ok(0)
    }
}

#[test]
fn e2e_failing_stream_retries_then_emits_one_error_and_one_idle() {
    let dir = TempDir::new().unwrap();
    let delay = Duration::from_millis(10);
    let service = LoadingService::with_probe(
        Arc::new(Grammar::default()),
        RetryPolicy {
            max_retries: 3,
            retry_delay: delay,
        },
        Box::new(AcceptAll),
    );
    let mut controller = IngestController::new(service, 5);
    controller.enqueue(ViewId(7), dir.path().join("never-there.log"));
    let started = Instant::now();
    assert!(controller.start_next_if_idle(5));

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while !events.iter().any(|e| matches!(e, IngestEvent::Idle)) {
        assert!(Instant::now() < deadline, "no Idle within deadline");
        events.extend(controller.poll());
        std::thread::sleep(Duration::from_millis(5));
    }
    std::thread::sleep(Duration::from_millis(50));
    events.extend(controller.poll());

    let errors: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            IngestEvent::Error { view, .. } => Some(*view),
            _ => None,
        })
        .collect();
    assert_eq!(errors, vec![ViewId(7)]);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, IngestEvent::Idle))
            .count(),
        1
    );
    assert!(started.elapsed() >= delay * 3);
    assert!(!controller.is_busy());
}

#[test]
fn e2e_load_sync_matches_streamed_records() {
    let service = LoadingService::new(Arc::new(Grammar::default()), RetryPolicy::default());
    let records = service.load_sync(&fixture("gateway_sample.log")).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].message, "Listening on 0.0.0.0:8443");
    assert_eq!(records[3].level, "ERROR");
}

#[test]
fn e2e_session_round_trip_restores_views_and_filters() {
    let dir = TempDir::new().unwrap();
    let session_file = session::session_path(dir.path());

    let mut first = app_state(Some(session_file.clone()));
    let id = first
        .open_in_new_view(&[fixture("gateway_sample.log")])
        .unwrap();
    drain(&mut first);
    first.views.set_levels(id, ["WARN"]);
    if let Some(view) = first.views.get_mut(id) {
        view.sort(Column::Message, SortOrder::Descending);
    }
    first.save_session();
    drop(first);

    let data = session::load(&session_file).expect("session written");
    let mut second = app_state(None);
    second.restore_session(data);
    drain(&mut second);

    assert_eq!(second.tab_order.len(), 1);
    let restored = second.current_view.unwrap();
    let view = second.views.get(restored).unwrap();
    assert_eq!(view.title(), "Gateway");
    assert_eq!(view.records().len(), 10);
    assert_eq!(view.filtered_count(), 2);
    assert_eq!(
        view.proxy().sort_state(),
        Some((Column::Message, SortOrder::Descending))
    );
    assert_eq!(view.record_at(0).unwrap().message, "Upstream auth slow: 1840 ms");
}
