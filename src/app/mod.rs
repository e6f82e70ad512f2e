// LogLens - app/mod.rs
//
// Application layer: ingestion scheduling, views, session, state.
// Dependencies: core, platform (file probe, config values), util.
// Must NOT depend on: ui.

pub mod catalog;
pub mod ingest;
pub mod loader;
pub mod queue;
pub mod session;
pub mod state;
pub mod view;
pub mod worker;
