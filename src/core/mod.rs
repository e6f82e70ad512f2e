// LogLens - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, regex, chrono, rayon, serde.
// Must NOT depend on: ui, platform, app, or any filesystem I/O.

pub mod filter;
pub mod model;
pub mod paging;
pub mod parser;
