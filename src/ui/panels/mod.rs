// LogLens - ui/panels/mod.rs

pub mod catalog;
pub mod filters;
pub mod table;
pub mod tabs;
