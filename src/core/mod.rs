// Logalizer - core/mod.rs
//
// Core translation logic layer.
// Dependencies: standard library, serde, csv, regex, tracing.
// Must NOT depend on: platform, app, or perform any filesystem I/O.

pub mod config;
pub mod dedup;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod output;
pub mod pairs;
pub mod path_vars;
pub mod render;
pub mod translate;
