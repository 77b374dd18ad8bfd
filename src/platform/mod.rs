// Logalizer - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, memmap2, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod exec;
pub mod fs;
