// Logalizer - app/mod.rs
//
// Application layer: wires core logic to the filesystem and external
// commands for one translation job.
// Dependencies: core, platform, util.

pub mod job;
