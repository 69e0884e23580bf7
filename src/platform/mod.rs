// HydroFlow Export - platform/mod.rs
//
// Platform abstraction layer: config directories, filesystem access,
// and the artifact sink.
// Dependencies: core (model and sink trait), directories, rust_xlsxwriter.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
pub mod sink;
