// HydroFlow Export - app/mod.rs
//
// Application layer: the in-process log and export orchestration.
// Dependencies: core layer.
// Must NOT depend on: platform specifics (sinks arrive as trait objects).

pub mod exporter;
pub mod log_store;
