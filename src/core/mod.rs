// HydroFlow Export - core/mod.rs
//
// Core business logic layer: log decoding, segmentation, deduplication,
// and report generation.
// Must NOT depend on: platform, app, or the filesystem.

pub mod dedup;
pub mod export;
pub mod extract;
pub mod log_source;
pub mod model;
pub mod report;
pub mod segmenter;
