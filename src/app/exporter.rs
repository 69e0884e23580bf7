// HydroFlow Export - app/exporter.rs
//
// One export request end to end: log → artifact → sink.
// Scope and format arrive with each request.

use crate::app::log_store::AppLog;
use crate::core::export::{prepare_export, ArtifactSink, ExportOutcome};
use crate::core::model::ExportRequest;
use crate::util::constants;
use crate::util::error::Result;
use std::path::PathBuf;

/// What a completed export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub calculations_found: usize,
    pub calculations_exported: usize,
    pub duplicates_removed: usize,
}

/// Outcome of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Written(ExportReport),
    /// The log had no calculation; the user is shown `notice` and nothing
    /// is written.
    NoCalculations { notice: &'static str },
}

/// Export `log` according to `request` into `sink`.
pub fn export_log(
    log: &AppLog,
    request: ExportRequest,
    sink: &mut dyn ArtifactSink,
) -> Result<ExportStatus> {
    tracing::info!(
        scope = %request.scope,
        format = %request.format,
        entries = log.len(),
        "Export requested"
    );

    let prepared = match prepare_export(log.entries(), request)? {
        ExportOutcome::NoCalculations => {
            tracing::warn!("{}", constants::NO_CALCULATIONS_NOTICE);
            return Ok(ExportStatus::NoCalculations {
                notice: constants::NO_CALCULATIONS_NOTICE,
            });
        }
        ExportOutcome::Prepared(p) => p,
    };

    let path = sink.emit(&prepared.artifact)?;

    Ok(ExportStatus::Written(ExportReport {
        path,
        calculations_found: prepared.calculations_found,
        calculations_exported: prepared.calculations_exported,
        duplicates_removed: prepared.duplicates_removed,
    }))
}
