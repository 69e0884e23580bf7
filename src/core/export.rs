// HydroFlow Export - core/export.rs
//
// Export orchestration: scope selection, format dispatch, artifact naming.
// Core layer: produces an in-memory artifact; persisting it is the job of an
// `ArtifactSink` implementation in the platform layer.
//
// One export request is one synchronous pass over the log. A log without
// calculations stops the export before anything is generated.

use crate::core::dedup::remove_duplicates;
use crate::core::model::{
    CalculationRecord, Cell, ExportFormat, ExportRequest, ExportScope, LogEntry,
};
use crate::core::report;
use crate::core::segmenter::extract_calculations;
use crate::util::error::ExportError;
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Artifacts
// =============================================================================

/// Generated content of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactBody {
    /// Finished text (TXT, CSV).
    Text(String),
    /// Cell matrix with a header row; the sink builds the workbook.
    Sheet(Vec<Vec<Cell>>),
}

/// The single file produced by one export request.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// `hydroflow_export_<scope>.<ext>`
    pub file_name: String,
    pub format: ExportFormat,
    pub media_type: &'static str,
    pub body: ArtifactBody,
}

/// Persists artifacts. Returns the location the artifact was written to.
pub trait ArtifactSink {
    fn emit(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError>;
}

/// A prepared export, ready to hand to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedExport {
    pub artifact: ExportArtifact,
    /// Records segmented from the log.
    pub calculations_found: usize,
    /// Records included in the artifact.
    pub calculations_exported: usize,
    /// Records dropped as duplicates (always 0 for the `last` scope).
    pub duplicates_removed: usize,
}

/// Result of preparing an export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The log holds no calculation; nothing is produced.
    NoCalculations,
    Prepared(PreparedExport),
}

// =============================================================================
// Pipeline
// =============================================================================

/// Pick the records an export covers.
///
/// `Last` takes the final record verbatim and never deduplicates, even if
/// an identical earlier run exists. `All` always deduplicates.
pub fn select_calculations(
    records: Vec<CalculationRecord>,
    scope: ExportScope,
) -> Vec<CalculationRecord> {
    match scope {
        ExportScope::Last => records.into_iter().last().into_iter().collect(),
        ExportScope::All => remove_duplicates(records),
    }
}

/// Generate the artifact body for `format`.
pub fn render(
    calculations: &[CalculationRecord],
    format: ExportFormat,
    file_name: &str,
) -> Result<ArtifactBody, ExportError> {
    Ok(match format {
        ExportFormat::Txt => ArtifactBody::Text(report::generate_txt(calculations)),
        ExportFormat::Csv => {
            ArtifactBody::Text(report::generate_csv(calculations, Path::new(file_name))?)
        }
        ExportFormat::Xlsx => ArtifactBody::Sheet(report::generate_matrix(calculations)),
    })
}

/// Run the extraction pipeline over the log and build the artifact for
/// `request`.
pub fn prepare_export(
    entries: &[LogEntry],
    request: ExportRequest,
) -> Result<ExportOutcome, ExportError> {
    let records = extract_calculations(entries);
    let found = records.len();

    if found == 0 {
        tracing::info!(entries = entries.len(), "No calculations found in log");
        return Ok(ExportOutcome::NoCalculations);
    }

    let selected = select_calculations(records, request.scope);
    let duplicates_removed = match request.scope {
        ExportScope::Last => 0,
        ExportScope::All => found - selected.len(),
    };
    if duplicates_removed > 0 {
        tracing::info!(
            found,
            unique = selected.len(),
            "Calculations found, only unique ones will be exported"
        );
    }

    let file_name = request.file_name();
    let body = render(&selected, request.format, &file_name)?;

    tracing::debug!(
        file = %file_name,
        scope = %request.scope,
        format = %request.format,
        exported = selected.len(),
        "Export artifact generated"
    );

    Ok(ExportOutcome::Prepared(PreparedExport {
        artifact: ExportArtifact {
            file_name,
            format: request.format,
            media_type: request.format.media_type(),
            body,
        },
        calculations_found: found,
        calculations_exported: selected.len(),
        duplicates_removed,
    }))
}

// =============================================================================
// Listing
// =============================================================================

/// One line of the calculation listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationSummary {
    pub index: usize,
    pub timestamp: String,
    pub levels: usize,
    pub finished: bool,
}

impl fmt::Display for CalculationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  [{}]  {} level(s){}",
            self.index,
            self.timestamp,
            self.levels,
            if self.finished { "" } else { "  (unfinished)" }
        )
    }
}

/// Summarise records for listing, numbered from 1.
pub fn summarize(records: &[CalculationRecord]) -> Vec<CalculationSummary> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| CalculationSummary {
            index: i + 1,
            timestamp: r.timestamp.clone(),
            levels: r.levels.len(),
            finished: r.end_message.is_some(),
        })
        .collect()
}
