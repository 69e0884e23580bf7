// HydroFlow Export - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Log Entry (input of the pipeline)
// =============================================================================

/// A single message of the application log.
///
/// The timestamp is an opaque token: it is copied into reports verbatim and
/// never parsed. Entries are supplied in insertion (chronological) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp token as produced by the logging facility.
    #[serde(default)]
    pub timestamp: String,

    /// Free-text message.
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Calculation records (output of segmentation)
// =============================================================================

/// One row of a consumption-curve table, kept as raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub message: String,
    pub timestamp: String,
}

/// One full hydraulic computation run reconstructed from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRecord {
    /// Timestamp of the parameters line that opened the record.
    pub timestamp: String,

    /// Raw parameters line (re-parsed by the report generators).
    pub parameters: String,

    /// Raw "Generating consumption curve:" line. Empty if never seen.
    pub consumption_curve_info: String,

    /// Level rows in encounter order.
    pub levels: Vec<LevelEntry>,

    /// Raw "Chart generated with N data points" line, if the run finished.
    pub end_message: Option<String>,
}

impl CalculationRecord {
    /// Open a new record from a parameters line.
    pub fn open(entry: &LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.clone(),
            parameters: entry.message.clone(),
            consumption_curve_info: String::new(),
            levels: Vec::new(),
            end_message: None,
        }
    }
}

// =============================================================================
// Parsed fields
// =============================================================================
//
// `None` is the empty-value sentinel: a field whose marker is absent from
// the message. It renders as an empty CSV field and a blank cell, never as 0.

/// Calculation inputs parsed from a parameters line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedParameters {
    /// Discharge coefficient `m`.
    pub m: Option<f64>,
    /// Water level elevation (m a.s.l.).
    pub water_level_elevation: Option<f64>,
    /// Spillway crest elevation (m a.s.l.).
    pub spillway_elevation: Option<f64>,
    /// Spillway width `b` (m).
    pub width: Option<f64>,
    /// Number of piers `n`.
    pub pier_count: Option<i64>,
    /// Pier shape, free text.
    pub pier_type: Option<String>,
    /// Pier contraction coefficient `ξ`.
    pub eta: Option<f64>,
}

/// Level range description parsed from a curve-info line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRangeInfo {
    /// Range text in cm, e.g. `0-200`.
    pub range: Option<String>,
    /// Segment size in cm.
    pub segment: Option<i64>,
}

/// One consumption-curve point parsed from a level line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLevelData {
    /// Water level above the crest (cm).
    pub level: Option<i64>,
    /// Head `h` (m).
    pub h: Option<f64>,
    /// Flow `Q` (m³/s).
    pub q: Option<f64>,
}

// =============================================================================
// Spreadsheet cells
// =============================================================================

/// A typed cell of the tabular report handed to the spreadsheet sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Number(f64),
    Text(String),
    Empty,
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Empty, Cell::Number)
    }
}

impl From<Option<i64>> for Cell {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Cell::Empty, Cell::Int)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        v.map_or(Cell::Empty, Cell::Text)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

// =============================================================================
// Export selectors
// =============================================================================

/// Which calculations an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportScope {
    /// The single most recent calculation, exported verbatim.
    Last,
    /// Every calculation, with duplicates removed.
    #[default]
    All,
}

impl ExportScope {
    /// Selector text, also used in the artifact file name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportScope::Last => "last",
            ExportScope::All => "all",
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" => Ok(ExportScope::Last),
            "all" => Ok(ExportScope::All),
            other => Err(format!(
                "unknown export scope '{other}' (expected \"last\" or \"all\")"
            )),
        }
    }
}

/// Report format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// Narrative plain-text dump.
    #[default]
    Txt,
    /// Flattened comma-separated rows.
    Csv,
    /// Flattened workbook built by the spreadsheet sink.
    Xlsx,
}

impl ExportFormat {
    /// Resolve a format selector. Unrecognised selectors fall back to the
    /// narrative text format instead of failing the export.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_lowercase().as_str() {
            "txt" => ExportFormat::Txt,
            "csv" => ExportFormat::Csv,
            "xlsx" => ExportFormat::Xlsx,
            other => {
                tracing::warn!(
                    selector = other,
                    "Unrecognised export format, falling back to txt"
                );
                ExportFormat::Txt
            }
        }
    }

    /// Whether `selector` names a known format.
    pub fn is_known_selector(selector: &str) -> bool {
        matches!(
            selector.trim().to_lowercase().as_str(),
            "txt" | "csv" | "xlsx"
        )
    }

    /// File extension of the artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Media type tag passed to the sink.
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "text/plain",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Request-scoped export configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportRequest {
    pub scope: ExportScope,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(scope: ExportScope, format: ExportFormat) -> Self {
        Self { scope, format }
    }

    /// Deterministic artifact name: `hydroflow_export_<scope>.<ext>`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            crate::util::constants::EXPORT_FILE_PREFIX,
            self.scope.as_str(),
            self.format.extension()
        )
    }
}
