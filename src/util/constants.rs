// HydroFlow Export - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Marker texts used by the log classifier live here so the segmenter,
// extractors, and tests all agree on the exact wording.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "HydroFlow Export";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "HydroFlow";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log line markers
// =============================================================================

/// Start marker parts: a parameters line must contain all three.
pub const MARKER_PARAM_M: &str = "m = ";
pub const MARKER_WATER_LEVEL: &str = "kóta hladiny = ";
pub const MARKER_SPILLWAY: &str = "kóta přelivu = ";

/// Curve description marker.
pub const MARKER_CURVE: &str = "Generating consumption curve:";

/// Level line marker parts.
pub const MARKER_LEVEL: &str = "Level ";
pub const MARKER_LEVEL_HEIGHT: &str = "cm: h = ";
pub const MARKER_LEVEL_FLOW: &str = "m, Q = ";

/// End marker parts ("Chart generated with N data points").
pub const MARKER_CHART: &str = "Chart generated with ";
pub const MARKER_DATA_POINTS: &str = "data points";

// =============================================================================
// Input limits
// =============================================================================

/// Maximum size of a log file accepted for export. Larger files are
/// rejected before any bytes are read.
pub const MAX_LOG_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MiB

// =============================================================================
// Export
// =============================================================================

/// Prefix of every generated artifact name: `hydroflow_export_<scope>.<ext>`.
pub const EXPORT_FILE_PREFIX: &str = "hydroflow_export";

/// Worksheet name used for XLSX exports.
pub const XLSX_SHEET_NAME: &str = "HydroFlow Data";

/// Column width (in characters) applied to every XLSX column.
pub const XLSX_COLUMN_WIDTH: f64 = 16.0;

/// Narrative report banner.
pub const TXT_TITLE: &str = "HydroFlow Calculator - Export dat";
pub const TXT_TITLE_RULE: &str = "=====================================";

/// Width of the `=` rule between calculations in the narrative report.
pub const TXT_SEPARATOR_WIDTH: usize = 50;

/// User-facing notice when the log contains no calculation.
pub const NO_CALCULATIONS_NOTICE: &str = "Žádné výpočty k exportu nenalezeny.";

/// Default export format selector.
pub const DEFAULT_EXPORT_FORMAT: &str = "txt";

/// Default export scope selector.
pub const DEFAULT_EXPORT_SCOPE: &str = "all";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log message included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

/// Format used by `AppLog::record` to stamp new messages.
pub const LOG_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
