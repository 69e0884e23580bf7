// HydroFlow Export - app/log_store.rs
//
// The application log: an ordered, append-only sequence of timestamped
// messages. The calculator appends to it while it runs; exports only ever
// read it.

use crate::core::log_source::{
    detect_format, parse_json_log, parse_text_log, strip_bom, LogInputFormat,
};
use crate::core::model::LogEntry;
use crate::util::constants;
use crate::util::error::SourceError;
use std::path::Path;

/// Ordered, append-only application log.
#[derive(Debug, Clone, Default)]
pub struct AppLog {
    entries: Vec<LogEntry>,
}

impl AppLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a log dump read from `path`.
    ///
    /// `path` picks the format when `format` is `Auto` and gives error
    /// context; the content is read by the caller. A leading byte-order
    /// mark is ignored.
    pub fn from_dump(
        content: &str,
        path: &Path,
        format: LogInputFormat,
    ) -> Result<Self, SourceError> {
        let content = strip_bom(content);
        let resolved = match format {
            LogInputFormat::Auto => {
                detect_format(path.file_name().and_then(|n| n.to_str()), content)
            }
            other => other,
        };

        let entries = match resolved {
            LogInputFormat::Json => {
                parse_json_log(content).map_err(|e| SourceError::Json {
                    path: path.to_path_buf(),
                    source: e,
                })?
            }
            LogInputFormat::Text | LogInputFormat::Auto => parse_text_log(content),
        };

        tracing::debug!(
            path = %path.display(),
            format = %resolved,
            entries = entries.len(),
            "Log dump decoded"
        );

        Ok(Self { entries })
    }

    /// Append a message stamped with the current local time.
    ///
    /// This is the logging entry point for a front-end that embeds the
    /// library and runs calculations in-process: it records the parameters,
    /// curve, level, and chart lines as they happen, then exports the same
    /// `AppLog` with `export_log`. The CLI only ever loads finished dumps.
    pub fn record(&mut self, message: impl Into<String>) -> &LogEntry {
        let timestamp = chrono::Local::now()
            .format(constants::LOG_TIMESTAMP_FORMAT)
            .to_string();
        self.push(LogEntry::new(timestamp, message))
    }

    /// Append an already-stamped entry.
    pub fn push(&mut self, entry: LogEntry) -> &LogEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
