// HydroFlow Export - core/segmenter.rs
//
// Groups the ordered application log into per-calculation records.
// Core layer: single pass over a slice, no I/O.
//
// The scan is a two-state machine. `Idle` holds no record; `Open` holds the
// record currently being appended to. Every rule of the segmentation is one
// transition in `Segmenter::feed`:
//
//   Idle  --start-->  Open(new)
//   Open  --start-->  Open(new)       previous record is emitted unfinished
//   Open  --curve-->  Open            curve info replaced (last one wins)
//   Open  --level-->  Open            level appended
//   Open  --end---->  Idle            record emitted with its end message
//   Open  --eof---->  Idle            record emitted unfinished
//
// Curve, level, and end lines seen while Idle are ignored, as are lines
// of no known kind.

use crate::core::extract::{classify, LineKind};
use crate::core::model::{CalculationRecord, LevelEntry, LogEntry};
use crate::util::logging::preview;

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Open(CalculationRecord),
}

/// Incremental segmenter. Feed entries in log order, then call `finish`.
#[derive(Debug, Default)]
pub struct Segmenter {
    state: ScanState,
    records: Vec<CalculationRecord>,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one log entry to the state machine.
    pub fn feed(&mut self, entry: &LogEntry) {
        let Some(kind) = classify(&entry.message) else {
            return;
        };

        let state = std::mem::take(&mut self.state);
        self.state = match (state, kind) {
            (ScanState::Idle, LineKind::Start) => ScanState::Open(CalculationRecord::open(entry)),
            (ScanState::Open(previous), LineKind::Start) => {
                tracing::debug!(
                    timestamp = %previous.timestamp,
                    "New calculation started before the previous one ended"
                );
                self.records.push(previous);
                ScanState::Open(CalculationRecord::open(entry))
            }
            (ScanState::Open(mut record), LineKind::CurveInfo) => {
                record.consumption_curve_info = entry.message.clone();
                ScanState::Open(record)
            }
            (ScanState::Open(mut record), LineKind::Level) => {
                record.levels.push(LevelEntry {
                    message: entry.message.clone(),
                    timestamp: entry.timestamp.clone(),
                });
                ScanState::Open(record)
            }
            (ScanState::Open(mut record), LineKind::End) => {
                record.end_message = Some(entry.message.clone());
                self.records.push(record);
                ScanState::Idle
            }
            (ScanState::Idle, _) => {
                tracing::trace!(
                    message = preview(&entry.message),
                    "Calculation line outside any calculation ignored"
                );
                ScanState::Idle
            }
        };
    }

    /// Close the scan, emitting a still-open record, and return all records
    /// in log order.
    pub fn finish(mut self) -> Vec<CalculationRecord> {
        if let ScanState::Open(record) = std::mem::take(&mut self.state) {
            tracing::debug!(
                timestamp = %record.timestamp,
                levels = record.levels.len(),
                "Log ended inside a calculation; emitting it unfinished"
            );
            self.records.push(record);
        }
        self.records
    }
}

/// Segment the full ordered log into calculation records.
pub fn extract_calculations(entries: &[LogEntry]) -> Vec<CalculationRecord> {
    let mut segmenter = Segmenter::new();
    for entry in entries {
        segmenter.feed(entry);
    }
    let records = segmenter.finish();

    tracing::debug!(
        entries = entries.len(),
        calculations = records.len(),
        "Log segmented"
    );

    records
}
