// HydroFlow Export - platform/sink.rs
//
// Directory-backed artifact sink. Text artifacts are written verbatim;
// spreadsheet artifacts are turned into an XLSX workbook here, so the core
// layer never touches the workbook library.

use crate::core::export::{ArtifactBody, ArtifactSink, ExportArtifact};
use crate::core::model::{Cell, ExportFormat};
use crate::platform::fs::write_atomic;
use crate::util::constants;
use crate::util::error::ExportError;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};

/// Writes each artifact to `<dir>/<file_name>`, creating `dir` on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn emit(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ExportError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.dir.join(&artifact.file_name);

        match (&artifact.body, artifact.format) {
            (ArtifactBody::Sheet(rows), ExportFormat::Xlsx) => write_xlsx(rows, &path)?,
            (ArtifactBody::Text(text), ExportFormat::Txt | ExportFormat::Csv) => {
                write_atomic(&path, text.as_bytes()).map_err(|e| ExportError::Io {
                    path: path.clone(),
                    source: e,
                })?
            }
            (_, format) => {
                return Err(ExportError::BodyMismatch {
                    file_name: artifact.file_name.clone(),
                    expected: match format {
                        ExportFormat::Xlsx => "spreadsheet",
                        ExportFormat::Txt | ExportFormat::Csv => "text",
                    },
                })
            }
        }

        tracing::info!(
            path = %path.display(),
            media_type = artifact.media_type,
            "Export written"
        );
        Ok(path)
    }
}

/// Build a single-sheet workbook from a cell matrix (first row = headers)
/// and save it to `path`.
pub fn write_xlsx(rows: &[Vec<Cell>], path: &Path) -> Result<(), ExportError> {
    build_workbook(rows, path).map_err(|e| ExportError::Xlsx {
        path: path.to_path_buf(),
        source: e,
    })
}

fn build_workbook(rows: &[Vec<Cell>], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(constants::XLSX_SHEET_NAME)?;

    let columns = rows.first().map_or(0, Vec::len);
    for col in 0..columns {
        worksheet.set_column_width(col as u16, constants::XLSX_COLUMN_WIDTH)?;
    }
    if !rows.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Empty => {}
                Cell::Int(i) => {
                    worksheet.write_number(r, c, *i as f64)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Text(s) if r == 0 => {
                    worksheet.write_string_with_format(r, c, s, &header_format)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
