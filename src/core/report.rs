// HydroFlow Export - core/report.rs
//
// Report generators: narrative text, CSV, and the cell matrix handed to the
// spreadsheet sink. All three consume the same record list; each one
// re-parses parameters and range info itself so it can run on its own.
// Core layer: writes to any Write trait object.

use crate::core::extract::{parse_level_data, parse_parameters, parse_range_info};
use crate::core::model::{CalculationRecord, Cell};
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// CSV column names, in row order.
pub const CSV_HEADERS: [&str; 14] = [
    "Calculation",
    "Timestamp",
    "m",
    "Kota_Hladiny_m",
    "Kota_Prelivu_m",
    "Sirka_b_m",
    "Pocet_Piliru_n",
    "Typ_Pilire",
    "Eta",
    "Range_cm",
    "Segment_cm",
    "Level_cm",
    "Height_h_m",
    "Flow_Q_m3s",
];

/// Spreadsheet column headers with units, same order as `CSV_HEADERS`.
pub const SHEET_HEADERS: [&str; 14] = [
    "Výpočet",
    "Čas",
    "Součinitel m",
    "Kóta hladiny (m.n.m.)",
    "Kóta přelivu (m.n.m.)",
    "Šířka b (m)",
    "Počet pilířů n",
    "Typ pilíře",
    "Eta ξ",
    "Rozsah (cm)",
    "Segment (cm)",
    "Úroveň (cm)",
    "Výška h (m)",
    "Průtok Q (m³/s)",
];

// =============================================================================
// Narrative text
// =============================================================================

/// Human-readable dump: one section per calculation with its raw lines.
pub fn generate_txt(calculations: &[CalculationRecord]) -> String {
    let mut out = String::new();
    out.push_str(constants::TXT_TITLE);
    out.push('\n');
    out.push_str(constants::TXT_TITLE_RULE);
    out.push_str("\n\n");

    for (index, calc) in calculations.iter().enumerate() {
        out.push_str(&format!("Výpočet {}:\n", index + 1));
        out.push_str(&format!("Čas: [{}]\n", calc.timestamp));
        out.push_str(&calc.parameters);
        out.push('\n');
        if !calc.consumption_curve_info.is_empty() {
            out.push_str(&calc.consumption_curve_info);
            out.push('\n');
        }
        out.push_str("\nÚrovně hladiny a průtoky:\n");
        out.push_str("----------------------------\n");

        for level in &calc.levels {
            out.push_str(&level.message);
            out.push('\n');
        }

        if let Some(ref end) = calc.end_message {
            out.push('\n');
            out.push_str(end);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&"=".repeat(constants::TXT_SEPARATOR_WIDTH));
        out.push_str("\n\n");
    }

    out
}

// =============================================================================
// Flattened rows (CSV and matrix)
// =============================================================================

/// One row per level per calculation, with the calculation's parameters and
/// range info repeated on every row.
fn flatten_rows(calculations: &[CalculationRecord]) -> Vec<Vec<Cell>> {
    let mut rows = Vec::with_capacity(calculations.iter().map(|c| c.levels.len()).sum());

    for (index, calc) in calculations.iter().enumerate() {
        let params = parse_parameters(&calc.parameters);
        let range = parse_range_info(&calc.consumption_curve_info);

        for level in &calc.levels {
            let data = parse_level_data(&level.message);
            rows.push(vec![
                Cell::Int(index as i64 + 1),
                Cell::Text(calc.timestamp.clone()),
                params.m.into(),
                params.water_level_elevation.into(),
                params.spillway_elevation.into(),
                params.width.into(),
                params.pier_count.into(),
                params.pier_type.clone().into(),
                params.eta.into(),
                range.range.clone().into(),
                range.segment.into(),
                data.level.into(),
                data.h.into(),
                data.q.into(),
            ]);
        }
    }

    rows
}

/// Write the flattened rows as CSV. Returns the number of data rows written.
///
/// `export_path` is only used for error context.
pub fn write_csv<W: Write>(
    calculations: &[CalculationRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer.write_record(CSV_HEADERS).map_err(csv_err)?;

    let mut count = 0;
    for row in flatten_rows(calculations) {
        csv_writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Render the flattened rows as CSV text.
pub fn generate_csv(
    calculations: &[CalculationRecord],
    export_path: &Path,
) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(calculations, &mut buf, export_path)?;
    // Every field originates from &str input, so the bytes are valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Build the typed cell matrix for the spreadsheet sink. The first row holds
/// the column headers.
pub fn generate_matrix(calculations: &[CalculationRecord]) -> Vec<Vec<Cell>> {
    let rows: usize = calculations.iter().map(|c| c.levels.len()).sum();
    let mut matrix = Vec::with_capacity(1 + rows);
    matrix.push(
        SHEET_HEADERS
            .iter()
            .map(|h| Cell::Text((*h).to_string()))
            .collect(),
    );
    matrix.extend(flatten_rows(calculations));
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LevelEntry;
    use std::path::PathBuf;

    fn calc(params: &str, curve: &str, levels: &[&str], end: Option<&str>) -> CalculationRecord {
        CalculationRecord {
            timestamp: "10:00:00".to_string(),
            parameters: params.to_string(),
            consumption_curve_info: curve.to_string(),
            levels: levels
                .iter()
                .map(|m| LevelEntry {
                    message: m.to_string(),
                    timestamp: "10:00:01".to_string(),
                })
                .collect(),
            end_message: end.map(str::to_string),
        }
    }

    fn sample() -> CalculationRecord {
        calc(
            "m = 1.5, kóta hladiny = 200.0, kóta přelivu = 198.0, \
             b = 10, n = 2, typ = ostrý, ξ = 0.7",
            "Generating consumption curve: rozsah = 0-20cm, segment = 10cm",
            &[
                "Level 10cm: h = 0.10m, Q = 1.00 m³/s",
                "Level 20cm: h = 0.20m, Q = 2.50 m³/s",
            ],
            Some("Chart generated with 2 data points"),
        )
    }

    #[test]
    fn test_txt_banner_only_when_empty() {
        let txt = generate_txt(&[]);
        assert_eq!(
            txt,
            "HydroFlow Calculator - Export dat\n=====================================\n\n"
        );
    }

    #[test]
    fn test_txt_section_layout() {
        let txt = generate_txt(&[sample()]);
        let expected_tail = "Level 20cm: h = 0.20m, Q = 2.50 m³/s\n\
                             \n\
                             Chart generated with 2 data points\n\
                             \n\
                             ==================================================\n\n";
        assert!(txt.contains("Výpočet 1:\nČas: [10:00:00]\nm = 1.5"));
        let levels_heading = "rozsah = 0-20cm, segment = 10cm\n\n\
                              Úrovně hladiny a průtoky:\n\
                              ----------------------------\n\
                              Level 10cm";
        assert!(txt.contains(levels_heading));
        assert!(txt.ends_with(expected_tail));
    }

    #[test]
    fn test_txt_omits_missing_curve_and_end() {
        let c = calc("m = 1, kóta hladiny = 2, kóta přelivu = 3", "", &[], None);
        let txt = generate_txt(&[c]);
        assert!(txt.contains("kóta přelivu = 3\n\nÚrovně hladiny"));
        let empty_section_tail = "----------------------------\n\n\
                                  ==================================================\n\n";
        assert!(txt.ends_with(empty_section_tail));
    }

    #[test]
    fn test_csv_rows_denormalised() {
        let csv = generate_csv(&[sample()], &PathBuf::from("out.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADERS.join(","));
        assert_eq!(lines[1], "1,10:00:00,1.5,200,198,10,2,ostrý,0.7,0-20,10,10,0.1,1");
        assert_eq!(lines[2], "1,10:00:00,1.5,200,198,10,2,ostrý,0.7,0-20,10,20,0.2,2.5");
    }

    #[test]
    fn test_csv_missing_fields_are_blank() {
        let c = calc(
            "m = 1.5, kóta hladiny = 200.0, kóta přelivu = 198.0",
            "",
            &["Level 10cm: h = 0.10m, Q = 1.00 m³/s"],
            None,
        );
        let csv = generate_csv(&[c], &PathBuf::from("out.csv")).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "1,10:00:00,1.5,200,198,,,,,,,10,0.1,1");
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        let mut c = sample();
        c.timestamp = "16. 10. 2026, 10:00:00".to_string();
        let csv = generate_csv(&[c], &PathBuf::from("out.csv")).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("1,\"16. 10. 2026, 10:00:00\",1.5"));
    }

    #[test]
    fn test_row_counts_match_level_totals() {
        let empty_levels = calc("m = 2, kóta hladiny = 1, kóta přelivu = 1", "", &[], None);
        let calcs = vec![sample(), empty_levels, sample()];

        let count = write_csv(&calcs, Vec::new(), &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 4);

        let matrix = generate_matrix(&calcs);
        assert_eq!(matrix.len(), 1 + 4);
        // Third calculation keeps its own index even though the second had no rows.
        assert_eq!(matrix[4][0], Cell::Int(3));
    }

    #[test]
    fn test_matrix_header_only_when_empty() {
        let matrix = generate_matrix(&[]);
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0][13], Cell::Text("Průtok Q (m³/s)".to_string()));
    }

    #[test]
    fn test_matrix_cells_are_typed() {
        let matrix = generate_matrix(&[sample()]);
        let row = &matrix[1];
        assert_eq!(row.len(), 14);
        assert_eq!(row[0], Cell::Int(1));
        assert_eq!(row[1], Cell::Text("10:00:00".to_string()));
        assert_eq!(row[2], Cell::Number(1.5));
        assert_eq!(row[6], Cell::Int(2));
        assert_eq!(row[9], Cell::Text("0-20".to_string()));
        assert_eq!(row[11], Cell::Int(10));
        assert_eq!(row[13], Cell::Number(1.0));
    }
}
