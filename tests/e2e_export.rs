// HydroFlow Export - tests/e2e_export.rs
//
// End-to-end tests for the export pipeline.
//
// These tests exercise the real filesystem, the real directory sink, and
// the real workbook writer: a log dump on disk goes in, a report file comes
// out, and the report is read back (XLSX via calamine) and checked.

use calamine::{open_workbook, Data, Reader, Xlsx};
use hydroflow_export::app::exporter::{export_log, ExportStatus};
use hydroflow_export::app::log_store::AppLog;
use hydroflow_export::core::log_source::LogInputFormat;
use hydroflow_export::core::model::{ExportFormat, ExportRequest, ExportScope};
use hydroflow_export::platform::fs::read_log_file;
use hydroflow_export::platform::sink::DirectorySink;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

// =============================================================================
// Helpers
// =============================================================================

/// A session log with two identical runs, one different run, and an
/// unfinished run at the end, interleaved with unrelated messages.
const SESSION_LOG: &str = "\
[09:59:58] Application started
[10:00:00] Parametry: m = 1.5, kóta hladiny = 200.0, kóta přelivu = 198.0, b = 10.0, n = 2, typ = zaoblený, ξ = 0.7
[10:00:01] Generating consumption curve: rozsah = 0-20cm, segment = 10cm
[10:00:02] Level 10cm: h = 0.10m, Q = 1.00 m³/s
[10:00:03] Level 20cm: h = 0.20m, Q = 2.50 m³/s
[10:00:04] Chart generated with 2 data points
[10:05:00] Parametry: m = 1.5, kóta hladiny = 200.0, kóta přelivu = 198.0, b = 10.0, n = 2, typ = zaoblený, ξ = 0.7
[10:05:01] Generating consumption curve: rozsah = 0-20cm, segment = 10cm
[10:05:02] Level 20cm: h = 0.20m, Q = 2.50 m³/s
[10:05:03] Level 10cm: h = 0.10m, Q = 1.00 m³/s
[10:05:04] Chart generated with 2 data points
[10:10:00] Parametry: m = 0.49, kóta hladiny = 201.0, kóta přelivu = 198.0
[10:10:01] Level 30cm: h = 0.30m, Q = 4.20 m³/s
[10:10:02] Chart generated with 1 data points
[10:15:00] Parametry: m = 0.42, kóta hladiny = 199.0, kóta přelivu = 198.0
[10:15:01] Level 5cm: h = 0.05m, Q = 0.30 m³/s
";

fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn load(path: &Path) -> AppLog {
    let content = read_log_file(path).unwrap();
    AppLog::from_dump(&content, path, LogInputFormat::Auto).unwrap()
}

fn export(log: &AppLog, out: &Path, scope: ExportScope, format: ExportFormat) -> ExportStatus {
    let mut sink = DirectorySink::new(out);
    export_log(log, ExportRequest::new(scope, format), &mut sink).unwrap()
}

fn number(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        other => panic!("expected a numeric cell, got {other:?}"),
    }
}

/// Raw XML of one part of a saved workbook.
fn xlsx_part(path: &Path, part: &str) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut xml = String::new();
    archive
        .by_name(part)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// The opening `<c ...>` tag of `cell` in a worksheet part.
fn cell_tag<'a>(sheet_xml: &'a str, cell: &str) -> &'a str {
    let start = sheet_xml
        .find(&format!("<c r=\"{cell}\""))
        .unwrap_or_else(|| panic!("cell {cell} not found"));
    let end = start + sheet_xml[start..].find('>').unwrap();
    &sheet_xml[start..=end]
}

fn text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected a text cell, got {other:?}"),
    }
}

// =============================================================================
// Library pipeline
// =============================================================================

/// "all" exports each distinct run once, including the unfinished one.
#[test]
fn e2e_all_scope_csv_deduplicates() {
    let dir = tempfile::tempdir().unwrap();
    let log = load(&write_log(dir.path(), "session.log", SESSION_LOG));

    let status = export(&log, dir.path(), ExportScope::All, ExportFormat::Csv);
    let ExportStatus::Written(report) = status else {
        panic!("expected a written export");
    };
    assert_eq!(report.calculations_found, 4);
    assert_eq!(report.calculations_exported, 3);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.path, dir.path().join("hydroflow_export_all.csv"));

    let csv = fs::read_to_string(&report.path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    // Header + 2 + 1 + 1 level rows.
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("1,10:00:00,1.5,200,198,10,2,zaoblený,0.7,0-20,10,10,0.1,1"));
    assert!(lines[3].starts_with("2,10:10:00,0.49,201,198,,,,,,,30,0.3,4.2"));
    assert!(lines[4].starts_with("3,10:15:00,0.42"));
}

/// "last" exports the literal final run, unfinished or not.
#[test]
fn e2e_last_scope_txt_takes_final_run() {
    let dir = tempfile::tempdir().unwrap();
    let log = load(&write_log(dir.path(), "session.log", SESSION_LOG));

    let status = export(&log, dir.path(), ExportScope::Last, ExportFormat::Txt);
    let ExportStatus::Written(report) = status else {
        panic!("expected a written export");
    };
    assert_eq!(report.calculations_exported, 1);

    let txt = fs::read_to_string(dir.path().join("hydroflow_export_last.txt")).unwrap();
    assert!(txt.starts_with("HydroFlow Calculator - Export dat\n"));
    assert!(txt.contains("Výpočet 1:\nČas: [10:15:00]\n"));
    assert!(!txt.contains("Výpočet 2"));
    assert!(txt.contains("Level 5cm: h = 0.05m, Q = 0.30 m³/s\n"));
    assert!(!txt.contains("Chart generated"));
}

/// The workbook holds the header row and typed level rows.
#[test]
fn e2e_xlsx_round_trips_through_calamine() {
    let dir = tempfile::tempdir().unwrap();
    let log = load(&write_log(dir.path(), "session.log", SESSION_LOG));

    export(&log, dir.path(), ExportScope::All, ExportFormat::Xlsx);
    let path = dir.path().join("hydroflow_export_all.xlsx");

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let range = workbook.worksheet_range("HydroFlow Data").unwrap();

    assert_eq!(range.height(), 5);
    assert_eq!(range.width(), 14);
    assert_eq!(text(range.get_value((0, 0))), "Výpočet");
    assert_eq!(text(range.get_value((0, 13))), "Průtok Q (m³/s)");

    assert_eq!(number(range.get_value((1, 0))), 1.0);
    assert_eq!(text(range.get_value((1, 1))), "10:00:00");
    assert_eq!(number(range.get_value((1, 2))), 1.5);
    assert_eq!(text(range.get_value((1, 7))), "zaoblený");
    assert_eq!(text(range.get_value((1, 9))), "0-20");
    assert_eq!(number(range.get_value((2, 13))), 2.5);

    // Missing width on the third run stays blank rather than 0.
    assert!(matches!(range.get_value((3, 5)), None | Some(Data::Empty)));
    assert_eq!(number(range.get_value((3, 11))), 30.0);
}

/// Header cells carry a bold style and the first row is frozen.
#[test]
fn e2e_xlsx_header_bold_and_frozen() {
    let dir = tempfile::tempdir().unwrap();
    let log = load(&write_log(dir.path(), "session.log", SESSION_LOG));

    export(&log, dir.path(), ExportScope::All, ExportFormat::Xlsx);
    let path = dir.path().join("hydroflow_export_all.xlsx");

    let sheet = xlsx_part(&path, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("state=\"frozen\""), "{sheet}");
    assert!(sheet.contains("ySplit=\"1\""), "{sheet}");
    assert!(!sheet.contains("xSplit="), "{sheet}");

    // Header cells use a non-default style, data cells do not.
    assert!(cell_tag(&sheet, "A1").contains(" s=\""));
    assert!(cell_tag(&sheet, "N1").contains(" s=\""));
    assert!(!cell_tag(&sheet, "A2").contains(" s=\""));

    let styles = xlsx_part(&path, "xl/styles.xml");
    assert!(styles.contains("<b/>"), "{styles}");

    // Columns carry the custom width.
    assert!(sheet.contains("<cols>"), "{sheet}");
    assert!(sheet.contains("customWidth=\"1\""), "{sheet}");
}

/// A JSON dump of the in-page log is read the same as the text log.
#[test]
fn e2e_json_dump_input() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"[
        {"timestamp": "10:00:00", "message": "m = 1.5, kóta hladiny = 200.0, kóta přelivu = 198.0"},
        {"timestamp": "10:00:01", "message": "Level 10cm: h = 0.10m, Q = 1.00 m³/s"},
        {"timestamp": "10:00:02", "message": "Chart generated with 1 data points"}
    ]"#;
    let log = load(&write_log(dir.path(), "logs.json", json));
    assert_eq!(log.len(), 3);

    export(&log, dir.path(), ExportScope::All, ExportFormat::Csv);
    let csv = fs::read_to_string(dir.path().join("hydroflow_export_all.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
}

/// A log saved with a byte-order mark keeps its first timestamp.
#[test]
fn e2e_bom_prefixed_log() {
    let dir = tempfile::tempdir().unwrap();
    // The first line is a parameters line, so a leaked mark would show in the report.
    let body = SESSION_LOG.replace("[09:59:58] Application started\n", "");
    let content = format!("\u{FEFF}{body}");
    let log = load(&write_log(dir.path(), "session.log", &content));

    export(&log, dir.path(), ExportScope::All, ExportFormat::Txt);
    let txt = fs::read_to_string(dir.path().join("hydroflow_export_all.txt")).unwrap();
    assert!(txt.contains("Výpočet 1:\nČas: [10:00:00]\nParametry: m = 1.5"));
    assert!(!txt.contains('\u{FEFF}'));
}

/// No calculations: a notice, and no file at all.
#[test]
fn e2e_no_calculations_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let log = load(&write_log(
        dir.path(),
        "idle.log",
        "[10:00:00] Application started\n[10:00:05] Level 10cm: h = 0.10m, Q = 1.00 m³/s\n",
    ));

    let status = export(&log, &out, ExportScope::All, ExportFormat::Xlsx);
    assert!(matches!(status, ExportStatus::NoCalculations { .. }));
    assert!(!out.exists());
}

// =============================================================================
// Command line
// =============================================================================

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hydroflow-export"));
    // Point at a config that does not exist so the user's own config.toml
    // never leaks into the test.
    cmd.arg("--config").arg(dir.join("no-config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn e2e_cli_exports_with_flags() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "session.log", SESSION_LOG);
    let out = dir.path().join("reports");

    let output = cli(dir.path())
        .arg(&log)
        .args(["--scope", "last", "--format", "csv", "--output-dir"])
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let csv = fs::read_to_string(out.join("hydroflow_export_last.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Exported 1 of 4"));
}

#[test]
fn e2e_cli_unknown_format_falls_back_to_txt() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "session.log", SESSION_LOG);

    let output = cli(dir.path())
        .arg(&log)
        .args(["--format", "pdf", "--output-dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    assert!(dir.path().join("hydroflow_export_all.txt").exists());
}

#[test]
fn e2e_cli_config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "session.log", SESSION_LOG);
    let out = dir.path().join("from-config");
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "[export]\nformat = \"xlsx\"\nscope = \"last\"\noutput_dir = {:?}\n",
            out.display().to_string()
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hydroflow-export"))
        .arg(&log)
        .arg("--config")
        .arg(&config)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    assert!(out.join("hydroflow_export_last.xlsx").exists());
}

#[test]
fn e2e_cli_list_mode() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "session.log", SESSION_LOG);

    let output = cli(dir.path()).arg(&log).arg("--list").output().unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.lines().last().unwrap().contains("(unfinished)"));
}

#[test]
fn e2e_cli_missing_log_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = cli(dir.path())
        .arg(dir.path().join("missing.log"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.log"));
}

#[test]
fn e2e_cli_rejects_unknown_scope() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "session.log", SESSION_LOG);
    let output = cli(dir.path())
        .arg(&log)
        .args(["--scope", "latest"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
