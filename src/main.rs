// HydroFlow Export - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml, CLI overrides)
// 3. Logging initialisation (debug mode support)
// 4. Loading the log dump and running one export (or a listing)

use clap::Parser;
use hydroflow_export::app::exporter::{export_log, ExportStatus};
use hydroflow_export::app::log_store::AppLog;
use hydroflow_export::core::export::summarize;
use hydroflow_export::core::log_source::LogInputFormat;
use hydroflow_export::core::model::{ExportFormat, ExportRequest, ExportScope};
use hydroflow_export::core::segmenter::extract_calculations;
use hydroflow_export::platform::config::{config_file_path, load_config, AppConfig};
use hydroflow_export::platform::fs::read_log_file;
use hydroflow_export::platform::sink::DirectorySink;
use hydroflow_export::util::{self, error::HydroFlowError};
use std::path::PathBuf;
use std::process::ExitCode;

/// HydroFlow Export - turn HydroFlow calculator logs into reports.
///
/// Reads an application log, reconstructs the hydraulic calculations it
/// contains, and writes them as a TXT, CSV, or XLSX report named
/// `hydroflow_export_<scope>.<ext>`.
#[derive(Parser, Debug)]
#[command(name = "hydroflow-export", version, about)]
struct Cli {
    /// Log file to read (text `[timestamp] message` lines or a JSON dump).
    log_file: PathBuf,

    /// Export scope: "last" (most recent calculation) or "all" (deduplicated).
    #[arg(short = 's', long = "scope", value_parser = parse_scope)]
    scope: Option<ExportScope>,

    /// Report format: txt, csv, or xlsx. Unknown formats fall back to txt.
    #[arg(short = 'f', long = "format")]
    format: Option<String>,

    /// Directory the report is written to.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Shape of the log file: auto, text, or json.
    #[arg(short = 'i', long = "input-format", value_parser = parse_input_format)]
    input_format: Option<LogInputFormat>,

    /// List the calculations found instead of exporting.
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Use this config.toml instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_scope(s: &str) -> Result<ExportScope, String> {
    s.parse()
}

fn parse_input_format(s: &str) -> Result<LogInputFormat, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging is up; its problems are reported once
    // the subscriber exists.
    let (config_path, path_warning) = config_file_path(cli.config.as_deref());
    let (config, config_warnings) = load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "HydroFlow Export starting"
    );

    tracing::debug!(
        path = %config_path.display(),
        found = config_path.exists(),
        "Configuration file"
    );
    for warning in path_warning.iter().chain(&config_warnings) {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Export failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &AppConfig) -> Result<(), HydroFlowError> {
    let content = read_log_file(&cli.log_file)?;
    let input_format = cli.input_format.unwrap_or(config.input_format);
    let log = AppLog::from_dump(&content, &cli.log_file, input_format)?;

    if cli.list {
        let records = extract_calculations(log.entries());
        if records.is_empty() {
            println!("{}", util::constants::NO_CALCULATIONS_NOTICE);
        }
        for summary in summarize(&records) {
            println!("{summary}");
        }
        return Ok(());
    }

    // CLI flag > config > default, resolved into one request value.
    let request = ExportRequest::new(
        cli.scope.unwrap_or(config.export_scope),
        cli.format
            .as_deref()
            .map_or(config.export_format, ExportFormat::from_selector),
    );

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let mut sink = DirectorySink::new(output_dir);

    match export_log(&log, request, &mut sink)? {
        ExportStatus::Written(report) => {
            println!(
                "Exported {} of {} calculation(s) to {}",
                report.calculations_exported,
                report.calculations_found,
                report.path.display()
            );
            if report.duplicates_removed > 0 {
                println!("Skipped {} duplicate calculation(s)", report.duplicates_removed);
            }
        }
        ExportStatus::NoCalculations { notice } => println!("{notice}"),
    }

    Ok(())
}
