// HydroFlow Export - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.
//
// Everything here runs before the logging subscriber is installed, so
// problems are returned as `ConfigError` values for the caller to log.

use crate::core::log_source::LogInputFormat;
use crate::core::model::{ExportFormat, ExportScope};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for HydroFlow Export configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/hydroflow/ or %APPDATA%\HydroFlow\config\)
    pub config_dir: PathBuf,

    /// Full path of config.toml inside `config_dir`.
    pub config_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Fails when the platform has no home/config directory for the user.
    pub fn resolve() -> Result<Self, ConfigError> {
        ProjectDirs::from("", "", constants::APP_ID)
            .map(|proj_dirs| Self::in_dir(proj_dirs.config_dir()))
            .ok_or(ConfigError::NoPlatformDirs)
    }

    /// Paths rooted at an explicit configuration directory.
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_file = config_dir.join(constants::CONFIG_FILE_NAME);
        Self {
            config_dir,
            config_file,
        }
    }
}

/// Pick the config.toml to load: an explicit path wins, then the platform
/// config directory, then the current directory. A failed platform lookup
/// is returned alongside the fallback path.
pub fn config_file_path(explicit: Option<&Path>) -> (PathBuf, Option<ConfigError>) {
    choose_config_file(explicit, PlatformPaths::resolve)
}

fn choose_config_file(
    explicit: Option<&Path>,
    resolve: impl FnOnce() -> Result<PlatformPaths, ConfigError>,
) -> (PathBuf, Option<ConfigError>) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), None);
    }
    match resolve() {
        Ok(paths) => (paths.config_file, None),
        Err(e) => (PlatformPaths::in_dir(".").config_file, Some(e)),
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[export]` section.
    pub export: ExportSection,
    /// `[input]` section.
    pub input: InputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Report format: "txt", "csv" or "xlsx".
    pub format: Option<String>,
    /// Export scope: "last" or "all".
    pub scope: Option<String>,
    /// Directory artifacts are written to.
    pub output_dir: Option<String>,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Log dump shape: "auto", "text" or "json".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Export --
    pub export_format: ExportFormat,
    pub export_scope: ExportScope,
    /// None = current directory.
    pub output_dir: Option<PathBuf>,

    // -- Input --
    pub input_format: LogInputFormat,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_format: ExportFormat::from_selector(constants::DEFAULT_EXPORT_FORMAT),
            export_scope: constants::DEFAULT_EXPORT_SCOPE
                .parse()
                .unwrap_or(ExportScope::All),
            output_dir: None,
            input_format: LogInputFormat::Auto,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with that error.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            return (
                AppConfig::default(),
                vec![ConfigError::Io {
                    path: config_path.to_path_buf(),
                    source: e,
                }],
            );
        }
    };

    parse_config(&content, config_path)
}

/// Validate config.toml content. `path` is only used for error context.
pub fn parse_config(content: &str, path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Export: format --
    if let Some(ref format) = raw.export.format {
        if ExportFormat::is_known_selector(format) {
            config.export_format = ExportFormat::from_selector(format);
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[export] format".to_string(),
                value: format.clone(),
                expected: format!(
                    "txt, csv or xlsx (using default {})",
                    constants::DEFAULT_EXPORT_FORMAT
                ),
            });
        }
    }

    // -- Export: scope --
    if let Some(ref scope) = raw.export.scope {
        match scope.parse::<ExportScope>() {
            Ok(s) => config.export_scope = s,
            Err(_) => warnings.push(ConfigError::ValueOutOfRange {
                field: "[export] scope".to_string(),
                value: scope.clone(),
                expected: format!(
                    "last or all (using default {})",
                    constants::DEFAULT_EXPORT_SCOPE
                ),
            }),
        }
    }

    // -- Export: output_dir --
    if let Some(ref dir) = raw.export.output_dir {
        if !dir.is_empty() {
            config.output_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Input: format --
    if let Some(ref format) = raw.input.format {
        match format.parse::<LogInputFormat>() {
            Ok(f) => config.input_format = f,
            Err(_) => warnings.push(ConfigError::ValueOutOfRange {
                field: "[input] format".to_string(),
                value: format.clone(),
                expected: "auto, text or json (using default auto)".to_string(),
            }),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug or trace (using default info)".to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}
