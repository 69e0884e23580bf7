// HydroFlow Export - core/log_source.rs
//
// Decoding of application log dumps into ordered `LogEntry` sequences.
// Core layer: accepts file content as &str; the app layer handles reading.
//
// Two dump shapes are understood:
//   text - one message per line, `[<timestamp>] <message>`
//   json - an array of `{ "timestamp": ..., "message": ... }` objects, the
//          shape the calculator page keeps its in-memory log in

use crate::core::model::LogEntry;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Shape of a log dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogInputFormat {
    /// Decide from the file extension, then from the content.
    #[default]
    Auto,
    Text,
    Json,
}

impl FromStr for LogInputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown input format '{other}' (expected auto, text or json)"
            )),
        }
    }
}

impl fmt::Display for LogInputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Resolve `Auto` to a concrete format. `.json` files are JSON; otherwise
/// content starting with `[` followed by `{` is a JSON array of objects,
/// and content that is nothing but `[]` is an empty one. A text log line
/// starts with `[` too, but never with `[{`; `[] message` is a text line
/// with an empty timestamp.
pub fn detect_format(file_name: Option<&str>, content: &str) -> LogInputFormat {
    if let Some(name) = file_name {
        if name.to_lowercase().ends_with(".json") {
            return LogInputFormat::Json;
        }
    }

    let mut chars = content.chars().filter(|c| !c.is_whitespace());
    match (chars.next(), chars.next(), chars.next()) {
        (Some('['), Some('{'), _) | (Some('['), Some(']'), None) => LogInputFormat::Json,
        _ => LogInputFormat::Text,
    }
}

/// Drop a leading UTF-8 byte-order mark, as left by Windows editors.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{FEFF}').unwrap_or(content)
}

fn line_pattern() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^\[(?P<timestamp>[^\]]*)\]\s?(?P<message>.*)$")
            .expect("log_source: invalid regex")
    })
}

/// Decode a text log. Blank lines are skipped; a line without a bracketed
/// timestamp prefix keeps its full text as the message and an empty
/// timestamp.
pub fn parse_text_log(content: &str) -> Vec<LogEntry> {
    let pattern = line_pattern();
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| match pattern.captures(line) {
            Some(caps) => LogEntry::new(&caps["timestamp"], &caps["message"]),
            None => LogEntry::new(String::new(), line),
        })
        .collect()
}

/// Decode a JSON array log dump.
pub fn parse_json_log(content: &str) -> Result<Vec<LogEntry>, serde_json::Error> {
    serde_json::from_str(content)
}
