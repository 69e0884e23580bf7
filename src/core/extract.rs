// HydroFlow Export - core/extract.rs
//
// Marker-based classification of log messages and field extraction.
// Core layer: pure functions over &str, no I/O.
//
// Every extractor is total: a missing marker yields `None` for that field,
// never an error and never a substituted number.

use crate::core::model::{ParsedLevelData, ParsedParameters, ParsedRangeInfo};
use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

// =============================================================================
// Line classification
// =============================================================================

/// The four kinds of log lines the segmenter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Parameters line opening a calculation.
    Start,
    /// "Generating consumption curve:" line.
    CurveInfo,
    /// One consumption-curve point.
    Level,
    /// "Chart generated with N data points" line closing a calculation.
    End,
}

/// A line kind together with the markers a message must contain (all of
/// them) to be classified as that kind.
struct LineRule {
    kind: LineKind,
    markers: &'static [&'static str],
}

/// Classification rules in priority order: the first matching rule wins.
const LINE_RULES: &[LineRule] = &[
    LineRule {
        kind: LineKind::Start,
        markers: &[
            constants::MARKER_PARAM_M,
            constants::MARKER_WATER_LEVEL,
            constants::MARKER_SPILLWAY,
        ],
    },
    LineRule {
        kind: LineKind::CurveInfo,
        markers: &[constants::MARKER_CURVE],
    },
    LineRule {
        kind: LineKind::Level,
        markers: &[
            constants::MARKER_LEVEL,
            constants::MARKER_LEVEL_HEIGHT,
            constants::MARKER_LEVEL_FLOW,
        ],
    },
    LineRule {
        kind: LineKind::End,
        markers: &[constants::MARKER_CHART, constants::MARKER_DATA_POINTS],
    },
];

/// Classify a message, returning `None` for lines the pipeline ignores.
pub fn classify(message: &str) -> Option<LineKind> {
    LINE_RULES
        .iter()
        .find(|rule| rule.markers.iter().all(|m| message.contains(m)))
        .map(|rule| rule.kind)
}

// =============================================================================
// Field patterns
// =============================================================================

struct Patterns {
    m: Regex,
    water_level: Regex,
    spillway: Regex,
    width: Regex,
    pier_count: Regex,
    pier_type: Regex,
    eta: Regex,
    range: Regex,
    segment: Regex,
    level: Regex,
    height: Regex,
    flow: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("extract: invalid regex")
        }

        Patterns {
            m: re(r"m = ([0-9.]+)"),
            water_level: re(r"kóta hladiny = ([0-9.]+)"),
            spillway: re(r"kóta přelivu = ([0-9.]+)"),
            width: re(r"b = ([0-9.]+)"),
            pier_count: re(r"n = ([0-9]+)"),
            pier_type: re(r"typ = ([^,]+)"),
            eta: re(r"ξ = ([0-9.]+)"),
            range: re(r"rozsah = ([0-9-]+)cm"),
            segment: re(r"segment = ([0-9]+)cm"),
            level: re(r"Level ([0-9]+)cm"),
            height: re(r"h = ([0-9.]+)m"),
            flow: re(r"Q = ([0-9.]+) m³/s"),
        }
    })
}

/// First capture group of `re` in `text`.
fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a `[0-9.]+` run as a decimal, reading its longest valid prefix:
/// `1.2.3` reads as `1.2`, a lone `.` has no value.
fn parse_decimal(raw: &str) -> Option<f64> {
    let end = raw
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .nth(1)
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse::<f64>().ok()
}

fn decimal_field(re: &Regex, text: &str) -> Option<f64> {
    capture(re, text).and_then(parse_decimal)
}

/// Digit runs too long for an i64 resolve to `None`.
fn integer_field(re: &Regex, text: &str) -> Option<i64> {
    capture(re, text).and_then(|s| s.parse::<i64>().ok())
}

// =============================================================================
// Extractors
// =============================================================================

/// Extract the calculation inputs from a parameters line.
pub fn parse_parameters(text: &str) -> ParsedParameters {
    let p = patterns();
    ParsedParameters {
        m: decimal_field(&p.m, text),
        water_level_elevation: decimal_field(&p.water_level, text),
        spillway_elevation: decimal_field(&p.spillway, text),
        width: decimal_field(&p.width, text),
        pier_count: integer_field(&p.pier_count, text),
        pier_type: capture(&p.pier_type, text).map(|s| s.trim().to_string()),
        eta: decimal_field(&p.eta, text),
    }
}

/// Extract range and segment from a curve-info line. An empty line (no
/// curve info was logged) yields all-empty fields.
pub fn parse_range_info(text: &str) -> ParsedRangeInfo {
    if text.is_empty() {
        return ParsedRangeInfo::default();
    }
    let p = patterns();
    ParsedRangeInfo {
        range: capture(&p.range, text).map(str::to_string),
        segment: integer_field(&p.segment, text),
    }
}

/// Extract level, head, and flow from a level line.
pub fn parse_level_data(text: &str) -> ParsedLevelData {
    let p = patterns();
    ParsedLevelData {
        level: integer_field(&p.level, text),
        h: decimal_field(&p.height, text),
        q: decimal_field(&p.flow, text),
    }
}

/// Numeric level index of a level line, used to order levels canonically.
pub fn level_index(text: &str) -> Option<i64> {
    integer_field(&patterns().level, text)
}
