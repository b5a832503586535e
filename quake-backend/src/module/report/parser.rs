//! Fixed-format line parser
//!
//! One report row looks like
//!
//! ```text
//! 2024.03.15 14:23:11  38.4521   27.1234        7.3      -.-  3.2  -.-   SINDIRGI (BALIKESIR)    İlksel
//! ```
//!
//! The first eight columns are positional. The place name may contain spaces,
//! so it is everything between the magnitudes and the trailing quality code.

use quake_common::EarthquakeRecord;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

use super::locator::{locate_lines, NO_DATA};

/// date, time, lat, lon, depth, 3 magnitudes, location, quality
const MIN_TOKENS: usize = 10;

/// Index of the first location token
const LOCATION_START: usize = 8;

const REVISION_PREFIX: &str = "REVIZE";

static ROW_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}\.\d{2}\.\d{2}\s+\d{2}:\d{2}:\d{2}").expect("row regex is valid")
});

/// Why a single line was not turned into a record
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    #[error("line does not start with a date and time")]
    NotARecord,

    #[error("expected at least 10 tokens, found {0}")]
    TooFewTokens(usize),

    #[error("invalid {field} value '{token}'")]
    InvalidNumber { field: &'static str, token: String },

    #[error("negative depth {0}")]
    NegativeDepth(f64),

    #[error("no location tokens")]
    EmptyLocation,
}

fn parse_number(field: &'static str, token: &str) -> Result<f64, LineError> {
    token.parse::<f64>().map_err(|_| LineError::InvalidNumber {
        field,
        token: token.to_string(),
    })
}

/// `-.-` means the scale was not computed for this event.
fn parse_magnitude(field: &'static str, token: &str) -> Result<Option<f64>, LineError> {
    if token == NO_DATA {
        Ok(None)
    } else {
        parse_number(field, token).map(Some)
    }
}

/// End (exclusive) of the location tokens.
///
/// Revised solutions end in `(<timestamp>) REVIZE01`; the timestamp is
/// dropped along with the quality code.
fn location_end(tokens: &[&str]) -> usize {
    let n = tokens.len();
    if tokens[n - 1].starts_with(REVISION_PREFIX) && tokens[n - 2].starts_with('(') {
        n - 2
    } else {
        n - 1
    }
}

/// Parse one trimmed report line into a record.
pub fn parse_line(line: &str) -> Result<EarthquakeRecord, LineError> {
    let line = line.trim();
    if !ROW_START_RE.is_match(line) {
        return Err(LineError::NotARecord);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return Err(LineError::TooFewTokens(tokens.len()));
    }

    let latitude = parse_number("latitude", tokens[2])?;
    let longitude = parse_number("longitude", tokens[3])?;
    let depth = parse_number("depth", tokens[4])?;
    if depth < 0.0 {
        return Err(LineError::NegativeDepth(depth));
    }

    let magnitude_md = parse_magnitude("MD", tokens[5])?;
    let magnitude_ml = parse_magnitude("ML", tokens[6])?;
    let magnitude_mw = parse_magnitude("Mw", tokens[7])?;

    let end = location_end(&tokens);
    if end <= LOCATION_START {
        return Err(LineError::EmptyLocation);
    }
    let location = tokens[LOCATION_START..end].join(" ");

    let date = tokens[0].to_string();
    let time = tokens[1].to_string();
    let id = EarthquakeRecord::make_id(&date, &time, latitude, longitude);

    Ok(EarthquakeRecord {
        date,
        time,
        latitude,
        longitude,
        depth,
        magnitude_md,
        magnitude_ml,
        magnitude_mw,
        location,
        solution_quality: tokens[tokens.len() - 1].to_string(),
        id,
        sample: false,
    })
}

/// Parse a whole raw report (HTML page or bare text).
///
/// Bad lines are dropped one by one; the result is empty when no table is
/// found. A repeated event (same id) keeps its first occurrence.
pub fn parse_report(text: &str) -> Vec<EarthquakeRecord> {
    let lines = locate_lines(text);
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(lines.len());

    for line in &lines {
        match parse_line(line) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    tracing::debug!("Skipping duplicate event {}", record.id);
                }
            }
            Err(LineError::NotARecord) => {}
            Err(e) => {
                tracing::debug!("Skipping report line ({}): {:?}", e, line);
            }
        }
    }

    if !lines.is_empty() {
        tracing::info!(
            "Parsed {} records from {} candidate lines",
            records.len(),
            lines.len()
        );
    }

    records
}
