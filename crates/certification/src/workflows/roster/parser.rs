use super::domain::EmployeeRecord;
use serde::Serialize;
use std::fmt;
use std::io::Read;
use tracing::{debug, error};

const EXPECTED_FIELDS: usize = 5;

/// Score column that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColumn {
    Theoretical,
    Practical,
}

impl ScoreColumn {
    pub fn label(self) -> &'static str {
        match self {
            ScoreColumn::Theoretical => "theoretical score",
            ScoreColumn::Practical => "practical score",
        }
    }
}

/// Why a data line did not become a record.
///
/// `Blank` covers both empty and whitespace-only lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    Blank,
    FieldCount { found: usize },
    InvalidScore { column: ScoreColumn, value: String },
    Unreadable { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Blank => write!(f, "blank line"),
            SkipReason::FieldCount { found } => {
                write!(f, "expected {EXPECTED_FIELDS} fields, found {found}")
            }
            SkipReason::InvalidScore { column, value } => {
                write!(f, "{} '{}' is not a number", column.label(), value)
            }
            SkipReason::Unreadable { message } => write!(f, "unreadable line: {message}"),
        }
    }
}

/// Diagnostic entry for a discarded line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of reading a roster export.
#[derive(Debug, Default)]
pub struct RosterLoad {
    pub records: Vec<EmployeeRecord>,
    pub skipped: Vec<SkippedRow>,
    /// Set when reading stopped early; `records` then holds whatever was
    /// read before the failure.
    pub source_error: Option<String>,
}

impl RosterLoad {
    pub(crate) fn unreadable(message: String) -> Self {
        Self {
            source_error: Some(message),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(crate) fn parse_records<R: Read>(mut reader: R) -> RosterLoad {
    let mut raw = Vec::new();
    let mut load = RosterLoad::default();

    if let Err(err) = reader.read_to_end(&mut raw) {
        error!(error = %err, "roster read interrupted");
        load.source_error = Some(format!("failed to read roster: {err}"));
        // Drop the line that was cut off mid-way.
        let complete = raw
            .iter()
            .rposition(|byte| matches!(byte, b'\n' | b'\r'))
            .map_or(0, |index| index + 1);
        raw.truncate(complete);
    }

    // Line numbers are counted here so `\r\n`, `\n` and lone `\r` all end a
    // line and empty lines still show up in the diagnostics. The csv reader
    // only splits the surviving data lines, one per `\n`.
    let mut data = Vec::with_capacity(raw.len());
    let mut line_numbers = Vec::new();
    for (index, line) in physical_lines(&raw).into_iter().enumerate() {
        let line_number = index as u64 + 1;
        if index == 0 {
            continue;
        }
        if String::from_utf8_lossy(line).trim().is_empty() {
            skip(&mut load, line_number, SkipReason::Blank);
            continue;
        }
        data.extend_from_slice(line);
        data.push(b'\n');
        line_numbers.push(line_number);
    }

    // Plain comma split: quotes are ordinary characters and the field count is
    // checked per line rather than enforced by the reader.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(data.as_slice());

    for (result, line) in csv_reader.records().zip(line_numbers) {
        let parsed = result
            .map_err(|err| SkipReason::Unreadable {
                message: unreadable_message(&err),
            })
            .and_then(|record| parse_row(&record));

        match parsed {
            Ok(employee) => load.records.push(employee),
            Err(reason) => skip(&mut load, line, reason),
        }
    }

    load
}

/// Splits on `\n`, `\r\n` and lone `\r`. A terminator at the very end does
/// not open another line.
fn physical_lines(raw: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < raw.len() {
        match raw[index] {
            b'\n' => {
                lines.push(&raw[start..index]);
                index += 1;
                start = index;
            }
            b'\r' => {
                lines.push(&raw[start..index]);
                index += if raw.get(index + 1) == Some(&b'\n') { 2 } else { 1 };
                start = index;
            }
            _ => index += 1,
        }
    }

    if start < raw.len() {
        lines.push(&raw[start..]);
    }
    lines
}

// The reader's own position refers to the filtered buffer, not the roster.
fn unreadable_message(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Utf8 { .. } => "invalid UTF-8".to_string(),
        _ => err.to_string(),
    }
}

fn parse_row(record: &csv::StringRecord) -> Result<EmployeeRecord, SkipReason> {
    if record.len() != EXPECTED_FIELDS {
        return Err(SkipReason::FieldCount {
            found: record.len(),
        });
    }

    let theoretical = parse_score(&record[3]).ok_or_else(|| SkipReason::InvalidScore {
        column: ScoreColumn::Theoretical,
        value: record[3].to_string(),
    })?;
    let practical = parse_score(&record[4]).ok_or_else(|| SkipReason::InvalidScore {
        column: ScoreColumn::Practical,
        value: record[4].to_string(),
    })?;

    Ok(EmployeeRecord::new(
        &record[0],
        &record[1],
        &record[2],
        theoretical,
        practical,
    ))
}

/// Locale independent: `.` is the only decimal separator.
fn parse_score(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}

fn skip(load: &mut RosterLoad, line: u64, reason: SkipReason) {
    debug!(line, %reason, "skipping roster line");
    load.skipped.push(SkippedRow { line, reason });
}

#[cfg(test)]
pub(crate) fn parse_score_for_tests(value: &str) -> Option<f64> {
    parse_score(value)
}
