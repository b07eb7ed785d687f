use super::common::*;
use crate::workflows::roster::parser::parse_score_for_tests;
use crate::workflows::roster::{RosterLoader, ScoreColumn, SkipReason};
use std::io::{self, Cursor, Read};

#[test]
fn loader_maps_columns_positionally_and_trims_fields() {
    let csv = roster_csv(&["  John , Doe,Engineering , 80 , 90.5 "]);

    let load = RosterLoader::from_reader(Cursor::new(csv));

    assert_eq!(load.len(), 1);
    let record = &load.records[0];
    assert_eq!(record.first_name, "John");
    assert_eq!(record.last_name, "Doe");
    assert_eq!(record.department, "Engineering");
    assert_eq!(record.theoretical_score, 80.0);
    assert_eq!(record.practical_score, 90.5);
    assert!(record.email.is_none());
    assert!(record.phone.is_none());
    assert!(load.skipped.is_empty());
    assert!(load.source_error.is_none());
}

#[test]
fn loader_never_treats_header_as_data() {
    let csv = "Ada,Lovelace,Research,95,99\nGrace,Hopper,Engineering,88,91\n";

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert_eq!(load.len(), 1);
    assert_eq!(load.records[0].first_name, "Grace");
    assert!(load.skipped.is_empty());
}

#[test]
fn loader_skips_malformed_rows_and_records_reasons() {
    let csv = roster_csv(&[
        "John,Doe,Engineering,80,90",
        "   ",
        "Short,Row,Sales,70",
        "Too,Many,Fields,70,80,90",
        "Bad,Theory,Sales,abc,80",
        "Bad,Practice,Sales,80,",
        "Jane,Roe,,75,85",
    ]);

    let load = RosterLoader::from_reader(csv.as_bytes());

    let names: Vec<_> = load
        .records
        .iter()
        .map(|record| record.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["John", "Jane"]);

    let reasons: Vec<_> = load
        .skipped
        .iter()
        .map(|row| (row.line, row.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (3, SkipReason::Blank),
            (4, SkipReason::FieldCount { found: 4 }),
            (5, SkipReason::FieldCount { found: 6 }),
            (
                6,
                SkipReason::InvalidScore {
                    column: ScoreColumn::Theoretical,
                    value: "abc".to_string(),
                }
            ),
            (
                7,
                SkipReason::InvalidScore {
                    column: ScoreColumn::Practical,
                    value: String::new(),
                }
            ),
        ]
    );
}

#[test]
fn loader_splits_on_every_comma_even_inside_quotes() {
    let csv = roster_csv(&["\"Doe, John\",Smith,Sales,80,90"]);

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert!(load.is_empty());
    assert_eq!(load.skipped[0].reason, SkipReason::FieldCount { found: 6 });
}

#[test]
fn loader_handles_crlf_line_endings() {
    let csv = format!("{HEADER}\r\nJohn,Doe,Engineering,80,90\r\nJane,Roe,Sales,60,65\r\n");

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert_eq!(load.len(), 2);
    assert_eq!(load.records[1].practical_score, 65.0);
}

#[test]
fn loader_handles_carriage_return_line_endings() {
    let csv = format!("{HEADER}\rJohn,Doe,Engineering,80,90\rJane,Roe,Sales,60,65\r");

    let load = RosterLoader::from_reader(csv.as_bytes());

    let names: Vec<_> = load
        .records
        .iter()
        .map(|record| record.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["John", "Jane"]);
    assert!(load.skipped.is_empty());
}

#[test]
fn loader_reports_line_numbers_across_mixed_line_endings() {
    let csv = format!("{HEADER}\r\nJohn,Doe,Engineering,80,90\rBad,Row,Sales,x,80\nJane,Roe,Sales,60,65");

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert_eq!(load.len(), 2);
    assert_eq!(load.skipped.len(), 1);
    assert_eq!(load.skipped[0].line, 3);
}

#[test]
fn loader_reports_empty_lines_and_keeps_reading() {
    let csv = format!("{HEADER}\nJohn,Doe,Engineering,80,90\n\nJane,Roe,Sales,60,65\n\n\n");

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert_eq!(load.len(), 2);
    assert_eq!(load.records[1].first_name, "Jane");
    let lines: Vec<_> = load
        .skipped
        .iter()
        .map(|row| (row.line, row.reason.clone()))
        .collect();
    assert_eq!(
        lines,
        vec![
            (3, SkipReason::Blank),
            (5, SkipReason::Blank),
            (6, SkipReason::Blank),
        ]
    );
}

#[test]
fn loader_skips_an_empty_first_line_as_the_header() {
    let csv = "\nJohn,Doe,Engineering,80,90\n";

    let load = RosterLoader::from_reader(csv.as_bytes());

    assert_eq!(load.len(), 1);
    assert_eq!(load.records[0].first_name, "John");
    assert!(load.skipped.is_empty());
}

#[test]
fn loader_skips_lines_that_are_not_utf8() {
    let mut csv = format!("{HEADER}\n").into_bytes();
    csv.extend_from_slice(b"J\xffhn,Doe,Engineering,80,90\n");
    csv.extend_from_slice(b"Jane,Roe,Sales,60,65\n");

    let load = RosterLoader::from_reader(csv.as_slice());

    assert_eq!(load.len(), 1);
    assert_eq!(load.records[0].first_name, "Jane");
    assert_eq!(
        load.skipped[0].reason,
        SkipReason::Unreadable {
            message: "invalid UTF-8".to_string(),
        }
    );
    assert_eq!(load.skipped[0].line, 2);
}

struct InterruptedReader {
    data: Cursor<Vec<u8>>,
}

impl Read for InterruptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::Other, "connection reset")),
            read => Ok(read),
        }
    }
}

#[test]
fn loader_keeps_complete_lines_read_before_a_failure() {
    let csv = format!("{HEADER}\nJohn,Doe,Engineering,80,90\nJane,Roe,Sales,60,6");
    let reader = InterruptedReader {
        data: Cursor::new(csv.into_bytes()),
    };

    let load = RosterLoader::from_reader(reader);

    assert_eq!(load.len(), 1);
    assert_eq!(load.records[0].first_name, "John");
    let message = load.source_error.expect("read failure recorded");
    assert!(message.contains("connection reset"));
}

#[test]
fn loader_returns_empty_roster_for_header_only_input() {
    let load = RosterLoader::from_reader(HEADER.as_bytes());

    assert!(load.is_empty());
    assert!(load.skipped.is_empty());
}

#[test]
fn loader_from_path_degrades_to_empty_roster_when_missing() {
    let load = RosterLoader::from_path("./does-not-exist/roster.csv");

    assert!(load.is_empty());
    let message = load.source_error.expect("source error recorded");
    assert!(message.contains("does-not-exist"));
}

#[test]
fn score_parsing_is_locale_independent_and_finite() {
    assert_eq!(parse_score_for_tests(" 87.25 "), Some(87.25));
    assert_eq!(parse_score_for_tests("-4"), Some(-4.0));
    assert_eq!(parse_score_for_tests("1e2"), Some(100.0));
    assert_eq!(parse_score_for_tests("87,25"), None);
    assert_eq!(parse_score_for_tests("NaN"), None);
    assert_eq!(parse_score_for_tests("inf"), None);
    assert_eq!(parse_score_for_tests(""), None);
}
