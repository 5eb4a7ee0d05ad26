//! CSV import of classified exports and reference label files.
//!
//! Header names are normalized (trimmed, BOM stripped, lowercased) and
//! matched against a list of aliases per column. Rows that fail to parse are
//! counted and reported instead of aborting the import.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::comments::{Comment, SentimentScore};
use crate::error::{Error, Result};
use crate::types::CommentId;

const ID_COLUMNS: &[&str] = &["id_comment", "id", "idcomment", "id_message"];
const TEXT_COLUMNS: &[&str] = &["comment_clean", "text", "comment"];
const SCORE_COLUMNS: &[&str] = &["type_comment", "label", "score"];
const TIME_COLUMNS: &[&str] = &["time", "created_at", "date"];
const LABEL_ID_COLUMNS: &[&str] = &["id", "id_message", "idcomment", "id_comment"];
const LABEL_COLUMNS: &[&str] = &["label", "type_comment", "target"];

const MAX_REPORTED_ERRORS: usize = 100;

/// Result of a CSV import operation
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport<T> {
    pub records: Vec<T>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl<T> ImportReport<T> {
    const fn new() -> Self {
        Self {
            records: Vec::new(),
            rows_processed: 0,
            rows_failed: 0,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, line: usize, msg: impl std::fmt::Display) {
        self.rows_failed += 1;
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(format!("Line {line}: {msg}"));
        }
    }

    fn push(&mut self, record: T) {
        self.rows_processed += 1;
        self.records.push(record);
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Index of the first header matching one of `aliases`, in alias order.
fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

/// Indexes of every header matching one of `aliases`, in alias order.
fn find_columns(headers: &[String], aliases: &[&str]) -> Vec<usize> {
    aliases
        .iter()
        .filter_map(|alias| headers.iter().position(|h| h == alias))
        .collect()
}

/// First non-empty cell among `cols`, tried in order.
fn first_filled<'r>(record: &'r csv::StringRecord, cols: &[usize]) -> &'r str {
    cols.iter()
        .filter_map(|&col| record.get(col))
        .find(|cell| !cell.is_empty())
        .unwrap_or_default()
}

fn require_column(headers: &[String], aliases: &[&str]) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| {
        Error::invalid_csv(format!("missing column, expected one of {aliases:?}"))
    })
}

/// Parse an integer cell, accepting float spellings like `2.0`.
fn parse_int(value: &str) -> std::result::Result<i64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("missing integer value".to_string());
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(format!("expected integer, got '{value}'")),
    }
}

fn parse_id(value: &str) -> std::result::Result<CommentId, String> {
    let n = parse_int(value)?;
    u64::try_from(n)
        .map(CommentId)
        .map_err(|_| format!("comment id must be non-negative, got {n}"))
}

fn parse_score(value: &str) -> std::result::Result<SentimentScore, String> {
    parse_int(value).map_or_else(
        |_| value.parse::<SentimentScore>().map_err(|e| e.to_string()),
        |code| Ok(SentimentScore::from_code(code)),
    )
}

/// Parse a timestamp cell into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// and bare `YYYY-MM-DD`. Values without an offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidDate(value.to_string()))
}

fn headers_of<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>> {
    Ok(reader.headers()?.iter().map(normalize_header).collect())
}

fn reader_for<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Read classified comments (`id_comment, comment_clean, type_comment, time`).
pub fn read_classified<R: Read>(input: R) -> Result<ImportReport<Comment>> {
    let mut reader = reader_for(input);
    let headers = headers_of(&mut reader)?;

    let id_col = require_column(&headers, ID_COLUMNS)?;
    let text_col = require_column(&headers, TEXT_COLUMNS)?;
    let score_col = require_column(&headers, SCORE_COLUMNS)?;
    let time_col = find_column(&headers, TIME_COLUMNS);

    let mut report = ImportReport::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.fail(line, e);
                continue;
            }
        };

        let cell = |col: usize| record.get(col).unwrap_or_default();

        let id = match parse_id(cell(id_col)) {
            Ok(id) => id,
            Err(e) => {
                report.fail(line, e);
                continue;
            }
        };
        let score = match parse_score(cell(score_col)) {
            Ok(score) => score,
            Err(e) => {
                report.fail(line, e);
                continue;
            }
        };
        let created_at = match time_col.map(cell).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match parse_timestamp(raw) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    report.fail(line, e);
                    continue;
                }
            },
        };

        report.push(Comment {
            id,
            text: cell(text_col).to_string(),
            score,
            created_at,
        });
    }

    if report.rows_failed > 0 {
        warn!(failed = report.rows_failed, "skipped malformed classified rows");
    }
    debug!(rows = report.rows_processed, "classified comments imported");
    Ok(report)
}

/// Read reference labels (`id` and `label` columns, integer values).
///
/// Each row takes its id from the first non-empty of `id`, `id_message`,
/// `idcomment`, `id_comment`, and its label from the first non-empty of
/// `label`, `type_comment`, `target`. Fails when the file yields no labels
/// at all.
pub fn read_labels<R: Read>(input: R) -> Result<ImportReport<(CommentId, i64)>> {
    let mut reader = reader_for(input);
    let headers = headers_of(&mut reader)?;

    let id_cols = find_columns(&headers, LABEL_ID_COLUMNS);
    let label_cols = find_columns(&headers, LABEL_COLUMNS);
    if id_cols.is_empty() || label_cols.is_empty() {
        return Err(Error::invalid_csv(
            "CSV must contain columns ID and label with integer values",
        ));
    }

    let mut report = ImportReport::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                report.fail(line, e);
                continue;
            }
        };

        let parsed = parse_id(first_filled(&record, &id_cols))
            .and_then(|id| parse_int(first_filled(&record, &label_cols)).map(|l| (id, l)));
        match parsed {
            Ok(pair) => report.push(pair),
            Err(e) => report.fail(line, e),
        }
    }

    if report.records.is_empty() {
        return Err(Error::invalid_csv(
            "CSV must contain columns ID and label with integer values",
        ));
    }
    debug!(rows = report.rows_processed, "labels imported");
    Ok(report)
}

/// Load classified comments from a file.
pub fn load_classified(path: &Path) -> Result<ImportReport<Comment>> {
    read_classified(File::open(path)?)
}

/// Load reference labels from a file, keyed by comment id.
///
/// Later rows win when an id repeats.
pub fn load_labels(path: &Path) -> Result<HashMap<CommentId, i64>> {
    Ok(read_labels(File::open(path)?)?.records.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CLASSIFIED: &str = "\u{feff}ID_Comment,Comment_Clean,Type_Comment,Time
1,Great service,2,2024-03-04T10:15:00Z
2,\"Slow, but fine\",1,2024-03-05 08:00:00
3,Awful,0,
4,Broken row,x,2024-03-06
5,Bad time,0,yesterday
6,Float code,2.0,2024-03-07
";

    #[test]
    fn test_read_classified() {
        let report = read_classified(CLASSIFIED.as_bytes()).unwrap();
        assert_eq!(report.rows_processed, 4);
        assert_eq!(report.rows_failed, 2);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Line 5:"));

        let comments = &report.records;
        assert_eq!(comments[0].id, CommentId(1));
        assert_eq!(comments[0].score, SentimentScore::Positive);
        assert_eq!(comments[1].text, "Slow, but fine");
        assert_eq!(comments[1].created_day(), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(comments[2].created_at, None);
        assert_eq!(comments[3].score, SentimentScore::Positive);
    }

    #[test]
    fn test_score_by_name() {
        let csv = "id,text,score\n7,hello,neutral\n";
        let report = read_classified(csv.as_bytes()).unwrap();
        assert_eq!(report.records[0].score, SentimentScore::Neutral);
    }

    #[test]
    fn test_missing_columns() {
        let csv = "id,text\n1,hello\n";
        assert!(matches!(read_classified(csv.as_bytes()), Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn test_read_labels_aliases() {
        let csv = "id_message,target\n1,2\n2,0.0\n3,\n";
        let report = read_labels(csv.as_bytes()).unwrap();
        assert_eq!(report.records, vec![(CommentId(1), 2), (CommentId(2), 0)]);
        assert_eq!(report.rows_failed, 1);
    }

    #[test]
    fn test_read_labels_alias_priority_per_row() {
        // `id` wins over `id_comment`; an empty `id` cell falls through
        let csv = "id_comment,id,label,target\n10,1,2,0\n11,,,1\n";
        let report = read_labels(csv.as_bytes()).unwrap();
        assert_eq!(report.records, vec![(CommentId(1), 2), (CommentId(11), 1)]);
        assert_eq!(report.rows_failed, 0);
    }

    #[test]
    fn test_read_labels_missing_columns() {
        let csv = "comment,label\nhi,1\n";
        assert!(matches!(read_labels(csv.as_bytes()), Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn test_read_labels_empty() {
        let csv = "id,label\n";
        assert!(matches!(read_labels(csv.as_bytes()), Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        for raw in [
            "2024-03-04T23:30:00Z",
            "2024-03-04 23:30:00",
            "2024-03-04T23:30:00.123456",
            "2024-03-04",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap().date_naive(), expected, "{raw}");
        }
        // offsets are normalized to the UTC day
        let shifted = parse_timestamp("2024-03-05T01:30:00+03:00").unwrap();
        assert_eq!(shifted.date_naive(), expected);

        assert!(parse_timestamp("04/03/2024").is_err());
    }

    #[test]
    fn test_load_labels_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,label").unwrap();
        writeln!(file, "10,1").unwrap();
        writeln!(file, "10,2").unwrap();
        writeln!(file, "11,0").unwrap();

        let labels = load_labels(file.path()).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[&CommentId(10)], 2);
    }
}
