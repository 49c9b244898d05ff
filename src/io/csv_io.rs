use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;

use crate::io::atomic_write_string;
use crate::state::data_model::{self, ColumnSet, Record, RecordId, Row};

#[derive(Debug)]
pub enum CsvIoError {
    Io(io::Error),
    Csv(csv::Error),
    MissingHeader,
    EmptyColumnName(usize),
    DuplicateColumn(String),
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    MalformedQuote {
        line: u64,
    },
}

impl std::fmt::Display for CsvIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvIoError::Io(e) => write!(f, "IO error: {e}"),
            CsvIoError::Csv(e) => write!(f, "CSV parse error: {e}"),
            CsvIoError::MissingHeader => write!(f, "CSV file has no header row"),
            CsvIoError::EmptyColumnName(position) => {
                write!(f, "CSV header has an empty name in column {}", position + 1)
            }
            CsvIoError::DuplicateColumn(name) => {
                write!(f, "CSV header repeats the column '{name}'")
            }
            CsvIoError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "CSV line {line} has {found} fields but the header has {expected}"
            ),
            CsvIoError::MalformedQuote { line } => {
                write!(f, "CSV line {line} has a malformed quoted field")
            }
        }
    }
}

impl std::error::Error for CsvIoError {}

impl From<io::Error> for CsvIoError {
    fn from(e: io::Error) -> Self {
        CsvIoError::Io(e)
    }
}

impl From<csv::Error> for CsvIoError {
    fn from(e: csv::Error) -> Self {
        CsvIoError::Csv(e)
    }
}

/// Result of parsing one CSV document.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ParsedTable {
    pub columns: ColumnSet,
    pub records: Vec<Record>,
}

/// Parses CSV text with a header row.
///
/// Rows whose values are all empty are dropped, then the survivors are
/// numbered from zero. Short rows are padded with empty values. Quoting
/// is checked strictly first, see [`check_quoting`].
pub fn parse_records(text: &str) -> Result<ParsedTable, CsvIoError> {
    check_quoting(text)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(CsvIoError::MissingHeader);
    }
    let columns = validate_header(&header)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let fields = result?;
        if fields.len() > columns.len() {
            return Err(CsvIoError::RaggedRow {
                line: fields.position().map(|p| p.line()).unwrap_or_default(),
                expected: columns.len(),
                found: fields.len(),
            });
        }

        let row: Row = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                (
                    column.to_string(),
                    fields.get(idx).unwrap_or_default().to_string(),
                )
            })
            .collect();

        if data_model::is_blank_row(&row) {
            continue;
        }
        let id = RecordId(records.len() as u64);
        records.push(Record::new(id, row));
    }

    tracing::debug!(
        columns = columns.len(),
        records = records.len(),
        "parsed csv"
    );
    Ok(ParsedTable { columns, records })
}

#[derive(Clone, Copy, PartialEq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Rejects quoting the lenient `csv` reader would silently reinterpret.
///
/// A `"` may only open a field, `""` escapes a quote inside a quoted field,
/// and a closing quote must be followed by a comma, a line break or the end
/// of input. A quoted field still open at the end of input is reported at
/// the line where it was opened.
pub fn check_quoting(text: &str) -> Result<(), CsvIoError> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut opened_at = line;

    for ch in text.chars() {
        state = match (state, ch) {
            (QuoteState::FieldStart, '"') => {
                opened_at = line;
                QuoteState::Quoted
            }
            (QuoteState::Unquoted, '"') => {
                return Err(CsvIoError::MalformedQuote { line });
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, ',' | '\n' | '\r') => {
                QuoteState::FieldStart
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, ',' | '\n' | '\r') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => {
                return Err(CsvIoError::MalformedQuote { line });
            }
        };
        if ch == '\n' {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(CsvIoError::MalformedQuote { line: opened_at });
    }
    Ok(())
}

fn validate_header(header: &csv::StringRecord) -> Result<ColumnSet, CsvIoError> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(header.len());
    for (position, name) in header.iter().enumerate() {
        if name.is_empty() {
            return Err(CsvIoError::EmptyColumnName(position));
        }
        if !seen.insert(name) {
            return Err(CsvIoError::DuplicateColumn(name.to_string()));
        }
        columns.push(name.to_string());
    }
    Ok(ColumnSet::new(columns))
}

pub fn load_csv(path: &Path) -> Result<ParsedTable, CsvIoError> {
    let content = fs::read_to_string(path)?;
    parse_records(strip_bom(&content))
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Serializes records back to CSV: header of column keys, values in column
/// order, no identity column.
pub fn export_csv(columns: &ColumnSet, records: &[Record]) -> Result<String, CsvIoError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(columns.iter())?;
    }
    for record in records {
        writer.write_record(data_model::ordered_values(record, columns))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CsvIoError::Io(io::Error::other(err.to_string())))?;
    String::from_utf8(bytes).map_err(|err| CsvIoError::Io(io::Error::other(err)))
}

pub fn save_csv(path: &Path, columns: &ColumnSet, records: &[Record]) -> Result<(), CsvIoError> {
    let content = export_csv(columns, records)?;
    atomic_write_string(path, &content)?;
    tracing::info!(path = %path.display(), records = records.len(), "exported csv");
    Ok(())
}

/// Suggested download name, e.g. `pattern-context-2026-10-15.csv`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.csv", date.format("%Y-%m-%d"))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
