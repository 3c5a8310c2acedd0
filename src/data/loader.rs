use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

/// What to do with a non-blank row whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MalformedRowPolicy {
    /// Abort the whole load with [`ChartError::Parse`] naming the row.
    #[default]
    Fail,
    /// Skip the row and report it in [`LoadedTable::diagnostics`].
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,
    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,
}

fn default_delimiter() -> u8 {
    b','
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// One data row: raw text values keyed by the shared header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRecord {
    row: usize,
    line: u64,
    headers: Arc<[String]>,
    values: Box<[String]>,
}

impl TabularRecord {
    /// 0-based index among non-blank data rows.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// 1-based source line, `0` when unknown.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw value of the column named exactly `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        let index = self.headers.iter().position(|header| header == field)?;
        self.values.get(index).map(String::as_str)
    }

    /// Field/value pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A row skipped under [`MalformedRowPolicy::Drop`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    pub row: usize,
    pub line: u64,
    pub expected_fields: usize,
    pub found_fields: usize,
}

/// Result of one load: header row, records in file order, dropped-row notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    headers: Arc<[String]>,
    records: Vec<TabularRecord>,
    diagnostics: Vec<RowDiagnostic>,
}

impl LoadedTable {
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn has_column(&self, field: &str) -> bool {
        self.headers.iter().any(|header| header == field)
    }

    #[must_use]
    pub fn records(&self) -> &[TabularRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<TabularRecord> {
        self.records
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[RowDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses delimited text with a mandatory header row.
pub fn load_str(source: &str, options: LoadOptions) -> ChartResult<LoadedTable> {
    load_reader(source.as_bytes(), options)
}

/// Reads and parses a dataset file. Nothing is cached between calls.
pub fn load_path(path: impl AsRef<Path>, options: LoadOptions) -> ChartResult<LoadedTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading dataset");
    let file = File::open(path)?;
    load_reader(file, options)
}

pub fn load_reader<R: Read>(source: R, options: LoadOptions) -> ChartResult<LoadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(source);

    let header_record = reader.headers().map_err(|e| map_csv_error(e, 0))?.clone();
    if header_record.is_empty() || header_record.iter().all(|h| h.trim().is_empty()) {
        return Err(ChartError::Parse {
            row: 0,
            line: 1,
            message: "missing header row".to_owned(),
        });
    }
    let headers: Arc<[String]> = header_record.iter().map(str::to_owned).collect();
    let expected = headers.len();

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    let mut row = 0_usize;

    for result in reader.records() {
        let record = result.map_err(|e| map_csv_error(e, row))?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() != expected {
            match options.malformed_rows {
                MalformedRowPolicy::Fail => {
                    return Err(ChartError::Parse {
                        row,
                        line,
                        message: format!(
                            "expected {expected} fields, found {}",
                            record.len()
                        ),
                    });
                }
                MalformedRowPolicy::Drop => {
                    warn!(
                        row,
                        line,
                        expected_fields = expected,
                        found_fields = record.len(),
                        "dropping malformed row"
                    );
                    diagnostics.push(RowDiagnostic {
                        row,
                        line,
                        expected_fields: expected,
                        found_fields: record.len(),
                    });
                    row += 1;
                    continue;
                }
            }
        }

        records.push(TabularRecord {
            row,
            line,
            headers: Arc::clone(&headers),
            values: record.iter().map(str::to_owned).collect(),
        });
        row += 1;
    }

    debug!(
        columns = expected,
        records = records.len(),
        dropped = diagnostics.len(),
        "parsed tabular dataset"
    );
    Ok(LoadedTable {
        headers,
        records,
        diagnostics,
    })
}

/// Whitespace-only lines come through as a single blank field.
fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|value| value.trim().is_empty()) && record.len() <= 1
}

fn map_csv_error(err: csv::Error, row: usize) -> ChartError {
    let line = err.position().map_or(0, csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => ChartError::Io(io),
        _ => ChartError::Parse { row, line, message },
    }
}
