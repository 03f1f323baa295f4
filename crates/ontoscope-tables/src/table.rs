//! CSV plumbing shared by every table.

use std::path::Path;

use csv::StringRecord;
use ontoscope_graph::{OntologyError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn csv_error(path: &Path, err: csv::Error) -> OntologyError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => OntologyError::io(path, source),
        _ => OntologyError::malformed(path, reason),
    }
}

fn check_columns(path: &Path, headers: &StringRecord, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(OntologyError::missing_key(path, *column));
        }
    }
    Ok(())
}

/// Cells and headers are trimmed, so ` 3` reads as `3`.
fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, e))
}

/// Reads typed rows, requiring `required` header columns to be present.
///
/// Row numbers in errors count the header as line 1.
pub fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    check_columns(path, &headers, required)?;

    let rows = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| OntologyError::malformed(path, format!("line {}: {e}", i + 2)))
        })
        .collect::<Result<Vec<T>>>()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded table");
    Ok(rows)
}

/// Renders `rows` under an explicit header, so empty tables still carry one.
pub fn render_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| csv_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    writer
        .into_inner()
        .map_err(|e| OntologyError::malformed(path, e.to_string()))
}

/// Untyped table for column-generic processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn read(path: &Path, required: &[&str]) -> Result<Self> {
        let mut reader = open_reader(path)?;
        let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
        check_columns(path, &headers, required)?;
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(|e| csv_error(path, e))
            })
            .collect::<Result<Vec<Vec<String>>>>()?;
        tracing::info!(path = %path.display(), rows = rows.len(), "loaded table");
        Ok(Self {
            headers: headers.iter().map(str::to_string).collect(),
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// A trimmed, non-empty cell; `None` for empty cells and short rows.
    pub fn cell(row: &[String], column: usize) -> Option<&str> {
        row.get(column)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}
