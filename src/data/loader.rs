// ============================================================
// Layer 4 — Split Loader
// ============================================================
// Reads one split's CSV into memory and binds it to the
// schema the calling stage needs. Also writes tables back out.
//
// A split whose file does not exist is reported as
// MissingSplit so the caller can skip it; a split with a
// missing required column is reported as Schema before any
// row is looked at.
//
// Writes go to a temporary file in the target directory
// which is renamed into place only once fully written.
//
// Reference: csv crate documentation
//            tempfile crate documentation

use std::{fs, path::Path};

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::record::{ColumnIndex, RawRecord, SplitSchema};

/// One split held in memory with its bound columns.
#[derive(Debug, Clone)]
pub struct SplitTable {
    pub split:   String,
    /// Header row, in file order.
    pub headers: Vec<String>,
    pub rows:    Vec<Vec<String>>,
    /// Where the schema's columns sit in `headers`.
    pub columns: ColumnIndex,
}

impl SplitTable {
    /// Number of data rows, header excluded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Typed view of every row through the interview schema.
    pub fn raw_records<'t>(
        &'t self,
        label_column: &'t str,
    ) -> impl Iterator<Item = RawRecord<'t>> + 't {
        self.rows
            .iter()
            .map(move |row| RawRecord::from_row(&self.columns, row, label_column))
    }

    /// Values of one bound column, `None` for missing cells.
    pub fn column_values<'t>(&'t self, column: &'t str) -> impl Iterator<Item = Option<&'t str>> + 't {
        self.rows.iter().map(move |row| self.columns.cell(row, column))
    }
}

/// Load a split CSV and check it against `schema`.
///
/// Returns `MissingSplit` when `path` does not exist and `Schema` when a
/// required column is absent; rows are only read after the header passes.
pub fn load_split(split: &str, path: &Path, schema: &SplitSchema) -> PrepResult<SplitTable> {
    if !path.exists() {
        return Err(PrepError::MissingSplit {
            split: split.to_string(),
            path:  path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    // Schema check happens before any row is read
    let columns = schema.bind(split, &headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    let table = SplitTable {
        split: split.to_string(),
        headers,
        rows,
        columns,
    };

    if table.is_empty() {
        tracing::warn!("[{}] '{}' has a header but no rows", split, path.display());
    } else {
        tracing::info!("[{}] Loaded {} rows from '{}'", split, table.len(), path.display());
    }

    Ok(table)
}

/// Write a table as CSV, creating the parent directory if needed.
///
/// The file appears at `path` only once every row has been written.
pub fn save_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> PrepResult<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new().from_writer(tmp.as_file());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| PrepError::Io(e.error))?;

    Ok(())
}
