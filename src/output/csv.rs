//! CSV output format writer.

use crate::constants::columns;
use crate::error::{Error, Result};
use crate::output::{OutputWriter, ensure_parent_dir};
use crate::row::RowFields;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

/// CSV format output writer.
///
/// The column set is fixed at construction. Row fields that are not columns
/// are skipped; columns a row lacks are written as empty cells.
pub struct CsvWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    columns: Vec<String>,
}

impl CsvWriter {
    /// Create a new CSV writer, creating parent directories as needed.
    pub fn new(path: &Path, columns: Vec<String>) -> Result<Self> {
        ensure_parent_dir(path)?;
        let writer = csv::Writer::from_path(path).map_err(|e| Error::CsvWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            columns,
        })
    }

    /// Union of the field names of all rows, in first-seen order.
    ///
    /// Position columns stay last so that metadata keys first carried by a
    /// later row land before them.
    pub fn columns_for<R: RowFields>(rows: &[R]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for row in rows {
            for (name, _) in row.fields() {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }

        let (mut header, position): (Vec<String>, Vec<String>) = names
            .into_iter()
            .partition(|name| name.as_str() != columns::LAT && name.as_str() != columns::LON);
        header.extend(position);
        header
    }

    fn csv_err(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        if self.columns.is_empty() {
            return Ok(());
        }
        self.writer
            .write_record(&self.columns)
            .map_err(|e| self.csv_err(e))
    }

    fn write_row(&mut self, row: &dyn RowFields) -> Result<()> {
        let fields = row.fields();
        let record: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .find(|(name, _)| name == column)
                    .and_then(|(_, value)| value.as_ref())
                    .map(ToString::to_string)
                    .unwrap_or_default()
            })
            .collect();

        self.writer
            .write_record(&record)
            .map_err(|e| self.csv_err(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::OutputWrite {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

/// Write rows to a CSV file with a header covering every row's fields.
///
/// An empty slice produces an empty file.
pub fn write_rows<R: RowFields>(path: &Path, rows: &[R]) -> Result<()> {
    let mut writer = CsvWriter::new(path, CsvWriter::columns_for(rows))?;
    writer.write_header()?;
    for row in rows {
        writer.write_row(row)?;
    }
    writer.finalize()
}
