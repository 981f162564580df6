// (C) Copyright IBM Corp. 2024.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `;`-separated data tables with fixed-width cells.
//!
//! Tables are built column by column and written row by row. Cells are never
//! quoted; lines end with CRLF.

mod format;

use std::fs::{self, File};
use std::path::Path;

use log::{debug, warn};

pub use format::{CellFormat, NumberLocale, TableFormat};

use crate::errors::{DeserializationError, Error, Result};

const DELIMITER: u8 = b';';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds the table from columns, each one starting with its header.
    ///
    /// Short columns are padded with blank cells as wide as their header.
    pub fn from_columns(columns: &[Vec<String>]) -> Self {
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..height)
            .map(|row| {
                columns
                    .iter()
                    .map(|column| {
                        column.get(row).cloned().unwrap_or_else(|| {
                            let width = column.first().map_or(0, |header| header.chars().count());
                            " ".repeat(width)
                        })
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.rows
            .first()
            .into_iter()
            .flatten()
            .map(|header| header.trim())
    }

    /// Reads a table. A missing file is an empty table.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Table file '{}' does not exist", path.display());
            return Ok(Self::default());
        }
        let file = File::open(path).map_err(|_| {
            Error::Other(format!(
                "File '{}' doesn't exist or cannot be read",
                path.display()
            ))
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(std::io::BufReader::new(file));
        let rows = reader
            .records()
            .map(|record| {
                record.map(|record| record.iter().map(str::to_string).collect::<Vec<_>>())
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| csv_error(path, e))?;
        debug!("Read {} rows from '{}'", rows.len(), path.display());
        Ok(Self { rows })
    }

    /// Writes the table, creating missing parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Other(format!(
                    "Cannot create directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::CRLF)
            .flexible(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| csv_error(path, e))?;
        }
        writer
            .flush()
            .map_err(|e| Error::Other(format!("Cannot write '{}': {e}", path.display())))?;
        debug!("Wrote {} rows to '{}'", self.rows.len(), path.display());
        Ok(())
    }

    /// Values of the column whose trimmed header is `name`, `None` when
    /// there is no such column. Blank cells are skipped.
    pub fn column(&self, name: &str, locale: &NumberLocale) -> Result<Option<Vec<f64>>> {
        let Some(index) = self.headers().position(|header| header == name) else {
            return Ok(None);
        };
        self.rows
            .iter()
            .skip(1)
            .filter_map(|row| row.get(index).map(|cell| cell.trim()))
            .filter(|cell| !cell.is_empty())
            .map(|cell| locale.parse(cell))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    Error::DeserializationError(DeserializationError {
        string: format!("Error processing table file '{}'", path.display()),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn table() -> Table {
        let format = TableFormat::new(CellFormat::default(), NumberLocale::new("ru"));
        Table::from_columns(&[
            format.column("tau", [0.0, 0.5, 1.0]),
            format.column("1.speed", [2.0, 2.5]),
        ])
    }

    #[rstest]
    fn test_short_columns_are_padded(table: Table) {
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.rows()[3], vec!["   1,000", "        "]);
        assert_eq!(table.headers().collect::<Vec<_>>(), vec!["tau", "1.speed"]);
    }

    #[rstest]
    fn test_write_and_read(table: Table) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/table.csv");
        table.write(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("     tau; 1.speed\r\n   0,000;   2,000\r\n"));
        assert!(!content.contains('"'));

        let read = Table::read(&path).unwrap();
        assert_eq!(read, table);
        let locale = NumberLocale::new("ru");
        assert_eq!(
            read.column("1.speed", &locale).unwrap(),
            Some(vec![2.0, 2.5])
        );
        assert_eq!(read.column("2.speed", &locale).unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::read(&dir.path().join("missing.csv")).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column("tau", &NumberLocale::default()).unwrap(), None);
    }

    #[test]
    fn test_unparsable_cell() {
        let table = Table::new(vec![
            vec!["tau".to_string()],
            vec!["x1".to_string()],
        ]);
        assert!(matches!(
            table.column("tau", &NumberLocale::default()),
            Err(Error::DeserializationError(_))
        ));
    }
}
