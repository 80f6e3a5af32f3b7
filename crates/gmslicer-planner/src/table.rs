//! Command table I/O
//!
//! The command table is a CSV file with the fixed header
//! `X,Y,Z,Theta,Phi` and one row of integer step targets per domain, in
//! traversal order.

use crate::error::{TableError, TableResult};
use gmslicer_core::MotorCommandRow;
use std::io::{Read, Write};
use std::path::Path;

/// Ordered motor command rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    rows: Vec<MotorCommandRow>,
}

impl CommandTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` rows
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a row
    pub fn push(&mut self, row: MotorCommandRow) {
        self.rows.push(row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in order
    pub fn rows(&self) -> &[MotorCommandRow] {
        &self.rows
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<MotorCommandRow> {
        self.rows
    }

    /// Write the header and every row as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> TableResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(MotorCommandRow::HEADER)?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string
    pub fn to_csv_string(&self) -> TableResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| TableError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Write the table to a file, replacing any existing content
    pub fn save(&self, path: &Path) -> TableResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        tracing::info!(path = %path.display(), rows = self.len(), "Wrote command table");
        Ok(())
    }

    /// Parse a table from CSV, requiring the command table header
    pub fn read_csv<R: Read>(reader: R) -> TableResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.iter().ne(MotorCommandRow::HEADER.iter().copied()) {
            return Err(TableError::Header {
                expected: MotorCommandRow::HEADER.join(","),
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        let mut table = Self::new();
        for row in csv_reader.deserialize::<MotorCommandRow>() {
            table.push(row?);
        }
        Ok(table)
    }

    /// Load a table from a file
    pub fn load(path: &Path) -> TableResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_csv(file)
    }
}

impl FromIterator<MotorCommandRow> for CommandTable {
    fn from_iter<I: IntoIterator<Item = MotorCommandRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandTable {
    type Item = &'a MotorCommandRow;
    type IntoIter = std::slice::Iter<'a, MotorCommandRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
