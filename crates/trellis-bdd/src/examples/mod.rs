//! Example tables driving scenario outlines.
//!
//! Inline tables are `|`-delimited rows with the header first. External
//! tables are comma-separated files; each of their records is re-serialized
//! into the inline form before parsing so both sources share one row parser.

mod error;
mod row;

use log::warn;

use crate::delimited;

pub use error::ExampleTableError;
pub use row::ExampleRow;

/// Column names plus the rows of an example table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleTable {
    header: Vec<String>,
    rows: Vec<ExampleRow>,
}

impl ExampleTable {
    /// Build a table from pipe-delimited lines, header first.
    ///
    /// A leading and a trailing `|` are optional and cells are trimmed.
    ///
    /// # Errors
    /// Returns [`ExampleTableError`] when the header is missing, blank, or
    /// repeats a column, or when a row's width differs from the header's.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::ExampleTable;
    ///
    /// let table = ExampleTable::from_lines(["| x | y |", "| 1 | 2 |"])
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// assert_eq!(table.header(), ["x", "y"]);
    /// let first = table.rows().first().and_then(|row| row.get("y"));
    /// assert_eq!(first, Some("2"));
    /// ```
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ExampleTableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        let header_line = lines.next().ok_or(ExampleTableError::MissingHeader)?;
        let header = split_row(header_line.as_ref());
        validate_header(&header)?;

        let mut rows = Vec::new();
        for (index, line) in lines.enumerate() {
            let cells = split_row(line.as_ref());
            if cells.len() != header.len() {
                return Err(ExampleTableError::RaggedRow {
                    row_number: index + 2,
                    expected: header.len(),
                    actual: cells.len(),
                });
            }
            rows.push(ExampleRow::from_pairs(header.iter().cloned().zip(cells)));
        }
        if rows.is_empty() {
            warn!("example table with columns {header:?} has no rows");
        }
        Ok(Self { header, rows })
    }

    /// Build a table from the text of a comma-separated examples file.
    ///
    /// Fields may be double-quoted, with `""` standing for a literal quote.
    /// Blank lines are ignored.
    ///
    /// # Errors
    /// Returns [`ExampleTableError::Delimited`] for malformed quoting and the
    /// errors of [`ExampleTable::from_lines`] for structural problems.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::ExampleTable;
    ///
    /// let table = ExampleTable::from_delimited("name,greeting\nAda,\"hello, world\"\n")
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// let greeting = table.rows().first().and_then(|row| row.get("greeting"));
    /// assert_eq!(greeting, Some("hello, world"));
    /// ```
    pub fn from_delimited(text: &str) -> Result<Self, ExampleTableError> {
        let mut lines = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = delimited::split_record(line).map_err(|source| {
                ExampleTableError::Delimited {
                    line_number: index + 1,
                    source,
                }
            })?;
            lines.push(format!("| {} |", fields.join(" | ")));
        }
        Self::from_lines(lines)
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[ExampleRow] {
        &self.rows
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn validate_header(header: &[String]) -> Result<(), ExampleTableError> {
    for (index, column) in header.iter().enumerate() {
        if column.is_empty() {
            return Err(ExampleTableError::EmptyColumn {
                position: index + 1,
            });
        }
        if header.iter().take(index).any(|seen| seen == column) {
            return Err(ExampleTableError::DuplicateColumn {
                column: column.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
