//! Error types surfaced while building example tables.

use thiserror::Error;

use crate::delimited::DelimitedError;

/// Errors raised when example rows cannot form a table.
///
/// Row numbers are 1-based and count the header row, so they point at the
/// line a reader sees in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExampleTableError {
    /// The table has no header row.
    #[error("example table requires a header row")]
    MissingHeader,
    /// A header cell is blank.
    #[error("example table header has an empty column name at position {position}")]
    EmptyColumn {
        /// 1-based position of the blank header cell.
        position: usize,
    },
    /// The header repeats a column name.
    #[error("example table header contains duplicate column '{column}'")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },
    /// A row has more or fewer cells than the header.
    #[error("example table row {row_number} has {actual} cells but expected {expected}")]
    RaggedRow {
        /// 1-based row number, counting the header.
        row_number: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells in the offending row.
        actual: usize,
    },
    /// A line of an external examples file is not valid comma-separated data.
    #[error("examples file line {line_number}: {source}")]
    Delimited {
        /// 1-based line number in the examples file.
        line_number: usize,
        /// Underlying tokenizer failure.
        #[source]
        source: DelimitedError,
    },
}
