//! Error types for record synthesis and the MARC codec.
//!
//! Three layers, from the inside out:
//! - [`MarcError`] for the record model and the ISO 2709 reader/writer
//! - [`RowError`] for problems confined to a single spreadsheet row
//! - [`ConvertError`] for a whole conversion run
//!
//! The batch driver reports and skips rows failing with a row-level
//! [`ConvertError`] (see [`ConvertError::is_row_level`]) and aborts on anything else.

use thiserror::Error;

use crate::source::RecordNumber;

/// Error type for the MARC record model and ISO 2709 codec.
#[derive(Error, Debug)]
pub enum MarcError {
    /// Error indicating an invalid or malformed MARC record.
    #[error("Invalid MARC record: {0}")]
    InvalidRecord(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error indicating an invalid field structure.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Error indicating a truncated or incomplete record.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A problem with one source row. The row produces no record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A text pattern the formatter needs is missing from a cell.
    #[error("malformed value in column '{column}': expected {expected}, got '{value}'")]
    Malformed {
        /// CSV column the value came from
        column: &'static str,
        /// The offending cell text
        value: String,
        /// Short description of the expected shape
        expected: &'static str,
    },

    /// The record type matches none of the known keywords.
    #[error("unclassified record type '{0}'")]
    Unclassified(String),

    /// A part-of-book row points to a record number that does not exist.
    #[error("parent record {0} not found")]
    MissingParent(RecordNumber),

    /// A part-of-book row points to a record number shared by several rows.
    #[error("parent record {parent} is ambiguous ({matches} rows share it)")]
    AmbiguousParent {
        /// Record number the row links to
        parent: RecordNumber,
        /// Number of rows carrying that record number
        matches: usize,
    },

    /// A non-blank row has no record number.
    #[error("row without a record number")]
    Unnumbered,

    /// A part-of-book row has no parent linkage at all.
    #[error("part of book without a parent record number")]
    UnlinkedPart,

    /// A numeric-looking value failed to convert.
    #[error("invalid number in column '{column}': '{value}'")]
    InvalidNumber {
        /// CSV column the value came from
        column: &'static str,
        /// The offending cell text
        value: String,
    },
}

impl RowError {
    pub(crate) fn malformed(column: &'static str, value: &str, expected: &'static str) -> Self {
        RowError::Malformed {
            column,
            value: value.to_string(),
            expected,
        }
    }
}

/// Error type for a conversion run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A single row could not be converted.
    #[error(transparent)]
    Row(#[from] RowError),

    /// Every candidate identifier for a base was already taken.
    #[error("identifier space exhausted for '{base}' after {attempts} attempts")]
    IdentifierSpaceExhausted {
        /// Identifier prefix that ran out of free suffixes
        base: String,
        /// Number of attempts made
        attempts: usize,
    },

    /// A tabular input file could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A tabular input file is readable but lacks what the converter needs.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Reading or writing MARC data failed.
    #[error(transparent)]
    Marc(#[from] MarcError),

    /// Settings could not be assembled.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Whether the error only concerns the current row.
    #[must_use]
    pub fn is_row_level(&self) -> bool {
        matches!(self, ConvertError::Row(_))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_errors_are_row_level() {
        let err: ConvertError = RowError::Unclassified("rivista".to_string()).into();
        assert!(err.is_row_level());
        assert_eq!(err.to_string(), "unclassified record type 'rivista'");
    }

    #[test]
    fn test_exhaustion_is_fatal() {
        let err = ConvertError::IdentifierSpaceExhausted {
            base: "ubcjk0167".to_string(),
            attempts: 10,
        };
        assert!(!err.is_row_level());
    }

    #[test]
    fn test_malformed_message_names_column() {
        let err = RowError::malformed("Rok", "abc", "a year");
        assert_eq!(
            err.to_string(),
            "malformed value in column 'Rok': expected a year, got 'abc'"
        );
    }
}
