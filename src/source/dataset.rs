//! The intake dataset and its record-number linkage index.

use indexmap::IndexMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use super::row::{columns, RawRow, RecordNumber, SourceRow};
use crate::error::{ConvertError, RowError};
use crate::parse;

/// Record-number index over a dataset, built once per run.
///
/// Serves both directions of book linkage: a part looks up its parent by
/// record number, and a collective work enumerates the rows pointing at it.
/// Row positions are kept in dataset order.
#[derive(Debug, Default)]
pub struct LinkageIndex {
    by_number: IndexMap<RecordNumber, Vec<usize>>,
    children: IndexMap<RecordNumber, Vec<usize>>,
}

impl LinkageIndex {
    fn build(rows: &[SourceRow]) -> Self {
        let mut index = LinkageIndex::default();
        for (position, row) in rows.iter().enumerate() {
            index.by_number.entry(row.number).or_default().push(position);
            match row.parent_number() {
                Ok(Some(parent)) => index.children.entry(parent).or_default().push(position),
                Ok(None) => {},
                // Reported when the row itself is assembled
                Err(e) => debug!(record = %row.number, "parent linkage not indexed: {e}"),
            }
        }
        index
    }

    /// Positions of the rows carrying a record number.
    #[must_use]
    pub fn rows_numbered(&self, number: RecordNumber) -> &[usize] {
        self.by_number.get(&number).map_or(&[], Vec::as_slice)
    }

    /// Positions of the rows whose parent linkage is `number`.
    #[must_use]
    pub fn children_of(&self, number: RecordNumber) -> &[usize] {
        self.children.get(&number).map_or(&[], Vec::as_slice)
    }
}

/// A CSV row left out of the dataset because its record number is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// CSV line the row starts on, the header being line 1
    pub line: u64,
    /// Why the row was left out
    pub error: RowError,
}

/// All rows of the intake spreadsheet, in original order.
#[derive(Debug)]
pub struct Dataset {
    rows: Vec<SourceRow>,
    rejected: Vec<RejectedRow>,
    index: LinkageIndex,
}

impl Dataset {
    /// Build a dataset from already-cleaned rows.
    #[must_use]
    pub fn from_rows(rows: Vec<SourceRow>) -> Self {
        let index = LinkageIndex::build(&rows);
        Dataset {
            rows,
            rejected: Vec::new(),
            index,
        }
    }

    /// Load the CSV export of the spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read; see
    /// [`Dataset::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        Self::from_reader(File::open(path)?)
    }

    /// Load CSV data with a header row.
    ///
    /// Rows that are blank in every column except the record number are
    /// dropped. Columns the converter does not know are ignored. A non-blank
    /// row whose record number is missing or not an integer is kept aside in
    /// [`Dataset::rejected`] and takes no part in linkage.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or lacks the record number or
    /// record type column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConvertError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        for required in [columns::RECORD_NUMBER, columns::RECORD_TYPE] {
            if !headers.iter().any(|h| h == required) {
                return Err(ConvertError::InvalidDataset(format!(
                    "missing column '{required}'"
                )));
            }
        }

        let mut rows = Vec::new();
        let mut rejected = Vec::new();
        let mut dropped = 0usize;
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record)? {
            let line = record.position().map_or(0, csv::Position::line);
            let raw: RawRow = record.deserialize(Some(&headers))?;
            if raw.is_blank() {
                dropped += 1;
                continue;
            }
            match parse::integer(columns::RECORD_NUMBER, raw.number.as_deref()) {
                Ok(Some(number)) => rows.push(raw.into_row(RecordNumber(number))),
                Ok(None) => rejected.push(RejectedRow {
                    line,
                    error: RowError::Unnumbered,
                }),
                Err(error) => rejected.push(RejectedRow { line, error }),
            }
        }

        debug!(rows = rows.len(), rejected = rejected.len(), dropped, "dataset loaded");
        let dataset = Dataset {
            rejected,
            ..Dataset::from_rows(rows)
        };
        for (number, positions) in &dataset.index.by_number {
            if positions.len() > 1 {
                warn!(record = %number, count = positions.len(), "duplicate record number");
            }
        }
        Ok(dataset)
    }

    /// All rows in original order.
    #[must_use]
    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// Rows left out at load time, in file order.
    #[must_use]
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The book a part-of-book row belongs to.
    ///
    /// # Errors
    ///
    /// Returns a row error if the row has no parent linkage, the linkage is not
    /// a number, or it matches zero or several rows.
    pub fn parent_of(&self, row: &SourceRow) -> Result<&SourceRow, RowError> {
        let parent = row.parent_number()?.ok_or(RowError::UnlinkedPart)?;
        match self.index.rows_numbered(parent) {
            [] => Err(RowError::MissingParent(parent)),
            [position] => Ok(&self.rows[*position]),
            matches => Err(RowError::AmbiguousParent {
                parent,
                matches: matches.len(),
            }),
        }
    }

    /// Rows that name `number` as their parent, in dataset order.
    pub fn children_of(&self, number: RecordNumber) -> impl Iterator<Item = &SourceRow> {
        self.index
            .children_of(number)
            .iter()
            .map(move |&position| &self.rows[position])
    }
}
