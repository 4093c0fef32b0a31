//! Author code → biographical dates, loaded from the authority CSV.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::parse;

/// One row of the authority CSV. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct AuthorityRow {
    nkc_id: Option<String>,
    cz_dates: Option<String>,
}

/// Read-only mapping from author authority code to a dates string
/// such as `1883-1924`.
#[derive(Debug, Default, Clone)]
pub struct AuthorityTable {
    dates: HashMap<String, String>,
}

impl AuthorityTable {
    /// Load the authority CSV from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened; see
    /// [`AuthorityTable::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        Self::from_reader(File::open(path)?)
    }

    /// Load CSV data with `nkc_id` and `cz_dates` columns.
    ///
    /// The first row for a code wins; later duplicates are logged and ignored.
    /// Rows without a code or without dates are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or lacks either column.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConvertError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        for required in ["nkc_id", "cz_dates"] {
            if !headers.iter().any(|h| h == required) {
                return Err(ConvertError::InvalidDataset(format!(
                    "authority table lacks column '{required}'"
                )));
            }
        }

        let mut table = AuthorityTable::default();
        for row in reader.deserialize::<AuthorityRow>() {
            let row = row?;
            let (Some(code), Some(dates)) = (
                parse::present(row.nkc_id.as_deref()),
                parse::present(row.cz_dates.as_deref()),
            ) else {
                continue;
            };
            table.insert(code, dates);
        }
        debug!(codes = table.len(), "authority table loaded");
        Ok(table)
    }

    /// Build a table from `(code, dates)` pairs, first occurrence winning.
    pub fn from_pairs<I, C, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, D)>,
        C: Into<String>,
        D: Into<String>,
    {
        let mut table = AuthorityTable::default();
        for (code, dates) in pairs {
            table.insert(code.into(), dates.into());
        }
        table
    }

    fn insert(&mut self, code: String, dates: String) {
        if self.dates.contains_key(&code) {
            warn!(code = %code, "duplicate authority code ignored");
            return;
        }
        self.dates.insert(code, dates);
    }

    /// Dates for an author code.
    #[must_use]
    pub fn dates(&self, code: &str) -> Option<&str> {
        self.dates.get(code).map(String::as_str)
    }

    /// Number of codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
