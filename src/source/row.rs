//! One row of the translations bibliography.

use serde::Deserialize;
use std::fmt;

use crate::error::RowError;
use crate::parse;

/// CSV header names of the intake spreadsheet.
///
/// These strings are the external schema and must match the exported sheet
/// byte for byte, including the trailing space of [`SOURCE_LANGUAGE`].
pub mod columns {
    /// Record number, the primary key
    pub const RECORD_NUMBER: &str = "Číslo záznamu";
    /// Record type: book, part of book, or magazine article
    pub const RECORD_TYPE: &str = "Typ záznamu";
    /// Work sub-type; `souborné dílo` marks a collective work
    pub const WORK_TYPE: &str = "typ díla (celé dílo, úryvek, antologie, souborné dílo)";
    /// "Surname, Name (CODE)"
    pub const AUTHOR: &str = "Autor/ka + kód autority";
    /// Title of the Czech original
    pub const ORIGINAL_TITLE: &str = "Původní název";
    /// Translators separated by `§`
    pub const TRANSLATORS: &str = "Překladatel/ka";
    /// Imprint statements separated by `§`
    pub const IMPRINT: &str = "Město vydání, země vydání, nakladatel";
    /// Year of publication
    pub const YEAR: &str = "Rok";
    /// ISBN
    pub const ISBN: &str = "ISBN";
    /// Number of pages
    pub const PAGES: &str = "Počet stran";
    /// Source or reference note
    pub const SOURCE_NOTE: &str = "Zdroj či odkaz";
    /// Record number of the containing book
    pub const PARENT: &str = "Je součást čeho (číslo záznamu)";
    /// Additional statement of responsibility
    pub const RESPONSIBILITY: &str = "Údaje o odpovědnosti a další informace";
    /// Italian title, optionally "Title: Subtitle"
    pub const TITLE: &str = "Název díla dle titulu (v příslušném písmu)";
    /// Language of the work
    pub const WORK_LANGUAGE: &str = "Jazyk díla";
    /// Language translated from
    pub const SOURCE_LANGUAGE: &str = "Výchozí jazyk ";
    /// Pivot language of an indirect translation
    pub const PIVOT_LANGUAGE: &str = "Zprostředkovací jazyk";
    /// "Magazine, issue data"
    pub const JOURNAL_ISSUE: &str = "Údaje o časopiseckém vydání";
    /// Translators credited by the magazine, overriding [`TRANSLATORS`] for articles
    pub const MAGAZINE_TRANSLATORS: &str = "Překladatel/ka (časopis)";
}

/// Largest year that fits the four date positions of field 008.
const MAX_YEAR: u32 = 9999;

/// Record number of a row, the dataset's primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordNumber(pub u32);

impl RecordNumber {
    /// Record number zero-padded to six digits, as used in linkage fields.
    ///
    /// ```
    /// use bibmarc::RecordNumber;
    /// assert_eq!(RecordNumber(42).key(), "000042");
    /// ```
    #[must_use]
    pub fn key(self) -> String {
        format!("{:06}", self.0)
    }

    /// Institutional control number written to field 001.
    ///
    /// ```
    /// use bibmarc::RecordNumber;
    /// assert_eq!(RecordNumber(7).control_number(), "it22000007");
    /// ```
    #[must_use]
    pub fn control_number(self) -> String {
        format!("it22{}", self.key())
    }
}

impl fmt::Display for RecordNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row exactly as deserialized from the CSV; every cell is optional text.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRow {
    #[serde(rename = "Číslo záznamu", default)]
    pub number: Option<String>,
    #[serde(rename = "Typ záznamu", default)]
    pub record_type: Option<String>,
    #[serde(rename = "typ díla (celé dílo, úryvek, antologie, souborné dílo)", default)]
    pub work_type: Option<String>,
    #[serde(rename = "Autor/ka + kód autority", default)]
    pub author: Option<String>,
    #[serde(rename = "Původní název", default)]
    pub original_title: Option<String>,
    #[serde(rename = "Překladatel/ka", default)]
    pub translators: Option<String>,
    #[serde(rename = "Město vydání, země vydání, nakladatel", default)]
    pub imprint: Option<String>,
    #[serde(rename = "Rok", default)]
    pub year: Option<String>,
    #[serde(rename = "ISBN", default)]
    pub isbn: Option<String>,
    #[serde(rename = "Počet stran", default)]
    pub pages: Option<String>,
    #[serde(rename = "Zdroj či odkaz", default)]
    pub source_note: Option<String>,
    #[serde(rename = "Je součást čeho (číslo záznamu)", default)]
    pub parent: Option<String>,
    #[serde(rename = "Údaje o odpovědnosti a další informace", default)]
    pub responsibility: Option<String>,
    #[serde(rename = "Název díla dle titulu (v příslušném písmu)", default)]
    pub title: Option<String>,
    #[serde(rename = "Jazyk díla", default)]
    pub work_language: Option<String>,
    #[serde(rename = "Výchozí jazyk ", default)]
    pub source_language: Option<String>,
    #[serde(rename = "Zprostředkovací jazyk", default)]
    pub pivot_language: Option<String>,
    #[serde(rename = "Údaje o časopiseckém vydání", default)]
    pub journal_issue: Option<String>,
    #[serde(rename = "Překladatel/ka (časopis)", default)]
    pub magazine_translators: Option<String>,
}

/// A bibliographic entry with cleaned text cells.
///
/// Text cells are NFC-normalized and trimmed; blank cells are `None`.
/// Numeric cells other than the record number stay textual until a
/// formatter needs them, so a bad year fails only its own row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    /// Record number, the primary key
    pub number: RecordNumber,
    /// Record type: book, part of book, or magazine article
    pub record_type: Option<String>,
    /// Work sub-type; `souborné dílo` marks a collective work
    pub work_type: Option<String>,
    /// "Surname, Name (CODE)"
    pub author: Option<String>,
    /// Title of the Czech original
    pub original_title: Option<String>,
    /// Translators separated by `§`
    pub translators: Option<String>,
    /// Imprint statements separated by `§`
    pub imprint: Option<String>,
    /// Year of publication
    pub year: Option<String>,
    /// ISBN
    pub isbn: Option<String>,
    /// Number of pages
    pub pages: Option<String>,
    /// Source or reference note
    pub source_note: Option<String>,
    /// Record number of the containing book
    pub parent: Option<String>,
    /// Additional statement of responsibility
    pub responsibility: Option<String>,
    /// Italian title, optionally "Title: Subtitle"
    pub title: Option<String>,
    /// Language of the work
    pub work_language: Option<String>,
    /// Language translated from
    pub source_language: Option<String>,
    /// Pivot language of an indirect translation
    pub pivot_language: Option<String>,
    /// "Magazine, issue data"
    pub journal_issue: Option<String>,
    /// Translators credited by the magazine, overriding `translators` for articles
    pub magazine_translators: Option<String>,
}

impl SourceRow {
    /// Create an otherwise empty row with the given record number.
    #[must_use]
    pub fn new(number: u32) -> Self {
        SourceRow {
            number: RecordNumber(number),
            ..SourceRow::default()
        }
    }

    /// Publication year.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidNumber`] if the cell is not an integer or
    /// has more than four digits.
    pub fn publication_year(&self) -> Result<Option<u32>, RowError> {
        match parse::integer(columns::YEAR, self.year.as_deref())? {
            Some(year) if year > MAX_YEAR => Err(RowError::InvalidNumber {
                column: columns::YEAR,
                value: year.to_string(),
            }),
            year => Ok(year),
        }
    }

    /// Record number of the containing book.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidNumber`] if the cell is not an integer.
    pub fn parent_number(&self) -> Result<Option<RecordNumber>, RowError> {
        Ok(parse::integer(columns::PARENT, self.parent.as_deref())?.map(RecordNumber))
    }

    /// Whether the work sub-type marks a collective work.
    #[must_use]
    pub fn is_collective_work(&self) -> bool {
        self.work_type.as_deref() == Some("souborné dílo")
    }
}

impl RawRow {
    /// Whether every cell except the record number is blank.
    pub(crate) fn is_blank(&self) -> bool {
        [
            &self.record_type,
            &self.work_type,
            &self.author,
            &self.original_title,
            &self.translators,
            &self.imprint,
            &self.year,
            &self.isbn,
            &self.pages,
            &self.source_note,
            &self.parent,
            &self.responsibility,
            &self.title,
            &self.work_language,
            &self.source_language,
            &self.pivot_language,
            &self.journal_issue,
            &self.magazine_translators,
        ]
        .iter()
        .all(|cell| parse::present(cell.as_deref()).is_none())
    }

    /// Clean the text cells and attach the parsed record number.
    pub(crate) fn into_row(self, number: RecordNumber) -> SourceRow {
        let clean = |cell: Option<String>| parse::present(cell.as_deref());
        SourceRow {
            number,
            record_type: clean(self.record_type),
            work_type: clean(self.work_type),
            author: clean(self.author),
            original_title: clean(self.original_title),
            translators: clean(self.translators),
            imprint: clean(self.imprint),
            year: clean(self.year),
            isbn: clean(self.isbn),
            pages: clean(self.pages),
            source_note: clean(self.source_note),
            parent: clean(self.parent),
            responsibility: clean(self.responsibility),
            title: clean(self.title),
            work_language: clean(self.work_language),
            source_language: clean(self.source_language),
            pivot_language: clean(self.pivot_language),
            journal_issue: clean(self.journal_issue),
            magazine_translators: clean(self.magazine_translators),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_number_padding() {
        assert_eq!(RecordNumber(7).control_number(), "it22000007");
        assert_eq!(RecordNumber(42).control_number(), "it22000042");
        assert_eq!(RecordNumber(1_234_567).key(), "1234567");
    }

    #[test]
    fn test_year_accepts_spreadsheet_floats() {
        let mut row = SourceRow::new(1);
        row.year = Some("1472.0".to_string());
        assert_eq!(row.publication_year(), Ok(Some(1472)));

        row.year = Some("circa 1900".to_string());
        assert!(matches!(row.publication_year(), Err(RowError::InvalidNumber { .. })));

        row.year = None;
        assert_eq!(row.publication_year(), Ok(None));
    }

    #[test]
    fn test_year_limited_to_four_digits() {
        let mut row = SourceRow::new(1);
        row.year = Some("9999".to_string());
        assert_eq!(row.publication_year(), Ok(Some(9999)));

        row.year = Some("19855".to_string());
        assert_eq!(
            row.publication_year(),
            Err(RowError::InvalidNumber {
                column: columns::YEAR,
                value: "19855".to_string(),
            })
        );

        row.year = Some("19855.0".to_string());
        assert!(matches!(
            row.publication_year(),
            Err(RowError::InvalidNumber { column: columns::YEAR, .. })
        ));
    }

    #[test]
    fn test_collective_work_marker() {
        let mut row = SourceRow::new(1);
        assert!(!row.is_collective_work());
        row.work_type = Some("souborné dílo".to_string());
        assert!(row.is_collective_work());
        row.work_type = Some("úryvek".to_string());
        assert!(!row.is_collective_work());
    }

    #[test]
    fn test_blank_raw_row() {
        let mut raw = RawRow {
            number: Some("12".to_string()),
            author: Some("  \n".to_string()),
            ..RawRow::default()
        };
        assert!(raw.is_blank());
        raw.title = Some("Il processo".to_string());
        assert!(!raw.is_blank());
    }

    #[test]
    fn test_into_row_trims_cells() {
        let raw = RawRow {
            title: Some("\n Inferno: Canto primo  ".to_string()),
            isbn: Some("   ".to_string()),
            ..RawRow::default()
        };
        let row = raw.into_row(RecordNumber(3));
        assert_eq!(row.title.as_deref(), Some("Inferno: Canto primo"));
        assert_eq!(row.isbn, None);
    }
}
