//! Record assembly: one MARC record per spreadsheet row.
//!
//! [`RecordKind::classify`] picks the record shape from the row's type text,
//! and [`RecordAssembler::assemble`] runs the formatters that shape needs:
//!
//! - **Book**: 100, control fields, common fields, 264, and for a collective
//!   work the 995 listing its parts
//! - **Part of book**: the book's 100, 008 and 264, the part's own common
//!   fields, and the 995 pointing at the book
//! - **Article**: 100, control fields, common fields, 773
//!
//! Every record ends with the holdings block.

use chrono::NaiveDate;
use std::fmt;
use tracing::debug;

use crate::authority::AuthorityResolver;
use crate::error::{ConvertError, RowError};
use crate::fields;
use crate::leader::Leader;
use crate::parse::AuthorHeading;
use crate::record::{Field, Record};
use crate::source::{Dataset, SourceRow};

/// Shape of the record built for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// A book (`kniha`)
    Book,
    /// A part of a book (`část knihy`)
    PartOfBook,
    /// A magazine article (`článek v časopise`)
    Article,
}

impl RecordKind {
    /// Classify a record type by keyword, checked in the order book, part of
    /// book, article. The first keyword contained in the text wins.
    ///
    /// ```
    /// use bibmarc::RecordKind;
    ///
    /// assert_eq!(RecordKind::classify(Some("kniha")), Ok(RecordKind::Book));
    /// assert_eq!(RecordKind::classify(Some("část knihy")), Ok(RecordKind::PartOfBook));
    /// assert!(RecordKind::classify(Some("Kniha")).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Unclassified`] when no keyword matches.
    pub fn classify(record_type: Option<&str>) -> Result<Self, RowError> {
        let text = record_type.unwrap_or_default();
        [
            ("kniha", RecordKind::Book),
            ("část knihy", RecordKind::PartOfBook),
            ("článek v časopise", RecordKind::Article),
        ]
        .into_iter()
        .find_map(|(keyword, kind)| text.contains(keyword).then_some(kind))
        .ok_or_else(|| RowError::Unclassified(text.to_string()))
    }

    /// Leader position 07.
    #[must_use]
    pub fn bibliographic_level(self) -> char {
        match self {
            RecordKind::Book => 'm',
            RecordKind::PartOfBook => 'a',
            RecordKind::Article => 'b',
        }
    }

    /// Leader for a new record of this kind.
    #[must_use]
    pub fn leader(self) -> Leader {
        Leader::bibliographic(self.bibliographic_level())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Book => "book",
            RecordKind::PartOfBook => "part of book",
            RecordKind::Article => "article",
        };
        f.write_str(label)
    }
}

/// Builds records for the rows of one dataset.
#[derive(Debug, Clone, Copy)]
pub struct RecordAssembler<'a> {
    dataset: &'a Dataset,
    cataloged_on: NaiveDate,
}

impl<'a> RecordAssembler<'a> {
    /// Create an assembler; `cataloged_on` is written to 008.
    #[must_use]
    pub fn new(dataset: &'a Dataset, cataloged_on: NaiveDate) -> Self {
        RecordAssembler {
            dataset,
            cataloged_on,
        }
    }

    /// Build the record for a row.
    ///
    /// Fallible formatters run before the original-work identifier is
    /// resolved, so a rejected row never claims an identifier.
    ///
    /// # Errors
    ///
    /// Returns a row-level [`ConvertError::Row`] for unclassified or
    /// malformed rows and unresolved parents, and
    /// [`ConvertError::IdentifierSpaceExhausted`] if minting fails.
    pub fn assemble(
        &self,
        row: &SourceRow,
        resolver: &mut AuthorityResolver,
    ) -> Result<(RecordKind, Record), ConvertError> {
        let kind = RecordKind::classify(row.record_type.as_deref())?;
        let mut record = Record::new(kind.leader());

        // A part is published inside its book: author and imprint come from there.
        let parent = match kind {
            RecordKind::PartOfBook => Some(self.dataset.parent_of(row)?),
            RecordKind::Book | RecordKind::Article => None,
        };
        let publication = parent.unwrap_or(row);

        let heading = match publication.author.as_deref() {
            Some(author) => {
                let (field, heading) = fields::main_entry(author, resolver)?;
                record.add_ordered_field(field);
                Some(heading)
            },
            None => None,
        };
        let year = publication.publication_year()?;

        record.add_ordered_field(fields::control_number(row.number));
        record.add_ordered_field(fields::control_number_identifier());
        record.add_ordered_field(fields::fixed_length_data(
            self.cataloged_on,
            year,
            publication.imprint.as_deref(),
        ));

        let translators = match kind {
            RecordKind::Book => row.translators.as_deref(),
            RecordKind::PartOfBook => row
                .translators
                .as_deref()
                .or(publication.translators.as_deref()),
            RecordKind::Article => row
                .magazine_translators
                .as_deref()
                .or(row.translators.as_deref()),
        };
        let translators = fields::translator_names(translators);

        let specific = match kind {
            RecordKind::Book => self.book_fields(row, year)?,
            RecordKind::PartOfBook => {
                let mut specific = match publication.imprint.as_deref() {
                    Some(imprint) => fields::publication(imprint, year)?,
                    None => Vec::new(),
                };
                specific.push(fields::part_of_book(publication.number));
                specific
            },
            RecordKind::Article => article_fields(row)?,
        };

        add_common_fields(&mut record, row, heading.as_ref(), &translators, resolver)?;
        for field in specific {
            record.add_ordered_field(field);
        }
        for field in fields::holdings() {
            record.add_ordered_field(field);
        }

        debug!(record = %row.number, %kind, fields = record.len(), "record assembled");
        Ok((kind, record))
    }

    fn book_fields(&self, row: &SourceRow, year: Option<u32>) -> Result<Vec<Field>, ConvertError> {
        let mut specific = match row.imprint.as_deref() {
            Some(imprint) => fields::publication(imprint, year)?,
            None => Vec::new(),
        };
        if row.is_collective_work() {
            let children = self.dataset.children_of(row.number).map(|child| child.number);
            specific.extend(fields::collective_work(children));
        }
        Ok(specific)
    }
}

/// Fields every record type carries, described by the row itself.
fn add_common_fields(
    record: &mut Record,
    row: &SourceRow,
    heading: Option<&AuthorHeading>,
    translators: &[String],
    resolver: &mut AuthorityResolver,
) -> Result<(), ConvertError> {
    let title = fields::title_statement(
        row.title.as_deref(),
        heading,
        translators,
        row.responsibility.as_deref(),
    )?;
    let extent = fields::extent(row.pages.as_deref())?;
    let original_title = row.original_title.as_deref();
    let original = fields::original_work(heading, original_title, resolver)?;

    let fields = [
        fields::isbn(row.isbn.as_deref()),
        Some(fields::cataloging_source()),
        fields::languages(
            row.work_language.as_deref(),
            row.source_language.as_deref(),
            row.pivot_language.as_deref(),
        ),
        fields::uniform_title(original_title),
        extent,
        fields::source_note(row.source_note.as_deref()),
        original,
        Some(title),
    ];
    for field in fields.into_iter().flatten() {
        record.add_ordered_field(field);
    }
    for field in fields::translators(translators) {
        record.add_ordered_field(field);
    }
    Ok(())
}

fn article_fields(row: &SourceRow) -> Result<Vec<Field>, ConvertError> {
    let year = row.publication_year()?;
    Ok(row
        .journal_issue
        .as_deref()
        .map(|citation| fields::host_item(citation, year))
        .transpose()?
        .into_iter()
        .collect())
}
