//! Descriptive fields shared by every record type, and the holdings block.

use crate::error::RowError;
use crate::parse;
use crate::record::Field;

/// Cataloging agency, MARC organization code.
pub const CATALOGING_AGENCY: &str = "ABB060";

/// 020 ISBN.
#[must_use]
pub fn isbn(isbn: Option<&str>) -> Option<Field> {
    isbn.map(|isbn| Field::builder("020", ' ', ' ').subfield('a', isbn).build())
}

/// 040 cataloging source.
#[must_use]
pub fn cataloging_source() -> Field {
    Field::builder("040", ' ', ' ')
        .subfield('a', CATALOGING_AGENCY)
        .subfield('b', "cze")
        .subfield('e', "rda")
        .build()
}

/// 041 language codes of the work, its source, and the pivot language.
///
/// Each cell contributes its first word, e.g. `ita` of `ita (italština)`.
/// Returns `None` when all three are absent.
#[must_use]
pub fn languages(work: Option<&str>, source: Option<&str>, pivot: Option<&str>) -> Option<Field> {
    let field = Field::builder("041", '1', ' ')
        .subfield_opt('a', work.and_then(parse::first_token))
        .subfield_opt('h', source.and_then(parse::first_token))
        .subfield_opt('k', pivot.and_then(parse::first_token))
        .build();
    (!field.subfields.is_empty()).then_some(field)
}

/// 300 extent, `N p.`.
///
/// # Errors
///
/// Returns [`RowError::InvalidNumber`] for a number-shaped page count that is
/// not a whole number.
pub fn extent(pages: Option<&str>) -> Result<Option<Field>, RowError> {
    Ok(parse::page_count(pages)?
        .map(|pages| Field::builder("300", ' ', ' ').subfield('a', format!("{pages} p.")).build()))
}

/// 998 local source note.
#[must_use]
pub fn source_note(note: Option<&str>) -> Option<Field> {
    note.map(|note| Field::builder("998", ' ', ' ').subfield('a', note).build())
}

/// 910, 964 and OWN, identical on every record.
#[must_use]
pub fn holdings() -> [Field; 3] {
    [
        Field::builder("910", ' ', ' ').subfield('a', CATALOGING_AGENCY).build(),
        Field::builder("964", ' ', ' ').subfield('a', "TRL").build(),
        Field::builder("OWN", ' ', ' ').subfield('a', "UCLA").build(),
    ]
}
