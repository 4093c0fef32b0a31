//! Links between records: 773 host item and the local 995 book linkage.

use crate::error::RowError;
use crate::parse;
use crate::record::Field;
use crate::source::RecordNumber;

/// Local linkage field between a collective work and its parts.
pub const LINKAGE_TAG: &str = "995";

/// 773 host item entry for a magazine article.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] if the citation has no comma between the
/// magazine name and the issue data.
pub fn host_item(citation: &str, year: Option<u32>) -> Result<Field, RowError> {
    let citation = parse::citation(citation)?;
    Ok(Field::builder("773", '0', ' ')
        .subfield('t', citation.magazine)
        .subfield('g', citation.issue)
        .subfield_opt('9', year.map(|year| year.to_string()))
        .build())
}

/// 995 listing the parts of a collective work, `None` without parts.
#[must_use]
pub fn collective_work<I>(children: I) -> Option<Field>
where
    I: IntoIterator<Item = RecordNumber>,
{
    let mut field = Field::builder(LINKAGE_TAG, ' ', ' ').subfield('a', "DN").build();
    for child in children {
        field.add_subfield('b', child.key());
    }
    (field.subfields.len() > 1).then_some(field)
}

/// 995 pointing from a part to its book.
#[must_use]
pub fn part_of_book(parent: RecordNumber) -> Field {
    Field::builder(LINKAGE_TAG, ' ', ' ')
        .subfield('a', "UP")
        .subfield('b', parent.key())
        .build()
}
