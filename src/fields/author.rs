//! Main entry 100, personal name of the author.

use crate::authority::AuthorityResolver;
use crate::error::RowError;
use crate::parse::{self, AuthorHeading};
use crate::record::Field;

/// Relator code of the main entry.
const AUTHOR_RELATOR: &str = "aut";

/// Parse the author cell and build the 100 field.
///
/// The heading is returned for the original-work and title fields. The date
/// subfield is present only when the code is in the authority table.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] if the cell does not follow
/// `Surname, Name (CODE)`.
pub fn main_entry(
    text: &str,
    resolver: &AuthorityResolver,
) -> Result<(Field, AuthorHeading), RowError> {
    let heading = parse::author_heading(text)?;
    let field = Field::builder("100", '1', ' ')
        .subfield('a', heading.name.as_str())
        .subfield_opt('d', resolver.resolve_author_dates(heading.code.as_deref()))
        .subfield_opt('7', heading.code.as_deref())
        .subfield('4', AUTHOR_RELATOR)
        .build();
    Ok((field, heading))
}
