//! The Czech original of a translation: 595 linking field and 240 uniform title.

use crate::authority::{AuthorityResolver, ORIGINAL_WORK_TAG};
use crate::error::ConvertError;
use crate::parse::{self, AuthorHeading};
use crate::record::Field;

/// Build the 595 field naming the original work.
///
/// Subfields `a` author, `d` dates, `7` code, `t` original title and `1`
/// identifier appear in that order, each only when known. The identifier is
/// reused from the catalog or minted; unknown originals get none.
///
/// Returns `None` when both the author and the title are absent.
///
/// # Errors
///
/// Returns [`ConvertError::IdentifierSpaceExhausted`] if minting fails.
pub fn original_work(
    author: Option<&AuthorHeading>,
    title: Option<&str>,
    resolver: &mut AuthorityResolver,
) -> Result<Option<Field>, ConvertError> {
    if author.is_none() && title.is_none() {
        return Ok(None);
    }
    let name = author.map(|heading| heading.name.as_str());
    let code = author.and_then(|heading| heading.code.as_deref());
    let identifier = resolver.resolve_or_mint_original_work_id(name, title, code)?;

    let field = Field::builder(ORIGINAL_WORK_TAG, '1', '2')
        .subfield_opt('a', name)
        .subfield_opt('d', resolver.resolve_author_dates(code))
        .subfield_opt('7', code)
        .subfield_opt('t', title)
        .subfield_opt('1', identifier)
        .build();
    Ok(Some(field))
}

/// 240 uniform title, only for originals marked unknown or nonexistent.
#[must_use]
pub fn uniform_title(title: Option<&str>) -> Option<Field> {
    let title = title.filter(|title| parse::is_original_unknown(title))?;
    Some(
        Field::builder("240", '1', '0')
            .subfield('a', title)
            .subfield('l', "italsky")
            .build(),
    )
}
