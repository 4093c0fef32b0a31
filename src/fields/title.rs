//! Title statement 245.

use crate::error::RowError;
use crate::parse::{self, AuthorHeading};
use crate::record::Field;
use crate::source::columns;

/// Italian articles ignored when filing a title.
const ARTICLES: [&str; 12] = [
    "il", "lo", "la", "gli", "le", "i", "un", "una", "uno", "dei", "degli", "delle",
];

/// Number of leading characters to skip when filing a title.
///
/// An article forming the whole first word skips itself and the following
/// space; the elided `l'` and `un'` skip two and three characters.
///
/// ```
/// use bibmarc::fields::non_filing_count;
///
/// assert_eq!(non_filing_count("Il processo"), 3);
/// assert_eq!(non_filing_count("Degli amori"), 6);
/// assert_eq!(non_filing_count("L'insostenibile leggerezza"), 2);
/// assert_eq!(non_filing_count("Un’altra storia"), 3);
/// assert_eq!(non_filing_count("Isola"), 0);
/// ```
#[must_use]
pub fn non_filing_count(title: &str) -> u32 {
    let lower = title.trim_start().to_lowercase();
    for (elided, count) in [("l'", 2), ("l’", 2), ("un'", 3), ("un’", 3)] {
        if lower.starts_with(elided) {
            return count;
        }
    }
    match lower.split(|c: char| !c.is_alphanumeric()).next() {
        Some(word) if ARTICLES.contains(&word) => {
            u32::try_from(word.chars().count()).map_or(0, |count| count + 1)
        },
        _ => 0,
    }
}

/// Statement of responsibility: author, translators, and extra liability text.
///
/// Returns `None` when there is nothing to state.
#[must_use]
pub fn responsibility_statement(
    author: Option<&AuthorHeading>,
    translators: &[String],
    liability: Option<&str>,
) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(author) = author {
        parts.push(parse::display_name(&author.name));
    }
    if !translators.is_empty() {
        let names: Vec<_> = translators.iter().map(|t| parse::display_name(t)).collect();
        parts.push(format!("traduzione di {}", names.join(", ")));
    }
    if let Some(liability) = liability {
        parts.push(liability.to_string());
    }
    (!parts.is_empty()).then(|| parts.join(" ; "))
}

/// Build the 245 field from the title cell and the responsible persons.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] if the title cell is absent.
pub fn title_statement(
    title: Option<&str>,
    author: Option<&AuthorHeading>,
    translators: &[String],
    liability: Option<&str>,
) -> Result<Field, RowError> {
    let text = title.ok_or_else(|| RowError::malformed(columns::TITLE, "", "a title"))?;
    let (title, subtitle) = parse::title_and_subtitle(text);
    if title.is_empty() {
        return Err(RowError::malformed(columns::TITLE, text, "a title before the colon"));
    }
    let responsibility = responsibility_statement(author, translators, liability);

    let non_filing = char::from_digit(non_filing_count(&title), 10).unwrap_or('0');
    let mut field = Field::new("245", '1', non_filing);
    match (subtitle, responsibility) {
        (None, None) => field.add_subfield('a', title),
        (Some(subtitle), None) => {
            field.add_subfield('a', format!("{title} :"));
            field.add_subfield('b', subtitle);
        },
        (None, Some(responsibility)) => {
            field.add_subfield('a', title);
            field.add_subfield('c', responsibility);
        },
        (Some(subtitle), Some(responsibility)) => {
            field.add_subfield('a', format!("{title} :"));
            field.add_subfield('b', format!("{subtitle} /"));
            field.add_subfield('c', responsibility);
        },
    }
    Ok(field)
}
