//! Grammars for the free-text cells of the intake spreadsheet.
//!
//! Each parser handles one cell shape and returns a structured value or a
//! [`RowError`]; none of them panic on malformed input. All of them expect
//! text that went through [`clean`].
//!
//! | Cell | Grammar |
//! |---|---|
//! | author | `name [ "(" code ")" ]`, the parenthesis pair closing the cell |
//! | title | `title [ ":" subtitle ]`, split at the first colon |
//! | imprint segment | `place [ "(" country ")" ] ":" publisher` |
//! | journal citation | `magazine "," issue`, split at the first comma |
//! | person name | `surname [ "," given ]` |
//! | repeatable cells | segments separated by `§` |

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::RowError;
use crate::source::columns;

/// Separator of repeated values inside one cell.
pub const SEGMENT_SEPARATOR: char = '§';

lazy_static! {
    /// Leading place name of an imprint segment.
    static ref PLACE: Regex = Regex::new(r"^[\w\s'’.\-]+").expect("place pattern is valid");
    /// Text shaped like a number, e.g. `120`, `120.0`, `1 200`.
    static ref NUMERIC_SHAPE: Regex =
        Regex::new(r"^[0-9][0-9\s.,]*$").expect("numeric pattern is valid");
}

/// NFC-normalize text and strip surrounding whitespace and newlines.
#[must_use]
pub fn clean(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_string()
}

/// Cleaned cell value, or `None` for an absent or blank cell.
#[must_use]
pub fn present(text: Option<&str>) -> Option<String> {
    text.map(clean).filter(|value| !value.is_empty())
}

/// Non-empty, cleaned segments of a `§`-delimited cell.
pub fn segments(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(SEGMENT_SEPARATOR)
        .map(clean)
        .filter(|segment| !segment.is_empty())
}

/// Parse an integer cell, accepting the `.0` float rendering of spreadsheets.
///
/// # Errors
///
/// Returns [`RowError::InvalidNumber`] when the cell is present but not a
/// non-negative integer.
pub fn integer(column: &'static str, text: Option<&str>) -> Result<Option<u32>, RowError> {
    let Some(text) = present(text) else {
        return Ok(None);
    };
    let invalid = || RowError::InvalidNumber {
        column,
        value: text.clone(),
    };
    if let Ok(value) = text.parse::<u32>() {
        return Ok(Some(value));
    }
    let value = text.parse::<f64>().map_err(|_| invalid())?;
    if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
        return Err(invalid());
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(Some(value as u32))
}

/// Parse a page count.
///
/// Free text that does not look like a number (`xii, 200 s.`) is not a page
/// count and yields `None`.
///
/// # Errors
///
/// Returns [`RowError::InvalidNumber`] for number-shaped text that is not a
/// non-negative integer, such as `12,5`.
pub fn page_count(text: Option<&str>) -> Result<Option<u32>, RowError> {
    match present(text) {
        Some(value) if NUMERIC_SHAPE.is_match(&value) => integer(columns::PAGES, Some(&value)),
        _ => Ok(None),
    }
}

/// Author heading: the name and the optional authority code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorHeading {
    /// "Surname, Given" as entered
    pub name: String,
    /// Authority code from the trailing parentheses
    pub code: Option<String>,
}

/// Parse `Surname, Given (CODE)`.
///
/// Without parentheses the whole cell is the name. Otherwise the cell must end
/// with a balanced parenthesis pair, which holds the code; earlier
/// parentheses stay part of the name.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] for unbalanced parentheses, text after the
/// closing parenthesis, or an empty name.
pub fn author_heading(text: &str) -> Result<AuthorHeading, RowError> {
    let text = clean(text);
    let malformed = || RowError::malformed(columns::AUTHOR, &text, "'Surname, Name (CODE)'");

    if !text.contains(['(', ')']) {
        return Ok(AuthorHeading {
            name: text.clone(),
            code: None,
        });
    }
    let body = text.strip_suffix(')').ok_or_else(malformed)?;

    let mut depth = 0usize;
    let mut open = None;
    for (position, c) in body.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => {
                open = Some(position);
                break;
            },
            '(' => depth -= 1,
            _ => {},
        }
    }
    let open = open.ok_or_else(malformed)?;

    let name = clean(&body[..open]);
    if name.is_empty() {
        return Err(malformed());
    }
    let code = present(Some(&body[open + 1..]));
    Ok(AuthorHeading { name, code })
}

/// Split a title cell at the first colon into title and subtitle.
#[must_use]
pub fn title_and_subtitle(text: &str) -> (String, Option<String>) {
    match text.split_once(':') {
        Some((title, subtitle)) => (clean(title), present(Some(subtitle))),
        None => (clean(text), None),
    }
}

/// One imprint statement of the imprint cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imprint {
    /// Place of publication
    pub place: String,
    /// Country named in parentheses
    pub country: Option<String>,
    /// Publisher
    pub publisher: String,
}

/// Parse one `§`-segment of the imprint cell: `Roma (Itálie): Nuovo editore`.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] if the segment does not start with a place
/// name or has no publisher after the colon.
pub fn imprint(segment: &str) -> Result<Imprint, RowError> {
    let segment = clean(segment);
    let place = PLACE
        .find(&segment)
        .map(|m| clean(m.as_str()))
        .filter(|place| !place.is_empty())
        .ok_or_else(|| RowError::malformed(columns::IMPRINT, &segment, "a leading place name"))?;
    let publisher = segment
        .split_once(':')
        .and_then(|(_, publisher)| present(Some(publisher)))
        .ok_or_else(|| {
            RowError::malformed(columns::IMPRINT, &segment, "'Place (Country): Publisher'")
        })?;
    Ok(Imprint {
        place,
        country: parenthesized(&segment).map(str::to_string),
        publisher,
    })
}

/// Text between the first `(` and the next `)`, trimmed.
#[must_use]
pub fn parenthesized(text: &str) -> Option<&str> {
    let start = text.find('(')? + 1;
    let end = start + text[start..].find(')')?;
    Some(text[start..end].trim())
}

/// Journal-issue citation: magazine name and issue data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Magazine title
    pub magazine: String,
    /// Volume, number, pages
    pub issue: String,
}

/// Split `Magazine, issue data` at the first comma.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] if the cell has no comma or no magazine name.
pub fn citation(text: &str) -> Result<Citation, RowError> {
    let text = clean(text);
    let malformed = || RowError::malformed(columns::JOURNAL_ISSUE, &text, "'Magazine, issue'");
    let (magazine, issue) = text.split_once(',').ok_or_else(malformed)?;
    let magazine = clean(magazine);
    if magazine.is_empty() {
        return Err(malformed());
    }
    Ok(Citation {
        magazine,
        issue: clean(issue),
    })
}

/// Reorder `Surname, Given` to `Given Surname`; names without a comma are kept.
#[must_use]
pub fn display_name(name: &str) -> String {
    match name.split_once(',') {
        Some((surname, given)) if !given.trim().is_empty() => {
            format!("{} {}", given.trim(), surname.trim())
        },
        Some((surname, _)) => surname.trim().to_string(),
        None => name.trim().to_string(),
    }
}

/// First whitespace-delimited token, e.g. the code of `ita (italština)`.
#[must_use]
pub fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Whether an original title says the original is unknown or does not exist.
#[must_use]
pub fn is_original_unknown(title: &str) -> bool {
    let title = clean(title).to_lowercase();
    title.contains("originál neznámý") || title.contains("originál neexistuje")
}
