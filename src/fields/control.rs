//! Control fields 001, 003 and the 008 fixed-length data elements.

use chrono::NaiveDate;

use crate::parse;
use crate::record::Field;
use crate::source::RecordNumber;

/// Institution code written to 003.
pub const CONTROL_NUMBER_IDENTIFIER: &str = "CZ PrUCL";

/// Language of the catalogued item, 008/35-37.
const LANGUAGE: &str = "ita";

/// 001: `it22` followed by the six-digit record key.
#[must_use]
pub fn control_number(number: RecordNumber) -> Field {
    Field::control("001", number.control_number())
}

/// 003: the institution owning the control number.
#[must_use]
pub fn control_number_identifier() -> Field {
    Field::control("003", CONTROL_NUMBER_IDENTIFIER)
}

/// MARC country code for the country named in the imprint's parentheses.
///
/// ```
/// use bibmarc::fields::country_code;
///
/// assert_eq!(country_code(Some("Roma (Itálie): Nuovo editore")), "it-");
/// assert_eq!(country_code(Some("Praha (Česká republika): Argo")), "xr-");
/// assert_eq!(country_code(Some("Wien (Rakousko): Zsolnay")), "xx-");
/// assert_eq!(country_code(None), "xx-");
/// ```
#[must_use]
pub fn country_code(imprint: Option<&str>) -> &'static str {
    match imprint.and_then(parse::parenthesized) {
        Some("Itálie") => "it-",
        Some("Česká republika") => "xr-",
        _ => "xx-",
    }
}

/// 008: cataloging date, publication dates, country, and language.
///
/// Always 40 characters for years of at most four digits, which
/// [`SourceRow::publication_year`](crate::SourceRow::publication_year)
/// enforces. An absent year is written as eight dashes.
#[must_use]
pub fn fixed_length_data(cataloged_on: NaiveDate, year: Option<u32>, imprint: Option<&str>) -> Field {
    let dates = match year {
        Some(year) => format!("{year:04}----"),
        None => "--------".to_string(),
    };
    let data = format!(
        "{}s{dates}{}{}{LANGUAGE}-d",
        cataloged_on.format("%y%m%d"),
        country_code(imprint),
        "-".repeat(17),
    );
    Field::control("008", data)
}
