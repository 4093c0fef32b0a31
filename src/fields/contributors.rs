//! Added entries 700 for translators.

use crate::parse;
use crate::record::Field;

/// Names of a `§`-separated translator cell, blank segments dropped.
#[must_use]
pub fn translator_names(text: Option<&str>) -> Vec<String> {
    text.map(|text| parse::segments(text).collect())
        .unwrap_or_default()
}

/// One 700 field per translator, in the order given.
#[must_use]
pub fn translators(names: &[String]) -> Vec<Field> {
    names
        .iter()
        .map(|name| {
            Field::builder("700", '1', ' ')
                .subfield('a', name.as_str())
                .subfield('4', "trl")
                .build()
        })
        .collect()
}
