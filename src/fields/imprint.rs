//! Publication statement 264.

use crate::error::RowError;
use crate::parse;
use crate::record::Field;

/// Build one 264 field per `§`-separated imprint statement.
///
/// Each field carries `a` place followed by `:`, `b` publisher and, when
/// known, `c` year. The publisher of the last statement ends with `,`.
///
/// # Errors
///
/// Returns [`RowError::Malformed`] for a statement without a leading place
/// or without a publisher after the colon.
pub fn publication(text: &str, year: Option<u32>) -> Result<Vec<Field>, RowError> {
    let imprints = parse::segments(text)
        .map(|segment| parse::imprint(&segment))
        .collect::<Result<Vec<_>, _>>()?;
    let last = imprints.len().saturating_sub(1);

    Ok(imprints
        .into_iter()
        .enumerate()
        .map(|(position, imprint)| {
            let publisher = if position == last {
                format!("{},", imprint.publisher)
            } else {
                imprint.publisher
            };
            Field::builder("264", ' ', '1')
                .subfield('a', format!("{}:", imprint.place))
                .subfield('b', publisher)
                .subfield_opt('c', year.map(|year| year.to_string()))
                .build()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_imprint() {
        let fields = publication("Roma (Itálie): Nuovo editore", Some(1472)).unwrap();
        assert_eq!(fields.len(), 1);
        let field = &fields[0];
        assert_eq!((field.indicator1, field.indicator2), (' ', '1'));
        assert_eq!(field.get_subfield('a'), Some("Roma:"));
        assert_eq!(field.get_subfield('b'), Some("Nuovo editore,"));
        assert_eq!(field.get_subfield('c'), Some("1472"));
    }

    #[test]
    fn test_co_publication() {
        let fields = publication(
            "Milano (Itálie): Adelphi § Praha (Česká republika): Argo",
            None,
        )
        .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].get_subfield('a'), Some("Milano:"));
        assert_eq!(fields[0].get_subfield('b'), Some("Adelphi"));
        assert_eq!(fields[1].get_subfield('a'), Some("Praha:"));
        assert_eq!(fields[1].get_subfield('b'), Some("Argo,"));
        assert_eq!(fields[1].subfield_codes(), "ab");
    }

    #[test]
    fn test_malformed_segment_fails_whole_cell() {
        assert!(publication("Milano (Itálie): Adelphi § Praha", Some(2001)).is_err());
    }
}
