//! MARC bibliographic record structures.
//!
//! This module provides the in-memory record the assembler builds and the
//! ISO 2709 codec reads and writes:
//! - [`Record`]: leader plus an ordered sequence of fields
//! - [`Field`]: a control field (`001`–`009`) or a data field with indicators
//! - [`Subfield`]: named data element within a data field
//!
//! Fields are kept in one sequence, so the order of a record is exactly the
//! order of its directory. [`Record::add_ordered_field`] keeps that sequence
//! sorted by tag while preserving insertion order among equal tags.
//!
//! # Examples
//!
//! ```
//! use bibmarc::{Field, Leader, Record};
//!
//! let record = Record::builder(Leader::default())
//!     .field(Field::control("001", "it22000042"))
//!     .field(
//!         Field::builder("245", '1', '0')
//!             .subfield('a', "Inferno :")
//!             .subfield('b', "Canto primo")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.control_field("001"), Some("it22000042"));
//! assert_eq!(record.get_field("245").and_then(|f| f.get_subfield('b')), Some("Canto primo"));
//! ```

use crate::leader::Leader;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// A MARC bibliographic record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record leader (24 bytes)
    pub leader: Leader,
    fields: Vec<Field>,
}

/// A field in a MARC record.
///
/// Control fields carry raw `data` and no subfields; data fields carry
/// indicators and subfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field tag (3 characters, usually digits)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Fixed-length data of a control field
    pub data: Option<String>,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create a new MARC record with the given leader
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing MARC records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            record: Record::new(leader),
        }
    }

    /// Append a field at the end of the record.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Insert a field after every field whose tag sorts at or before its own.
    ///
    /// Numeric tags sort ascending; alphabetic tags (such as `OWN`) sort after
    /// all numeric tags. Fields with equal tags keep their insertion order.
    pub fn add_ordered_field(&mut self, field: Field) {
        let position = self
            .fields
            .iter()
            .position(|existing| compare_tags(&existing.tag, &field.tag) == Ordering::Greater)
            .unwrap_or(self.fields.len());
        self.fields.insert(position, field);
    }

    /// Get the first field with a given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.tag == tag)
    }

    /// Iterate over fields matching a specific tag, in record order
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |field| field.tag == tag)
    }

    /// Iterate over all fields in record order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Get the data of the first control field with a given tag
    #[must_use]
    pub fn control_field(&self, tag: &str) -> Option<&str> {
        self.get_field(tag).and_then(|field| field.data.as_deref())
    }

    /// Number of fields in the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for fluently constructing MARC records
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Append a field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Create a new data field with no subfields
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            data: None,
            subfields: SmallVec::new(),
        }
    }

    /// Create a control field holding fixed-length data
    #[must_use]
    pub fn control(tag: impl Into<String>, data: impl Into<String>) -> Self {
        Field {
            tag: tag.into(),
            indicator1: ' ',
            indicator2: ' ',
            data: Some(data.into()),
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for a data field
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Whether the field holds fixed-length data rather than subfields
    #[must_use]
    pub fn is_control_field(&self) -> bool {
        self.data.is_some()
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Get the first subfield value with a given code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over all values for a subfield code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Subfield codes in field order, e.g. `"ad74"`
    #[must_use]
    pub fn subfield_codes(&self) -> String {
        self.subfields.iter().map(|sf| sf.code).collect()
    }
}

/// Builder for data fields
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Append a subfield
    #[must_use]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Append a subfield when a value is present
    #[must_use]
    pub fn subfield_opt(mut self, code: char, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.field.add_subfield(code, value);
        }
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}

/// Whether a tag denotes a control field (`001`–`009`)
#[must_use]
pub fn is_control_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.starts_with("00") && tag.bytes().all(|b| b.is_ascii_digit())
}

fn compare_tags(left: &str, right: &str) -> Ordering {
    let numeric = |tag: &str| tag.bytes().all(|b| b.is_ascii_digit());
    match (numeric(left), numeric(right)) {
        (true, true) => left.cmp(right),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(record: &Record) -> Vec<&str> {
        record.fields().map(|f| f.tag.as_str()).collect()
    }

    #[test]
    fn test_add_field_keeps_insertion_order() {
        let mut record = Record::new(Leader::default());
        record.add_field(Field::new("245", '1', '0'));
        record.add_field(Field::control("001", "x"));
        assert_eq!(tags(&record), vec!["245", "001"]);
    }

    #[test]
    fn test_ordered_insertion_sorts_by_tag() {
        let mut record = Record::new(Leader::default());
        record.add_ordered_field(Field::new("100", '1', ' '));
        record.add_ordered_field(Field::control("008", "x"));
        record.add_ordered_field(Field::new("OWN", ' ', ' '));
        record.add_ordered_field(Field::control("001", "y"));
        record.add_ordered_field(Field::new("995", ' ', ' '));
        assert_eq!(tags(&record), vec!["001", "008", "100", "995", "OWN"]);
    }

    #[test]
    fn test_ordered_insertion_is_stable_for_equal_tags() {
        let mut record = Record::new(Leader::default());
        for name in ["first", "second", "third"] {
            record.add_ordered_field(Field::builder("700", '1', ' ').subfield('a', name).build());
        }
        record.add_ordered_field(Field::new("245", '1', '0'));
        let names: Vec<_> = record
            .fields_by_tag("700")
            .filter_map(|f| f.get_subfield('a'))
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(record.fields().next().map(|f| f.tag.as_str()), Some("245"));
    }

    #[test]
    fn test_get_field_returns_first_occurrence() {
        let record = Record::builder(Leader::default())
            .field(Field::builder("264", ' ', '1').subfield('a', "Praha:").build())
            .field(Field::builder("264", ' ', '1').subfield('a', "Roma:").build())
            .build();
        assert_eq!(
            record.get_field("264").and_then(|f| f.get_subfield('a')),
            Some("Praha:")
        );
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_subfield_opt_skips_absent_values() {
        let field = Field::builder("100", '1', ' ')
            .subfield('a', "Hašek, Jaroslav")
            .subfield_opt('d', None::<String>)
            .subfield_opt('7', Some("jk01040000"))
            .build();
        assert_eq!(field.subfield_codes(), "a7");
    }

    #[test]
    fn test_control_tags() {
        assert!(is_control_tag("001"));
        assert!(is_control_tag("008"));
        assert!(!is_control_tag("010"));
        assert!(!is_control_tag("OWN"));
    }
}
