//! Index of original-work identifiers assigned by the prior translations catalog.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ConvertError, MarcError};
use crate::reader::MarcReader;
use crate::record::Record;

/// Linking field of the prior catalog naming the Czech original.
pub const ORIGINAL_WORK_TAG: &str = "595";

/// Lookup key for a work: normalized author heading and title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkKey {
    author: String,
    title: String,
}

impl WorkKey {
    /// Build a key from an author heading and original title.
    ///
    /// Both are lowercased; one trailing period is dropped from the title.
    #[must_use]
    pub fn new(author: &str, title: &str) -> Self {
        let title = title.trim();
        WorkKey {
            author: author.trim().to_lowercase(),
            title: title.strip_suffix('.').unwrap_or(title).trim_end().to_lowercase(),
        }
    }
}

/// Known (author, work) → identifier pairs plus every identifier in use.
///
/// The identifier set includes identifiers whose 595 lacked an author or
/// title, so a minted identifier never repeats one already in the catalog.
#[derive(Debug, Default, Clone)]
pub struct KnownTranslations {
    works: HashMap<WorkKey, String>,
    identifiers: HashSet<String>,
}

impl KnownTranslations {
    /// Scan a prior catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened; see
    /// [`KnownTranslations::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Scan an ISO 2709 stream.
    ///
    /// Records with a malformed directory or field are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or when a leader or truncated record
    /// makes the rest of the stream unreadable.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConvertError> {
        let mut reader = MarcReader::new(reader);
        let mut known = KnownTranslations::default();
        loop {
            match reader.read_record() {
                Ok(Some(record)) => known.add_record(&record),
                Ok(None) => break,
                Err(e @ (MarcError::InvalidRecord(_) | MarcError::InvalidField(_))) => {
                    warn!(record = reader.records_read(), "skipping reference record: {e}");
                },
                Err(e) => return Err(e.into()),
            }
        }
        debug!(
            records = reader.records_read(),
            works = known.works.len(),
            identifiers = known.identifiers.len(),
            "reference catalog indexed"
        );
        Ok(known)
    }

    /// Index the first 595 field of a record.
    pub fn add_record(&mut self, record: &Record) {
        let Some(field) = record.get_field(ORIGINAL_WORK_TAG) else {
            return;
        };
        for identifier in field.subfields_by_code('1') {
            self.identifiers.insert(identifier.trim().to_string());
        }
        let (Some(author), Some(title), Some(identifier)) = (
            field.get_subfield('a'),
            field.get_subfield('t'),
            field.get_subfield('1'),
        ) else {
            return;
        };
        // Headings in the catalog end in punctuation: "Čapek, Karel,"
        let author = author.trim();
        let author = author
            .strip_suffix([',', '.', ';', ':'])
            .unwrap_or(author);
        self.works
            .entry(WorkKey::new(author, title))
            .or_insert_with(|| identifier.trim().to_string());
    }

    /// Identifier assigned to a work.
    #[must_use]
    pub fn lookup(&self, key: &WorkKey) -> Option<&str> {
        self.works.get(key).map(String::as_str)
    }

    /// Whether an identifier is already in use.
    #[must_use]
    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Claim an identifier. Returns `false` if it was already in use.
    pub fn reserve(&mut self, identifier: &str) -> bool {
        self.identifiers.insert(identifier.to_string())
    }

    /// Record a work under an identifier, claiming the identifier.
    ///
    /// An existing entry for the work is kept.
    pub fn insert(&mut self, key: WorkKey, identifier: String) {
        self.identifiers.insert(identifier.clone());
        self.works.entry(key).or_insert(identifier);
    }

    /// Number of indexed works.
    #[must_use]
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Whether no works are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::Field;
    use crate::writer::MarcWriter;

    fn catalog_record(author: Option<&str>, title: &str, identifier: &str) -> Record {
        let mut field = Field::new(ORIGINAL_WORK_TAG, '1', '2');
        if let Some(author) = author {
            field.add_subfield('a', author);
        }
        field.add_subfield('t', title);
        field.add_subfield('1', identifier);
        Record::builder(Leader::default())
            .field(Field::control("001", "it22000001"))
            .field(field)
            .build()
    }

    #[test]
    fn test_work_key_normalization() {
        assert_eq!(
            WorkKey::new("Čapek, Karel", "Válka s mloky."),
            WorkKey::new("čapek, karel", "VÁLKA S MLOKY")
        );
        assert_ne!(
            WorkKey::new("Čapek, Karel", "Válka s mloky"),
            WorkKey::new("Čapek, Josef", "Válka s mloky")
        );
    }

    #[test]
    fn test_add_record_strips_heading_punctuation() {
        let mut known = KnownTranslations::default();
        known.add_record(&catalog_record(Some("Čapek, Karel,"), "Krakatit.", "ubcjk012300"));
        assert_eq!(
            known.lookup(&WorkKey::new("Čapek, Karel", "Krakatit")),
            Some("ubcjk012300")
        );
        assert!(known.contains_identifier("ubcjk012300"));
    }

    #[test]
    fn test_identifier_without_author_is_reserved() {
        let mut known = KnownTranslations::default();
        known.add_record(&catalog_record(None, "Anonymní", "ubc00000000042"));
        assert!(known.is_empty());
        assert!(known.contains_identifier("ubc00000000042"));
        assert!(!known.reserve("ubc00000000042"));
    }

    #[test]
    fn test_first_entry_wins() {
        let mut known = KnownTranslations::default();
        known.add_record(&catalog_record(Some("Hrabal, Bohumil"), "Obsluhoval jsem", "first"));
        known.add_record(&catalog_record(Some("Hrabal, Bohumil"), "Obsluhoval jsem", "second"));
        let key = WorkKey::new("Hrabal, Bohumil", "Obsluhoval jsem");
        assert_eq!(known.lookup(&key), Some("first"));
        assert!(known.contains_identifier("second"));

        known.insert(key.clone(), "third".to_string());
        assert_eq!(known.lookup(&key), Some("first"));
        assert!(known.contains_identifier("third"));
    }

    #[test]
    fn test_from_reader_scans_catalog() {
        let mut buffer = Vec::new();
        {
            let mut writer = MarcWriter::new(&mut buffer);
            writer
                .write_record(&catalog_record(Some("Kundera, Milan."), "Žert", "ubcjk010001"))
                .unwrap();
            writer
                .write_record(&Record::builder(Leader::default()).build())
                .unwrap();
            writer.finish().unwrap();
        }
        let known = KnownTranslations::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(known.len(), 1);
        assert_eq!(
            known.lookup(&WorkKey::new("kundera, milan", "žert")),
            Some("ubcjk010001")
        );
    }
}
