//! Reading MARC records from binary streams.
//!
//! This module provides [`MarcReader`] for reading ISO 2709 formatted MARC records
//! from any source that implements [`std::io::Read`]. The converter uses it to scan
//! the prior translations catalog.
//!
//! Each record is read in full (its leader announces the length) before it is
//! parsed, so an error inside one record's directory or fields leaves the stream
//! positioned at the next record. Only leader, truncation, and I/O errors
//! desynchronize the stream.
//!
//! # Examples
//!
//! ```
//! use bibmarc::MarcReader;
//! use std::io::Cursor;
//!
//! let mut reader = MarcReader::new(Cursor::new(Vec::new()));
//! assert!(reader.read_record()?.is_none());
//! # Ok::<(), bibmarc::MarcError>(())
//! ```

use crate::error::{MarcError, Result};
use crate::leader::Leader;
use crate::record::{is_control_tag, Field, Record};
use std::io::Read;

const FIELD_TERMINATOR: u8 = 0x1E;
const SUBFIELD_DELIMITER: u8 = 0x1F;

/// Reader for ISO 2709 binary MARC format.
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    reader: R,
    records_read: usize,
}

impl<R: Read> MarcReader<R> {
    /// Create a new MARC reader.
    pub fn new(reader: R) -> Self {
        MarcReader {
            reader,
            records_read: 0,
        }
    }

    /// Read a single MARC record.
    ///
    /// Returns `Ok(Some(record))` if a record was successfully read, `Ok(None)` at
    /// end of input, or `Err` if a parsing error occurred.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The leader is malformed or the record is truncated
    /// - The directory or a field of the record is malformed
    /// - An I/O error occurs
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut leader_bytes = [0u8; 24];
        match self.reader.read_exact(&mut leader_bytes) {
            Ok(()) => {},
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(MarcError::IoError(e)),
        }

        let leader = Leader::from_bytes(&leader_bytes)?;
        leader.validate_for_reading()?;

        let record_length = leader.record_length as usize;
        let base_address = leader.data_base_address as usize;

        let mut record_data = vec![0u8; record_length - 24];
        match self.reader.read_exact(&mut record_data) {
            Ok(()) => {},
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(MarcError::TruncatedRecord(
                    "Unexpected end of file while reading record data".to_string(),
                ));
            },
            Err(e) => return Err(MarcError::IoError(e)),
        }
        self.records_read += 1;

        let (directory, data) = record_data.split_at(base_address - 24);
        let mut record = Record::new(leader);

        // Directory entries are 12 bytes: tag(3) + length(4) + start position(5)
        for entry in directory.chunks(12) {
            if entry[0] == FIELD_TERMINATOR {
                break;
            }
            if entry.len() < 12 {
                return Err(MarcError::InvalidRecord(
                    "Incomplete directory entry".to_string(),
                ));
            }

            let tag = String::from_utf8_lossy(&entry[0..3]).to_string();
            let field_length = parse_digits(&entry[3..7])?;
            let start_position = parse_digits(&entry[7..12])?;
            let end_position = start_position + field_length;
            if end_position > data.len() {
                return Err(MarcError::InvalidRecord(format!(
                    "Field {tag} exceeds data area"
                )));
            }

            let field_data = &data[start_position..end_position];
            if is_control_tag(&tag) {
                let value = field_data.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(field_data);
                record.add_field(Field::control(tag, String::from_utf8_lossy(value)));
            } else {
                let field = parse_data_field(field_data, &tag)
                    .map_err(|e| MarcError::InvalidField(format!("Tag {tag}: {e}")))?;
                record.add_field(field);
            }
        }

        Ok(Some(record))
    }

    /// Number of records read so far, including records that failed to parse.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }
}

/// Parse a data field from raw bytes
fn parse_data_field(data: &[u8], tag: &str) -> Result<Field> {
    if data.len() < 2 {
        return Err(MarcError::InvalidField(
            "Data field too short (needs indicators)".to_string(),
        ));
    }

    let mut field = Field::new(tag, data[0] as char, data[1] as char);
    let body = &data[2..];
    let body = body.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(body);
    if body.is_empty() {
        return Ok(field);
    }
    if body[0] != SUBFIELD_DELIMITER {
        return Err(MarcError::InvalidField(
            "Expected subfield delimiter".to_string(),
        ));
    }

    for chunk in body[1..].split(|&b| b == SUBFIELD_DELIMITER) {
        if let Some((&code, value)) = chunk.split_first() {
            field.add_subfield(code as char, String::from_utf8_lossy(value));
        }
    }

    Ok(field)
}

/// Parse an ASCII decimal number from bytes
fn parse_digits(bytes: &[u8]) -> Result<usize> {
    let mut result = 0usize;
    for &byte in bytes {
        if byte.is_ascii_digit() {
            result = result * 10 + (byte - b'0') as usize;
        } else {
            return Err(MarcError::InvalidRecord(format!(
                "Invalid numeric field: expected digits, got byte {}",
                byte as char
            )));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RECORD_TERMINATOR: u8 = 0x1D;

    /// Manually build a record holding one 595 field
    fn build_595_record(title: &str) -> Vec<u8> {
        let mut field_595 = Vec::new();
        field_595.extend_from_slice(b"12");
        field_595.push(SUBFIELD_DELIMITER);
        field_595.push(b'a');
        field_595.extend_from_slice("Čapek, Karel,".as_bytes());
        field_595.push(SUBFIELD_DELIMITER);
        field_595.push(b't');
        field_595.extend_from_slice(title.as_bytes());
        field_595.push(FIELD_TERMINATOR);

        let mut directory = Vec::new();
        directory.extend_from_slice(b"595");
        directory.extend_from_slice(format!("{:04}", field_595.len()).as_bytes());
        directory.extend_from_slice(b"00000");

        let base_address = 24 + directory.len() + 1;
        directory.push(FIELD_TERMINATOR);
        let record_length = base_address + field_595.len() + 1;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(format!("{record_length:05}").as_bytes());
        bytes.extend_from_slice(b"nam a22");
        bytes.extend_from_slice(format!("{base_address:05}").as_bytes());
        bytes.extend_from_slice(b"4i 4500");
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&field_595);
        bytes.push(RECORD_TERMINATOR);
        bytes
    }

    #[test]
    fn test_read_simple_record() {
        let mut reader = MarcReader::new(Cursor::new(build_595_record("R.U.R.")));
        let record = reader.read_record().unwrap().unwrap();

        assert_eq!(record.leader.bibliographic_level, 'm');
        let field = record.get_field("595").unwrap();
        assert_eq!(field.indicator1, '1');
        assert_eq!(field.indicator2, '2');
        assert_eq!(field.get_subfield('a'), Some("Čapek, Karel,"));
        assert_eq!(field.get_subfield('t'), Some("R.U.R."));
    }

    #[test]
    fn test_eof_returns_none() {
        let mut reader = MarcReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 0);
    }

    #[test]
    fn test_read_multiple_records() {
        let mut bytes = build_595_record("Krakatit");
        bytes.extend(build_595_record("Továrna na absolutno"));
        let mut reader = MarcReader::new(Cursor::new(bytes));

        assert!(reader.read_record().unwrap().is_some());
        let second = reader.read_record().unwrap().unwrap();
        assert_eq!(
            second.get_field("595").and_then(|f| f.get_subfield('t')),
            Some("Továrna na absolutno")
        );
        assert!(reader.read_record().unwrap().is_none());
        assert_eq!(reader.records_read(), 2);
    }

    #[test]
    fn test_malformed_field_does_not_desynchronize() {
        let mut broken = build_595_record("Krakatit");
        // Replace the first subfield delimiter with a plain letter
        let delimiter = broken.iter().position(|&b| b == SUBFIELD_DELIMITER).unwrap();
        broken[delimiter] = b'x';
        broken.extend(build_595_record("Bílá nemoc"));

        let mut reader = MarcReader::new(Cursor::new(broken));
        assert!(matches!(reader.read_record(), Err(MarcError::InvalidField(_))));
        let next = reader.read_record().unwrap().unwrap();
        assert_eq!(
            next.get_field("595").and_then(|f| f.get_subfield('t')),
            Some("Bílá nemoc")
        );
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = build_595_record("Krakatit");
        bytes.truncate(bytes.len() - 5);
        let mut reader = MarcReader::new(Cursor::new(bytes));
        assert!(matches!(
            reader.read_record(),
            Err(MarcError::TruncatedRecord(_))
        ));
    }

    #[test]
    fn test_malformed_leader_record_length_too_small() {
        let leader = b"00010nam a2200025 i 4500";
        let mut reader = MarcReader::new(Cursor::new(leader.to_vec()));
        let err = reader.read_record().unwrap_err().to_string();
        assert!(err.contains("Record length must be at least 24"), "got: {err}");
    }
}
