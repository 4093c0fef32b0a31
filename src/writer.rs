//! Writing MARC records to binary format.
//!
//! This module provides [`MarcWriter`] for serializing [`Record`] instances
//! to ISO 2709 binary format on any destination implementing [`std::io::Write`].
//! Fields are written in record order; the directory mirrors that order.
//!
//! # Examples
//!
//! ```
//! use bibmarc::{Field, Leader, MarcWriter, Record};
//!
//! let mut record = Record::new(Leader::default());
//! record.add_field(Field::control("001", "it22000001"));
//!
//! let mut buffer = Vec::new();
//! {
//!     let mut writer = MarcWriter::new(&mut buffer);
//!     writer.write_record(&record)?;
//!     writer.finish()?;
//! }
//! assert_eq!(&buffer[0..5], b"00049");
//! # Ok::<(), bibmarc::MarcError>(())
//! ```

use crate::error::{MarcError, Result};
use crate::record::Record;
use std::io::Write;

const FIELD_TERMINATOR: u8 = 0x1E;
const SUBFIELD_DELIMITER: u8 = 0x1F;
const RECORD_TERMINATOR: u8 = 0x1D;

/// Writer for ISO 2709 binary MARC format.
#[derive(Debug)]
pub struct MarcWriter<W: Write> {
    writer: W,
    records_written: usize,
    finished: bool,
}

impl<W: Write> MarcWriter<W> {
    /// Create a new MARC writer.
    pub fn new(writer: W) -> Self {
        MarcWriter {
            writer,
            records_written: 0,
            finished: false,
        }
    }

    /// Write a single MARC record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The writer was already finished
    /// - A tag is not exactly three bytes, or the record exceeds ISO 2709 limits
    /// - An I/O error occurs during writing
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.finished {
            return Err(MarcError::InvalidRecord(
                "Cannot write to a finished writer".to_string(),
            ));
        }

        let mut data_area = Vec::new();
        let mut directory = Vec::new();

        for field in record.fields() {
            if field.tag.len() != 3 {
                return Err(MarcError::InvalidField(format!(
                    "Tag '{}' must be 3 bytes",
                    field.tag
                )));
            }

            let start = data_area.len();
            if let Some(data) = &field.data {
                data_area.extend_from_slice(data.as_bytes());
            } else {
                push_char(&mut data_area, field.indicator1);
                push_char(&mut data_area, field.indicator2);
                for subfield in &field.subfields {
                    data_area.push(SUBFIELD_DELIMITER);
                    push_char(&mut data_area, subfield.code);
                    data_area.extend_from_slice(subfield.value.as_bytes());
                }
            }
            data_area.push(FIELD_TERMINATOR);

            let field_length = data_area.len() - start;
            if field_length > 9999 || start > 99_999 {
                return Err(MarcError::InvalidField(format!(
                    "Field {} does not fit the directory",
                    field.tag
                )));
            }
            directory.extend_from_slice(field.tag.as_bytes());
            directory.extend_from_slice(format!("{field_length:04}").as_bytes());
            directory.extend_from_slice(format!("{start:05}").as_bytes());
        }
        directory.push(FIELD_TERMINATOR);

        let base_address = 24 + directory.len();
        let record_length = base_address + data_area.len() + 1;

        let mut leader = record.leader.clone();
        leader.record_length = u32::try_from(record_length)
            .map_err(|_| MarcError::InvalidRecord("Record length exceeds limit".to_string()))?;
        leader.data_base_address = u32::try_from(base_address)
            .map_err(|_| MarcError::InvalidRecord("Base address exceeds limit".to_string()))?;

        self.writer.write_all(&leader.as_bytes()?)?;
        self.writer.write_all(&directory)?;
        self.writer.write_all(&data_area)?;
        self.writer.write_all(&[RECORD_TERMINATOR])?;

        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

fn push_char(buffer: &mut Vec<u8>, c: char) {
    let mut utf8 = [0u8; 4];
    buffer.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
}
