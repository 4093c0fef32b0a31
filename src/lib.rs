#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Library overview
//!
//! Each spreadsheet row becomes one MARC21 bibliographic record. The
//! pipeline runs leaf to root:
//!
//! 1. [`source`] loads the CSV export into a [`Dataset`] with a record-number
//!    index for book/part linkage.
//! 2. [`authority`] resolves author dates and original-work identifiers,
//!    minting identifiers the prior catalog does not know.
//! 3. [`fields`] formats the individual MARC fields from cleaned cells,
//!    using the small grammars in [`parse`].
//! 4. [`assembler`] picks the record shape (book, part of book, article)
//!    and stitches the fields together.
//! 5. [`driver`] runs the whole dataset through the assembler and streams
//!    the records to a [`MarcWriter`].
//!
//! ## Building a record by hand
//!
//! ```
//! use bibmarc::authority::{AuthorityResolver, AuthorityTable, KnownTranslations};
//! use bibmarc::{Dataset, RecordAssembler, RecordKind, SourceRow};
//! use chrono::NaiveDate;
//!
//! let row = SourceRow {
//!     record_type: Some("kniha".to_string()),
//!     author: Some("Dante, Alighieri (jk01234567)".to_string()),
//!     title: Some("Inferno: Canto primo".to_string()),
//!     year: Some("1472".to_string()),
//!     imprint: Some("Roma (Itálie): Nuovo editore".to_string()),
//!     ..SourceRow::new(42)
//! };
//! let dataset = Dataset::from_rows(vec![row]);
//! let mut resolver = AuthorityResolver::new(AuthorityTable::default(), KnownTranslations::default());
//! let cataloged_on = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//!
//! let assembler = RecordAssembler::new(&dataset, cataloged_on);
//! let (kind, record) = assembler.assemble(&dataset.rows()[0], &mut resolver)?;
//!
//! assert_eq!(kind, RecordKind::Book);
//! assert_eq!(record.control_field("001"), Some("it22000042"));
//! assert_eq!(record.get_field("264").and_then(|f| f.get_subfield('b')), Some("Nuovo editore,"));
//! # Ok::<(), bibmarc::ConvertError>(())
//! ```
//!
//! ## Modules
//!
//! - [`record`]: Core MARC record structures (`Record`, `Field`, `Subfield`)
//! - [`leader`]: MARC record leader (24-byte header)
//! - [`reader`]: Reading ISO 2709 records, used for the reference catalog
//! - [`writer`]: Writing ISO 2709 records
//! - [`source`]: Spreadsheet rows and the dataset
//! - [`parse`]: Grammars of the free-text cells
//! - [`authority`]: Authority table, known translations, identifier minting
//! - [`fields`]: One formatter per MARC field family
//! - [`assembler`]: Record shapes per record type
//! - [`driver`]: Batch conversion and run summary
//! - [`config`]: Layered run settings
//! - [`error`]: Error types and result type

pub mod assembler;
pub mod authority;
pub mod config;
pub mod driver;
pub mod error;
pub mod fields;
pub mod leader;
pub mod parse;
pub mod reader;
pub mod record;
pub mod source;
pub mod writer;

pub use assembler::{RecordAssembler, RecordKind};
pub use config::{Overrides, Settings};
pub use driver::{convert, run, RowLocation, RunSummary, SkippedRow};
pub use error::{ConvertError, MarcError, Result, RowError};
pub use leader::Leader;
pub use reader::MarcReader;
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use source::{Dataset, RecordNumber, SourceRow};
pub use writer::MarcWriter;
