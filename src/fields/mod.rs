//! Field formatters, one per MARC field family.
//!
//! Formatters take cleaned row values and return finished [`Field`]s with
//! their tag, indicators, and subfields in catalog order. They never touch
//! a record; the assembler decides which ones apply and inserts the results.
//!
//! | Tag | Formatter |
//! |---|---|
//! | 001, 003, 008 | [`control_number`], [`control_number_identifier`], [`fixed_length_data`] |
//! | 020, 040, 041 | [`isbn`], [`cataloging_source`], [`languages`] |
//! | 100 | [`main_entry`] |
//! | 240, 595 | [`uniform_title`], [`original_work`] |
//! | 245 | [`title_statement`] |
//! | 264 | [`publication`] |
//! | 300, 998 | [`extent`], [`source_note`] |
//! | 700 | [`translators`] |
//! | 773, 995 | [`host_item`], [`collective_work`], [`part_of_book`] |
//! | 910, 964, OWN | [`holdings`] |
//!
//! [`Field`]: crate::Field

mod author;
mod contributors;
mod control;
mod imprint;
mod linkage;
mod notes;
mod original;
mod title;

pub use author::main_entry;
pub use contributors::{translator_names, translators};
pub use control::{
    control_number, control_number_identifier, country_code, fixed_length_data,
    CONTROL_NUMBER_IDENTIFIER,
};
pub use imprint::publication;
pub use linkage::{collective_work, host_item, part_of_book, LINKAGE_TAG};
pub use notes::{
    cataloging_source, extent, holdings, isbn, languages, source_note, CATALOGING_AGENCY,
};
pub use original::{original_work, uniform_title};
pub use title::{non_filing_count, responsibility_statement, title_statement};
