//! Intake data: the spreadsheet rows the records are synthesized from.
//!
//! - [`SourceRow`]: one cleaned bibliographic entry
//! - [`Dataset`]: all rows plus the [`LinkageIndex`] used for book/part linkage
//! - [`columns`]: CSV header names, the external schema of the intake sheet

mod dataset;
mod row;

pub use dataset::{Dataset, LinkageIndex, RejectedRow};
pub use row::{columns, RecordNumber, SourceRow};
