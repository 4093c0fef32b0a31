//! Batch driver: one pass over the dataset, streaming records to the writer.

use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

use crate::assembler::{RecordAssembler, RecordKind};
use crate::authority::{AuthorityResolver, AuthorityTable, KnownTranslations};
use crate::config::Settings;
use crate::error::{ConvertError, RowError};
use crate::source::{Dataset, RecordNumber};
use crate::writer::MarcWriter;

/// Where a skipped row sits in the intake sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocation {
    /// A row identified by its record number
    Record(RecordNumber),
    /// A row without a usable record number, identified by its CSV line
    Line(u64),
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLocation::Record(number) => write!(f, "record {number}"),
            RowLocation::Line(line) => write!(f, "line {line}"),
        }
    }
}

/// A row that produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Where the row sits in the intake sheet
    pub location: RowLocation,
    /// Why the row was skipped
    pub error: RowError,
}

impl SkippedRow {
    /// Record number of the row, if it had a usable one.
    #[must_use]
    pub fn number(&self) -> Option<RecordNumber> {
        match self.location {
            RowLocation::Record(number) => Some(number),
            RowLocation::Line(_) => None,
        }
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank rows read, including those set aside at load time
    pub rows_read: usize,
    /// Records written to the output
    pub records_written: usize,
    /// Records written per kind
    pub by_kind: BTreeMap<RecordKind, usize>,
    /// Rows reported and skipped: load-time rejections first, then the
    /// remaining rows in dataset order
    pub skipped: Vec<SkippedRow>,
}

impl RunSummary {
    /// Whether every row produced a record.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} records written",
            self.rows_read, self.records_written
        )?;
        for (kind, count) in &self.by_kind {
            write!(f, ", {count} {kind}")?;
        }
        write!(f, ", {} skipped", self.skipped.len())?;
        for skipped in &self.skipped {
            write!(f, "\n  {}: {}", skipped.location, skipped.error)?;
        }
        Ok(())
    }
}

/// Convert every row of `dataset`, writing records as they are built.
///
/// Row-level errors are logged and collected in the summary; the pass
/// continues with the next row.
///
/// # Errors
///
/// Returns an error on write failure or when identifier minting is exhausted.
pub fn run<W: Write>(
    dataset: &Dataset,
    resolver: &mut AuthorityResolver,
    cataloged_on: NaiveDate,
    writer: &mut MarcWriter<W>,
) -> Result<RunSummary, ConvertError> {
    let assembler = RecordAssembler::new(dataset, cataloged_on);
    let mut summary = RunSummary {
        rows_read: dataset.len() + dataset.rejected().len(),
        ..RunSummary::default()
    };

    for rejected in dataset.rejected() {
        warn!(line = rejected.line, "row skipped: {}", rejected.error);
        summary.skipped.push(SkippedRow {
            location: RowLocation::Line(rejected.line),
            error: rejected.error.clone(),
        });
    }

    for row in dataset.rows() {
        match assembler.assemble(row, resolver) {
            Ok((kind, record)) => {
                writer.write_record(&record)?;
                summary.records_written += 1;
                *summary.by_kind.entry(kind).or_default() += 1;
            },
            Err(ConvertError::Row(error)) => {
                warn!(record = %row.number, "row skipped: {error}");
                summary.skipped.push(SkippedRow {
                    location: RowLocation::Record(row.number),
                    error,
                });
            },
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

/// Load every input named by `settings`, convert, and write the output file.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, the output cannot
/// be written, or identifier minting is exhausted.
pub fn convert(settings: &Settings) -> Result<RunSummary, ConvertError> {
    let dataset = Dataset::from_path(&settings.input)?;
    info!(rows = dataset.len(), path = %settings.input.display(), "dataset loaded");

    let table = AuthorityTable::from_path(&settings.authority)?;
    info!(codes = table.len(), path = %settings.authority.display(), "authority table loaded");

    let known = KnownTranslations::from_path(&settings.reference)?;
    info!(works = known.len(), path = %settings.reference.display(), "reference catalog loaded");

    let mut resolver = AuthorityResolver::new(table, known)
        .with_retry_limit(settings.identifier_retry_limit);
    if let Some(seed) = settings.seed {
        resolver = resolver.with_seed(seed);
    }

    let mut writer = MarcWriter::new(BufWriter::new(File::create(&settings.output)?));
    let summary = run(&dataset, &mut resolver, Local::now().date_naive(), &mut writer)?;
    writer.finish()?;

    info!(
        records = summary.records_written,
        skipped = summary.skipped.len(),
        path = %settings.output.display(),
        "conversion finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRow;

    #[test]
    fn test_run_reports_and_continues() {
        let rows = vec![
            SourceRow {
                record_type: Some("kniha".to_string()),
                title: Some("Il processo".to_string()),
                ..SourceRow::new(1)
            },
            SourceRow {
                record_type: Some("rozhlas".to_string()),
                title: Some("Radio".to_string()),
                ..SourceRow::new(2)
            },
            SourceRow {
                record_type: Some("článek v časopise".to_string()),
                title: Some("Racconto".to_string()),
                year: Some("1968.5".to_string()),
                ..SourceRow::new(3)
            },
            SourceRow {
                record_type: Some("článek v časopise".to_string()),
                title: Some("Poesia".to_string()),
                ..SourceRow::new(4)
            },
        ];
        let dataset = Dataset::from_rows(rows);
        let mut resolver =
            AuthorityResolver::new(AuthorityTable::default(), KnownTranslations::default());
        let mut buffer = Vec::new();
        let mut writer = MarcWriter::new(&mut buffer);
        let cataloged_on = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let summary = run(&dataset, &mut resolver, cataloged_on, &mut writer).unwrap();
        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.records_written, 2);
        assert_eq!(writer.records_written(), 2);
        assert_eq!(summary.by_kind.get(&RecordKind::Book), Some(&1));
        assert_eq!(summary.by_kind.get(&RecordKind::Article), Some(&1));
        let skipped: Vec<_> = summary.skipped.iter().filter_map(SkippedRow::number).collect();
        assert_eq!(skipped, vec![RecordNumber(2), RecordNumber(3)]);
        assert!(!summary.is_clean());

        let report = summary.to_string();
        assert!(report.starts_with("4 rows read, 2 records written, 1 book, 1 article, 2 skipped"));
        assert!(report.contains("record 2: unclassified record type 'rozhlas'"));
    }

    #[test]
    fn test_rejected_rows_reported_by_line() {
        let csv = "Číslo záznamu,Typ záznamu,Název díla dle titulu (v příslušném písmu)\n\
                   1,kniha,Uno\n\
                   2a,kniha,Due\n\
                   3,kniha,Tre\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let mut resolver =
            AuthorityResolver::new(AuthorityTable::default(), KnownTranslations::default());
        let mut buffer = Vec::new();
        let mut writer = MarcWriter::new(&mut buffer);
        let cataloged_on = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let summary = run(&dataset, &mut resolver, cataloged_on, &mut writer).unwrap();
        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].location, RowLocation::Line(3));
        assert_eq!(summary.skipped[0].number(), None);
        assert!(summary
            .to_string()
            .contains("line 3: invalid number in column 'Číslo záznamu': '2a'"));
    }
}
