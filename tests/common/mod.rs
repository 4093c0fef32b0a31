//! Common test helpers shared across the integration tests.

#![allow(dead_code)]

use bibmarc::source::columns;
use bibmarc::{Field, Leader, MarcReader, MarcWriter, Record, Settings};
use std::fs;
use std::path::{Path, PathBuf};

/// Header columns of the spreadsheet export, led by the unnamed index column.
pub const COLUMNS: [&str; 20] = [
    "",
    columns::RECORD_NUMBER,
    columns::RECORD_TYPE,
    columns::WORK_TYPE,
    columns::AUTHOR,
    columns::ORIGINAL_TITLE,
    columns::TRANSLATORS,
    columns::IMPRINT,
    columns::YEAR,
    columns::ISBN,
    columns::PAGES,
    columns::SOURCE_NOTE,
    columns::PARENT,
    columns::RESPONSIBILITY,
    columns::TITLE,
    columns::WORK_LANGUAGE,
    columns::SOURCE_LANGUAGE,
    columns::PIVOT_LANGUAGE,
    columns::JOURNAL_ISSUE,
    columns::MAGAZINE_TRANSLATORS,
];

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Spreadsheet CSV with one line per row; each row lists `(column, value)` cells.
pub fn spreadsheet(rows: &[&[(&str, &str)]]) -> String {
    let mut csv = COLUMNS.iter().map(|c| quote(c)).collect::<Vec<_>>().join(",");
    csv.push('\n');
    for (index, row) in rows.iter().enumerate() {
        let line: Vec<String> = COLUMNS
            .iter()
            .map(|column| {
                if column.is_empty() {
                    return index.to_string();
                }
                row.iter()
                    .find(|(name, _)| name == column)
                    .map_or_else(String::new, |(_, value)| quote(value))
            })
            .collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }
    csv
}

/// Prior catalog with one record per `(author, title, identifier)` 595 field.
pub fn reference_catalog(works: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut writer = MarcWriter::new(&mut buffer);
        for (number, (author, title, identifier)) in works.iter().enumerate() {
            let record = Record::builder(Leader::default())
                .field(Field::control("001", format!("it21{number:06}")))
                .field(
                    Field::builder("595", '1', '2')
                        .subfield('a', *author)
                        .subfield('t', *title)
                        .subfield('1', *identifier)
                        .build(),
                )
                .build();
            writer.write_record(&record).expect("write reference record");
        }
        writer.finish().expect("finish reference catalog");
    }
    buffer
}

/// Authority CSV from `(code, dates)` pairs.
pub fn authority_csv(entries: &[(&str, &str)]) -> String {
    let mut csv = String::from("nkc_id,cz_dates\n");
    for (code, dates) in entries {
        csv.push_str(&format!("{code},{dates}\n"));
    }
    csv
}

/// Input files of one run, laid out in a temporary directory.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new(spreadsheet: &str, authority: &str, reference: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("preklady.csv"), spreadsheet).expect("write spreadsheet");
        fs::write(dir.path().join("autority.csv"), authority).expect("write authority");
        fs::write(dir.path().join("katalog.mrc"), reference).expect("write reference");
        Workspace { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            input: self.path("preklady.csv"),
            output: self.path("preklady.mrc"),
            authority: self.path("autority.csv"),
            reference: self.path("katalog.mrc"),
            identifier_retry_limit: 100,
            log_level: "debug".to_string(),
            seed: Some(2022),
        }
    }
}

/// Read every record of an ISO 2709 file.
pub fn read_records(path: &Path) -> Vec<Record> {
    let mut reader = MarcReader::new(fs::File::open(path).expect("open output"));
    let mut records = Vec::new();
    while let Some(record) = reader.read_record().expect("read output record") {
        records.push(record);
    }
    records
}

/// The record with a given 001.
pub fn by_control_number<'a>(records: &'a [Record], number: &str) -> &'a Record {
    records
        .iter()
        .find(|record| record.control_field("001") == Some(number))
        .unwrap_or_else(|| panic!("no record {number}"))
}

/// First value of a subfield in the first field with a tag.
pub fn subfield<'a>(record: &'a Record, tag: &str, code: char) -> Option<&'a str> {
    record.get_field(tag).and_then(|field| field.get_subfield(code))
}
