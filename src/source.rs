// File: src/source.rs
//! Reading the tabular sources.
//!
//! Both sources are delimited text whose delimiter is `;` when the first line
//! contains one and `,` otherwise. Fields follow the usual CSV quoting rules.

use crate::error::{DeckError, Result};
use csv_core::ReadFieldResult;
use log::debug;
use std::fs;
use std::path::Path;

/// A parsed row: one string per column, untrimmed.
pub type Row = Vec<String>;

/// Picks the delimiter from the header line.
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Splits delimited text into rows. Blank lines produce no rows.
pub fn parse_rows(text: &str, delimiter: u8) -> Vec<Row> {
    let mut rdr = csv_core::ReaderBuilder::new().delimiter(delimiter).build();
    let mut input = text.as_bytes();
    let mut field = vec![0u8; 1024];
    let mut field_len = 0;
    let mut record = Row::new();
    let mut rows = Vec::new();

    loop {
        let (result, nin, nout) = rdr.read_field(input, &mut field[field_len..]);
        input = &input[nin..];
        field_len += nout;
        match result {
            ReadFieldResult::InputEmpty => {}
            ReadFieldResult::OutputFull => {
                let grown = field.len() * 2;
                field.resize(grown, 0);
            }
            ReadFieldResult::Field { record_end } => {
                record.push(String::from_utf8_lossy(&field[..field_len]).into_owned());
                field_len = 0;
                if record_end {
                    rows.push(std::mem::take(&mut record));
                }
            }
            ReadFieldResult::End => break,
        }
    }
    rows
}

/// Parses a whole source, detecting its delimiter from the first line.
pub fn parse_source(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_line = text.lines().next().unwrap_or("");
    parse_rows(text, detect_delimiter(first_line))
}

/// Reads and parses a source file.
pub fn read_source(path: &Path) -> Result<Vec<Row>> {
    if !path.exists() {
        return Err(DeckError::MissingSource(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let rows = parse_source(&text);
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
