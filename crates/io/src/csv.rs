// CSV import

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use benefits_recon::RawTable;

use crate::error::IoError;

/// Decode an uploaded text payload.
///
/// A byte-order mark selects UTF-8 or UTF-16 (and is stripped); without one
/// the bytes must be valid UTF-8.
pub fn decode_text<'a>(file: &str, bytes: &'a [u8]) -> Result<Cow<'a, str>, IoError> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| IoError::Encoding {
            file: file.to_string(),
        })
}

/// Parse comma-delimited text. The first record is the header row; rows may
/// be shorter or longer than the header.
pub fn parse(file: &str, content: &str) -> Result<RawTable, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let csv_err = |e: csv::Error| IoError::Csv {
        file: file.to_string(),
        message: e.to_string(),
    };

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => {
            return Err(IoError::NoHeader {
                file: file.to_string(),
            })
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_err)?;
        // Blank lines come through as a single empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

pub fn read(file: &str, bytes: &[u8]) -> Result<RawTable, IoError> {
    let content = decode_text(file, bytes)?;
    parse(file, &content)
}
