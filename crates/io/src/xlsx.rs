// Excel (.xlsx) import

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::{Days, NaiveDate};

use benefits_recon::RawTable;

use crate::error::IoError;

/// Output layout for date cells, matching the canonical date form.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Day zero of the 1900 date system. Exact for every serial after February 1900.
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let date = excel_epoch()?.checked_add_days(Days::new(serial.floor() as u64))?;
    Some(date.format(DATE_FORMAT).to_string())
}

/// Render one cell the way it would read in the sheet.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{n}"),
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            serial_to_date(serial).unwrap_or_else(|| format!("{serial}"))
        }
    }
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|c| cell_text(c).trim().is_empty())
}

/// Read the first worksheet. The first non-empty row is the header row.
pub fn read(file: &str, bytes: &[u8]) -> Result<RawTable, IoError> {
    let sheet_err = |message: String| IoError::Spreadsheet {
        file: file.to_string(),
        message,
    };

    let mut workbook: Xlsx<Cursor<&[u8]>> =
        open_workbook_from_rs(Cursor::new(bytes)).map_err(|e: calamine::XlsxError| sheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| sheet_err("workbook has no worksheets".into()))?
        .map_err(|e| sheet_err(e.to_string()))?;

    let mut rows = range.rows().skip_while(|row| is_blank_row(row));
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| cell_text(c).trim().to_string()).collect(),
        None => {
            return Err(IoError::NoHeader {
                file: file.to_string(),
            })
        }
    };

    let body = rows
        .filter(|row| !is_blank_row(row))
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(RawTable::new(headers, body))
}
