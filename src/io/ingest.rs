//! CSV ingest.
//!
//! This module only turns bytes into untyped tables (or, for previously
//! cleaned exports, typed records). All cleaning and reshaping lives in
//! `prep`, so the transformations stay testable on in-memory data.
//!
//! Design goals:
//! - **Lenient framing**: ragged rows are kept; missing trailing cells are
//!   treated as missing values.
//! - **Strict failures**: a malformed CSV record aborts the read with its
//!   line number.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{CleanedSale, LabeledRow, RawRow, RawTable, WideTemperatureTable};
use crate::error::{AppError, DataError};

/// Read a CSV table from any reader.
///
/// When `has_headers` is false, column names `column_1..column_n` are
/// generated from the widest row.
pub fn read_raw_table<R: Read>(reader: R, has_headers: bool) -> Result<RawTable, DataError> {
    let input = read_all(reader)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_slice());

    let mut headers: Vec<String> = if has_headers {
        reader
            .headers()
            .map_err(|e| DataError::format(format!("failed to read CSV headers: {e}")))?
            .iter()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::format(format!("CSV parse error: {e}")))?;
        let line = physical_line(&input, &record);
        rows.push(RawRow::new(line, record.iter().map(str::to_string).collect()));
    }

    if !has_headers {
        let width = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        headers = (1..=width).map(|i| format!("column_{i}")).collect();
    }

    debug!(rows = rows.len(), columns = headers.len(), "read raw table");
    Ok(RawTable::new(headers, rows))
}

/// Open `path` and read it as a raw table.
pub fn load_raw_table(path: &Path, has_headers: bool) -> Result<RawTable, AppError> {
    let file = open(path)?;
    Ok(read_raw_table(file, has_headers)?)
}

/// Read a temperature CSV (header `Year,Jan,...,Dec`, one line per year)
/// into its wide month-by-year form.
///
/// Each header becomes a labeled row and each data line becomes a year
/// column, so the `Year` row lists the years in file order.
pub fn read_temperature_table<R: Read>(reader: R) -> Result<WideTemperatureTable, DataError> {
    let table = read_raw_table(reader, true)?;

    let mut rows = Vec::with_capacity(table.headers.len());
    for (col, label) in table.headers.iter().enumerate() {
        let label = label.trim().trim_start_matches('\u{feff}');
        if label.is_empty() {
            return Err(DataError::format(format!(
                "temperature CSV has an unnamed column at position {}",
                col + 1
            )));
        }
        let cells = table
            .rows
            .iter()
            .map(|row| row.cell(col).unwrap_or_default().to_string())
            .collect();
        rows.push(LabeledRow {
            label: label.to_string(),
            cells,
        });
    }

    Ok(WideTemperatureTable::new(rows))
}

pub fn load_temperature_table(path: &Path) -> Result<WideTemperatureTable, AppError> {
    let file = open(path)?;
    Ok(read_temperature_table(file)?)
}

/// Read a cleaned-sales CSV as written by `write_cleaned_sales`.
pub fn read_cleaned_sales<R: Read>(reader: R) -> Result<Vec<CleanedSale>, DataError> {
    let input = read_all(reader)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| DataError::format(format!("failed to read CSV headers: {e}")))?
        .clone();

    let mut sales = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::format(format!("CSV parse error: {e}")))?;
        let sale = record.deserialize::<CleanedSale>(Some(&headers)).map_err(|e| {
            DataError::format(format!(
                "invalid cleaned-sales record at line {}: {e}",
                physical_line(&input, &record)
            ))
        })?;
        sales.push(sale);
    }
    Ok(sales)
}

pub fn load_cleaned_sales(path: &Path) -> Result<Vec<CleanedSale>, AppError> {
    let file = open(path)?;
    Ok(read_cleaned_sales(file)?)
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>, DataError> {
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .map_err(|e| DataError::format(format!("failed to read CSV input: {e}")))?;
    Ok(input)
}

/// 1-based line of `record` in `input`, counting blank lines the parser skipped.
///
/// A record's position may point at blank lines preceding it, so the start
/// is moved past line terminators before counting.
fn physical_line(input: &[u8], record: &StringRecord) -> usize {
    let Some(pos) = record.position() else {
        return 0;
    };
    let mut start = (pos.byte() as usize).min(input.len());
    while start < input.len() && matches!(input[start], b'\n' | b'\r') {
        start += 1;
    }
    1 + input[..start].iter().filter(|&&b| b == b'\n').count()
}
