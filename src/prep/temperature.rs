//! Wide-to-long reshaping of monthly temperature tables.
//!
//! Input rows are labeled `Year` (the year of each column) or with a
//! three-letter English month abbreviation. Output is one record per
//! (month row, year column) cell, built in a single pass.
//!
//! Records come out in traversal order: all years of the first month row,
//! then all years of the next one. That is not chronological; call
//! `MonthlyTemperatureTable::sort_chronologically` when it matters.

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{LabeledRow, MonthlyTemperature, MonthlyTemperatureTable, WideTemperatureTable};
use crate::error::DataError;

/// Label of the row holding the column years.
pub const YEAR_ROW_LABEL: &str = "Year";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month number (1-12) of an English three-letter abbreviation.
pub fn month_number(label: &str) -> Option<u32> {
    let label = label.trim();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| abbr.eq_ignore_ascii_case(label))
        .map(|idx| idx as u32 + 1)
}

/// Reshape a wide month-by-year table into a long monthly series whose value
/// column is named `value_column`.
pub fn reshape_temperature(table: &WideTemperatureTable, value_column: &str) -> Result<MonthlyTemperatureTable, DataError> {
    let value_column = value_column.trim();
    if value_column.is_empty() {
        return Err(DataError::value("value column name must not be empty"));
    }

    let year_row = table
        .rows
        .iter()
        .find(|row| is_year_row(row))
        .ok_or_else(|| DataError::format(format!("temperature table has no `{YEAR_ROW_LABEL}` row")))?;
    let years = year_row
        .cells
        .iter()
        .enumerate()
        .map(|(col, raw)| parse_year(raw, col))
        .collect::<Result<Vec<_>, _>>()?;

    let month_rows = table.rows.iter().filter(|row| !is_year_row(row));
    let mut records = Vec::with_capacity(years.len() * table.rows.len().saturating_sub(1));

    for row in month_rows {
        let month = month_number(&row.label)
            .ok_or_else(|| DataError::value(format!("unrecognized month label '{}'", row.label)))?;

        if row.cells.len() != years.len() {
            return Err(DataError::format(format!(
                "row '{}' has {} value(s) but there are {} year column(s)",
                row.label,
                row.cells.len(),
                years.len()
            )));
        }

        for (raw, &year) in row.cells.iter().zip(&years) {
            let date = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| DataError::value(format!("year {year} is out of range")))?;
            let value = parse_reading(raw, &row.label, year)?;
            records.push(MonthlyTemperature { date, value });
        }
    }

    info!(records = records.len(), years = years.len(), "reshaped temperature table");

    Ok(MonthlyTemperatureTable {
        value_column: value_column.to_string(),
        records,
    })
}

fn is_year_row(row: &LabeledRow) -> bool {
    row.label.trim().eq_ignore_ascii_case(YEAR_ROW_LABEL)
}

/// Years may come through as integral floats (`2000.0`) from spreadsheets.
fn parse_year(raw: &str, col: usize) -> Result<i32, DataError> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Ok(v as i32),
        _ => Err(DataError::value(format!(
            "year column {} has a non-integer year '{raw}'",
            col + 1
        ))),
    }
}

/// Empty cells are missing readings (`NaN`); anything else must be numeric.
fn parse_reading(raw: &str, label: &str, year: i32) -> Result<f64, DataError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .map_err(|_| DataError::value(format!("{label} {year}: reading '{raw}' is not numeric")))
}
