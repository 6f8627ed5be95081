//! Export cleaned tables to CSV.
//!
//! Outputs are meant to be easy to consume in spreadsheets, notebooks or
//! downstream scripts. Writers are generic so the CLI can target a file or
//! stdout and tests can target a buffer.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::domain::{CleanedSale, MonthlyTemperatureTable};
use crate::error::AppError;

/// Write cleaned sales (`quantity,price,item_code,month,year`).
pub fn write_cleaned_sales<W: Write>(writer: W, sales: &[CleanedSale]) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    if sales.is_empty() {
        // `serialize` only emits the header with the first record.
        out.write_record(["quantity", "price", "item_code", "month", "year"])
            .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    }
    for sale in sales {
        out.serialize(sale)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV output: {e}")))?;
    Ok(())
}

/// Write a long temperature series (`date,<value column>`), dates as ISO.
pub fn write_monthly_temperature<W: Write>(writer: W, table: &MonthlyTemperatureTable) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["date", table.value_column.as_str()])
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;
    for record in &table.records {
        out.write_record([record.date.format("%Y-%m-%d").to_string(), record.value.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush CSV output: {e}")))?;
    Ok(())
}

/// Run `write` against `path`, or stdout when no path is given.
pub fn with_output<F>(path: Option<&Path>, write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), AppError>,
{
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
            write(&mut file)
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonthlyTemperature;
    use chrono::NaiveDate;

    #[test]
    fn cleaned_sales_csv_layout() {
        let sales = vec![CleanedSale {
            quantity: 2.0,
            price: 10.5,
            item_code: "ABC123".to_string(),
            month: 3,
            year: 2021,
        }];
        let mut buf = Vec::new();
        write_cleaned_sales(&mut buf, &sales).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "quantity,price,item_code,month,year\n2.0,10.5,ABC123,3,2021\n");
    }

    #[test]
    fn empty_cleaned_sales_still_get_a_header() {
        let mut buf = Vec::new();
        write_cleaned_sales(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "quantity,price,item_code,month,year\n");
    }

    #[test]
    fn temperature_csv_uses_value_column_name() {
        let table = MonthlyTemperatureTable {
            value_column: "avg_temp".to_string(),
            records: vec![MonthlyTemperature {
                date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                value: 10.5,
            }],
        };
        let mut buf = Vec::new();
        write_monthly_temperature(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "date,avg_temp\n2000-01-01,10.5\n");
    }
}
