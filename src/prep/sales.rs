//! Sales transaction cleaning.
//!
//! Turns a raw transaction export into `CleanedSale` rows restricted to the
//! target items. Rows are processed in a fixed order of steps:
//!
//! 1. drop sparse rows (fewer than `MIN_PRESENT_FIELDS` of the nine fields)
//! 2. drop sample shipments (customer contains "sample", any case)
//! 3. derive the item code from the description and keep target items only
//! 4. parse the date into month/year and the numbers into `f32`
//!
//! Steps 1-3 silently drop rows. Step 4 is fail-fast: a retained row with a
//! malformed date or number aborts the whole call.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::domain::{CleanedSale, RawRow, RawTable, SalesField, SalesSchema, TargetItems};
use crate::error::DataError;

/// Rows need at least this many non-missing fields to be considered.
pub const MIN_PRESENT_FIELDS: usize = 5;

/// Columns of the cleaned output (`quantity, price, item_code, month, year`).
pub const CLEANED_COLUMNS: usize = 5;

const SAMPLE_MARKER: &str = "sample";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Cleaned rows plus how many input rows each filter removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub sales: Vec<CleanedSale>,
    pub rows_read: usize,
    pub dropped_sparse: usize,
    pub dropped_samples: usize,
    pub dropped_non_target: usize,
}

impl CleanOutcome {
    /// `(rows, columns)` of the cleaned table.
    pub fn shape(&self) -> (usize, usize) {
        (self.sales.len(), CLEANED_COLUMNS)
    }
}

/// Clean `table` and keep only rows whose item code is in `targets`.
pub fn clean_sales(table: &RawTable, schema: &SalesSchema, targets: &TargetItems) -> Result<Vec<CleanedSale>, DataError> {
    Ok(clean_sales_with_stats(table, schema, targets)?.sales)
}

/// Same as [`clean_sales`], also reporting per-filter drop counts.
pub fn clean_sales_with_stats(
    table: &RawTable,
    schema: &SalesSchema,
    targets: &TargetItems,
) -> Result<CleanOutcome, DataError> {
    let mut sales = Vec::new();
    let mut dropped_sparse = 0usize;
    let mut dropped_samples = 0usize;
    let mut dropped_non_target = 0usize;

    for row in &table.rows {
        if schema.present_count(row) < MIN_PRESENT_FIELDS {
            dropped_sparse += 1;
            continue;
        }

        if schema.get(row, SalesField::Customer).is_some_and(is_sample_customer) {
            dropped_samples += 1;
            continue;
        }

        let Some(code) = schema.get(row, SalesField::ItemDescription).and_then(item_code) else {
            dropped_non_target += 1;
            continue;
        };
        if !targets.contains(code) {
            dropped_non_target += 1;
            continue;
        }

        sales.push(to_cleaned_sale(row, schema, code)?);
    }

    debug!(
        rows_read = table.row_count(),
        dropped_sparse,
        dropped_samples,
        dropped_non_target,
        "sales filters applied"
    );
    info!(rows = sales.len(), columns = CLEANED_COLUMNS, "final dataset shape");

    Ok(CleanOutcome {
        sales,
        rows_read: table.row_count(),
        dropped_sparse,
        dropped_samples,
        dropped_non_target,
    })
}

/// First whitespace-delimited token of an item description.
pub fn item_code(description: &str) -> Option<&str> {
    description.split_whitespace().next()
}

/// Whether a customer name marks a sample shipment.
pub fn is_sample_customer(customer: &str) -> bool {
    customer.to_lowercase().contains(SAMPLE_MARKER)
}

fn to_cleaned_sale(row: &RawRow, schema: &SalesSchema, code: &str) -> Result<CleanedSale, DataError> {
    let date = parse_sale_date(schema.get(row, SalesField::Date), row.line)?;
    let quantity = parse_f32(schema.get(row, SalesField::Quantity), SalesField::Quantity, row.line)?;
    let price = parse_f32(schema.get(row, SalesField::Price), SalesField::Price, row.line)?;

    Ok(CleanedSale {
        quantity,
        price,
        item_code: code.to_string(),
        month: date.month(),
        year: date.year(),
    })
}

fn parse_sale_date(raw: Option<&str>, line: usize) -> Result<NaiveDate, DataError> {
    let raw = raw.ok_or_else(|| DataError::format(format!("line {line}: missing transaction date")))?;
    let invalid = || DataError::format(format!("line {line}: invalid date '{raw}', expected MM/DD/YYYY"));

    // `%Y` alone would also take two-digit years.
    let year = raw.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Missing numbers become `NaN`; present but non-numeric values are errors.
fn parse_f32(raw: Option<&str>, field: SalesField, line: usize) -> Result<f32, DataError> {
    let Some(raw) = raw else {
        return Ok(f32::NAN);
    };
    raw.parse::<f32>().map_err(|_| {
        DataError::format(format!(
            "line {line}: `{}` value '{raw}' is not numeric",
            field.name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RAW_SALES_COLUMNS;

    fn row(date: &str, customer: &str, description: &str, qty: &str, price: &str) -> Vec<String> {
        [
            "", "Invoice", date, "1001", "Wine", customer, description, qty, price, "0", "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn table(rows: Vec<Vec<String>>) -> RawTable {
        RawTable::from_rows(RAW_SALES_COLUMNS, rows)
    }

    fn clean(rows: Vec<Vec<String>>, targets: &[&str]) -> Result<Vec<CleanedSale>, DataError> {
        let table = table(rows);
        let schema = SalesSchema::positional(&table)?;
        let targets = TargetItems::new(targets.iter().copied())?;
        clean_sales(&table, &schema, &targets)
    }

    #[test]
    fn retains_target_item_and_derives_month_year() {
        let sales = clean(
            vec![row("03/15/2021", "Acme Bar", "ABC123 Wine Red", "2", "10.5")],
            &["ABC123"],
        )
        .unwrap();
        assert_eq!(
            sales,
            vec![CleanedSale {
                quantity: 2.0,
                price: 10.5,
                item_code: "ABC123".to_string(),
                month: 3,
                year: 2021,
            }]
        );
    }

    #[test]
    fn drops_non_target_items() {
        let sales = clean(
            vec![row("03/15/2021", "Acme Bar", "ABC123 Wine Red", "2", "10.5")],
            &["XYZ"],
        )
        .unwrap();
        assert!(sales.is_empty());
    }

    #[test]
    fn excludes_sample_customers_in_any_case() {
        let sales = clean(
            vec![
                row("01/01/2021", "SAMPLE CO", "ABC123 Wine", "1", "1"),
                row("01/02/2021", "Wine Samples Ltd", "ABC123 Wine", "1", "1"),
                row("01/03/2021", "sample", "ABC123 Wine", "1", "1"),
                row("01/04/2021", "Corner Shop", "ABC123 Wine", "5", "1"),
            ],
            &["ABC123"],
        )
        .unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].quantity, 5.0);
    }

    #[test]
    fn no_leakage_of_non_target_items() {
        let targets = ["A1", "B2"];
        let sales = clean(
            vec![
                row("01/01/2021", "x", "A1 Red", "1", "1"),
                row("01/01/2021", "x", "C3 White", "1", "1"),
                row("01/01/2021", "x", "B2 Rose", "1", "1"),
                row("01/01/2021", "x", "A10 Red", "1", "1"),
                row("01/01/2021", "x", "", "1", "1"),
            ],
            &targets,
        )
        .unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales.iter().all(|s| targets.contains(&s.item_code.as_str())));
    }

    #[test]
    fn sparse_rows_are_dropped_before_validation() {
        // Only 4 of the 9 fields present: dropped even though the date is bad.
        let mut sparse = vec![String::new(); 11];
        sparse[2] = "not-a-date".into();
        sparse[5] = "Acme".into();
        sparse[6] = "ABC123 Wine".into();
        sparse[7] = "1".into();

        let table = table(vec![sparse, row("12/31/2020", "Acme", "ABC123 Wine", "3", "9")]);
        let schema = SalesSchema::positional(&table).unwrap();
        let targets = TargetItems::new(["ABC123"]).unwrap();
        let outcome = clean_sales_with_stats(&table, &schema, &targets).unwrap();

        assert_eq!(outcome.dropped_sparse, 1);
        assert_eq!(outcome.sales.len(), 1);
        assert_eq!((outcome.sales[0].month, outcome.sales[0].year), (12, 2020));
        assert_eq!(outcome.shape(), (1, CLEANED_COLUMNS));
    }

    #[test]
    fn missing_customer_is_not_a_sample() {
        let sales = clean(vec![row("02/01/2021", "", "ABC123 Wine", "1", "2")], &["ABC123"]).unwrap();
        assert_eq!(sales.len(), 1);
    }

    #[test]
    fn malformed_date_on_target_row_fails() {
        let err = clean(vec![row("2021-03-15", "Acme", "ABC123 Wine", "1", "1")], &["ABC123"]).unwrap_err();
        assert!(matches!(err, DataError::Format(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn two_digit_year_is_a_format_error() {
        for date in ["03/15/21", "03/15/021", "03/15/20211"] {
            let err = clean(vec![row(date, "Acme", "ABC123 Wine", "2", "1")], &["ABC123"]).unwrap_err();
            assert!(matches!(err, DataError::Format(_)), "{date}");
        }
    }

    #[test]
    fn date_errors_cite_the_source_line_after_blank_lines() {
        let csv = "del1,type,date,inv_num,item_name,customer,item_description,quantity,price,amount,del2\n\
                   ,Invoice,01/02/2021,1,Wine,Acme,ABC123 Wine,1,1,1,\n\
                   \n\
                   ,Invoice,bad,2,Wine,Acme,ABC123 Wine,1,1,1,\n";
        let table = crate::io::read_raw_table(csv.as_bytes(), true).unwrap();
        let schema = SalesSchema::from_headers(&table).unwrap();
        let targets = TargetItems::new(["ABC123"]).unwrap();
        let err = clean_sales(&table, &schema, &targets).unwrap_err();
        assert!(err.to_string().contains("line 4"), "{err}");
    }

    #[test]
    fn malformed_date_on_non_target_row_is_ignored() {
        let sales = clean(vec![row("garbage", "Acme", "XYZ Wine", "1", "1")], &["ABC123"]).unwrap();
        assert!(sales.is_empty());
    }

    #[test]
    fn non_numeric_quantity_fails_and_missing_price_is_nan() {
        let err = clean(vec![row("03/15/2021", "Acme", "ABC123 Wine", "two", "1")], &["ABC123"]).unwrap_err();
        assert!(err.to_string().contains("`quantity`"));

        let sales = clean(vec![row("03/15/2021", "Acme", "ABC123 Wine", "2", "")], &["ABC123"]).unwrap();
        assert!(sales[0].price.is_nan());
    }

    #[test]
    fn single_digit_month_and_day_parse() {
        let sales = clean(vec![row("3/5/2019", "Acme", "ABC123 Wine", "1", "1")], &["ABC123"]).unwrap();
        assert_eq!((sales[0].month, sales[0].year), (3, 2019));
    }

    #[test]
    fn cleaning_is_deterministic() {
        let rows = vec![
            row("03/15/2021", "Acme", "ABC123 Wine", "2", "10.5"),
            row("04/15/2021", "Shop", "XYZ9 Rose", "1", "8"),
            row("05/15/2021", "Sample Co", "ABC123 Wine", "6", "10.5"),
            row("06/15/2021", "Bar", "XYZ9 Rose", "4", "8"),
        ];
        let first = clean(rows.clone(), &["ABC123", "XYZ9"]).unwrap();
        let second = clean(rows, &["ABC123", "XYZ9"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn item_code_is_first_token() {
        assert_eq!(item_code("  ABC123   Wine Red"), Some("ABC123"));
        assert_eq!(item_code("   "), None);
    }
}
