//! Column mapping for raw sales exports.
//!
//! Raw transaction exports carry 11 columns, two of which are unused
//! placeholders. Instead of renaming columns by position and hoping the file
//! matches, every field is mapped to a column index up front and the mapping
//! is validated before any row is read.

use std::collections::HashMap;

use crate::domain::{RawRow, RawTable};
use crate::error::DataError;

/// Canonical column names of the fixed 11-column export, in order.
pub const RAW_SALES_COLUMNS: [&str; 11] = [
    "del1",
    "type",
    "date",
    "inv_num",
    "item_name",
    "customer",
    "item_description",
    "quantity",
    "price",
    "amount",
    "del2",
];

/// The nine meaningful fields of a raw sales record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesField {
    Type,
    Date,
    InvoiceNumber,
    ItemName,
    Customer,
    ItemDescription,
    Quantity,
    Price,
    Amount,
}

impl SalesField {
    pub const ALL: [SalesField; 9] = [
        SalesField::Type,
        SalesField::Date,
        SalesField::InvoiceNumber,
        SalesField::ItemName,
        SalesField::Customer,
        SalesField::ItemDescription,
        SalesField::Quantity,
        SalesField::Price,
        SalesField::Amount,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            SalesField::Type => "type",
            SalesField::Date => "date",
            SalesField::InvoiceNumber => "inv_num",
            SalesField::ItemName => "item_name",
            SalesField::Customer => "customer",
            SalesField::ItemDescription => "item_description",
            SalesField::Quantity => "quantity",
            SalesField::Price => "price",
            SalesField::Amount => "amount",
        }
    }

    /// Accepted header spellings, already normalized.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            SalesField::Type => &["type", "transaction type"],
            SalesField::Date => &["date", "transaction date"],
            SalesField::InvoiceNumber => &["inv num", "num", "invoice", "invoice number", "invoice num"],
            SalesField::ItemName => &["item name", "item", "product"],
            SalesField::Customer => &["customer", "name", "customer name"],
            SalesField::ItemDescription => &["item description", "description", "memo", "memo description"],
            SalesField::Quantity => &["quantity", "qty"],
            SalesField::Price => &["price", "sales price", "unit price"],
            SalesField::Amount => &["amount", "total"],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Resolved column index for every [`SalesField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSchema {
    columns: [usize; 9],
}

impl SalesSchema {
    /// The fixed export order (`RAW_SALES_COLUMNS`).
    ///
    /// Fails unless the table has exactly 11 columns.
    pub fn positional(table: &RawTable) -> Result<Self, DataError> {
        let found = table.column_count();
        if found != RAW_SALES_COLUMNS.len() {
            return Err(DataError::format(format!(
                "positional sales layout expects {} columns ({}), found {found}",
                RAW_SALES_COLUMNS.len(),
                RAW_SALES_COLUMNS.join(", "),
            )));
        }

        let mut columns = [0usize; 9];
        for field in SalesField::ALL {
            columns[field.slot()] = RAW_SALES_COLUMNS
                .iter()
                .position(|name| *name == field.name())
                .ok_or_else(|| DataError::format(format!("no positional column for `{}`", field.name())))?;
        }
        Ok(Self { columns })
    }

    /// Resolve fields by header name (case-insensitive, common aliases).
    ///
    /// Every missing field is reported in a single error.
    pub fn from_headers(table: &RawTable) -> Result<Self, DataError> {
        let header_map = build_header_map(&table.headers);

        let mut columns = [0usize; 9];
        let mut missing = Vec::new();
        for field in SalesField::ALL {
            match field.aliases().iter().find_map(|alias| header_map.get(*alias)) {
                Some(&idx) => columns[field.slot()] = idx,
                None => missing.push(format!("`{}`", field.name())),
            }
        }

        if !missing.is_empty() {
            return Err(DataError::format(format!(
                "missing sales column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self { columns })
    }

    pub fn column(&self, field: SalesField) -> usize {
        self.columns[field.slot()]
    }

    /// The field's value in `row`, or `None` when missing.
    pub fn get<'a>(&self, row: &'a RawRow, field: SalesField) -> Option<&'a str> {
        row.cell(self.column(field))
    }

    /// Number of the nine fields that are present in `row`.
    pub fn present_count(&self, row: &RawRow) -> usize {
        SalesField::ALL
            .iter()
            .filter(|field| self.get(row, **field).is_some())
            .count()
    }
}

/// First occurrence wins when a header name repeats.
fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional_table() -> RawTable {
        RawTable::from_rows(
            RAW_SALES_COLUMNS,
            vec![vec![
                "", "Invoice", "03/15/2021", "1001", "Wine", "Acme", "ABC123 Wine Red", "2", "10.5", "21", "",
            ]],
        )
    }

    #[test]
    fn positional_maps_fixed_order() {
        let table = positional_table();
        let schema = SalesSchema::positional(&table).unwrap();
        let row = &table.rows[0];
        assert_eq!(schema.get(row, SalesField::Date), Some("03/15/2021"));
        assert_eq!(schema.get(row, SalesField::Customer), Some("Acme"));
        assert_eq!(schema.get(row, SalesField::Price), Some("10.5"));
        assert_eq!(schema.present_count(row), 9);
    }

    #[test]
    fn positional_rejects_wrong_column_count() {
        let table = RawTable::from_rows(["a", "b", "c"], Vec::<Vec<&str>>::new());
        let err = SalesSchema::positional(&table).unwrap_err();
        assert!(matches!(err, DataError::Format(_)));
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn headers_resolve_aliases_in_any_order() {
        let table = RawTable::from_rows(
            [
                "\u{feff}Qty", "Sales Price", "Amount", "Memo", "Name", "Item", "Num", "Date", "Type",
            ],
            vec![vec!["4", "9.99", "39.96", "XYZ9 Rose", "Bob", "Rose", "7", "01/02/2020", "Invoice"]],
        );
        let schema = SalesSchema::from_headers(&table).unwrap();
        let row = &table.rows[0];
        assert_eq!(schema.column(SalesField::Quantity), 0);
        assert_eq!(schema.get(row, SalesField::ItemDescription), Some("XYZ9 Rose"));
        assert_eq!(schema.get(row, SalesField::Type), Some("Invoice"));
    }

    #[test]
    fn headers_report_every_missing_field() {
        let table = RawTable::from_rows(["date", "customer", "item_description"], Vec::<Vec<&str>>::new());
        let err = SalesSchema::from_headers(&table).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("`quantity`"));
        assert!(msg.contains("`price`"));
        assert!(!msg.contains("`date`"));
    }
}
