//! Shared domain types.
//!
//! These types are intentionally plain so they can be:
//!
//! - produced by CSV ingest and consumed by the transformations
//! - exported back to CSV
//! - handed to the plot renderers without conversion

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A data row as read from a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source file (for error messages).
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// Cell value, trimmed. Empty cells and cells past the end of a short row
    /// are missing.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

/// An untyped, in-memory table: header names plus string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from literal rows; line numbers assume a header line.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| RawRow::new(idx + 2, cells.into_iter().map(Into::into).collect()))
            .collect();
        Self { headers, rows }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The caller-selected item codes an analysis is restricted to.
///
/// Never empty. Codes are trimmed and de-duplicated; first-seen order is kept
/// for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetItems {
    ordered: Vec<String>,
    lookup: HashSet<String>,
}

impl TargetItems {
    pub fn new<I, S>(items: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for item in items {
            let code = item.as_ref().trim();
            if code.is_empty() {
                continue;
            }
            if lookup.insert(code.to_string()) {
                ordered.push(code.to_string());
            }
        }

        if ordered.is_empty() {
            return Err(DataError::value("target item set must not be empty"));
        }
        Ok(Self { ordered, lookup })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup.contains(code)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

/// One retained sales transaction.
///
/// Field order is the exported column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedSale {
    pub quantity: f32,
    pub price: f32,
    pub item_code: String,
    /// Calendar month, 1-12.
    pub month: u32,
    pub year: i32,
}

impl CleanedSale {
    /// First day of the sale's month, if `year`/`month` form a valid date.
    pub fn period_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// A labeled row of a wide table (label + one cell per period column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// Wide-format temperature table: a `Year` row carrying the year of each
/// column, then one row per month abbreviation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideTemperatureTable {
    pub rows: Vec<LabeledRow>,
}

impl WideTemperatureTable {
    pub fn new(rows: Vec<LabeledRow>) -> Self {
        Self { rows }
    }

    pub fn from_rows<L, R, C>(rows: R) -> Self
    where
        L: Into<String>,
        R: IntoIterator<Item = (L, C)>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|(label, cells)| LabeledRow {
                label: label.into(),
                cells: cells.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { rows }
    }
}

/// One long-format temperature observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTemperature {
    /// First day of the observed month.
    pub date: NaiveDate,
    pub value: f64,
}

/// Long-format temperature series with a caller-chosen value column name.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTemperatureTable {
    pub value_column: String,
    pub records: Vec<MonthlyTemperature>,
}

impl MonthlyTemperatureTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reorder records by date. Equal dates keep their relative order.
    pub fn sort_chronologically(&mut self) {
        self.records.sort_by_key(|r| r.date);
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

/// A `(item, month, quantity)` observation, the input shape of the item grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemObservation {
    pub item_code: String,
    pub date: NaiveDate,
    pub quantity: f64,
}

/// How raw sales columns are mapped onto sales fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// Resolve columns by header name.
    Headers,
    /// Use the fixed 11-column export order.
    Positional,
}

/// Configuration for `salesprep clean`, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub input: PathBuf,
    pub has_headers: bool,
    pub schema_mode: SchemaMode,
    pub targets: TargetItems,
    pub output: Option<PathBuf>,
}

/// Configuration for `salesprep temperature`.
#[derive(Debug, Clone)]
pub struct TemperatureConfig {
    pub input: PathBuf,
    pub value_column: String,
    pub chronological: bool,
    pub output: Option<PathBuf>,
}

/// Configuration for `salesprep plot`.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub input: PathBuf,
    pub item_codes: Vec<String>,
    pub item_names: Vec<String>,
    pub style_tokens: Vec<String>,
    pub svg: Option<PathBuf>,
    pub svg_width: u32,
    pub svg_height: u32,
    pub ascii: bool,
    pub width: usize,
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_items_trim_and_dedup() {
        let items = TargetItems::new([" ABC123 ", "XYZ", "ABC123", ""]).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.contains("ABC123"));
        assert_eq!(items.iter().collect::<Vec<_>>(), vec!["ABC123", "XYZ"]);
    }

    #[test]
    fn empty_target_items_are_rejected() {
        let err = TargetItems::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, DataError::Value(_)));
        assert!(TargetItems::new(["  "]).is_err());
    }

    #[test]
    fn raw_row_treats_blank_cells_as_missing() {
        let row = RawRow::new(2, vec!["a".into(), "  ".into()]);
        assert_eq!(row.cell(0), Some("a"));
        assert_eq!(row.cell(1), None);
        assert_eq!(row.cell(5), None);
    }

    #[test]
    fn chronological_sort_orders_by_date() {
        let d = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        let mut table = MonthlyTemperatureTable {
            value_column: "t".into(),
            records: vec![
                MonthlyTemperature { date: d(2001, 1), value: 2.0 },
                MonthlyTemperature { date: d(2000, 2), value: 3.0 },
                MonthlyTemperature { date: d(2000, 1), value: 1.0 },
            ],
        };
        table.sort_chronologically();
        let values: Vec<f64> = table.records.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 2.0]);
        assert_eq!(table.date_range(), Some((d(2000, 1), d(2001, 1))));
    }
}
