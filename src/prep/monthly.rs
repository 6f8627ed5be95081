//! Monthly aggregation of cleaned sales into plot-ready observations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{CleanedSale, ItemObservation};
use crate::error::DataError;

/// Total quantity per item and month, sorted by item code then date.
///
/// Missing (`NaN`) quantities are skipped; a month whose quantities are all
/// missing totals to zero.
pub fn monthly_quantities(sales: &[CleanedSale]) -> Result<Vec<ItemObservation>, DataError> {
    let mut totals: BTreeMap<(&str, NaiveDate), f64> = BTreeMap::new();
    for sale in sales {
        let date = sale.period_start().ok_or_else(|| {
            DataError::value(format!(
                "item {}: invalid month/year {}/{}",
                sale.item_code, sale.month, sale.year
            ))
        })?;
        let total = totals.entry((sale.item_code.as_str(), date)).or_insert(0.0);
        if !sale.quantity.is_nan() {
            *total += f64::from(sale.quantity);
        }
    }

    Ok(totals
        .into_iter()
        .map(|((item_code, date), quantity)| ItemObservation {
            item_code: item_code.to_string(),
            date,
            quantity,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(code: &str, quantity: f32, month: u32, year: i32) -> CleanedSale {
        CleanedSale {
            quantity,
            price: 1.0,
            item_code: code.to_string(),
            month,
            year,
        }
    }

    #[test]
    fn sums_per_item_and_month_in_order() {
        let sales = vec![
            sale("B", 1.0, 2, 2021),
            sale("A", 2.0, 3, 2021),
            sale("A", 3.0, 1, 2021),
            sale("A", 4.0, 3, 2021),
            sale("A", f32::NAN, 1, 2021),
        ];
        let obs = monthly_quantities(&sales).unwrap();
        let d = |m| NaiveDate::from_ymd_opt(2021, m, 1).unwrap();
        let got: Vec<(&str, NaiveDate, f64)> = obs
            .iter()
            .map(|o| (o.item_code.as_str(), o.date, o.quantity))
            .collect();
        assert_eq!(got, vec![("A", d(1), 3.0), ("A", d(3), 6.0), ("B", d(2), 1.0)]);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let err = monthly_quantities(&[sale("A", 1.0, 13, 2021)]).unwrap_err();
        assert!(matches!(err, DataError::Value(_)));
    }
}
