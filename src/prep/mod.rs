//! Table transformations.
//!
//! - raw sales -> cleaned target-item sales (`sales`)
//! - wide temperature table -> long monthly series (`temperature`)
//! - cleaned sales -> monthly per-item totals for plotting (`monthly`)

pub mod monthly;
pub mod sales;
pub mod temperature;

pub use monthly::monthly_quantities;
pub use sales::{clean_sales, clean_sales_with_stats, CleanOutcome};
pub use temperature::reshape_temperature;
