//! Reporting utilities: run summaries for the terminal.

pub mod format;

pub use format::{format_clean_summary, format_grid_summary, format_temperature_summary};
