//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - untyped input tables (`RawTable`, `WideTemperatureTable`)
//! - the sales column mapping (`SalesSchema`)
//! - typed outputs (`CleanedSale`, `MonthlyTemperatureTable`, `ItemObservation`)
//! - per-command configuration structs

pub mod schema;
pub mod types;

pub use schema::*;
pub use types::*;
