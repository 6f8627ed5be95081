//! Input/output helpers.
//!
//! - CSV ingest into raw tables (`ingest`)
//! - CSV exports of cleaned outputs (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
