//! `sales-prep` library crate.
//!
//! The binary (`salesprep`) is a thin wrapper around this library so that:
//!
//! - cleaning, reshaping and plotting are testable without spawning processes
//! - each step is usable on in-memory tables from other Rust code
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod prep;
pub mod report;
