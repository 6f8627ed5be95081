//! Command-line parsing for the sales data-preparation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the cleaning/reshaping/plotting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::SchemaMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesprep", version, about = "Sales and temperature data preparation")]
pub struct Cli {
    /// Log level for diagnostics on stderr (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean a raw sales export down to the target items.
    Clean(CleanArgs),
    /// Reshape a wide year-by-month temperature table into a monthly series.
    Temperature(TemperatureArgs),
    /// Plot monthly quantities of cleaned sales as a grid of panels.
    Plot(PlotArgs),
}

/// Options for `salesprep clean`.
#[derive(Debug, Parser, Clone)]
pub struct CleanArgs {
    /// Raw sales CSV.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Target item code (repeatable).
    #[arg(long = "item", value_name = "CODE")]
    pub items: Vec<String>,

    /// File with one target item code per line.
    #[arg(long, value_name = "FILE")]
    pub items_file: Option<PathBuf>,

    /// Map columns by the fixed 11-column order instead of header names.
    #[arg(long)]
    pub positional: bool,

    /// Input has no header row (implies --positional).
    #[arg(long)]
    pub no_headers: bool,

    /// Write the cleaned CSV here instead of stdout.
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

impl CleanArgs {
    pub fn schema_mode(&self) -> SchemaMode {
        if self.positional || self.no_headers {
            SchemaMode::Positional
        } else {
            SchemaMode::Headers
        }
    }
}

/// Options for `salesprep temperature`.
#[derive(Debug, Parser, Clone)]
pub struct TemperatureArgs {
    /// Temperature CSV with a `Year` column followed by `Jan`..`Dec`.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Name of the value column in the output.
    #[arg(short, long, value_name = "NAME")]
    pub column: String,

    /// Sort records by date instead of month-major traversal order.
    #[arg(long)]
    pub chronological: bool,

    /// Write the long-format CSV here instead of stdout.
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for `salesprep plot`.
#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Cleaned sales CSV produced by `salesprep clean`.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Item code of a panel (repeatable, in panel order).
    #[arg(long = "code", value_name = "CODE", required = true)]
    pub codes: Vec<String>,

    /// Display name of a panel (one per --code).
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Style token of a panel, e.g. `r-`, `bo--`, `g:` (one per --code).
    ///
    /// Pass a bare line token as `--style=--`.
    #[arg(long = "style", value_name = "TOKEN", allow_hyphen_values = true)]
    pub styles: Vec<String>,

    /// Write the grid as an SVG image.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// SVG width in pixels.
    #[arg(long, default_value_t = 2000)]
    pub svg_width: u32,

    /// SVG height in pixels.
    #[arg(long, default_value_t = 2500)]
    pub svg_height: u32,

    /// Print the grid as text (default when no --svg is given).
    #[arg(long)]
    pub ascii: bool,

    /// Panel width (columns) for the text grid.
    #[arg(long, default_value_t = 48)]
    pub width: usize,

    /// Panel height (rows) for the text grid.
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}
