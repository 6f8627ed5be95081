//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the stderr log subscriber
//! - turns arguments into config structs
//! - runs one of the prep/plot pipelines
//! - writes data to a file or stdout and summaries to stderr

use std::fs;
use std::path::Path;

use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{CleanArgs, Command, PlotArgs, TemperatureArgs};
use crate::domain::{CleanConfig, PlotConfig, SalesSchema, SchemaMode, TargetItems, TemperatureConfig};
use crate::error::AppError;
use crate::plot::{AsciiGridRenderer, GridRenderer, SvgGridRenderer};

/// Entry point for the `salesprep` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Temperature(args) => handle_temperature(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn init_logging(log_level: &str) -> Result<(), AppError> {
    let level = match log_level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(AppError::new(2, format!("Unknown log level '{other}'."))),
    };

    // Stdout carries CSV output, so diagnostics go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::new(2, format!("Failed to install logger: {e}")))
}

fn handle_clean(args: CleanArgs) -> Result<(), AppError> {
    let config = clean_config_from_args(&args)?;

    let table = crate::io::load_raw_table(&config.input, config.has_headers)?;
    let schema = match config.schema_mode {
        SchemaMode::Positional => SalesSchema::positional(&table)?,
        SchemaMode::Headers => SalesSchema::from_headers(&table)?,
    };
    let outcome = crate::prep::clean_sales_with_stats(&table, &schema, &config.targets)?;

    crate::io::with_output(config.output.as_deref(), |out| {
        crate::io::write_cleaned_sales(out, &outcome.sales)
    })?;
    eprint!("{}", crate::report::format_clean_summary(&outcome, &config.targets));

    if let Some(path) = &config.output {
        info!(path = %path.display(), rows = outcome.sales.len(), "wrote cleaned sales");
    }
    Ok(())
}

fn handle_temperature(args: TemperatureArgs) -> Result<(), AppError> {
    let config = temperature_config_from_args(&args);

    let wide = crate::io::load_temperature_table(&config.input)?;
    let mut long = crate::prep::reshape_temperature(&wide, &config.value_column)?;
    if config.chronological {
        long.sort_chronologically();
    }

    crate::io::with_output(config.output.as_deref(), |out| {
        crate::io::write_monthly_temperature(out, &long)
    })?;
    eprint!("{}", crate::report::format_temperature_summary(&long));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = plot_config_from_args(&args);

    let sales = crate::io::load_cleaned_sales(&config.input)?;
    let observations = crate::prep::monthly_quantities(&sales)?;
    let grid = crate::plot::build_item_grid(
        &observations,
        config.item_codes.as_slice(),
        config.item_names.as_slice(),
        config.style_tokens.as_slice(),
    )?;
    eprint!("{}", crate::report::format_grid_summary(&grid));

    if let Some(path) = &config.svg {
        let written = SvgGridRenderer::new(path, config.svg_width, config.svg_height).render(&grid)?;
        info!(path = %written.display(), "wrote SVG grid");
    }
    if config.ascii {
        let text = AsciiGridRenderer::new(config.width, config.height).render(&grid)?;
        print!("{text}");
    }
    Ok(())
}

pub fn clean_config_from_args(args: &CleanArgs) -> Result<CleanConfig, AppError> {
    let mut codes = args.items.clone();
    if let Some(path) = &args.items_file {
        codes.extend(read_items_file(path)?);
    }
    let targets = TargetItems::new(codes)?;

    Ok(CleanConfig {
        input: args.input.clone(),
        has_headers: !args.no_headers,
        schema_mode: args.schema_mode(),
        targets,
        output: args.output.clone(),
    })
}

pub fn temperature_config_from_args(args: &TemperatureArgs) -> TemperatureConfig {
    TemperatureConfig {
        input: args.input.clone(),
        value_column: args.column.clone(),
        chronological: args.chronological,
        output: args.output.clone(),
    }
}

/// Names default to the codes and styles to the palette's solid line, so
/// `--code` alone is enough for a quick look.
pub fn plot_config_from_args(args: &PlotArgs) -> PlotConfig {
    let item_names = if args.names.is_empty() {
        args.codes.clone()
    } else {
        args.names.clone()
    };
    let style_tokens = if args.styles.is_empty() {
        vec![String::new(); args.codes.len()]
    } else {
        args.styles.clone()
    };

    PlotConfig {
        input: args.input.clone(),
        item_codes: args.codes.clone(),
        item_names,
        style_tokens,
        svg: args.svg.clone(),
        svg_width: args.svg_width,
        svg_height: args.svg_height,
        ascii: args.ascii || args.svg.is_none(),
        width: args.width,
        height: args.height,
    }
}

/// One item code per line; blank lines and `#` comments are skipped.
fn read_items_file(path: &Path) -> Result<Vec<String>, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read items file '{}': {e}", path.display())))?;
    let codes = parse_item_lines(&text);
    debug!(path = %path.display(), count = codes.len(), "loaded target items");
    Ok(codes)
}

fn parse_item_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
