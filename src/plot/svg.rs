//! Plotters-powered SVG rendering of the item grid.
//!
//! The renderer is data-driven: panels, series, bounds and labels all come
//! from the `ItemGrid`, so this module only maps them onto Plotters
//! primitives. One drawing area per grid cell, split evenly.

use std::path::PathBuf;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::error::DataError;
use crate::plot::{GridRenderer, ItemGrid, LineStyle, Marker, Panel, date_to_x, format_year_month, panel_bounds};

/// Series colors for panels whose style token has no color.
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// Writes the grid to an SVG file and returns its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgGridRenderer {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl SvgGridRenderer {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

impl GridRenderer for SvgGridRenderer {
    type Output = PathBuf;

    fn render(&self, grid: &ItemGrid) -> Result<PathBuf, DataError> {
        if self.width < 100 || self.height < 100 {
            return Err(DataError::render(format!(
                "SVG size {}x{} is too small",
                self.width, self.height
            )));
        }

        let root = SVGBackend::new(&self.path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let areas = root.split_evenly((grid.rows, grid.cols));
        for (idx, panel) in grid.panels.iter().enumerate() {
            let area = areas
                .get(panel.row * grid.cols + panel.col)
                .ok_or_else(|| DataError::render(format!("panel '{}' is outside the grid", panel.title)))?;
            draw_panel(area, panel, idx)?;
        }

        root.present().map_err(render_error)?;
        Ok(self.path.clone())
    }
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel, idx: usize) -> Result<(), DataError> {
    let Some(([x0, x1], [y0, y1])) = panel_bounds(panel) else {
        // Items without observations still get their cell and title.
        let inner = area.titled(&panel.title, ("sans-serif", 18)).map_err(render_error)?;
        inner
            .draw_text("no data", &("sans-serif", 14).into_font().color(&BLACK), (20, 20))
            .map_err(render_error)?;
        return Ok(());
    };

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format_year_month(*v))
        .draw()
        .map_err(render_error)?;

    let color = series_color(panel, idx);
    let stroke = color.stroke_width(2);

    for segment in finite_segments(panel) {
        match panel.style.line {
            LineStyle::Solid => {
                chart
                    .draw_series(LineSeries::new(segment.iter().copied(), stroke))
                    .map_err(render_error)?;
            }
            LineStyle::Dashed => {
                chart
                    .draw_series(DashedLineSeries::new(segment.iter().copied(), 8, 5, stroke))
                    .map_err(render_error)?;
            }
            LineStyle::Dotted => {
                chart
                    .draw_series(DashedLineSeries::new(segment.iter().copied(), 2, 4, stroke))
                    .map_err(render_error)?;
            }
            LineStyle::DashDot => {
                chart
                    .draw_series(DashedLineSeries::new(segment.iter().copied(), 10, 4, stroke))
                    .map_err(render_error)?;
            }
            LineStyle::None => {}
        }
    }

    let Some(marker) = panel.style.marker else {
        return Ok(());
    };
    let points: Vec<(f64, f64)> = finite_segments(panel).into_iter().flatten().collect();
    let fill = color.filled();
    match marker {
        Marker::Point => {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 2, fill)))
                .map_err(render_error)?;
        }
        Marker::Circle => {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 4, fill)))
                .map_err(render_error)?;
        }
        Marker::Cross | Marker::Plus | Marker::Star => {
            chart
                .draw_series(points.iter().map(|&p| Cross::new(p, 4, stroke)))
                .map_err(render_error)?;
        }
        Marker::TriangleUp | Marker::TriangleDown => {
            chart
                .draw_series(points.iter().map(|&p| TriangleMarker::new(p, 5, fill)))
                .map_err(render_error)?;
        }
        Marker::Square | Marker::Diamond => {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], fill)),
                )
                .map_err(render_error)?;
        }
    }

    Ok(())
}

fn series_color(panel: &Panel, idx: usize) -> RGBColor {
    match panel.style.color {
        Some(color) => {
            let (r, g, b) = color.rgb();
            RGBColor(r, g, b)
        }
        None => PALETTE[idx % PALETTE.len()],
    }
}

/// Runs of consecutive finite points; a missing quantity breaks the line.
fn finite_segments(panel: &Panel) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for &(date, y) in &panel.points {
        if y.is_finite() {
            current.push((date_to_x(date), y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn render_error<E: std::fmt::Display>(err: E) -> DataError {
    DataError::render(err.to_string())
}
