//! ASCII/Unicode rendering of the item grid for terminal output.
//!
//! This is intentionally "dumb" (fixed-size character cells), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each panel is a block of `height + 3` lines: title, y-axis label with
//! range, the plot area, x-axis label with the covered months. Panels of the
//! same grid row are placed side by side.

use crate::error::DataError;
use crate::plot::{GridRenderer, ItemGrid, LineStyle, Panel, date_to_x, format_year_month, panel_bounds};

const COLUMN_SEPARATOR: &str = " | ";

/// Text renderer; `width`/`height` size a single panel's plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiGridRenderer {
    pub width: usize,
    pub height: usize,
}

impl AsciiGridRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(10),
            height: height.max(3),
        }
    }
}

impl GridRenderer for AsciiGridRenderer {
    type Output = String;

    fn render(&self, grid: &ItemGrid) -> Result<String, DataError> {
        let block_height = self.height + 3;
        let blank = " ".repeat(self.width);
        let mut out = String::new();

        for row in 0..grid.rows {
            if row > 0 {
                out.push('\n');
            }
            let blocks: Vec<Vec<String>> = (0..grid.cols)
                .map(|col| match grid.panel_at(row, col) {
                    Some(panel) => render_panel(panel, self.width, self.height),
                    None => vec![blank.clone(); block_height],
                })
                .collect();

            for line in 0..block_height {
                let parts: Vec<&str> = blocks.iter().map(|b| b[line].as_str()).collect();
                out.push_str(&parts.join(COLUMN_SEPARATOR));
                out.push('\n');
            }
        }

        Ok(out)
    }
}

/// Render one panel as `height + 3` lines of exactly `width` characters.
pub fn render_panel(panel: &Panel, width: usize, height: usize) -> Vec<String> {
    let width = width.max(10);
    let height = height.max(3);
    let mut lines = Vec::with_capacity(height + 3);
    lines.push(fit(&panel.title, width));

    let Some(([x0, x1], [y0, y1])) = panel_bounds(panel) else {
        lines.push(fit(panel.y_label, width));
        for row in 0..height {
            if row == height / 2 {
                lines.push(center("(no data)", width));
            } else {
                lines.push(" ".repeat(width));
            }
        }
        lines.push(fit(panel.x_label, width));
        return lines;
    };

    lines.push(fit(&format!("{} [{y0:.1}, {y1:.1}]", panel.y_label), width));

    let mut grid = vec![vec![' '; width]; height];
    let mut cells = Vec::with_capacity(panel.points.len());
    for &(date, y) in &panel.points {
        if !y.is_finite() {
            cells.push(None);
            continue;
        }
        let x = map_x(date_to_x(date), x0, x1, width);
        let y = map_y(y, y0, y1, height);
        cells.push(Some((x, y)));
    }

    // Lines first so markers can overlay; missing values break the line.
    if let Some(ch) = line_glyph(panel.style.line) {
        let mut prev = None;
        for cell in &cells {
            match (prev, cell) {
                (Some((px, py)), Some((x, y))) => draw_line(&mut grid, px, py, *x, *y, ch),
                (None, Some((x, y))) => grid[*y][*x] = ch,
                _ => {}
            }
            prev = *cell;
        }
    }
    if let Some(marker) = panel.style.marker {
        for &(x, y) in cells.iter().flatten() {
            grid[y][x] = marker.glyph();
        }
    }

    for row in grid {
        lines.push(row.into_iter().collect());
    }

    let first = panel.points.iter().map(|p| p.0).min();
    let last = panel.points.iter().map(|p| p.0).max();
    let span = match (first, last) {
        (Some(first), Some(last)) => format!(
            "{} {}..{}",
            panel.x_label,
            format_year_month(date_to_x(first)),
            format_year_month(date_to_x(last)),
        ),
        _ => panel.x_label.to_string(),
    };
    lines.push(fit(&span, width));
    lines
}

fn line_glyph(style: LineStyle) -> Option<char> {
    match style {
        LineStyle::Solid => Some('-'),
        LineStyle::Dashed => Some('='),
        LineStyle::Dotted => Some(':'),
        LineStyle::DashDot => Some('~'),
        LineStyle::None => None,
    }
}

/// Truncate or right-pad to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count().min(width);
    let left = (width - len) / 2;
    fit(&format!("{}{}", " ".repeat(left), text), width)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemObservation;
    use crate::plot::build_item_grid;
    use chrono::NaiveDate;

    fn obs(code: &str, month: u32, quantity: f64) -> ItemObservation {
        ItemObservation {
            item_code: code.to_string(),
            date: NaiveDate::from_ymd_opt(2021, month, 1).unwrap(),
            quantity,
        }
    }

    #[test]
    fn panel_golden_snapshot_flat_series() {
        let grid = build_item_grid(&[obs("RW", 1, 5.0), obs("RW", 3, 5.0)], &["RW"], &["Red Wine"], &["ro-"]).unwrap();
        let lines = render_panel(&grid.panels[0], 30, 5);
        let expected = vec![
            "Red Wine                      ",
            "Sold Btls [3.9, 6.1]          ",
            "                              ",
            "                              ",
            "o----------------------------o",
            "                              ",
            "                              ",
            "Year-Month 2021-01..2021-03   ",
        ];
        assert_eq!(lines, expected);
    }

    #[test]
    fn empty_panel_renders_placeholder() {
        let grid = build_item_grid(&[], &["X"], &["Missing"], &["b-"]).unwrap();
        let lines = render_panel(&grid.panels[0], 20, 3);
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        assert_eq!(lines[3], "     (no data)      ");
    }

    #[test]
    fn grid_places_panels_side_by_side() {
        let data = vec![obs("A", 1, 1.0), obs("A", 2, 3.0), obs("C", 5, 2.0)];
        let grid = build_item_grid(&data, &["A", "B", "C"], &["Alpha", "Bravo", "Charlie"], &["k-", "r--", "go"]).unwrap();
        let text = AsciiGridRenderer::new(30, 5).render(&grid).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Two grid rows of 8 lines each, separated by one blank line.
        assert_eq!(lines.len(), 17);
        assert!(lines[0].starts_with("Alpha"));
        assert!(lines[0].contains(" | Bravo"));
        assert!(lines[9].starts_with("Charlie"));
        assert!(lines.iter().filter(|l| !l.is_empty()).all(|l| l.chars().count() == 63));
        assert!(text.contains("(no data)"));
    }

    #[test]
    fn marker_only_style_draws_no_line() {
        let grid = build_item_grid(&[obs("A", 1, 1.0), obs("A", 6, 2.0)], &["A"], &["Alpha"], &["x"]).unwrap();
        let lines = render_panel(&grid.panels[0], 12, 4);
        let plot = lines[2..6].join("");
        assert_eq!(plot.matches('x').count(), 2);
        assert!(!plot.contains('-'));
    }
}
