//! Per-item quantity grid.
//!
//! Plotting is split in two:
//!
//! - `build_item_grid` turns observations into an `ItemGrid`, a plain
//!   description of panels, series, labels and layout (no drawing)
//! - a `GridRenderer` turns that description into an artifact
//!   (`ascii` for terminals/tests, `svg` for an image file)
//!
//! The grid always has two columns; rows grow with the number of items, so
//! six items give the classic 3×2 layout.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::domain::ItemObservation;
use crate::error::DataError;

pub mod ascii;
pub mod svg;

pub use ascii::AsciiGridRenderer;
pub use svg::SvgGridRenderer;

pub const X_LABEL: &str = "Year-Month";
pub const Y_LABEL: &str = "Sold Btls";
pub const GRID_COLUMNS: usize = 2;

/// Single-letter colors of a style token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotColor {
    Blue,
    Green,
    Red,
    Cyan,
    Magenta,
    Yellow,
    Black,
    White,
}

impl PlotColor {
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'b' => PlotColor::Blue,
            'g' => PlotColor::Green,
            'r' => PlotColor::Red,
            'c' => PlotColor::Cyan,
            'm' => PlotColor::Magenta,
            'y' => PlotColor::Yellow,
            'k' => PlotColor::Black,
            'w' => PlotColor::White,
            _ => return None,
        })
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PlotColor::Blue => (0, 0, 255),
            PlotColor::Green => (0, 128, 0),
            PlotColor::Red => (255, 0, 0),
            PlotColor::Cyan => (0, 191, 191),
            PlotColor::Magenta => (191, 0, 191),
            PlotColor::Yellow => (191, 191, 0),
            PlotColor::Black => (0, 0, 0),
            PlotColor::White => (255, 255, 255),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// Markers only.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Point,
    Circle,
    Cross,
    Plus,
    Star,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
}

impl Marker {
    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            '.' => Marker::Point,
            'o' => Marker::Circle,
            'x' => Marker::Cross,
            '+' => Marker::Plus,
            '*' => Marker::Star,
            's' => Marker::Square,
            '^' => Marker::TriangleUp,
            'v' => Marker::TriangleDown,
            'd' => Marker::Diamond,
            _ => return None,
        })
    }

    /// Character used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            Marker::Point => '.',
            Marker::Circle => 'o',
            Marker::Cross => 'x',
            Marker::Plus => '+',
            Marker::Star => '*',
            Marker::Square => '#',
            Marker::TriangleUp => '^',
            Marker::TriangleDown => 'v',
            Marker::Diamond => 'D',
        }
    }
}

/// A compact line format such as `"r-"`, `"bo--"` or `"k:"`.
///
/// Color, marker and line style are each optional and may appear in any
/// order. A marker without a line style draws markers only; an empty token
/// is a solid line in the renderer's default color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleToken {
    pub color: Option<PlotColor>,
    pub marker: Option<Marker>,
    pub line: LineStyle,
}

impl StyleToken {
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        let token = raw.trim();
        let chars: Vec<char> = token.chars().collect();
        let mut color = None;
        let mut marker = None;
        let mut line = None;

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();
            let (parsed_line, width) = match (c, next) {
                ('-', Some('-')) => (Some(LineStyle::Dashed), 2),
                ('-', Some('.')) => (Some(LineStyle::DashDot), 2),
                ('-', _) => (Some(LineStyle::Solid), 1),
                (':', _) => (Some(LineStyle::Dotted), 1),
                _ => (None, 1),
            };

            if let Some(style) = parsed_line {
                set_once(&mut line, style, "line style", token)?;
            } else if let Some(m) = Marker::from_code(c) {
                set_once(&mut marker, m, "marker", token)?;
            } else if let Some(col) = PlotColor::from_code(c) {
                set_once(&mut color, col, "color", token)?;
            } else {
                return Err(DataError::value(format!(
                    "unrecognized character '{c}' in style token '{token}'"
                )));
            }
            i += width;
        }

        let line = match (line, marker) {
            (Some(line), _) => line,
            (None, Some(_)) => LineStyle::None,
            (None, None) => LineStyle::Solid,
        };
        Ok(Self { color, marker, line })
    }
}

impl FromStr for StyleToken {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleToken::parse(s)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &str, token: &str) -> Result<(), DataError> {
    if slot.is_some() {
        return Err(DataError::value(format!("style token '{token}' sets the {what} twice")));
    }
    *slot = Some(value);
    Ok(())
}

/// One grid cell: an item's quantity series plus its labels and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub item_code: String,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub style: StyleToken,
    /// `(date, quantity)` in dataset order.
    pub points: Vec<(NaiveDate, f64)>,
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Renderer-independent description of the whole figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemGrid {
    pub rows: usize,
    pub cols: usize,
    /// In item order; panel `i` sits at `(i / cols, i % cols)`.
    pub panels: Vec<Panel>,
}

impl ItemGrid {
    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels.iter().find(|p| p.row == row && p.col == col)
    }

    pub fn empty_panels(&self) -> usize {
        self.panels.iter().filter(|p| p.is_empty()).count()
    }
}

/// Turns an [`ItemGrid`] into some artifact (text, image file, ...).
pub trait GridRenderer {
    type Output;

    fn render(&self, grid: &ItemGrid) -> Result<Self::Output, DataError>;
}

/// Lay out one panel per item.
///
/// `item_codes`, `item_names` and `style_tokens` are parallel and must have
/// the same non-zero length. Items with no observations get an empty panel.
pub fn build_item_grid<C, N, S>(
    dataset: &[ItemObservation],
    item_codes: &[C],
    item_names: &[N],
    style_tokens: &[S],
) -> Result<ItemGrid, DataError>
where
    C: AsRef<str>,
    N: AsRef<str>,
    S: AsRef<str>,
{
    let n = item_codes.len();
    if n == 0 {
        return Err(DataError::value("at least one item code is required"));
    }
    if item_names.len() != n || style_tokens.len() != n {
        return Err(DataError::value(format!(
            "item codes, names and styles must have the same length (got {}, {}, {})",
            n,
            item_names.len(),
            style_tokens.len()
        )));
    }

    let mut panels = Vec::with_capacity(n);
    for (i, ((code, name), style)) in item_codes.iter().zip(item_names).zip(style_tokens).enumerate() {
        let code = code.as_ref();
        let points = dataset
            .iter()
            .filter(|obs| obs.item_code == code)
            .map(|obs| (obs.date, obs.quantity))
            .collect();

        panels.push(Panel {
            row: i / GRID_COLUMNS,
            col: i % GRID_COLUMNS,
            item_code: code.to_string(),
            title: name.as_ref().to_string(),
            x_label: X_LABEL,
            y_label: Y_LABEL,
            style: StyleToken::parse(style.as_ref())?,
            points,
        });
    }

    Ok(ItemGrid {
        rows: n.div_ceil(GRID_COLUMNS),
        cols: GRID_COLUMNS,
        panels,
    })
}

/// Padded `([x0, x1], [y0, y1])` bounds of a panel, x in days since CE.
///
/// Shared by the renderers so both frame a series identically.
pub(crate) fn panel_bounds(panel: &Panel) -> Option<([f64; 2], [f64; 2])> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for &(date, y) in &panel.points {
        let x = date_to_x(date);
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !(x_min.is_finite() && y_min.is_finite()) {
        return None;
    }
    let (x_min, x_max) = widen_degenerate(x_min, x_max, 15.0);
    let (y_min, y_max) = widen_degenerate(y_min, y_max, 1.0);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    Some(([x_min, x_max], [y_min, y_max]))
}

pub(crate) fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// `YYYY-MM` tick label for an x coordinate.
pub(crate) fn format_year_month(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

fn widen_degenerate(min: f64, max: f64, half_width: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - half_width, max + half_width)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(code: &str, month: u32, quantity: f64) -> ItemObservation {
        ItemObservation {
            item_code: code.to_string(),
            date: NaiveDate::from_ymd_opt(2021, month, 1).unwrap(),
            quantity,
        }
    }

    #[test]
    fn six_items_fill_three_by_two_and_missing_items_are_empty() {
        let data = vec![obs("A", 1, 5.0), obs("A", 2, 6.0), obs("C", 1, 1.0), obs("E", 3, 2.0)];
        let codes = ["A", "B", "C", "D", "E", "F"];
        let names = ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"];
        let styles = ["r-", "b-", "g-", "k-", "m-", "c-"];

        let grid = build_item_grid(&data, &codes, &names, &styles).unwrap();
        assert_eq!((grid.rows, grid.cols), (3, 2));
        assert_eq!(grid.panels.len(), 6);
        assert_eq!(grid.empty_panels(), 3);

        let echo = grid.panel_at(2, 0).unwrap();
        assert_eq!(echo.title, "Echo");
        assert_eq!(echo.points.len(), 1);
        assert_eq!((echo.x_label, echo.y_label), ("Year-Month", "Sold Btls"));

        let bravo = grid.panel_at(0, 1).unwrap();
        assert!(bravo.is_empty());
    }

    #[test]
    fn odd_item_count_leaves_last_cell_unused() {
        let codes = ["A", "B", "C", "D", "E"];
        let grid = build_item_grid(&[], &codes, &codes, &["-"; 5]).unwrap();
        assert_eq!((grid.rows, grid.cols), (3, 2));
        assert!(grid.panel_at(2, 1).is_none());
    }

    #[test]
    fn mismatched_or_empty_sequences_are_rejected() {
        let err = build_item_grid(&[], &["A", "B"], &["Alpha"], &["r-", "b-"]).unwrap_err();
        assert!(matches!(err, DataError::Value(_)));

        let none: [&str; 0] = [];
        assert!(build_item_grid(&[], &none, &none, &none).is_err());
    }

    #[test]
    fn style_tokens_parse_in_any_order() {
        let t = StyleToken::parse("ro--").unwrap();
        assert_eq!(t.color, Some(PlotColor::Red));
        assert_eq!(t.marker, Some(Marker::Circle));
        assert_eq!(t.line, LineStyle::Dashed);

        let t: StyleToken = "-.k".parse().unwrap();
        assert_eq!((t.color, t.marker, t.line), (Some(PlotColor::Black), None, LineStyle::DashDot));

        let t = StyleToken::parse("g^").unwrap();
        assert_eq!(t.line, LineStyle::None);

        let t = StyleToken::parse("").unwrap();
        assert_eq!((t.color, t.marker, t.line), (None, None, LineStyle::Solid));
    }

    #[test]
    fn bad_style_tokens_are_value_errors() {
        assert!(matches!(StyleToken::parse("rq"), Err(DataError::Value(_))));
        assert!(matches!(StyleToken::parse("rb-"), Err(DataError::Value(_))));
        assert!(matches!(StyleToken::parse("-:"), Err(DataError::Value(_))));
    }

    #[test]
    fn bounds_widen_single_points() {
        let grid = build_item_grid(&[obs("A", 6, 4.0)], &["A"], &["Alpha"], &["o"]).unwrap();
        let ([x0, x1], [y0, y1]) = panel_bounds(&grid.panels[0]).unwrap();
        assert!(x1 - x0 > 29.0);
        assert!(y0 < 3.0 && y1 > 5.0);
        assert_eq!(format_year_month((x0 + x1) / 2.0), "2021-06");
    }
}
