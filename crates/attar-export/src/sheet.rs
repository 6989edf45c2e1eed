//! Sheet model
//!
//! A [`Sheet`] is a named, rectangular grid of typed [`Cell`]s. Row 0 is the
//! header row and fixes the column count; every later row is padded to it.
//! [`SheetSpec`] adds the presentation hints the assembler needs.

use chrono::NaiveDate;
use serde::Serialize;

/// Sentinel rendered for undefined ratios
pub const NOT_AVAILABLE: &str = "N/A";

/// One typed cell value
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    /// Money in the workbook currency
    Currency(f64),
    /// Percentage points (`25.0` is 25%)
    Percent(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn na() -> Self {
        Cell::Text(NOT_AVAILABLE.to_string())
    }

    /// Whole-unit count; fractional input is rounded
    pub fn count(value: f64) -> Self {
        if value.is_finite() {
            Cell::Integer(value.round() as i64)
        } else {
            Cell::Integer(0)
        }
    }

    pub fn opt_number(value: Option<f64>) -> Self {
        value.map_or_else(Cell::na, Cell::Number)
    }

    pub fn opt_percent(value: Option<f64>) -> Self {
        value.map_or_else(Cell::na, Cell::Percent)
    }

    pub fn opt_currency(value: Option<f64>) -> Self {
        value.map_or_else(Cell::na, Cell::Currency)
    }

    pub fn opt_integer(value: Option<i64>) -> Self {
        value.map_or_else(Cell::na, Cell::Integer)
    }

    /// Date cell, or empty when unknown
    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(Cell::Empty, Cell::Date)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Approximate rendered text, used for automatic column widths
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) | Cell::Currency(n) => format!("{n:.2}"),
            Cell::Integer(n) => n.to_string(),
            Cell::Percent(p) => format!("{p:.1}%"),
            Cell::Date(d) => d.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

/// Named rectangular grid; row 0 is the header
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: vec![headers.iter().map(|h| Cell::text(*h)).collect()],
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn headers(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(Cell::display).collect())
            .unwrap_or_default()
    }

    /// Rows after the header
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Append a row, padding short rows with [`Cell::Empty`]
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        let width = self.width();
        debug_assert!(
            cells.len() <= width,
            "row of {} cells on sheet '{}' with {} columns",
            cells.len(),
            self.name,
            width
        );
        cells.resize(width, Cell::Empty);
        self.rows.push(cells);
    }

    pub fn push_blank(&mut self) {
        self.push_row(Vec::new());
    }

    /// Index of the column with the given header
    pub fn column(&self, header: &str) -> Option<usize> {
        self.rows
            .first()?
            .iter()
            .position(|cell| matches!(cell, Cell::Text(h) if h == header))
    }
}

/// A sheet plus its presentation hints
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SheetSpec {
    pub sheet: Sheet,
    /// Explicit widths for the leading columns, in characters
    pub column_widths: Vec<f64>,
    /// Rows styled as section titles
    pub section_rows: Vec<usize>,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            sheet: Sheet::new(name, headers),
            column_widths: Vec::new(),
            section_rows: Vec::new(),
        }
    }

    /// Set explicit column widths
    pub fn widths(mut self, widths: &[f64]) -> Self {
        self.column_widths = widths.to_vec();
        self
    }

    pub fn name(&self) -> &str {
        &self.sheet.name
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.sheet.push_row(cells);
    }

    pub fn push_blank(&mut self) {
        self.sheet.push_blank();
    }

    /// Append a section title row
    pub fn push_section(&mut self, title: impl Into<String>) {
        self.section_rows.push(self.sheet.rows.len());
        self.sheet.push_row(vec![Cell::text(title)]);
    }
}

/// Two-column `Metric | Value` sheet made of titled sections
#[derive(Clone, Debug)]
pub struct SummarySheet {
    spec: SheetSpec,
    sections: usize,
}

impl SummarySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            spec: SheetSpec::new(name, &["Metric", "Value"]).widths(&[34.0, 40.0]),
            sections: 0,
        }
    }

    /// Start a section; sections after the first are preceded by a spacer
    pub fn section(&mut self, title: &str) -> &mut Self {
        if self.sections > 0 {
            self.spec.push_blank();
        }
        self.sections += 1;
        self.spec.push_section(title);
        self
    }

    pub fn row(&mut self, label: impl Into<String>, value: impl Into<Cell>) -> &mut Self {
        self.spec.push_row(vec![Cell::text(label), value.into()]);
        self
    }

    pub fn finish(self) -> SheetSpec {
        self.spec
    }
}
