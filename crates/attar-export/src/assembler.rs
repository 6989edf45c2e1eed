//! Workbook assembler
//!
//! Turns an ordered list of [`SheetSpec`]s into an in-memory XLSX workbook:
//! - one worksheet per spec, in order, under a sanitized unique name
//! - typed cells written with the matching number format
//! - declarative row styles (header row, section titles)
//! - explicit column widths, automatic widths for the rest
//! - frozen header row
//!
//! No I/O happens here; saving is the sink's job.

use attar_core::{ExportConfig, ExportError, Result};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::sheet::{Cell, SheetSpec, NOT_AVAILABLE};

/// Excel's sheet name limit
pub const MAX_SHEET_NAME: usize = 31;

const MIN_AUTO_WIDTH: f64 = 8.0;
const MAX_AUTO_WIDTH: f64 = 60.0;

const HEADER_FILL: u32 = 0x1F4E78;
const SECTION_FILL: u32 = 0xD9E1F2;

// ============================================================================
// Style Directives
// ============================================================================

/// Named row style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowStyle {
    /// Bold white on dark fill, centered, bordered
    Header,
    /// Bold dark text on accent fill
    Section,
}

/// Apply `style` to the given rows of one sheet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleDirective {
    pub sheet_index: usize,
    pub row_indices: Vec<usize>,
    pub style: RowStyle,
}

/// Header directive for every sheet, section directive where a sheet has
/// section rows
pub fn style_directives(specs: &[SheetSpec]) -> Vec<StyleDirective> {
    let mut directives = Vec::new();
    for (sheet_index, spec) in specs.iter().enumerate() {
        directives.push(StyleDirective {
            sheet_index,
            row_indices: vec![0],
            style: RowStyle::Header,
        });
        if !spec.section_rows.is_empty() {
            directives.push(StyleDirective {
                sheet_index,
                row_indices: spec.section_rows.clone(),
                style: RowStyle::Section,
            });
        }
    }
    directives
}

// ============================================================================
// Sheet Names
// ============================================================================

/// Replace characters Excel rejects, trim quotes and cap the length
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    if cleaned.is_empty() {
        return "Sheet".to_string();
    }
    cleaned.chars().take(MAX_SHEET_NAME).collect()
}

/// Sanitized names, made unique case-insensitively with a ` (n)` suffix
pub fn unique_sheet_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: Vec<String> = Vec::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let base = sanitize_sheet_name(name.as_ref());
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({n})");
            let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            candidate = format!("{}{suffix}", stem.trim_end());
            n += 1;
        }
        taken.push(candidate.to_lowercase());
        result.push(candidate);
    }
    result
}

// ============================================================================
// Widths
// ============================================================================

/// Width fitting the longest rendered value of a column, clamped
pub fn auto_width(spec: &SheetSpec, col: usize) -> f64 {
    let longest = spec
        .sheet
        .rows
        .iter()
        .enumerate()
        .filter(|(row, _)| !spec.section_rows.contains(row))
        .filter_map(|(_, cells)| cells.get(col))
        .map(|cell| cell.display().chars().count())
        .max()
        .unwrap_or(0);
    (longest as f64 + 2.0).clamp(MIN_AUTO_WIDTH, MAX_AUTO_WIDTH)
}

// ============================================================================
// Assembler
// ============================================================================

/// Assembled, unsaved workbook
pub struct AssembledWorkbook {
    pub workbook: Workbook,
    /// Final worksheet names, in order
    pub sheet_names: Vec<String>,
}

struct Formats {
    header: Format,
    section: Format,
    text: Format,
    number: Format,
    integer: Format,
    currency: Format,
    percent: Format,
    date: Format,
}

/// Builds styled workbooks from sheet specs
#[derive(Clone, Debug)]
pub struct WorkbookAssembler {
    /// Currency symbol
    pub currency: String,
    /// Freeze the header row of every sheet
    pub freeze_header: bool,
}

impl Default for WorkbookAssembler {
    fn default() -> Self {
        Self {
            currency: "₹".into(),
            freeze_header: true,
        }
    }
}

impl WorkbookAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new().currency(config.currency.clone())
    }

    /// Set currency symbol
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Leave header rows scrollable
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    fn create_formats(&self) -> Formats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(HEADER_FILL)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let section = Format::new()
            .set_bold()
            .set_font_color(HEADER_FILL)
            .set_background_color(SECTION_FILL);

        let currency_symbol = self.currency.replace('"', "");
        let currency = Format::new()
            .set_num_format(format!("\"{currency_symbol}\"#,##0.00"))
            .set_border(FormatBorder::Thin);

        let percent = Format::new()
            .set_num_format("0.0\"%\"")
            .set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format("#,##0.00")
            .set_border(FormatBorder::Thin);

        let integer = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        let date = Format::new()
            .set_num_format("yyyy-mm-dd")
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        Formats {
            header,
            section,
            text,
            number,
            integer,
            currency,
            percent,
            date,
        }
    }

    /// Assemble the workbook; fails only on spreadsheet writer errors
    pub fn assemble(&self, specs: &[SheetSpec]) -> Result<AssembledWorkbook> {
        let formats = self.create_formats();
        let names: Vec<&str> = specs.iter().map(SheetSpec::name).collect();
        let sheet_names = unique_sheet_names(&names);
        let directives = style_directives(specs);

        let mut workbook = Workbook::new();
        for (index, (spec, name)) in specs.iter().zip(&sheet_names).enumerate() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name).map_err(xlsx_error)?;

            let styled: Vec<(usize, RowStyle)> = directives
                .iter()
                .filter(|d| d.sheet_index == index)
                .flat_map(|d| d.row_indices.iter().map(move |row| (*row, d.style)))
                .collect();

            for (row, cells) in spec.sheet.rows.iter().enumerate() {
                let style = styled.iter().rev().find(|(r, _)| *r == row).map(|(_, s)| *s);
                for (col, cell) in cells.iter().enumerate() {
                    write_cell(worksheet, row, col, cell, style, &formats)?;
                }
            }

            for col in 0..spec.sheet.width() {
                let width = spec
                    .column_widths
                    .get(col)
                    .copied()
                    .unwrap_or_else(|| auto_width(spec, col));
                worksheet
                    .set_column_width(to_col(col)?, width)
                    .map_err(xlsx_error)?;
            }

            if self.freeze_header {
                worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;
            }
        }

        Ok(AssembledWorkbook {
            workbook,
            sheet_names,
        })
    }
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: usize,
    col: usize,
    cell: &Cell,
    style: Option<RowStyle>,
    formats: &Formats,
) -> Result<()> {
    let (row, col) = (to_row(row)?, to_col(col)?);
    let styled = match style {
        Some(RowStyle::Header) => Some(&formats.header),
        Some(RowStyle::Section) => Some(&formats.section),
        None => None,
    };

    match cell {
        Cell::Empty => {
            if let Some(format) = styled {
                worksheet.write_blank(row, col, format).map_err(xlsx_error)?;
            }
        }
        Cell::Text(text) => {
            worksheet
                .write_string_with_format(row, col, text, styled.unwrap_or(&formats.text))
                .map_err(xlsx_error)?;
        }
        Cell::Number(value) | Cell::Currency(value) | Cell::Percent(value) if !value.is_finite() => {
            worksheet
                .write_string_with_format(row, col, NOT_AVAILABLE, styled.unwrap_or(&formats.text))
                .map_err(xlsx_error)?;
        }
        Cell::Number(value) => {
            worksheet
                .write_number_with_format(row, col, *value, styled.unwrap_or(&formats.number))
                .map_err(xlsx_error)?;
        }
        Cell::Currency(value) => {
            worksheet
                .write_number_with_format(row, col, *value, styled.unwrap_or(&formats.currency))
                .map_err(xlsx_error)?;
        }
        Cell::Percent(value) => {
            worksheet
                .write_number_with_format(row, col, *value, styled.unwrap_or(&formats.percent))
                .map_err(xlsx_error)?;
        }
        Cell::Integer(value) => {
            worksheet
                .write_number_with_format(row, col, *value as f64, styled.unwrap_or(&formats.integer))
                .map_err(xlsx_error)?;
        }
        Cell::Date(date) => {
            let excel_date = u16::try_from(date.year())
                .ok()
                .and_then(|year| {
                    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
                });
            match excel_date {
                Some(excel_date) => {
                    worksheet
                        .write_datetime_with_format(row, col, &excel_date, styled.unwrap_or(&formats.date))
                        .map_err(xlsx_error)?;
                }
                // Outside Excel's date range
                None => {
                    worksheet
                        .write_string_with_format(row, col, date.to_string(), styled.unwrap_or(&formats.text))
                        .map_err(xlsx_error)?;
                }
            }
        }
    }
    Ok(())
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Format(e.to_string())
}

fn to_row(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| ExportError::InvalidData(format!("row {row} out of range")))
}

fn to_col(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ExportError::InvalidData(format!("column {col} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn spec(name: &str) -> SheetSpec {
        let mut spec = SheetSpec::new(name, &["Product", "Revenue", "Share", "Expiry"]);
        spec.push_row(vec![
            Cell::text("Oud Al Layl"),
            Cell::Currency(1250.5),
            Cell::Percent(42.0),
            Cell::Date(NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()),
        ]);
        spec.push_section("TOTALS");
        spec.push_row(vec![Cell::text("All"), Cell::Currency(f64::NAN)]);
        spec
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("Sales/Returns [Q1]"), "Sales-Returns -Q1-");
        assert_eq!(sanitize_sheet_name("   "), "Sheet");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME);
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let names = unique_sheet_names(&["Category Analysis", "category analysis", "Category Analysis"]);
        assert_eq!(
            names,
            vec!["Category Analysis", "category analysis (2)", "Category Analysis (3)"]
        );

        let long = "L".repeat(40);
        let names = unique_sheet_names(&[long.as_str(), long.as_str()]);
        assert_eq!(names[1].chars().count(), MAX_SHEET_NAME);
        assert!(names[1].ends_with(" (2)"));
    }

    #[test]
    fn directives_cover_headers_and_sections() {
        let specs = vec![spec("A"), SheetSpec::new("B", &["X"])];
        let directives = style_directives(&specs);
        assert_eq!(
            directives,
            vec![
                StyleDirective {
                    sheet_index: 0,
                    row_indices: vec![0],
                    style: RowStyle::Header
                },
                StyleDirective {
                    sheet_index: 0,
                    row_indices: vec![2],
                    style: RowStyle::Section
                },
                StyleDirective {
                    sheet_index: 1,
                    row_indices: vec![0],
                    style: RowStyle::Header
                },
            ]
        );
    }

    #[test]
    fn auto_width_is_clamped() {
        let mut spec = SheetSpec::new("W", &["A", "B"]);
        spec.push_row(vec![Cell::text("ab"), Cell::text("y".repeat(100))]);
        assert_eq!(auto_width(&spec, 0), MIN_AUTO_WIDTH);
        assert_eq!(auto_width(&spec, 1), MAX_AUTO_WIDTH);
    }

    #[test]
    fn assembles_in_order() {
        let specs = vec![spec("Executive Summary"), spec("Top Products").widths(&[30.0])];
        let mut assembled = WorkbookAssembler::new().currency("AED").assemble(&specs).unwrap();
        assert_eq!(assembled.sheet_names, vec!["Executive Summary", "Top Products"]);

        let bytes = assembled.workbook.save_to_buffer().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_spec_list_assembles() {
        let assembled = WorkbookAssembler::new().assemble(&[]).unwrap();
        assert!(assembled.sheet_names.is_empty());
    }
}
