use crate::error::{Result, SheetError};
use crate::xlsx::save_xlsx;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Width added to the longest text of a column when sizing it
const AUTOFIT_PADDING: f64 = 2.0;

/// Font applied to every header cell
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyle {
    pub font_name: String,
    pub bold: bool,
    /// Font size in points
    pub font_size: f64,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        HeaderStyle {
            font_name: "Arial".to_string(),
            bold: true,
            font_size: 12.0,
        }
    }
}

impl HeaderStyle {
    #[must_use]
    pub fn with_font(mut self, font_name: &str, font_size: f64) -> Self {
        self.font_name = font_name.to_string();
        self.font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    fn to_format(&self) -> Format {
        let format = Format::new()
            .set_font_name(self.font_name.as_str())
            .set_font_size(self.font_size);
        if self.bold {
            format.set_bold()
        } else {
            format
        }
    }
}

/// Options for exporting string tables to xlsx
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Name of the single sheet written
    pub sheet_name: String,
    pub header_style: HeaderStyle,
    /// Size the columns spanned by the header row to their content
    pub autofit_columns: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            sheet_name: "Sheet1".to_string(),
            header_style: HeaderStyle::default(),
            autofit_columns: true,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn with_sheet_name(mut self, sheet_name: &str) -> Self {
        self.sheet_name = sheet_name.to_string();
        self
    }

    #[must_use]
    pub fn with_header_style(mut self, header_style: HeaderStyle) -> Self {
        self.header_style = header_style;
        self
    }

    #[must_use]
    pub fn with_autofit(mut self, autofit_columns: bool) -> Self {
        self.autofit_columns = autofit_columns;
        self
    }
}

/// Export headers and string content into a new xlsx file with one sheet.
///
/// The header row is written in bold 12pt Arial; content is written as text
/// verbatim, so numeric-looking entries stay strings.
///
/// # Examples
///
/// ```no_run
/// use xltab_sheet::export_to_excel;
///
/// export_to_excel(
///     "out.xlsx",
///     &["A", "B"],
///     &[vec!["1", "a"], vec!["2", "b"]],
///     "Data",
/// )
/// .unwrap();
/// ```
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn export_to_excel<P, H, C>(path: P, headers: &[H], content: &[Vec<C>], sheet_name: &str) -> Result<()>
where
    P: AsRef<Path>,
    H: AsRef<str>,
    C: AsRef<str>,
{
    export_to_excel_with_options(
        path,
        headers,
        content,
        &ExportOptions::default().with_sheet_name(sheet_name),
    )
}

/// Export headers and string content into a new xlsx file with options
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn export_to_excel_with_options<P, H, C>(
    path: P,
    headers: &[H],
    content: &[Vec<C>],
    options: &ExportOptions,
) -> Result<()>
where
    P: AsRef<Path>,
    H: AsRef<str>,
    C: AsRef<str>,
{
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(options.sheet_name.as_str())?;

    let header_format = options.header_style.to_format();
    for (col_idx, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_number(0, col_idx)?, header.as_ref(), &header_format)?;
    }

    for (row_idx, row) in content.iter().enumerate() {
        let row_num = row_number(row_idx + 1)?;
        for (col_idx, value) in row.iter().enumerate() {
            worksheet.write_string(row_num, column_number(row_idx + 1, col_idx)?, value.as_ref())?;
        }
    }

    if options.autofit_columns {
        autofit_header_columns(worksheet, headers, content)?;
    }

    save_xlsx(&mut workbook, path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        rows = content.len() + 1,
        columns = headers.len(),
        "Exported table"
    );
    Ok(())
}

/// Size each column under a header to its widest text; columns right of the
/// last header keep the default width.
fn autofit_header_columns<H, C>(worksheet: &mut Worksheet, headers: &[H], content: &[Vec<C>]) -> Result<()>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    for (col_idx, header) in headers.iter().enumerate() {
        let widest = content
            .iter()
            .filter_map(|row| row.get(col_idx))
            .map(|value| value.as_ref().chars().count())
            .fold(header.as_ref().chars().count(), usize::max);
        worksheet.set_column_width(column_number(0, col_idx)?, widest as f64 + AUTOFIT_PADDING)?;
    }
    Ok(())
}

fn row_number(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| SheetError::IndexOverflow { row, col: 0 })
}

fn column_number(row: usize, col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| SheetError::IndexOverflow { row, col })
}
