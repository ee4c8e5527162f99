use crate::book::Workbook;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto_from_rs, open_workbook_from_rs, Data, Range, Reader, Sheets, Xls, Xlsx};
use rust_xlsxwriter::Format;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// In-memory copy of a workbook file, read by calamine
type Source = Cursor<Vec<u8>>;

/// Container format of a workbook file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Legacy binary format (`.xls`)
    Xls,
    /// Zipped XML format (`.xlsx`, `.xlsm`)
    Xlsx,
    /// Zipped binary format (`.xlsb`)
    Xlsb,
    /// OpenDocument spreadsheet (`.ods`)
    Ods,
}

/// A workbook loaded from a file whose source is still held open.
///
/// Functions returning this type hand the release of the source over to the
/// caller: call [`OpenWorkbook::close`] (or drop the value) when done. The
/// loaded sheets are reachable through `Deref`/`DerefMut` to [`Workbook`].
#[must_use = "the workbook source stays open until `close` is called"]
pub struct OpenWorkbook {
    workbook: Workbook,
    path: PathBuf,
    reader: Sheets<Source>,
}

impl OpenWorkbook {
    fn load(path: &Path, mut reader: Sheets<Source>) -> Result<Self> {
        let workbook = load_workbook(&mut reader)?;
        tracing::debug!(
            path = %path.display(),
            sheets = workbook.sheet_count(),
            "Opened workbook"
        );
        Ok(OpenWorkbook {
            workbook,
            path: path.to_path_buf(),
            reader,
        })
    }

    /// Path the workbook was read from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Container format detected when the file was opened
    #[must_use]
    pub fn format(&self) -> WorkbookFormat {
        match &self.reader {
            Sheets::Xls(_) => WorkbookFormat::Xls,
            Sheets::Xlsx(_) => WorkbookFormat::Xlsx,
            Sheets::Xlsb(_) => WorkbookFormat::Xlsb,
            Sheets::Ods(_) => WorkbookFormat::Ods,
        }
    }

    #[must_use]
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// Release the source and keep the loaded workbook
    pub fn close(self) -> Workbook {
        let OpenWorkbook {
            workbook,
            path,
            reader,
        } = self;
        drop(reader);
        tracing::debug!(path = %path.display(), "Closed workbook");
        workbook
    }
}

impl Deref for OpenWorkbook {
    type Target = Workbook;

    fn deref(&self) -> &Workbook {
        &self.workbook
    }
}

impl DerefMut for OpenWorkbook {
    fn deref_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }
}

impl fmt::Debug for OpenWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWorkbook")
            .field("path", &self.path)
            .field("format", &self.format())
            .field("workbook", &self.workbook)
            .finish()
    }
}

/// Open a workbook, detecting its format from the file content.
///
/// # Errors
///
/// Returns `SheetError::Io` if the file cannot be read and
/// `SheetError::Read` if no reader accepts its content.
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<OpenWorkbook> {
    let path = path.as_ref();
    let reader = open_workbook_auto_from_rs(read_source(path)?)?;
    OpenWorkbook::load(path, reader)
}

/// Open a workbook stored in the legacy binary format (`.xls`)
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a legacy binary workbook.
pub fn read_xls_workbook<P: AsRef<Path>>(path: P) -> Result<OpenWorkbook> {
    let path = path.as_ref();
    let reader: Xls<Source> =
        open_workbook_from_rs(read_source(path)?).map_err(calamine::Error::Xls)?;
    OpenWorkbook::load(path, Sheets::Xls(reader))
}

/// Open a workbook stored in the zipped XML format (`.xlsx`)
///
/// # Errors
///
/// Returns error if the file cannot be read or is not a zipped XML workbook.
pub fn read_xlsx_workbook<P: AsRef<Path>>(path: P) -> Result<OpenWorkbook> {
    let path = path.as_ref();
    let reader: Xlsx<Source> =
        open_workbook_from_rs(read_source(path)?).map_err(calamine::Error::Xlsx)?;
    OpenWorkbook::load(path, Sheets::Xlsx(reader))
}

fn read_source(path: &Path) -> Result<Source> {
    Ok(Cursor::new(std::fs::read(path)?))
}

/// Convert calamine Data to a cell value, `None` for cells that hold nothing
fn data_to_cell_value(data: &Data) -> Option<CellValue> {
    let value = match data {
        Data::Empty => return None,
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Int(i) => CellValue::Numeric(*i as f64),
        Data::Float(f) => CellValue::Numeric(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Serial date: days since 1899-12-30
        Data::DateTime(dt) => CellValue::Numeric(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    };
    Some(value)
}

fn absolute_position(start: (u32, u32), row: usize, col: usize) -> Result<(u32, u16)> {
    let abs_row = start.0 as usize + row;
    let abs_col = start.1 as usize + col;
    let overflow = || SheetError::IndexOverflow {
        row: abs_row,
        col: abs_col,
    };
    Ok((
        u32::try_from(abs_row).map_err(|_| overflow())?,
        u16::try_from(abs_col).map_err(|_| overflow())?,
    ))
}

fn load_workbook(reader: &mut Sheets<Source>) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    for sheet_name in reader.sheet_names() {
        let range = reader.worksheet_range(&sheet_name)?;
        let mut sheet = Sheet::with_name(&sheet_name);
        load_values(&mut sheet, &range)?;

        match reader.worksheet_formula(&sheet_name) {
            Ok(formulas) => load_formulas(&mut sheet, &formulas)?,
            Err(e) => {
                tracing::warn!(sheet = %sheet_name, "Failed to read formulas, keeping cached values: {}", e);
            }
        }

        workbook.add_sheet(sheet)?;
    }

    Ok(workbook)
}

fn load_values(sheet: &mut Sheet, range: &Range<Data>) -> Result<()> {
    let Some(start) = range.start() else {
        return Ok(());
    };
    for (row, col, data) in range.used_cells() {
        if let Some(value) = data_to_cell_value(data) {
            let (row, col) = absolute_position(start, row, col)?;
            sheet.set(row, col, value);
        }
    }
    Ok(())
}

fn load_formulas(sheet: &mut Sheet, formulas: &Range<String>) -> Result<()> {
    let Some(start) = formulas.start() else {
        return Ok(());
    };
    for (row, col, source) in formulas.used_cells() {
        if source.is_empty() {
            continue;
        }
        let (row, col) = absolute_position(start, row, col)?;
        sheet.set(row, col, CellValue::formula(source.as_str()));
    }
    Ok(())
}

impl Workbook {
    /// Save the workbook to an xlsx file.
    ///
    /// Blank cells are written as formatted blanks and error cells as blanks;
    /// xlsx readers generally drop both on load.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut book = rust_xlsxwriter::Workbook::new();
        let blank = Format::new();

        for sheet in self.sheets() {
            let worksheet = book.add_worksheet();
            worksheet.set_name(sheet.name())?;

            for (row_num, row) in sheet.rows() {
                for (col_num, cell) in row.cells() {
                    match cell.value() {
                        CellValue::Blank | CellValue::Error(_) => {
                            worksheet.write_blank(row_num, col_num, &blank)?;
                        }
                        CellValue::Boolean(b) => {
                            worksheet.write_boolean(row_num, col_num, *b)?;
                        }
                        CellValue::Numeric(n) => {
                            worksheet.write_number(row_num, col_num, *n)?;
                        }
                        CellValue::Formula(source) => {
                            worksheet.write_formula(row_num, col_num, format!("={source}").as_str())?;
                        }
                        CellValue::String(s) => {
                            worksheet.write_string(row_num, col_num, s)?;
                        }
                    }
                }
            }
        }

        save_xlsx(&mut book, path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), sheets = self.sheet_count(), "Saved workbook");
        Ok(())
    }
}

/// Serialize an xlsx workbook through a file handle scoped to this call
pub(crate) fn save_xlsx(book: &mut rust_xlsxwriter::Workbook, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    book.save_to_writer(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellType;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_open_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("types.xlsx");

        let mut book = Workbook::new();
        let sheet = book.create_sheet("Types").unwrap();
        sheet.set(0, 0, "text");
        sheet.set(0, 1, 42.0);
        sheet.set(0, 2, 2.5);
        sheet.set(0, 3, true);
        book.save_as_xlsx(&path).unwrap();

        let mut opened = open_workbook(&path).unwrap();
        assert_eq!(opened.format(), WorkbookFormat::Xlsx);
        assert_eq!(opened.path(), path.as_path());
        assert_eq!(opened.workbook().sheet_count(), 1);

        let sheet = opened.sheet("Types").unwrap();
        assert_eq!(sheet.cell(0, 0).and_then(|c| c.string_value()), Some("text"));
        assert_eq!(sheet.cell(0, 1).and_then(|c| c.numeric_value()), Some(42.0));
        assert_eq!(sheet.cell(0, 2).and_then(|c| c.numeric_value()), Some(2.5));
        assert_eq!(sheet.cell(0, 3).and_then(|c| c.bool_value()), Some(true));

        opened.workbook_mut().create_sheet("Added").unwrap();
        let book = opened.close();
        assert_eq!(book.sheet_names(), vec!["Types", "Added"]);
    }

    #[test]
    fn test_absent_rows_stay_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sparse.xlsx");

        let mut book = Workbook::new();
        let sheet = book.create_sheet("Sparse").unwrap();
        sheet.set(0, 0, "a");
        sheet.set(3, 2, "b");
        book.save_as_xlsx(&path).unwrap();

        let opened = read_xlsx_workbook(&path).unwrap();
        let sheet = opened.sheet_at(0).unwrap();
        assert_eq!(sheet.last_row_num(), 3);
        assert!(sheet.row(1).is_none());
        assert!(sheet.row(2).is_none());
        assert!(sheet.cell(3, 0).is_none());
        assert_eq!(sheet.cell(3, 2).and_then(|c| c.string_value()), Some("b"));
    }

    #[test]
    fn test_offset_range_keeps_positions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut book = Workbook::new();
        book.create_sheet("Offset").unwrap().set(2, 3, "x");
        book.save_as_xlsx(&path).unwrap();

        let opened = open_workbook(&path).unwrap();
        let sheet = opened.sheet("Offset").unwrap();
        assert!(sheet.row(0).is_none());
        assert_eq!(sheet.cell(2, 3).and_then(|c| c.string_value()), Some("x"));
    }

    #[test]
    fn test_formulas_are_loaded_as_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("formula.xlsx");

        let mut book = Workbook::new();
        let sheet = book.create_sheet("Calc").unwrap();
        sheet.set(0, 0, 1.0);
        sheet.set(0, 1, 2.0);
        sheet.set(0, 2, CellValue::formula("=A1+B1"));
        book.save_as_xlsx(&path).unwrap();

        let opened = open_workbook(&path).unwrap();
        let cell = opened.sheet("Calc").unwrap().cell(0, 2).unwrap();
        assert_eq!(cell.cell_type(), CellType::Formula);
        assert_eq!(cell.formula(), Some("A1+B1"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = open_workbook(dir.path().join("missing.xlsx")).unwrap_err();
        assert!(matches!(err, SheetError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_read_xls_rejects_xlsx() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modern.xlsx");
        let mut book = Workbook::new();
        book.create_sheet("Data").unwrap().set(0, 0, "x");
        book.save_as_xlsx(&path).unwrap();

        assert!(matches!(read_xls_workbook(&path), Err(SheetError::Read(_))));
        assert!(read_xlsx_workbook(&path).is_ok());
    }

    #[test]
    fn test_garbage_content_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.xlsx");
        std::fs::write(&path, b"not a spreadsheet").unwrap();

        assert!(matches!(open_workbook(&path), Err(SheetError::Read(_))));
    }

    #[test]
    fn test_data_conversion() {
        assert_eq!(data_to_cell_value(&Data::Empty), None);
        assert_eq!(data_to_cell_value(&Data::Int(7)), Some(CellValue::Numeric(7.0)));
        assert_eq!(
            data_to_cell_value(&Data::Error(calamine::CellErrorType::Div0)),
            Some(CellValue::Error("#DIV/0!".to_string()))
        );
    }
}
