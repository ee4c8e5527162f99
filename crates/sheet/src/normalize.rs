use crate::book::Workbook;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::xlsx::{open_workbook, OpenWorkbook};
use std::path::Path;

/// Open a workbook file (`.xls` or `.xlsx`, detected from the content) and
/// turn every absent cell inside its existing rows into a blank cell.
///
/// The workbook is returned still open: the caller decides whether to
/// persist the change (see [`Workbook::save_as_xlsx`]) and is responsible for
/// closing it.
///
/// # Examples
///
/// ```no_run
/// use xltab_sheet::replace_null_cells_with_blanks;
///
/// let workbook = replace_null_cells_with_blanks("data.xls").unwrap();
/// workbook.save_as_xlsx("data-normalized.xlsx").unwrap();
/// workbook.close();
/// ```
///
/// # Errors
///
/// Returns error if the file cannot be read or a sheet has no row 0.
pub fn replace_null_cells_with_blanks<P: AsRef<Path>>(path: P) -> Result<OpenWorkbook> {
    let mut workbook = open_workbook(path)?;
    let created = fill_blank_cells(&mut workbook)?;
    tracing::debug!(created, "Replaced absent cells with blanks");
    Ok(workbook)
}

/// Create a blank cell at every absent position of the existing rows,
/// bounded by the last row and the cell count of row 0. Rows that do not
/// exist are left absent. Returns the number of cells created.
///
/// # Errors
///
/// Returns `SheetError::MissingFirstRow` if a sheet has no row 0.
pub fn fill_blank_cells(workbook: &mut Workbook) -> Result<usize> {
    let mut created = 0;
    for sheet in workbook.sheets_mut() {
        created += fill_sheet(sheet)?;
    }
    Ok(created)
}

fn fill_sheet(sheet: &mut Sheet) -> Result<usize> {
    let columns = sheet
        .row(0)
        .ok_or_else(|| SheetError::MissingFirstRow {
            sheet: sheet.name().to_string(),
        })?
        .last_cell_num();

    let mut created = 0;
    for (_, row) in sheet.rows_mut() {
        for col in 0..columns {
            if row.cell(col).is_none() {
                row.create_cell(col);
                created += 1;
            }
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellType;
    use crate::coerce::cell_value_as_string;

    #[test]
    fn test_fills_rows_without_cells() {
        let mut book = Workbook::new();
        let sheet = book.create_sheet("Foo").unwrap();
        for (col, header) in ["1", "2", "3"].iter().enumerate() {
            sheet.set(0, col as u16, *header);
        }
        for row in 1..=3 {
            sheet.create_row(row);
        }

        let created = fill_blank_cells(&mut book).unwrap();
        assert_eq!(created, 9);

        let sheet = book.sheet("Foo").unwrap();
        for row in 1..=3 {
            for col in 0..3 {
                let cell = sheet.cell(row, col).unwrap();
                assert_eq!(cell.cell_type(), CellType::Blank);
                assert_eq!(cell.string_value(), None);
                assert_eq!(cell_value_as_string(Some(cell)), "");
            }
        }
    }

    #[test]
    fn test_absent_rows_stay_absent() {
        let mut book = Workbook::new();
        let sheet = book.create_sheet("Gaps").unwrap();
        sheet.set(0, 0, "a");
        sheet.set(0, 1, "b");
        sheet.set(2, 1, "x");

        fill_blank_cells(&mut book).unwrap();

        let sheet = book.sheet("Gaps").unwrap();
        assert!(sheet.row(1).is_none());
        assert_eq!(sheet.cell(2, 0).map(|c| c.cell_type()), Some(CellType::Blank));
        assert_eq!(sheet.cell(2, 1).and_then(|c| c.string_value()), Some("x"));
    }

    #[test]
    fn test_existing_cells_untouched_and_bound_by_first_row() {
        let mut book = Workbook::new();
        let sheet = book.create_sheet("Wide").unwrap();
        sheet.set(0, 0, "h");
        sheet.set(1, 0, 5.0);
        sheet.set(1, 3, "beyond");

        let created = fill_blank_cells(&mut book).unwrap();
        assert_eq!(created, 0);

        let sheet = book.sheet("Wide").unwrap();
        assert_eq!(sheet.cell(1, 0).and_then(|c| c.numeric_value()), Some(5.0));
        assert!(sheet.cell(1, 1).is_none());
    }

    #[test]
    fn test_missing_first_row_fails() {
        let mut book = Workbook::new();
        book.create_sheet("NoHeader").unwrap().set(4, 0, "x");

        assert!(matches!(
            fill_blank_cells(&mut book),
            Err(SheetError::MissingFirstRow { .. })
        ));
    }
}
