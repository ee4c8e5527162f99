//! Sheet-to-table extraction.
//!
//! Every sheet is traversed the same way: the row bound is the sheet's last
//! row index and the column bound is the cell count of row 0, for every row.
//! Cells right of row 0's extent are not read. What happens to a row that
//! was never created is up to the [`TableSink`] collecting the output.

use crate::book::Workbook;
use crate::coerce::cell_value_as_string;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use crate::xlsx::{open_workbook, OpenWorkbook};
use std::path::Path;

/// Fixed grid of `last_row + 1` rows by row-0 width; absent rows hold `None`
pub type FixedTable = Vec<Vec<Option<String>>>;

/// Rows of a sheet with absent rows left out
pub type RowList = Vec<Vec<String>>;

/// Collects the rows of one sheet into a table
pub trait TableSink {
    type Table;

    /// Start a table for a sheet spanning `rows` × `columns`
    fn with_shape(rows: usize, columns: usize) -> Self;

    /// Receive the cells of a present row
    fn put_row(&mut self, index: usize, cells: Vec<String>);

    fn finish(self) -> Self::Table;
}

/// Sets rows by index into a preallocated grid
#[derive(Debug)]
pub struct FixedGridSink {
    grid: FixedTable,
}

impl TableSink for FixedGridSink {
    type Table = FixedTable;

    fn with_shape(rows: usize, columns: usize) -> Self {
        FixedGridSink {
            grid: vec![vec![None; columns]; rows],
        }
    }

    fn put_row(&mut self, index: usize, cells: Vec<String>) {
        self.grid[index] = cells.into_iter().map(Some).collect();
    }

    fn finish(self) -> FixedTable {
        self.grid
    }
}

/// Appends present rows in order
#[derive(Debug)]
pub struct RowListSink {
    rows: RowList,
}

impl TableSink for RowListSink {
    type Table = RowList;

    fn with_shape(rows: usize, _columns: usize) -> Self {
        RowListSink {
            rows: Vec::with_capacity(rows),
        }
    }

    fn put_row(&mut self, _index: usize, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn finish(self) -> RowList {
        self.rows
    }
}

/// Traverse one sheet into a sink
///
/// # Errors
///
/// Returns `SheetError::MissingFirstRow` if the sheet has no row 0.
pub fn sheet_table<S: TableSink>(sheet: &Sheet) -> Result<S::Table> {
    let rows = sheet.last_row_num();
    let columns = sheet
        .row(0)
        .ok_or_else(|| SheetError::MissingFirstRow {
            sheet: sheet.name().to_string(),
        })?
        .last_cell_num();

    let mut sink = S::with_shape(rows as usize + 1, usize::from(columns));
    for index in 0..=rows {
        if let Some(row) = sheet.row(index) {
            let cells = (0..columns)
                .map(|col| cell_value_as_string(row.cell(col)))
                .collect();
            sink.put_row(index as usize, cells);
        }
    }
    Ok(sink.finish())
}

/// Traverse every sheet of a workbook in order, one table per sheet
///
/// # Errors
///
/// Returns `SheetError::MissingFirstRow` if any sheet has no row 0.
pub fn sheet_tables<S: TableSink>(workbook: &Workbook) -> Result<Vec<S::Table>> {
    workbook.sheets().map(sheet_table::<S>).collect()
}

/// Read every sheet of a workbook file into a fixed grid.
///
/// Accepts `.xls` and `.xlsx` (any format calamine detects from the content,
/// whatever the extension). Rows that were never created come back as rows
/// of `None`. The workbook is closed before returning.
///
/// # Examples
///
/// ```no_run
/// use xltab_sheet::export_workbook;
///
/// let tables = export_workbook("data.xls").unwrap();
/// for table in &tables {
///     println!("{} rows", table.len());
/// }
/// ```
///
/// # Errors
///
/// Returns error if the file cannot be read or a sheet has no row 0.
pub fn export_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<FixedTable>> {
    let workbook = open_workbook(path)?;
    let tables = sheet_tables::<FixedGridSink>(&workbook);
    workbook.close();
    let tables = tables?;
    tracing::debug!(sheets = tables.len(), "Extracted fixed tables");
    Ok(tables)
}

/// Read every sheet of a workbook file into nested row lists, leaving out
/// rows that were never created. Accepts `.xls` and `.xlsx`, detected from the
/// content. The workbook is closed before returning.
///
/// # Errors
///
/// Returns error if the file cannot be read or a sheet has no row 0.
pub fn export_workbook_as_string_list<P: AsRef<Path>>(path: P) -> Result<Vec<RowList>> {
    workbook_as_string_list(open_workbook(path)?)
}

/// Convert an already open workbook into nested row lists and close it
///
/// # Errors
///
/// Returns `SheetError::MissingFirstRow` if any sheet has no row 0.
pub fn workbook_as_string_list(workbook: OpenWorkbook) -> Result<Vec<RowList>> {
    let tables = sheet_tables::<RowListSink>(&workbook);
    workbook.close();
    let tables = tables?;
    tracing::debug!(sheets = tables.len(), "Extracted row lists");
    Ok(tables)
}
