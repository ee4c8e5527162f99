//! String tables over spreadsheet workbooks
//!
//! Reads workbook files (legacy binary `.xls` and zipped XML `.xlsx`) into a
//! sparse in-memory model, converts cells to display strings, extracts whole
//! sheets as string tables, writes string tables back out as `.xlsx`, and
//! turns absent cells into explicit blanks.
//!
//! # Examples
//!
//! ## Reading cells
//!
//! ```
//! use xltab_sheet::{cell_value_as_string, is_empty_row, Sheet};
//!
//! let mut sheet = Sheet::with_name("Data");
//! sheet.set(0, 0, "Name");
//! sheet.set(0, 1, 123.0);
//! sheet.set(0, 2, true);
//!
//! assert_eq!(cell_value_as_string(sheet.cell(0, 1)), "123");
//! assert_eq!(cell_value_as_string(sheet.cell(0, 2)), "true");
//! assert_eq!(cell_value_as_string(sheet.cell(0, 9)), "");
//! assert!(is_empty_row(sheet.row(5)));
//! ```
//!
//! ## Exporting and extracting tables
//!
//! ```no_run
//! use xltab_sheet::{export_to_excel, export_workbook_as_string_list};
//!
//! export_to_excel(
//!     "out.xlsx",
//!     &["A", "B", "C"],
//!     &[vec!["1", "a", "!"], vec!["2", "b", "?"]],
//!     "Data",
//! )
//! .unwrap();
//!
//! let sheets = export_workbook_as_string_list("out.xlsx").unwrap();
//! assert_eq!(sheets[0][1], vec!["1", "a", "!"]);
//! ```
//!
//! # Table shape
//!
//! Every row of a sheet is read up to the cell count of row 0, so data right
//! of the first row's extent is not extracted, and a sheet without a row 0
//! fails with [`SheetError::MissingFirstRow`].

mod book;
mod cell;
mod coerce;
mod error;
mod export;
mod extract;
mod normalize;
mod number_text;
mod sheet;
mod xlsx;

/// Re-export the workbook type.
pub use book::Workbook;
/// Re-export cell types.
pub use cell::{Cell, CellContent, CellType, CellValue};
/// Re-export cell readers.
pub use coerce::{cell_value, cell_value_as_string, is_empty_row};
/// Re-export error types.
pub use error::{Result, SheetError};
/// Re-export table export.
pub use export::{export_to_excel, export_to_excel_with_options, ExportOptions, HeaderStyle};
/// Re-export table extraction.
pub use extract::{
    export_workbook, export_workbook_as_string_list, sheet_table, sheet_tables,
    workbook_as_string_list, FixedGridSink, FixedTable, RowList, RowListSink, TableSink,
};
/// Re-export blank-cell normalization.
pub use normalize::{fill_blank_cells, replace_null_cells_with_blanks};
/// Re-export the number-to-text converter.
pub use number_text::number_to_text;
/// Re-export sheet and row types.
pub use sheet::{Row, Sheet};
/// Re-export workbook file access.
pub use xlsx::{open_workbook, read_xls_workbook, read_xlsx_workbook, OpenWorkbook, WorkbookFormat};
