//! Reading single cells as typed values or display strings.
//!
//! Both readers are total over absent cells and classify a present cell by
//! its type tag in a fixed order: blank, boolean, error, formula, numeric,
//! string.

use crate::cell::{Cell, CellContent, CellValue};
use crate::number_text::number_to_text;
use crate::sheet::Row;

/// Read a cell as a typed value.
///
/// Absent, blank and error cells read as empty text; the error code is
/// dropped. Formula cells read as their source text, not their result.
#[must_use]
pub fn cell_value(cell: Option<&Cell>) -> CellContent {
    let Some(cell) = cell else {
        return CellContent::empty();
    };
    match cell.value() {
        CellValue::Blank => CellContent::empty(),
        CellValue::Boolean(b) => CellContent::Bool(*b),
        CellValue::Error(_) => CellContent::empty(),
        CellValue::Formula(source) => CellContent::Text(source.clone()),
        CellValue::Numeric(n) => CellContent::Number(*n),
        CellValue::String(s) => CellContent::Text(s.clone()),
    }
}

/// Read a cell as display text.
///
/// Same classification as [`cell_value`]; booleans become `"true"`/`"false"`
/// and numbers go through [`number_to_text`].
#[must_use]
pub fn cell_value_as_string(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    match cell.value() {
        CellValue::Blank => String::new(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Error(_) => String::new(),
        CellValue::Formula(source) => source.clone(),
        CellValue::Numeric(n) => number_to_text(*n),
        CellValue::String(s) => s.clone(),
    }
}

/// Check whether a row is absent or all of its present cells read as empty
/// text. Only cells that exist are looked at.
#[must_use]
pub fn is_empty_row(row: Option<&Row>) -> bool {
    row.map_or(true, |row| {
        row.cells()
            .all(|(_, cell)| cell_value_as_string(Some(cell)).is_empty())
    })
}
