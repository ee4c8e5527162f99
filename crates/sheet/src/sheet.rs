use crate::cell::{Cell, CellValue};
use std::collections::BTreeMap;

/// A sparse row of cells keyed by column index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<u16, Cell>,
}

impl Row {
    /// Create a row without any cells
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell at a column, `None` if no cell was ever created there
    #[must_use]
    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(&col)
    }

    pub fn cell_mut(&mut self, col: u16) -> Option<&mut Cell> {
        self.cells.get_mut(&col)
    }

    /// Create a blank cell at a column, replacing whatever was there
    pub fn create_cell(&mut self, col: u16) -> &mut Cell {
        self.cells.insert(col, Cell::new());
        self.cells.entry(col).or_default()
    }

    /// Create a cell holding `value` at a column, replacing whatever was there
    pub fn create_cell_with<T: Into<CellValue>>(&mut self, col: u16, value: T) -> &mut Cell {
        let cell = self.create_cell(col);
        cell.set_value(value);
        cell
    }

    /// Index of the last present cell plus one, 0 for a row without cells
    #[must_use]
    pub fn last_cell_num(&self) -> u16 {
        self.cells
            .last_key_value()
            .map_or(0, |(col, _)| col.saturating_add(1))
    }

    /// Number of cells actually present
    #[must_use]
    pub fn physical_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Present cells in column order
    pub fn cells(&self) -> impl Iterator<Item = (u16, &Cell)> {
        self.cells.iter().map(|(col, cell)| (*col, cell))
    }
}

/// A named sheet of sparse rows keyed by row index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: BTreeMap<u32, Row>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            rows: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the row at an index, `None` if it was never created
    #[must_use]
    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        self.rows.get_mut(&index)
    }

    /// Create an empty row at an index, replacing whatever was there
    pub fn create_row(&mut self, index: u32) -> &mut Row {
        self.rows.insert(index, Row::new());
        self.rows.entry(index).or_default()
    }

    /// Index of the last present row, 0 for a sheet without rows
    #[must_use]
    pub fn last_row_num(&self) -> u32 {
        self.rows.last_key_value().map_or(0, |(index, _)| *index)
    }

    /// Number of rows actually present
    #[must_use]
    pub fn physical_row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the cell at a position, `None` if the row or the cell is absent
    #[must_use]
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(col))
    }

    /// Set a value at a position, creating the row and the cell as needed
    pub fn set<T: Into<CellValue>>(&mut self, row: u32, col: u16, value: T) -> &mut Cell {
        let cell = self
            .rows
            .entry(row)
            .or_default()
            .cells
            .entry(col)
            .or_default();
        cell.set_value(value);
        cell
    }

    /// Present rows in index order
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(index, row)| (*index, row))
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = (u32, &mut Row)> {
        self.rows.iter_mut().map(|(index, row)| (*index, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellType;

    #[test]
    fn test_empty_sheet() {
        let sheet = Sheet::with_name("Data");
        assert_eq!(sheet.name(), "Data");
        assert_eq!(sheet.last_row_num(), 0);
        assert!(sheet.row(0).is_none());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_last_row_num_counts_gaps() {
        let mut sheet = Sheet::new();
        sheet.create_row(0);
        sheet.create_row(4);
        assert_eq!(sheet.last_row_num(), 4);
        assert_eq!(sheet.physical_row_count(), 2);
        assert!(sheet.row(2).is_none());
    }

    #[test]
    fn test_last_cell_num() {
        let mut row = Row::new();
        assert_eq!(row.last_cell_num(), 0);

        row.create_cell(0);
        row.create_cell(3);
        assert_eq!(row.last_cell_num(), 4);
        assert_eq!(row.physical_cell_count(), 2);
        assert!(row.cell(1).is_none());
    }

    #[test]
    fn test_create_cell_replaces() {
        let mut row = Row::new();
        row.create_cell_with(1, "old");
        let cell = row.create_cell(1);
        assert_eq!(cell.cell_type(), CellType::Blank);
    }

    #[test]
    fn test_create_row_replaces() {
        let mut sheet = Sheet::new();
        sheet.set(0, 0, "a");
        sheet.create_row(0);
        assert!(sheet.cell(0, 0).is_none());
        assert!(sheet.row(0).is_some());
    }

    #[test]
    fn test_set_creates_row_and_cell() {
        let mut sheet = Sheet::new();
        sheet.set(2, 5, 1.5);
        assert_eq!(sheet.cell(2, 5).and_then(Cell::numeric_value), Some(1.5));
        assert_eq!(sheet.row(2).map(Row::last_cell_num), Some(6));
        assert_eq!(sheet.last_row_num(), 2);
    }

    #[test]
    fn test_cells_iterate_in_column_order() {
        let mut row = Row::new();
        row.create_cell_with(2, "c");
        row.create_cell_with(0, "a");
        let cols: Vec<u16> = row.cells().map(|(col, _)| col).collect();
        assert_eq!(cols, vec![0, 2]);
    }
}
