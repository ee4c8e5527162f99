use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;

/// A workbook of uniquely named sheets (preserves insertion order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    /// Create a new workbook without sheets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a sheet by index (0-based)
    pub fn sheet_at(&self, index: usize) -> Result<&Sheet> {
        self.sheets
            .get_index(index)
            .map(|(_, sheet)| sheet)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: format!("index {index}"),
            })
    }

    // ===== Sheet Management =====

    /// Create a new empty sheet with the given name
    pub fn create_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        self.add_sheet(Sheet::with_name(name))?;
        self.sheet_mut(name)
    }

    /// Add a sheet under its own name
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(sheet.name()) {
            return Err(SheetError::SheetAlreadyExists {
                name: sheet.name().to_string(),
            });
        }
        self.sheets.insert(sheet.name().to_string(), sheet);
        Ok(())
    }

    /// Remove a sheet by name, keeping the order of the others
    pub fn remove_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.sheets
            .shift_remove(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }

    pub fn sheets_mut(&mut self) -> impl Iterator<Item = &mut Sheet> {
        self.sheets.values_mut()
    }
}

impl IntoIterator for Workbook {
    type Item = Sheet;
    type IntoIter = indexmap::map::IntoValues<String, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_values()
    }
}
