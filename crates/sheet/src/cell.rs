use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a present cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Blank,
    Boolean,
    Numeric,
    Formula,
    String,
    Error,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Blank => "BLANK",
            CellType::Boolean => "BOOLEAN",
            CellType::Numeric => "NUMERIC",
            CellType::Formula => "FORMULA",
            CellType::String => "STRING",
            CellType::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Raw value held by a cell. The variant is the cell's type tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Blank,
    Boolean(bool),
    Numeric(f64),
    /// Formula source text, without the leading `=`
    Formula(String),
    String(String),
    /// Spreadsheet error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Create a formula value, stripping a leading `=` if present.
    #[must_use]
    pub fn formula<S: Into<String>>(source: S) -> Self {
        let source = source.into();
        match source.strip_prefix('=') {
            Some(stripped) => CellValue::Formula(stripped.to_string()),
            None => CellValue::Formula(source),
        }
    }

    #[must_use]
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Blank => CellType::Blank,
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Numeric(_) => CellType::Numeric,
            CellValue::Formula(_) => CellType::Formula,
            CellValue::String(_) => CellType::String,
            CellValue::Error(_) => CellType::Error,
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Numeric(f)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Numeric(f64::from(i))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

/// A string of `None` clears the cell to blank, like writing a null string
/// into a spreadsheet cell.
impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Blank,
        }
    }
}

/// A present cell. Absence is expressed by the row not holding a cell at
/// that column at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    value: CellValue,
}

impl Cell {
    /// Create a blank cell
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value<T: Into<CellValue>>(value: T) -> Self {
        Cell {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn cell_type(&self) -> CellType {
        self.value.cell_type()
    }

    #[must_use]
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Replace the value, and with it the type tag
    pub fn set_value<T: Into<CellValue>>(&mut self, value: T) -> &mut Self {
        self.value = value.into();
        self
    }

    pub fn set_formula(&mut self, source: &str) -> &mut Self {
        self.value = CellValue::formula(source);
        self
    }

    #[must_use]
    pub fn bool_value(&self) -> Option<bool> {
        match self.value {
            CellValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value {
            CellValue::Numeric(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn formula(&self) -> Option<&str> {
        match &self.value {
            CellValue::Formula(source) => Some(source),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match &self.value {
            CellValue::Error(code) => Some(code),
            _ => None,
        }
    }
}

/// Typed result of reading a cell for display or export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellContent {
    Text(String),
    Bool(bool),
    Number(f64),
}

impl CellContent {
    #[must_use]
    pub fn empty() -> Self {
        CellContent::Text(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_blank() {
        let cell = Cell::new();
        assert_eq!(cell.cell_type(), CellType::Blank);
        assert_eq!(cell.string_value(), None);
        assert_eq!(cell.numeric_value(), None);
    }

    #[test]
    fn test_set_value_changes_type() {
        let mut cell = Cell::new();
        cell.set_value(123.45);
        assert_eq!(cell.cell_type(), CellType::Numeric);
        assert_eq!(cell.numeric_value(), Some(123.45));

        cell.set_value("Test");
        assert_eq!(cell.cell_type(), CellType::String);
        assert_eq!(cell.string_value(), Some("Test"));
        assert_eq!(cell.numeric_value(), None);

        cell.set_value(true);
        assert_eq!(cell.bool_value(), Some(true));
    }

    #[test]
    fn test_null_string_makes_blank() {
        let mut cell = Cell::with_value("x");
        cell.set_value(None::<String>);
        assert_eq!(cell.cell_type(), CellType::Blank);
    }

    #[test]
    fn test_formula_strips_equals() {
        let mut cell = Cell::new();
        cell.set_formula("=SUM(A1:B1)");
        assert_eq!(cell.cell_type(), CellType::Formula);
        assert_eq!(cell.formula(), Some("SUM(A1:B1)"));

        assert_eq!(
            CellValue::formula("A1*2"),
            CellValue::Formula("A1*2".to_string())
        );
    }

    #[test]
    fn test_error_cell_keeps_code() {
        let cell = Cell::with_value(CellValue::Error("#REF!".to_string()));
        assert_eq!(cell.cell_type(), CellType::Error);
        assert_eq!(cell.error_code(), Some("#REF!"));
        assert_eq!(cell.string_value(), None);
    }

    #[test]
    fn test_cell_type_display() {
        assert_eq!(CellType::Blank.to_string(), "BLANK");
        assert_eq!(CellType::Error.to_string(), "ERROR");
    }
}
