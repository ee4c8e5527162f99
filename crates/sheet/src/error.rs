use thiserror::Error;

/// Errors that can occur while reading, writing or traversing workbooks
#[derive(Error, Debug)]
pub enum SheetError {
    /// Row 0 is needed to size every row of a sheet; a sheet without it
    /// cannot be traversed.
    #[error("Sheet '{sheet}' has no first row to take the column count from")]
    MissingFirstRow { sheet: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Cell position out of range for xlsx: row {row}, col {col}")]
    IndexOverflow { row: usize, col: usize },

    #[error("Read error: {0}")]
    Read(#[from] calamine::Error),

    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
