//! # tally-sheets
//!
//! A minimal integer spreadsheet engine.
//!
//! Tally-sheets stores integer and text cells addressed by column-letter/
//! row-number identifiers ("A1"), evaluates small binary-operator formulas
//! on demand with circular-reference detection, and persists workbooks as
//! XLSX files.
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets::prelude::*;
//!
//! let mut session = SheetSession::new("Sheet1").unwrap();
//!
//! session.set_cell("A1", 13).unwrap();
//! session.set_cell("A2", 14).unwrap();
//! session.set_cell("A3", "=A1+A2").unwrap();
//!
//! assert_eq!(session.get_cell("A3").unwrap(), 27);
//! ```

pub mod prelude;
pub mod session;

// Re-export session types
pub use session::{CellInput, SessionError, SessionResult, SheetSession};

// Re-export core types
pub use tally_sheets_core::{
    // Cell types
    CellAddress,
    CellStorage,
    CellValue,
    // Error types
    Error,
    Result,
    // Main types
    Workbook,
    Worksheet,

    MAX_COLS,
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

// Re-export formula types
pub use tally_sheets_formula::{
    evaluate, parse_formula, validate, BinaryOp, EvaluationContext, Formula, FormulaError,
    FormulaResult,
};

// Re-export I/O types
pub use tally_sheets_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt {
    /// Open a workbook from a file
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook>;

    /// Save the workbook to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") => XlsxReader::read_file(path).map_err(|e| Error::other(e.to_string())),
            _ => Err(Error::other(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") => {
                XlsxWriter::write_file(self, path).map_err(|e| Error::other(e.to_string()))
            }
            _ => Err(Error::other(format!(
                "Unsupported file format: {}",
                path.display()
            ))),
        }
    }
}
