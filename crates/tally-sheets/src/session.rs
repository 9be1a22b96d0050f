//! Sheet sessions
//!
//! A [`SheetSession`] owns a workbook and a target sheet, giving callers the
//! three-operation surface most users want: set a cell, evaluate a cell, save
//! the file. Formula bodies are validated here, before storage, so the cell
//! store only ever holds grammatical formulas.

use std::path::{Path, PathBuf};

use thiserror::Error;

use tally_sheets_core::{CellAddress, CellValue, Workbook, Worksheet};
use tally_sheets_formula::{evaluate, validate, FormulaError};
use tally_sheets_xlsx::{XlsxError, XlsxReader, XlsxWriter};

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by a [`SheetSession`]
#[derive(Debug, Error)]
pub enum SessionError {
    /// Addressing or document-model error
    #[error(transparent)]
    Core(#[from] tally_sheets_core::Error),

    /// Formula validation or evaluation error
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// File persistence error
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// `save_in_place` on a session opened without a file
    #[error("session has no associated file path")]
    NoPath,
}

/// A value being written to a cell
///
/// Closed set of accepted inputs: an integer stores a number; text starting
/// with `=` is validated as a formula and stored as its body; any other text
/// stores as an opaque literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellInput {
    /// An integer value
    Integer(i64),
    /// Text, possibly a `=`-prefixed formula
    Text(String),
}

impl From<i64> for CellInput {
    fn from(n: i64) -> Self {
        CellInput::Integer(n)
    }
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        CellInput::Text(s.to_string())
    }
}

impl From<String> for CellInput {
    fn from(s: String) -> Self {
        CellInput::Text(s)
    }
}

/// An owned workbook handle bound to one target sheet
#[derive(Debug)]
pub struct SheetSession {
    workbook: Workbook,
    sheet_index: usize,
    path: Option<PathBuf>,
}

impl SheetSession {
    /// Start an in-memory session on a fresh workbook
    pub fn new(sheet_name: &str) -> SessionResult<Self> {
        let mut workbook = Workbook::empty();
        let sheet_index = workbook.add_worksheet_with_name(sheet_name)?;
        Ok(Self {
            workbook,
            sheet_index,
            path: None,
        })
    }

    /// Open a session on a file, creating the workbook and the named sheet
    /// as needed
    ///
    /// A missing file starts an empty workbook rather than failing; the file
    /// appears on the first save.
    pub fn open<P: AsRef<Path>>(path: P, sheet_name: &str) -> SessionResult<Self> {
        let path = path.as_ref();
        let mut workbook = if path.exists() {
            XlsxReader::read_file(path)?
        } else {
            Workbook::empty()
        };

        let sheet_index = match workbook.sheet_index(sheet_name) {
            Some(idx) => idx,
            None => workbook.add_worksheet_with_name(sheet_name)?,
        };

        Ok(Self {
            workbook,
            sheet_index,
            path: Some(path.to_path_buf()),
        })
    }

    /// Write a value to a cell
    ///
    /// A formula that fails grammar validation is rejected without touching
    /// the store, so the cell keeps its previous content.
    pub fn set_cell<V: Into<CellInput>>(&mut self, address: &str, value: V) -> SessionResult<()> {
        let addr = CellAddress::parse(address)?;

        match value.into() {
            CellInput::Integer(n) => {
                self.target_mut()?.set_cell_value_at(addr, n);
            }
            CellInput::Text(s) => match s.strip_prefix('=') {
                Some(body) => {
                    validate(body)?;
                    self.target_mut()?.set_cell_formula_at(addr, body);
                }
                None => {
                    self.target_mut()?
                        .set_cell_value_at(addr, CellValue::text(s));
                }
            },
        }

        Ok(())
    }

    /// Evaluate a cell to an integer
    ///
    /// Absent and text cells evaluate to 0; formulas are resolved
    /// recursively with cycle detection.
    pub fn get_cell(&self, address: &str) -> SessionResult<i64> {
        let addr = CellAddress::parse(address)?;
        Ok(evaluate(self.target()?, addr)?)
    }

    /// Remove a cell's content
    pub fn clear_cell(&mut self, address: &str) -> SessionResult<Option<CellValue>> {
        Ok(self.target_mut()?.clear_cell(address)?)
    }

    /// Save to a path, remembering it for later [`Self::save_in_place`] calls
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> SessionResult<()> {
        let path = path.as_ref();
        XlsxWriter::write_file(&self.workbook, path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save back to the path the session was opened on
    pub fn save_in_place(&self) -> SessionResult<()> {
        let path = self.path.as_deref().ok_or(SessionError::NoPath)?;
        XlsxWriter::write_file(&self.workbook, path)?;
        Ok(())
    }

    /// The target sheet, if it still exists in the workbook
    pub fn sheet(&self) -> Option<&Worksheet> {
        self.workbook.worksheet(self.sheet_index)
    }

    fn target(&self) -> SessionResult<&Worksheet> {
        let count = self.workbook.sheet_count();
        self.workbook
            .worksheet(self.sheet_index)
            .ok_or(tally_sheets_core::Error::SheetOutOfBounds(self.sheet_index, count))
            .map_err(SessionError::from)
    }

    fn target_mut(&mut self) -> SessionResult<&mut Worksheet> {
        let count = self.workbook.sheet_count();
        self.workbook
            .worksheet_mut(self.sheet_index)
            .ok_or(tally_sheets_core::Error::SheetOutOfBounds(self.sheet_index, count))
            .map_err(SessionError::from)
    }

    /// The underlying workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// The file path this session was opened on or last saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_integer() {
        let mut session = SheetSession::new("Sheet1").unwrap();
        session.set_cell("A1", 13).unwrap();
        assert_eq!(session.get_cell("A1").unwrap(), 13);
    }

    #[test]
    fn test_formula_validated_at_write_time() {
        let mut session = SheetSession::new("Sheet1").unwrap();
        session.set_cell("A1", "=A2+A3").unwrap();

        assert!(matches!(
            session.set_cell("B1", "=A1&A2"),
            Err(SessionError::Formula(FormulaError::InvalidFormula(_)))
        ));
    }

    #[test]
    fn test_rejected_formula_keeps_previous_content() {
        let mut session = SheetSession::new("Sheet1").unwrap();
        session.set_cell("A1", 5).unwrap();

        assert!(session.set_cell("A1", "=A1&A2").is_err());
        assert_eq!(session.get_cell("A1").unwrap(), 5);
    }

    #[test]
    fn test_plain_text_stores_without_validation() {
        let mut session = SheetSession::new("Sheet1").unwrap();
        session.set_cell("A1", "just a label").unwrap();
        assert_eq!(session.get_cell("A1").unwrap(), 0);
    }

    #[test]
    fn test_invalid_address_rejected() {
        let mut session = SheetSession::new("Sheet1").unwrap();
        assert!(matches!(
            session.set_cell("1A", 1),
            Err(SessionError::Core(_))
        ));
        assert!(session.get_cell("aa1").is_err());
    }

    #[test]
    fn test_save_in_place_requires_path() {
        let session = SheetSession::new("Sheet1").unwrap();
        assert!(matches!(
            session.save_in_place(),
            Err(SessionError::NoPath)
        ));
    }
}
