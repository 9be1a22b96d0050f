//! # tally-sheets-core
//!
//! Core data structures for the tally-sheets cell engine.
//!
//! This crate provides the fundamental types used throughout tally-sheets:
//! - [`CellAddress`] - Column-letter/row-number cell addressing ("A1")
//! - [`CellValue`] - Cell contents (integers, opaque text, formula text)
//! - [`CellStorage`] - Sparse per-sheet cell storage
//! - [`Workbook`], [`Worksheet`] - The document structure
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets_core::{Workbook, CellValue};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", 13).unwrap();
//! sheet.set_cell_value("A2", "label").unwrap();
//!
//! assert_eq!(sheet.cell("A1").unwrap(), Some(&CellValue::Number(13)));
//! ```

pub mod cell;
pub mod error;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellStorage, CellValue};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

/// Maximum number of rows in a worksheet (XLSX limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (single letter, A-Z)
pub const MAX_COLS: u8 = 26;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
