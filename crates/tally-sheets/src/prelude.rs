//! Prelude module - common imports for tally-sheets users
//!
//! ```rust
//! use tally_sheets::prelude::*;
//! ```

pub use crate::{
    // Session types
    CellAddress,
    CellInput,
    // Cell types
    CellValue,
    // Error types
    Error,
    FormulaError,
    Result,
    SessionError,
    SheetSession,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    Worksheet,
    // I/O types
    XlsxReader,
    XlsxWriter,
};
