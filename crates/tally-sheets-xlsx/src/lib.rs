//! # tally-sheets-xlsx
//!
//! XLSX reading and writing for tally-sheets.
//!
//! This crate persists workbooks as minimal OOXML packages: the content
//! types part, package relationships, `xl/workbook.xml` and one worksheet
//! part per sheet. Formulas are stored as source text and recalculated on
//! load rather than carrying cached results.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tally_sheets_xlsx::{XlsxReader, XlsxWriter};
//!
//! XlsxWriter::write_file(&workbook, "book.xlsx")?;
//! let workbook = XlsxReader::read_file("book.xlsx")?;
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
