//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellValue`] - The value stored in a cell
//! - [`CellStorage`] - Sparse storage for one sheet's cells

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::CellStorage;
pub use value::CellValue;
