//! Worksheet type

use crate::cell::{CellAddress, CellStorage, CellValue};
use crate::error::Result;

/// A worksheet (single sheet in a workbook)
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell value by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row(), addr.col()))
    }

    /// Get a cell value by address
    pub fn cell_at(&self, addr: CellAddress) -> Option<&CellValue> {
        self.cells.get(addr.row(), addr.col())
    }

    /// Get a clone of a cell value by address string
    pub fn get_value(&self, address: &str) -> Result<Option<CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr))
    }

    /// Get a clone of a cell value by address
    pub fn get_value_at(&self, addr: CellAddress) -> Option<CellValue> {
        self.cell_at(addr).cloned()
    }

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr, value);
        Ok(())
    }

    /// Set a cell value by address
    pub fn set_cell_value_at<V: Into<CellValue>>(&mut self, addr: CellAddress, value: V) {
        self.cells.set(addr.row(), addr.col(), value.into());
    }

    /// Store formula text at an address
    ///
    /// The text is the body after the leading '='. Grammar validation is the
    /// session layer's job; storage is unconditional here.
    pub fn set_cell_formula_at(&mut self, addr: CellAddress, text: &str) {
        self.cells
            .set(addr.row(), addr.col(), CellValue::formula(text));
    }

    /// Clear a cell by address string
    pub fn clear_cell(&mut self, address: &str) -> Result<Option<CellValue>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.remove(addr.row(), addr.col()))
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Get the bounds of used cells as (min_row, min_col, max_row, max_col)
    pub fn used_bounds(&self) -> Option<(u32, u8, u32, u8)> {
        self.cells.used_bounds()
    }

    /// Iterate over all cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u8, &CellValue)> {
        self.cells.iter()
    }

    /// Iterate over row indices that have data
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.row_indices()
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u8, &CellValue)> {
        self.cells.iter_row(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_by_address() {
        let mut sheet = Worksheet::new("Sheet1");

        sheet.set_cell_value("A1", 13).unwrap();
        assert_eq!(sheet.cell("A1").unwrap(), Some(&CellValue::Number(13)));
        assert_eq!(sheet.cell("B1").unwrap(), None);
    }

    #[test]
    fn test_invalid_address_rejected() {
        let mut sheet = Worksheet::new("Sheet1");
        assert!(sheet.set_cell_value("1A", 1).is_err());
        assert!(sheet.cell("??").is_err());
    }

    #[test]
    fn test_formula_storage() {
        let mut sheet = Worksheet::new("Sheet1");
        let addr = CellAddress::parse("C3").unwrap();

        sheet.set_cell_formula_at(addr, "A1+A2");
        assert_eq!(
            sheet.cell_at(addr).and_then(|v| v.formula_text()),
            Some("A1+A2")
        );
    }

    #[test]
    fn test_clear_cell() {
        let mut sheet = Worksheet::new("Sheet1");
        sheet.set_cell_value("D4", "note").unwrap();

        assert_eq!(
            sheet.clear_cell("D4").unwrap(),
            Some(CellValue::text("note"))
        );
        assert_eq!(sheet.cell("D4").unwrap(), None);
        assert_eq!(sheet.cell_count(), 0);
    }
}
