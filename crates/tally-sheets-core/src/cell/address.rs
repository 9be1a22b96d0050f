//! Cell address type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1")
///
/// Addresses combine a single column letter (A-Z) with a 1-based row number.
/// Only 26 columns exist; multi-letter columns are not part of the addressing
/// scheme and are rejected at parse time.
///
/// Every `CellAddress` in the system comes from successful parsing or from a
/// bounds-checked constructor, so code holding one may assume it names a real
/// cell slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    row: u32,
    /// Column index (0-based, A=0, ..., Z=25)
    col: u8,
}

impl CellAddress {
    /// Create a new cell address from 0-based indices
    pub fn new(row: u32, col: u8) -> Result<Self> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(Self { row, col })
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The identifier must match `[A-Z][0-9]+` exactly: one uppercase column
    /// letter followed by a 1-based decimal row number. Leading zeros in the
    /// row are allowed ("A01" and "A1" name the same cell).
    ///
    /// # Examples
    /// ```
    /// use tally_sheets_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B3").unwrap();
    /// assert_eq!(addr.row(), 2);
    /// assert_eq!(addr.col(), 1);
    ///
    /// assert!(CellAddress::parse("a1").is_err());
    /// assert!(CellAddress::parse("AA1").is_err());
    /// assert!(CellAddress::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();

        let letter = *bytes
            .first()
            .ok_or_else(|| Error::InvalidAddress("empty address".into()))?;
        if !letter.is_ascii_uppercase() {
            return Err(Error::InvalidAddress(format!(
                "no column letter in '{}'",
                s
            )));
        }
        let col = letter - b'A';

        let row_str = &s[1..];
        if row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Rows are 1-based in text, 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Self::new(row - 1, col)
    }

    /// Row index (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column index (0-based)
    pub fn col(&self) -> u8 {
        self.col
    }

    /// Column letter ('A' through 'Z')
    pub fn column_letter(&self) -> char {
        (b'A' + self.col) as char
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", self.column_letter(), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr.row(), 0);
        assert_eq!(addr.col(), 0);

        let addr = CellAddress::parse("B2").unwrap();
        assert_eq!(addr.row(), 1);
        assert_eq!(addr.col(), 1);

        let addr = CellAddress::parse("Z100").unwrap();
        assert_eq!(addr.row(), 99);
        assert_eq!(addr.col(), 25);
    }

    #[test]
    fn test_parse_leading_zeros() {
        // "A01" and "A1" denote the same address
        assert_eq!(
            CellAddress::parse("A01").unwrap(),
            CellAddress::parse("A1").unwrap()
        );
        assert_eq!(
            CellAddress::parse("C007").unwrap(),
            CellAddress::parse("C7").unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("a1").is_err()); // lowercase
        assert!(CellAddress::parse("AA1").is_err()); // multi-letter column
        assert!(CellAddress::parse("A0").is_err()); // row 0 is invalid
        assert!(CellAddress::parse("A1B").is_err()); // trailing junk
        assert!(CellAddress::parse("$A$1").is_err()); // absolute markers unsupported
        assert!(CellAddress::parse(" A1").is_err()); // no trimming
        assert!(CellAddress::parse("A-1").is_err());
        assert!(CellAddress::parse("A1048577").is_err()); // row too large
    }

    #[test]
    fn test_display_roundtrip() {
        for text in ["A1", "B2", "Z1", "D42", "A1048576"] {
            let addr = CellAddress::parse(text).unwrap();
            assert_eq!(addr.to_string(), text);
            assert_eq!(CellAddress::parse(&addr.to_string()).unwrap(), addr);
        }
    }

    #[test]
    fn test_new_bounds() {
        assert!(CellAddress::new(0, 0).is_ok());
        assert!(CellAddress::new(0, 25).is_ok());
        assert!(CellAddress::new(0, 26).is_err());
        assert!(CellAddress::new(MAX_ROWS, 0).is_err());
    }

    #[test]
    fn test_from_str() {
        let addr: CellAddress = "E5".parse().unwrap();
        assert_eq!(addr.row(), 4);
        assert_eq!(addr.col(), 4);
    }
}
