//! Cell value types

use std::fmt;

/// Represents the value stored in a cell
///
/// Exactly one variant is active per stored cell. An address with no entry in
/// storage means "empty"; there is no stored empty variant, so the evaluator's
/// default-to-zero rule falls out of the `Option` returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Integer literal
    Number(i64),

    /// Opaque text literal (writable, but not a recognized value for
    /// evaluation; reading such a cell yields the default 0)
    Text(String),

    /// Formula body (the text after the leading '='), stored verbatim and
    /// already validated against the formula grammar at write time
    Formula {
        /// Formula text without the '=' prefix (e.g., "A1+A2")
        text: String,
    },
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Create a new formula value
    pub fn formula<S: Into<String>>(text: S) -> Self {
        CellValue::Formula { text: text.into() }
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Try to get the value as an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text } => Some(text),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Formula { .. } => "formula",
        }
    }

    /// Render the value the way a caller entered it ("=..." for formulas)
    pub fn to_input_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Formula { text } => format!("={}", text),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Formula { text } => write!(f, "={}", text),
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as i64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}
