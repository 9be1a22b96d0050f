//! Formula grammar
//!
//! A recursive recognizer over tokens `{cell-ref, operator, digit-run}`.
//!
//! The accepted grammar, matched against the entire formula body (the text
//! after a leading '='):
//!
//! ```text
//! formula  := digits | ref (op ref)+
//! ref      := 'A'..='Z' '1'..='9'      (single-letter column, single-digit row)
//! op       := '+' | '-' | '*' | '/' | '%'
//! ```
//!
//! Validation runs once, at write time. A body that fails here is never
//! stored, so every stored formula parses cleanly during evaluation.

use crate::error::{FormulaError, FormulaResult};
use tally_sheets_core::CellAddress;

/// A binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/` (integer division, truncating toward zero)
    Divide,
    /// `%` (remainder)
    Modulo,
}

impl BinaryOp {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(BinaryOp::Add),
            b'-' => Some(BinaryOp::Subtract),
            b'*' => Some(BinaryOp::Multiply),
            b'/' => Some(BinaryOp::Divide),
            b'%' => Some(BinaryOp::Modulo),
            _ => None,
        }
    }

    /// The operator's source character
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
            BinaryOp::Modulo => '%',
        }
    }
}

/// A parsed formula body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// A constant body, e.g. "42"
    Constant(i64),
    /// A chain of cell references joined by operators, e.g. "A1+A2"
    ///
    /// Operators apply left to right; all five are single-character with
    /// equal precedence in this grammar.
    Expr {
        /// The leftmost reference
        first: CellAddress,
        /// Remaining (operator, reference) pairs, at least one
        rest: Vec<(BinaryOp, CellAddress)>,
    },
}

/// Parse a formula body into its recognized form
///
/// # Examples
/// ```
/// use tally_sheets_formula::{parse_formula, Formula};
///
/// assert_eq!(parse_formula("42").unwrap(), Formula::Constant(42));
/// assert!(parse_formula("A1+A2").is_ok());
/// assert!(parse_formula("A1&B1").is_err());
/// ```
pub fn parse_formula(body: &str) -> FormulaResult<Formula> {
    let mut scanner = Scanner::new(body);

    if body.is_empty() {
        return Err(FormulaError::InvalidFormula("empty formula body".into()));
    }

    // A pure digit run is a constant formula; anything else must be a
    // reference chain.
    if body.bytes().all(|b| b.is_ascii_digit()) {
        let value = body.parse::<i64>().map_err(|_| {
            FormulaError::InvalidFormula(format!("constant out of range: '{}'", body))
        })?;
        return Ok(Formula::Constant(value));
    }

    let first = scanner.cell_ref()?;
    let mut rest = Vec::new();

    while !scanner.is_at_end() {
        let op = scanner.operator()?;
        let reference = scanner.cell_ref()?;
        rest.push((op, reference));
    }

    if rest.is_empty() {
        // "A1" alone has no operator and is out of grammar
        return Err(FormulaError::InvalidFormula(format!(
            "expected an operator after cell reference in '{}'",
            body
        )));
    }

    Ok(Formula::Expr { first, rest })
}

/// Validate a formula body without keeping the parse
pub fn validate(body: &str) -> FormulaResult<()> {
    parse_formula(body).map(|_| ())
}

/// Byte scanner over a formula body
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Scan a formula-body cell reference: one uppercase letter plus one
    /// row digit. Row digit '0' names no addressable cell (rows are
    /// 1-based) and is rejected here rather than at evaluation time.
    fn cell_ref(&mut self) -> FormulaResult<CellAddress> {
        let letter = match self.peek() {
            Some(b) if b.is_ascii_uppercase() => b,
            _ => {
                return Err(FormulaError::InvalidFormula(format!(
                    "expected cell reference at position {} in '{}'",
                    self.pos, self.input
                )))
            }
        };
        self.pos += 1;

        let digit = match self.peek() {
            Some(b @ b'1'..=b'9') => b,
            Some(b'0') => {
                return Err(FormulaError::InvalidFormula(format!(
                    "row 0 in cell reference at position {} in '{}'",
                    self.pos, self.input
                )))
            }
            _ => {
                return Err(FormulaError::InvalidFormula(format!(
                    "expected row digit at position {} in '{}'",
                    self.pos, self.input
                )))
            }
        };
        self.pos += 1;

        // Wider row numbers inside formula bodies are out of grammar; "A10"
        // must fail rather than scan as A1 + junk.
        if let Some(b) = self.peek() {
            if b.is_ascii_digit() {
                return Err(FormulaError::InvalidFormula(format!(
                    "cell references take a single row digit, found '{}' in '{}'",
                    (b as char),
                    self.input
                )));
            }
        }

        let row = u32::from(digit - b'1');
        let col = letter - b'A';
        Ok(CellAddress::new(row, col)?)
    }

    fn operator(&mut self) -> FormulaResult<BinaryOp> {
        let op = self
            .peek()
            .and_then(BinaryOp::from_byte)
            .ok_or_else(|| {
                FormulaError::InvalidFormula(format!(
                    "expected operator at position {} in '{}'",
                    self.pos, self.input
                ))
            })?;
        self.pos += 1;
        Ok(op)
    }
}
