//! Formula evaluator
//!
//! Resolves a target address to an integer by recursive depth-first
//! resolution over the cell store, detecting circular references along the
//! current dependency path.

use std::collections::HashSet;

use crate::error::{FormulaError, FormulaResult};
use crate::grammar::{parse_formula, BinaryOp, Formula};
use tally_sheets_core::{CellAddress, CellValue, Worksheet};

/// Bookkeeping for one top-level evaluation call
///
/// Holds the set of addresses on the current recursion path. Created fresh
/// per [`evaluate`] call and discarded at its end; never shared across calls.
/// Entries are removed when a branch completes, so a cell referenced from two
/// sibling branches (a diamond) is not mistaken for a cycle.
#[derive(Debug, Default)]
pub struct EvaluationContext {
    visiting: HashSet<CellAddress>,
}

impl EvaluationContext {
    fn new() -> Self {
        Self::default()
    }
}

/// Evaluate the cell at `addr` to an integer
///
/// Resolution rules:
/// - an absent cell evaluates to 0
/// - an integer literal evaluates to itself
/// - an opaque text literal evaluates to 0
/// - a formula resolves its references recursively and folds the operator
///   chain left to right with integer arithmetic (truncating toward zero)
///
/// Fails with [`FormulaError::CircularReference`] when the dependency chain
/// revisits an address already being resolved, and with
/// [`FormulaError::DivisionByZero`] on a zero divisor.
///
/// # Examples
/// ```
/// use tally_sheets_core::Worksheet;
/// use tally_sheets_core::CellAddress;
/// use tally_sheets_formula::evaluate;
///
/// let mut sheet = Worksheet::new("Sheet1");
/// sheet.set_cell_value("A1", 13).unwrap();
/// sheet.set_cell_value("A2", 14).unwrap();
/// sheet.set_cell_formula_at(CellAddress::parse("A3").unwrap(), "A1+A2");
///
/// let total = evaluate(&sheet, CellAddress::parse("A3").unwrap()).unwrap();
/// assert_eq!(total, 27);
/// ```
pub fn evaluate(sheet: &Worksheet, addr: CellAddress) -> FormulaResult<i64> {
    let mut ctx = EvaluationContext::new();
    resolve(sheet, addr, &mut ctx)
}

fn resolve(sheet: &Worksheet, addr: CellAddress, ctx: &mut EvaluationContext) -> FormulaResult<i64> {
    if !ctx.visiting.insert(addr) {
        return Err(FormulaError::CircularReference(addr.to_string()));
    }

    let result = match sheet.cell_at(addr) {
        None => Ok(0),
        Some(CellValue::Number(n)) => Ok(*n),
        // Non-numeric literals are not a recognized value for evaluation
        Some(CellValue::Text(_)) => Ok(0),
        Some(CellValue::Formula { text }) => resolve_formula(sheet, addr, text, ctx),
    };

    ctx.visiting.remove(&addr);
    result
}

fn resolve_formula(
    sheet: &Worksheet,
    addr: CellAddress,
    text: &str,
    ctx: &mut EvaluationContext,
) -> FormulaResult<i64> {
    // Stored formulas were validated at write time, so a parse failure here
    // indicates the store was populated outside the validated write path.
    match parse_formula(text)? {
        Formula::Constant(value) => Ok(value),
        Formula::Expr { first, rest } => {
            let mut acc = resolve(sheet, first, ctx)?;
            for (op, reference) in rest {
                let rhs = resolve(sheet, reference, ctx)?;
                acc = apply(op, acc, rhs, addr)?;
            }
            Ok(acc)
        }
    }
}

fn apply(op: BinaryOp, lhs: i64, rhs: i64, at: CellAddress) -> FormulaResult<i64> {
    match op {
        BinaryOp::Add => Ok(lhs.wrapping_add(rhs)),
        BinaryOp::Subtract => Ok(lhs.wrapping_sub(rhs)),
        BinaryOp::Multiply => Ok(lhs.wrapping_mul(rhs)),
        BinaryOp::Divide => {
            if rhs == 0 {
                Err(FormulaError::DivisionByZero(at.to_string()))
            } else {
                Ok(lhs.wrapping_div(rhs))
            }
        }
        BinaryOp::Modulo => {
            if rhs == 0 {
                Err(FormulaError::DivisionByZero(at.to_string()))
            } else {
                Ok(lhs.wrapping_rem(rhs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    fn sheet_with(cells: &[(&str, CellValue)]) -> Worksheet {
        let mut sheet = Worksheet::new("Sheet1");
        for (a, v) in cells {
            sheet.set_cell_value_at(addr(a), v.clone());
        }
        sheet
    }

    #[test]
    fn test_absent_cell_is_zero() {
        let sheet = Worksheet::new("Sheet1");
        assert_eq!(evaluate(&sheet, addr("F6")).unwrap(), 0);
    }

    #[test]
    fn test_integer_literal() {
        let sheet = sheet_with(&[("A1", CellValue::Number(13))]);
        assert_eq!(evaluate(&sheet, addr("A1")).unwrap(), 13);
    }

    #[test]
    fn test_text_reads_as_zero() {
        let sheet = sheet_with(&[("A1", CellValue::text("hello"))]);
        assert_eq!(evaluate(&sheet, addr("A1")).unwrap(), 0);
    }

    #[test]
    fn test_constant_formula() {
        let sheet = sheet_with(&[("A1", CellValue::formula("42"))]);
        assert_eq!(evaluate(&sheet, addr("A1")).unwrap(), 42);
    }

    #[test]
    fn test_binary_addition() {
        let sheet = sheet_with(&[
            ("A1", CellValue::formula("13")),
            ("A2", CellValue::formula("14")),
            ("A3", CellValue::formula("A1+A2")),
        ]);
        assert_eq!(evaluate(&sheet, addr("A3")).unwrap(), 27);
    }

    #[test]
    fn test_operator_chain_folds_left() {
        let sheet = sheet_with(&[
            ("A1", CellValue::Number(10)),
            ("B1", CellValue::Number(4)),
            ("C1", CellValue::Number(3)),
            ("D1", CellValue::formula("A1-B1-C1")),
        ]);
        // (10 - 4) - 3, not 10 - (4 - 3)
        assert_eq!(evaluate(&sheet, addr("D1")).unwrap(), 3);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        let sheet = sheet_with(&[
            ("A1", CellValue::Number(7)),
            ("B1", CellValue::Number(2)),
            ("C1", CellValue::formula("A1/B1")),
            ("A2", CellValue::Number(-7)),
            ("C2", CellValue::formula("A2/B1")),
        ]);
        assert_eq!(evaluate(&sheet, addr("C1")).unwrap(), 3);
        assert_eq!(evaluate(&sheet, addr("C2")).unwrap(), -3);
    }

    #[test]
    fn test_modulo() {
        let sheet = sheet_with(&[
            ("A1", CellValue::Number(7)),
            ("B1", CellValue::Number(3)),
            ("C1", CellValue::formula("A1%B1")),
        ]);
        assert_eq!(evaluate(&sheet, addr("C1")).unwrap(), 1);
    }

    #[test]
    fn test_division_by_zero() {
        let sheet = sheet_with(&[
            ("A1", CellValue::Number(7)),
            ("C1", CellValue::formula("A1/B1")),
            ("D1", CellValue::formula("A1%B1")),
        ]);
        assert!(matches!(
            evaluate(&sheet, addr("C1")),
            Err(FormulaError::DivisionByZero(_))
        ));
        assert!(matches!(
            evaluate(&sheet, addr("D1")),
            Err(FormulaError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_direct_self_reference() {
        let sheet = sheet_with(&[("A1", CellValue::formula("A1+A1"))]);
        assert!(matches!(
            evaluate(&sheet, addr("A1")),
            Err(FormulaError::CircularReference(_))
        ));
    }

    #[test]
    fn test_two_cycle() {
        let sheet = sheet_with(&[
            ("A1", CellValue::formula("B1+C1")),
            ("B1", CellValue::formula("A1+C1")),
        ]);
        assert!(matches!(
            evaluate(&sheet, addr("A1")),
            Err(FormulaError::CircularReference(_))
        ));
        assert!(matches!(
            evaluate(&sheet, addr("B1")),
            Err(FormulaError::CircularReference(_))
        ));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // A1 and A2 both reference B1; A3 sums them. The shared reference
        // sits on two sibling branches, not on one path.
        let sheet = sheet_with(&[
            ("B1", CellValue::Number(5)),
            ("A1", CellValue::formula("B1+C9")),
            ("A2", CellValue::formula("B1+C9")),
            ("A3", CellValue::formula("A1+A2")),
        ]);
        assert_eq!(evaluate(&sheet, addr("A3")).unwrap(), 10);
    }

    #[test]
    fn test_fresh_context_per_call() {
        let sheet = sheet_with(&[
            ("A1", CellValue::Number(1)),
            ("B1", CellValue::formula("A1+A1")),
        ]);
        // Two consecutive evaluations must not share visited state
        assert_eq!(evaluate(&sheet, addr("B1")).unwrap(), 2);
        assert_eq!(evaluate(&sheet, addr("B1")).unwrap(), 2);
    }
}
