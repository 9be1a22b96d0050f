//! # tally-sheets-formula
//!
//! Formula grammar and evaluator for tally-sheets.
//!
//! This crate provides:
//! - Grammar validation for formula bodies (constant, or cell references
//!   joined by `+ - * / %`)
//! - Recursive evaluation over a worksheet with circular-reference detection
//!
//! ## Example
//!
//! ```rust,ignore
//! use tally_sheets_formula::{validate, evaluate};
//!
//! validate("A1+A2")?;
//! let value = evaluate(&sheet, addr)?;
//! ```

pub mod error;
pub mod evaluator;
pub mod grammar;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext};
pub use grammar::{parse_formula, validate, BinaryOp, Formula};
