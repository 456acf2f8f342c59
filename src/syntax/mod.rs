//! Narrow literal and expression parser.
//!
//! Used by the codec to read preference documents and by the evaluator to
//! read dynamic expressions. Parsing never executes anything: documents are
//! restricted to assignments of literal values, and expressions are only
//! evaluated later, explicitly, by [`crate::eval::Evaluator`].

mod ast;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

pub use ast::{BinaryOp, Expr, Statement, Target, UnaryOp};

use lexer::tokenize;
use parser::Parser;
use thiserror::Error;

use crate::value::Value;

/// A parse failure with its 1-based source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct SyntaxError {
    /// Line of the offending token
    pub line: usize,
    /// Column of the offending token
    pub column: usize,
    /// What was wrong
    pub message: String,
}

impl SyntaxError {
    /// Creates a syntax error at the given position.
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Parses a single expression.
///
/// # Errors
/// Returns `SyntaxError` if the text is not exactly one well-formed expression.
pub fn parse_expression(source: &str) -> Result<Expr, SyntaxError> {
    Parser::new(tokenize(source)?).expression_only()
}

/// Parses a document made of `name = expr` and `name[key] = expr` lines.
///
/// # Errors
/// Returns `SyntaxError` on the first malformed statement.
pub fn parse_document(source: &str) -> Result<Vec<Statement>, SyntaxError> {
    Parser::new(tokenize(source)?).statements()
}

/// Parses text that must be a single literal value.
///
/// # Errors
/// Returns `SyntaxError` if the text does not parse or contains anything
/// other than literals.
pub fn parse_literal(source: &str) -> Result<Value, SyntaxError> {
    parse_expression(source)?
        .to_literal()
        .map_err(|message| SyntaxError::new(1, 1, message))
}
