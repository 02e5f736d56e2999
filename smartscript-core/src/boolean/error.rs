//! Error types for the boolean toolchain

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{found}' at byte {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    /// Digit runs other than a single `0` or `1`
    #[error("invalid constant '{literal}' at byte {offset}: only 0 and 1 are allowed")]
    InvalidConstant { literal: String, offset: usize },

    #[error("no more tokens: end of input was already reached")]
    ReadAfterEof,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexing failed: {0}")]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("missing closing bracket, found {found}")]
    MissingClosingBracket { found: String },

    #[error("unexpected {found} after the end of the expression")]
    TrailingInput { found: String },
}

/// Invalid minimizer input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinimizerError {
    #[error("{count} variables given, at most {max} are supported")]
    TooManyVariables { count: usize, max: usize },

    #[error("variable '{0}' is declared more than once")]
    DuplicateVariable(String),

    #[error("index {index} is both a minterm and a don't-care")]
    Overlap { index: u32 },

    #[error("index {index} does not fit {count} variable(s)")]
    IndexOutOfRange { index: u32, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("{count} variables given, at most {max} are supported")]
    TooManyVariables { count: usize, max: usize },

    #[error("variable '{0}' has no value in the assignment")]
    UnboundVariable(String),
}
