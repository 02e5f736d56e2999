//! Error types for the SmartScript toolchain
//!
//! Each stage has its own error enum. Later stages wrap the errors of earlier ones, so a caller
//! only ever handles the error type of the call it made.

use thiserror::Error;

/// Errors produced while turning source text into tokens
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A backslash outside a tag followed by something other than `\` or `{`
    #[error("invalid escape sequence '\\{found}' in text at byte {offset}")]
    InvalidTextEscape { found: char, offset: usize },

    /// A backslash as the very last character of the text
    #[error("dangling escape character at byte {offset}")]
    DanglingEscape { offset: usize },

    /// A string literal escape other than `\\ \" \n \r \t`
    #[error("invalid escape sequence '\\{found}' in string literal at byte {offset}")]
    InvalidStringEscape { found: char, offset: usize },

    /// `{$` not followed by an identifier or `=`
    #[error("invalid tag name at byte {offset}")]
    InvalidTagName { offset: usize },

    /// A character that cannot start any token inside a tag
    #[error("unexpected character '{found}' inside tag at byte {offset}")]
    UnexpectedCharacter { found: char, offset: usize },

    /// Numeric literal that does not fit or cannot be parsed
    #[error("invalid numeric literal '{literal}' at byte {offset}")]
    InvalidNumber { literal: String, offset: usize },

    /// A quoted string that is never closed
    #[error("unterminated string literal at byte {offset}")]
    UnterminatedString { offset: usize },

    /// End of input reached while a tag is still open
    #[error("unterminated tag: end of input reached before '$}}'")]
    UnterminatedTag,

    /// `next_token` called after `Eof` was already produced
    #[error("no more tokens: end of input was already reached")]
    ReadAfterEof,
}

/// Grammar violations found while building the document tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("lexing failed: {0}")]
    Lex(#[from] LexError),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("FOR tag expects a variable followed by 2 or 3 arguments, found {found} arguments")]
    ForArity { found: usize },

    #[error("FOR tag must start with a variable, found {found}")]
    ForVariable { found: String },

    #[error("invalid FOR argument {found}: expected a variable, number or string")]
    ForArgument { found: String },

    #[error("END tag takes no arguments, found {found}")]
    EndArguments { found: String },

    #[error("unbalanced END: no open FOR block to close")]
    UnbalancedEnd,

    #[error("{open} FOR block(s) not closed before end of input")]
    UnclosedFor { open: usize },

    #[error("unexpected token {found}")]
    UnexpectedToken { found: String },
}

/// Coercion and arithmetic failures of [ValueWrapper](super::ValueWrapper)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// RuntimeTypeError: the operand cannot be read as a number
    #[error("cannot use {found} as a number")]
    NotNumeric { found: String },

    /// ArithmeticError
    #[error("division by zero")]
    DivisionByZero,

    /// ArithmeticError: checked integer arithmetic overflowed
    #[error("integer overflow in {operation}")]
    Overflow { operation: &'static str },
}

/// Errors of the [Multistack](super::Multistack)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultistackError {
    #[error("stack '{0}' is empty or does not exist")]
    EmptyStack(String),
}

/// Errors that abort script execution
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Multistack(#[from] MultistackError),

    #[error("variable '{0}' is not defined")]
    MissingVariable(String),

    #[error("'{symbol}' needs {needed} operand(s) but only {available} are on the stack")]
    StackUnderflow {
        symbol: String,
        needed: usize,
        available: usize,
    },

    #[error("unknown function '@{0}'")]
    UnknownFunction(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid decimal format pattern '{0}'")]
    InvalidPattern(String),

    #[error("FOR loop over '{variable}' has a zero step and would never terminate")]
    ZeroStep { variable: String },

    #[error("FOR loop over '{variable}' exceeded {limit} iterations")]
    IterationLimit { variable: String, limit: u64 },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
