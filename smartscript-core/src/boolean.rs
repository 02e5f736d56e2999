//! Boolean expressions
//!
//!     An expression is built from variables, the constants `true false 0 1`, brackets and four
//!     operators, each with a word and a symbolic spelling:
//!
//!         not  !      highest, prefix
//!         and  *
//!         xor  :+:
//!         or   +      lowest
//!
//!     Keywords are case-insensitive and variable names are upper-cased, so `a AND b` and
//!     `A * B` are the same expression.
//!
//! The Pipeline
//!
//!     1. Lexing ([lexing]). A flat logos lexer, no modes.
//!     2. Parsing ([parsing]). Recursive descent, one production per precedence level. Operands
//!        of the same level are gathered into one n-ary node.
//!     3. Consumers. [assignments] evaluates a tree over truth assignments (truth tables,
//!        minterm sets) and [minimizing] turns minterm sets into minimal sum-of-products forms.

pub mod assignments;
pub mod ast;
pub mod error;
pub mod lexing;
pub mod minimizing;
pub mod parsing;
pub mod token;

pub use assignments::{Assignment, MAX_VARIABLES};
pub use ast::{BoolNode, OperatorStyle};
pub use error::{AssignmentError, LexError, MinimizerError, ParseError};
pub use lexing::{tokenize, BoolLexer};
pub use minimizing::{Mask, MaskBit, Minimizer};
pub use parsing::{parse_expression, BoolParser};
pub use token::{BoolOperator, Token, TokenKind, TokenValue};
