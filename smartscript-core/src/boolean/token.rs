//! Boolean expression tokens

use serde::Serialize;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Variable,
    Constant,
    Operator,
    OpenBracket,
    ClosedBracket,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoolOperator {
    Not,
    And,
    Xor,
    Or,
}

impl BoolOperator {
    /// Lower-case keyword, also used as the node name in the tree
    pub fn keyword(self) -> &'static str {
        match self {
            BoolOperator::Not => "not",
            BoolOperator::And => "and",
            BoolOperator::Xor => "xor",
            BoolOperator::Or => "or",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BoolOperator::Not => "!",
            BoolOperator::And => "*",
            BoolOperator::Xor => ":+:",
            BoolOperator::Or => "+",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "not" => Some(BoolOperator::Not),
            "and" => Some(BoolOperator::And),
            "xor" => Some(BoolOperator::Xor),
            "or" => Some(BoolOperator::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    None,
    Name(String),
    Constant(bool),
    Operator(BoolOperator),
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Range<usize>>,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue) -> Self {
        Self {
            kind,
            value,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Variable, TokenValue::Name(name.into()))
    }

    pub fn constant(value: bool) -> Self {
        Self::new(TokenKind::Constant, TokenValue::Constant(value))
    }

    pub fn operator(op: BoolOperator) -> Self {
        Self::new(TokenKind::Operator, TokenValue::Operator(op))
    }

    pub fn open_bracket() -> Self {
        Self::new(TokenKind::OpenBracket, TokenValue::None)
    }

    pub fn closed_bracket() -> Self {
        Self::new(TokenKind::ClosedBracket, TokenValue::None)
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, TokenValue::None)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn operator_value(&self) -> Option<BoolOperator> {
        match self.value {
            TokenValue::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::None => write!(f, "{:?}", self.kind),
            TokenValue::Name(name) => write!(f, "{:?}({:?})", self.kind, name),
            TokenValue::Constant(value) => write!(f, "{:?}({})", self.kind, value),
            TokenValue::Operator(op) => write!(f, "{:?}({})", self.kind, op.keyword()),
        }
    }
}
