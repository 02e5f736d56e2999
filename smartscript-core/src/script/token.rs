//! Token definitions for SmartScript
//!
//! Tokens are plain values: a kind, a payload and optionally the byte range they came from.
//! Equality looks at kind and payload only, so tokens produced from different sources compare
//! equal when they mean the same thing.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// The closed set of token kinds the script lexer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Literal text outside tags, escapes already resolved
    Text,
    /// Tag opener with its (upper-cased) name, or `=` for echo
    Tag,
    Variable,
    Integer,
    Double,
    String,
    Operator,
    Function,
    /// The `$}` marker
    TerminateTag,
    Eof,
}

/// Payload of a token
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    None,
    Text(String),
    Integer(i64),
    Double(f64),
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::None, TokenValue::None) => true,
            (TokenValue::Text(a), TokenValue::Text(b)) => a == b,
            (TokenValue::Integer(a), TokenValue::Integer(b)) => a == b,
            (TokenValue::Double(a), TokenValue::Double(b)) => a.to_bits() == b.to_bits() || a == b,
            _ => false,
        }
    }
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

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, TokenValue::Text(content.into()))
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Tag, TokenValue::Text(name.into()))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Variable, TokenValue::Text(name.into()))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(TokenKind::Integer, TokenValue::Integer(value))
    }

    pub fn double(value: f64) -> Self {
        Self::new(TokenKind::Double, TokenValue::Double(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(TokenKind::String, TokenValue::Text(value.into()))
    }

    pub fn operator(symbol: impl Into<String>) -> Self {
        Self::new(TokenKind::Operator, TokenValue::Text(symbol.into()))
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Function, TokenValue::Text(name.into()))
    }

    pub fn terminate_tag() -> Self {
        Self::new(TokenKind::TerminateTag, TokenValue::None)
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, TokenValue::None)
    }

    /// The textual payload, for kinds that carry one
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
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
            TokenValue::Text(s) => write!(f, "{:?}({:?})", self.kind, s),
            TokenValue::Integer(i) => write!(f, "{:?}({})", self.kind, i),
            TokenValue::Double(d) => write!(f, "{:?}({:?})", self.kind, d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_span() {
        let a = Token::variable("i").with_span(3..4);
        let b = Token::variable("i");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_compares_kind_and_value() {
        assert_ne!(Token::variable("i"), Token::string("i"));
        assert_ne!(Token::integer(1), Token::integer(2));
        assert_eq!(Token::double(1.5), Token::double(1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::tag("FOR").to_string(), "Tag(\"FOR\")");
        assert_eq!(Token::integer(-3).to_string(), "Integer(-3)");
        assert_eq!(Token::terminate_tag().to_string(), "TerminateTag");
    }
}
