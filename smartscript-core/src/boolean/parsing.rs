//! Boolean expression parser
//!
//!     expression  := xor_term  ( OR  xor_term )*
//!     xor_term    := and_term  ( XOR and_term )*
//!     and_term    := not_term  ( AND not_term )*
//!     not_term    := NOT not_term | atom
//!     atom        := VARIABLE | CONSTANT | '(' expression ')'
//!
//! Each level gathers all of its operands before building a node, so `a or b or c` is one
//! `or` node with three children. The parser keeps one token of lookahead.

use crate::boolean::ast::BoolNode;
use crate::boolean::error::ParseError;
use crate::boolean::lexing::BoolLexer;
use crate::boolean::token::{BoolOperator, Token, TokenKind, TokenValue};

pub struct BoolParser<'a> {
    lexer: BoolLexer<'a>,
    current: Token,
}

impl<'a> BoolParser<'a> {
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut lexer = BoolLexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete expression; anything left over is an error
    pub fn parse(mut self) -> Result<BoolNode, ParseError> {
        let expression = self.parse_or()?;
        if !self.current.is_eof() {
            return Err(ParseError::TrailingInput {
                found: self.current.to_string(),
            });
        }
        Ok(expression)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_operator(&self, op: BoolOperator) -> bool {
        self.current.operator_value() == Some(op)
    }

    fn parse_or(&mut self) -> Result<BoolNode, ParseError> {
        let mut operands = vec![self.parse_xor()?];
        while self.at_operator(BoolOperator::Or) {
            self.advance()?;
            operands.push(self.parse_xor()?);
        }
        Ok(BoolNode::or(operands))
    }

    fn parse_xor(&mut self) -> Result<BoolNode, ParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.at_operator(BoolOperator::Xor) {
            self.advance()?;
            operands.push(self.parse_and()?);
        }
        Ok(BoolNode::xor(operands))
    }

    fn parse_and(&mut self) -> Result<BoolNode, ParseError> {
        let mut operands = vec![self.parse_not()?];
        while self.at_operator(BoolOperator::And) {
            self.advance()?;
            operands.push(self.parse_not()?);
        }
        Ok(BoolNode::and(operands))
    }

    fn parse_not(&mut self) -> Result<BoolNode, ParseError> {
        if self.at_operator(BoolOperator::Not) {
            self.advance()?;
            return Ok(BoolNode::not(self.parse_not()?));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<BoolNode, ParseError> {
        let node = match self.current.kind {
            TokenKind::OpenBracket => {
                self.advance()?;
                let inner = self.parse_or()?;
                if self.current.kind != TokenKind::ClosedBracket {
                    return Err(ParseError::MissingClosingBracket {
                        found: self.current.to_string(),
                    });
                }
                inner
            }
            TokenKind::Variable | TokenKind::Constant => match &self.current.value {
                TokenValue::Name(name) => BoolNode::variable(name.clone()),
                TokenValue::Constant(value) => BoolNode::constant(*value),
                _ => return Err(self.unexpected()),
            },
            _ => return Err(self.unexpected()),
        };
        self.advance()?;
        Ok(node)
    }

    fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedToken {
            expected: "a variable, constant or '('",
            found: self.current.to_string(),
        }
    }
}

/// Parse a boolean expression
pub fn parse_expression(source: &str) -> Result<BoolNode, ParseError> {
    BoolParser::new(source)?.parse()
}
