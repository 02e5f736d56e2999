//! Boolean expression lexer
//!
//! A single flat state. Identifiers are checked against the keywords `and or xor not true
//! false` without regard to case; every other identifier is a variable and is upper-cased.

use crate::boolean::error::LexError;
use crate::boolean::token::{BoolOperator, Token};
use log::trace;
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Digits,

    #[token("*")]
    And,

    #[token("+")]
    Or,

    #[token("!")]
    Not,

    #[token(":+:")]
    Xor,

    #[token("(")]
    OpenBracket,

    #[token(")")]
    ClosedBracket,
}

pub struct BoolLexer<'a> {
    source: &'a str,
    raw: logos::Lexer<'a, RawToken>,
    current: Option<Token>,
    finished: bool,
}

impl<'a> BoolLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            raw: RawToken::lexer(source),
            current: None,
            finished: false,
        }
    }

    /// The last token produced, if any
    pub fn token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.finished {
            return Err(LexError::ReadAfterEof);
        }

        let token = match self.raw.next() {
            None => {
                self.finished = true;
                let end = self.source.len();
                Token::eof().with_span(end..end)
            }
            Some(Ok(raw)) => self.convert(raw)?,
            Some(Err(())) => {
                let span = self.raw.span();
                let found = self.source[span.start..].chars().next().unwrap_or(' ');
                return Err(LexError::UnexpectedCharacter {
                    found,
                    offset: span.start,
                });
            }
        };

        trace!("boolean token {}", token);
        self.current = Some(token.clone());
        Ok(token)
    }

    fn convert(&self, raw: RawToken) -> Result<Token, LexError> {
        let span = self.raw.span();
        let slice = self.raw.slice();
        let token = match raw {
            RawToken::Identifier => match slice.to_ascii_lowercase().as_str() {
                "true" => Token::constant(true),
                "false" => Token::constant(false),
                word => match BoolOperator::from_keyword(word) {
                    Some(op) => Token::operator(op),
                    None => Token::variable(slice.to_ascii_uppercase()),
                },
            },
            RawToken::Digits => match slice {
                "0" => Token::constant(false),
                "1" => Token::constant(true),
                _ => {
                    return Err(LexError::InvalidConstant {
                        literal: slice.to_string(),
                        offset: span.start,
                    })
                }
            },
            RawToken::And => Token::operator(BoolOperator::And),
            RawToken::Or => Token::operator(BoolOperator::Or),
            RawToken::Not => Token::operator(BoolOperator::Not),
            RawToken::Xor => Token::operator(BoolOperator::Xor),
            RawToken::OpenBracket => Token::open_bracket(),
            RawToken::ClosedBracket => Token::closed_bracket(),
        };
        Ok(token.with_span(span))
    }
}

/// Lex a whole expression, the Eof token included
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = BoolLexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
