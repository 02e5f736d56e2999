//! SmartScript lexer
//!
//!     The lexer works on demand: every call to [ScriptLexer::next_token] produces exactly one
//!     token, and [ScriptLexer::token] re-reads the last one without advancing.
//!
//! States
//!
//!     Basic       Text mode. Characters accumulate into a Text token until an unescaped `{$`
//!                 or the end of input. At `{$` the lexer emits a Tag token carrying the tag
//!                 name (upper-cased) or `=`.
//!     InsideTag   Tag mode. Whitespace separates tokens; the inside-tag vocabulary is
//!                 recognised by the logos definitions in [tag_tokens]. `$}` emits TerminateTag.
//!
//!     The lexer never switches state on its own. The consumer (the parser, or [tokenize])
//!     calls [ScriptLexer::set_state] after a Tag and after a TerminateTag token.

pub mod tag_tokens;

use crate::script::error::LexError;
use crate::script::token::{Token, TokenKind};
use log::trace;
use logos::Logos;
use tag_tokens::TagToken;

const TAG_OPEN: &str = "{$";

/// Lexer mode, switched by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerState {
    Basic,
    InsideTag,
}

#[derive(Debug, Clone)]
pub struct ScriptLexer<'a> {
    source: &'a str,
    position: usize,
    state: LexerState,
    current: Option<Token>,
    finished: bool,
}

impl<'a> ScriptLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            state: LexerState::Basic,
            current: None,
            finished: false,
        }
    }

    pub fn set_state(&mut self, state: LexerState) {
        self.state = state;
    }

    pub fn state(&self) -> LexerState {
        self.state
    }

    /// The last token produced, if any
    pub fn token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Produce the next token in the current state
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.finished {
            return Err(LexError::ReadAfterEof);
        }

        let token = match self.state {
            LexerState::Basic => self.lex_basic()?,
            LexerState::InsideTag => self.lex_inside_tag()?,
        };

        if token.is_eof() {
            self.finished = true;
        }
        trace!("script token {}", token);
        self.current = Some(token.clone());
        Ok(token)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn lex_basic(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        if start >= self.source.len() {
            return Ok(Token::eof().with_span(start..start));
        }
        if self.rest().starts_with(TAG_OPEN) {
            return self.lex_tag_open();
        }

        let mut text = String::new();
        let mut chars = self.rest().char_indices().peekable();
        let mut end = self.source.len();

        while let Some((offset, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, escaped @ ('\\' | '{'))) => text.push(escaped),
                    Some((_, found)) => {
                        return Err(LexError::InvalidTextEscape {
                            found,
                            offset: start + offset,
                        })
                    }
                    None => {
                        return Err(LexError::DanglingEscape {
                            offset: start + offset,
                        })
                    }
                },
                '{' if matches!(chars.peek(), Some((_, '$'))) => {
                    end = start + offset;
                    break;
                }
                _ => text.push(c),
            }
        }

        self.position = end;
        Ok(Token::text(text).with_span(start..end))
    }

    fn lex_tag_open(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.position += TAG_OPEN.len();
        self.skip_whitespace();

        let rest = self.rest();
        if rest.starts_with('=') {
            self.position += 1;
            return Ok(Token::tag("=").with_span(start..self.position));
        }

        match rest.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                let len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                let name = rest[..len].to_ascii_uppercase();
                self.position += len;
                Ok(Token::tag(name).with_span(start..self.position))
            }
            Some(_) => Err(LexError::InvalidTagName {
                offset: self.position,
            }),
            None => Err(LexError::UnterminatedTag),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t', '\r', '\n', '\u{c}']);
        self.position += rest.len() - trimmed.len();
    }

    fn lex_inside_tag(&mut self) -> Result<Token, LexError> {
        let base = self.position;
        let rest = self.rest();
        let mut lexer = TagToken::lexer(rest);

        let kind = match lexer.next() {
            None => return Err(LexError::UnterminatedTag),
            Some(Ok(kind)) => kind,
            Some(Err(())) => {
                let offset = base + lexer.span().start;
                return Err(match rest[lexer.span().start..].chars().next() {
                    Some('"') => LexError::UnterminatedString { offset },
                    Some(found) => LexError::UnexpectedCharacter { found, offset },
                    None => LexError::UnterminatedTag,
                });
            }
        };

        let span = (base + lexer.span().start)..(base + lexer.span().end);
        let slice = lexer.slice();
        self.position = span.end;

        let token = match kind {
            TagToken::TerminateTag => Token::terminate_tag(),
            TagToken::Identifier => Token::variable(slice),
            TagToken::Function => Token::function(&slice[1..]),
            TagToken::Operator => Token::operator(slice),
            TagToken::Integer => {
                let value = slice.parse::<i64>().map_err(|_| LexError::InvalidNumber {
                    literal: slice.to_string(),
                    offset: span.start,
                })?;
                Token::integer(value)
            }
            TagToken::Double => match slice.parse::<f64>() {
                Ok(value) if value.is_finite() => Token::double(value),
                _ => {
                    return Err(LexError::InvalidNumber {
                        literal: slice.to_string(),
                        offset: span.start,
                    })
                }
            },
            TagToken::String => Token::string(unescape_string(slice, span.start)?),
        };

        Ok(token.with_span(span))
    }
}

/// Resolve the escapes of a quoted string literal (quotes included in `literal`)
fn unescape_string(literal: &str, offset: usize) -> Result<String, LexError> {
    let inner = &literal[1..literal.len() - 1];
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();

    while let Some((index, c)) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '\\')) => value.push('\\'),
            Some((_, '"')) => value.push('"'),
            Some((_, 'n')) => value.push('\n'),
            Some((_, 'r')) => value.push('\r'),
            Some((_, 't')) => value.push('\t'),
            Some((_, found)) => {
                return Err(LexError::InvalidStringEscape {
                    found,
                    offset: offset + 1 + index,
                })
            }
            // The logos pattern never lets a string end on a lone backslash
            None => return Err(LexError::UnterminatedString { offset }),
        }
    }

    Ok(value)
}

/// Tokenize a whole document, switching states the way the parser does
///
/// The returned list ends with the Eof token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = ScriptLexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        match token.kind {
            TokenKind::Tag => lexer.set_state(LexerState::InsideTag),
            TokenKind::TerminateTag => lexer.set_state(LexerState::Basic),
            TokenKind::Eof => {
                tokens.push(token);
                return Ok(tokens);
            }
            _ => {}
        }
        tokens.push(token);
    }
}
