//! SmartScript
//!
//!     A SmartScript document is literal text with embedded tags. A tag is delimited by `{$`
//!     and `$}` and starts with its name:
//!
//!         {$FOR i 1 10 2$} ... {$END$}     loop over a numeric range
//!         {$= i i "*" @sin $}               echo: a small stack program whose result is written
//!
//!     Outside tags, `\\` and `\{` are the only escapes. Inside tags the lexer produces
//!     variables, integer and double constants, quoted strings, operators (`+ - * / ^`) and
//!     function names (`@name`).
//!
//! The Pipeline
//!
//!     1. Lexing ([lexing]). The lexer has two states, Basic (text) and InsideTag. The parser
//!        drives the state switch: it moves the lexer into InsideTag after a tag name and back
//!        to Basic after the tag terminator.
//!     2. Parsing ([parsing]). A stack of open blocks, seeded with the document, turns the token
//!        stream into an owned [Node] tree. The tree is never mutated afterwards.
//!     3. Execution ([exec]). A tree walker writes text, runs loops against a [Multistack] and
//!        evaluates echo programs with the coercion rules of [ValueWrapper].

pub mod ast;
pub mod error;
pub mod exec;
pub mod lexing;
pub mod multistack;
pub mod parsing;
pub mod token;
pub mod value;

pub use ast::{Element, ForLoopNode, Node, ToScriptSource};
pub use error::{ExecError, LexError, MultistackError, ParseError, ValueError};
pub use exec::{execute, EngineOptions, ExecutionContext, RequestContext, ScriptEngine};
pub use lexing::{tokenize, LexerState, ScriptLexer};
pub use multistack::Multistack;
pub use parsing::{parse_document, ScriptParser};
pub use token::{Token, TokenKind, TokenValue};
pub use value::{Number, Value, ValueWrapper};
