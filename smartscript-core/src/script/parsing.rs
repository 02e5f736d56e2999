//! SmartScript parser
//!
//!     The parser pulls tokens from a [ScriptLexer] and keeps an explicit stack of open blocks,
//!     seeded with the document root:
//!
//!         Text         appended to the block on top of the stack
//!         {$FOR ...$}  a new block is pushed; its node is built when the block closes
//!         {$= ...$}    an Echo node appended to the top block
//!         {$END$}      the top block is popped and attached to its parent as a ForLoop
//!
//!     The stack lives only while parsing. Closed blocks become owned nodes, so the finished tree
//!     has no back references and is never touched again.

use crate::script::ast::{Element, ForLoopNode, Node};
use crate::script::error::ParseError;
use crate::script::lexing::{LexerState, ScriptLexer};
use crate::script::token::{Token, TokenKind};
use log::debug;

/// Parses a source string into a document tree on construction
#[derive(Debug, Clone)]
pub struct ScriptParser {
    document: Node,
}

impl ScriptParser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let document = TreeBuilder::new(source).build()?;
        Ok(Self { document })
    }

    /// The root Document node
    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn into_document(self) -> Node {
        self.document
    }
}

/// Parse a source string into its Document node
pub fn parse_document(source: &str) -> Result<Node, ParseError> {
    ScriptParser::new(source).map(ScriptParser::into_document)
}

struct ForHeader {
    variable: String,
    start: Element,
    end: Element,
    step: Option<Element>,
}

/// A block that has been opened but not yet closed
struct OpenBlock {
    header: Option<ForHeader>,
    children: Vec<Node>,
}

impl OpenBlock {
    fn root() -> Self {
        Self {
            header: None,
            children: Vec::new(),
        }
    }
}

struct TreeBuilder<'a> {
    lexer: ScriptLexer<'a>,
    stack: Vec<OpenBlock>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: ScriptLexer::new(source),
            stack: vec![OpenBlock::root()],
        }
    }

    fn build(mut self) -> Result<Node, ParseError> {
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Text => {
                    let content = token.as_str().unwrap_or_default().to_string();
                    self.top().children.push(Node::text(content));
                }
                TokenKind::Tag => {
                    let name = token.as_str().unwrap_or_default().to_string();
                    self.lexer.set_state(LexerState::InsideTag);
                    self.parse_tag(&name)?;
                    self.lexer.set_state(LexerState::Basic);
                }
                _ => return Err(unexpected(&token)),
            }
        }

        if self.stack.len() > 1 {
            return Err(ParseError::UnclosedFor {
                open: self.stack.len() - 1,
            });
        }
        let root = self.stack.pop().map(|b| b.children).unwrap_or_default();
        Ok(Node::document(root))
    }

    fn top(&mut self) -> &mut OpenBlock {
        // The root block is only removed once parsing has finished
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn parse_tag(&mut self, name: &str) -> Result<(), ParseError> {
        match name {
            "FOR" => self.parse_for(),
            "=" => self.parse_echo(),
            "END" => self.parse_end(),
            other => Err(ParseError::UnknownTag(other.to_string())),
        }
    }

    /// Read elements up to and including the tag terminator
    fn collect_elements(&mut self) -> Result<Vec<Element>, ParseError> {
        let mut elements = Vec::new();
        loop {
            let token = self.lexer.next_token()?;
            if token.kind == TokenKind::TerminateTag {
                return Ok(elements);
            }
            let element = Element::from_token(&token).ok_or_else(|| unexpected(&token))?;
            elements.push(element);
        }
    }

    fn parse_for(&mut self) -> Result<(), ParseError> {
        let mut elements = self.collect_elements()?.into_iter();

        let variable = match elements.next() {
            Some(Element::Variable(name)) => name,
            Some(other) => {
                return Err(ParseError::ForVariable {
                    found: format!("{:?}", other),
                })
            }
            None => return Err(ParseError::ForArity { found: 0 }),
        };

        let args: Vec<Element> = elements.collect();
        if !(2..=3).contains(&args.len()) {
            return Err(ParseError::ForArity { found: args.len() });
        }
        if let Some(bad) = args.iter().find(|a| !a.is_loop_argument()) {
            return Err(ParseError::ForArgument {
                found: format!("{:?}", bad),
            });
        }

        let mut args = args.into_iter();
        let (start, end, step) = match (args.next(), args.next(), args.next()) {
            (Some(start), Some(end), step) => (start, end, step),
            _ => return Err(ParseError::ForArity { found: 0 }),
        };

        debug!("opening FOR block over '{}'", variable);
        self.stack.push(OpenBlock {
            header: Some(ForHeader {
                variable,
                start,
                end,
                step,
            }),
            children: Vec::new(),
        });
        Ok(())
    }

    fn parse_echo(&mut self) -> Result<(), ParseError> {
        let mut elements = self.collect_elements()?;
        if elements.is_empty() {
            elements.push(Element::StringLiteral(String::new()));
        }
        self.top().children.push(Node::echo(elements));
        Ok(())
    }

    fn parse_end(&mut self) -> Result<(), ParseError> {
        let elements = self.collect_elements()?;
        if let Some(first) = elements.first() {
            return Err(ParseError::EndArguments {
                found: format!("{:?}", first),
            });
        }
        if self.stack.len() <= 1 {
            return Err(ParseError::UnbalancedEnd);
        }

        let block = self.stack.pop().ok_or(ParseError::UnbalancedEnd)?;
        let header = block.header.ok_or(ParseError::UnbalancedEnd)?;
        debug!(
            "closing FOR block over '{}' with {} children",
            header.variable,
            block.children.len()
        );
        let node = ForLoopNode::new(
            header.variable,
            header.start,
            header.end,
            header.step,
            block.children,
        );
        self.top().children.push(Node::for_loop(node));
        Ok(())
    }
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.to_string(),
    }
}
