//! SmartScript document tree
//!
//!     Document     root, owns the top-level nodes
//!     Text         literal text, escapes already resolved
//!     ForLoop      a loop variable, start, end, optional step, and a body
//!     Echo         a non-empty list of elements evaluated as a stack program
//!
//! Only Document and ForLoop own children. The tree is built once by the parser and only read
//! afterwards; every node exclusively owns its children.

pub mod render;

pub use render::ToScriptSource;

use crate::script::token::{Token, TokenKind, TokenValue};
use serde::Serialize;

/// Tolerance used when comparing double constants
pub const DOUBLE_TOLERANCE: f64 = 1e-9;

/// A typed leaf value carried inside a tag
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Element {
    Variable(String),
    ConstantInteger(i64),
    ConstantDouble(f64),
    StringLiteral(String),
    Operator(String),
    Function(String),
}

impl Element {
    /// Convert an inside-tag token into an element
    pub fn from_token(token: &Token) -> Option<Element> {
        let element = match (&token.kind, &token.value) {
            (TokenKind::Variable, TokenValue::Text(name)) => Element::Variable(name.clone()),
            (TokenKind::Integer, TokenValue::Integer(i)) => Element::ConstantInteger(*i),
            (TokenKind::Double, TokenValue::Double(d)) => Element::ConstantDouble(*d),
            (TokenKind::String, TokenValue::Text(s)) => Element::StringLiteral(s.clone()),
            (TokenKind::Operator, TokenValue::Text(s)) => Element::Operator(s.clone()),
            (TokenKind::Function, TokenValue::Text(s)) => Element::Function(s.clone()),
            _ => return None,
        };
        Some(element)
    }

    /// Plain textual form, without quoting or escaping
    pub fn as_text(&self) -> String {
        match self {
            Element::Variable(name) => name.clone(),
            Element::ConstantInteger(i) => i.to_string(),
            Element::ConstantDouble(d) => d.to_string(),
            Element::StringLiteral(s) => s.clone(),
            Element::Operator(symbol) => symbol.clone(),
            Element::Function(name) => format!("@{}", name),
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Element::Variable(_))
    }

    /// Whether the element may appear as a FOR start, end or step
    pub fn is_loop_argument(&self) -> bool {
        matches!(
            self,
            Element::Variable(_)
                | Element::ConstantInteger(_)
                | Element::ConstantDouble(_)
                | Element::StringLiteral(_)
        )
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Variable(a), Element::Variable(b)) => a == b,
            (Element::ConstantInteger(a), Element::ConstantInteger(b)) => a == b,
            (Element::ConstantDouble(a), Element::ConstantDouble(b)) => {
                (a - b).abs() < DOUBLE_TOLERANCE
            }
            (Element::StringLiteral(a), Element::StringLiteral(b)) => a == b,
            (Element::Operator(a), Element::Operator(b)) => a == b,
            (Element::Function(a), Element::Function(b)) => a == b,
            _ => false,
        }
    }
}

/// A FOR block: `{$FOR variable start end [step]$} children {$END$}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForLoopNode {
    pub variable: String,
    pub start: Element,
    pub end: Element,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Element>,
    pub children: Vec<Node>,
}

impl ForLoopNode {
    pub fn new(
        variable: impl Into<String>,
        start: Element,
        end: Element,
        step: Option<Element>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            variable: variable.into(),
            start,
            end,
            step,
            children,
        }
    }

    pub fn variable_element(&self) -> Element {
        Element::Variable(self.variable.clone())
    }

    /// start, end and, when present, step
    pub fn arguments(&self) -> Vec<&Element> {
        let mut args = vec![&self.start, &self.end];
        args.extend(self.step.as_ref());
        args
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Node {
    Document { children: Vec<Node> },
    Text { content: String },
    ForLoop(ForLoopNode),
    Echo { elements: Vec<Element> },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document { children }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn echo(elements: Vec<Element>) -> Self {
        Node::Echo { elements }
    }

    pub fn for_loop(node: ForLoopNode) -> Self {
        Node::ForLoop(node)
    }

    /// Children of container nodes; leaves have none
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children } => children,
            Node::ForLoop(for_loop) => &for_loop.children,
            Node::Text { .. } | Node::Echo { .. } => &[],
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Document { .. } => "Document",
            Node::Text { .. } => "Text",
            Node::ForLoop(_) => "ForLoop",
            Node::Echo { .. } => "Echo",
        }
    }

    /// One-line description used by tree renderings
    pub fn label(&self) -> String {
        match self {
            Node::Document { children } => format!("{} nodes", children.len()),
            Node::Text { content } => content.escape_debug().to_string(),
            Node::ForLoop(for_loop) => {
                let args = for_loop
                    .arguments()
                    .iter()
                    .map(|e| e.to_script_source())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("FOR {} {}", for_loop.variable, args)
            }
            Node::Echo { elements } => elements
                .iter()
                .map(|e| e.to_script_source())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn as_for_loop(&self) -> Option<&ForLoopNode> {
        match self {
            Node::ForLoop(for_loop) => Some(for_loop),
            _ => None,
        }
    }

    pub fn as_echo(&self) -> Option<&[Element]> {
        match self {
            Node::Echo { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { content } => Some(content),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_equality_is_tolerant() {
        assert_eq!(
            Element::ConstantDouble(0.1 + 0.2),
            Element::ConstantDouble(0.3)
        );
        assert_ne!(Element::ConstantDouble(0.3), Element::ConstantDouble(0.31));
        assert_ne!(Element::ConstantDouble(1.0), Element::ConstantInteger(1));
    }

    #[test]
    fn test_from_token() {
        assert_eq!(
            Element::from_token(&Token::variable("x")),
            Some(Element::Variable("x".into()))
        );
        assert_eq!(
            Element::from_token(&Token::function("sin")),
            Some(Element::Function("sin".into()))
        );
        assert_eq!(Element::from_token(&Token::terminate_tag()), None);
        assert_eq!(Element::from_token(&Token::tag("FOR")), None);
    }

    #[test]
    fn test_children_of_leaves_are_empty() {
        assert!(Node::text("abc").children().is_empty());
        assert!(Node::echo(vec![]).children().is_empty());
        let doc = Node::document(vec![Node::text("a"), Node::text("b")]);
        assert_eq!(doc.child_count(), 2);
        assert_eq!(doc.child(1), Some(&Node::text("b")));
    }

    #[test]
    fn test_for_loop_arguments() {
        let node = ForLoopNode::new(
            "i",
            Element::ConstantInteger(1),
            Element::ConstantInteger(10),
            None,
            vec![],
        );
        assert_eq!(node.arguments().len(), 2);
        assert_eq!(node.variable_element(), Element::Variable("i".into()));
    }

    #[test]
    fn test_serializes_to_json() {
        let doc = Node::document(vec![Node::echo(vec![Element::Variable("a".into())])]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["node"], "Document");
        assert_eq!(json["children"][0]["node"], "Echo");
        assert_eq!(json["children"][0]["elements"][0]["type"], "Variable");
        assert_eq!(json["children"][0]["elements"][0]["value"], "a");
    }
}
