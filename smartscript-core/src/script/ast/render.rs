//! Rendering the tree back into SmartScript source
//!
//! This is the inverse of parsing, up to normalization: tag names come out upper-cased, tags
//! are written with single spaces between elements, and text and strings are re-escaped. The
//! result always parses back into an equal tree, which makes it the basis of round-trip tests.

use super::{Element, ForLoopNode, Node};

/// Convert a tree item into SmartScript source text
pub trait ToScriptSource {
    fn to_script_source(&self) -> String;
}

impl ToScriptSource for Element {
    fn to_script_source(&self) -> String {
        match self {
            Element::Variable(name) => name.clone(),
            Element::ConstantInteger(i) => i.to_string(),
            // Debug formatting keeps a `.0` or an exponent, so the literal lexes as a double again
            Element::ConstantDouble(d) => format!("{:?}", d),
            Element::StringLiteral(s) => quote_string(s),
            Element::Operator(symbol) => symbol.clone(),
            Element::Function(name) => format!("@{}", name),
        }
    }
}

impl ToScriptSource for ForLoopNode {
    fn to_script_source(&self) -> String {
        let mut out = format!("{{$FOR {}", self.variable);
        for arg in self.arguments() {
            out.push(' ');
            out.push_str(&arg.to_script_source());
        }
        out.push_str("$}");
        for child in &self.children {
            out.push_str(&child.to_script_source());
        }
        out.push_str("{$END$}");
        out
    }
}

impl ToScriptSource for Node {
    fn to_script_source(&self) -> String {
        match self {
            Node::Document { children } => children.iter().map(|c| c.to_script_source()).collect(),
            Node::Text { content } => escape_text(content),
            Node::ForLoop(for_loop) => for_loop.to_script_source(),
            Node::Echo { elements } => {
                let mut out = String::from("{$=");
                for element in elements {
                    out.push(' ');
                    out.push_str(&element.to_script_source());
                }
                out.push_str(" $}");
                out
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            _ => out.push(c),
        }
    }
    out
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_rendering() {
        assert_eq!(Element::ConstantDouble(2.0).to_script_source(), "2.0");
        assert_eq!(Element::ConstantDouble(-0.5).to_script_source(), "-0.5");
        assert_eq!(Element::ConstantInteger(-3).to_script_source(), "-3");
        assert_eq!(Element::Function("sin".into()).to_script_source(), "@sin");
        assert_eq!(
            Element::StringLiteral("a\"b\\\n".into()).to_script_source(),
            r#""a\"b\\\n""#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(Node::text(r"a\b{$c").to_script_source(), r"a\\b\{$c");
    }

    #[test]
    fn test_for_loop_rendering() {
        let node = Node::for_loop(ForLoopNode::new(
            "i",
            Element::ConstantInteger(1),
            Element::Variable("n".into()),
            Some(Element::StringLiteral("2".into())),
            vec![Node::echo(vec![Element::Variable("i".into())])],
        ));
        assert_eq!(
            node.to_script_source(),
            r#"{$FOR i 1 n "2"$}{$= i $}{$END$}"#
        );
    }
}
