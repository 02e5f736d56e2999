//! Treeviz formatter for both trees
//!
//! Treeviz prints one line per node, which makes a tree quick to scan. Nesting is drawn with
//! box connectors, two columns per level:
//!
//!     <prefix><connector> <icon> <node type>: <label>
//!
//! The root line has no prefix and no connector. Labels are truncated to 30 characters.
//!
//! Example:
//!
//!     ⧉ Document: 2 nodes
//!     ├─ ¶ Text: Hi\n
//!     └─ ↻ ForLoop: FOR i 1 3
//!       └─ ≡ Echo: i "x"
//!
//! Icons
//!     SmartScript:
//!         Document: ⧉
//!         Text: ¶
//!         ForLoop: ↻
//!         Echo: ≡
//!     Boolean:
//!         Constant: ⊤ / ⊥
//!         Variable: ◇
//!         not: ¬
//!         and: ∧
//!         xor: ⊕
//!         or: ∨

use crate::boolean::{BoolNode, BoolOperator};
use crate::script::Node;

const LABEL_WIDTH: usize = 30;

/// A node that treeviz can draw
pub trait TreeNode {
    fn icon(&self) -> &'static str;
    fn node_type(&self) -> &'static str;
    fn label(&self) -> String;
    fn child_nodes(&self) -> Vec<&Self>;
}

impl TreeNode for Node {
    fn icon(&self) -> &'static str {
        match self {
            Node::Document { .. } => "⧉",
            Node::Text { .. } => "¶",
            Node::ForLoop(_) => "↻",
            Node::Echo { .. } => "≡",
        }
    }

    fn node_type(&self) -> &'static str {
        Node::node_type(self)
    }

    fn label(&self) -> String {
        Node::label(self)
    }

    fn child_nodes(&self) -> Vec<&Self> {
        self.children().iter().collect()
    }
}

impl TreeNode for BoolNode {
    fn icon(&self) -> &'static str {
        match self {
            BoolNode::Constant { value: true } => "⊤",
            BoolNode::Constant { value: false } => "⊥",
            BoolNode::Variable { .. } => "◇",
            _ => match self.operator() {
                Some(BoolOperator::Not) => "¬",
                Some(BoolOperator::And) => "∧",
                Some(BoolOperator::Xor) => "⊕",
                Some(BoolOperator::Or) | None => "∨",
            },
        }
    }

    fn node_type(&self) -> &'static str {
        BoolNode::node_type(self)
    }

    fn label(&self) -> String {
        BoolNode::label(self)
    }

    fn child_nodes(&self) -> Vec<&Self> {
        self.children()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str<N: TreeNode>(root: &N) -> String {
    let mut result = String::new();
    result.push_str(&node_line(root));
    append_children(&mut result, &root.child_nodes(), "");
    result
}

fn node_line<N: TreeNode>(node: &N) -> String {
    format!(
        "{} {}: {}\n",
        node.icon(),
        node.node_type(),
        truncate(&node.label(), LABEL_WIDTH)
    )
}

fn append_node<N: TreeNode>(result: &mut String, node: &N, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    result.push_str(&format!("{}{} {}", prefix, connector, node_line(node)));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, &node.child_nodes(), &new_prefix);
}

fn append_children<N: TreeNode>(result: &mut String, children: &[&N], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, *child, prefix, is_last);
    }
}
