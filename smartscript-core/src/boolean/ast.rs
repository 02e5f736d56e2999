//! Boolean expression tree
//!
//!     Constant     true or false
//!     Variable     an upper-cased name
//!     UnaryOp      `not` over one child
//!     BinaryOp     `and`, `xor` or `or` over two or more children, folded left to right
//!
//! Operator nodes carry the function that evaluates them. The function is fixed when the node
//! is built and is not part of equality or serialization; the node name identifies it.

use crate::boolean::error::AssignmentError;
use crate::boolean::token::BoolOperator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Spelling of operators and constants when printing expressions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStyle {
    /// `A AND NOT B OR C`
    #[default]
    Word,
    /// `A * !B + C`
    Symbolic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node")]
pub enum BoolNode {
    Constant {
        value: bool,
    },
    Variable {
        name: String,
    },
    UnaryOp {
        name: String,
        child: Box<BoolNode>,
        #[serde(skip)]
        op: fn(bool) -> bool,
    },
    BinaryOp {
        name: String,
        children: Vec<BoolNode>,
        #[serde(skip)]
        op: fn(bool, bool) -> bool,
    },
}

fn not(a: bool) -> bool {
    !a
}

fn and(a: bool, b: bool) -> bool {
    a && b
}

fn or(a: bool, b: bool) -> bool {
    a || b
}

fn xor(a: bool, b: bool) -> bool {
    a ^ b
}

impl BoolNode {
    pub fn constant(value: bool) -> Self {
        BoolNode::Constant { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        BoolNode::Variable { name: name.into() }
    }

    pub fn not(child: BoolNode) -> Self {
        BoolNode::UnaryOp {
            name: BoolOperator::Not.keyword().to_string(),
            child: Box::new(child),
            op: not,
        }
    }

    pub fn and(children: Vec<BoolNode>) -> Self {
        Self::binary(BoolOperator::And, and, children)
    }

    pub fn or(children: Vec<BoolNode>) -> Self {
        Self::binary(BoolOperator::Or, or, children)
    }

    pub fn xor(children: Vec<BoolNode>) -> Self {
        Self::binary(BoolOperator::Xor, xor, children)
    }

    /// An n-ary node; a single child is returned unchanged
    fn binary(
        operator: BoolOperator,
        op: fn(bool, bool) -> bool,
        mut children: Vec<BoolNode>,
    ) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        BoolNode::BinaryOp {
            name: operator.keyword().to_string(),
            children,
            op,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            BoolNode::Constant { .. } => "Constant",
            BoolNode::Variable { .. } => "Variable",
            BoolNode::UnaryOp { .. } => "UnaryOp",
            BoolNode::BinaryOp { .. } => "BinaryOp",
        }
    }

    pub fn children(&self) -> Vec<&BoolNode> {
        match self {
            BoolNode::Constant { .. } | BoolNode::Variable { .. } => Vec::new(),
            BoolNode::UnaryOp { child, .. } => vec![child.as_ref()],
            BoolNode::BinaryOp { children, .. } => children.iter().collect(),
        }
    }

    /// One-line description used by tree renderings
    pub fn label(&self) -> String {
        match self {
            BoolNode::Constant { value } => value.to_string(),
            BoolNode::Variable { name } => name.clone(),
            BoolNode::UnaryOp { name, .. } | BoolNode::BinaryOp { name, .. } => {
                name.to_ascii_uppercase()
            }
        }
    }

    pub fn operator(&self) -> Option<BoolOperator> {
        match self {
            BoolNode::UnaryOp { .. } => Some(BoolOperator::Not),
            BoolNode::BinaryOp { name, .. } => BoolOperator::from_keyword(name),
            _ => None,
        }
    }

    /// Evaluate with variable values supplied by `lookup`
    pub fn evaluate<F>(&self, lookup: &F) -> Result<bool, AssignmentError>
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            BoolNode::Constant { value } => Ok(*value),
            BoolNode::Variable { name } => {
                lookup(name).ok_or_else(|| AssignmentError::UnboundVariable(name.clone()))
            }
            BoolNode::UnaryOp { child, op, .. } => Ok(op(child.evaluate(lookup)?)),
            BoolNode::BinaryOp { children, op, .. } => {
                let mut values = children.iter().map(|c| c.evaluate(lookup));
                let first = match values.next() {
                    Some(value) => value?,
                    None => return Ok(false),
                };
                values.try_fold(first, |acc, value| Ok(op(acc, value?)))
            }
        }
    }

    /// Names of all variables in the expression, sorted
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            BoolNode::Constant { .. } => {}
            BoolNode::Variable { name } => {
                names.insert(name.clone());
            }
            BoolNode::UnaryOp { child, .. } => child.collect_variables(names),
            BoolNode::BinaryOp { children, .. } => {
                for child in children {
                    child.collect_variables(names);
                }
            }
        }
    }

    /// Render with the given operator spelling and only the brackets precedence requires
    pub fn to_styled_string(&self, style: OperatorStyle) -> String {
        let mut out = String::new();
        self.write_styled(&mut out, style);
        out
    }

    fn precedence(&self) -> u8 {
        match self.operator() {
            Some(BoolOperator::Or) => 1,
            Some(BoolOperator::Xor) => 2,
            Some(BoolOperator::And) => 3,
            Some(BoolOperator::Not) => 4,
            None => 5,
        }
    }

    fn write_styled(&self, out: &mut String, style: OperatorStyle) {
        match self {
            BoolNode::Constant { value } => out.push_str(match (style, value) {
                (OperatorStyle::Word, true) => "TRUE",
                (OperatorStyle::Word, false) => "FALSE",
                (OperatorStyle::Symbolic, true) => "1",
                (OperatorStyle::Symbolic, false) => "0",
            }),
            BoolNode::Variable { name } => out.push_str(name),
            BoolNode::UnaryOp { child, .. } => {
                out.push_str(match style {
                    OperatorStyle::Word => "NOT ",
                    OperatorStyle::Symbolic => "!",
                });
                child.write_operand(out, style, child.precedence() < self.precedence());
            }
            BoolNode::BinaryOp { children, .. } => {
                let operator = self.operator().unwrap_or(BoolOperator::Or);
                let separator = match style {
                    OperatorStyle::Word => {
                        format!(" {} ", operator.keyword().to_ascii_uppercase())
                    }
                    OperatorStyle::Symbolic => format!(" {} ", operator.symbol()),
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(&separator);
                    }
                    child.write_operand(out, style, child.precedence() <= self.precedence());
                }
            }
        }
    }

    fn write_operand(&self, out: &mut String, style: OperatorStyle, bracketed: bool) {
        if bracketed {
            out.push('(');
            self.write_styled(out, style);
            out.push(')');
        } else {
            self.write_styled(out, style);
        }
    }
}

impl PartialEq for BoolNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BoolNode::Constant { value: a }, BoolNode::Constant { value: b }) => a == b,
            (BoolNode::Variable { name: a }, BoolNode::Variable { name: b }) => a == b,
            (
                BoolNode::UnaryOp {
                    name: a, child: x, ..
                },
                BoolNode::UnaryOp {
                    name: b, child: y, ..
                },
            ) => a == b && x == y,
            (
                BoolNode::BinaryOp {
                    name: a,
                    children: x,
                    ..
                },
                BoolNode::BinaryOp {
                    name: b,
                    children: y,
                    ..
                },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl Eq for BoolNode {}

/// Word style
impl fmt::Display for BoolNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_styled_string(OperatorStyle::Word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> BoolNode {
        BoolNode::variable(name)
    }

    #[test]
    fn test_evaluate_folds_children() {
        let expr = BoolNode::xor(vec![var("A"), var("B"), var("C")]);
        let lookup = |name: &str| Some(name != "B");
        assert!(!expr.evaluate(&lookup).unwrap());
    }

    #[test]
    fn test_unbound_variable() {
        let expr = BoolNode::and(vec![var("A"), var("Z")]);
        let lookup = |name: &str| (name == "A").then_some(true);
        assert_eq!(
            expr.evaluate(&lookup),
            Err(AssignmentError::UnboundVariable("Z".into()))
        );
    }

    #[test]
    fn test_single_child_binary_collapses() {
        assert_eq!(BoolNode::or(vec![var("A")]), var("A"));
    }

    #[test]
    fn test_styles() {
        let expr = BoolNode::or(vec![
            BoolNode::and(vec![var("A"), BoolNode::not(var("B"))]),
            var("C"),
        ]);
        assert_eq!(expr.to_string(), "A AND NOT B OR C");
        assert_eq!(
            expr.to_styled_string(OperatorStyle::Symbolic),
            "A * !B + C"
        );
    }

    #[test]
    fn test_brackets_follow_precedence() {
        let expr = BoolNode::and(vec![
            BoolNode::or(vec![var("A"), var("B")]),
            BoolNode::not(BoolNode::xor(vec![var("C"), BoolNode::constant(true)])),
        ]);
        assert_eq!(expr.to_string(), "(A OR B) AND NOT (C XOR TRUE)");
        assert_eq!(
            expr.to_styled_string(OperatorStyle::Symbolic),
            "(A + B) * !(C :+: 1)"
        );
    }

    #[test]
    fn test_variables_are_sorted_and_unique() {
        let expr = BoolNode::or(vec![var("C"), var("A"), BoolNode::not(var("C"))]);
        let names: Vec<_> = expr.variables().into_iter().collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_serialization_skips_functions() {
        let json = serde_json::to_value(BoolNode::not(var("A"))).unwrap();
        assert_eq!(json["node"], "UnaryOp");
        assert_eq!(json["name"], "not");
        assert_eq!(json["child"]["name"], "A");
        assert!(json.get("op").is_none());
    }
}
