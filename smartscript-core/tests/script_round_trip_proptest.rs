//! Property-based tests for the parse -> render -> parse cycle
//!
//! Documents are generated as trees, rendered to source and parsed again. The parsed tree
//! must equal the generated one, and rendering it must give back the same source.

use proptest::prelude::*;
use smartscript_core::script::{parse_document, Element, ForLoopNode, Node, ToScriptSource};

fn variable_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,5}"
}

fn loop_argument_strategy() -> impl Strategy<Value = Element> {
    prop_oneof![
        variable_name_strategy().prop_map(Element::Variable),
        any::<i64>().prop_map(Element::ConstantInteger),
        (-1.0e6..1.0e6f64).prop_map(Element::ConstantDouble),
        "[a-zA-Z0-9 .\"\\\\\n\t\r]{0,8}".prop_map(Element::StringLiteral),
    ]
}

fn element_strategy() -> impl Strategy<Value = Element> {
    prop_oneof![
        4 => loop_argument_strategy(),
        1 => "[-+*/^]".prop_map(Element::Operator),
        1 => "[a-zA-Z][a-zA-Z0-9_]{0,5}".prop_map(Element::Function),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-zA-Z0-9 {}$\\\\\n]{1,10}".prop_map(Node::text),
        prop::collection::vec(element_strategy(), 1..5).prop_map(Node::echo),
    ]
}

fn node_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        (
            variable_name_strategy(),
            loop_argument_strategy(),
            loop_argument_strategy(),
            prop::option::of(loop_argument_strategy()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(variable, start, end, step, children)| {
                Node::for_loop(ForLoopNode::new(
                    variable,
                    start,
                    end,
                    step,
                    merge_adjacent_text(children),
                ))
            })
    })
}

/// The parser never produces two Text siblings in a row
fn merge_adjacent_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::new();
    for node in nodes {
        if let (Some(Node::Text { content: previous }), Node::Text { content }) =
            (merged.last_mut(), &node)
        {
            previous.push_str(content);
            continue;
        }
        merged.push(node);
    }
    merged
}

fn document_strategy() -> impl Strategy<Value = Node> {
    prop::collection::vec(node_strategy(), 0..6)
        .prop_map(|children| Node::document(merge_adjacent_text(children)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_parse_of_rendered_tree_is_identical(doc in document_strategy()) {
        let source = doc.to_script_source();
        let parsed = parse_document(&source)
            .map_err(|e| TestCaseError::fail(format!("{} in {:?}", e, source)))?;
        prop_assert_eq!(&parsed, &doc);
    }

    #[test]
    fn test_rendering_is_idempotent(doc in document_strategy()) {
        let once = doc.to_script_source();
        let twice = parse_document(&once).unwrap().to_script_source();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_plain_text_survives(text in "[^{\\\\]{0,40}") {
        let doc = parse_document(&text).unwrap();
        let expected = if text.is_empty() { vec![] } else { vec![Node::text(text.clone())] };
        prop_assert_eq!(doc, Node::document(expected));
    }
}
