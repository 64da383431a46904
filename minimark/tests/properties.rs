//! Property-based tests for the parser and the fold.

use minimark::fold::visited::{Block, Code, Image, Link, Styled, Text};
use minimark::{Node, NodeKind, Render, parse, render, unescape};
use proptest::prelude::*;

/// Collects completion indices in post-order.
struct PostOrder;

impl Render for PostOrder {
    type Output = Vec<usize>;

    fn text(&mut self, node: Text<'_>) -> Vec<usize> {
        vec![node.index]
    }
    fn bold(&mut self, node: Styled<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children, node.index)
    }
    fn italic(&mut self, node: Styled<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children, node.index)
    }
    fn strike(&mut self, node: Styled<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children, node.index)
    }
    fn code(&mut self, node: Code<'_>) -> Vec<usize> {
        vec![node.index]
    }
    fn link(&mut self, node: Link<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children, node.index)
    }
    fn image(&mut self, node: Image<'_>) -> Vec<usize> {
        vec![node.index]
    }
    fn paragraph(&mut self, node: Block<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children.concat(), node.index)
    }
    fn fragment(&mut self, node: Block<'_, Vec<usize>>) -> Vec<usize> {
        wrap(node.children.concat(), node.index)
    }
}

fn wrap(mut children: Vec<usize>, index: usize) -> Vec<usize> {
    children.push(index);
    children
}

fn assert_spans(input: &str, node: &Node) {
    assert_eq!(&input[node.span.clone()], node.source);
    for child in node.children() {
        assert!(child.span.start >= node.span.start && child.span.end <= node.span.end);
        assert_spans(input, child);
    }
}

/// Markdown-heavy inputs without line breaks.
fn inline_markdown() -> impl Strategy<Value = String> {
    r#"[a-cé🦀 *_~`\[\]()!"\\]{0,40}"#
}

/// Markdown-heavy inputs including every kind of line break.
fn markdown() -> impl Strategy<Value = String> {
    r#"[a-cé *_~`\[\]()!"\\\r\n]{0,48}"#
}

proptest! {
    #[test]
    fn source_round_trips_without_line_breaks(input in inline_markdown()) {
        prop_assert_eq!(parse(&input).source, input);
    }

    #[test]
    fn spans_slice_to_source(input in markdown()) {
        let tree = parse(&input);
        assert_spans(&input, &tree);
    }

    #[test]
    fn unescape_is_identity_without_backslashes(input in "[^\\\\]{0,40}") {
        prop_assert_eq!(unescape(&input), input);
    }

    #[test]
    fn indices_are_post_order(input in markdown()) {
        let tree = parse(&input);
        let indices = render(&tree, &mut PostOrder);
        let expected: Vec<usize> = (0..tree.count()).collect();
        prop_assert_eq!(indices, expected);
    }

    #[test]
    fn no_singleton_fragments_or_empty_paragraphs(input in markdown()) {
        check_wrappers(&parse(&input));
    }
}

fn check_wrappers(node: &Node) {
    match &node.kind {
        NodeKind::Fragment(children) => assert_ne!(children.len(), 1),
        NodeKind::Paragraph(children) => assert!(!children.is_empty()),
        _ => {}
    }
    node.children().iter().for_each(check_wrappers);
}
