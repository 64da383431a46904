use minimark::fold::visited::{Block, Code, Image, Link, Styled, Text};
use minimark::{Node, NodeKind, Render};

/// Folds a tree back into an owned copy of itself.
///
/// The base case for tree-to-tree transformations: wrap it and override the
/// callbacks you want to rewrite.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeBuilder;

impl Render for TreeBuilder {
    type Output = Node;

    fn text(&mut self, node: Text<'_>) -> Node {
        let kind = NodeKind::Text {
            content: node.content.to_string(),
        };
        Node::new(kind, node.source, node.span)
    }

    fn bold(&mut self, node: Styled<'_, Node>) -> Node {
        Node::new(NodeKind::Bold(Box::new(node.children)), node.source, node.span)
    }

    fn italic(&mut self, node: Styled<'_, Node>) -> Node {
        Node::new(NodeKind::Italic(Box::new(node.children)), node.source, node.span)
    }

    fn strike(&mut self, node: Styled<'_, Node>) -> Node {
        Node::new(NodeKind::Strike(Box::new(node.children)), node.source, node.span)
    }

    fn code(&mut self, node: Code<'_>) -> Node {
        let kind = NodeKind::Code {
            content: node.content.to_string(),
        };
        Node::new(kind, node.source, node.span)
    }

    fn link(&mut self, node: Link<'_, Node>) -> Node {
        let kind = NodeKind::Link {
            href: node.href.to_string(),
            title: node.title.map(str::to_string),
            label: Box::new(node.children),
        };
        Node::new(kind, node.source, node.span)
    }

    fn image(&mut self, node: Image<'_>) -> Node {
        let kind = NodeKind::Image {
            src: node.src.to_string(),
            alt: node.alt.to_string(),
        };
        Node::new(kind, node.source, node.span)
    }

    fn paragraph(&mut self, node: Block<'_, Node>) -> Node {
        Node::new(NodeKind::Paragraph(node.children), node.source, node.span)
    }

    fn fragment(&mut self, node: Block<'_, Node>) -> Node {
        Node::new(NodeKind::Fragment(node.children), node.source, node.span)
    }
}

/// Upper-cases every text run and leaves the structure alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shout;

impl Render for Shout {
    type Output = Node;

    fn text(&mut self, node: Text<'_>) -> Node {
        let kind = NodeKind::Text {
            content: node.content.to_uppercase(),
        };
        Node::new(kind, node.source, node.span)
    }

    fn bold(&mut self, node: Styled<'_, Node>) -> Node {
        TreeBuilder.bold(node)
    }

    fn italic(&mut self, node: Styled<'_, Node>) -> Node {
        TreeBuilder.italic(node)
    }

    fn strike(&mut self, node: Styled<'_, Node>) -> Node {
        TreeBuilder.strike(node)
    }

    fn code(&mut self, node: Code<'_>) -> Node {
        TreeBuilder.code(node)
    }

    fn link(&mut self, node: Link<'_, Node>) -> Node {
        TreeBuilder.link(node)
    }

    fn image(&mut self, node: Image<'_>) -> Node {
        TreeBuilder.image(node)
    }

    fn paragraph(&mut self, node: Block<'_, Node>) -> Node {
        TreeBuilder.paragraph(node)
    }

    fn fragment(&mut self, node: Block<'_, Node>) -> Node {
        TreeBuilder.fragment(node)
    }
}
