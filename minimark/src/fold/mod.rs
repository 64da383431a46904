pub mod visited;

use crate::node::{Node, NodeKind};
use crate::parser::parse;

use self::visited::{Block, Code, Image, Link, Styled, Text};

/// Per-variant callbacks for folding a tree into `Self::Output`.
///
/// Every variant has a required method, so an implementation that forgets
/// one does not compile. Callbacks run bottom-up: a node's callback sees the
/// outputs of its children and gets the next completion index.
pub trait Render {
    type Output;

    fn text(&mut self, node: Text<'_>) -> Self::Output;
    fn bold(&mut self, node: Styled<'_, Self::Output>) -> Self::Output;
    fn italic(&mut self, node: Styled<'_, Self::Output>) -> Self::Output;
    fn strike(&mut self, node: Styled<'_, Self::Output>) -> Self::Output;
    fn code(&mut self, node: Code<'_>) -> Self::Output;
    fn link(&mut self, node: Link<'_, Self::Output>) -> Self::Output;
    fn image(&mut self, node: Image<'_>) -> Self::Output;
    fn paragraph(&mut self, node: Block<'_, Self::Output>) -> Self::Output;
    fn fragment(&mut self, node: Block<'_, Self::Output>) -> Self::Output;
}

/// Input to [`render`]: either Markdown text or an already parsed tree.
#[derive(Debug, Clone, Copy)]
pub enum Markdown<'a> {
    Source(&'a str),
    Tree(&'a Node),
}

impl<'a> From<&'a str> for Markdown<'a> {
    fn from(source: &'a str) -> Self {
        Markdown::Source(source)
    }
}

impl<'a> From<&'a String> for Markdown<'a> {
    fn from(source: &'a String) -> Self {
        Markdown::Source(source)
    }
}

impl<'a> From<&'a Node> for Markdown<'a> {
    fn from(node: &'a Node) -> Self {
        Markdown::Tree(node)
    }
}

/// Fold Markdown text or a tree with `renderer`, parsing text first.
pub fn render<'a, R: Render>(input: impl Into<Markdown<'a>>, renderer: &mut R) -> R::Output {
    match input.into() {
        Markdown::Source(source) => {
            let tree = parse(source);
            Folder::new(renderer).fold(&tree)
        }
        Markdown::Tree(tree) => Folder::new(renderer).fold(tree),
    }
}

/// One fold over one tree. Owns the completion counter.
struct Folder<'r, R> {
    renderer: &'r mut R,
    next_index: usize,
}

impl<'r, R: Render> Folder<'r, R> {
    fn new(renderer: &'r mut R) -> Self {
        Folder {
            renderer,
            next_index: 0,
        }
    }

    fn claim_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    fn fold(&mut self, node: &Node) -> R::Output {
        let source = node.source.as_str();
        let span = node.span.clone();

        match &node.kind {
            NodeKind::Text { content } => {
                let index = self.claim_index();
                self.renderer.text(Text {
                    index,
                    source,
                    span,
                    content,
                })
            }
            NodeKind::Bold(child) => {
                let children = self.fold(child);
                let index = self.claim_index();
                self.renderer.bold(Styled {
                    index,
                    source,
                    span,
                    children,
                })
            }
            NodeKind::Italic(child) => {
                let children = self.fold(child);
                let index = self.claim_index();
                self.renderer.italic(Styled {
                    index,
                    source,
                    span,
                    children,
                })
            }
            NodeKind::Strike(child) => {
                let children = self.fold(child);
                let index = self.claim_index();
                self.renderer.strike(Styled {
                    index,
                    source,
                    span,
                    children,
                })
            }
            NodeKind::Code { content } => {
                let index = self.claim_index();
                self.renderer.code(Code {
                    index,
                    source,
                    span,
                    content,
                })
            }
            NodeKind::Link { href, title, label } => {
                let children = self.fold(label);
                let index = self.claim_index();
                self.renderer.link(Link {
                    index,
                    source,
                    span,
                    href,
                    title: title.as_deref(),
                    children,
                })
            }
            NodeKind::Image { src, alt } => {
                let index = self.claim_index();
                self.renderer.image(Image {
                    index,
                    source,
                    span,
                    src,
                    alt,
                })
            }
            NodeKind::Paragraph(nodes) => {
                let children = nodes.iter().map(|child| self.fold(child)).collect();
                let index = self.claim_index();
                self.renderer.paragraph(Block {
                    index,
                    source,
                    span,
                    children,
                })
            }
            NodeKind::Fragment(nodes) => {
                let children = nodes.iter().map(|child| self.fold(child)).collect();
                let index = self.claim_index();
                self.renderer.fragment(Block {
                    index,
                    source,
                    span,
                    children,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records `name#index` for every callback, in call order.
    #[derive(Default)]
    struct Trace {
        calls: Vec<String>,
    }

    impl Trace {
        fn record(&mut self, name: &str, index: usize) {
            self.calls.push(format!("{}#{}", name, index));
        }
    }

    impl Render for Trace {
        type Output = ();

        fn text(&mut self, node: Text<'_>) {
            self.record("text", node.index);
        }
        fn bold(&mut self, node: Styled<'_, ()>) {
            self.record("bold", node.index);
        }
        fn italic(&mut self, node: Styled<'_, ()>) {
            self.record("italic", node.index);
        }
        fn strike(&mut self, node: Styled<'_, ()>) {
            self.record("strike", node.index);
        }
        fn code(&mut self, node: Code<'_>) {
            self.record("code", node.index);
        }
        fn link(&mut self, node: Link<'_, ()>) {
            self.record("link", node.index);
        }
        fn image(&mut self, node: Image<'_>) {
            self.record("image", node.index);
        }
        fn paragraph(&mut self, node: Block<'_, ()>) {
            self.record("paragraph", node.index);
        }
        fn fragment(&mut self, node: Block<'_, ()>) {
            self.record("fragment", node.index);
        }
    }

    #[test]
    fn children_complete_before_parents() {
        let mut trace = Trace::default();
        render("a **b _c_** [d](e)", &mut trace);
        assert_eq!(
            trace.calls,
            [
                "text#0",
                "text#1",
                "text#2",
                "italic#3",
                "fragment#4",
                "bold#5",
                "text#6",
                "text#7",
                "link#8",
                "fragment#9",
            ]
        );
    }

    #[test]
    fn counter_restarts_per_call() {
        let mut trace = Trace::default();
        render("x", &mut trace);
        render("y", &mut trace);
        assert_eq!(trace.calls, ["text#0", "text#0"]);
    }

    #[test]
    fn text_and_tree_inputs_agree() {
        let source = "First\n\n`second`";
        let tree = parse(source);

        let mut from_text = Trace::default();
        render(source, &mut from_text);
        let mut from_tree = Trace::default();
        render(&tree, &mut from_tree);

        assert_eq!(from_text.calls, from_tree.calls);
        assert_eq!(
            from_tree.calls,
            ["text#0", "paragraph#1", "code#2", "paragraph#3", "fragment#4"]
        );
    }
}
