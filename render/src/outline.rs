use minimark::fold::visited::{Block, Code, Image, Link, Styled, Text};
use minimark::{Markdown, Render, render};

/// Renders one line per node, children indented under their parent.
///
/// Each line carries the node's completion index, which makes the bottom-up
/// order of the fold visible: a parent's index is always larger than any of
/// its descendants'.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineRenderer;

impl OutlineRenderer {
    fn leaf(name: &str, index: usize, detail: String) -> Vec<String> {
        vec![format!("{name} #{index} {detail}")]
    }

    fn branch(head: String, children: Vec<String>) -> Vec<String> {
        let mut lines = Vec::with_capacity(children.len() + 1);
        lines.push(head);
        lines.extend(children.into_iter().map(|line| format!("  {line}")));
        lines
    }
}

impl Render for OutlineRenderer {
    type Output = Vec<String>;

    fn text(&mut self, node: Text<'_>) -> Vec<String> {
        Self::leaf("text", node.index, format!("{:?}", node.content))
    }

    fn bold(&mut self, node: Styled<'_, Vec<String>>) -> Vec<String> {
        Self::branch(format!("bold #{}", node.index), node.children)
    }

    fn italic(&mut self, node: Styled<'_, Vec<String>>) -> Vec<String> {
        Self::branch(format!("italic #{}", node.index), node.children)
    }

    fn strike(&mut self, node: Styled<'_, Vec<String>>) -> Vec<String> {
        Self::branch(format!("strike #{}", node.index), node.children)
    }

    fn code(&mut self, node: Code<'_>) -> Vec<String> {
        Self::leaf("code", node.index, format!("{:?}", node.content))
    }

    fn link(&mut self, node: Link<'_, Vec<String>>) -> Vec<String> {
        let head = match node.title {
            Some(title) => format!("link #{} href={:?} title={:?}", node.index, node.href, title),
            None => format!("link #{} href={:?}", node.index, node.href),
        };
        Self::branch(head, node.children)
    }

    fn image(&mut self, node: Image<'_>) -> Vec<String> {
        Self::leaf(
            "image",
            node.index,
            format!("src={:?} alt={:?}", node.src, node.alt),
        )
    }

    fn paragraph(&mut self, node: Block<'_, Vec<String>>) -> Vec<String> {
        Self::branch(format!("paragraph #{}", node.index), node.children.concat())
    }

    fn fragment(&mut self, node: Block<'_, Vec<String>>) -> Vec<String> {
        Self::branch(format!("fragment #{}", node.index), node.children.concat())
    }
}

/// The outline of a document as newline-separated lines.
pub fn to_outline<'a>(input: impl Into<Markdown<'a>>) -> String {
    render(input, &mut OutlineRenderer).join("\n")
}
