use minimark::fold::visited::{Block, Code, Image, Link, Styled, Text};
use minimark::{Markdown, Render, render};

const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Strips all markup, keeping only what a reader would see.
///
/// Links keep their label, images their alt text. Each paragraph is
/// followed by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl Render for PlainTextRenderer {
    type Output = String;

    fn text(&mut self, node: Text<'_>) -> String {
        node.content.to_string()
    }

    fn bold(&mut self, node: Styled<'_, String>) -> String {
        node.children
    }

    fn italic(&mut self, node: Styled<'_, String>) -> String {
        node.children
    }

    fn strike(&mut self, node: Styled<'_, String>) -> String {
        node.children
    }

    fn code(&mut self, node: Code<'_>) -> String {
        node.content.to_string()
    }

    fn link(&mut self, node: Link<'_, String>) -> String {
        node.children
    }

    fn image(&mut self, node: Image<'_>) -> String {
        node.alt.to_string()
    }

    fn paragraph(&mut self, node: Block<'_, String>) -> String {
        let mut text = node.children.concat();
        text.push_str(PARAGRAPH_SEPARATOR);
        text
    }

    fn fragment(&mut self, node: Block<'_, String>) -> String {
        node.children.concat()
    }
}

/// Plain text of a document, without the separator after the last paragraph.
pub fn to_plain_text<'a>(input: impl Into<Markdown<'a>>) -> String {
    let mut text = render(input, &mut PlainTextRenderer);
    if text.ends_with(PARAGRAPH_SEPARATOR) {
        text.truncate(text.len() - PARAGRAPH_SEPARATOR.len());
    }
    text
}
