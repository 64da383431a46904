use minimark::Render;
use minimark::fold::visited::{Block, Code, Image, Link, Styled, Text};

/// Renders a tree as an HTML fragment.
///
/// Paragraphs become `<p>` elements; everything else is inline markup.
/// Text and attribute values are escaped.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Render for HtmlRenderer {
    type Output = String;

    fn text(&mut self, node: Text<'_>) -> String {
        escape_html(node.content)
    }

    fn bold(&mut self, node: Styled<'_, String>) -> String {
        format!("<strong>{}</strong>", node.children)
    }

    fn italic(&mut self, node: Styled<'_, String>) -> String {
        format!("<em>{}</em>", node.children)
    }

    fn strike(&mut self, node: Styled<'_, String>) -> String {
        format!("<del>{}</del>", node.children)
    }

    fn code(&mut self, node: Code<'_>) -> String {
        format!("<code>{}</code>", escape_html(node.content))
    }

    fn link(&mut self, node: Link<'_, String>) -> String {
        match node.title {
            Some(title) => format!(
                "<a href=\"{}\" title=\"{}\">{}</a>",
                escape_html(node.href),
                escape_html(title),
                node.children
            ),
            None => format!("<a href=\"{}\">{}</a>", escape_html(node.href), node.children),
        }
    }

    fn image(&mut self, node: Image<'_>) -> String {
        format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(node.src),
            escape_html(node.alt)
        )
    }

    fn paragraph(&mut self, node: Block<'_, String>) -> String {
        format!("<p>{}</p>", node.children.concat())
    }

    fn fragment(&mut self, node: Block<'_, String>) -> String {
        node.children.concat()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimark::render;

    fn html(source: &str) -> String {
        render(source, &mut HtmlRenderer)
    }

    #[test]
    fn inline_markup() {
        assert_eq!(
            html("Hello, **world**!"),
            "Hello, <strong>world</strong>!"
        );
        assert_eq!(
            html("*a* ~~b~~ `c`"),
            "<em>a</em> <del>b</del> <code>c</code>"
        );
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            html("[![x](a.png)](https://example.com \"Home\")"),
            "<a href=\"https://example.com\" title=\"Home\"><img src=\"a.png\" alt=\"x\"></a>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        assert_eq!(html("a < b & `<c>`"), "a &lt; b &amp; <code>&lt;c&gt;</code>");
        assert_eq!(
            html("[q](x?a=1&b=\"2\")"),
            "<a href=\"x?a=1&amp;b=&quot;2&quot;\">q</a>"
        );
    }

    #[test]
    fn paragraphs() {
        assert_eq!(html("a\n\nb"), "<p>a</p><p>b</p>");
    }
}
