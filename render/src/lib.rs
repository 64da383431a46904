//! Renderers for minimark trees, and the parse-then-render pipeline the CLI
//! runs.

pub mod error;
pub mod html;
pub mod outline;
pub mod text;
pub mod tree;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use minimark::parser::DEFAULT_MAX_DEPTH;
use minimark::{Node, Parser, render};
use tracing::debug;

pub use error::RenderError;
pub use html::HtmlRenderer;
pub use outline::{OutlineRenderer, to_outline};
pub use text::{PlainTextRenderer, to_plain_text};
pub use tree::TreeBuilder;

/// Output format of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Html,
    Text,
    Outline,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Text => "text",
            Format::Outline => "outline",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Format::Html),
            "text" => Ok(Format::Text),
            "outline" => Ok(Format::Outline),
            other => Err(format!(
                "unknown format '{}' (expected html, text or outline)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: Format,
    pub max_depth: usize,
    /// Fail instead of degrading constructs nested deeper than `max_depth`.
    pub strict: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            format: Format::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
        }
    }
}

/// Parse `source` according to `options`.
pub fn parse_source(
    source: &str,
    file_id: usize,
    options: &RenderOptions,
) -> Result<Node, RenderError> {
    let parser = Parser::new(source, file_id).with_max_depth(options.max_depth);
    let tree = if options.strict {
        parser.parse()?
    } else {
        parser.parse_lenient()
    };
    debug!(
        file_id,
        nodes = tree.count(),
        root = tree.name(),
        "parsed document"
    );
    Ok(tree)
}

/// Render an already parsed tree in `format`.
pub fn render_tree(tree: &Node, format: Format) -> String {
    match format {
        Format::Html => render(tree, &mut HtmlRenderer),
        Format::Text => to_plain_text(tree),
        Format::Outline => to_outline(tree),
    }
}

/// Parse and render `source`.
pub fn render_source(
    source: &str,
    file_id: usize,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let tree = parse_source(source, file_id, options)?;
    Ok(render_tree(&tree, options.format))
}

/// Parse and render `source` into `out`, followed by a newline.
pub fn render_to(
    source: &str,
    file_id: usize,
    options: &RenderOptions,
    out: &mut dyn Write,
) -> Result<(), RenderError> {
    let rendered = render_source(source, file_id, options)?;
    writeln!(out, "{}", rendered)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_round_trip() {
        for format in [Format::Html, Format::Text, Format::Outline] {
            assert_eq!(format.name().parse::<Format>(), Ok(format));
        }
        assert_eq!("HTML".parse::<Format>(), Ok(Format::Html));
        assert!("pdf".parse::<Format>().is_err());
    }

    #[test]
    fn writes_with_trailing_newline() {
        let mut out = Vec::new();
        render_to("*hi*", 0, &RenderOptions::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<em>hi</em>\n");
    }

    #[test]
    fn strict_mode_surfaces_depth_errors() {
        let options = RenderOptions {
            max_depth: 1,
            strict: true,
            ..RenderOptions::default()
        };
        let err = render_source("**a *b* c**", 3, &options).unwrap_err();
        let parse_error = err.parse_error().unwrap();
        assert_eq!(parse_error.file_id, 3);
        assert_eq!(parse_error.span, 4..5);

        let lenient = RenderOptions {
            strict: false,
            ..options
        };
        assert_eq!(
            render_source("**a *b* c**", 3, &lenient).unwrap(),
            "<strong>a *b* c</strong>"
        );
    }
}
