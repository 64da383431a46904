use std::fmt;
use std::ops::Range;

/// A node of the parsed Markdown tree.
///
/// Every node keeps the verbatim source text it was parsed from, delimiters
/// included, together with the byte range of that text in the original input.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Verbatim input slice covered by this node.
    pub source: String,
    /// Byte range of `source` in the parsed input.
    pub span: Range<usize>,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain text with escapes resolved.
    Text { content: String },
    Bold(Box<Node>),
    Italic(Box<Node>),
    Strike(Box<Node>),
    /// Code span. The content is raw text, trimmed, never parsed further.
    Code { content: String },
    Link {
        href: String,
        title: Option<String>,
        label: Box<Node>,
    },
    /// Image. `alt` is raw text, not a subtree.
    Image { src: String, alt: String },
    Paragraph(Vec<Node>),
    Fragment(Vec<Node>),
}

impl Node {
    pub fn new(kind: NodeKind, source: impl Into<String>, span: Range<usize>) -> Self {
        Node {
            kind,
            source: source.into(),
            span,
        }
    }

    /// Lowercase variant name (`"text"`, `"bold"`, ...).
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Direct children, in order. Leaves have none.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Bold(child) | NodeKind::Italic(child) | NodeKind::Strike(child) => {
                std::slice::from_ref(child.as_ref())
            }
            NodeKind::Link { label, .. } => std::slice::from_ref(label.as_ref()),
            NodeKind::Paragraph(children) | NodeKind::Fragment(children) => children,
            NodeKind::Text { .. } | NodeKind::Code { .. } | NodeKind::Image { .. } => &[],
        }
    }

    /// Total number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }

    /// How many emphasis, strike and link levels are stacked along the
    /// deepest path of this subtree.
    pub fn nesting(&self) -> usize {
        let below = self.children().iter().map(Node::nesting).max().unwrap_or(0);
        match self.kind {
            NodeKind::Bold(_)
            | NodeKind::Italic(_)
            | NodeKind::Strike(_)
            | NodeKind::Link { .. } => below + 1,
            _ => below,
        }
    }
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text { .. } => "text",
            NodeKind::Bold(_) => "bold",
            NodeKind::Italic(_) => "italic",
            NodeKind::Strike(_) => "strike",
            NodeKind::Code { .. } => "code",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::Paragraph(_) => "paragraph",
            NodeKind::Fragment(_) => "fragment",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
