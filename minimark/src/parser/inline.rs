use tracing::debug;

use crate::node::{Node, NodeKind};
use crate::parser::scanner::{Parsed, Scanner};

impl Scanner<'_> {
    /// Try to parse a construct starting at the cursor.
    ///
    /// `None` means the input at the cursor is not a well-formed construct.
    /// The cursor may have moved; the caller restores it.
    ///
    /// A construct's outcome depends only on where it starts, so each start
    /// position is parsed once. A remembered construct is reused deeper in the
    /// tree only while it still fits under the nesting limit.
    pub(super) fn parse_construct(&mut self) -> Option<Node> {
        let start = self.pos;

        if let Some(outcome) = self.constructs.get(&start) {
            let parsed = outcome.as_ref()?;
            if self.depth + parsed.height <= self.max_depth {
                let node = parsed.node.clone();
                self.pos = parsed.end;
                return Some(node);
            }
            let open_end = start + opening_len(&parsed.node.kind);
            self.reject(start, open_end);
            return None;
        }

        let node = self.parse_construct_at(start);
        let outcome = node.as_ref().map(|node| Parsed {
            node: node.clone(),
            end: self.pos,
            height: node.nesting(),
        });
        self.constructs.insert(start, outcome);
        node
    }

    fn parse_construct_at(&mut self, start: usize) -> Option<Node> {
        let kind = match self.current()? {
            marker @ ('*' | '_') => self.parse_emphasis(marker)?,
            '~' => self.parse_strike()?,
            '`' => self.parse_code()?,
            '!' => self.parse_image()?,
            '[' => self.parse_link()?,
            _ => return None,
        };

        Some(self.node(kind, start, self.pos))
    }

    fn parse_emphasis(&mut self, marker: char) -> Option<NodeKind> {
        let doubled = self.peek(1) == Some(marker);
        let delimiter = match (marker, doubled) {
            ('*', true) => "**",
            ('*', false) => "*",
            (_, true) => "__",
            (_, false) => "_",
        };

        let open = self.pos;
        self.advance(delimiter.len());
        let children = Box::new(self.parse_nested(delimiter, open)?);
        self.eat(delimiter)?;

        Some(if doubled {
            NodeKind::Bold(children)
        } else {
            NodeKind::Italic(children)
        })
    }

    fn parse_strike(&mut self) -> Option<NodeKind> {
        let open = self.pos;
        self.eat("~~")?;
        let children = self.parse_nested("~~", open)?;
        self.eat("~~")?;

        Some(NodeKind::Strike(Box::new(children)))
    }

    /// Code spans open with one or two backticks; three or more never open or
    /// close one. A lone backtick is content inside a double-backtick span.
    fn parse_code(&mut self) -> Option<NodeKind> {
        if self.matches("```") {
            return None;
        }

        let delimiter = if self.matches("``") { "``" } else { "`" };
        self.advance(delimiter.len());

        let stop = self.raw_end(delimiter);
        if self.matches_at(stop, "```") || !self.matches_at(stop, delimiter) {
            return None;
        }
        let content = self.raw_text(stop).trim().to_string();
        self.eat(delimiter)?;

        Some(NodeKind::Code { content })
    }

    fn parse_image(&mut self) -> Option<NodeKind> {
        self.eat("![")?;
        let alt = self.raw_run_until("]", "](")?;
        self.eat("](")?;
        let src = self.raw_run_until(")", ")")?;
        self.eat(")")?;

        Some(NodeKind::Image { src, alt })
    }

    fn parse_link(&mut self) -> Option<NodeKind> {
        let open = self.pos;
        self.eat("[")?;
        let label = self.parse_nested("]", open)?;
        self.eat("](")?;
        let target = self.raw_run_until(")", ")")?;
        self.eat(")")?;

        let (href, title) = split_target(&target);
        Some(NodeKind::Link {
            href,
            title,
            label: Box::new(label),
        })
    }

    /// Parse a nested block terminated by `end`, one level deeper.
    ///
    /// `open` is where the enclosing delimiter starts. Past the nesting limit
    /// the construct is rejected.
    fn parse_nested(&mut self, end: &'static str, open: usize) -> Option<Node> {
        if self.depth >= self.max_depth {
            self.reject(open, self.pos);
            return None;
        }

        self.depth += 1;
        let node = self.parse_block(Some(end));
        self.depth -= 1;

        Some(node)
    }

    /// Remember the first delimiter the nesting limit turned into text.
    fn reject(&mut self, open: usize, open_end: usize) {
        if self.rejected.is_none() {
            debug!(
                offset = self.span(open, open).start,
                limit = self.max_depth,
                "nesting limit reached, treating delimiter as text"
            );
            self.rejected = Some(self.span(open, open_end));
        }
    }
}

/// Length in chars of the delimiter that opens a nesting construct.
fn opening_len(kind: &NodeKind) -> usize {
    match kind {
        NodeKind::Bold(_) | NodeKind::Strike(_) => 2,
        _ => 1,
    }
}

/// Split a link target into href and optional title.
///
/// The separator is a run of whitespace followed by `"`. The title is the
/// piece after the first separator, up to any further separator, minus its
/// final character (the closing quote).
fn split_target(target: &str) -> (String, Option<String>) {
    let pieces = split_quoted(target);
    let href = pieces.first().copied().unwrap_or_default().to_string();
    let title = pieces.get(1).map(|piece| {
        let mut chars = piece.chars();
        chars.next_back();
        chars.as_str().to_string()
    });

    (href, title)
}

fn split_quoted(target: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut chars = target.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !c.is_whitespace() {
            continue;
        }
        while chars.next_if(|(_, next)| next.is_whitespace()).is_some() {}

        if let Some((quote, _)) = chars.next_if(|&(_, next)| next == '"') {
            pieces.push(&target[piece_start..i]);
            piece_start = quote + 1;
        }
    }

    pieces.push(&target[piece_start..]);
    pieces
}
