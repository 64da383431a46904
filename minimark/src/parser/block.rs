use crate::node::{Node, NodeKind};
use crate::parser::scanner::Scanner;

/// Accumulates the children of one block while it is being scanned.
struct BlockBuilder {
    start: usize,
    paragraph_start: usize,
    text_start: usize,
    /// Pending plain text, escapes already resolved.
    text: String,
    /// Children of the open paragraph, or loose children if no paragraph
    /// break has been seen yet.
    siblings: Vec<Node>,
    /// Closed paragraphs.
    paragraphs: Vec<Node>,
}

impl BlockBuilder {
    fn new(start: usize) -> Self {
        BlockBuilder {
            start,
            paragraph_start: start,
            text_start: start,
            text: String::new(),
            siblings: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    fn flush_text(&mut self, scanner: &Scanner<'_>, end: usize) {
        if self.text.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.text);
        self.siblings
            .push(scanner.node(NodeKind::Text { content }, self.text_start, end));
    }

    fn push(&mut self, scanner: &Scanner<'_>, node: Node, node_start: usize) {
        self.flush_text(scanner, node_start);
        self.siblings.push(node);
        self.text_start = scanner.pos;
    }

    /// Close the open paragraph at `end`, then reopen at the cursor.
    fn break_paragraph(&mut self, scanner: &Scanner<'_>, end: usize) {
        if !self.text.is_empty() || !self.siblings.is_empty() {
            self.flush_text(scanner, end);
            let children = std::mem::take(&mut self.siblings);
            self.paragraphs.push(scanner.node(
                NodeKind::Paragraph(children),
                self.paragraph_start,
                end,
            ));
        }

        self.paragraph_start = scanner.pos;
        self.text_start = scanner.pos;
    }

    fn finish(mut self, scanner: &Scanner<'_>) -> Node {
        let end = scanner.pos;
        self.flush_text(scanner, end);

        let mut children = if self.paragraphs.is_empty() {
            self.siblings
        } else {
            if !self.siblings.is_empty() {
                let children = std::mem::take(&mut self.siblings);
                self.paragraphs.push(scanner.node(
                    NodeKind::Paragraph(children),
                    self.paragraph_start,
                    end,
                ));
            }
            self.paragraphs
        };

        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }

        scanner.node(NodeKind::Fragment(children), self.start, end)
    }
}

impl Scanner<'_> {
    /// Parse the whole input.
    pub(super) fn parse_document(&mut self) -> Node {
        self.parse_block(None)
    }

    /// Parse a run of content up to `end`.
    ///
    /// With a terminator the block also stops at any line break, so nested
    /// constructs never span lines. Paragraph breaks are only recognized
    /// without a terminator.
    pub(super) fn parse_block(&mut self, end: Option<&str>) -> Node {
        let mut block = BlockBuilder::new(self.pos);

        while let Some(c) = self.current() {
            if let Some(escaped) = self.escaped() {
                block.text.push(escaped);
                self.advance(2);
                continue;
            }

            if let Some(end) = end {
                if self.matches(end) || self.at_line_break() {
                    break;
                }
            }

            if self.at_paragraph_break() {
                let break_start = self.pos;
                self.skip_line_breaks();
                block.break_paragraph(self, break_start);
                continue;
            }

            let node_start = self.pos;
            match self.parse_construct() {
                Some(node) => block.push(self, node, node_start),
                None => {
                    self.pos = node_start;
                    block.text.push(c);
                    self.advance(1);
                }
            }
        }

        block.finish(self)
    }
}
