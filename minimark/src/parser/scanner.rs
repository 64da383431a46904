use std::collections::HashMap;
use std::ops::Range;

use crate::node::{Node, NodeKind};

/// Cursor over the input's characters.
///
/// Positions are char indices, so a multi-byte character is always a single
/// step. `offsets` maps each position (and the end of input) back to a byte
/// offset for slicing `source` and reporting spans.
pub(super) struct Scanner<'a> {
    input: &'a str,
    chars: Vec<char>,
    offsets: Vec<usize>,
    pub(super) pos: usize,
    pub(super) depth: usize,
    pub(super) max_depth: usize,
    /// Byte span of the first delimiter rejected by the nesting limit.
    pub(super) rejected: Option<Range<usize>>,
    /// Outcome of every construct attempted so far, keyed by start position.
    pub(super) constructs: HashMap<usize, Option<Parsed>>,
    /// Where a raw run to a given end stops, keyed by (start, end).
    raw_ends: HashMap<(usize, &'static str), usize>,
}

/// A construct that parsed, as remembered for later attempts at its position.
pub(super) struct Parsed {
    pub(super) node: Node,
    /// Position just past the construct.
    pub(super) end: usize,
    /// Levels of emphasis, strike and link labels inside, this one included.
    pub(super) height: usize,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(input: &'a str, max_depth: usize) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut offsets = Vec::with_capacity(input.len() + 1);
        for (offset, c) in input.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(input.len());

        Scanner {
            input,
            chars,
            offsets,
            pos: 0,
            depth: 0,
            max_depth,
            rejected: None,
            constructs: HashMap::new(),
            raw_ends: HashMap::new(),
        }
    }

    pub(super) fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(super) fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    pub(super) fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.chars.len());
    }

    /// Whether `expected` occurs at the cursor.
    pub(super) fn matches(&self, expected: &str) -> bool {
        self.matches_at(self.pos, expected)
    }

    pub(super) fn matches_at(&self, at: usize, expected: &str) -> bool {
        expected
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(at + i) == Some(&c))
    }

    /// Consume `expected` if it occurs at the cursor.
    pub(super) fn eat(&mut self, expected: &str) -> Option<()> {
        if self.matches(expected) {
            self.advance(expected.chars().count());
            Some(())
        } else {
            None
        }
    }

    /// The character following a backslash at the cursor, if any.
    pub(super) fn escaped(&self) -> Option<char> {
        self.escaped_at(self.pos)
    }

    fn escaped_at(&self, at: usize) -> Option<char> {
        match self.chars.get(at) {
            Some('\\') => self.chars.get(at + 1).copied(),
            _ => None,
        }
    }

    /// Length in chars of the line break starting at `at`, or 0.
    fn line_break_len(&self, at: usize) -> usize {
        match (self.chars.get(at), self.chars.get(at + 1)) {
            (Some('\r'), Some('\n')) => 2,
            (Some('\r'), _) | (Some('\n'), _) => 1,
            _ => 0,
        }
    }

    pub(super) fn at_line_break(&self) -> bool {
        self.line_break_len(self.pos) > 0
    }

    /// Two line breaks in a row, i.e. a blank line.
    pub(super) fn at_paragraph_break(&self) -> bool {
        match self.line_break_len(self.pos) {
            0 => false,
            first => self.line_break_len(self.pos + first) > 0,
        }
    }

    pub(super) fn skip_line_breaks(&mut self) {
        while matches!(self.current(), Some('\r' | '\n')) {
            self.pos += 1;
        }
    }

    /// Where a raw run from the cursor stops: at `end`, a line break or the
    /// end of input. Escaped characters never stop a run.
    ///
    /// Runs to the same `end` that meet at a position stop at the same place,
    /// so every position walked is remembered.
    pub(super) fn raw_end(&mut self, end: &'static str) -> usize {
        let mut at = self.pos;
        let mut walked = Vec::new();

        let stop = loop {
            if let Some(&stop) = self.raw_ends.get(&(at, end)) {
                break stop;
            }
            walked.push(at);

            if self.escaped_at(at).is_some() {
                at += 2;
            } else if at >= self.chars.len()
                || self.matches_at(at, end)
                || self.line_break_len(at) > 0
            {
                break at;
            } else {
                at += 1;
            }
        };

        for at in walked {
            self.raw_ends.insert((at, end), stop);
        }
        stop
    }

    /// Consume the raw text up to `stop`, resolving escapes.
    pub(super) fn raw_text(&mut self, stop: usize) -> String {
        let mut text = String::new();

        while self.pos < stop {
            match self.escaped() {
                Some(escaped) => {
                    text.push(escaped);
                    self.advance(2);
                }
                None => {
                    text.push(self.chars[self.pos]);
                    self.advance(1);
                }
            }
        }

        text
    }

    /// Consume a raw run up to `end`, but only if `close` follows it.
    pub(super) fn raw_run_until(&mut self, end: &'static str, close: &str) -> Option<String> {
        let stop = self.raw_end(end);
        if !self.matches_at(stop, close) {
            return None;
        }
        Some(self.raw_text(stop))
    }

    pub(super) fn span(&self, start: usize, end: usize) -> Range<usize> {
        self.offsets[start]..self.offsets[end]
    }

    pub(super) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[self.span(start, end)]
    }

    /// Build a node covering the chars `start..end`.
    pub(super) fn node(&self, kind: NodeKind, start: usize, end: usize) -> Node {
        Node::new(kind, self.slice(start, end), self.span(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_chars_not_bytes() {
        let scanner = Scanner::new("é*x", 8);
        assert_eq!(scanner.chars.len(), 3);
        assert_eq!(scanner.span(1, 2), 2..3);
        assert_eq!(scanner.slice(0, 3), "é*x");
    }

    #[test]
    fn line_breaks() {
        let mut scanner = Scanner::new("a\r\nb\n\r\nc\r\rd", 8);
        scanner.pos = 1;
        assert!(scanner.at_line_break());
        assert!(!scanner.at_paragraph_break());
        scanner.pos = 4;
        assert!(scanner.at_paragraph_break());
        scanner.skip_line_breaks();
        assert_eq!(scanner.current(), Some('c'));
        scanner.advance(1);
        assert!(scanner.at_paragraph_break());
    }

    #[test]
    fn raw_runs_stop_at_end_or_line_break() {
        let mut scanner = Scanner::new("a\\)b)c", 8);
        assert_eq!(scanner.raw_run_until(")", ")"), Some("a)b".to_string()));
        assert_eq!(scanner.current(), Some(')'));

        let mut scanner = Scanner::new("ab\ncd", 8);
        assert_eq!(scanner.raw_end("]"), 2);
        assert_eq!(scanner.raw_run_until("]", "]"), None);
        assert_eq!(scanner.pos, 0);
    }

    #[test]
    fn raw_runs_share_their_stop() {
        let mut scanner = Scanner::new("ab\\]c]", 8);
        assert_eq!(scanner.raw_end("]"), 5);
        scanner.pos = 1;
        assert_eq!(scanner.raw_end("]"), 5);
        // Starting on the escaped bracket changes the pairing.
        scanner.pos = 3;
        assert_eq!(scanner.raw_end("]"), 3);
        assert_eq!(scanner.raw_ends.len(), 6);
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut scanner = Scanner::new("](x", 8);
        assert_eq!(scanner.eat("]["), None);
        assert_eq!(scanner.pos, 0);
        assert_eq!(scanner.eat("]("), Some(()));
        assert_eq!(scanner.pos, 2);
    }
}
