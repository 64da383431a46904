pub mod error;
pub mod escape;
mod block;
mod inline;
mod scanner;

pub use error::ParseError;
pub use escape::unescape;

use tracing::trace;

use crate::node::Node;
use crate::parser::scanner::Scanner;

/// How many emphasis, strike and link label levels may nest by default.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parse Markdown text into a tree.
///
/// Never fails: malformed constructs come back as literal text, and so do
/// constructs nested deeper than [`DEFAULT_MAX_DEPTH`].
pub fn parse(source: &str) -> Node {
    trace!(chars = source.chars().count(), "parsing");
    Scanner::new(source, DEFAULT_MAX_DEPTH).parse_document()
}

/// Parser entry point with a configurable nesting limit.
pub struct Parser {
    source: String,
    file_id: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(source: impl Into<String>, file_id: usize) -> Self {
        Parser {
            source: source.into(),
            file_id,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse, failing if any construct had to be rejected for nesting too deep.
    pub fn parse(&self) -> Result<Node, ParseError> {
        let mut scanner = self.scanner();
        let root = scanner.parse_document();
        match scanner.rejected.take() {
            Some(span) => Err(ParseError::nesting_too_deep(
                self.max_depth,
                span,
                self.file_id,
            )),
            None => Ok(root),
        }
    }

    /// Parse, degrading over-deep constructs to literal text.
    pub fn parse_lenient(&self) -> Node {
        self.scanner().parse_document()
    }

    fn scanner(&self) -> Scanner<'_> {
        trace!(
            file_id = self.file_id,
            max_depth = self.max_depth,
            "parsing"
        );
        Scanner::new(&self.source, self.max_depth)
    }
}
