//! A small inline Markdown dialect: paragraphs, emphasis, strike, code spans,
//! links and images.
//!
//! [`parse`] turns text into an immutable [`Node`] tree and never fails.
//! [`render`] folds a tree (or text) into any output type through a
//! [`Render`] implementation.

pub mod fold;
pub mod node;
pub mod parser;

pub use fold::{Markdown, Render, render};
pub use node::{Node, NodeKind};
pub use parser::{ParseError, Parser, parse, unescape};
