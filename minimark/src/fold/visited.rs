//! Payloads handed to [`Render`](super::Render) callbacks.
//!
//! Each payload borrows its fields from the tree node being folded. Child
//! nodes are replaced by the values their own callbacks returned.

use std::ops::Range;

/// A `text` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Text<'a> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub content: &'a str,
}

/// A `bold`, `italic` or `strike` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Styled<'a, T> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub children: T,
}

/// A `code` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Code<'a> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub content: &'a str,
}

/// A `link` node; `children` is the folded label.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<'a, T> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub href: &'a str,
    pub title: Option<&'a str>,
    pub children: T,
}

/// An `image` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<'a> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub src: &'a str,
    pub alt: &'a str,
}

/// A `paragraph` or `fragment` node.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a, T> {
    pub index: usize,
    pub source: &'a str,
    pub span: Range<usize>,
    pub children: Vec<T>,
}
