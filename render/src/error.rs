use std::fmt;

use minimark::ParseError;

#[derive(Debug)]
pub enum RenderError {
    /// Strict parsing rejected the input.
    Parse(ParseError),
    /// Writing the rendered output failed.
    IoError(String),
}

impl RenderError {
    /// The underlying parse error, for callers that report source locations.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            RenderError::Parse(error) => Some(error),
            RenderError::IoError(_) => None,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Parse(error) => write!(f, "parse error: {}", error.message),
            RenderError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ParseError> for RenderError {
    fn from(error: ParseError) -> Self {
        RenderError::Parse(error)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(error: std::io::Error) -> Self {
        RenderError::IoError(error.to_string())
    }
}
