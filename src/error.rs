//! Error types for xmlschema-infer
//!
//! Inference itself is total: once a root element exists, analysis and
//! emission always succeed. Every error here comes from reading or parsing the
//! input document.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema inference
#[derive(Error, Debug)]
pub enum Error {
    /// The XML parser rejected the input
    #[error("invalid input: XML parse error: {0}")]
    Parse(#[from] ParseError),

    /// The input parsed but contains no root element
    #[error("invalid input: no root element found in XML document")]
    NoRootElement,

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the errors caused by the content of the input itself
    /// (as opposed to limits or I/O)
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::NoRootElement)
    }
}

/// XML syntax error reported by a tree parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Diagnostic text produced by the parser
    pub message: String,
    /// Location in the input, if the parser reported one
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Expecting </item> found </root>").with_location("byte 19");

        let msg = format!("{}", err);
        assert!(msg.contains("Expecting </item> found </root>"));
        assert!(msg.contains("byte 19"));
    }

    #[test]
    fn test_error_conversion_embeds_detail() {
        let err: Error = ParseError::new("unexpected end of input").into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("unexpected end of input"));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_no_root_message_is_distinct() {
        let no_root = Error::NoRootElement.to_string();
        let parse = Error::Parse(ParseError::new("boom")).to_string();
        assert_ne!(no_root, parse);
        assert!(no_root.contains("no root element"));
    }

    #[test]
    fn test_limit_error_is_not_invalid_input() {
        assert!(!Error::LimitExceeded("too deep".into()).is_invalid_input());
    }
}
