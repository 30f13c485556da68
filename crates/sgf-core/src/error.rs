//! Error types for the SGF parser
//!
//! All fallible operations return `Result<T, Error>`.
//! `Display` renders the newline-joined diagnostic text handed to callers.

use crate::parser::scanner::Span;

/// SGF parser error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Structural violation found while scanning the text
    #[error("{message} (at {span})")]
    SyntaxError { message: String, span: Span },

    /// A node's property list could not be consumed
    #[error("{source}\nError in parsing a node. (node at {span})")]
    NodeError { span: Span, source: Box<Error> },

    /// Known property with the wrong arity or a malformed value
    #[error("Bad {id} property: {message}")]
    PropertyError { id: String, message: String },

    /// Collection shape the record extractor cannot handle
    #[error("{0}")]
    CollectionError(String),

    /// Post-extraction check failed
    #[error("{0}")]
    CheckError(String),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, span: Span) -> Self {
        Error::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn property(id: &str, message: impl Into<String>) -> Self {
        Error::PropertyError {
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Individual diagnostic lines, outermost last
    pub fn messages(&self) -> Vec<String> {
        self.to_string().lines().map(str::to_string).collect()
    }
}

/// Result type alias for SGF operations
pub type Result<T> = std::result::Result<T, Error>;
