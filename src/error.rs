//! Error types for alto-edit.

use thiserror::Error;

/// Result type alias for alto-edit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or editing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error (malformed input).
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A mutation path did not resolve to a node.
    ///
    /// The document passed to the failed operation is left untouched.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
