//! Document error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Node not found in document")]
    NodeNotFound,

    #[error("Node is not an element")]
    NotAnElement,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Faults raised by the history API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History API is not available")]
    Unsupported,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL {url} cannot be pushed from origin {origin}")]
    SecurityError { url: String, origin: String },
}
