//! Error types for boundary parsing.

use serde_json::error::Category;
use thiserror::Error;

/// Errors raised when a collaborator hands over a record that does not match
/// the strict schema.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is not well-formed JSON
    #[error("Malformed JSON: {0}")]
    Syntax(String),

    /// JSON is well-formed but has unknown, missing or mistyped keys
    #[error("Schema violation: {0}")]
    Schema(String),

    /// A field parsed but holds an unusable value
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => ParseError::Schema(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => ParseError::Syntax(err.to_string()),
        }
    }
}
