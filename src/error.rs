//! Typed errors raised by the network core

use thiserror::Error;

/// Errors produced while indexing records, building the graph or querying it
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// A participation row is missing an identity field
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: &'static str },

    /// The requested person does not exist in the graph
    #[error("person not found in graph: {0}")]
    NotFound(String),

    /// A configuration value is outside its accepted range
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// The input table lacks a required column
    #[error("missing required column: {0}")]
    MissingColumn(String),
}
