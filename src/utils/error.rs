//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading benchmark or walker JSON
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Could not find {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("Malformed walker tree: {0}")]
    MalformedInput(String),
}

/// Errors raised when a record does not carry the columns a table needs
#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("Record {record} is missing required field '{field}'")]
    MissingField { record: usize, field: String },

    #[error("Field '{field}' of record {record} is not numeric")]
    NotNumeric { record: usize, field: String },

    #[error("Field '{field}' of record {record} cannot be used as a group key")]
    NotScalar { record: usize, field: String },

    #[error("Group key must have between 1 and {max} fields, got {got}")]
    InvalidKey { got: usize, max: usize },
}

/// Errors that can occur while building an aggregated table from a file
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Load(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors that can occur during chart rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("Nothing to plot: {0}")]
    EmptyData(String),

    #[error("Cannot place non-numeric value '{0}' on a numeric axis")]
    NonNumeric(String),

    #[error("Drawing failed: {0}")]
    Drawing(String),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("JSON in {} is not a list", .0.display())]
    NotAList(PathBuf),
}
