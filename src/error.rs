//! Error types shared by the domain, codec, storage and database layers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ItemKind;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, GtdError>;

#[derive(Debug, Error)]
pub enum GtdError {
    /// The abstract base item type was asked for by name
    #[error("GTD type '{0}' is abstract and cannot be instantiated")]
    AbstractType(String),

    #[error("No such file: {}", .0.display())]
    NoSuchFile(PathBuf),

    #[error("Unsupported GTD type: '{0}'")]
    UnsupportedGtdType(String),

    #[error("Unknown status '{status}' for {kind}")]
    UnknownStatus { kind: ItemKind, status: String },

    #[error("No config record found in the input files")]
    MissingConfig,

    #[error("Record at line {line} is missing required field '{field}'")]
    MissingField { field: &'static str, line: usize },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Context tag '{tag}' does not match pattern '{pattern}'")]
    UnmatchedContext { tag: String, pattern: String },

    #[error("Invalid context tag pattern '{pattern}': {message}")]
    InvalidContextPattern { pattern: String, message: String },

    #[error("Context '{name}' cannot be written with pattern '{pattern}'")]
    UnrenderableContext { name: String, pattern: String },

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GtdError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GtdError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        GtdError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
