use std::path::PathBuf;

use thiserror::Error;

use crate::ast::Location;

/// Result type for recast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the transformation pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reported by the parser collaborator
    #[error("Malformed input at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("class not found: {name}")]
    ClassNotFound { name: String },

    #[error("malformed type name '{name}': {reason}")]
    MalformedTypeName { name: String, reason: String },

    #[error("'{name}' is an anonymous class spelling; look it up in the numbering table")]
    AnonymousClassSpelling { name: String },

    #[error("{source} (at line {}, column {})", .location.line, .location.column)]
    At {
        location: Location,
        #[source]
        source: Box<Error>,
    },

    #[error("handler '{handler}' failed at line {}, column {}: {source}", .location.line, .location.column)]
    Handler {
        handler: String,
        location: Location,
        #[source]
        source: Box<Error>,
    },

    #[error("handler '{handler}' returned a {found} replacement for a {site} site")]
    IncompatibleReplacement {
        handler: String,
        site: &'static str,
        found: &'static str,
    },

    #[error("invalid class file {}: {message}", .path.display())]
    ClassFormat { path: PathBuf, message: String },

    #[error("Transformation error: {message}")]
    Transform { message: String },

    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a malformed-input error with location information
    pub fn malformed(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn class_not_found(name: impl Into<String>) -> Self {
        Self::ClassNotFound { name: name.into() }
    }

    pub fn malformed_type_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTypeName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a failure for handlers and rules to report
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// Attach a node location. Errors that already carry one are returned unchanged.
    pub fn at(self, location: Location) -> Self {
        match self {
            Self::At { .. } | Self::Handler { .. } => self,
            other => Self::At {
                location,
                source: Box::new(other),
            },
        }
    }

    /// Attach the file being transformed
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with location and file context peeled off
    pub fn root(&self) -> &Error {
        match self {
            Self::At { source, .. } | Self::InFile { source, .. } | Self::Handler { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}
