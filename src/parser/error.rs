//! Parser error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::SourceLocation;

/// Errors raised while scanning or parsing AaC YAML source.
///
/// Every variant carries the source URI so callers can report findings
/// without holding on to the original text. All variants map to the
/// `ParserFailure` execution status.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The YAML stream itself was invalid.
    #[error("{source_uri}: failed to parse, invalid YAML: {message}")]
    InvalidYaml {
        source_uri: String,
        message: String,
        location: Option<SourceLocation>,
    },

    /// The scanner hit a byte sequence it could not tokenize.
    #[error("{source_uri}: unrecognized token at line {line}, column {column}")]
    UnrecognizedToken {
        source_uri: String,
        line: usize,
        column: usize,
    },

    /// A document body was not a mapping, or had more than one root key.
    #[error("{source_uri}: {message}")]
    MalformedDocument { source_uri: String, message: String },

    /// A non-import document without a `name` field in its body.
    #[error("{source_uri}: definition is missing field 'name'")]
    MissingName { source_uri: String },

    /// A list field where at least one element was required.
    #[error("Missing value for field: {field}")]
    MissingListValue { source_uri: String, field: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParserError {
    /// The URI of the source the error was raised for, when one applies.
    pub fn source_uri(&self) -> Option<&str> {
        match self {
            Self::InvalidYaml { source_uri, .. }
            | Self::UnrecognizedToken { source_uri, .. }
            | Self::MalformedDocument { source_uri, .. }
            | Self::MissingName { source_uri }
            | Self::MissingListValue { source_uri, .. } => Some(source_uri),
            Self::Io { .. } => None,
        }
    }
}
