//! Errors raised while loading definitions into a context.

use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{Lexeme, SourceFile, SourceLocation};
use crate::execute::ExecutionStatus;
use crate::parser::ParserError;

/// A typed-instantiation failure: missing required field, wrong primitive
/// type, enum value outside its set, unknown field type.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LanguageError {
    pub message: String,
    pub source_file: Option<Arc<SourceFile>>,
    pub location: Option<SourceLocation>,
}

impl LanguageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_file: None,
            location: None,
        }
    }

    /// An error pinned to the lexeme nearest the offending input.
    pub fn at(message: impl Into<String>, lexeme: &Lexeme) -> Self {
        Self {
            message: message.into(),
            source_file: Some(Arc::clone(&lexeme.source)),
            location: Some(lexeme.location),
        }
    }

    pub fn at_opt(message: impl Into<String>, lexeme: Option<&Lexeme>) -> Self {
        match lexeme {
            Some(lexeme) => Self::at(message, lexeme),
            None => Self::new(message),
        }
    }
}

/// Any failure surfaced by a [`LanguageContext`](crate::lang::LanguageContext)
/// mutation.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error("extension '{name}' does not declare a target type")]
    MissingExtensionTarget { name: SmolStr },

    #[error("extension '{name}' targets '{target}', which is not in the context")]
    UnknownExtensionTarget { name: SmolStr, target: SmolStr },

    #[error(
        "extension '{name}' cannot be removed: '{referent}' still references \
         content it added to '{target}'"
    )]
    ExtensionRemovalBlocked {
        name: SmolStr,
        target: SmolStr,
        referent: SmolStr,
    },

    #[error("definition '{name}' is not in the context")]
    UnknownDefinition { name: SmolStr },
}

impl ContextError {
    /// The execution status this error maps to when surfaced by a command.
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::Parser(_) | Self::Language(_) => ExecutionStatus::ParserFailure,
            Self::MissingExtensionTarget { .. }
            | Self::UnknownExtensionTarget { .. }
            | Self::ExtensionRemovalBlocked { .. }
            | Self::UnknownDefinition { .. } => ExecutionStatus::GeneralFailure,
        }
    }
}
