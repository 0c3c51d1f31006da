//! Foundation types for the AaC engine.
//!
//! This module provides the fundamental types used throughout the core:
//! - [`SourceLocation`] - line/column/offset/span positions
//! - [`SourceFile`] - an opened, possibly user-editable document
//! - [`Lexeme`] - a YAML token with value and source span
//! - [`LineIndex`] - byte offset to line/column conversion
//!
//! This module has NO dependencies on other aac modules.

mod lexeme;
mod line_index;
mod location;
mod source;

pub use lexeme::Lexeme;
pub use line_index::LineIndex;
pub use location::SourceLocation;
pub use source::SourceFile;
