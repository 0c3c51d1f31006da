//! # aac-base
//!
//! Core library for Architecture-as-Code: definition parsing, context
//! loading, and constraint evaluation over multi-document YAML models.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! reference → dotted reference expressions with selectors
//!   ↓
//! validate  → constraint engine, findings, built-in constraints
//!   ↓
//! execute   → plugin runners, execution statuses and results
//!   ↓
//! lang      → Definition, LanguageContext, core spec, instantiation
//!   ↓
//! parser    → Logos YAML scanner, document parsing, cache, imports
//!   ↓
//! base      → Primitives (SourceFile, SourceLocation, Lexeme, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → lang → execute → validate)
// ============================================================================

/// Foundation types: SourceFile, SourceLocation, Lexeme, LineIndex
pub mod base;

/// Parser: Logos YAML scanner, multi-document parsing, LFU cache, imports
pub mod parser;

/// Language: Definition, LanguageContext, schemas, instantiation
pub mod lang;

/// Execution surface: plugin runners, statuses, results
pub mod execute;

/// Validation: constraint engine, findings, built-in constraints
pub mod validate;

/// Reference resolution: dotted expressions with selectors
pub mod reference;

// Re-export commonly needed items
pub use execute::{ExecutionResult, ExecutionStatus, PluginRunner};
pub use lang::{ContextError, Definition, Instance, LanguageContext, LanguageError};
pub use parser::{ParserCache, ParserError};
pub use reference::{is_reference_format_valid, resolve_references};
pub use validate::{ValidatorFinding, ValidatorResult, validate_context, validate_definition};

// Re-export foundation types
pub use base::{Lexeme, LineIndex, SourceFile, SourceLocation};
