//! Constraint evaluation and findings.
//!
//! - [`finding`] — severities, locations, and [`ValidatorFinding`]s.
//! - [`result`] — [`ValidatorResult`], the aggregate of one validation pass.
//! - [`engine`] — dispatch: declared constraint names to plugin callbacks.
//! - [`constraints`] — the runtime's built-in constraint implementations.
//! - [`walker`] — schema-guided traversal of raw structures.

pub mod constraints;
pub mod engine;
pub mod finding;
pub mod result;
pub mod walker;

pub use engine::{validate_context, validate_definition};
pub use finding::{FindingLocation, FindingSeverity, ValidatorFinding, ValidatorFindings};
pub use result::ValidatorResult;
