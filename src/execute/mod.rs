//! Execution surface shared with plugins.
//!
//! - [`result`] — statuses, messages, and [`ExecutionResult`].
//! - [`runner`] — [`PluginRunner`] and the constraint callback shapes.

pub mod result;
pub mod runner;

pub use result::{ExecutionMessage, ExecutionResult, ExecutionStatus, MessageLevel};
pub use runner::{
    CommandFn, ConstraintCallback, ConstraintError, ContextConstraintFn, PluginRunner,
    PrimitiveConstraintFn, SchemaConstraintFn,
};
