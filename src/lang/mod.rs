//! The language layer: definitions, the context, and loading semantics.
//!
//! - [`definition`] — [`Definition`], the fundamental unit.
//! - [`instance`] — typed [`Instance`] trees built during loading.
//! - [`context`] — [`LanguageContext`], the definition registry.
//! - [`core_spec`] — the embedded self-describing core spec.
//! - [`inheritance`] / [`extensions`] — structure merging and mutation.
//! - [`schema`] — schema resolution for definitions and field paths.
//! - [`definition_parser`] — the instantiator.

pub mod context;
pub mod core_spec;
pub mod definition;
pub mod definition_parser;
pub mod error;
pub mod extensions;
pub mod inheritance;
pub mod instance;
pub mod schema;

pub use context::LanguageContext;
pub use definition::{
    Definition, FIELD_CONSTRAINTS, FIELD_ENUM_EXT, FIELD_FIELDS, FIELD_INHERITS, FIELD_NAME,
    FIELD_REQUIRED, FIELD_SCHEMA_EXT, FIELD_TYPE, FIELD_VALUES, ROOT_KEY_EXTENSION,
    ROOT_KEY_IMPORT,
};
pub use error::{ContextError, LanguageError};
pub use instance::{Instance, InstanceField, InstanceValue};
