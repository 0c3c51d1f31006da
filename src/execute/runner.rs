//! Plugin runners: the bridge from declared constraint names to callbacks.
//!
//! The engine never hard-codes a constraint. Schemas declare constraint
//! names; active plugins register a runner pairing their plugin definition
//! with name-to-callback maps, and dispatch resolves names through every
//! active runner at evaluation time.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_yaml::Value;
use thiserror::Error;

use crate::base::Lexeme;
use crate::lang::{Definition, LanguageContext};
use crate::validate::ValidatorResult;

use super::result::ExecutionResult;

/// A failure raised from inside a constraint callback.
#[derive(Debug, Clone, Error)]
pub enum ConstraintError {
    /// The operation was cancelled; findings collected so far survive.
    #[error("operation cancelled: {0}")]
    Cancelled(String),

    /// The callback itself failed.
    #[error("{0}")]
    Failed(String),
}

/// A constraint bound to a schema. Receives the definition under test, the
/// schema declaring the constraint, the context, and declared arguments.
pub type SchemaConstraintFn = Arc<
    dyn Fn(&Definition, &Definition, &LanguageContext, &[String]) -> Result<ValidatorResult, ConstraintError>
        + Send
        + Sync,
>;

/// A constraint bound to a primitive type. Receives one leaf value, the
/// owning definition, the lexeme nearest the value, the context, and
/// declared arguments.
pub type PrimitiveConstraintFn = Arc<
    dyn Fn(
            &Value,
            &Definition,
            Option<&Lexeme>,
            &LanguageContext,
            &[String],
        ) -> Result<ValidatorResult, ConstraintError>
        + Send
        + Sync,
>;

/// A constraint that runs once over the whole context.
pub type ContextConstraintFn =
    Arc<dyn Fn(&LanguageContext) -> Result<ValidatorResult, ConstraintError> + Send + Sync>;

/// A registered constraint callback of any of the three kinds.
#[derive(Clone)]
pub enum ConstraintCallback {
    Schema(SchemaConstraintFn),
    Primitive(PrimitiveConstraintFn),
    Context(ContextConstraintFn),
}

impl std::fmt::Debug for ConstraintCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Schema(_) => "Schema",
            Self::Primitive(_) => "Primitive",
            Self::Context(_) => "Context",
        };
        f.debug_tuple("ConstraintCallback").field(&kind).finish()
    }
}

/// A command contributed by a plugin.
pub type CommandFn = Arc<dyn Fn(&[String], &LanguageContext) -> ExecutionResult + Send + Sync>;

/// One active plugin: its declaring definition plus callback maps.
#[derive(Clone)]
pub struct PluginRunner {
    pub plugin_definition: Definition,
    command_to_callback: FxHashMap<String, CommandFn>,
    constraint_to_callback: FxHashMap<String, ConstraintCallback>,
}

impl std::fmt::Debug for PluginRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRunner")
            .field("plugin", &self.plugin_definition.name)
            .field("commands", &self.command_to_callback.keys().collect::<Vec<_>>())
            .field(
                "constraints",
                &self.constraint_to_callback.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl PluginRunner {
    pub fn new(plugin_definition: Definition) -> Self {
        Self {
            plugin_definition,
            command_to_callback: FxHashMap::default(),
            constraint_to_callback: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.plugin_definition.name.as_str()
    }

    pub fn add_command_callback(&mut self, name: impl Into<String>, callback: CommandFn) {
        self.command_to_callback.insert(name.into(), callback);
    }

    pub fn add_constraint_callback(
        &mut self,
        name: impl Into<String>,
        callback: ConstraintCallback,
    ) {
        self.constraint_to_callback.insert(name.into(), callback);
    }

    pub fn command_callback(&self, name: &str) -> Option<&CommandFn> {
        self.command_to_callback.get(name)
    }

    pub fn constraint_callback(&self, name: &str) -> Option<&ConstraintCallback> {
        self.constraint_to_callback.get(name)
    }

    /// The schema-constraint entries declared by this plugin, with their
    /// `universal` flag.
    pub fn declared_schema_constraints(&self) -> Vec<(&str, bool)> {
        self.declared_entries("schema_constraints")
            .into_iter()
            .map(|entry| {
                let name = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let universal = entry
                    .get("universal")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                (name, universal)
            })
            .collect()
    }

    /// The primitive-constraint entries declared by this plugin, as
    /// `(constraint name, primitive type)` pairs.
    pub fn declared_primitive_constraints(&self) -> Vec<(&str, &str)> {
        self.declared_entries("primitive_constraints")
            .into_iter()
            .filter_map(|entry| {
                let name = entry.get("name").and_then(Value::as_str)?;
                let primitive = entry.get("primitive").and_then(Value::as_str)?;
                Some((name, primitive))
            })
            .collect()
    }

    /// The context-constraint names declared by this plugin.
    pub fn declared_context_constraints(&self) -> Vec<&str> {
        self.declared_entries("context_constraints")
            .into_iter()
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .collect()
    }

    fn declared_entries(&self, field: &str) -> Vec<&serde_yaml::Mapping> {
        self.plugin_definition
            .top_level_fields()
            .and_then(|body| body.get(field))
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().filter_map(Value::as_mapping).collect())
            .unwrap_or_default()
    }
}
