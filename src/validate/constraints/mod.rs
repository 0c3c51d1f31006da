//! The constraints the engine runtime implements itself.
//!
//! Declared by the `RuntimeConstraints` plugin in the core spec and
//! registered on context construction; the engine dispatches to them by
//! name like any other plugin's constraints.

use std::sync::Arc;

use crate::execute::{ConstraintCallback, PluginRunner};
use crate::lang::{ContextError, LanguageContext};

pub mod defined_references;
pub mod enum_values;
pub mod reference_type;
pub mod required_fields;
pub mod root_keys;
pub mod subcomponents;
pub mod undefined_fields;
pub mod unique_name;
pub mod unique_requirement_ids;
pub mod usecase_actions;
pub mod usecase_participants;
pub mod validator_implementation;

pub const RUNTIME_PLUGIN_NAME: &str = "RuntimeConstraints";

/// Build and register the runtime constraint plugin. The declaring
/// definition must already be in the context (the core spec ships it).
pub fn register_runtime_plugin(context: &mut LanguageContext) -> Result<(), ContextError> {
    let plugin = context
        .get_definition_by_name(RUNTIME_PLUGIN_NAME)
        .cloned()
        .ok_or_else(|| ContextError::UnknownDefinition {
            name: RUNTIME_PLUGIN_NAME.into(),
        })?;
    let mut runner = PluginRunner::new(plugin);

    runner.add_constraint_callback(
        unique_name::NAME,
        ConstraintCallback::Schema(Arc::new(unique_name::check)),
    );
    runner.add_constraint_callback(
        required_fields::NAME,
        ConstraintCallback::Schema(Arc::new(required_fields::check)),
    );
    runner.add_constraint_callback(
        undefined_fields::NAME,
        ConstraintCallback::Schema(Arc::new(undefined_fields::check)),
    );
    runner.add_constraint_callback(
        enum_values::NAME,
        ConstraintCallback::Schema(Arc::new(enum_values::check)),
    );
    runner.add_constraint_callback(
        root_keys::NAME,
        ConstraintCallback::Schema(Arc::new(root_keys::check)),
    );
    runner.add_constraint_callback(
        validator_implementation::NAME,
        ConstraintCallback::Schema(Arc::new(validator_implementation::check)),
    );
    runner.add_constraint_callback(
        subcomponents::NAME,
        ConstraintCallback::Schema(Arc::new(subcomponents::check)),
    );
    runner.add_constraint_callback(
        usecase_participants::NAME,
        ConstraintCallback::Schema(Arc::new(usecase_participants::check)),
    );
    runner.add_constraint_callback(
        usecase_actions::NAME,
        ConstraintCallback::Schema(Arc::new(usecase_actions::check)),
    );
    runner.add_constraint_callback(
        defined_references::NAME,
        ConstraintCallback::Primitive(Arc::new(defined_references::check)),
    );
    runner.add_constraint_callback(
        reference_type::NAME,
        ConstraintCallback::Primitive(Arc::new(reference_type::check)),
    );
    runner.add_constraint_callback(
        unique_requirement_ids::NAME,
        ConstraintCallback::Context(Arc::new(unique_requirement_ids::check)),
    );

    context.register_plugin_runner(runner)
}
