//! The constraint engine: constraint declarations to collected findings.
//!
//! Dispatch is name-based. Schemas declare constraints; active plugin
//! runners resolve names to callbacks; unresolved names become Warning
//! findings rather than hard failures. Every applicable constraint runs
//! even after failures so one pass collects every finding; only
//! cancellation stops the pass, and it keeps the findings gathered so far.

use rustc_hash::FxHashSet;

use crate::execute::{ConstraintCallback, ConstraintError, ExecutionStatus};
use crate::lang::schema::{self, ROOT_SCHEMA_NAME};
use crate::lang::{Definition, LanguageContext};

use super::finding::FindingSeverity;
use super::result::ValidatorResult;
use super::walker;

/// One resolved constraint invocation against one definition.
struct Invocation<'a> {
    schema: &'a Definition,
    constraint: String,
    arguments: Vec<String>,
}

/// Validate one definition against every applicable constraint.
///
/// The definition does not have to be loaded, or even present in the
/// context; constraints walk its raw structure.
pub fn validate_definition(
    context: &LanguageContext,
    definition: &Definition,
) -> ValidatorResult {
    let mut result = ValidatorResult::new(definition.name.clone());

    for invocation in applicable_invocations(context, definition) {
        let Some(callback) = context.constraint_callback(&invocation.constraint) else {
            result.add_finding(
                definition,
                FindingSeverity::Warning,
                format!(
                    "Constraint '{}' is not implemented by any active plugin",
                    invocation.constraint
                ),
                &invocation.constraint,
                definition.name_lexeme(),
            );
            continue;
        };
        let ConstraintCallback::Schema(callback) = callback else {
            result.add_finding(
                definition,
                FindingSeverity::Warning,
                format!(
                    "Constraint '{}' is declared on a schema but not implemented \
                     as a schema constraint",
                    invocation.constraint
                ),
                &invocation.constraint,
                definition.name_lexeme(),
            );
            continue;
        };
        let outcome = callback(definition, invocation.schema, context, &invocation.arguments);
        if !absorb(&mut result, definition, &invocation.constraint, outcome) {
            return result;
        }
    }

    run_primitive_constraints(context, definition, &mut result);
    result
}

/// Validate every definition in the context, then run each registered
/// context constraint once.
pub fn validate_context(context: &LanguageContext) -> ValidatorResult {
    let mut result = ValidatorResult::new("");
    for definition in context.definitions() {
        result.merge(validate_definition(context, definition));
    }
    for runner in context.get_plugin_runners() {
        for constraint in runner.declared_context_constraints() {
            let Some(ConstraintCallback::Context(callback)) =
                context.constraint_callback(constraint)
            else {
                result.add_finding(
                    &runner.plugin_definition,
                    FindingSeverity::Warning,
                    format!(
                        "Context constraint '{constraint}' is not implemented by any \
                         active plugin"
                    ),
                    constraint,
                    runner.plugin_definition.name_lexeme(),
                );
                continue;
            };
            let outcome = callback(context);
            if !absorb(&mut result, &runner.plugin_definition, constraint, outcome) {
                return result;
            }
        }
    }
    result
}

/// Merge a callback outcome into `result`. Returns `false` when the pass
/// must stop (cancellation).
fn absorb(
    result: &mut ValidatorResult,
    definition: &Definition,
    constraint: &str,
    outcome: Result<ValidatorResult, ConstraintError>,
) -> bool {
    match outcome {
        Ok(partial) => {
            result.merge(partial);
            true
        }
        Err(ConstraintError::Cancelled(message)) => {
            result.add_finding(
                definition,
                FindingSeverity::Warning,
                format!("Constraint '{constraint}' cancelled the operation: {message}"),
                constraint,
                definition.name_lexeme(),
            );
            result.set_status(ExecutionStatus::OperationCancelled);
            false
        }
        Err(ConstraintError::Failed(message)) => {
            result.add_finding(
                definition,
                FindingSeverity::Error,
                format!("Constraint '{constraint}' failed: {message}"),
                constraint,
                definition.name_lexeme(),
            );
            result.set_status(ExecutionStatus::PluginFailure);
            true
        }
    }
}

/// The deduplicated schema-constraint invocations applicable to one
/// definition: constraints declared by its governing schema and that
/// schema's ancestors and components, plus every universal constraint.
fn applicable_invocations<'a>(
    context: &'a LanguageContext,
    definition: &Definition,
) -> Vec<Invocation<'a>> {
    let governing = schema::definition_schema(context, definition);
    let mut schemas: Vec<&Definition> = Vec::new();
    if let Some(governing) = governing {
        schemas.push(governing);
        schemas.extend(schema::schema_ancestors(context, governing));
        for component in schema::schema_components(context, definition) {
            if !schemas.iter().any(|seen| seen.name == component.name) {
                schemas.push(component);
            }
        }
    }

    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
    let mut invocations = Vec::new();
    for &declaring in &schemas {
        for entry in declaring.constraint_refs() {
            let Some(name) = entry.get("name").and_then(serde_yaml::Value::as_str) else {
                continue;
            };
            if !seen.insert((declaring.name.to_string(), name.to_string())) {
                continue;
            }
            let arguments = entry
                .get("arguments")
                .and_then(serde_yaml::Value::as_sequence)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(serde_yaml::Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            invocations.push(Invocation {
                schema: declaring,
                constraint: name.to_string(),
                arguments,
            });
        }
    }

    // Universal constraints bind to the governing schema, or to `Root`
    // when the root key itself is unknown, so they always run.
    let binding = governing.or_else(|| context.get_definition_by_name(ROOT_SCHEMA_NAME));
    if let Some(binding) = binding {
        for runner in context.get_plugin_runners() {
            for (name, universal) in runner.declared_schema_constraints() {
                if !universal {
                    continue;
                }
                if !seen.insert((binding.name.to_string(), name.to_string())) {
                    continue;
                }
                invocations.push(Invocation {
                    schema: binding,
                    constraint: name.to_string(),
                    arguments: Vec::new(),
                });
            }
        }
    }
    invocations
}

fn run_primitive_constraints(
    context: &LanguageContext,
    definition: &Definition,
    result: &mut ValidatorResult,
) {
    let leaves = walker::primitive_leaves(context, definition);
    for runner in context.get_plugin_runners() {
        for (constraint, primitive) in runner.declared_primitive_constraints() {
            let Some(ConstraintCallback::Primitive(callback)) =
                context.constraint_callback(constraint)
            else {
                continue;
            };
            for leaf in leaves.iter().filter(|leaf| leaf.primitive == primitive) {
                let outcome = callback(leaf.value, definition, leaf.lexeme, context, &[]);
                if !absorb(result, definition, constraint, outcome) {
                    return;
                }
            }
        }
    }
}
