//! `EnumValues`: enum-typed fields hold values from the enum's current
//! (extension-applied) value set.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::schema::{self, ROOT_KEY_ENUM, PRIMITIVES_ENUM_NAME};
use crate::lang::{Definition, FIELD_NAME, FIELD_TYPE, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "EnumValues";

/// Checks every schema-governed node of the structure, so enum-typed
/// fields of nested records are covered by one invocation.
pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::nodes(context, definition) {
        for entry in node.schema.field_entries() {
            let Some(field_name) = entry.get(FIELD_NAME).and_then(Value::as_str) else {
                continue;
            };
            let Some(declared) = entry.get(FIELD_TYPE).and_then(Value::as_str) else {
                continue;
            };
            let declared = schema::base_type(declared);
            if context.is_primitive_type(declared) {
                continue;
            }
            let Some(target) = context.get_definition_by_name(declared) else {
                continue;
            };
            if target.root_key() != ROOT_KEY_ENUM || target.name == PRIMITIVES_ENUM_NAME {
                continue;
            }
            let Some(value) = node.structure.get(field_name) else {
                continue;
            };
            let elements: Vec<&Value> = match value {
                Value::Sequence(items) => items.iter().collect(),
                other => vec![other],
            };
            for element in elements {
                let Some(rendered) = walker::render_scalar(element) else {
                    continue;
                };
                if target.values().contains(&rendered.as_str()) {
                    continue;
                }
                result.add_finding(
                    definition,
                    FindingSeverity::Error,
                    format!(
                        "Undefined value '{rendered}' for enum '{}'; expected one of [{}]",
                        target.name,
                        target.values().join(", ")
                    ),
                    NAME,
                    walker::scalar_lexeme(definition, field_name, element),
                );
            }
        }
    }
    Ok(result)
}
