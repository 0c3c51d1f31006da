//! `UndefinedFields`: no structure node holds keys its schema does not
//! declare.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::{Definition, FIELD_NAME, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "UndefinedFields";

/// Checks every schema-governed node of the structure, each against its
/// own governing schema.
pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::nodes(context, definition) {
        let declared: Vec<&str> = node
            .schema
            .field_entries()
            .into_iter()
            .filter_map(|entry| entry.get(FIELD_NAME).and_then(Value::as_str))
            .collect();
        for key in node.structure.keys().filter_map(Value::as_str) {
            if !declared.contains(&key) {
                result.add_finding(
                    definition,
                    FindingSeverity::Error,
                    format!(
                        "Field '{key}' is not defined by schema '{}'",
                        node.schema.name
                    ),
                    NAME,
                    definition.lexeme_with_value(key).or(node.anchor),
                );
            }
        }
    }
    Ok(result)
}
