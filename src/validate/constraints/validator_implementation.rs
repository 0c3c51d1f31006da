//! `ValidatorImplementationExists`: every constraint a schema declares
//! resolves to an active plugin callback.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::schema::ROOT_KEY_SCHEMA;
use crate::lang::{Definition, FIELD_NAME, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;

pub const NAME: &str = "ValidatorImplementationExists";

pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    if definition.root_key() != ROOT_KEY_SCHEMA {
        return Ok(result);
    }
    for entry in definition.constraint_refs() {
        let Some(declared) = entry.get(FIELD_NAME).and_then(Value::as_str) else {
            continue;
        };
        if context.constraint_callback(declared).is_some() {
            continue;
        }
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!("Constraint '{declared}' is not implemented by any active plugin"),
            NAME,
            definition.lexeme_with_value(declared),
        );
    }
    Ok(result)
}
