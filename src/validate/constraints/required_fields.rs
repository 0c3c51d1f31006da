//! `RequiredFields`: every field named in `required` is populated.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::{Definition, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "RequiredFields";

/// Checks every schema-governed node of the structure, so one invocation
/// covers nested records as well as the top-level body.
pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::nodes(context, definition) {
        for required in node.schema.required() {
            match node.structure.get(required) {
                None | Some(Value::Null) => {
                    result.add_finding(
                        definition,
                        FindingSeverity::Error,
                        format!("Required field '{required}' is missing"),
                        NAME,
                        node.anchor,
                    );
                }
                Some(Value::String(text)) if text.is_empty() => {
                    result.add_finding(
                        definition,
                        FindingSeverity::Error,
                        format!("Required field '{required}' is empty"),
                        NAME,
                        definition.lexeme_with_value(required).or(node.anchor),
                    );
                }
                Some(Value::Sequence(items)) if items.is_empty() => {
                    result.add_finding(
                        definition,
                        FindingSeverity::Error,
                        format!("Required field '{required}' is empty"),
                        NAME,
                        definition.lexeme_with_value(required).or(node.anchor),
                    );
                }
                Some(_) => {}
            }
        }
    }
    Ok(result)
}
