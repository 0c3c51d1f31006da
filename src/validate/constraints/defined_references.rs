//! `DefinedReferences`: every `reference`-typed value resolves to at least
//! one definition.

use serde_yaml::Value;

use crate::base::Lexeme;
use crate::execute::ConstraintError;
use crate::lang::{Definition, LanguageContext};
use crate::reference;
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "DefinedReferences";

pub fn check(
    value: &Value,
    definition: &Definition,
    lexeme: Option<&Lexeme>,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    let Some(expression) = walker::render_scalar(value) else {
        return Ok(result);
    };
    let (valid, message) = reference::is_reference_format_valid(&expression);
    if !valid {
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!("Invalid reference '{expression}': {message}"),
            NAME,
            lexeme,
        );
        return Ok(result);
    }
    if reference::resolve_references(&expression, context).is_empty() {
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!("Reference '{expression}' does not resolve to a definition"),
            NAME,
            lexeme,
        );
    }
    Ok(result)
}
