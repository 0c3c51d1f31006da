//! `ReferenceType`: resolved reference targets carry one of the declared
//! root keys.

use serde_yaml::Value;

use crate::base::Lexeme;
use crate::execute::ConstraintError;
use crate::lang::{Definition, LanguageContext};
use crate::reference;
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "ReferenceType";

/// With no declared arguments every root key is acceptable, so the
/// constraint is a no-op; format and resolvability are `DefinedReferences`'
/// concern.
pub fn check(
    value: &Value,
    definition: &Definition,
    lexeme: Option<&Lexeme>,
    context: &LanguageContext,
    arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    if arguments.is_empty() {
        return Ok(result);
    }
    let Some(expression) = walker::render_scalar(value) else {
        return Ok(result);
    };
    let (valid, _) = reference::is_reference_format_valid(&expression);
    if !valid {
        return Ok(result);
    }
    for target in reference::resolve_references(&expression, context) {
        if arguments.iter().any(|allowed| allowed == target.root_key()) {
            continue;
        }
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!(
                "Reference '{expression}' targets '{}' with root key '{}'; \
                 expected one of [{}]",
                target.name,
                target.root_key(),
                arguments.join(", ")
            ),
            NAME,
            lexeme,
        );
    }
    Ok(result)
}
