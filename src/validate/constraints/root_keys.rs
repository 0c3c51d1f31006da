//! `RootKeysAreDefined`: the definition's root key appears in the `Root`
//! schema.

use crate::execute::ConstraintError;
use crate::lang::schema;
use crate::lang::{Definition, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;

pub const NAME: &str = "RootKeysAreDefined";

pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    if schema::schema_for_root_key(context, definition.root_key()).is_none() {
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!(
                "Root key '{}' is not defined by the language context",
                definition.root_key()
            ),
            NAME,
            definition.lexemes.first(),
        );
    }
    Ok(result)
}
