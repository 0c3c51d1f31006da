//! `UniqueName`: the (name, root key) pair is unique across the context.

use crate::execute::ConstraintError;
use crate::lang::{Definition, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;

pub const NAME: &str = "UniqueName";

/// Duplicates report at the newer definition's name lexeme; the earliest
/// occurrence stays clean.
pub fn check(
    definition: &Definition,
    _schema: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    let own_position = context
        .definitions()
        .iter()
        .position(|candidate| std::ptr::eq(candidate, definition));
    let has_earlier = context
        .definitions()
        .iter()
        .enumerate()
        .any(|(index, candidate)| {
            !std::ptr::eq(candidate, definition)
                && candidate.name == definition.name
                && candidate.root_key() == definition.root_key()
                && own_position.is_none_or(|own| index < own)
        });
    if has_earlier {
        result.add_finding(
            definition,
            FindingSeverity::Error,
            format!(
                "Multiple definitions named '{}' with root key '{}'",
                definition.name,
                definition.root_key()
            ),
            NAME,
            definition.name_lexeme(),
        );
    }
    Ok(result)
}
