//! `UsecaseParticipants`: every step's `source` and `target` names a
//! declared participant.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::{Definition, FIELD_NAME, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "UsecaseParticipants";

pub(super) const FIELD_PARTICIPANTS: &str = "participants";
pub(super) const FIELD_STEPS: &str = "steps";
pub(super) const FIELD_SOURCE: &str = "source";
pub(super) const FIELD_TARGET: &str = "target";

pub fn check(
    definition: &Definition,
    schema_definition: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::substructures(context, definition, schema_definition) {
        let participants = participant_names(node.structure);
        for step in steps(node.structure) {
            for role in [FIELD_SOURCE, FIELD_TARGET] {
                let Some(endpoint) = step.get(role).and_then(Value::as_str) else {
                    continue;
                };
                if participants.iter().any(|name| name == endpoint) {
                    continue;
                }
                result.add_finding(
                    definition,
                    FindingSeverity::Error,
                    format!(
                        "Step {role} '{endpoint}' is not a participant of usecase '{}'",
                        definition.name
                    ),
                    NAME,
                    definition.lexeme_with_value(endpoint),
                );
            }
        }
    }
    Ok(result)
}

pub(super) fn participant_names(body: &serde_yaml::Mapping) -> Vec<String> {
    body.get(FIELD_PARTICIPANTS)
        .and_then(Value::as_sequence)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_mapping)
                .filter_map(|entry| entry.get(FIELD_NAME).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn steps(body: &serde_yaml::Mapping) -> Vec<&serde_yaml::Mapping> {
    body.get(FIELD_STEPS)
        .and_then(Value::as_sequence)
        .map(|entries| entries.iter().filter_map(Value::as_mapping).collect())
        .unwrap_or_default()
}
