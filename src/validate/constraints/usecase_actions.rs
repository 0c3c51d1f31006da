//! `UsecaseActions`: every step's `action` is a behavior of the source
//! participant's model.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::schema;
use crate::lang::{Definition, FIELD_NAME, FIELD_TYPE, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

use super::usecase_participants::{FIELD_PARTICIPANTS, FIELD_SOURCE, steps};

pub const NAME: &str = "UsecaseActions";

const FIELD_ACTION: &str = "action";
const FIELD_BEHAVIOR: &str = "behavior";
const ROOT_KEY_MODEL: &str = "model";

pub fn check(
    definition: &Definition,
    schema_definition: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::substructures(context, definition, schema_definition) {
        for step in steps(node.structure) {
            let Some(action) = step.get(FIELD_ACTION).and_then(Value::as_str) else {
                continue;
            };
            let Some(source) = step.get(FIELD_SOURCE).and_then(Value::as_str) else {
                continue;
            };
            // An unknown participant or model is the participants
            // constraint's finding, not this one's.
            let Some(model) = participant_model(context, node.structure, source) else {
                continue;
            };
            if behavior_names(model).iter().any(|name| name == action) {
                continue;
            }
            result.add_finding(
                definition,
                FindingSeverity::Error,
                format!(
                    "Action '{action}' is not a behavior of model '{}'",
                    model.name
                ),
                NAME,
                definition.lexeme_with_value(action),
            );
        }
    }
    Ok(result)
}

fn participant_model<'a>(
    context: &'a LanguageContext,
    body: &serde_yaml::Mapping,
    participant: &str,
) -> Option<&'a Definition> {
    let declared = body
        .get(FIELD_PARTICIPANTS)
        .and_then(Value::as_sequence)?
        .iter()
        .filter_map(Value::as_mapping)
        .find(|entry| entry.get(FIELD_NAME).and_then(Value::as_str) == Some(participant))?
        .get(FIELD_TYPE)
        .and_then(Value::as_str)?;
    let model = context.get_definition_by_name(schema::base_type(declared))?;
    (model.root_key() == ROOT_KEY_MODEL).then_some(model)
}

fn behavior_names(model: &Definition) -> Vec<String> {
    model
        .top_level_fields()
        .and_then(|body| body.get(FIELD_BEHAVIOR))
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
