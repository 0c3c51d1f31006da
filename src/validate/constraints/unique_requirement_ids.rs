//! `UniqueRequirementIds`: requirement ids are unique across every `spec`
//! definition in the context, duplicates within one spec included.

use rustc_hash::FxHashSet;
use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::{Definition, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;

pub const NAME: &str = "UniqueRequirementIds";

const ROOT_KEY_SPEC: &str = "spec";
const FIELD_REQUIREMENTS: &str = "requirements";
const FIELD_SECTIONS: &str = "sections";
const FIELD_ID: &str = "id";

pub fn check(context: &LanguageContext) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new("");
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for definition in context.get_definitions_by_root_key(ROOT_KEY_SPEC) {
        for id in requirement_ids(definition) {
            if !seen.insert(id.clone()) {
                result.add_finding(
                    definition,
                    FindingSeverity::Error,
                    format!("Requirement id '{id}' is already defined"),
                    NAME,
                    definition.lexeme_with_value(&id),
                );
            }
        }
    }
    Ok(result)
}

/// Every requirement id of one spec, top-level and per-section, in
/// document order. Duplicates are preserved.
fn requirement_ids(definition: &Definition) -> Vec<String> {
    let Some(body) = definition.top_level_fields() else {
        return Vec::new();
    };
    let mut ids = ids_of(body.get(FIELD_REQUIREMENTS));
    if let Some(sections) = body.get(FIELD_SECTIONS).and_then(Value::as_sequence) {
        for section in sections.iter().filter_map(Value::as_mapping) {
            ids.extend(ids_of(section.get(FIELD_REQUIREMENTS)));
        }
    }
    ids
}

fn ids_of(requirements: Option<&Value>) -> Vec<String> {
    requirements
        .and_then(Value::as_sequence)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_mapping)
                .filter_map(|entry| entry.get(FIELD_ID).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
