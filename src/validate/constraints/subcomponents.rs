//! `SubcomponentsAreModels`: every `model.components` entry is typed with
//! a model definition.

use serde_yaml::Value;

use crate::execute::ConstraintError;
use crate::lang::schema;
use crate::lang::{Definition, FIELD_NAME, FIELD_TYPE, LanguageContext};
use crate::validate::finding::FindingSeverity;
use crate::validate::result::ValidatorResult;
use crate::validate::walker;

pub const NAME: &str = "SubcomponentsAreModels";

const FIELD_COMPONENTS: &str = "components";
const ROOT_KEY_MODEL: &str = "model";

pub fn check(
    definition: &Definition,
    schema_definition: &Definition,
    context: &LanguageContext,
    _arguments: &[String],
) -> Result<ValidatorResult, ConstraintError> {
    let mut result = ValidatorResult::new(definition.name.clone());
    for node in walker::substructures(context, definition, schema_definition) {
        let Some(Value::Sequence(components)) = node.structure.get(FIELD_COMPONENTS) else {
            continue;
        };
        for component in components.iter().filter_map(Value::as_mapping) {
            let component_name = component
                .get(FIELD_NAME)
                .and_then(Value::as_str)
                .unwrap_or_default();
            let Some(declared) = component.get(FIELD_TYPE).and_then(Value::as_str) else {
                continue;
            };
            let declared = schema::base_type(declared);
            let is_model = context
                .get_definition_by_name(declared)
                .is_some_and(|target| target.root_key() == ROOT_KEY_MODEL);
            if !is_model {
                result.add_finding(
                    definition,
                    FindingSeverity::Error,
                    format!(
                        "Component '{component_name}' references '{declared}', \
                         which is not a model"
                    ),
                    NAME,
                    definition.lexeme_with_value(declared),
                );
            }
        }
    }
    Ok(result)
}
