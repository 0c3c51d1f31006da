//! Extension application and reversal.
//!
//! A `schemaExt` appends fields and required entries to a target schema; an
//! `enumExt` appends values to a target enum. Removal takes out exactly the
//! entries the extension added, restoring the pre-extension structure.

use serde_yaml::Value;

use super::definition::{
    Definition, FIELD_ENUM_EXT, FIELD_FIELDS, FIELD_REQUIRED, FIELD_SCHEMA_EXT, FIELD_VALUES,
};
use super::error::LanguageError;

const EXT_FIELD_ADD: &str = "add";

/// Apply `extension` to `target` in place.
pub fn apply(target: &mut Definition, extension: &Definition) -> Result<(), LanguageError> {
    if extension.is_schema_extension() {
        append(target, FIELD_FIELDS, added_fields(extension));
        append(target, FIELD_REQUIRED, added_required(extension));
        Ok(())
    } else if extension.is_enum_extension() {
        append(target, FIELD_VALUES, added_values(extension));
        Ok(())
    } else {
        Err(LanguageError::at_opt(
            format!(
                "Extension '{}' declares neither schemaExt nor enumExt",
                extension.name
            ),
            extension.name_lexeme(),
        ))
    }
}

/// Reverse a previously applied `extension` on `target`, removing exactly
/// the entries it added.
pub fn remove(target: &mut Definition, extension: &Definition) {
    if extension.is_schema_extension() {
        retract(target, FIELD_FIELDS, &added_fields(extension));
        retract(target, FIELD_REQUIRED, &added_required(extension));
    } else if extension.is_enum_extension() {
        retract(target, FIELD_VALUES, &added_values(extension));
    }
}

/// The field names a schema extension adds to its target.
pub fn added_field_names(extension: &Definition) -> Vec<String> {
    added_fields(extension)
        .iter()
        .filter_map(|entry| {
            entry
                .as_mapping()
                .and_then(|mapping| mapping.get("name"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .collect()
}

/// The values an enum extension adds to its target.
pub fn added_value_names(extension: &Definition) -> Vec<String> {
    added_values(extension)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn added_fields(extension: &Definition) -> Vec<Value> {
    ext_sequence(extension, FIELD_SCHEMA_EXT, EXT_FIELD_ADD)
}

fn added_required(extension: &Definition) -> Vec<Value> {
    ext_sequence(extension, FIELD_SCHEMA_EXT, FIELD_REQUIRED)
}

fn added_values(extension: &Definition) -> Vec<Value> {
    ext_sequence(extension, FIELD_ENUM_EXT, EXT_FIELD_ADD)
}

fn ext_sequence(extension: &Definition, block: &str, field: &str) -> Vec<Value> {
    extension
        .top_level_fields()
        .and_then(|body| body.get(block))
        .and_then(Value::as_mapping)
        .and_then(|ext| ext.get(field))
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default()
}

fn append(target: &mut Definition, field: &str, entries: Vec<Value>) {
    if entries.is_empty() {
        return;
    }
    let Some(body) = target.top_level_fields_mut() else {
        return;
    };
    let slot = body
        .entry(Value::from(field))
        .or_insert_with(|| Value::Sequence(Vec::new()));
    if let Value::Sequence(existing) = slot {
        existing.extend(entries);
    }
}

/// Remove one occurrence per added entry, last occurrence first so the
/// entries appended by [`apply`] are the ones taken out.
fn retract(target: &mut Definition, field: &str, entries: &[Value]) {
    if entries.is_empty() {
        return;
    }
    let Some(body) = target.top_level_fields_mut() else {
        return;
    };
    let Some(Value::Sequence(existing)) = body.get_mut(field) else {
        return;
    };
    for entry in entries {
        if let Some(index) = existing.iter().rposition(|candidate| candidate == entry) {
            existing.remove(index);
        }
    }
    if existing.is_empty() {
        body.remove(field);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::parser::{ParserCache, parse_str};

    use super::*;

    fn parse_one(text: &str) -> Definition {
        let mut cache = ParserCache::new();
        parse_str(&mut cache, "<test>", text).unwrap().remove(0)
    }

    #[test]
    fn schema_extension_round_trips_byte_for_byte() {
        let mut target = parse_one(
            "schema:\n  name: Data\n  fields:\n    - name: x\n      type: string\n",
        );
        let extension = parse_one(concat!(
            "extension:\n",
            "  name: Ext\n",
            "  type: Data\n",
            "  schemaExt:\n",
            "    add:\n",
            "      - name: y\n",
            "        type: integer\n",
            "    required:\n",
            "      - y\n",
        ));
        let before = target.to_yaml().unwrap();

        apply(&mut target, &extension).unwrap();
        assert_eq!(target.field_entries().len(), 2);
        assert_eq!(target.required(), vec!["y"]);

        remove(&mut target, &extension);
        assert_eq!(target.to_yaml().unwrap(), before);
    }

    #[test]
    fn enum_extension_appends_and_retracts_values() {
        let mut target = parse_one("enum:\n  name: Color\n  values:\n    - red\n");
        let extension = parse_one(concat!(
            "extension:\n",
            "  name: MoreColors\n",
            "  type: Color\n",
            "  enumExt:\n",
            "    add:\n",
            "      - blue\n",
        ));

        apply(&mut target, &extension).unwrap();
        assert_eq!(target.values(), vec!["red", "blue"]);

        remove(&mut target, &extension);
        assert_eq!(target.values(), vec!["red"]);
    }

    #[test]
    fn extension_without_a_block_is_rejected() {
        let mut target = parse_one("schema:\n  name: Data\n");
        let extension = parse_one("extension:\n  name: Ext\n  type: Data\n");
        assert!(apply(&mut target, &extension).is_err());
    }
}
