//! Inheritance: concatenation of parent schema content into children.
//!
//! Applied while loading. Parent `fields` and `constraints` entries are
//! appended to the child's structure without deduplication; name clashes
//! surface later through constraint findings.

use serde_yaml::Value;

use super::context::LanguageContext;
use super::definition::{Definition, FIELD_CONSTRAINTS, FIELD_FIELDS};
use super::error::LanguageError;

/// Parent content collected for one child, ready to apply.
#[derive(Debug, Default)]
pub struct InheritedParts {
    fields: Vec<Value>,
    constraints: Vec<Value>,
}

impl InheritedParts {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.constraints.is_empty()
    }
}

/// Collect every inherited field and constraint for `definition`. Fails
/// when a named parent is not in the context.
pub fn collect(
    context: &LanguageContext,
    definition: &Definition,
) -> Result<InheritedParts, LanguageError> {
    let mut parts = InheritedParts::default();
    for parent_name in definition.inherits() {
        let parent = context.get_definition_by_name(parent_name).ok_or_else(|| {
            LanguageError::at_opt(
                format!(
                    "Definition '{}' inherits from '{parent_name}', which is not in the context",
                    definition.name
                ),
                definition.lexeme_with_value(parent_name),
            )
        })?;
        parts
            .fields
            .extend(sequence_entries(parent, FIELD_FIELDS));
        parts
            .constraints
            .extend(sequence_entries(parent, FIELD_CONSTRAINTS));
    }
    Ok(parts)
}

/// Append collected parent content to the child structure.
pub fn apply(definition: &mut Definition, parts: InheritedParts) {
    if parts.is_empty() {
        return;
    }
    append_entries(definition, FIELD_FIELDS, parts.fields);
    append_entries(definition, FIELD_CONSTRAINTS, parts.constraints);
}

fn sequence_entries(definition: &Definition, field: &str) -> Vec<Value> {
    definition
        .top_level_fields()
        .and_then(|body| body.get(field))
        .and_then(Value::as_sequence)
        .cloned()
        .unwrap_or_default()
}

fn append_entries(definition: &mut Definition, field: &str, entries: Vec<Value>) {
    if entries.is_empty() {
        return;
    }
    let Some(body) = definition.top_level_fields_mut() else {
        return;
    };
    let slot = body
        .entry(Value::from(field))
        .or_insert_with(|| Value::Sequence(Vec::new()));
    if let Value::Sequence(existing) = slot {
        existing.extend(entries);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::lang::LanguageContext;
    use crate::parser::{ParserCache, parse_str};

    #[test]
    fn child_gains_parent_fields_and_constraints() {
        let mut context = LanguageContext::new().unwrap();
        let mut cache = ParserCache::new();
        let definitions = parse_str(
            &mut cache,
            "<test>",
            concat!(
                "schema:\n",
                "  name: A\n",
                "  fields:\n",
                "    - name: a\n",
                "      type: string\n",
                "  constraints:\n",
                "    - name: RequiredFields\n",
                "---\n",
                "schema:\n",
                "  name: B\n",
                "  inherits:\n",
                "    - A\n",
                "  fields:\n",
                "    - name: b\n",
                "      type: integer\n",
            ),
        )
        .unwrap();
        context.add_definitions(definitions).unwrap();

        let child = context.get_definition_by_name("B").unwrap();
        let field_names: Vec<&str> = child
            .field_entries()
            .into_iter()
            .filter_map(|entry| entry.get("name").and_then(serde_yaml::Value::as_str))
            .collect();
        assert_eq!(field_names, vec!["b", "a"]);
        assert_eq!(child.constraint_refs().len(), 1);
    }

    #[test]
    fn unknown_parent_is_a_load_error() {
        let mut context = LanguageContext::new().unwrap();
        let mut cache = ParserCache::new();
        let definitions = parse_str(
            &mut cache,
            "<test>",
            "schema:\n  name: B\n  inherits:\n    - Missing\n",
        )
        .unwrap();
        let error = context.add_definitions(definitions).unwrap_err();
        assert!(error.to_string().contains("Missing"));
        // The failing definition is rejected, not left half-loaded.
        assert!(context.get_definition_by_name("B").is_none());
    }
}
