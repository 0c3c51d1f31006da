//! Schema-guided traversal of raw definition structures.
//!
//! Constraints walk the structure rather than the typed instance so they
//! can report on definitions that failed (or were never offered for)
//! loading. The walk is driven by the governing schema: substructure nodes
//! are mappings whose field is typed with a defined schema.

use serde_yaml::{Mapping, Value};

use crate::base::Lexeme;
use crate::lang::schema::{self, ROOT_KEY_SCHEMA};
use crate::lang::{Definition, FIELD_NAME, FIELD_TYPE, LanguageContext};

/// One schema-governed mapping inside a definition's structure.
pub struct SchemaNode<'a> {
    pub schema: &'a Definition,
    pub structure: &'a Mapping,
    /// The lexeme nearest this node, for findings about missing content.
    pub anchor: Option<&'a Lexeme>,
}

/// One primitive-typed leaf value inside a definition's structure.
pub struct PrimitiveLeaf<'a> {
    pub field_name: &'a str,
    pub primitive: &'a str,
    pub value: &'a Value,
    pub lexeme: Option<&'a Lexeme>,
}

/// Every schema-governed node of `definition`, root first.
pub fn nodes<'a>(
    context: &'a LanguageContext,
    definition: &'a Definition,
) -> Vec<SchemaNode<'a>> {
    let mut collected = Vec::new();
    let Some(root_schema) = schema::definition_schema(context, definition) else {
        return collected;
    };
    let Some(body) = definition.top_level_fields() else {
        return collected;
    };
    walk(
        context,
        definition,
        root_schema,
        body,
        definition.name_lexeme(),
        &mut collected,
    );
    collected
}

/// The nodes of `definition` governed by `target_schema` specifically.
pub fn substructures<'a>(
    context: &'a LanguageContext,
    definition: &'a Definition,
    target_schema: &Definition,
) -> Vec<SchemaNode<'a>> {
    nodes(context, definition)
        .into_iter()
        .filter(|node| node.schema.name == target_schema.name)
        .collect()
}

/// Every primitive-typed leaf of `definition`, list elements included.
pub fn primitive_leaves<'a>(
    context: &'a LanguageContext,
    definition: &'a Definition,
) -> Vec<PrimitiveLeaf<'a>> {
    let mut leaves = Vec::new();
    for node in nodes(context, definition) {
        for entry in node.schema.field_entries() {
            let Some(field_name) = entry.get(FIELD_NAME).and_then(Value::as_str) else {
                continue;
            };
            let Some(declared) = entry.get(FIELD_TYPE).and_then(Value::as_str) else {
                continue;
            };
            let primitive = schema::base_type(declared);
            if !context.is_primitive_type(primitive) {
                continue;
            }
            let Some(value) = node.structure.get(field_name) else {
                continue;
            };
            let elements: Vec<&Value> = match value {
                Value::Sequence(items) => items.iter().collect(),
                other => vec![other],
            };
            for element in elements {
                leaves.push(PrimitiveLeaf {
                    field_name,
                    primitive,
                    value: element,
                    lexeme: scalar_lexeme(definition, field_name, element),
                });
            }
        }
    }
    leaves
}

fn walk<'a>(
    context: &'a LanguageContext,
    definition: &'a Definition,
    node_schema: &'a Definition,
    structure: &'a Mapping,
    anchor: Option<&'a Lexeme>,
    collected: &mut Vec<SchemaNode<'a>>,
) {
    collected.push(SchemaNode {
        schema: node_schema,
        structure,
        anchor,
    });
    for entry in node_schema.field_entries() {
        let Some(field_name) = entry.get(FIELD_NAME).and_then(Value::as_str) else {
            continue;
        };
        let Some(declared) = entry.get(FIELD_TYPE).and_then(Value::as_str) else {
            continue;
        };
        let declared = schema::base_type(declared);
        if context.is_primitive_type(declared) {
            continue;
        }
        let Some(sub_schema) = context.get_definition_by_name(declared) else {
            continue;
        };
        if sub_schema.root_key() != ROOT_KEY_SCHEMA {
            continue;
        }
        let Some(value) = structure.get(field_name) else {
            continue;
        };
        let field_anchor = definition.lexeme_with_value(field_name).or(anchor);
        match value {
            Value::Mapping(child) => {
                walk(context, definition, sub_schema, child, field_anchor, collected);
            }
            Value::Sequence(items) => {
                for item in items {
                    if let Value::Mapping(child) = item {
                        walk(context, definition, sub_schema, child, field_anchor, collected);
                    }
                }
            }
            _ => {}
        }
    }
}

/// The lexeme of a scalar value, biased toward tokens after the field key.
pub fn scalar_lexeme<'a>(
    definition: &'a Definition,
    field_name: &str,
    value: &Value,
) -> Option<&'a Lexeme> {
    let rendered = render_scalar(value)?;
    definition.lexeme_with_value_after(field_name, &rendered)
}

pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
