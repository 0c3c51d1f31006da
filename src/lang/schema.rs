//! Schema resolution: from definitions and field paths to their governing
//! schemas.
//!
//! Root keys map to defining schemas through the core `Root` schema, whose
//! fields name every root key and type it with the schema that governs that
//! document shape.

use serde_yaml::Value;

use super::context::LanguageContext;
use super::definition::{Definition, FIELD_NAME, FIELD_TYPE};

pub const ROOT_SCHEMA_NAME: &str = "Root";
pub const PRIMITIVES_ENUM_NAME: &str = "Primitives";
pub const ROOT_KEY_SCHEMA: &str = "schema";
pub const ROOT_KEY_ENUM: &str = "enum";

/// Strip a trailing `[]` list indicator from a type name.
pub fn base_type(type_name: &str) -> &str {
    type_name.strip_suffix("[]").unwrap_or(type_name)
}

pub fn is_list_type(type_name: &str) -> bool {
    type_name.ends_with("[]")
}

/// The schema governing `definition`, resolved through the `Root` schema
/// by root key. `None` when the root key is not a defined root.
pub fn definition_schema<'a>(
    context: &'a LanguageContext,
    definition: &Definition,
) -> Option<&'a Definition> {
    schema_for_root_key(context, definition.root_key())
}

/// The schema governing documents with the given root key.
pub fn schema_for_root_key<'a>(
    context: &'a LanguageContext,
    root_key: &str,
) -> Option<&'a Definition> {
    let root = context.get_definition_by_name(ROOT_SCHEMA_NAME)?;
    let schema_name = root.field_entries().into_iter().find_map(|entry| {
        let name = entry.get(FIELD_NAME).and_then(Value::as_str)?;
        if name != root_key {
            return None;
        }
        entry.get(FIELD_TYPE).and_then(Value::as_str)
    })?;
    context.get_definition_by_name(base_type(schema_name))
}

/// Every root key declared by the `Root` schema.
pub fn root_keys(context: &LanguageContext) -> Vec<String> {
    context
        .get_definition_by_name(ROOT_SCHEMA_NAME)
        .map(|root| {
            root.field_entries()
                .into_iter()
                .filter_map(|entry| entry.get(FIELD_NAME).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Walk a dotted field path from `definition`'s governing schema and
/// return the definition describing the terminal field's type: a schema
/// for record fields, an enum for enum fields, or the `Primitives` enum
/// for primitive fields.
pub fn schema_for_field<'a>(
    context: &'a LanguageContext,
    definition: &Definition,
    path: &[&str],
) -> Option<&'a Definition> {
    let mut current = definition_schema(context, definition)?;
    for key in path {
        let declared = declared_field_type(current, key)?;
        let declared = base_type(declared);
        if context.is_primitive_type(declared) {
            return context.get_definition_by_name(PRIMITIVES_ENUM_NAME);
        }
        let target = context.get_definition_by_name(declared)?;
        match target.root_key() {
            ROOT_KEY_ENUM => return Some(target),
            ROOT_KEY_SCHEMA => current = target,
            _ => return None,
        }
    }
    Some(current)
}

/// The transitive closure of schemas reachable from `definition`'s
/// governing schema through its fields.
pub fn schema_components<'a>(
    context: &'a LanguageContext,
    definition: &Definition,
) -> Vec<&'a Definition> {
    let Some(root) = definition_schema(context, definition) else {
        return Vec::new();
    };
    let mut visited: Vec<&Definition> = Vec::new();
    let mut pending = vec![root];
    while let Some(schema) = pending.pop() {
        for entry in schema.field_entries() {
            let Some(declared) = entry.get(FIELD_TYPE).and_then(Value::as_str) else {
                continue;
            };
            let declared = base_type(declared);
            if context.is_primitive_type(declared) {
                continue;
            }
            let Some(target) = context.get_definition_by_name(declared) else {
                continue;
            };
            if target.root_key() != ROOT_KEY_SCHEMA {
                continue;
            }
            if target.name == schema.name || visited.iter().any(|seen| seen.name == target.name) {
                continue;
            }
            visited.push(target);
            pending.push(target);
        }
    }
    visited
}

/// The ancestor chain of a schema through `inherits`, nearest first.
pub fn schema_ancestors<'a>(
    context: &'a LanguageContext,
    schema: &'a Definition,
) -> Vec<&'a Definition> {
    let mut ancestors: Vec<&Definition> = Vec::new();
    let mut pending: Vec<&Definition> = vec![schema];
    while let Some(current) = pending.pop() {
        for parent_name in current.inherits() {
            let Some(parent) = context.get_definition_by_name(parent_name) else {
                continue;
            };
            if ancestors.iter().any(|seen| seen.name == parent.name) {
                continue;
            }
            ancestors.push(parent);
            pending.push(parent);
        }
    }
    ancestors
}

/// The declared type of one field of a schema.
pub fn declared_field_type<'a>(schema: &'a Definition, field_name: &str) -> Option<&'a str> {
    schema.field_entries().into_iter().find_map(|entry| {
        let name = entry.get(FIELD_NAME).and_then(Value::as_str)?;
        if name != field_name {
            return None;
        }
        entry.get(FIELD_TYPE).and_then(Value::as_str)
    })
}
