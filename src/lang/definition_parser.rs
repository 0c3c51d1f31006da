//! The instantiator: typed instances from raw structure, guided by schemas.
//!
//! Walks the governing schema's fields, coercing scalars by primitive type,
//! checking enum membership, and recursing into schema-typed substructures.
//! Every failure points at the lexeme nearest the offending input; missing
//! fields point at the enclosing mapping's first lexeme.

use serde_yaml::{Mapping, Value};

use crate::base::Lexeme;

use super::context::LanguageContext;
use super::definition::{Definition, FIELD_NAME, FIELD_TYPE};
use super::error::LanguageError;
use super::instance::{Instance, InstanceField, InstanceValue};
use super::schema::{self, ROOT_KEY_ENUM, ROOT_KEY_SCHEMA};

const FIELD_DEFAULT: &str = "default";

/// Produce the typed instance for an unloaded definition.
///
/// Inheritance must already be applied to the definition's structure;
/// enum membership is checked against current (extension-applied) values.
pub fn build_instance(
    context: &LanguageContext,
    definition: &Definition,
) -> Result<Instance, LanguageError> {
    let schema = schema::definition_schema(context, definition).ok_or_else(|| {
        LanguageError::at_opt(
            format!(
                "Root key '{}' is not defined by the language context",
                definition.root_key()
            ),
            definition.lexemes.first(),
        )
    })?;
    let body = definition.top_level_fields().cloned().unwrap_or_default();
    check_declared_keys(definition, schema, &body)?;
    build_record(context, definition, schema, &body, definition.name_lexeme())
}

/// Reject top-level keys the governing schema does not declare.
fn check_declared_keys(
    definition: &Definition,
    schema: &Definition,
    body: &Mapping,
) -> Result<(), LanguageError> {
    let declared: Vec<&str> = schema
        .field_entries()
        .into_iter()
        .filter_map(|entry| entry.get(FIELD_NAME).and_then(Value::as_str))
        .collect();
    for key in body.keys().filter_map(Value::as_str) {
        if !declared.contains(&key) {
            return Err(LanguageError::at_opt(
                format!(
                    "Field '{key}' is not defined by schema '{}'",
                    schema.name
                ),
                definition.lexeme_with_value(key),
            ));
        }
    }
    Ok(())
}

fn build_record(
    context: &LanguageContext,
    owner: &Definition,
    schema: &Definition,
    body: &Mapping,
    scope: Option<&Lexeme>,
) -> Result<Instance, LanguageError> {
    let required = schema.required();
    let mut instance = Instance::new(schema.name.clone());

    for entry in schema.field_entries() {
        let Some(field_name) = entry.get(FIELD_NAME).and_then(Value::as_str) else {
            continue;
        };
        let Some(declared_type) = entry.get(FIELD_TYPE).and_then(Value::as_str) else {
            continue;
        };
        let is_required = required.contains(&field_name);
        let field_lexeme = owner.lexeme_with_value(field_name).or(scope).cloned();

        let raw = match body.get(field_name) {
            Some(Value::Null) | None => entry.get(FIELD_DEFAULT).cloned(),
            Some(value) => Some(value.clone()),
        };
        let value = match raw {
            Some(raw) => Some(coerce(
                context, owner, field_name, declared_type, &raw, is_required,
            )?),
            None if is_required => {
                return Err(LanguageError::at_opt(
                    format!("Missing value for field: {field_name}"),
                    scope,
                ));
            }
            None => None,
        };
        instance.fields.insert(
            field_name.to_string(),
            InstanceField {
                declared_type: declared_type.to_string(),
                value,
                lexeme: field_lexeme,
            },
        );
    }
    Ok(instance)
}

fn coerce(
    context: &LanguageContext,
    owner: &Definition,
    field_name: &str,
    declared_type: &str,
    value: &Value,
    is_required: bool,
) -> Result<InstanceValue, LanguageError> {
    if schema::is_list_type(declared_type) {
        let element_type = schema::base_type(declared_type);
        let Some(elements) = value.as_sequence() else {
            return Err(LanguageError::at_opt(
                format!("Expected a list value for field '{field_name}'"),
                owner.lexeme_with_value(field_name),
            ));
        };
        if elements.is_empty() && is_required {
            return Err(LanguageError::at_opt(
                format!("Missing value for field: {field_name}"),
                owner.lexeme_with_value(field_name),
            ));
        }
        let coerced = elements
            .iter()
            .map(|element| coerce_scalar(context, owner, field_name, element_type, element))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(InstanceValue::List(coerced));
    }
    coerce_scalar(context, owner, field_name, declared_type, value)
}

fn coerce_scalar(
    context: &LanguageContext,
    owner: &Definition,
    field_name: &str,
    declared_type: &str,
    value: &Value,
) -> Result<InstanceValue, LanguageError> {
    if value.is_null() {
        return Err(LanguageError::at_opt(
            format!("Missing value for field: {field_name}"),
            owner.lexeme_with_value(field_name),
        ));
    }
    if context.is_primitive_type(declared_type) {
        return coerce_primitive(owner, field_name, declared_type, value);
    }

    let Some(target) = context.get_definition_by_name(declared_type) else {
        return Err(LanguageError::at_opt(
            format!("Undefined type '{declared_type}' for field '{field_name}'"),
            owner.lexeme_with_value(field_name),
        ));
    };
    match target.root_key() {
        ROOT_KEY_ENUM => coerce_enum(owner, field_name, target, value),
        ROOT_KEY_SCHEMA => {
            let Some(mapping) = value.as_mapping() else {
                return Err(LanguageError::at_opt(
                    format!(
                        "Expected a '{}' structure for field '{field_name}'",
                        target.name
                    ),
                    owner.lexeme_with_value(field_name),
                ));
            };
            let scope = owner.lexeme_with_value(field_name);
            let record = build_record(context, owner, target, mapping, scope)?;
            Ok(InstanceValue::Record(record))
        }
        other => Err(LanguageError::at_opt(
            format!(
                "Type '{declared_type}' of field '{field_name}' is a '{other}', \
                 not a schema or enum"
            ),
            owner.lexeme_with_value(field_name),
        )),
    }
}

fn coerce_primitive(
    owner: &Definition,
    field_name: &str,
    declared_type: &str,
    value: &Value,
) -> Result<InstanceValue, LanguageError> {
    let mismatch = |expected: &str| {
        LanguageError::at_opt(
            format!(
                "Expected {expected} value for field '{field_name}', found '{}'",
                render_scalar(value).unwrap_or_default()
            ),
            value_lexeme(owner, field_name, value),
        )
    };
    match declared_type {
        "string" => render_scalar(value)
            .map(InstanceValue::String)
            .ok_or_else(|| mismatch("a string")),
        "date" => render_scalar(value)
            .map(InstanceValue::Date)
            .ok_or_else(|| mismatch("a date")),
        "file" => render_scalar(value)
            .map(InstanceValue::File)
            .ok_or_else(|| mismatch("a file path")),
        "reference" => render_scalar(value)
            .map(InstanceValue::Reference)
            .ok_or_else(|| mismatch("a reference")),
        "integer" => value
            .as_i64()
            .map(InstanceValue::Integer)
            .ok_or_else(|| mismatch("an integer")),
        "number" => value
            .as_f64()
            .map(InstanceValue::Number)
            .ok_or_else(|| mismatch("a number")),
        "bool" => value
            .as_bool()
            .map(InstanceValue::Bool)
            .ok_or_else(|| mismatch("a bool")),
        other => Err(LanguageError::at_opt(
            format!("Undefined primitive type '{other}' for field '{field_name}'"),
            owner.lexeme_with_value(field_name),
        )),
    }
}

fn coerce_enum(
    owner: &Definition,
    field_name: &str,
    enum_definition: &Definition,
    value: &Value,
) -> Result<InstanceValue, LanguageError> {
    let rendered = render_scalar(value).unwrap_or_default();
    let allowed = enum_definition.values();
    if allowed.contains(&rendered.as_str()) {
        return Ok(InstanceValue::Enum {
            enum_name: enum_definition.name.clone(),
            value: rendered,
        });
    }
    Err(LanguageError::at_opt(
        format!(
            "Undefined value '{rendered}' for enum '{}'; expected one of [{}]",
            enum_definition.name,
            allowed.join(", ")
        ),
        value_lexeme(owner, field_name, value),
    ))
}

/// The lexeme of a scalar value, biased toward tokens after the field key.
fn value_lexeme<'a>(owner: &'a Definition, field_name: &str, value: &Value) -> Option<&'a Lexeme> {
    let rendered = render_scalar(value)?;
    owner.lexeme_with_value_after(field_name, &rendered)
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
