//! Typed instances produced by parsing a definition against its schema.
//!
//! Instances are a variant tree: primitives and enum values at the leaves,
//! records for schema-shaped substructures. Every populated field keeps the
//! lexeme nearest its source token so downstream tooling can point at exact
//! ranges without reparsing.

use indexmap::IndexMap;
use serde_yaml::Value;
use smol_str::SmolStr;

use crate::base::Lexeme;

/// A typed value held by an instance field.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceValue {
    String(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(String),
    File(String),
    Reference(String),
    Enum { enum_name: SmolStr, value: String },
    List(Vec<InstanceValue>),
    Record(Instance),
}

impl InstanceValue {
    /// Render this value back into a generic YAML value.
    pub fn to_yaml_value(&self) -> Value {
        match self {
            Self::String(s) | Self::Date(s) | Self::File(s) | Self::Reference(s) => {
                Value::from(s.clone())
            }
            Self::Integer(i) => Value::from(*i),
            Self::Number(n) => Value::from(*n),
            Self::Bool(b) => Value::from(*b),
            Self::Enum { value, .. } => Value::from(value.clone()),
            Self::List(items) => Value::Sequence(items.iter().map(Self::to_yaml_value).collect()),
            Self::Record(record) => record.to_yaml_value(),
        }
    }
}

/// One populated field of a record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceField {
    /// The declared type as written in the schema, list suffix included.
    pub declared_type: String,
    pub value: Option<InstanceValue>,
    pub lexeme: Option<Lexeme>,
}

/// A record instance: one schema-shaped node of the instance tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// The name of the schema this record was instantiated against.
    pub schema: SmolStr,
    pub fields: IndexMap<String, InstanceField>,
}

impl Instance {
    pub fn new(schema: impl Into<SmolStr>) -> Self {
        Self {
            schema: schema.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&InstanceField> {
        self.fields.get(name)
    }

    /// The value of a field, when populated.
    pub fn value(&self, name: &str) -> Option<&InstanceValue> {
        self.fields.get(name).and_then(|field| field.value.as_ref())
    }

    /// The elements of a list-valued field; empty when absent.
    pub fn list(&self, name: &str) -> &[InstanceValue] {
        match self.value(name) {
            Some(InstanceValue::List(items)) => items,
            _ => &[],
        }
    }

    fn to_yaml_value(&self) -> Value {
        let mut mapping = serde_yaml::Mapping::new();
        for (name, field) in &self.fields {
            if let Some(value) = &field.value {
                mapping.insert(Value::from(name.clone()), value.to_yaml_value());
            }
        }
        Value::Mapping(mapping)
    }
}
