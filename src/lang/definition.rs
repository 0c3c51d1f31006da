//! The fundamental unit of the language: one parsed YAML document.

use std::sync::Arc;

use serde_yaml::{Mapping, Value};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::base::{Lexeme, SourceFile};

pub const ROOT_KEY_IMPORT: &str = "import";
pub const ROOT_KEY_EXTENSION: &str = "extension";
pub const FIELD_NAME: &str = "name";
pub const FIELD_FIELDS: &str = "fields";
pub const FIELD_REQUIRED: &str = "required";
pub const FIELD_INHERITS: &str = "inherits";
pub const FIELD_CONSTRAINTS: &str = "constraints";
pub const FIELD_VALUES: &str = "values";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_SCHEMA_EXT: &str = "schemaExt";
pub const FIELD_ENUM_EXT: &str = "enumExt";

/// An Architecture-as-Code definition.
///
/// Carries the original text, the generic structure, and the lexeme stream
/// of one YAML document, plus the typed [`Instance`](crate::lang::Instance)
/// once the definition has been loaded into a context.
#[derive(Debug, Clone)]
pub struct Definition {
    uid: Uuid,
    pub name: SmolStr,
    pub content: String,
    pub source: Arc<SourceFile>,
    pub lexemes: Vec<Lexeme>,
    pub structure: Value,
    pub instance: Option<crate::lang::Instance>,
}

impl Definition {
    pub fn new(
        name: impl Into<SmolStr>,
        content: impl Into<String>,
        source: Arc<SourceFile>,
        lexemes: Vec<Lexeme>,
        structure: Value,
    ) -> Self {
        let name = name.into();
        // Stable identifier: the name hashed into the OID namespace.
        let uid = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
        Self {
            uid,
            name,
            content: content.into(),
            source,
            lexemes,
            structure,
            instance: None,
        }
    }

    pub fn uid(&self) -> Uuid {
        self.uid
    }

    /// The single top-level key of the structural document.
    pub fn root_key(&self) -> &str {
        self.structure
            .as_mapping()
            .and_then(|mapping| mapping.iter().next())
            .and_then(|(key, _)| key.as_str())
            .unwrap_or_default()
    }

    /// The body mapping under the root key.
    pub fn top_level_fields(&self) -> Option<&Mapping> {
        self.structure
            .as_mapping()
            .and_then(|mapping| mapping.iter().next())
            .and_then(|(_, body)| body.as_mapping())
    }

    pub(crate) fn top_level_fields_mut(&mut self) -> Option<&mut Mapping> {
        self.structure
            .as_mapping_mut()
            .and_then(|mapping| mapping.iter_mut().next())
            .and_then(|(_, body)| body.as_mapping_mut())
    }

    /// Names listed in the body's `required` field.
    pub fn required(&self) -> Vec<&str> {
        self.string_list(FIELD_REQUIRED)
    }

    /// Names listed in the body's `inherits` field.
    pub fn inherits(&self) -> Vec<&str> {
        self.string_list(FIELD_INHERITS)
    }

    /// Enum values listed in the body's `values` field.
    pub fn values(&self) -> Vec<&str> {
        self.string_list(FIELD_VALUES)
    }

    /// Declared constraint references (`constraints:` entries) of the body.
    pub fn constraint_refs(&self) -> Vec<&Mapping> {
        self.top_level_fields()
            .and_then(|body| body.get(FIELD_CONSTRAINTS))
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().filter_map(Value::as_mapping).collect())
            .unwrap_or_default()
    }

    /// Declared field entries (`fields:` list) of the body.
    pub fn field_entries(&self) -> Vec<&Mapping> {
        self.top_level_fields()
            .and_then(|body| body.get(FIELD_FIELDS))
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().filter_map(Value::as_mapping).collect())
            .unwrap_or_default()
    }

    pub fn is_import(&self) -> bool {
        self.root_key() == ROOT_KEY_IMPORT
    }

    pub fn is_extension(&self) -> bool {
        self.root_key() == ROOT_KEY_EXTENSION
    }

    pub fn is_schema_extension(&self) -> bool {
        self.is_extension()
            && self
                .top_level_fields()
                .is_some_and(|body| body.get(FIELD_SCHEMA_EXT).is_some_and(Value::is_mapping))
    }

    pub fn is_enum_extension(&self) -> bool {
        self.is_extension()
            && self
                .top_level_fields()
                .is_some_and(|body| body.get(FIELD_ENUM_EXT).is_some_and(Value::is_mapping))
    }

    /// The target definition name of an extension (`type:` field).
    pub fn extension_target(&self) -> Option<&str> {
        if !self.is_extension() {
            return None;
        }
        self.top_level_fields()
            .and_then(|body| body.get(FIELD_TYPE))
            .and_then(Value::as_str)
    }

    /// The first lexeme carrying exactly `value`.
    pub fn lexeme_with_value(&self, value: &str) -> Option<&Lexeme> {
        self.lexemes.iter().find(|lexeme| lexeme.value == value)
    }

    /// The lexeme for this definition's name. Falls back to the first
    /// lexeme of the document when the name never appears as a token.
    pub fn name_lexeme(&self) -> Option<&Lexeme> {
        self.lexeme_with_value(self.name.as_str())
            .or_else(|| self.lexemes.first())
    }

    /// The first lexeme with `value` at or after the first occurrence of
    /// `after`. Used to bias lookups toward the field being reported on.
    pub fn lexeme_with_value_after(&self, after: &str, value: &str) -> Option<&Lexeme> {
        let start = self
            .lexemes
            .iter()
            .position(|lexeme| lexeme.value == after)
            .unwrap_or(0);
        self.lexemes[start..]
            .iter()
            .find(|lexeme| lexeme.value == value)
            .or_else(|| self.lexeme_with_value(value))
    }

    /// Emit the current structure, including any applied extensions, as
    /// canonical YAML. Re-parsing the output yields an identical structure.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.structure)
    }

    fn string_list(&self, field: &str) -> Vec<&str> {
        self.top_level_fields()
            .and_then(|body| body.get(field))
            .and_then(Value::as_sequence)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid && self.structure == other.structure
    }
}
