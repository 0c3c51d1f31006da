//! Generic YAML document parsing.
//!
//! Splits a `---`-separated stream into one mapping per document, rejecting
//! anything that cannot be an AaC definition before the definition builder
//! ever sees it.

use serde::Deserialize;
use serde_yaml::Value;

use crate::base::SourceLocation;

use super::error::ParserError;

pub const ROOT_KEY_IMPORT: &str = "import";
pub const FIELD_NAME: &str = "name";

/// Parse every non-empty document in `text` into a generic YAML mapping.
///
/// Rules, in order:
/// - invalid YAML is an error carrying the scanner's location;
/// - an empty document is skipped;
/// - a document whose body is not a single-keyed mapping is rejected;
/// - a non-`import` document must carry a non-empty `name` in its body.
pub fn parse_documents(source_uri: &str, text: &str) -> Result<Vec<Value>, ParserError> {
    let mut documents = Vec::new();
    for deserializer in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(deserializer).map_err(|error| {
            let location = error.location().map(|loc| {
                SourceLocation::new(loc.line().saturating_sub(1), loc.column().saturating_sub(1), loc.index(), 0)
            });
            ParserError::InvalidYaml {
                source_uri: source_uri.to_string(),
                message: error.to_string(),
                location,
            }
        })?;
        if value.is_null() {
            continue;
        }
        check_document(source_uri, &value)?;
        documents.push(value);
    }
    Ok(documents)
}

fn check_document(source_uri: &str, document: &Value) -> Result<(), ParserError> {
    let Some(mapping) = document.as_mapping() else {
        return Err(ParserError::MalformedDocument {
            source_uri: source_uri.to_string(),
            message: "provided content was not a YAML mapping".to_string(),
        });
    };
    if mapping.len() != 1 {
        return Err(ParserError::MalformedDocument {
            source_uri: source_uri.to_string(),
            message: format!(
                "definition must have exactly one root key, found {}",
                mapping.len()
            ),
        });
    }
    let (root_key, body) = mapping
        .iter()
        .next()
        .map(|(k, v)| (k.as_str().unwrap_or_default(), v))
        .unwrap_or(("", &Value::Null));
    if root_key == ROOT_KEY_IMPORT {
        return Ok(());
    }
    let name = body
        .as_mapping()
        .and_then(|body| body.get(Value::from(FIELD_NAME)))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ParserError::MissingName {
            source_uri: source_uri.to_string(),
        });
    }
    Ok(())
}

/// The single root key of a parsed document body.
pub fn root_key(document: &Value) -> &str {
    document
        .as_mapping()
        .and_then(|mapping| mapping.iter().next())
        .and_then(|(key, _)| key.as_str())
        .unwrap_or_default()
}

/// The `name` value inside the document body, if present.
pub fn document_name(document: &Value) -> Option<&str> {
    document
        .as_mapping()
        .and_then(|mapping| mapping.iter().next())
        .and_then(|(_, body)| body.as_mapping())
        .and_then(|body| body.get(Value::from(FIELD_NAME)))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn multi_document_streams_split_on_separators() {
        let text = "schema:\n  name: A\n---\nenum:\n  name: B\n  values: [x]\n";
        let documents = parse_documents("<test>", text).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(root_key(&documents[0]), "schema");
        assert_eq!(document_name(&documents[1]), Some("B"));
    }

    #[test]
    fn empty_documents_are_skipped() {
        let text = "---\n---\nschema:\n  name: A\n";
        let documents = parse_documents("<test>", text).unwrap();
        assert_eq!(documents.len(), 1);
    }

    #[test]
    fn non_mapping_documents_are_rejected() {
        let error = parse_documents("<test>", "- a\n- b\n").unwrap_err();
        assert!(matches!(error, ParserError::MalformedDocument { .. }));
    }

    #[test]
    fn definitions_without_a_name_are_rejected() {
        let error = parse_documents("<test>", "schema:\n  fields: []\n").unwrap_err();
        assert!(matches!(error, ParserError::MissingName { .. }));
    }

    #[test]
    fn import_documents_do_not_need_a_name() {
        let documents = parse_documents("<test>", "import:\n  - ./other.yaml\n").unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(root_key(&documents[0]), ROOT_KEY_IMPORT);
    }

    #[test]
    fn invalid_yaml_reports_a_location() {
        let error = parse_documents("<test>", "schema:\n  name: [unclosed\n").unwrap_err();
        let ParserError::InvalidYaml { source_uri, .. } = error else {
            panic!("expected InvalidYaml, got {error:?}");
        };
        assert_eq!(source_uri, "<test>");
    }
}
