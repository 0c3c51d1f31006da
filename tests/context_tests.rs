//! Tests for context bootstrap, queries, imports, and constraint dispatch.

#![allow(clippy::unwrap_used)]

use std::fs;

use aac::lang::LanguageContext;
use aac::validate::{validate_context, validate_definition};
use tempfile::TempDir;

#[test]
fn test_bootstrap_loads_the_core_spec() {
    let context = LanguageContext::new().unwrap();

    let root = context.get_definition_by_name("Root").unwrap();
    assert!(!root.source.is_user_editable(), "core spec is read-only");
    assert!(root.instance.is_some(), "core definitions are loaded");

    let primitives = context.get_primitive_types();
    assert_eq!(
        primitives,
        vec!["string", "integer", "number", "bool", "date", "file", "reference"]
    );
    for root_key in ["schema", "enum", "model", "usecase", "spec", "plugin", "import", "extension"]
    {
        assert!(context.get_root_keys().contains(&root_key.to_string()), "{root_key}");
    }
}

#[test]
fn test_lookup_and_type_queries_agree() {
    let context = LanguageContext::new().unwrap();
    for definition in context.get_definitions_by_root_key("schema") {
        assert!(context.is_definition_type(&definition.name));
        let found = context.get_definition_by_name(&definition.name).unwrap();
        assert_eq!(found, definition);
    }
    assert!(context.is_primitive_type("string[]"), "list indicator is stripped");
    assert!(!context.is_primitive_type("Schema"));
}

#[test]
fn test_validating_an_unmodified_context_is_stable_and_clean() {
    let context = LanguageContext::new().unwrap();
    let first = validate_context(&context);
    let second = validate_context(&context);
    assert!(first.findings.is_empty(), "{:?}", first.findings.all());
    assert_eq!(first.findings.len(), second.findings.len());
}

#[test]
fn test_duplicate_requirement_ids_across_specs() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "spec:\n",
            "  name: First\n",
            "  requirements:\n",
            "    - id: R1\n",
            "      shall: respond\n",
            "---\n",
            "spec:\n",
            "  name: Second\n",
            "  sections:\n",
            "    - name: Body\n",
            "      requirements:\n",
            "        - id: R1\n",
            "          shall: log\n",
        ))
        .unwrap();

    let result = validate_context(&context);
    let errors = result.findings.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("R1"));
    assert_eq!(errors[0].definition_name, "Second");
}

#[test]
fn test_usecase_participant_and_action_constraints() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "model:\n",
            "  name: Service\n",
            "  behavior:\n",
            "    - name: respond\n",
            "      type: request-response\n",
            "---\n",
            "usecase:\n",
            "  name: Flow\n",
            "  participants:\n",
            "    - name: svc\n",
            "      type: Service\n",
            "  steps:\n",
            "    - source: svc\n",
            "      target: ghost\n",
            "      action: missing\n",
        ))
        .unwrap();

    let flow = context.get_definition_by_name("Flow").unwrap();
    let result = validate_definition(&context, flow);
    let messages: Vec<&str> = result
        .findings
        .errors()
        .iter()
        .map(|finding| finding.message.as_str())
        .collect();
    assert_eq!(messages.len(), 2, "{messages:?}");
    assert!(messages.iter().any(|m| m.contains("ghost")));
    assert!(messages.iter().any(|m| m.contains("missing")));
}

#[test]
fn test_model_components_must_reference_models() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "model:\n",
            "  name: Sys\n",
            "  components:\n",
            "    - name: part\n",
            "      type: Schema\n",
        ))
        .unwrap();

    let sys = context.get_definition_by_name("Sys").unwrap();
    let result = validate_definition(&context, sys);
    let errors = result.findings.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("not a model"));
}

#[test]
fn test_declared_but_unimplemented_constraints_are_flagged() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Checked\n",
            "  fields:\n",
            "    - name: x\n",
            "      type: string\n",
            "  constraints:\n",
            "    - name: NoSuchCheck\n",
        ))
        .unwrap();

    let checked = context.get_definition_by_name("Checked").unwrap();
    let result = validate_definition(&context, checked);
    assert!(
        result
            .findings
            .errors()
            .iter()
            .any(|finding| finding.message.contains("NoSuchCheck")),
        "{:?}",
        result.findings.all()
    );
}

#[test]
fn test_reference_fields_are_checked_by_primitive_constraints() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Link\n",
            "  fields:\n",
            "    - name: name\n",
            "      type: string\n",
            "    - name: to\n",
            "      type: reference\n",
            "---\n",
            "extension:\n",
            "  name: LinkRoot\n",
            "  type: Root\n",
            "  schemaExt:\n",
            "    add:\n",
            "      - name: link\n",
            "        type: Link\n",
            "---\n",
            "link:\n",
            "  name: broken\n",
            "  to: nowhere.at.all\n",
        ))
        .unwrap();

    let broken = context.get_definition_by_name("broken").unwrap();
    let result = validate_definition(&context, broken);
    assert!(
        result
            .findings
            .errors()
            .iter()
            .any(|finding| finding.message.contains("nowhere.at.all")),
        "{:?}",
        result.findings.all()
    );
}

#[test]
fn test_parse_and_load_follows_imports() {
    let dir = TempDir::new().unwrap();
    let shared = dir.path().join("shared.yaml");
    fs::write(&shared, "schema:\n  name: Shared\n").unwrap();
    let entry = dir.path().join("entry.yaml");
    fs::write(
        &entry,
        "import:\n  - ./shared.yaml\n---\nschema:\n  name: Entry\n",
    )
    .unwrap();

    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(entry.to_string_lossy().as_ref())
        .unwrap();
    assert!(context.get_definition_by_name("Shared").is_some());
    assert!(context.get_definition_by_name("Entry").is_some());
}

#[test]
fn test_extension_reapplies_when_its_target_returns() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Data\n",
            "  fields:\n",
            "    - name: x\n",
            "      type: string\n",
            "---\n",
            "extension:\n",
            "  name: Ext\n",
            "  type: Data\n",
            "  schemaExt:\n",
            "    add:\n",
            "      - name: y\n",
            "        type: integer\n",
        ))
        .unwrap();

    let data = context.get_definition_by_name("Data").unwrap().clone();
    context.remove_definition(&data).unwrap();
    assert!(context.get_definition_by_name("Data").is_none());

    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Data\n",
            "  fields:\n",
            "    - name: x\n",
            "      type: string\n",
        ))
        .unwrap();

    // The still-loaded extension applies to the re-added target.
    let data = context.get_definition_by_name("Data").unwrap();
    assert_eq!(data.field_entries().len(), 2);
}

#[test]
fn test_remove_definition_matches_on_root_key() {
    let mut context = LanguageContext::new().unwrap();
    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Thing\n",
            "---\n",
            "model:\n",
            "  name: Thing\n",
        ))
        .unwrap();

    let model = context
        .get_definitions_by_root_key("model")
        .into_iter()
        .find(|definition| definition.name == "Thing")
        .unwrap()
        .clone();
    context.remove_definition(&model).unwrap();

    assert!(
        context
            .get_definitions_by_root_key("model")
            .iter()
            .all(|definition| definition.name != "Thing"),
        "the model should be gone"
    );
    let survivor = context.get_definition_by_name("Thing").unwrap();
    assert_eq!(survivor.root_key(), "schema");
}

#[test]
fn test_strict_extension_removal_blocks_referenced_content() {
    let mut context = LanguageContext::new().unwrap();
    context.strict_extension_removal = true;
    context
        .parse_and_load(concat!(
            "schema:\n",
            "  name: Data\n",
            "  fields:\n",
            "    - name: x\n",
            "      type: string\n",
            "---\n",
            "extension:\n",
            "  name: Ext\n",
            "  type: Data\n",
            "  schemaExt:\n",
            "    add:\n",
            "      - name: payload\n",
            "        type: string\n",
            "---\n",
            "schema:\n",
            "  name: Consumer\n",
            "  fields:\n",
            "    - name: payload\n",
            "      type: string\n",
        ))
        .unwrap();

    let extension = context.get_definition_by_name("Ext").unwrap().clone();
    let error = context.remove_definition(&extension).unwrap_err();
    assert!(error.to_string().contains("Consumer"));
    // The extension stays applied after the refused removal.
    let data = context.get_definition_by_name("Data").unwrap();
    assert_eq!(data.field_entries().len(), 2);
}
