//! End-to-end tests for parsing, loading, validating, and resolving
//! definitions through a language context.

#![allow(clippy::unwrap_used)]

use aac::lang::LanguageContext;
use aac::parser::{ParserCache, parse_str};
use aac::validate::validate_definition;
use aac::{is_reference_format_valid, resolve_references};
use once_cell::sync::Lazy;

/// A pristine context for read-only tests; mutating tests build their own.
static CORE: Lazy<LanguageContext> =
    Lazy::new(|| LanguageContext::new().expect("core spec bootstrap"));

fn context_with(text: &str) -> LanguageContext {
    let mut context = LanguageContext::new().unwrap();
    context.parse_and_load(text).unwrap();
    context
}

#[test]
fn test_happy_path_schema_loads_and_validates_clean() {
    let context = context_with(concat!(
        "schema:\n",
        "  name: Point\n",
        "  fields:\n",
        "    - name: x\n",
        "      type: integer\n",
        "    - name: y\n",
        "      type: integer\n",
    ));
    let point = context.get_definition_by_name("Point").unwrap();
    assert_eq!(point.root_key(), "schema");

    let instance = point.instance.as_ref().expect("Point should be loaded");
    assert_eq!(instance.list("fields").len(), 2, "two declared fields");

    let result = validate_definition(&context, point);
    assert!(
        result.findings.is_empty(),
        "expected no findings, got: {:?}",
        result.findings.all()
    );
}

#[test]
fn test_enum_rejection_is_one_error_at_the_value_line() {
    let context = &*CORE;
    let mut cache = ParserCache::new();
    let definitions = parse_str(
        &mut cache,
        "<test>",
        concat!(
            "model:\n",
            "  name: Svc\n",
            "  behavior:\n",
            "    - name: go\n",
            "      type: not-a-behavior\n",
        ),
    )
    .unwrap();

    let result = validate_definition(context, &definitions[0]);
    assert_eq!(result.findings.len(), 1, "{:?}", result.findings.all());
    let finding = &result.findings.errors()[0];
    assert!(finding.message.contains("not-a-behavior"));
    assert!(finding.message.contains("BehaviorType"));
    // The lexeme points at the offending value line (0-based line 4).
    assert_eq!(finding.location.location.line, 4);
}

#[test]
fn test_inheritance_concatenates_fields_and_constraints() {
    let context = context_with(concat!(
        "schema:\n",
        "  name: A\n",
        "  fields:\n",
        "    - name: a\n",
        "      type: string\n",
        "  constraints:\n",
        "    - name: UniqueName\n",
        "---\n",
        "schema:\n",
        "  name: B\n",
        "  inherits:\n",
        "    - A\n",
        "  fields:\n",
        "    - name: b\n",
        "      type: integer\n",
    ));
    let child = context.get_definition_by_name("B").unwrap();
    let instance = child.instance.as_ref().unwrap();
    assert_eq!(instance.list("fields").len(), 2);
    assert_eq!(instance.list("constraints").len(), 1);
}

#[test]
fn test_extension_apply_then_remove_restores_the_target() {
    let mut context = context_with(concat!(
        "schema:\n",
        "  name: Data\n",
        "  fields:\n",
        "    - name: x\n",
        "      type: string\n",
    ));
    let before = context
        .get_definition_by_name("Data")
        .unwrap()
        .to_yaml()
        .unwrap();

    context
        .parse_and_load(concat!(
            "extension:\n",
            "  name: Ext\n",
            "  type: Data\n",
            "  schemaExt:\n",
            "    add:\n",
            "      - name: y\n",
            "        type: integer\n",
            "    required:\n",
            "      - y\n",
        ))
        .unwrap();

    let data = context.get_definition_by_name("Data").unwrap();
    assert_eq!(data.field_entries().len(), 2);
    assert_eq!(data.required(), vec!["y"]);

    let extension = context.get_definition_by_name("Ext").unwrap().clone();
    context.remove_definition(&extension).unwrap();

    let data = context.get_definition_by_name("Data").unwrap();
    assert_eq!(data.field_entries().len(), 1);
    assert!(data.required().is_empty());
    assert_eq!(data.to_yaml().unwrap(), before);
}

#[test]
fn test_duplicate_names_report_on_the_second_definition() {
    let context = context_with(concat!(
        "schema:\n",
        "  name: Thing\n",
        "---\n",
        "schema:\n",
        "  name: Thing\n",
    ));
    let duplicates: Vec<_> = context
        .definitions()
        .iter()
        .filter(|definition| definition.name == "Thing")
        .collect();
    assert_eq!(duplicates.len(), 2);

    let first = validate_definition(&context, duplicates[0]);
    assert!(first.findings.errors().is_empty(), "first occurrence is clean");

    let second = validate_definition(&context, duplicates[1]);
    let errors = second.findings.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Thing"));
    // The name lexeme of the second document (0-based line 4).
    assert_eq!(errors[0].location.location.line, 4);
}

#[test]
fn test_reference_resolution_with_selectors() {
    let context = context_with(concat!(
        "spec:\n",
        "  name: A\n",
        "  requirements:\n",
        "    - id: R1\n",
        "      shall: respond\n",
        "---\n",
        "spec:\n",
        "  name: Other\n",
        "  requirements:\n",
        "    - id: R2\n",
        "      shall: log\n",
    ));
    let resolved = resolve_references("spec(name=\"A\").requirements(id=\"R1\")", &context);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "A");

    let (valid, _) = is_reference_format_valid("spec(name=).requirements");
    assert!(!valid);
    assert!(resolve_references("spec(name=).requirements", &context).is_empty());
}

#[test]
fn test_emitted_yaml_reparses_to_the_same_structure() {
    let context = context_with(concat!(
        "schema:\n",
        "  name: Point\n",
        "  fields:\n",
        "    - name: x\n",
        "      type: integer\n",
    ));
    let point = context.get_definition_by_name("Point").unwrap();
    let emitted = point.to_yaml().unwrap();

    let mut cache = ParserCache::new();
    let reparsed = parse_str(&mut cache, "<emitted>", &emitted).unwrap();
    assert_eq!(reparsed.len(), 1);
    assert_eq!(reparsed[0].structure, point.structure);
}
