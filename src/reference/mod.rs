//! Dotted reference expressions: `spec(name="A").requirements(id="R1")`.
//!
//! Each segment is an identifier with an optional `(field=value)` selector.
//! Resolution is root-key anchored: the first segment names a root key and
//! later segments step into sub-fields, with selectors filtering by
//! string-compared child values. Malformed expressions resolve to the
//! empty list; callers distinguish malformed from unmatched via
//! [`is_reference_format_valid`].

use serde_yaml::Value;

use crate::lang::{Definition, LanguageContext};

/// Characters never allowed in segment identifiers or selector fields.
const DISALLOWED: &str = "~`!@#$%^&*()=+\\|[]{}'\";:/?,.<> ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReferenceSegment {
    name: String,
    selector: Option<(String, String)>,
}

/// Check a reference expression's shape without touching the context.
/// Returns `(false, reason)` for malformed expressions.
pub fn is_reference_format_valid(expression: &str) -> (bool, String) {
    match parse_segments(expression) {
        Ok(_) => (true, String::new()),
        Err(message) => (false, message),
    }
}

/// Resolve a reference expression to the definitions it matches.
pub fn resolve_references<'a>(
    expression: &str,
    context: &'a LanguageContext,
) -> Vec<&'a Definition> {
    let Ok(segments) = parse_segments(expression) else {
        return Vec::new();
    };
    let Some((first, rest)) = segments.split_first() else {
        return Vec::new();
    };
    if !context
        .get_root_keys()
        .iter()
        .any(|root_key| *root_key == first.name)
    {
        return Vec::new();
    }

    let mut candidates: Vec<(&Definition, Vec<&Value>)> = context
        .get_definitions_by_root_key(&first.name)
        .into_iter()
        .filter_map(|definition| {
            let body = definition
                .structure
                .as_mapping()
                .and_then(|mapping| mapping.get(first.name.as_str()))?;
            if let Some((field, value)) = &first.selector {
                if !selector_matches(body, field, value) {
                    return None;
                }
            }
            Some((definition, vec![body]))
        })
        .collect();

    for segment in rest {
        candidates = candidates
            .into_iter()
            .filter_map(|(definition, frontier)| {
                let next: Vec<&Value> = frontier
                    .into_iter()
                    .flat_map(|value| step_into(value, &segment.name))
                    .filter(|child| match &segment.selector {
                        Some((field, value)) => selector_matches(child, field, value),
                        None => true,
                    })
                    .collect();
                (!next.is_empty()).then_some((definition, next))
            })
            .collect();
        if candidates.is_empty() {
            break;
        }
    }
    candidates
        .into_iter()
        .map(|(definition, _)| definition)
        .collect()
}

/// The children reached by stepping into `key` from one structure value.
fn step_into<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    match value {
        Value::Mapping(mapping) => mapping.get(key).map(|child| vec![child]).unwrap_or_default(),
        Value::Sequence(items) => items
            .iter()
            .flat_map(|item| step_into(item, key))
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether a value (or any element of a sequence value) has a child
/// `field` whose stringified content equals `expected`.
fn selector_matches(value: &Value, field: &str, expected: &str) -> bool {
    match value {
        Value::Mapping(mapping) => mapping
            .get(field)
            .and_then(render_scalar)
            .is_some_and(|rendered| rendered == expected),
        Value::Sequence(items) => items
            .iter()
            .any(|item| selector_matches(item, field, expected)),
        _ => false,
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn parse_segments(expression: &str) -> Result<Vec<ReferenceSegment>, String> {
    if expression.trim().is_empty() {
        return Err("reference expression is empty".to_string());
    }
    split_segments(expression)?
        .into_iter()
        .map(|segment| parse_segment(&segment))
        .collect()
}

/// Split on `.` outside selector parentheses and quotes, so selector
/// values may themselves contain dots.
fn split_segments(expression: &str) -> Result<Vec<String>, String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in expression.chars() {
        match ch {
            '"' | '\'' if quote == Some(ch) => quote = None,
            '"' | '\'' if quote.is_none() => quote = Some(ch),
            '(' if quote.is_none() => depth += 1,
            ')' if quote.is_none() => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format!("unbalanced parentheses in '{expression}'"))?;
            }
            '.' if depth == 0 && quote.is_none() => {
                segments.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    if depth != 0 || quote.is_some() {
        return Err(format!("unbalanced selector in '{expression}'"));
    }
    segments.push(current);
    Ok(segments)
}

fn parse_segment(segment: &str) -> Result<ReferenceSegment, String> {
    if segment.is_empty() {
        return Err("reference contains an empty segment".to_string());
    }
    let (name, selector) = match segment.find('(') {
        Some(open) => {
            let Some(inner) = segment[open..].strip_prefix('(').and_then(|s| s.strip_suffix(')'))
            else {
                return Err(format!("unbalanced selector parentheses in '{segment}'"));
            };
            (&segment[..open], Some(parse_selector(segment, inner)?))
        }
        None => {
            if segment.contains(')') {
                return Err(format!("unbalanced selector parentheses in '{segment}'"));
            }
            (segment, None)
        }
    };
    if name.is_empty() {
        return Err(format!("segment '{segment}' has no identifier"));
    }
    check_identifier(name)?;
    Ok(ReferenceSegment {
        name: name.to_string(),
        selector,
    })
}

fn parse_selector(segment: &str, inner: &str) -> Result<(String, String), String> {
    let Some((field, value)) = inner.split_once('=') else {
        return Err(format!("selector in '{segment}' must contain '='"));
    };
    let field = field.trim();
    let value = value.trim();
    if field.is_empty() || value.is_empty() {
        return Err(format!(
            "selector in '{segment}' must have content on both sides of '='"
        ));
    }
    check_identifier(field)?;
    Ok((field.to_string(), strip_quotes(value).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

fn check_identifier(identifier: &str) -> Result<(), String> {
    if let Some(bad) = identifier.chars().find(|ch| DISALLOWED.contains(*ch)) {
        return Err(format!(
            "invalid character '{bad}' in identifier '{identifier}'"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("spec")]
    #[case("spec.requirements")]
    #[case("spec(name=\"A\").requirements(id=\"R1\")")]
    #[case("model(name=Service).behavior")]
    fn well_formed_expressions_pass(#[case] expression: &str) {
        let (valid, message) = is_reference_format_valid(expression);
        assert!(valid, "{expression}: {message}");
    }

    #[rstest]
    #[case("")]
    #[case("spec..requirements")]
    #[case("spec(name=).requirements")]
    #[case("spec(name\"A\")")]
    #[case("spec(name=\"A\"")]
    #[case("spec)name")]
    #[case("sp ec")]
    fn malformed_expressions_fail(#[case] expression: &str) {
        let (valid, _) = is_reference_format_valid(expression);
        assert!(!valid, "{expression} should be rejected");
    }

    #[test]
    fn selector_values_keep_inner_dots() {
        let segments = parse_segments("spec(name=\"a.b\").requirements").unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0].selector,
            Some(("name".to_string(), "a.b".to_string()))
        );
    }
}
