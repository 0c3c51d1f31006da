//! Definition builder: YAML documents to [`Definition`]s.
//!
//! One definition per non-empty document. Each definition keeps the slice
//! of the original text it came from (the `---` separator line included for
//! every document after the first, so lexeme offsets stay valid), the
//! lexemes scanned inside its line range, and a handle to the shared
//! source file.

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;

use crate::base::{Lexeme, SourceFile};
use crate::lang::Definition;

use super::cache::ParserCache;
use super::documents::{self, ROOT_KEY_IMPORT};
use super::error::ParserError;
use super::imports;

pub const DEFAULT_SOURCE_URI: &str = "<string>";

/// Parse a file path or a YAML string into definitions.
///
/// A single-line argument naming an existing file is treated as a path
/// (its import closure is parsed too); anything else is parsed as text.
pub fn parse(cache: &mut ParserCache, source: &str) -> Result<Vec<Definition>, ParserError> {
    let is_file = !source.contains('\n') && Path::new(source).exists();
    if is_file {
        parse_file(cache, Path::new(source))
    } else {
        parse_str(cache, DEFAULT_SOURCE_URI, source)
    }
}

/// Parse a string of one or more YAML documents into definitions.
pub fn parse_str(
    cache: &mut ParserCache,
    source_uri: &str,
    text: &str,
) -> Result<Vec<Definition>, ParserError> {
    parse_str_with_editable(cache, source_uri, text, true)
}

/// As [`parse_str`], controlling whether the source is user-editable.
/// The core spec bootstrap parses with `is_user_editable = false`.
pub fn parse_str_with_editable(
    cache: &mut ParserCache,
    source_uri: &str,
    text: &str,
    is_user_editable: bool,
) -> Result<Vec<Definition>, ParserError> {
    let source = Arc::new(SourceFile::new(source_uri, is_user_editable));
    let (parsed_documents, lexemes) = cache.parse_string(&source, text)?;
    Ok(build_definitions(&source, text, parsed_documents, &lexemes))
}

/// Parse a file and every file reachable through its `import` declarations.
pub fn parse_file(cache: &mut ParserCache, path: &Path) -> Result<Vec<Definition>, ParserError> {
    let mut definitions = Vec::new();
    for file in imports::collect_import_files(cache, path)? {
        let (source, text, parsed_documents, lexemes) = cache.parse_file(&file)?;
        definitions.extend(build_definitions(&source, &text, parsed_documents, &lexemes));
    }
    Ok(definitions)
}

/// Assemble definitions from pre-parsed documents and lexemes.
///
/// Import documents are consumed by the import resolver and never surface
/// as definitions.
fn build_definitions(
    source: &Arc<SourceFile>,
    text: &str,
    parsed_documents: Vec<Value>,
    lexemes: &[Lexeme],
) -> Vec<Definition> {
    let segments = document_segments(text);
    let mut remaining = parsed_documents.into_iter();
    let mut definitions = Vec::new();

    for (start_line, end_line, content) in segments {
        if segment_is_empty(&content) {
            tracing::debug!(
                source = source.uri(),
                start_line,
                "skipping empty document segment"
            );
            continue;
        }
        let Some(structure) = remaining.next() else {
            break;
        };
        let root_key = documents::root_key(&structure);
        if root_key == ROOT_KEY_IMPORT {
            continue;
        }
        let name = documents::document_name(&structure)
            .map(str::to_string)
            .unwrap_or_default();
        let document_lexemes: Vec<Lexeme> = lexemes
            .iter()
            .filter(|lexeme| {
                lexeme.location.line >= start_line && lexeme.location.line < end_line
            })
            .cloned()
            .collect();
        definitions.push(Definition::new(
            name,
            content,
            Arc::clone(source),
            document_lexemes,
            structure,
        ));
    }
    definitions
}

/// True when a segment holds no document: only separators, comments,
/// blank lines, and explicit nulls. Matches what `parse_documents` skips,
/// so segments and parsed structures stay zipped one to one.
fn segment_is_empty(content: &str) -> bool {
    content.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed == "---"
            || trimmed == "..."
            || trimmed == "null"
            || trimmed == "~"
            || trimmed.starts_with('#')
    })
}

/// Split source text into `(start_line, end_line, content)` document
/// segments on `---` separator lines. `end_line` is exclusive.
fn document_segments(text: &str) -> Vec<(usize, usize, String)> {
    let lines: Vec<&str> = text.lines().collect();
    let mut boundaries = vec![0];
    for (number, line) in lines.iter().enumerate() {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed.starts_with("--- ") {
            if number != 0 {
                boundaries.push(number);
            }
        }
    }
    boundaries.push(lines.len());

    boundaries
        .windows(2)
        .map(|window| {
            let (start, end) = (window[0], window[1]);
            let mut content = lines[start..end].join("\n");
            content.push('\n');
            (start, end, content)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn parse_text(text: &str) -> Vec<Definition> {
        let mut cache = ParserCache::new();
        parse_str(&mut cache, "<test>", text).unwrap()
    }

    #[test]
    fn one_definition_per_document() {
        let definitions =
            parse_text("schema:\n  name: A\n---\nenum:\n  name: B\n  values: [x]\n");
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].name, "A");
        assert_eq!(definitions[0].root_key(), "schema");
        assert_eq!(definitions[1].name, "B");
        assert_eq!(definitions[1].root_key(), "enum");
    }

    #[test]
    fn later_documents_keep_the_separator_line() {
        let definitions = parse_text("schema:\n  name: A\n---\nschema:\n  name: B\n");
        assert!(definitions[1].content.starts_with("---\n"));
        // Lexeme lines are absolute within the file.
        assert_eq!(definitions[1].lexeme_with_value("B").unwrap().location.line, 4);
    }

    #[test]
    fn import_documents_are_not_surfaced() {
        let definitions = parse_text("import:\n  - ./a.yaml\n---\nschema:\n  name: A\n");
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "A");
    }

    #[test]
    fn null_documents_are_skipped_with_their_text_segment() {
        let definitions = parse_text("null\n---\nschema:\n  name: A\n");
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "A");
        assert!(definitions[0].content.contains("schema:"));
        assert!(!definitions[0].content.contains("null"));
        // Lexemes come from the definition's own lines.
        assert_eq!(definitions[0].lexeme_with_value("A").unwrap().location.line, 3);
    }

    #[test]
    fn definitions_share_one_source_file() {
        let definitions = parse_text("schema:\n  name: A\n---\nschema:\n  name: B\n");
        assert!(Arc::ptr_eq(&definitions[0].source, &definitions[1].source));
        assert!(definitions[0].source.is_user_editable());
    }

    #[test]
    fn definition_uid_is_stable_for_a_name() {
        let first = parse_text("schema:\n  name: A\n");
        let second = parse_text("schema:\n  name: A\n");
        assert_eq!(first[0].uid(), second[0].uid());
    }
}
