//! Logos-based scanner for AaC YAML source.
//!
//! Tokenizes a document into [`Lexeme`]s: one per YAML token that carries a
//! value (mapping keys, scalars). Runs of plain words on a single line are
//! coalesced into one lexeme, the way a YAML scanner treats plain scalars,
//! so that `shall: The system shall respond` yields a single value lexeme.

use std::sync::Arc;

use logos::Logos;

use crate::base::{Lexeme, LineIndex, SourceFile, SourceLocation};

use super::error::ParserError;

/// Raw token classes recognized by the scanner.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum YamlToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"#[^\n]*")]
    Comment,

    #[token("---")]
    DocumentStart,

    #[token("...")]
    DocumentEnd,

    // A block sequence entry dash; the trailing blank keeps it distinct
    // from plain scalars that begin with '-'.
    #[regex(r"-[ \t]")]
    SequenceEntry,

    #[token(":")]
    Colon,

    #[token("[")]
    FlowSequenceStart,

    #[token("]")]
    FlowSequenceEnd,

    #[token("{")]
    FlowMappingStart,

    #[token("}")]
    FlowMappingEnd,

    #[token(",")]
    FlowEntry,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'[^'\n]*'")]
    SingleQuoted,

    #[regex(r"[^\s:,\[\]\{\}#]+")]
    Plain,
}

impl YamlToken {
    fn carries_value(self) -> bool {
        matches!(self, Self::Plain | Self::DoubleQuoted | Self::SingleQuoted)
    }
}

/// A raw token with its byte range, before lexeme coalescing.
#[derive(Debug, Clone, Copy)]
struct RawToken {
    kind: YamlToken,
    start: usize,
    end: usize,
}

/// Scan a document into value-carrying lexemes.
///
/// Location spans are `(start_line, start_column, start_offset,
/// end_column - start_column)`; coalesced plain scalars never cross lines.
pub fn scan(
    source: &Arc<SourceFile>,
    text: &str,
) -> Result<Vec<Lexeme>, ParserError> {
    let index = LineIndex::new(text);
    let raw = tokenize(source, text, &index)?;
    Ok(coalesce(source, text, &index, &raw))
}

fn tokenize(
    source: &Arc<SourceFile>,
    text: &str,
    index: &LineIndex,
) -> Result<Vec<RawToken>, ParserError> {
    let mut lexer = YamlToken::lexer(text);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(RawToken {
                kind,
                start: span.start,
                end: span.end,
            }),
            Err(()) => {
                let (line, column) = index.line_col(span.start);
                return Err(ParserError::UnrecognizedToken {
                    source_uri: source.uri().to_string(),
                    line,
                    column,
                });
            }
        }
    }
    Ok(tokens)
}

fn coalesce(
    source: &Arc<SourceFile>,
    text: &str,
    index: &LineIndex,
    raw: &[RawToken],
) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut i = 0;
    while i < raw.len() {
        let token = raw[i];
        match token.kind {
            YamlToken::Plain => {
                // Extend over `Plain Whitespace Plain ...` runs on one line.
                let start = token.start;
                let mut end = token.end;
                let mut j = i + 1;
                while j + 1 < raw.len()
                    && raw[j].kind == YamlToken::Whitespace
                    && raw[j + 1].kind == YamlToken::Plain
                {
                    end = raw[j + 1].end;
                    j += 2;
                }
                i = j;
                lexemes.push(make_lexeme(source, index, start, end, &text[start..end]));
            }
            YamlToken::DoubleQuoted | YamlToken::SingleQuoted => {
                let inner = &text[token.start + 1..token.end - 1];
                lexemes.push(make_lexeme(source, index, token.start, token.end, inner));
                i += 1;
            }
            _ => i += 1,
        }
    }
    lexemes
}

fn make_lexeme(
    source: &Arc<SourceFile>,
    index: &LineIndex,
    start: usize,
    end: usize,
    value: &str,
) -> Lexeme {
    let (line, column) = index.line_col(start);
    let (_, end_column) = index.line_col(end);
    let location = SourceLocation::new(line, column, start, end_column - column);
    Lexeme::new(location, Arc::clone(source), value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn scan_text(text: &str) -> Vec<Lexeme> {
        let source = Arc::new(SourceFile::new("<test>", true));
        scan(&source, text).unwrap()
    }

    #[test]
    fn keys_and_scalars_become_lexemes() {
        let lexemes = scan_text("schema:\n  name: Point\n");
        let values: Vec<&str> = lexemes.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["schema", "name", "Point"]);
    }

    #[test]
    fn locations_are_zero_based_with_span() {
        let lexemes = scan_text("schema:\n  name: Point\n");
        let point = &lexemes[2];
        assert_eq!(point.location, SourceLocation::new(1, 8, 16, 5));
    }

    #[test]
    fn plain_scalar_runs_coalesce_on_one_line() {
        let lexemes = scan_text("shall: The system shall respond\n");
        let values: Vec<&str> = lexemes.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["shall", "The system shall respond"]);
    }

    #[test]
    fn quoted_scalars_strip_quotes() {
        let lexemes = scan_text("name: \"Point A\"\n");
        assert_eq!(lexemes[1].value, "Point A");
        // Span still covers the quotes.
        assert_eq!(lexemes[1].location.span, 9);
    }

    #[test]
    fn sequence_entries_and_flow_syntax_are_skipped() {
        let lexemes = scan_text("values:\n  - one\n  - {name: x, type: integer}\n");
        let values: Vec<&str> = lexemes.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["values", "one", "name", "x", "type", "integer"]);
    }

    #[test]
    fn document_separators_carry_no_value() {
        let lexemes = scan_text("---\nenum:\n  name: A\n---\n");
        let values: Vec<&str> = lexemes.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["enum", "name", "A"]);
    }

    #[test]
    fn comments_are_ignored() {
        let lexemes = scan_text("name: Point # trailing\n# full line\n");
        let values: Vec<&str> = lexemes.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(values, vec!["name", "Point"]);
    }
}
