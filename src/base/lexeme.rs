use std::fmt;
use std::sync::Arc;

use super::location::SourceLocation;
use super::source::SourceFile;

/// A lexical unit of a parsed AaC definition.
///
/// One lexeme is retained for every scanned YAML token that carried a value
/// (keys and scalars). Lexemes give findings and rename operations precise
/// source ranges without reparsing.
#[derive(Debug, Clone)]
pub struct Lexeme {
    pub location: SourceLocation,
    pub source: Arc<SourceFile>,
    pub value: String,
}

impl Lexeme {
    pub fn new(location: SourceLocation, source: Arc<SourceFile>, value: impl Into<String>) -> Self {
        Self {
            location,
            source,
            value: value.into(),
        }
    }
}

impl PartialEq for Lexeme {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.location == other.location
            && self.source.uri() == other.source.uri()
    }
}

impl Eq for Lexeme {}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} in {}", self.value, self.location, self.source)
    }
}
