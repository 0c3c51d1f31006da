//! The packaged core spec: the language described in itself.
//!
//! Embedded at build time and loaded first on context construction. The
//! core spec is trusted; constraint evaluation is skipped at bootstrap and
//! its source is never user-editable.

use crate::lang::Definition;
use crate::parser::{self, ParserCache, ParserError};

pub const CORE_SPEC_URI: &str = "<core>";

const CORE_SPEC_TEXT: &str = include_str!("../../resources/core.yaml");

/// Parse the embedded core spec into unloaded definitions.
pub fn parse(cache: &mut ParserCache) -> Result<Vec<Definition>, ParserError> {
    parser::parse_str_with_editable(cache, CORE_SPEC_URI, CORE_SPEC_TEXT, false)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn core_spec_parses_and_is_not_user_editable() {
        let mut cache = ParserCache::new();
        let definitions = parse(&mut cache).unwrap();
        assert!(!definitions.is_empty());
        for definition in &definitions {
            assert!(!definition.source.is_user_editable());
        }
    }

    #[test]
    fn core_spec_declares_the_self_describing_schemas() {
        let mut cache = ParserCache::new();
        let definitions = parse(&mut cache).unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        for expected in ["Root", "Primitives", "Schema", "Field", "Enum", "RuntimeConstraints"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }
}
