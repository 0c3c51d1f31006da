//! Least-frequently-used cache for parsed YAML.
//!
//! Keyed by a content digest, so identical text parsed from different
//! sources shares one entry. The cache stores source-agnostic scan results;
//! lexemes are bound to a [`SourceFile`] on retrieval. Eviction is purely a
//! performance concern: recomputing an evicted entry yields identical
//! results.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_yaml::Value;
use sha2::{Digest, Sha256};

use crate::base::{Lexeme, SourceFile, SourceLocation};

use super::documents::parse_documents;
use super::error::ParserError;
use super::scanner;

const DEFAULT_CAPACITY: usize = 300;

type ContentKey = [u8; 32];

/// A scanned token without source binding.
#[derive(Debug, Clone)]
struct ScannedToken {
    location: SourceLocation,
    value: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    documents: Vec<Value>,
    tokens: Vec<ScannedToken>,
    times_accessed: u64,
}

/// A bounded LFU cache over parsed documents and scan tokens.
#[derive(Debug)]
pub struct ParserCache {
    capacity: usize,
    entries: FxHashMap<ContentKey, CacheEntry>,
}

impl Default for ParserCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: FxHashMap::default(),
        }
    }

    /// Parse a string, returning its documents and source-bound lexemes.
    pub fn parse_string(
        &mut self,
        source: &Arc<SourceFile>,
        text: &str,
    ) -> Result<(Vec<Value>, Vec<Lexeme>), ParserError> {
        let entry = self.get_or_parse(source, text)?;
        let documents = entry.documents.clone();
        let lexemes = entry
            .tokens
            .iter()
            .map(|token| Lexeme::new(token.location, Arc::clone(source), token.value.clone()))
            .collect();
        Ok((documents, lexemes))
    }

    /// Read and parse a file. The source file is marked user-editable.
    pub fn parse_file(
        &mut self,
        path: &Path,
    ) -> Result<(Arc<SourceFile>, String, Vec<Value>, Vec<Lexeme>), ParserError> {
        let text = fs::read_to_string(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Arc::new(SourceFile::new(path.to_string_lossy(), true));
        let (documents, lexemes) = self.parse_string(&source, &text)?;
        Ok((source, text, documents, lexemes))
    }

    /// Parse only the document structures of a file, for import discovery.
    pub fn parse_file_documents(&mut self, path: &Path) -> Result<Vec<Value>, ParserError> {
        let (_, _, documents, _) = self.parse_file(path)?;
        Ok(documents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_or_parse(
        &mut self,
        source: &Arc<SourceFile>,
        text: &str,
    ) -> Result<&CacheEntry, ParserError> {
        let key: ContentKey = Sha256::digest(text.as_bytes()).into();
        if !self.entries.contains_key(&key) {
            let documents = parse_documents(source.uri(), text)?;
            let tokens = scanner::scan(source, text)?
                .into_iter()
                .map(|lexeme| ScannedToken {
                    location: lexeme.location,
                    value: lexeme.value,
                })
                .collect();
            self.evict_if_full();
            self.entries.insert(
                key,
                CacheEntry {
                    documents,
                    tokens,
                    times_accessed: 0,
                },
            );
        }
        // The entry exists by now; count the access.
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| ParserError::MalformedDocument {
                source_uri: source.uri().to_string(),
                message: "parser cache entry vanished".to_string(),
            })?;
        entry.times_accessed += 1;
        Ok(&*entry)
    }

    fn evict_if_full(&mut self) {
        if self.entries.len() < self.capacity {
            return;
        }
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.times_accessed)
            .map(|(key, _)| *key)
        {
            tracing::debug!(
                capacity = self.capacity,
                "parser cache full, evicting least-used entry"
            );
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn source() -> Arc<SourceFile> {
        Arc::new(SourceFile::new("<test>", true))
    }

    #[test]
    fn repeated_parses_hit_the_cache() {
        let mut cache = ParserCache::new();
        let text = "schema:\n  name: A\n";
        cache.parse_string(&source(), text).unwrap();
        cache.parse_string(&source(), text).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_drops_the_least_frequently_used_entry() {
        let mut cache = ParserCache::with_capacity(2);
        let hot = "schema:\n  name: Hot\n";
        let cold = "schema:\n  name: Cold\n";
        cache.parse_string(&source(), hot).unwrap();
        cache.parse_string(&source(), hot).unwrap();
        cache.parse_string(&source(), cold).unwrap();
        // Inserting a third entry evicts `cold` (1 access vs 2).
        cache
            .parse_string(&source(), "schema:\n  name: New\n")
            .unwrap();
        assert_eq!(cache.len(), 2);
        // Re-parsing the evicted content must produce identical results.
        let (documents, lexemes) = cache.parse_string(&source(), cold).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(lexemes[2].value, "Cold");
    }

    #[test]
    fn cached_lexemes_are_rebound_to_the_requesting_source() {
        let mut cache = ParserCache::new();
        let text = "schema:\n  name: A\n";
        let first = Arc::new(SourceFile::new("first.yaml", true));
        let second = Arc::new(SourceFile::new("second.yaml", true));
        cache.parse_string(&first, text).unwrap();
        let (_, lexemes) = cache.parse_string(&second, text).unwrap();
        assert_eq!(lexemes[0].source.uri(), "second.yaml");
    }
}
