//! Import resolution: the transitive file closure of an entry document.
//!
//! `import` documents list further files to parse, either as a bare path
//! list or under a `files:` key. Paths are resolved against the importing
//! file's directory; cycles are broken by deduplicating on canonicalized
//! paths. The resolver returns files in discovery order and never parses
//! definitions itself.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde_yaml::Value;

use super::cache::ParserCache;
use super::documents::{self, ROOT_KEY_IMPORT};
use super::error::ParserError;

const FIELD_FILES: &str = "files";

/// Collect the entry file plus every file reachable through imports.
pub fn collect_import_files(
    cache: &mut ParserCache,
    entry: &Path,
) -> Result<Vec<PathBuf>, ParserError> {
    let mut discovered = Vec::new();
    let mut seen = FxHashSet::default();
    collect(cache, entry, &mut discovered, &mut seen)?;
    Ok(discovered)
}

fn collect(
    cache: &mut ParserCache,
    file: &Path,
    discovered: &mut Vec<PathBuf>,
    seen: &mut FxHashSet<PathBuf>,
) -> Result<(), ParserError> {
    let sanitized = sanitize_path(file);
    if !seen.insert(sanitized.clone()) {
        return Ok(());
    }
    discovered.push(sanitized.clone());

    let parent = sanitized.parent().map(Path::to_path_buf).unwrap_or_default();
    for document in cache.parse_file_documents(&sanitized)? {
        if documents::root_key(&document) != ROOT_KEY_IMPORT {
            continue;
        }
        for import in import_paths(&document) {
            let relative = import.strip_prefix("./").unwrap_or(&import);
            collect(cache, &parent.join(relative), discovered, seen)?;
        }
    }
    Ok(())
}

/// Paths declared by one import document, accepting both the bare list
/// form (`import: [a.yaml]`) and the `files:` mapping form.
fn import_paths(document: &Value) -> Vec<String> {
    let body = document
        .as_mapping()
        .and_then(|mapping| mapping.get(ROOT_KEY_IMPORT));
    let paths = match body {
        Some(Value::Sequence(paths)) => Some(paths),
        Some(Value::Mapping(body)) => body.get(FIELD_FILES).and_then(Value::as_sequence),
        _ => None,
    };
    paths
        .map(|paths| {
            paths
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Absolutize and normalize a filesystem path without requiring it to
/// exist; canonicalization is preferred when it succeeds.
pub fn sanitize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn collects_transitive_imports_in_discovery_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "c.yaml", "schema:\n  name: C\n");
        write(&dir, "b.yaml", "import:\n  - ./c.yaml\n---\nschema:\n  name: B\n");
        let entry = write(&dir, "a.yaml", "import:\n  - ./b.yaml\n---\nschema:\n  name: A\n");

        let mut cache = ParserCache::new();
        let files = collect_import_files(&mut cache, &entry).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml", "c.yaml"]);
    }

    #[test]
    fn cycles_are_broken_by_path_dedup() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.yaml", "import:\n  - ./a.yaml\n---\nschema:\n  name: B\n");
        let entry = write(&dir, "a.yaml", "import:\n  - ./b.yaml\n---\nschema:\n  name: A\n");

        let mut cache = ParserCache::new();
        let files = collect_import_files(&mut cache, &entry).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn files_mapping_form_is_accepted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.yaml", "schema:\n  name: B\n");
        let entry = write(
            &dir,
            "a.yaml",
            "import:\n  files:\n    - ./b.yaml\n---\nschema:\n  name: A\n",
        );

        let mut cache = ParserCache::new();
        let files = collect_import_files(&mut cache, &entry).unwrap();
        assert_eq!(files.len(), 2);
    }
}
