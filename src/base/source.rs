use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// An opened AaC document.
///
/// Source files are shared between every [`crate::lang::Definition`] parsed
/// from them via `Arc`. The `is_loaded_in_context` flag is flipped by the
/// language context when the first definition from this file is loaded and
/// when the last one is removed; it is the only mutable state on the type.
#[derive(Debug)]
pub struct SourceFile {
    uri: String,
    is_user_editable: bool,
    is_loaded_in_context: AtomicBool,
}

impl SourceFile {
    pub fn new(uri: impl Into<String>, is_user_editable: bool) -> Self {
        Self {
            uri: uri.into(),
            is_user_editable,
            is_loaded_in_context: AtomicBool::new(false),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_user_editable(&self) -> bool {
        self.is_user_editable
    }

    pub fn is_loaded_in_context(&self) -> bool {
        self.is_loaded_in_context.load(Ordering::Relaxed)
    }

    pub fn set_loaded_in_context(&self, loaded: bool) {
        self.is_loaded_in_context.store(loaded, Ordering::Relaxed);
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.is_user_editable == other.is_user_editable
    }
}

impl Eq for SourceFile {}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
