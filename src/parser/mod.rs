//! YAML parsing front end.
//!
//! The parser turns source text into [`Definition`](crate::lang::Definition)s
//! in four stages:
//!
//! - [`scanner`] — a token scan of the raw text, producing provenance-bearing
//!   lexemes.
//! - [`documents`] — structural parsing of multi-document YAML streams.
//! - [`imports`] — resolution of `import` documents into a file closure.
//! - [`builder`] — assembly of documents, lexemes, and source handles into
//!   definitions.
//!
//! All parses go through the content-keyed [`ParserCache`].

pub mod builder;
pub mod cache;
pub mod documents;
pub mod error;
pub mod imports;
pub mod scanner;

pub use builder::{DEFAULT_SOURCE_URI, parse, parse_file, parse_str, parse_str_with_editable};
pub use cache::ParserCache;
pub use error::ParserError;
