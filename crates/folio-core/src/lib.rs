//! # folio-core
//!
//! Core types, traits, and abstractions for the folio citation library.
//!
//! This crate provides the domain models (citations, bibliography entries,
//! search results), the repository and search trait definitions, and the
//! pure citation formatting/parsing and snippet helpers that the other
//! folio crates build on.

pub mod citation;
pub mod defaults;
pub mod error;
pub mod models;
pub mod snippet;
pub mod traits;

// Re-export commonly used types at crate root
pub use citation::{
    extract_references, format_bibliography_entry, format_in_text_marker, CitationReference,
    Locator,
};
pub use error::{Error, Result};
pub use models::*;
pub use snippet::{build_snippet, mark_matches};
pub use traits::*;
