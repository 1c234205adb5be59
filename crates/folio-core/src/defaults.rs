//! Centralized default constants for the folio system.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates should reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// SEARCH
// =============================================================================

/// Document results per combined search.
pub const SEARCH_DOCUMENT_LIMIT: i64 = 5;

/// Note results per combined search.
pub const SEARCH_NOTE_LIMIT: i64 = 10;

/// Highlight results per combined search.
pub const SEARCH_HIGHLIGHT_LIMIT: i64 = 10;

/// Document results for a document-only search.
pub const DOCUMENT_ONLY_LIMIT: i64 = 10;

/// Note results for a note-only search.
pub const NOTE_ONLY_LIMIT: i64 = 20;

// =============================================================================
// SNIPPETS
// =============================================================================

/// Characters of context kept on each side of a snippet match.
pub const SNIPPET_CONTEXT_CHARS: usize = 50;

/// Leading-substring length used when a snippet has no match to anchor on.
pub const SNIPPET_FALLBACK_CHARS: usize = 200;

// =============================================================================
// CITATION NUMBERING
// =============================================================================

/// Attempts for a citation create before surfacing a number conflict.
pub const CREATE_MAX_ATTEMPTS: u32 = 3;

/// Base backoff between conflicting create attempts, in milliseconds.
pub const CREATE_RETRY_BASE_MS: u64 = 20;

/// Random jitter added on top of the base backoff, in milliseconds.
pub const CREATE_RETRY_JITTER_MS: u64 = 30;
