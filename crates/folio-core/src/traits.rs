//! Core traits for folio abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;
use crate::error::Result;
use crate::models::*;

// =============================================================================
// CITATION REPOSITORY
// =============================================================================

/// Request for creating a new citation.
#[derive(Debug, Clone)]
pub struct CreateCitationRequest {
    pub document_id: Uuid,
    pub metadata: CitationMetadata,
}

/// Repository for citation records: number assignment, CRUD, usage counts.
///
/// Implementations must keep `citation_number` unique under concurrent
/// creates and must apply usage increments atomically (no read-modify-write).
#[async_trait]
pub trait CitationRepository: Send + Sync {
    /// Create a citation with the next number and a cached formatted string.
    async fn create(&self, req: CreateCitationRequest) -> Result<Citation>;

    /// Fetch a citation by id. Missing id is an error.
    async fn fetch(&self, id: Uuid) -> Result<Citation>;

    /// The canonical citation for a document: first under ascending id
    /// order. Stable but arbitrary when a document has several.
    async fn get_by_document(&self, document_id: Uuid) -> Result<Option<Citation>>;

    /// Resolve a printed marker label. Dangling labels yield `None`.
    async fn get_by_number(&self, number: i32) -> Result<Option<Citation>>;

    /// Replace the metadata and recompute the cached formatted string.
    async fn update_metadata(&self, id: Uuid, metadata: CitationMetadata) -> Result<Citation>;

    /// Atomically bump the usage count. No-op if the citation is gone.
    async fn increment_usage(&self, id: Uuid) -> Result<()>;

    /// Delete the citation. Other citations keep their numbers and counts.
    /// Tolerates absence.
    async fn remove(&self, id: Uuid) -> Result<()>;

    /// All citations, ascending by citation number.
    async fn list(&self) -> Result<Vec<Citation>>;
}

// =============================================================================
// BIBLIOGRAPHY
// =============================================================================

/// Producer of the ordered bibliography view.
#[async_trait]
pub trait BibliographyProvider: Send + Sync {
    /// All citations rendered as bibliography entries, ascending by
    /// number, joined with document titles and usage counts. A missing
    /// document yields an empty title, never a failure.
    async fn assemble(&self) -> Result<Vec<BibliographyEntry>>;
}

// =============================================================================
// LIBRARY SEARCH
// =============================================================================

/// Parameters for a combined library search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub document_limit: i64,
    pub note_limit: i64,
    pub highlight_limit: i64,
}

impl SearchRequest {
    /// A combined search with the default per-kind limits.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            document_limit: defaults::SEARCH_DOCUMENT_LIMIT,
            note_limit: defaults::SEARCH_NOTE_LIMIT,
            highlight_limit: defaults::SEARCH_HIGHLIGHT_LIMIT,
        }
    }
}

/// Hits for one result kind, with its isolation flag.
///
/// `failed` marks a kind whose sub-query errored; the other kinds still
/// carry their results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindResults {
    pub hits: Vec<SearchResult>,
    pub failed: bool,
}

/// Combined search results across all collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: KindResults,
    pub notes: KindResults,
    pub highlights: KindResults,
}

/// Cross-collection search with per-kind isolation.
#[async_trait]
pub trait LibrarySearch: Send + Sync {
    /// Search documents, notes, and highlights concurrently. An empty or
    /// whitespace-only query returns an empty response without touching
    /// the store.
    async fn search(&self, req: SearchRequest) -> Result<SearchResponse>;

    /// Document-only search (indexed, ranked).
    async fn search_documents(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>>;

    /// Note-only search (indexed, ranked).
    async fn search_notes(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>>;
}
