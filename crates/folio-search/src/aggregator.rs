//! Combined search across documents, notes, and highlights.
//!
//! The three sub-queries fan out concurrently and are joined at the end.
//! Each is isolated: one kind failing (index unavailable, relation gone)
//! flags that kind and leaves the others' results intact, so the caller
//! always gets the best partial answer the store could produce.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use folio_core::{
    defaults, KindResults, LibrarySearch, Result, SearchRequest, SearchResponse, SearchResult,
};
use folio_db::Database;

/// Search engine over the folio database.
#[derive(Clone)]
pub struct LibrarySearchEngine {
    db: Database,
}

impl LibrarySearchEngine {
    /// Create a new search engine.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Document-only search with the default single-kind limit.
    pub async fn documents(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_documents(query, defaults::DOCUMENT_ONLY_LIMIT)
            .await
    }

    /// Note-only search with the default single-kind limit.
    pub async fn notes(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search_notes(query, defaults::NOTE_ONLY_LIMIT).await
    }
}

/// Fold one kind's outcome into the partial-result shape.
fn isolate(kind: &'static str, outcome: Result<Vec<SearchResult>>) -> KindResults {
    match outcome {
        Ok(hits) => KindResults {
            hits,
            failed: false,
        },
        Err(err) => {
            warn!(
                subsystem = "search",
                component = "aggregator",
                kind,
                error = %err,
                "Search kind failed, returning partial results"
            );
            KindResults {
                hits: Vec::new(),
                failed: true,
            }
        }
    }
}

#[async_trait]
impl LibrarySearch for LibrarySearchEngine {
    async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
        let query = req.query.trim();
        if query.is_empty() {
            return Ok(SearchResponse::default());
        }

        let started = Instant::now();
        let (documents, notes, highlights) = tokio::join!(
            self.db.index.documents(query, req.document_limit),
            self.db.index.notes(query, req.note_limit),
            self.db.index.highlights(query, req.highlight_limit),
        );

        let response = SearchResponse {
            documents: isolate("documents", documents),
            notes: isolate("notes", notes),
            highlights: isolate("highlights", highlights),
        };

        info!(
            subsystem = "search",
            component = "aggregator",
            op = "search",
            duration_ms = started.elapsed().as_millis() as u64,
            result_count = response.documents.hits.len()
                + response.notes.hits.len()
                + response.highlights.hits.len(),
            "Combined search finished"
        );

        Ok(response)
    }

    async fn search_documents(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.db.index.documents(query, limit).await
    }

    async fn search_notes(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.db.index.notes(query, limit).await
    }
}
