//! Per-collection search primitives.
//!
//! Documents and notes go through PostgreSQL full-text search
//! (`websearch_to_tsquery` over GIN expression indexes) ranked by
//! `ts_rank`. Highlights have no text index: the whole live collection is
//! scanned with a case-insensitive substring match and truncated to the
//! limit. The linear scan is the known scaling limit of highlight search;
//! it holds up only while per-user highlight volume stays small.

use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::trace;
use uuid::Uuid;

use folio_core::{build_snippet, defaults, Error, Result, ResultKind, SearchResult};

/// Derive a display title from free-form note content.
fn title_from_content(content: &str) -> String {
    content
        .lines()
        .next()
        .map(|l| l.trim_start_matches('#').trim())
        .unwrap_or("Untitled")
        .chars()
        .take(80)
        .collect()
}

/// Snippet around the first match, or the leading slice of the text when
/// the index matched on a stemmed form the substring scan cannot find.
fn snippet_or_leading(text: &str, query: &str) -> String {
    build_snippet(text, query, defaults::SNIPPET_CONTEXT_CHARS)
        .unwrap_or_else(|| text.chars().take(defaults::SNIPPET_FALLBACK_CHARS).collect())
}

/// Store-level search over the document, note, and highlight collections.
#[derive(Clone)]
pub struct PgLibraryIndex {
    pool: Pool<Postgres>,
}

impl PgLibraryIndex {
    /// Create a new PgLibraryIndex with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Full-text search over document titles, ranked by relevance.
    pub async fn documents(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let rows = sqlx::query(
            "SELECT d.id, d.title, d.created_at_utc, \
                    ts_rank(to_tsvector('english', d.title), \
                            websearch_to_tsquery('english', $1)) AS score \
             FROM document d \
             WHERE to_tsvector('english', d.title) @@ websearch_to_tsquery('english', $1) \
             ORDER BY score DESC \
             LIMIT $2",
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Search(e.to_string()))?;

        let results = rows
            .into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                let title: String = row.get("title");
                SearchResult {
                    id,
                    kind: ResultKind::Document,
                    document_id: id,
                    document_title: title.clone(),
                    snippet: snippet_or_leading(&title, query),
                    title,
                    locator: None,
                    relevance: row.get::<Option<f32>, _>("score").unwrap_or(0.0),
                    created_at_utc: row.get("created_at_utc"),
                }
            })
            .collect();

        Ok(results)
    }

    /// Full-text search over note content, ranked by relevance.
    pub async fn notes(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let rows = sqlx::query(
            "SELECT n.id, n.document_id, n.title, n.content, n.page, n.created_at_utc, \
                    COALESCE(d.title, '') AS document_title, \
                    ts_rank(to_tsvector('english', n.content), \
                            websearch_to_tsquery('english', $1)) AS score \
             FROM note n \
             LEFT JOIN document d ON d.id = n.document_id \
             WHERE to_tsvector('english', n.content) @@ websearch_to_tsquery('english', $1) \
             ORDER BY score DESC \
             LIMIT $2",
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Search(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| map_note_row(row, query))
            .collect())
    }

    /// Case-insensitive substring scan over all highlights, newest first.
    pub async fn highlights(&self, query: &str, limit: i64) -> Result<Vec<SearchResult>> {
        let rows = sqlx::query(
            "SELECT h.id, h.document_id, h.text, h.page, h.created_at_utc, \
                    COALESCE(d.title, '') AS document_title \
             FROM highlight h \
             LEFT JOIN document d ON d.id = h.document_id \
             ORDER BY h.created_at_utc DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Search(e.to_string()))?;

        let scanned = rows.len();
        let needle = query.to_lowercase();
        let results: Vec<SearchResult> = rows
            .into_iter()
            .filter(|row| {
                row.get::<String, _>("text")
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(limit.max(0) as usize)
            .map(|row| {
                let text: String = row.get("text");
                let document_title: String = row.get("document_title");
                SearchResult {
                    id: row.get("id"),
                    kind: ResultKind::Highlight,
                    document_id: row.get("document_id"),
                    title: document_title.clone(),
                    document_title,
                    snippet: snippet_or_leading(&text, query),
                    locator: row.get("page"),
                    relevance: 0.0,
                    created_at_utc: row.get("created_at_utc"),
                }
            })
            .collect();

        trace!(
            subsystem = "db",
            component = "search",
            op = "highlights",
            scanned,
            result_count = results.len(),
            "Highlight scan finished"
        );

        Ok(results)
    }
}

fn map_note_row(row: PgRow, query: &str) -> SearchResult {
    let content: String = row.get("content");
    let stored_title: Option<String> = row.get("title");
    let title = stored_title.unwrap_or_else(|| title_from_content(&content));

    SearchResult {
        id: row.get("id"),
        kind: ResultKind::Note,
        document_id: row.get("document_id"),
        document_title: row.get("document_title"),
        title,
        snippet: snippet_or_leading(&content, query),
        locator: row.get("page"),
        relevance: row.get::<Option<f32>, _>("score").unwrap_or(0.0),
        created_at_utc: row.get("created_at_utc"),
    }
}
