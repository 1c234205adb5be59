//! Bibliography assembly.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use folio_core::{BibliographyEntry, BibliographyProvider, Error, Result};

/// PostgreSQL implementation of BibliographyProvider.
#[derive(Clone)]
pub struct PgBibliography {
    pool: Pool<Postgres>,
}

impl PgBibliography {
    /// Create a new PgBibliography with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BibliographyProvider for PgBibliography {
    async fn assemble(&self) -> Result<Vec<BibliographyEntry>> {
        // LEFT JOIN: a citation whose document was deleted still gets an
        // entry, with an empty title.
        let rows = sqlx::query(
            "SELECT c.citation_number, c.formatted_citation, c.document_id, \
                    COALESCE(d.title, '') AS document_title, c.usage_count \
             FROM citation c \
             LEFT JOIN document d ON d.id = c.document_id \
             ORDER BY c.citation_number ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let entries: Vec<BibliographyEntry> = rows
            .into_iter()
            .map(|row| BibliographyEntry {
                number: row.get("citation_number"),
                text: row.get("formatted_citation"),
                document_id: row.get("document_id"),
                document_title: row.get("document_title"),
                usage_count: row.get("usage_count"),
            })
            .collect();

        debug!(
            subsystem = "db",
            component = "bibliography",
            op = "assemble",
            result_count = entries.len(),
            "Bibliography assembled"
        );

        Ok(entries)
    }
}
