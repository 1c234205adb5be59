//! Citation repository implementation.
//!
//! Citation numbers come from a single-row counter table bumped with one
//! atomic `UPDATE ... RETURNING`, so concurrent creates can never observe
//! the same next number. The counter is strictly increasing and deletes do
//! not roll it back: a number printed into rendered text stays bound to
//! the citation it was assigned to, even after that citation is gone.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use folio_core::{
    defaults, extract_references, format_bibliography_entry, Citation, CitationMetadata,
    CitationRepository, CreateCitationRequest, Error, Result,
};

/// PostgreSQL implementation of CitationRepository.
#[derive(Clone)]
pub struct PgCitationRepository {
    pool: Pool<Postgres>,
}

/// Reject metadata the formatter cannot meaningfully render.
fn validate_metadata(metadata: &CitationMetadata) -> Result<()> {
    if metadata.title.trim().is_empty() {
        return Err(Error::InvalidInput(
            "citation title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

fn map_citation(row: PgRow) -> Result<Citation> {
    let metadata: serde_json::Value = row.get("metadata");
    let metadata: CitationMetadata = serde_json::from_value(metadata)?;
    Ok(Citation {
        id: row.get("id"),
        document_id: row.get("document_id"),
        citation_number: row.get("citation_number"),
        formatted_citation: row.get("formatted_citation"),
        metadata,
        usage_count: row.get("usage_count"),
        created_at_utc: row.get("created_at_utc"),
        updated_at_utc: row.get("updated_at_utc"),
    })
}

impl PgCitationRepository {
    /// Create a new PgCitationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Allocate the next citation number from the counter row.
    async fn next_number(&self) -> Result<i32> {
        let value: i32 = sqlx::query_scalar(
            "UPDATE citation_counter SET value = value + 1 WHERE id = 1 RETURNING value",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(value)
    }

    async fn document_exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM document WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(exists)
    }

    /// Parse `text` for in-text markers and bump usage for every distinct
    /// label that still resolves to a citation. Dangling labels are
    /// skipped. Returns how many citations were bumped.
    pub async fn record_usage_in_text(&self, text: &str) -> Result<u64> {
        let mut numbers: Vec<i32> = extract_references(text).map(|r| r.number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        if numbers.is_empty() {
            return Ok(0);
        }

        let updated = sqlx::query(
            "UPDATE citation \
             SET usage_count = usage_count + 1, updated_at_utc = now() \
             WHERE citation_number = ANY($1)",
        )
        .bind(&numbers)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?
        .rows_affected();

        debug!(
            subsystem = "db",
            component = "citations",
            op = "record_usage_in_text",
            marker_count = numbers.len(),
            result_count = updated,
            "Recorded in-text citation usage"
        );

        Ok(updated)
    }
}

#[async_trait]
impl CitationRepository for PgCitationRepository {
    async fn create(&self, req: CreateCitationRequest) -> Result<Citation> {
        validate_metadata(&req.metadata)?;
        if req.document_id.is_nil() {
            return Err(Error::InvalidInput(
                "document reference must not be nil".to_string(),
            ));
        }
        if !self.document_exists(req.document_id).await? {
            return Err(Error::DocumentNotFound(req.document_id));
        }

        let formatted = format_bibliography_entry(&req.metadata);
        let metadata = serde_json::to_value(&req.metadata)?;

        // The counter makes collisions impossible among callers that go
        // through this repository; the retry loop covers numbers written
        // out-of-band (imports, manual fixes) that got ahead of it.
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let number = self.next_number().await?;

            let inserted = sqlx::query(
                "INSERT INTO citation \
                     (id, document_id, citation_number, formatted_citation, metadata) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING *",
            )
            .bind(Uuid::now_v7())
            .bind(req.document_id)
            .bind(number)
            .bind(&formatted)
            .bind(&metadata)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Ok(row) => {
                    info!(
                        subsystem = "db",
                        component = "citations",
                        op = "create",
                        document_id = %req.document_id,
                        citation_number = number,
                        "Citation created"
                    );
                    return map_citation(row);
                }
                Err(err) if is_unique_violation(&err) => {
                    if attempt >= defaults::CREATE_MAX_ATTEMPTS {
                        return Err(Error::NumberConflict(number));
                    }
                    let jitter =
                        rand::thread_rng().gen_range(0..defaults::CREATE_RETRY_JITTER_MS);
                    warn!(
                        subsystem = "db",
                        component = "citations",
                        op = "create",
                        citation_number = number,
                        attempt,
                        "Citation number already taken, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(
                        defaults::CREATE_RETRY_BASE_MS + jitter,
                    ))
                    .await;
                }
                Err(err) => return Err(Error::Database(err)),
            }
        }
    }

    async fn fetch(&self, id: Uuid) -> Result<Citation> {
        let row = sqlx::query("SELECT * FROM citation WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => map_citation(row),
            None => Err(Error::CitationNotFound(id)),
        }
    }

    async fn get_by_document(&self, document_id: Uuid) -> Result<Option<Citation>> {
        let row = sqlx::query(
            "SELECT * FROM citation WHERE document_id = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_citation).transpose()
    }

    async fn get_by_number(&self, number: i32) -> Result<Option<Citation>> {
        let row = sqlx::query("SELECT * FROM citation WHERE citation_number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(map_citation).transpose()
    }

    async fn update_metadata(&self, id: Uuid, metadata: CitationMetadata) -> Result<Citation> {
        validate_metadata(&metadata)?;
        let formatted = format_bibliography_entry(&metadata);
        let metadata = serde_json::to_value(&metadata)?;

        let row = sqlx::query(
            "UPDATE citation \
             SET metadata = $2, formatted_citation = $3, updated_at_utc = now() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&metadata)
        .bind(&formatted)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => map_citation(row),
            None => Err(Error::CitationNotFound(id)),
        }
    }

    async fn increment_usage(&self, id: Uuid) -> Result<()> {
        // Single-statement increment: concurrent calls all land, and a
        // citation deleted in between makes this affect zero rows.
        let affected = sqlx::query(
            "UPDATE citation \
             SET usage_count = usage_count + 1, updated_at_utc = now() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?
        .rows_affected();

        if affected == 0 {
            debug!(
                subsystem = "db",
                component = "citations",
                op = "increment_usage",
                citation_id = %id,
                "Usage increment on missing citation ignored"
            );
        }
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM citation WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "citations",
            op = "remove",
            citation_id = %id,
            "Citation removed"
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Citation>> {
        let rows = sqlx::query("SELECT * FROM citation ORDER BY citation_number ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.into_iter().map(map_citation).collect()
    }
}
