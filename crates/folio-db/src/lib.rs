//! # folio-db
//!
//! PostgreSQL database layer for folio.
//!
//! This crate provides:
//! - Connection pool management
//! - The citation repository (number assignment, CRUD, usage counts)
//! - Bibliography assembly
//! - Per-collection search primitives (document/note full-text search,
//!   highlight scan)
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_core::{CitationMetadata, CitationRepository, CreateCitationRequest};
//! use folio_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/folio").await?;
//!     db.migrate().await?;
//!
//!     let citation = db.citations.create(CreateCitationRequest {
//!         document_id: some_document_id,
//!         metadata: CitationMetadata::titled("On Computable Numbers"),
//!     }).await?;
//!
//!     println!("Assigned number {}", citation.citation_number);
//!     Ok(())
//! }
//! ```

pub mod bibliography;
pub mod citations;
pub mod pool;
pub mod search;

#[cfg(test)]
mod tests;

// Test fixtures for integration tests.
// Note: Always compiled so integration tests (in tests/) can use TestDatabase
pub mod test_fixtures;

// Re-export core types
pub use folio_core::*;

pub use bibliography::PgBibliography;
pub use citations::PgCitationRepository;
pub use pool::{create_pool, create_pool_with_config, database_url, PoolConfig};
pub use search::PgLibraryIndex;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Citation repository: numbering, CRUD, usage counts.
    pub citations: PgCitationRepository,
    /// Bibliography assembly.
    pub bibliography: PgBibliography,
    /// Per-collection search primitives.
    pub index: PgLibraryIndex,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            citations: PgCitationRepository::new(pool.clone()),
            bibliography: PgBibliography::new(pool.clone()),
            index: PgLibraryIndex::new(pool.clone()),
            pool,
        }
    }

    /// Connect to the database and build the repository set.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Ok(())
    }
}
