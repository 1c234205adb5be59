//! Integration tests for the combined search aggregator: fan-out across
//! all three collections, empty-query short circuit, per-kind limits, and
//! failure isolation.

use folio_core::{LibrarySearch, SearchRequest};
use folio_db::test_fixtures::TestDatabase;
use folio_search::LibrarySearchEngine;

#[tokio::test]
async fn test_combined_search_spans_all_kinds() {
    let test_db = TestDatabase::new().await;
    let doc_id = test_db.seed_document("Quantum Mechanics Primer").await;
    test_db
        .seed_note(doc_id, "Notes on quantum superposition and measurement.")
        .await;
    test_db
        .seed_highlight(doc_id, "the quantum state collapses upon observation")
        .await;

    let engine = LibrarySearchEngine::new(test_db.db.clone());
    let response = engine.search(SearchRequest::new("quantum")).await.unwrap();

    assert_eq!(response.documents.hits.len(), 1);
    assert_eq!(response.notes.hits.len(), 1);
    assert_eq!(response.highlights.hits.len(), 1);
    assert!(!response.documents.failed);
    assert!(!response.notes.failed);
    assert!(!response.highlights.failed);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_empty_query_returns_empty_response_without_store_access() {
    let test_db = TestDatabase::new().await;

    // With every collection gone, any store access would error; an empty
    // query must still come back clean.
    for table in ["document", "note", "highlight"] {
        sqlx::query(&format!("DROP TABLE {}", table))
            .execute(&test_db.pool)
            .await
            .unwrap();
    }

    let engine = LibrarySearchEngine::new(test_db.db.clone());
    let response = engine.search(SearchRequest::new("   ")).await.unwrap();

    assert!(response.documents.hits.is_empty());
    assert!(response.notes.hits.is_empty());
    assert!(response.highlights.hits.is_empty());
    assert!(!response.documents.failed);
    assert!(!response.notes.failed);
    assert!(!response.highlights.failed);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_document_limit_is_applied() {
    let test_db = TestDatabase::new().await;
    for i in 0..7 {
        test_db
            .seed_document(&format!("Linear Algebra Volume {}", i))
            .await;
    }

    let engine = LibrarySearchEngine::new(test_db.db.clone());
    let response = engine.search(SearchRequest::new("algebra")).await.unwrap();

    // Combined view caps documents at 5.
    assert_eq!(response.documents.hits.len(), 5);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_failed_kind_is_isolated() {
    let test_db = TestDatabase::new().await;
    let doc_id = test_db.seed_document("Resilient Search").await;
    test_db
        .seed_highlight(doc_id, "resilient systems degrade gracefully")
        .await;

    // Break the note collection only.
    sqlx::query("DROP TABLE note")
        .execute(&test_db.pool)
        .await
        .unwrap();

    let engine = LibrarySearchEngine::new(test_db.db.clone());
    let response = engine
        .search(SearchRequest::new("resilient"))
        .await
        .unwrap();

    assert!(response.notes.failed);
    assert!(response.notes.hits.is_empty());
    assert!(!response.documents.failed);
    assert_eq!(response.documents.hits.len(), 1);
    assert!(!response.highlights.failed);
    assert_eq!(response.highlights.hits.len(), 1);

    test_db.cleanup().await;
}

#[tokio::test]
async fn test_single_kind_searches_use_given_limit() {
    let test_db = TestDatabase::new().await;
    let doc_id = test_db.seed_document("Essays on Entropy").await;
    for i in 0..3 {
        test_db
            .seed_note(doc_id, &format!("entropy observation number {}", i))
            .await;
    }

    let engine = LibrarySearchEngine::new(test_db.db.clone());

    let notes = engine.search_notes("entropy", 2).await.unwrap();
    assert_eq!(notes.len(), 2);

    let docs = engine.documents("entropy").await.unwrap();
    assert_eq!(docs.len(), 1);

    let none = engine.search_notes("  ", 10).await.unwrap();
    assert!(none.is_empty());

    test_db.cleanup().await;
}
