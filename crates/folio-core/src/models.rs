//! Core data models for folio.
//!
//! These types are shared across all folio crates and represent the core
//! domain entities: citations, bibliography entries, and search results.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CITATION TYPES
// =============================================================================

/// Bibliographic metadata for a citation.
///
/// Only `title` is required; everything else is optional and rendered with
/// placeholder text (`"Unknown Author"`, `"Unknown Publisher"`, `"n.d."`)
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationMetadata {
    pub title: String,
    /// Ordered author list. May be empty.
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Edition label without the " ed." suffix, e.g. "2nd".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

impl CitationMetadata {
    /// Minimal metadata with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            publisher: None,
            year: None,
            edition: None,
            isbn: None,
            doi: None,
            url: None,
            access_date: None,
            pages: None,
            volume: None,
            issue: None,
        }
    }
}

/// A stored citation record.
///
/// `citation_number` is unique across all live citations and strictly
/// increasing in creation order; numbers are never reassigned or reused,
/// even after the highest-numbered citation is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub id: Uuid,
    /// Owning document. The document may be deleted independently; callers
    /// joining against it must tolerate absence.
    pub document_id: Uuid,
    pub citation_number: i32,
    /// Cached rendering of `metadata`, recomputed on metadata updates.
    pub formatted_citation: String,
    pub metadata: CitationMetadata,
    pub usage_count: i32,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// BIBLIOGRAPHY TYPES
// =============================================================================

/// One rendered bibliography line, joined with document title and usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub number: i32,
    /// The formatted bibliographic string.
    pub text: String,
    pub document_id: Uuid,
    /// Empty string when the document no longer exists.
    pub document_title: String,
    pub usage_count: i32,
}

// =============================================================================
// SEARCH TYPES
// =============================================================================

/// Which collection a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Document,
    Note,
    Highlight,
}

/// A single search hit from any collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub kind: ResultKind,
    pub document_id: Uuid,
    /// Empty string when the document no longer exists.
    pub document_title: String,
    pub title: String,
    pub snippet: String,
    /// Page the hit is anchored to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<i32>,
    /// Store-native relevance score. Highlights carry 0.0 (unranked scan).
    pub relevance: f32,
    pub created_at_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_titled_has_no_optionals() {
        let meta = CitationMetadata::titled("Structure and Interpretation");
        assert_eq!(meta.title, "Structure and Interpretation");
        assert!(meta.authors.is_empty());
        assert!(meta.publisher.is_none());
        assert!(meta.year.is_none());
        assert!(meta.edition.is_none());
    }

    #[test]
    fn test_metadata_serde_round_trip() {
        let meta = CitationMetadata {
            publisher: Some("MIT Press".to_string()),
            year: Some(1996),
            edition: Some("2nd".to_string()),
            authors: vec!["Abelson".to_string(), "Sussman".to_string()],
            ..CitationMetadata::titled("SICP")
        };

        let json = serde_json::to_string(&meta).unwrap();
        let parsed: CitationMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn test_metadata_omits_absent_fields() {
        let meta = CitationMetadata::titled("Untitled");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("publisher"));
        assert!(!json.contains("doi"));
    }

    #[test]
    fn test_result_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResultKind::Highlight).unwrap(),
            "\"highlight\""
        );
        let kind: ResultKind = serde_json::from_str("\"note\"").unwrap();
        assert_eq!(kind, ResultKind::Note);
    }
}
