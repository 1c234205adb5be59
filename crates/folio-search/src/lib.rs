//! # folio-search
//!
//! Cross-collection search aggregation for folio.
//!
//! Combines the per-collection primitives from `folio-db` (document and
//! note full-text search, highlight scan) into a single fan-out/fan-in
//! search with per-kind failure isolation and bounded, ranked results.

pub mod aggregator;

pub use aggregator::LibrarySearchEngine;
