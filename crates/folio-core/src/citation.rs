//! Citation rendering and in-text marker parsing.
//!
//! Everything in this module is pure: rendering a [`CitationMetadata`] into
//! a bibliographic string, rendering a `(number, locator)` pair into an
//! in-text marker like `[5, p. 12]`, and scanning free-form text for such
//! markers. Formatting and parsing are inverses; see
//! [`extract_references`] for the round-trip contract.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::CitationMetadata;

/// Author list rendered verbatim up to this many names; beyond it the list
/// is cut and suffixed with ", et al.".
const MAX_LISTED_AUTHORS: usize = 3;

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";
const NO_DATE: &str = "n.d.";

/// Where inside a document an in-text reference points.
///
/// One tagged variant per locator kind, so a reference can never carry
/// more than one locator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Locator {
    Page(i32),
    Chapter(i32),
    Paragraph(i32),
    General,
}

/// An in-text reference parsed from (or rendered into) prose.
///
/// `number` is the numeric label as printed. It is not guaranteed to
/// resolve to a live citation: the citation may have been deleted after
/// the text was rendered. Dangling references are valid data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationReference {
    pub number: i32,
    pub locator: Locator,
}

impl CitationReference {
    pub fn new(number: i32, locator: Locator) -> Self {
        Self { number, locator }
    }

    /// Render this reference back into its in-text marker.
    pub fn marker(&self) -> String {
        format_in_text_marker(self.number, &self.locator)
    }
}

/// Render citation metadata as a bibliography line.
///
/// Shape: `"<authors>, <title><edition-suffix>. <publisher>, <year>."`.
/// Zero authors render as "Unknown Author"; up to three are listed
/// verbatim; four or more are cut to the first three plus ", et al.".
pub fn format_bibliography_entry(meta: &CitationMetadata) -> String {
    let authors = if meta.authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else if meta.authors.len() <= MAX_LISTED_AUTHORS {
        meta.authors.join(", ")
    } else {
        format!("{}, et al.", meta.authors[..MAX_LISTED_AUTHORS].join(", "))
    };

    let edition = meta
        .edition
        .as_deref()
        .map(|e| format!(", {} ed.", e))
        .unwrap_or_default();

    let publisher = meta.publisher.as_deref().unwrap_or(UNKNOWN_PUBLISHER);

    let year = meta
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| NO_DATE.to_string());

    format!(
        "{}, {}{}. {}, {}.",
        authors, meta.title, edition, publisher, year
    )
}

/// Render an in-text marker for a citation number and locator.
pub fn format_in_text_marker(number: i32, locator: &Locator) -> String {
    match locator {
        Locator::Page(p) => format!("[{}, p. {}]", number, p),
        Locator::Chapter(c) => format!("[{}, Ch. {}]", number, c),
        Locator::Paragraph(p) => format!("[{}, para. {}]", number, p),
        Locator::General => format!("[{}]", number),
    }
}

/// Marker grammar: `[n]`, `[n, p. x]`, `[n, Ch. x]`, `[n, para. x]`.
/// Locator tokens are case-sensitive; whitespace after the comma and
/// after the token is optional.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\d+)(?:,\s*(p\.|Ch\.|para\.)\s*(\d+))?\]").expect("marker regex")
});

/// Scan text for in-text citation markers, in order of appearance.
///
/// The returned iterator is lazy and borrows `text`; calling this again on
/// the same text restarts the scan from the beginning. Anything the marker
/// grammar does not recognize (non-numeric labels, unknown locator
/// tokens, numbers too large for `i32`) is skipped, never an error.
///
/// Round-trip contract: for any `number` and `locator`,
/// `extract_references(&format_in_text_marker(number, &locator))` yields
/// exactly one reference equal to the input.
pub fn extract_references(text: &str) -> impl Iterator<Item = CitationReference> + '_ {
    MARKER_RE.captures_iter(text).filter_map(|caps| {
        let number: i32 = caps[1].parse().ok()?;
        let locator = match caps.get(2).map(|m| m.as_str()) {
            None => Locator::General,
            Some(token) => {
                let value: i32 = caps[3].parse().ok()?;
                match token {
                    "p." => Locator::Page(value),
                    "Ch." => Locator::Chapter(value),
                    "para." => Locator::Paragraph(value),
                    _ => return None,
                }
            }
        };
        Some(CitationReference { number, locator })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_authors(authors: &[&str]) -> CitationMetadata {
        CitationMetadata {
            authors: authors.iter().map(|a| a.to_string()).collect(),
            publisher: Some("Norton".to_string()),
            year: Some(2003),
            ..CitationMetadata::titled("A History of Everything")
        }
    }

    // =========================================================================
    // Bibliography formatting
    // =========================================================================

    #[test]
    fn test_format_no_authors() {
        let meta = meta_with_authors(&[]);
        assert_eq!(
            format_bibliography_entry(&meta),
            "Unknown Author, A History of Everything. Norton, 2003."
        );
    }

    #[test]
    fn test_format_single_author() {
        let meta = meta_with_authors(&["A"]);
        assert!(format_bibliography_entry(&meta).starts_with("A, A History"));
    }

    #[test]
    fn test_format_three_authors_listed_verbatim() {
        let meta = meta_with_authors(&["A", "B", "C"]);
        assert_eq!(
            format_bibliography_entry(&meta),
            "A, B, C, A History of Everything. Norton, 2003."
        );
    }

    #[test]
    fn test_format_four_authors_cut_to_et_al() {
        let meta = meta_with_authors(&["A", "B", "C", "D"]);
        assert_eq!(
            format_bibliography_entry(&meta),
            "A, B, C, et al., A History of Everything. Norton, 2003."
        );
    }

    #[test]
    fn test_format_missing_publisher_and_year() {
        let meta = CitationMetadata::titled("Anonymous Pamphlet");
        assert_eq!(
            format_bibliography_entry(&meta),
            "Unknown Author, Anonymous Pamphlet. Unknown Publisher, n.d."
        );
    }

    #[test]
    fn test_format_edition_follows_title() {
        let meta = CitationMetadata {
            edition: Some("3rd".to_string()),
            ..meta_with_authors(&["A"])
        };
        assert_eq!(
            format_bibliography_entry(&meta),
            "A, A History of Everything, 3rd ed.. Norton, 2003."
        );
    }

    // =========================================================================
    // Marker formatting
    // =========================================================================

    #[test]
    fn test_marker_general() {
        assert_eq!(format_in_text_marker(5, &Locator::General), "[5]");
    }

    #[test]
    fn test_marker_page() {
        assert_eq!(format_in_text_marker(5, &Locator::Page(12)), "[5, p. 12]");
    }

    #[test]
    fn test_marker_chapter() {
        assert_eq!(format_in_text_marker(9, &Locator::Chapter(3)), "[9, Ch. 3]");
    }

    #[test]
    fn test_marker_paragraph() {
        assert_eq!(
            format_in_text_marker(2, &Locator::Paragraph(44)),
            "[2, para. 44]"
        );
    }

    // =========================================================================
    // Marker parsing
    // =========================================================================

    #[test]
    fn test_extract_in_order() {
        let refs: Vec<_> = extract_references("See [3] and [4, p. 10].").collect();
        assert_eq!(
            refs,
            vec![
                CitationReference::new(3, Locator::General),
                CitationReference::new(4, Locator::Page(10)),
            ]
        );
    }

    #[test]
    fn test_extract_all_locator_kinds() {
        let text = "[1] then [2, p. 5] then [3, Ch. 7] then [4, para. 9]";
        let refs: Vec<_> = extract_references(text).collect();
        assert_eq!(refs.len(), 4);
        assert_eq!(refs[1].locator, Locator::Page(5));
        assert_eq!(refs[2].locator, Locator::Chapter(7));
        assert_eq!(refs[3].locator, Locator::Paragraph(9));
    }

    #[test]
    fn test_extract_tight_whitespace() {
        let refs: Vec<_> = extract_references("[4,p.10]").collect();
        assert_eq!(refs, vec![CitationReference::new(4, Locator::Page(10))]);
    }

    #[test]
    fn test_extract_skips_malformed() {
        let text = "[abc] [5, page 3] [5, P. 3] [ 6 ] [7, fig. 2]";
        assert_eq!(extract_references(text).count(), 0);
    }

    #[test]
    fn test_extract_skips_overflowing_number() {
        let refs: Vec<_> = extract_references("[99999999999] and [8]").collect();
        assert_eq!(refs, vec![CitationReference::new(8, Locator::General)]);
    }

    #[test]
    fn test_extract_is_restartable() {
        let text = "[1] [2]";
        assert_eq!(extract_references(text).count(), 2);
        // A second scan over the same text starts over.
        assert_eq!(extract_references(text).count(), 2);
    }

    #[test]
    fn test_round_trip_every_locator_kind() {
        let cases = [
            Locator::General,
            Locator::Page(12),
            Locator::Chapter(4),
            Locator::Paragraph(101),
        ];
        for locator in cases {
            let marker = format_in_text_marker(17, &locator);
            let refs: Vec<_> = extract_references(&marker).collect();
            assert_eq!(
                refs,
                vec![CitationReference::new(17, locator)],
                "round trip failed for {:?}",
                locator
            );
        }
    }

    #[test]
    fn test_reference_marker_round_trip() {
        let reference = CitationReference::new(6, Locator::Chapter(2));
        let parsed: Vec<_> = extract_references(&reference.marker()).collect();
        assert_eq!(parsed, vec![reference]);
    }

    #[test]
    fn test_locator_serde_shape() {
        let json = serde_json::to_string(&Locator::Page(12)).unwrap();
        assert_eq!(json, r#"{"kind":"page","value":12}"#);
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Locator::Page(12));

        let json = serde_json::to_string(&Locator::General).unwrap();
        assert_eq!(json, r#"{"kind":"general"}"#);
    }
}
