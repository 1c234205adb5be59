//! Search snippet extraction and match highlighting.

use regex::Regex;

/// Step an index down to the nearest char boundary of `s`.
fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx > s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Step an index up to the nearest char boundary of `s`.
fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx > s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Extract an excerpt around the first case-insensitive match of `query`.
///
/// The excerpt spans `context_chars` characters before the match start and
/// after the match end, with a literal `"..."` on each side that was
/// truncated. Returns `None` when the text contains no match; callers fall
/// back to a leading substring of the text.
pub fn build_snippet(text: &str, query: &str, context_chars: usize) -> Option<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let haystack = text.to_lowercase();
    let pos = haystack.find(&needle)?;

    // Lowercasing can shift byte offsets for a handful of non-ASCII chars;
    // clamp everything to char boundaries of the original text.
    let match_start = floor_char_boundary(text, pos);
    let match_end = ceil_char_boundary(text, match_start + needle.len());

    let start = floor_char_boundary(text, match_start.saturating_sub(context_chars));
    let end = ceil_char_boundary(text, match_end.saturating_add(context_chars));

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&text[start..end]);
    if end < text.len() {
        snippet.push_str("...");
    }

    Some(snippet)
}

/// Wrap every case-insensitive occurrence of `query` in `<mark>` tags.
///
/// The query is regex-escaped before matching, so it is always treated as
/// literal text. An empty or whitespace-only query returns the input
/// unchanged. The original casing of each occurrence is preserved.
pub fn mark_matches(text: &str, query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }

    match Regex::new(&format!("(?i){}", regex::escape(trimmed))) {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures| {
                format!("<mark>{}</mark>", &caps[0])
            })
            .into_owned(),
        Err(_) => text.to_string(),
    }
}
