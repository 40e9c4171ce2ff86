//! Splitting text into matched and unmatched segments for display

use serde::Serialize;

use crate::text::FoldedQuery;

/// Queries shorter than this (in characters) are not highlighted.
pub const MIN_HIGHLIGHT_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment<'a> {
    pub text: &'a str,
    pub is_match: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, is_match: false }
    }

    fn matched(text: &'a str) -> Self {
        Self { text, is_match: true }
    }
}

/// Split `text` around case-insensitive occurrences of `query`.
///
/// Scans left to right without overlap; matched segments keep the casing of
/// `text`. A short query or one that never occurs yields the whole text as a
/// single unmatched segment.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    let folded = FoldedQuery::new(query);
    if folded.char_len() < MIN_HIGHLIGHT_CHARS {
        return vec![Segment::plain(text)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0;
    while let Some((start, end)) = folded.find_in(text, cursor) {
        if start > cursor {
            segments.push(Segment::plain(&text[cursor..start]));
        }
        segments.push(Segment::matched(&text[start..end]));
        cursor = end;
    }

    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[cursor..]));
    }
    segments
}

/// Highlight as markup, wrapping each match in `<mark>`.
pub fn highlight_markup(text: &str, query: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in highlight(text, query) {
        if segment.is_match {
            out.push_str("<mark>");
            out.push_str(segment.text);
            out.push_str("</mark>");
        } else {
            out.push_str(segment.text);
        }
    }
    out
}
