//! Case-insensitive substring matching shared by search and highlighting.
//!
//! Matching folds case one character at a time, so every match maps back to a
//! byte range of the original text with its casing untouched.

/// Returns true if the text contains Arabic-script characters.
pub fn has_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

fn chars_eq_folded(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// A query prepared once for repeated case-insensitive scans.
#[derive(Debug, Clone)]
pub struct FoldedQuery {
    chars: Vec<char>,
}

impl FoldedQuery {
    pub fn new(query: &str) -> Self {
        Self {
            chars: query.chars().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Length of the query in characters.
    pub fn char_len(&self) -> usize {
        self.chars.len()
    }

    /// Byte range of the first occurrence at or after byte offset `from`.
    pub fn find_in(&self, haystack: &str, from: usize) -> Option<(usize, usize)> {
        if self.chars.is_empty() || from > haystack.len() {
            return None;
        }

        let tail = haystack.get(from..)?;
        for (start, _) in tail.char_indices() {
            if let Some(len) = self.match_len_at(&tail[start..]) {
                return Some((from + start, from + start + len));
            }
        }
        None
    }

    pub fn is_in(&self, haystack: &str) -> bool {
        self.find_in(haystack, 0).is_some()
    }

    // Byte length of the match when `text` starts with the query.
    fn match_len_at(&self, text: &str) -> Option<usize> {
        let mut rest = text.chars();
        let mut len = 0;
        for &qc in &self.chars {
            match rest.next() {
                Some(tc) if chars_eq_folded(tc, qc) => len += tc.len_utf8(),
                _ => return None,
            }
        }
        Some(len)
    }
}

/// Case-insensitive containment check.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    FoldedQuery::new(needle).is_in(haystack)
}
