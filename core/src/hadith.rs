//! Sahih al-Bukhari collection: book data types and text search

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::BookKey;
use crate::text::FoldedQuery;

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_HADITH_QUERY_CHARS: usize = 2;

/// Hadith text shown in a result preview is cut at this many characters.
pub const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hadith {
    pub number: u32,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub hadiths: Vec<Hadith>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookJson {
    pub id: u32,
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub total_chapters: u32,
    #[serde(default)]
    pub total_hadiths: u32,
    #[serde(default)]
    pub unique_hadith_numbers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub id: u32,
    pub number: u32,
    #[serde(default)]
    pub sub_number: Option<u32>,
    #[serde(default)]
    pub is_sub_book: bool,
    pub title: String,
    #[serde(default)]
    pub total_chapters: u32,
    #[serde(default)]
    pub total_hadiths: u32,
}

impl BookMetadata {
    /// File name of this book's chapters under the collection directory.
    pub fn file_name(&self) -> String {
        BookKey::from(self).file_name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub total_books: u32,
    #[serde(default)]
    pub total_sub_books: u32,
    #[serde(default)]
    pub total_chapters: u32,
    #[serde(default)]
    pub total_hadith_occurrences: u32,
    #[serde(default)]
    pub unique_hadith_numbers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Introduction {
    pub id: String,
    pub title: String,
}

/// Contents of `bukhari/metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BukhariMetadata {
    #[serde(default)]
    pub metadata: CollectionInfo,
    #[serde(default)]
    pub books: Vec<BookMetadata>,
    #[serde(default)]
    pub introductions: Vec<Introduction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HadithSearchOptions {
    /// Only the first this many books are opened for chapter and hadith matches.
    pub max_books_scanned: usize,
    pub max_hadith_hits: usize,
    pub max_results: usize,
}

impl Default for HadithSearchOptions {
    fn default() -> Self {
        Self {
            max_books_scanned: 15,
            max_hadith_hits: 30,
            max_results: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum HadithHit {
    Book {
        book: BookMetadata,
    },
    Chapter {
        book: BookMetadata,
        chapter_number: u32,
        chapter_title: String,
    },
    Hadith {
        book: BookMetadata,
        chapter_number: u32,
        chapter_title: String,
        hadith: Hadith,
    },
}

impl HadithHit {
    // Books sort before chapters, chapters before hadiths.
    fn rank(&self) -> u8 {
        match self {
            HadithHit::Book { .. } => 0,
            HadithHit::Chapter { .. } => 1,
            HadithHit::Hadith { .. } => 2,
        }
    }

    /// Shortened hadith text for result lists; `None` for book and chapter hits.
    pub fn preview(&self) -> Option<String> {
        match self {
            HadithHit::Hadith { hadith, .. } => Some(preview(&hadith.full_text, PREVIEW_CHARS)),
            HadithHit::Book { .. } | HadithHit::Chapter { .. } => None,
        }
    }

    pub fn book(&self) -> &BookMetadata {
        match self {
            HadithHit::Book { book } | HadithHit::Chapter { book, .. } | HadithHit::Hadith { book, .. } => book,
        }
    }
}

/// Search book titles, chapter titles and hadith texts.
///
/// Book titles are checked across the whole collection. Chapters and hadiths
/// are only read from the first `max_books_scanned` books, loaded on demand
/// through `load_book`. A book that fails to load is skipped with a warning.
/// Results are ordered books, chapters, hadiths, each group in collection
/// order, and capped at `max_results`.
pub fn search_hadith<F>(
    metadata: &BukhariMetadata,
    mut load_book: F,
    query: &str,
    options: &HadithSearchOptions,
) -> Vec<HadithHit>
where
    F: FnMut(&BookMetadata) -> Result<Arc<BookJson>>,
{
    let query = query.trim();
    if query.chars().count() < MIN_HADITH_QUERY_CHARS {
        return Vec::new();
    }
    let folded = FoldedQuery::new(query);

    let mut hits: Vec<HadithHit> = metadata
        .books
        .iter()
        .filter(|book| folded.is_in(&book.title))
        .map(|book| HadithHit::Book { book: book.clone() })
        .collect();
    let mut hadith_count = 0;

    for book in metadata.books.iter().take(options.max_books_scanned) {
        if hits.len() >= options.max_results {
            break;
        }

        let data = match load_book(book) {
            Ok(data) => data,
            Err(e) => {
                warn!(book = book.number, error = %e, "Skipping book in hadith search");
                continue;
            }
        };

        for chapter in &data.chapters {
            if folded.is_in(&chapter.title) {
                hits.push(HadithHit::Chapter {
                    book: book.clone(),
                    chapter_number: chapter.number,
                    chapter_title: chapter.title.clone(),
                });
            }

            if hadith_count >= options.max_hadith_hits {
                continue;
            }
            for hadith in &chapter.hadiths {
                if !folded.is_in(&hadith.full_text) {
                    continue;
                }
                hits.push(HadithHit::Hadith {
                    book: book.clone(),
                    chapter_number: chapter.number,
                    chapter_title: chapter.title.clone(),
                    hadith: hadith.clone(),
                });
                hadith_count += 1;
                if hadith_count >= options.max_hadith_hits {
                    break;
                }
            }
        }
    }

    hits.sort_by_key(HadithHit::rank);
    hits.truncate(options.max_results);

    debug!(query = %query, hits = hits.len(), hadiths = hadith_count, "hadith search");
    hits
}

/// First `max_chars` characters of a hadith, with an ellipsis when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
