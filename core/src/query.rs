//! Query classification and navigation
//!
//! A raw search-box string is classified into one intent: a verse, surah,
//! juz or page reference, or free text. Navigation intents resolve against
//! the content store into a link target; free text runs the text search.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use crate::records::Surah;
use crate::search::{search_all, SearchOptions, SearchResult};
use crate::store::ContentStore;
use crate::text::contains_folded;

static VERSE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^(\d+)[:.\s]+(\d+)$").expect("valid verse pattern"),
        Regex::new(r"^сураи\s+(\d+)\s+оят\s+(\d+)$").expect("valid verse pattern"),
        Regex::new(r"^(\d+)\s+оят\s+(\d+)$").expect("valid verse pattern"),
    ]
});

static JUZ_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ҷузи?|juz)\s+(\d+)$").expect("valid juz pattern"));

static PAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:саҳифаи?|page)\s+(\d+)$").expect("valid page pattern"));

static SURAH_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^сураи\s+").expect("valid surah prefix pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum QueryIntent {
    VerseReference { surah_number: u32, verse_number: u32 },
    SurahName { surah_number: u32, name: String },
    JuzReference { juz_number: u32 },
    PageReference { page_number: u32 },
    FreeText { query: String },
}

impl QueryIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryIntent::VerseReference { .. } => "verse-reference",
            QueryIntent::SurahName { .. } => "surah-name",
            QueryIntent::JuzReference { .. } => "juz-reference",
            QueryIntent::PageReference { .. } => "page-reference",
            QueryIntent::FreeText { .. } => "free-text",
        }
    }
}

/// Classify a raw query.
///
/// Numeric patterns are tried before surah names. Input that matches no
/// pattern, including numbers too large to parse, is free text carrying the
/// trimmed original string.
pub fn classify(raw: &str, surahs: &[Surah]) -> QueryIntent {
    let trimmed = raw.trim();
    let intent = classify_trimmed(trimmed, surahs);
    debug!(query = trimmed, intent = intent.kind(), "classified query");
    intent
}

fn classify_trimmed(trimmed: &str, surahs: &[Surah]) -> QueryIntent {
    if trimmed.is_empty() {
        return QueryIntent::FreeText { query: String::new() };
    }
    let lowered = trimmed.to_lowercase();

    for pattern in VERSE_PATTERNS.iter() {
        if let Some((surah_number, verse_number)) = capture_pair(pattern, &lowered) {
            return QueryIntent::VerseReference { surah_number, verse_number };
        }
    }
    if let Some(juz_number) = capture_number(&JUZ_PATTERN, &lowered) {
        return QueryIntent::JuzReference { juz_number };
    }
    if let Some(page_number) = capture_number(&PAGE_PATTERN, &lowered) {
        return QueryIntent::PageReference { page_number };
    }

    let name = SURAH_PREFIX.replace(&lowered, "");
    let name = name.trim();
    if !name.is_empty() {
        let matched = surahs
            .iter()
            .find(|s| contains_folded(&s.name_tajik, name) || contains_folded(&s.name_arabic, name));
        if let Some(surah) = matched {
            return QueryIntent::SurahName {
                surah_number: surah.number,
                name: surah.name_tajik.clone(),
            };
        }
    }

    QueryIntent::FreeText { query: trimmed.to_string() }
}

fn capture_pair(pattern: &Regex, text: &str) -> Option<(u32, u32)> {
    let caps = pattern.captures(text)?;
    let first = caps.get(1)?.as_str().parse().ok()?;
    let second = caps.get(2)?.as_str().parse().ok()?;
    Some((first, second))
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    Verse,
    Surah,
    Juz,
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub kind: NavigationKind,
    pub surah_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub juz_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub label: String,
    pub href: String,
}

fn verse_href(surah: u32, verse: u32) -> String {
    format!("/surah/{}?verse={}", surah, verse)
}

/// Turn a navigation intent into a link target.
///
/// Returns `None` for free text and for references to verses, surahs, juz
/// or pages that are not in the store.
pub fn resolve_navigation(intent: &QueryIntent, store: &ContentStore) -> Option<NavigationTarget> {
    match intent {
        QueryIntent::VerseReference { surah_number, verse_number } => {
            let verse = store.verse(*surah_number, *verse_number)?;
            let surah_name = store
                .surah(verse.surah_id)
                .map(|s| s.name_tajik.clone())
                .unwrap_or_else(|| format!("Сураи {}", verse.surah_id));
            Some(NavigationTarget {
                kind: NavigationKind::Verse,
                surah_number: verse.surah_id,
                verse_number: Some(verse.verse_number),
                juz_number: None,
                page_number: None,
                label: format!("{} - Оят {}", surah_name, verse.verse_number),
                href: verse_href(verse.surah_id, verse.verse_number),
            })
        }
        QueryIntent::SurahName { surah_number, .. } => {
            let surah = store.surah(*surah_number)?;
            Some(NavigationTarget {
                kind: NavigationKind::Surah,
                surah_number: surah.number,
                verse_number: None,
                juz_number: None,
                page_number: None,
                label: surah.name_tajik.clone(),
                href: format!("/surah/{}", surah.number),
            })
        }
        QueryIntent::JuzReference { juz_number } => {
            let verse = store.first_verse_of_juz(*juz_number)?;
            Some(NavigationTarget {
                kind: NavigationKind::Juz,
                surah_number: verse.surah_id,
                verse_number: Some(verse.verse_number),
                juz_number: Some(*juz_number),
                page_number: None,
                label: format!("Ҷуз {}", juz_number),
                href: verse_href(verse.surah_id, verse.verse_number),
            })
        }
        QueryIntent::PageReference { page_number } => {
            let verse = store.first_verse_of_page(*page_number)?;
            Some(NavigationTarget {
                kind: NavigationKind::Page,
                surah_number: verse.surah_id,
                verse_number: Some(verse.verse_number),
                juz_number: None,
                page_number: Some(*page_number),
                label: format!("Саҳифа {}", page_number),
                href: verse_href(verse.surah_id, verse.verse_number),
            })
        }
        QueryIntent::FreeText { .. } => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum QueryOutcome {
    Navigate { target: NavigationTarget },
    Results { results: Vec<SearchResult> },
}

impl QueryOutcome {
    fn empty() -> Self {
        QueryOutcome::Results { results: Vec::new() }
    }
}

/// Classify and act on a search-box query.
///
/// A navigation intent that resolves becomes a direct link; one that does
/// not resolve yields no results. Free text searches surahs then verses.
pub fn run_query(store: &ContentStore, raw: &str, options: &SearchOptions) -> QueryOutcome {
    let intent = classify(raw, store.surahs());
    match intent {
        QueryIntent::FreeText { query } if query.is_empty() => QueryOutcome::empty(),
        QueryIntent::FreeText { query } => QueryOutcome::Results {
            results: search_all(store.surahs(), store.verses(), &query, options),
        },
        nav => match resolve_navigation(&nav, store) {
            Some(target) => QueryOutcome::Navigate { target },
            None => QueryOutcome::empty(),
        },
    }
}
