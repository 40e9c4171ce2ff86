//! Tilovat - Tajik Quran reader core
//!
//! Query classification, verse and surah search, match highlighting, Qaida
//! quiz generation and Sahih al-Bukhari search over content loaded once from
//! the data directory.

// Records and text matching come first as everything else builds on them
pub mod records;
pub mod text;
pub mod error;
pub mod search;
pub mod highlight;
pub mod query;
pub mod qaida;
pub mod quiz;
pub mod hadith;
pub mod cache;
pub mod store;
pub mod config;
pub mod state;

pub use error::TilovatError;
pub use state::AppState;
pub use config::{AppConfig, get_data_dir};
pub use records::{Surah, SurahField, TranslationSource, Verse, VerseField, VerseKey};
pub use search::{matched_field_label, search_all, search_surahs, search_verses, snippet_text, FieldFilter, SearchOptions, SearchResult, SearchSettings};
pub use highlight::{highlight, highlight_markup, Segment};
pub use query::{classify, resolve_navigation, run_query, NavigationKind, NavigationTarget, QueryIntent, QueryOutcome};
pub use qaida::{ContentBlock, FormKey, QaidaLesson, QaidaLetter, QaidaModule, QuizConfig, QuizMode, QuizSource};
pub use quiz::{generate, generate_quiz, Grade, QuizQuestion, QuizResults, QuizSession};
pub use hadith::{preview, search_hadith, BookJson, BookMetadata, BukhariMetadata, HadithHit, HadithSearchOptions};
pub use cache::{BookCache, BookKey};
pub use store::{ContentStats, ContentStore};
