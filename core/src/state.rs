//! Application state management

use crate::cache::{BookCache, BookKey};
use crate::config::AppConfig;
use crate::error::TilovatError;
use crate::hadith::{search_hadith, HadithHit, HadithSearchOptions};
use crate::qaida::QaidaLesson;
use crate::quiz::{generate_quiz, QuizQuestion};
use crate::query::{run_query, QueryOutcome};
use crate::search::{FieldFilter, SearchOptions};
use crate::store::ContentStore;
use anyhow::Result;
use std::sync::Arc;

/// Application state holding the loaded content and the hadith book cache
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<ContentStore>,
    pub books: Arc<BookCache>,
}

impl AppState {
    /// Initialize application state, loading content from the configured data directory
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(ContentStore::load(&config.data_dir)?);
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: AppConfig, store: Arc<ContentStore>) -> Self {
        let books = Arc::new(BookCache::new(config.bukhari_dir(), config.book_cache_capacity));
        Self { config, store, books }
    }

    /// Search options from the configured defaults with the given field filter
    pub fn search_options(&self, field_filter: FieldFilter) -> SearchOptions {
        SearchOptions::from_settings(&self.config.search_settings(), field_filter)
    }

    pub fn query(&self, raw: &str, options: &SearchOptions) -> QueryOutcome {
        run_query(&self.store, raw, options)
    }

    /// Search the Bukhari collection, loading books through the cache
    pub fn search_hadith(&self, query: &str) -> Vec<HadithHit> {
        let Some(metadata) = self.store.bukhari() else {
            return Vec::new();
        };
        search_hadith(
            metadata,
            |book| self.books.get(&BookKey::from(book)),
            query,
            &HadithSearchOptions::default(),
        )
    }

    /// Lesson by id, falling back to the first lesson
    pub fn lesson(&self, id: u32) -> Result<&QaidaLesson, TilovatError> {
        self.store
            .lesson(id)
            .ok_or_else(|| TilovatError::NotFound(format!("Qaida lesson {}", id)))
    }

    /// Fresh quiz from the lesson's first valid quiz block
    pub fn lesson_quiz(&self, id: u32) -> Result<Vec<QuizQuestion>, TilovatError> {
        let lesson = self.lesson(id)?;
        let config = lesson
            .quiz_configs()
            .into_iter()
            .next()
            .ok_or_else(|| TilovatError::InvalidQuizConfig(format!("lesson {} has no valid quiz", lesson.id)))?;
        Ok(generate_quiz(&config, lesson))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qaida::fixtures::{lesson, letter};
    use crate::qaida::{ContentBlock, FormKey, QaidaModule, RawQuizConfig};
    use crate::records::fixtures::surahs;
    use std::path::PathBuf;

    fn state() -> AppState {
        let letters = vec![
            letter("ba", "ب", &[(FormKey::Initial, "بـ"), (FormKey::Final, "ـب")]),
            letter("ta", "ت", &[(FormKey::Initial, "تـ"), (FormKey::Final, "ـت")]),
            letter("tha", "ث", &[(FormKey::Initial, "ثـ"), (FormKey::Final, "ـث")]),
        ];
        let quiz = ContentBlock::Quiz {
            config: RawQuizConfig {
                mode: Some("letter_to_sound".to_string()),
                source: Some("letters_chart".to_string()),
                items_per_quiz: Some(2),
            },
        };
        let module = QaidaModule {
            module_id: 1,
            module_title: "Қоида".to_string(),
            lessons: vec![
                lesson(1, vec![ContentBlock::LettersChart { letters }, quiz]),
                lesson(2, vec![ContentBlock::Other]),
            ],
        };
        let store = ContentStore::from_parts(surahs(), vec![]).unwrap().with_qaida(module);
        let config = AppConfig {
            data_dir: PathBuf::from("missing"),
            ..AppConfig::from_lookup(|_| None)
        };
        AppState::with_store(config, Arc::new(store))
    }

    #[test]
    fn test_lesson_quiz() {
        let state = state();
        let questions = state.lesson_quiz(1).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.option_count() == 3));
    }

    #[test]
    fn test_lesson_without_quiz() {
        let err = state().lesson_quiz(2).unwrap_err();
        assert!(matches!(err, TilovatError::InvalidQuizConfig(_)));
    }

    #[test]
    fn test_unknown_lesson_falls_back() {
        assert_eq!(state().lesson(99).unwrap().id, 1);
    }

    #[test]
    fn test_hadith_search_without_collection() {
        assert!(state().search_hadith("намоз").is_empty());
    }
}
