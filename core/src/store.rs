//! Content store: surahs, verses, Qaida lessons and Bukhari metadata loaded once from the data directory

use crate::error::TilovatError;
use crate::hadith::{BookMetadata, BukhariMetadata};
use crate::qaida::{QaidaLesson, QaidaModule};
use crate::records::{Surah, Verse, VerseKey};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

pub const SURAHS_FILE: &str = "surahs.json";
pub const VERSES_FILE: &str = "verses.json";
pub const QAIDA_FILE: &str = "qaida.json";
pub const BUKHARI_DIR: &str = "bukhari";
pub const BUKHARI_METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub surahs: usize,
    pub verses: usize,
    pub lessons: usize,
    pub bukhari_books: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Read-only dataset shared by every query.
#[derive(Debug, Clone)]
pub struct ContentStore {
    surahs: Vec<Surah>,
    verses: Vec<Verse>,
    qaida: Option<QaidaModule>,
    bukhari: Option<BukhariMetadata>,
    loaded_at: DateTime<Utc>,
}

impl ContentStore {
    /// Build a store from records already in memory.
    ///
    /// Surahs are ordered by number and verses by key. Duplicate surah
    /// numbers are rejected.
    pub fn from_parts(mut surahs: Vec<Surah>, mut verses: Vec<Verse>) -> Result<Self> {
        let mut seen = HashSet::new();
        for surah in &surahs {
            if !seen.insert(surah.number) {
                return Err(TilovatError::Content(format!("duplicate surah number {}", surah.number)).into());
            }
        }

        surahs.sort_by_key(|s| s.number);
        verses.sort_by_key(Verse::key);

        Ok(Self {
            surahs,
            verses,
            qaida: None,
            bukhari: None,
            loaded_at: Utc::now(),
        })
    }

    /// Load every dataset under `data_dir`.
    ///
    /// Surahs and verses are required. The Qaida module and Bukhari metadata
    /// are optional and left empty when their files are absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let surahs: Vec<Surah> = read_json(&data_dir.join(SURAHS_FILE))?;
        let verses: Vec<Verse> = read_json(&data_dir.join(VERSES_FILE))?;
        let qaida: Option<QaidaModule> = read_optional_json(&data_dir.join(QAIDA_FILE))?;
        let bukhari: Option<BukhariMetadata> =
            read_optional_json(&data_dir.join(BUKHARI_DIR).join(BUKHARI_METADATA_FILE))?;

        let mut store = Self::from_parts(surahs, verses)
            .with_context(|| format!("Invalid content in {:?}", data_dir))?;
        store.qaida = qaida;
        store.bukhari = bukhari;

        let stats = store.stats();
        info!(
            surahs = stats.surahs,
            verses = stats.verses,
            lessons = stats.lessons,
            bukhari_books = stats.bukhari_books,
            "Loaded content from {:?}",
            data_dir
        );
        Ok(store)
    }

    pub fn with_qaida(mut self, qaida: QaidaModule) -> Self {
        self.qaida = Some(qaida);
        self
    }

    pub fn surahs(&self) -> &[Surah] {
        &self.surahs
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn surah(&self, number: u32) -> Option<&Surah> {
        self.surahs
            .binary_search_by_key(&number, |s| s.number)
            .ok()
            .map(|i| &self.surahs[i])
    }

    pub fn verse(&self, surah_id: u32, verse_number: u32) -> Option<&Verse> {
        let key = VerseKey::new(surah_id, verse_number);
        self.verses
            .binary_search_by_key(&key, Verse::key)
            .ok()
            .map(|i| &self.verses[i])
    }

    pub fn first_verse_of_juz(&self, juz: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.juz == Some(juz))
    }

    pub fn first_verse_of_page(&self, page: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.page == Some(page))
    }

    pub fn qaida(&self) -> Option<&QaidaModule> {
        self.qaida.as_ref()
    }

    /// Lesson by id, or the module's first lesson when the id is unknown.
    pub fn lesson(&self, id: u32) -> Option<&QaidaLesson> {
        let lessons = &self.qaida.as_ref()?.lessons;
        lessons.iter().find(|l| l.id == id).or_else(|| lessons.first())
    }

    pub fn bukhari(&self) -> Option<&BukhariMetadata> {
        self.bukhari.as_ref()
    }

    pub fn bukhari_books(&self) -> &[BookMetadata] {
        self.bukhari.as_ref().map(|b| b.books.as_slice()).unwrap_or(&[])
    }

    pub fn stats(&self) -> ContentStats {
        ContentStats {
            surahs: self.surahs.len(),
            verses: self.verses.len(),
            lessons: self.qaida.as_ref().map(|q| q.lessons.len()).unwrap_or(0),
            bukhari_books: self.bukhari_books().len(),
            loaded_at: self.loaded_at,
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    read_json(path).map(Some)
}
