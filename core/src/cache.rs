//! Hadith book caching with LRU eviction, loads from the bukhari data directory

use crate::hadith::{BookJson, BookMetadata};
use anyhow::{anyhow, Context, Result};
use lru::LruCache;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Default book cache capacity (number of books)
pub const DEFAULT_BOOK_CACHE_CAPACITY: usize = 64;

/// Cache key: book number plus optional sub-book number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookKey {
    pub number: u32,
    pub sub_number: Option<u32>,
}

impl BookKey {
    pub fn new(number: u32, sub_number: Option<u32>) -> Self {
        Self { number, sub_number }
    }

    pub fn file_name(&self) -> String {
        match self.sub_number {
            Some(sub) => format!("book_{}_{}.json", self.number, sub),
            None => format!("book_{}.json", self.number),
        }
    }
}

impl From<&BookMetadata> for BookKey {
    fn from(meta: &BookMetadata) -> Self {
        Self::new(meta.number, meta.sub_number)
    }
}

pub struct BookCache {
    cache: Mutex<LruCache<BookKey, Arc<BookJson>>>,
    books_dir: PathBuf,
}

impl BookCache {
    pub fn new(books_dir: PathBuf, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { cache: Mutex::new(LruCache::new(capacity)), books_dir }
    }

    pub fn get(&self, key: &BookKey) -> Result<Arc<BookJson>> {
        {
            let mut cache = self.cache.lock().map_err(|_| anyhow!("book cache lock poisoned"))?;
            if let Some(book) = cache.get(key) {
                return Ok(Arc::clone(book));
            }
        }

        let book = Arc::new(self.load_book(key)?);
        {
            let mut cache = self.cache.lock().map_err(|_| anyhow!("book cache lock poisoned"))?;
            cache.put(*key, Arc::clone(&book));
        }
        Ok(book)
    }

    fn load_book(&self, key: &BookKey) -> Result<BookJson> {
        let path = self.books_dir.join(key.file_name());
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read hadith book at {:?}", path))?;
        let book: BookJson = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse hadith book at {:?}", path))?;
        debug!(book = key.number, chapters = book.chapters.len(), "loaded hadith book");
        Ok(book)
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// (cached entries, capacity)
    pub fn stats(&self) -> (usize, usize) {
        match self.cache.lock() {
            Ok(cache) => (cache.len(), cache.cap().get()),
            Err(_) => (0, 0),
        }
    }
}
