//! Runtime configuration read from the environment

use crate::cache::DEFAULT_BOOK_CACHE_CAPACITY;
use crate::records::TranslationSource;
use crate::search::SearchSettings;
use crate::store::SURAHS_FILE;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const ENV_DATA_DIR: &str = "TILOVAT_DATA_DIR";
pub const ENV_BIND: &str = "TILOVAT_BIND";
pub const ENV_BOOK_CACHE: &str = "TILOVAT_BOOK_CACHE";
pub const ENV_MAX_RESULTS: &str = "TILOVAT_MAX_RESULTS";
pub const ENV_TRANSLATION: &str = "TILOVAT_TRANSLATION";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Inline result cap used by the search box.
pub const DEFAULT_SEARCH_MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub book_cache_capacity: usize,
    pub max_results: usize,
    pub default_translation: TranslationSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            book_cache_capacity: DEFAULT_BOOK_CACHE_CAPACITY,
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
            default_translation: TranslationSource::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => get_data_dir(),
        };

        Self {
            data_dir,
            bind_addr: lookup(ENV_BIND)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            book_cache_capacity: parse_or(&lookup, ENV_BOOK_CACHE, DEFAULT_BOOK_CACHE_CAPACITY),
            max_results: parse_or(&lookup, ENV_MAX_RESULTS, DEFAULT_SEARCH_MAX_RESULTS),
            default_translation: parse_or(&lookup, ENV_TRANSLATION, TranslationSource::default()),
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            translation: self.default_translation,
            max_results: self.max_results,
        }
    }

    pub fn bukhari_dir(&self) -> PathBuf {
        self.data_dir.join(crate::store::BUKHARI_DIR)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable config value, using default");
                default
            }
        },
        None => default,
    }
}

/// Get the content data directory.
///
/// Prefers a `data/` directory near the working directory that holds the
/// surah list, then the platform data directory.
pub fn get_data_dir() -> PathBuf {
    let dev_paths = [PathBuf::from("data"), PathBuf::from("../data")];
    for path in &dev_paths {
        if path.join(SURAHS_FILE).exists() {
            return path.canonicalize().unwrap_or_else(|_| path.clone());
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("tilovat"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.book_cache_capacity, 64);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.default_translation, TranslationSource::Tajik);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (ENV_DATA_DIR, "/srv/tilovat"),
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_BOOK_CACHE, "8"),
            (ENV_MAX_RESULTS, " 20 "),
            (ENV_TRANSLATION, "farsi"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/tilovat"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.book_cache_capacity, 8);
        assert_eq!(config.max_results, 20);
        assert_eq!(config.default_translation, TranslationSource::Farsi);
        assert_eq!(config.bukhari_dir(), PathBuf::from("/srv/tilovat/bukhari"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = config(&[(ENV_BOOK_CACHE, "many"), (ENV_TRANSLATION, "klingon")]);
        assert_eq!(config.book_cache_capacity, DEFAULT_BOOK_CACHE_CAPACITY);
        assert_eq!(config.default_translation, TranslationSource::Tajik);
    }

    #[test]
    fn test_search_settings() {
        let settings = config(&[(ENV_TRANSLATION, "tj2"), (ENV_MAX_RESULTS, "5")]).search_settings();
        assert_eq!(settings.translation, TranslationSource::Tj2);
        assert_eq!(settings.max_results, 5);
    }
}
