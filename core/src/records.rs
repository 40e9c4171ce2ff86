//! Verse and surah records and field access

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TilovatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseKey {
    pub surah_id: u32,
    pub verse_number: u32,
}

impl VerseKey {
    pub fn new(surah_id: u32, verse_number: u32) -> Self {
        Self { surah_id, verse_number }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub surah_id: u32,
    pub verse_number: u32,
    pub arabic_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    #[serde(default)]
    pub tajik_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tj2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tj3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub russian: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tafsir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub juz: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Verse {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.surah_id, self.verse_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surah {
    pub number: u32,
    pub name_arabic: String,
    pub name_tajik: String,
    #[serde(default)]
    pub name_english: String,
    #[serde(default)]
    pub revelation_type: String,
    pub verses_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_juz: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_juz: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
}

/// Searchable verse text fields, declared in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerseField {
    ArabicText,
    Transliteration,
    TajikText,
    Tj2,
    Tj3,
    Farsi,
    Russian,
}

impl VerseField {
    pub const ALL: [VerseField; 7] = [
        VerseField::ArabicText,
        VerseField::Transliteration,
        VerseField::TajikText,
        VerseField::Tj2,
        VerseField::Tj3,
        VerseField::Farsi,
        VerseField::Russian,
    ];

    pub fn get_value<'a>(&self, verse: &'a Verse) -> Option<&'a str> {
        match self {
            VerseField::ArabicText => Some(&verse.arabic_text),
            VerseField::Transliteration => verse.transliteration.as_deref(),
            VerseField::TajikText => Some(&verse.tajik_text),
            VerseField::Tj2 => verse.tj2.as_deref(),
            VerseField::Tj3 => verse.tj3.as_deref(),
            VerseField::Farsi => verse.farsi.as_deref(),
            VerseField::Russian => verse.russian.as_deref(),
        }
    }

    pub fn is_translation(&self) -> bool {
        !matches!(self, VerseField::ArabicText | VerseField::Transliteration)
    }

    /// Display label shown next to a matched snippet.
    pub fn label(&self) -> &'static str {
        match self {
            VerseField::ArabicText => "Арабӣ",
            VerseField::Transliteration => "Транслитератсия",
            VerseField::TajikText => "Абдул Муҳаммад Оятӣ",
            VerseField::Tj2 => "Абуаломуддин (бо тафсир)",
            VerseField::Tj3 => "Pioneers of Translation Center",
            VerseField::Farsi => "Форсӣ",
            VerseField::Russian => "Эльмир Кулиев",
        }
    }
}

/// Translation sources a reader can select as their current translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationSource {
    #[default]
    Tajik,
    #[serde(alias = "tj_2")]
    Tj2,
    #[serde(alias = "tj_3")]
    Tj3,
    Farsi,
    Russian,
}

impl TranslationSource {
    pub fn field(&self) -> VerseField {
        match self {
            TranslationSource::Tajik => VerseField::TajikText,
            TranslationSource::Tj2 => VerseField::Tj2,
            TranslationSource::Tj3 => VerseField::Tj3,
            TranslationSource::Farsi => VerseField::Farsi,
            TranslationSource::Russian => VerseField::Russian,
        }
    }
}

impl FromStr for TranslationSource {
    type Err = TilovatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tajik" => Ok(TranslationSource::Tajik),
            "tj2" | "tj_2" => Ok(TranslationSource::Tj2),
            "tj3" | "tj_3" => Ok(TranslationSource::Tj3),
            "farsi" => Ok(TranslationSource::Farsi),
            "russian" => Ok(TranslationSource::Russian),
            other => Err(TilovatError::Other(format!("Unknown translation: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurahField {
    NameTajik,
    NameArabic,
    NameEnglish,
    Number,
}
