//! Qaida lesson content and quiz configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::TilovatError;

/// Questions per quiz when a quiz block does not say.
pub const DEFAULT_ITEMS_PER_QUIZ: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaidaModule {
    pub module_id: u32,
    pub module_title: String,
    #[serde(default)]
    pub lessons: Vec<QaidaLesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaidaLesson {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub lesson_type: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_lesson_id: Option<u32>,
}

/// Positional shape of an Arabic letter, ordered as a letter chart lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKey {
    Isolated,
    Initial,
    Medial,
    Final,
}

impl FormKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKey::Isolated => "isolated",
            FormKey::Initial => "initial",
            FormKey::Medial => "medial",
            FormKey::Final => "final",
        }
    }

    /// Known key from lesson data; other keys are not positional forms.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "isolated" => Some(FormKey::Isolated),
            "initial" => Some(FormKey::Initial),
            "medial" => Some(FormKey::Medial),
            "final" => Some(FormKey::Final),
            _ => None,
        }
    }

    pub fn tajik_label(&self) -> &'static str {
        match self {
            FormKey::Isolated => "танҳо",
            FormKey::Initial => "аввали калима",
            FormKey::Medial => "байни калима",
            FormKey::Final => "охири калима",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaidaLetter {
    pub id: String,
    pub letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub forms: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, String>,
}

impl QaidaLetter {
    /// Positional forms whose glyphs differ, in chart order.
    ///
    /// When several forms share a glyph, the first in chart order (isolated,
    /// initial, medial, final) is kept. Blank glyphs and keys that are not
    /// positional forms are ignored.
    pub fn distinct_forms(&self) -> Vec<FormKey> {
        let mut known: Vec<(FormKey, &str)> = self
            .forms
            .iter()
            .filter_map(|(key, glyph)| Some((FormKey::parse(key)?, glyph.trim())))
            .filter(|(_, glyph)| !glyph.is_empty())
            .collect();
        known.sort_by_key(|(key, _)| *key);

        let mut seen: Vec<&str> = Vec::new();
        let mut keys = Vec::new();
        for (key, glyph) in known {
            if seen.contains(&glyph) {
                continue;
            }
            seen.push(glyph);
            keys.push(key);
        }
        keys
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaidaVowel {
    pub id: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaidaSyllableExample {
    pub id: String,
    pub letter: String,
    pub vowel: String,
    pub syllable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_fatha: Option<bool>,
}

/// Quiz settings exactly as they appear in lesson data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuizConfig {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub items_per_quiz: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "subtype", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        #[serde(default, rename = "textKey")]
        text_key: Option<String>,
    },
    LettersChart {
        #[serde(default)]
        letters: Vec<QaidaLetter>,
    },
    LettersFormsChart {
        #[serde(default)]
        letters: Vec<QaidaLetter>,
    },
    VowelsChart {
        #[serde(default)]
        vowels: Vec<QaidaVowel>,
    },
    SyllablesExamples {
        #[serde(default)]
        examples: Vec<QaidaSyllableExample>,
    },
    Quiz {
        #[serde(default)]
        config: RawQuizConfig,
    },
    #[serde(other)]
    Other,
}

/// Content block a quiz draws its items from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizSource {
    LettersChart,
    SyllablesExamples,
    LettersFormsChart,
}

impl QuizSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizSource::LettersChart => "letters_chart",
            QuizSource::SyllablesExamples => "syllables_examples",
            QuizSource::LettersFormsChart => "letters_forms_chart",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    LetterToSound,
    SoundToLetter,
    IdentifyForm,
}

impl QuizMode {
    /// Each mode reads exactly one kind of content block.
    pub fn source(&self) -> QuizSource {
        match self {
            QuizMode::LetterToSound => QuizSource::LettersChart,
            QuizMode::SoundToLetter => QuizSource::SyllablesExamples,
            QuizMode::IdentifyForm => QuizSource::LettersFormsChart,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "letter_to_sound" => Some(QuizMode::LetterToSound),
            "sound_to_letter" => Some(QuizMode::SoundToLetter),
            "identify_form" => Some(QuizMode::IdentifyForm),
            _ => None,
        }
    }
}

/// A validated quiz configuration: the mode fixes its source block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub mode: QuizMode,
    pub items_per_quiz: usize,
}

impl QuizConfig {
    pub fn new(mode: QuizMode, items_per_quiz: usize) -> Self {
        Self { mode, items_per_quiz }
    }

    pub fn source(&self) -> QuizSource {
        self.mode.source()
    }
}

impl TryFrom<&RawQuizConfig> for QuizConfig {
    type Error = TilovatError;

    fn try_from(raw: &RawQuizConfig) -> Result<Self, Self::Error> {
        let mode_str = raw
            .mode
            .as_deref()
            .ok_or_else(|| TilovatError::InvalidQuizConfig("missing mode".to_string()))?;
        let mode = QuizMode::parse(mode_str)
            .ok_or_else(|| TilovatError::InvalidQuizConfig(format!("unknown mode '{}'", mode_str)))?;

        let expected = mode.source().as_str();
        match raw.source.as_deref() {
            Some(source) if source == expected => {}
            Some(source) => {
                return Err(TilovatError::InvalidQuizConfig(format!(
                    "mode '{}' cannot use source '{}' (expected '{}')",
                    mode_str, source, expected
                )))
            }
            None => {
                return Err(TilovatError::InvalidQuizConfig(format!(
                    "mode '{}' is missing its source",
                    mode_str
                )))
            }
        }

        // Zero means unset in lesson data.
        let items_per_quiz = match raw.items_per_quiz {
            Some(0) | None => DEFAULT_ITEMS_PER_QUIZ,
            Some(n) => n,
        };

        Ok(QuizConfig { mode, items_per_quiz })
    }
}

impl QaidaLesson {
    /// Letters of the first block of the given kind, empty if the lesson has none.
    pub fn letters(&self, source: QuizSource) -> &[QaidaLetter] {
        self.content
            .iter()
            .find_map(|block| match (block, source) {
                (ContentBlock::LettersChart { letters }, QuizSource::LettersChart) => Some(letters.as_slice()),
                (ContentBlock::LettersFormsChart { letters }, QuizSource::LettersFormsChart) => {
                    Some(letters.as_slice())
                }
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn syllable_examples(&self) -> &[QaidaSyllableExample] {
        self.content
            .iter()
            .find_map(|block| match block {
                ContentBlock::SyllablesExamples { examples } => Some(examples.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Validated configs of this lesson's quiz blocks; invalid ones are skipped.
    pub fn quiz_configs(&self) -> Vec<QuizConfig> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Quiz { config } => match QuizConfig::try_from(config) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        warn!(lesson = self.id, error = %e, "skipping quiz block");
                        None
                    }
                },
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn letter(id: &str, glyph: &str, forms: &[(FormKey, &str)]) -> QaidaLetter {
        QaidaLetter {
            id: id.to_string(),
            letter: glyph.to_string(),
            name: Some(id.to_string()),
            pronunciation: None,
            forms: forms.iter().map(|(k, v)| (k.as_str().to_string(), v.to_string())).collect(),
            examples: BTreeMap::new(),
        }
    }

    pub fn syllable(id: &str, letter: &str, vowel: &str, syllable: &str) -> QaidaSyllableExample {
        QaidaSyllableExample {
            id: id.to_string(),
            letter: letter.to_string(),
            vowel: vowel.to_string(),
            syllable: syllable.to_string(),
            combined: None,
            with_fatha: None,
        }
    }

    pub fn lesson(id: u32, content: Vec<ContentBlock>) -> QaidaLesson {
        QaidaLesson {
            id,
            title: format!("Дарси {}", id),
            lesson_type: "letters".to_string(),
            difficulty: "beginner".to_string(),
            estimated_minutes: None,
            tags: Vec::new(),
            objectives: Vec::new(),
            content,
            next_lesson_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(mode: Option<&str>, source: Option<&str>, items: Option<usize>) -> RawQuizConfig {
        RawQuizConfig {
            mode: mode.map(str::to_string),
            source: source.map(str::to_string),
            items_per_quiz: items,
        }
    }

    #[test]
    fn test_quiz_config_validation() {
        let config = QuizConfig::try_from(&raw(Some("identify_form"), Some("letters_forms_chart"), Some(5))).unwrap();
        assert_eq!(config, QuizConfig::new(QuizMode::IdentifyForm, 5));
        assert_eq!(config.source(), QuizSource::LettersFormsChart);

        let config = QuizConfig::try_from(&raw(Some("letter_to_sound"), Some("letters_chart"), None)).unwrap();
        assert_eq!(config.items_per_quiz, DEFAULT_ITEMS_PER_QUIZ);

        let config = QuizConfig::try_from(&raw(Some("sound_to_letter"), Some("syllables_examples"), Some(0))).unwrap();
        assert_eq!(config.items_per_quiz, DEFAULT_ITEMS_PER_QUIZ);
    }

    #[test]
    fn test_quiz_config_rejects_bad_combinations() {
        assert!(QuizConfig::try_from(&raw(None, Some("letters_chart"), None)).is_err());
        assert!(QuizConfig::try_from(&raw(Some("spell_word"), Some("letters_chart"), None)).is_err());
        assert!(QuizConfig::try_from(&raw(Some("letter_to_sound"), Some("syllables_examples"), None)).is_err());
        assert!(QuizConfig::try_from(&raw(Some("identify_form"), None, None)).is_err());
    }

    #[test]
    fn test_distinct_forms_collapse_identical_glyphs() {
        let alif = fixtures::letter(
            "alif",
            "ا",
            &[(FormKey::Initial, "ا"), (FormKey::Medial, "ـا"), (FormKey::Final, "ـا")],
        );
        assert_eq!(alif.distinct_forms(), vec![FormKey::Initial, FormKey::Medial]);

        let blank = fixtures::letter("x", "x", &[(FormKey::Initial, " "), (FormKey::Final, "x")]);
        assert_eq!(blank.distinct_forms(), vec![FormKey::Final]);
    }

    #[test]
    fn test_unknown_form_keys_are_ignored() {
        let json = r#"{"id": "ba", "letter": "ب", "forms": {"final": "ـب", "standalone": "ب", "isolated": "ب", "initial": "ب"}}"#;
        let letter: QaidaLetter = serde_json::from_str(json).unwrap();
        assert_eq!(letter.forms.len(), 4);
        // isolated and initial share a glyph; isolated comes first in a chart
        assert_eq!(letter.distinct_forms(), vec![FormKey::Isolated, FormKey::Final]);
        assert_eq!(FormKey::parse("standalone"), None);
        assert_eq!(FormKey::parse(FormKey::Medial.as_str()), Some(FormKey::Medial));
    }

    #[test]
    fn test_lesson_deserializes_blocks() {
        let json = r#"{
            "id": 3, "title": "Шаклҳо", "lessonType": "forms", "difficulty": "easy",
            "tags": [], "objectives": [],
            "content": [
                {"subtype": "text", "textKey": "intro"},
                {"subtype": "letters_forms_chart", "letters": [
                    {"id": "ba", "letter": "ب", "forms": {"initial": "بـ", "medial": "ـبـ", "final": "ـب"}}
                ]},
                {"subtype": "audio", "audioKey": "a1"},
                {"subtype": "quiz", "quizType": "mcq", "config": {"mode": "identify_form", "source": "letters_forms_chart", "itemsPerQuiz": 4}},
                {"subtype": "quiz", "config": {"mode": "identify_form", "source": "letters_chart"}}
            ]
        }"#;
        let lesson: QaidaLesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.content.len(), 5);
        assert!(matches!(lesson.content[2], ContentBlock::Other));

        let letters = lesson.letters(QuizSource::LettersFormsChart);
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].distinct_forms().len(), 3);
        assert!(lesson.letters(QuizSource::LettersChart).is_empty());
        assert!(lesson.syllable_examples().is_empty());

        let configs = lesson.quiz_configs();
        assert_eq!(configs, vec![QuizConfig::new(QuizMode::IdentifyForm, 4)]);
    }

    #[test]
    fn test_form_labels() {
        assert_eq!(FormKey::Medial.tajik_label(), "байни калима");
        assert_eq!(serde_json::to_string(&FormKey::Final).unwrap(), "\"final\"");
    }
}
