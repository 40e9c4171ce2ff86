//! Substring search over verse and surah records
//!
//! Every call is a full linear scan over the records it is given: no index is
//! built. Verse results keep the order of the input collection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::records::{Surah, SurahField, TranslationSource, Verse, VerseField};
use crate::text::{has_arabic, FoldedQuery};

/// Default cap on verse results when the caller does not set one.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Surah search needs at least this many characters after trimming.
pub const MIN_SURAH_QUERY_CHARS: usize = 2;

/// Which verse text fields participate in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFilter {
    /// Arabic text plus the reader's current translation.
    #[default]
    Both,
    /// Every text field.
    All,
    Arabic,
    Transliteration,
    Tajik,
    #[serde(alias = "tj_2")]
    Tj2,
    #[serde(alias = "tj_3")]
    Tj3,
    Farsi,
    Russian,
}

impl FieldFilter {
    /// Enabled fields in priority order.
    pub fn fields(&self, translation: TranslationSource) -> Vec<VerseField> {
        match self {
            FieldFilter::Both => vec![VerseField::ArabicText, translation.field()],
            FieldFilter::All => VerseField::ALL.to_vec(),
            FieldFilter::Arabic => vec![VerseField::ArabicText],
            FieldFilter::Transliteration => vec![VerseField::Transliteration],
            FieldFilter::Tajik => vec![VerseField::TajikText],
            FieldFilter::Tj2 => vec![VerseField::Tj2],
            FieldFilter::Tj3 => vec![VerseField::Tj3],
            FieldFilter::Farsi => vec![VerseField::Farsi],
            FieldFilter::Russian => vec![VerseField::Russian],
        }
    }

    fn is_mixed(&self) -> bool {
        matches!(self, FieldFilter::Both | FieldFilter::All)
    }
}

/// Reader preferences that shape a search. Passed explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSettings {
    pub translation: TranslationSource,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            translation: TranslationSource::default(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub field_filter: FieldFilter,
    pub translation: TranslationSource,
    pub max_results: usize,
    pub surah_id: Option<u32>,
}

impl SearchOptions {
    pub fn from_settings(settings: &SearchSettings, field_filter: FieldFilter) -> Self {
        Self {
            field_filter,
            translation: settings.translation,
            max_results: settings.max_results,
            surah_id: None,
        }
    }

    pub fn with_surah(mut self, surah_id: Option<u32>) -> Self {
        self.surah_id = surah_id;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default(), FieldFilter::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Surah {
        data: Surah,
        #[serde(rename = "matchedFields")]
        matched_fields: Vec<SurahField>,
    },
    Verse {
        data: Verse,
        #[serde(rename = "matchedFields")]
        matched_fields: Vec<VerseField>,
    },
}

impl SearchResult {
    pub fn as_verse(&self) -> Option<(&Verse, &[VerseField])> {
        match self {
            SearchResult::Verse { data, matched_fields } => Some((data, matched_fields)),
            SearchResult::Surah { .. } => None,
        }
    }

    pub fn as_surah(&self) -> Option<(&Surah, &[SurahField])> {
        match self {
            SearchResult::Surah { data, matched_fields } => Some((data, matched_fields)),
            SearchResult::Verse { .. } => None,
        }
    }
}

/// Search verse records for a case-insensitive substring.
///
/// A verse appears at most once, with `matched_fields` listing every enabled
/// field that contains the query in priority order. An Arabic-script query
/// under a mixed filter only reports verses whose Arabic text contains it.
pub fn search_verses(records: &[Verse], query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    if query.trim().is_empty() || options.max_results == 0 {
        return Vec::new();
    }

    let folded = FoldedQuery::new(query);
    let fields = options.field_filter.fields(options.translation);
    let require_arabic = options.field_filter.is_mixed() && has_arabic(query);

    let mut results = Vec::new();
    for verse in records {
        if options.surah_id.is_some_and(|id| verse.surah_id != id) {
            continue;
        }

        let matched_fields: Vec<VerseField> = fields
            .iter()
            .copied()
            .filter(|field| field.get_value(verse).is_some_and(|text| folded.is_in(text)))
            .collect();

        if matched_fields.is_empty() {
            continue;
        }
        if require_arabic && !matched_fields.contains(&VerseField::ArabicText) {
            continue;
        }

        results.push(SearchResult::Verse {
            data: verse.clone(),
            matched_fields,
        });
        if results.len() >= options.max_results {
            break;
        }
    }

    debug!(
        query,
        filter = ?options.field_filter,
        scanned = records.len(),
        hits = results.len(),
        "verse search"
    );
    results
}

/// Search surahs by Tajik, Arabic or English name, or by number.
pub fn search_surahs(surahs: &[Surah], query: &str) -> Vec<SearchResult> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_SURAH_QUERY_CHARS {
        return Vec::new();
    }

    let folded = FoldedQuery::new(trimmed);
    surahs
        .iter()
        .filter_map(|surah| {
            let mut matched_fields = Vec::new();
            if folded.is_in(&surah.name_tajik) {
                matched_fields.push(SurahField::NameTajik);
            }
            if folded.is_in(&surah.name_arabic) {
                matched_fields.push(SurahField::NameArabic);
            }
            if folded.is_in(&surah.name_english) {
                matched_fields.push(SurahField::NameEnglish);
            }
            if surah.number.to_string().contains(trimmed) {
                matched_fields.push(SurahField::Number);
            }

            (!matched_fields.is_empty()).then(|| SearchResult::Surah {
                data: surah.clone(),
                matched_fields,
            })
        })
        .collect()
}

/// Surah results followed by verse results, as shown in combined result lists.
pub fn search_all(
    surahs: &[Surah],
    verses: &[Verse],
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchResult> {
    let mut results = search_surahs(surahs, query);
    results.extend(search_verses(verses, query, options));
    results
}

/// Text of the first matched field, used as the display snippet.
///
/// Translation variants a verse lacks fall back to the Tajik text.
pub fn snippet_text<'a>(verse: &'a Verse, matched_fields: &[VerseField]) -> &'a str {
    match matched_fields.first() {
        Some(VerseField::ArabicText) => &verse.arabic_text,
        Some(VerseField::Transliteration) => verse.transliteration.as_deref().unwrap_or(""),
        Some(field) => field.get_value(verse).unwrap_or(verse.tajik_text.as_str()),
        None if !verse.tajik_text.is_empty() => &verse.tajik_text,
        None => &verse.arabic_text,
    }
}

/// Label of the first matched field, shown beside the snippet.
pub fn matched_field_label(matched_fields: &[VerseField]) -> Option<&'static str> {
    matched_fields.first().map(VerseField::label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{surahs, verse};

    fn corpus() -> Vec<Verse> {
        let mut v1 = verse(1, 1, "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ", "Ба номи Худованди бахшояндаи меҳрубон");
        v1.transliteration = Some("Bismillahir Rahmanir Raheem".to_string());
        v1.russian = Some("Во имя Аллаха, Милостивого, Милосердного!".to_string());
        let mut v2 = verse(1, 2, "الْحَمْدُ لِلَّهِ رَبِّ الْعَالَمِينَ", "Ситоиш Худойро, ки парвардигори ҷаҳониён");
        v2.tj2 = Some("Ҳамду сано махсуси Аллоҳ".to_string());
        let v3 = verse(2, 255, "اللَّهُ لَا إِلَٰهَ إِلَّا هُوَ الْحَيُّ الْقَيُّومُ", "Худост, ки ҳеҷ худое ҷуз Ӯ нест");
        vec![v1, v2, v3]
    }

    fn options(filter: FieldFilter) -> SearchOptions {
        SearchOptions::from_settings(&SearchSettings::default(), filter)
    }

    #[test]
    fn test_single_translation_field() {
        let verses = vec![verse(1, 1, "بسم الله", "Ба номи Худованд")];
        let results = search_verses(&verses, "Худованд", &options(FieldFilter::Tajik));
        assert_eq!(results.len(), 1);
        let (_, fields) = results[0].as_verse().unwrap();
        assert_eq!(fields, &[VerseField::TajikText]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let results = search_verses(&corpus(), "худованди", &options(FieldFilter::Tajik));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_verse().unwrap().0.verse_number, 1);
    }

    #[test]
    fn test_arabic_filter_ignores_translations() {
        let results = search_verses(&corpus(), "Худо", &options(FieldFilter::Arabic));
        assert!(results.is_empty());

        let results = search_verses(&corpus(), "اللَّهِ", &options(FieldFilter::Arabic));
        for result in &results {
            let (_, fields) = result.as_verse().unwrap();
            assert_eq!(fields, &[VerseField::ArabicText]);
        }
    }

    #[test]
    fn test_every_arabic_substring_is_found() {
        let verses = corpus();
        for v in &verses {
            let chars: Vec<char> = v.arabic_text.chars().collect();
            for start in 0..chars.len() {
                for len in 1..=3usize.min(chars.len() - start) {
                    let q: String = chars[start..start + len].iter().collect();
                    let results = search_verses(std::slice::from_ref(v), &q, &options(FieldFilter::Arabic));
                    assert_eq!(results.len(), 1, "query {:?}", q);
                    assert!(results[0].as_verse().unwrap().1.contains(&VerseField::ArabicText));
                }
            }
        }
    }

    #[test]
    fn test_all_filter_reports_fields_in_priority_order() {
        let mut v = verse(3, 1, "الم", "Алиф, Лом, Мим");
        v.transliteration = Some("Alif Lam Mim".to_string());
        v.tj3 = Some("Alif. Lam. Mim.".to_string());
        v.russian = Some("Алиф. Лам. Мим.".to_string());
        let verses = [v];

        let results = search_verses(&verses, "али", &options(FieldFilter::All));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_verse().unwrap().1, &[VerseField::TajikText, VerseField::Russian]);

        let results = search_verses(&verses, "ALIF", &options(FieldFilter::All));
        assert_eq!(results[0].as_verse().unwrap().1, &[VerseField::Transliteration, VerseField::Tj3]);
    }

    #[test]
    fn test_both_uses_current_translation() {
        let settings = SearchSettings {
            translation: TranslationSource::Russian,
            max_results: 10,
        };
        let opts = SearchOptions::from_settings(&settings, FieldFilter::Both);
        let results = search_verses(&corpus(), "милостив", &opts);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_verse().unwrap().1, &[VerseField::Russian]);

        let results = search_verses(&corpus(), "Худованд", &opts);
        assert!(results.is_empty());
    }

    #[test]
    fn test_results_keep_input_order_and_truncate() {
        let verses: Vec<Verse> = (1..=20).map(|n| verse(1, n, "نص", "матн")).collect();
        let mut opts = options(FieldFilter::Tajik);
        opts.max_results = 5;
        let results = search_verses(&verses, "матн", &opts);
        let numbers: Vec<u32> = results.iter().map(|r| r.as_verse().unwrap().0.verse_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_surah_restriction() {
        let opts = options(FieldFilter::All).with_surah(Some(2));
        let results = search_verses(&corpus(), "худо", &opts);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_verse().unwrap().0.surah_id, 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(search_verses(&[], "Худо", &options(FieldFilter::All)).is_empty());
        assert!(search_verses(&corpus(), "", &options(FieldFilter::All)).is_empty());
        assert!(search_surahs(&[], "Бақара").is_empty());
    }

    #[test]
    fn test_matched_field_label_follows_snippet_field() {
        let results = search_verses(&corpus(), "ҳамду", &options(FieldFilter::All));
        assert_eq!(results.len(), 1);
        let (verse, fields) = results[0].as_verse().unwrap();
        assert_eq!(fields, &[VerseField::Tj2]);
        assert_eq!(snippet_text(verse, fields), "Ҳамду сано махсуси Аллоҳ");
        assert_eq!(matched_field_label(fields), Some("Абуаломуддин (бо тафсир)"));
        assert_eq!(matched_field_label(&[]), None);
    }

    #[test]
    fn test_whitespace_query_matches_nothing() {
        // Every verse text contains spaces.
        for query in [" ", "  \t", "\n"] {
            assert!(search_verses(&corpus(), query, &options(FieldFilter::All)).is_empty());
        }
    }

    #[test]
    fn test_search_surahs() {
        let results = search_surahs(&surahs(), "бақ");
        assert_eq!(results.len(), 1);
        let (surah, fields) = results[0].as_surah().unwrap();
        assert_eq!(surah.number, 2);
        assert_eq!(fields, &[SurahField::NameTajik]);

        let results = search_surahs(&surahs(), "36");
        assert_eq!(results[0].as_surah().unwrap().1, &[SurahField::Number]);

        let results = search_surahs(&surahs(), "al-");
        assert_eq!(results.len(), 3);

        assert!(search_surahs(&surahs(), " б ").is_empty());
    }

    #[test]
    fn test_search_all_puts_surahs_first() {
        let mut surah_list = surahs();
        surah_list.push(crate::records::fixtures::surah(50, "Қоф", "ق", "Qaaf"));
        let verses = vec![verse(50, 1, "ق", "Қоф. Қасам ба Қуръони бузургвор")];
        let results = search_all(&surah_list, &verses, "қоф", &options(FieldFilter::All));
        assert_eq!(results.len(), 2);
        assert!(results[0].as_surah().is_some());
        assert!(results[1].as_verse().is_some());
    }

    #[test]
    fn test_snippet_text() {
        let mut v = verse(1, 2, "الحمد", "Ситоиш");
        v.tj2 = Some("Ҳамд".to_string());
        assert_eq!(snippet_text(&v, &[VerseField::Tj2, VerseField::TajikText]), "Ҳамд");
        assert_eq!(snippet_text(&v, &[VerseField::Farsi]), "Ситоиш");
        assert_eq!(snippet_text(&v, &[VerseField::ArabicText]), "الحمد");
        assert_eq!(snippet_text(&v, &[]), "Ситоиш");
    }

    #[test]
    fn test_result_serialization_shape() {
        let results = search_verses(&corpus(), "Худованд", &options(FieldFilter::Tajik));
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["type"], "verse");
        assert_eq!(json["matchedFields"][0], "tajikText");
        assert_eq!(json["data"]["surahId"], 1);
    }

    #[test]
    fn test_field_filter_deserialize_aliases() {
        let filter: FieldFilter = serde_json::from_str("\"tj_2\"").unwrap();
        assert_eq!(filter, FieldFilter::Tj2);
        let filter: FieldFilter = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(filter, FieldFilter::Both);
    }
}
