//! # Language Detection Module
//!
//! ## Purpose
//! Detects English and Hindi content in contract text, splits mixed-language
//! documents into script segments, and maps known Hindi legal vocabulary to
//! English so downstream analysis can work on a single language.
//!
//! ## Input/Output Specification
//! - **Input**: Raw contract text, possibly mixing Latin and Devanagari script
//! - **Output**: [`LanguageInfo`] detection results, script segments, and
//!   normalized text with Hindi legal terms bracketed in English
//!
//! ## Key Features
//! - Script-based detection over the Devanagari block (U+0900..U+097F)
//! - Glossary translation of common Hindi legal terms
//! - Phonetic transliteration for primarily-Hindi documents

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Detected primary language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Unknown,
}

impl Language {
    /// ISO 639 code, `und` for undetermined
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Unknown => "und",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Unknown => "unknown",
        }
    }
}

/// Share of alphabetic characters per script
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageDistribution {
    pub hindi: f64,
    pub english: f64,
}

/// Language detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub primary_language: Language,
    pub confidence: f64,
    pub is_multilingual: bool,
    pub distribution: LanguageDistribution,
}

/// Multilingual text prepared for downstream analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedLanguage {
    pub original_text: String,
    pub language_info: LanguageInfo,
    pub normalized_text: String,
    pub hindi_segments: Vec<String>,
    pub english_segments: Vec<String>,
    pub translations: Vec<(String, String)>,
    pub transliterated_text: Option<String>,
}

/// Legal terms detected per language
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedLegalTerms {
    pub english_terms: Vec<String>,
    pub hindi_terms: Vec<String>,
}

/// Word and script statistics for a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageStats {
    pub primary_language: Language,
    pub confidence: f64,
    pub is_multilingual: bool,
    pub distribution: LanguageDistribution,
    pub word_count: usize,
    pub hindi_word_count: usize,
    pub english_word_count: usize,
    pub legal_terms_detected: DetectedLegalTerms,
}

/// Hindi legal glossary, declaration order drives replacement order
const HINDI_LEGAL_TERMS: [(&str, &str); 29] = [
    ("अनुबंध", "contract"),
    ("समझौता", "agreement"),
    ("पक्ष", "party"),
    ("शर्तें", "terms"),
    ("नियम", "conditions"),
    ("दायित्व", "liability"),
    ("अधिकार", "rights"),
    ("भुगतान", "payment"),
    ("समाप्ति", "termination"),
    ("विवाद", "dispute"),
    ("मध्यस्थता", "arbitration"),
    ("क्षेत्राधिकार", "jurisdiction"),
    ("गोपनीयता", "confidentiality"),
    ("क्षतिपूर्ति", "indemnity"),
    ("वारंटी", "warranty"),
    ("प्रतिनिधित्व", "representation"),
    ("अवधि", "term/duration"),
    ("नोटिस", "notice"),
    ("संशोधन", "amendment"),
    ("हस्ताक्षर", "signature"),
    ("साक्षी", "witness"),
    ("मुहर", "seal"),
    ("रुपये", "rupees"),
    ("लाख", "lakh"),
    ("करोड़", "crore"),
    ("प्रतिशत", "percent"),
    ("वार्षिक", "annual"),
    ("मासिक", "monthly"),
    ("दैनिक", "daily"),
];

const ENGLISH_LEGAL_TERMS: [&str; 16] = [
    "agreement",
    "contract",
    "party",
    "parties",
    "whereas",
    "hereby",
    "herein",
    "thereof",
    "shall",
    "must",
    "liability",
    "indemnify",
    "terminate",
    "jurisdiction",
    "arbitration",
    "confidential",
];

/// Devanagari character to phonetic Latin
const TRANSLITERATION_MAP: [(char, &str); 65] = [
    ('अ', "a"),
    ('आ', "aa"),
    ('इ', "i"),
    ('ई', "ee"),
    ('उ', "u"),
    ('ऊ', "oo"),
    ('ए', "e"),
    ('ऐ', "ai"),
    ('ओ', "o"),
    ('औ', "au"),
    ('क', "k"),
    ('ख', "kh"),
    ('ग', "g"),
    ('घ', "gh"),
    ('ङ', "ng"),
    ('च', "ch"),
    ('छ', "chh"),
    ('ज', "j"),
    ('झ', "jh"),
    ('ञ', "ny"),
    ('ट', "t"),
    ('ठ', "th"),
    ('ड', "d"),
    ('ढ', "dh"),
    ('ण', "n"),
    ('त', "t"),
    ('थ', "th"),
    ('द', "d"),
    ('ध', "dh"),
    ('न', "n"),
    ('प', "p"),
    ('फ', "ph"),
    ('ब', "b"),
    ('भ', "bh"),
    ('म', "m"),
    ('य', "y"),
    ('र', "r"),
    ('ल', "l"),
    ('व', "v"),
    ('श', "sh"),
    ('ष', "sh"),
    ('स', "s"),
    ('ह', "h"),
    ('ा', "a"),
    ('ि', "i"),
    ('ी', "ee"),
    ('ु', "u"),
    ('ू', "oo"),
    ('े', "e"),
    ('ै', "ai"),
    ('ो', "o"),
    ('ौ', "au"),
    ('्', ""),
    ('ं', "n"),
    ('ः', "h"),
    ('०', "0"),
    ('१', "1"),
    ('२', "2"),
    ('३', "3"),
    ('४', "4"),
    ('५', "5"),
    ('६', "6"),
    ('७', "7"),
    ('८', "8"),
    ('९', "9"),
];

/// Complex legal phrases and their plain-English replacements
static SIMPLIFICATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("hereinafter", "from now on"),
        ("hereby", "by this"),
        ("herein", "in this document"),
        ("thereof", "of that"),
        ("therein", "in that"),
        ("whereas", "since"),
        ("notwithstanding", "despite"),
        ("forthwith", "immediately"),
        ("hereunder", "under this agreement"),
        ("pursuant to", "according to"),
        ("in lieu of", "instead of"),
        ("inter alia", "among other things"),
        ("mutatis mutandis", "with necessary changes"),
        ("prima facie", "at first look"),
        ("bona fide", "genuine"),
        ("force majeure", "unforeseeable circumstances"),
    ]
    .iter()
    .map(|(term, simple)| {
        (
            Regex::new(&format!("(?i){}", regex::escape(term))).expect("valid regex"),
            *simple,
        )
    })
    .collect()
});

fn is_devanagari(ch: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&ch)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// English/Hindi language support. Stateless; glossaries are static.
#[derive(Debug, Default)]
pub struct LanguageHandler;

impl LanguageHandler {
    pub fn new() -> Self {
        Self
    }

    /// Detect the primary language by counting script membership of
    /// alphabetic characters
    pub fn detect_language(&self, text: &str) -> LanguageInfo {
        let mut hindi_chars = 0usize;
        let mut english_chars = 0usize;
        let mut total_chars = 0usize;

        for ch in text.chars() {
            if ch.is_alphabetic() {
                total_chars += 1;
                if is_devanagari(ch) {
                    hindi_chars += 1;
                } else if ch.is_ascii() {
                    english_chars += 1;
                }
            }
        }

        if total_chars == 0 {
            return LanguageInfo {
                primary_language: Language::Unknown,
                confidence: 0.0,
                is_multilingual: false,
                distribution: LanguageDistribution::default(),
            };
        }

        let hindi_pct = hindi_chars as f64 / total_chars as f64;
        let english_pct = english_chars as f64 / total_chars as f64;

        let (primary, confidence) = if hindi_pct > english_pct {
            (Language::Hindi, hindi_pct)
        } else {
            (Language::English, english_pct)
        };

        LanguageInfo {
            primary_language: primary,
            confidence,
            is_multilingual: hindi_pct.min(english_pct) > 0.1,
            distribution: LanguageDistribution {
                hindi: round3(hindi_pct),
                english: round3(english_pct),
            },
        }
    }

    /// Contiguous Devanagari segments, whitespace allowed inside a segment
    pub fn extract_hindi_segments(&self, text: &str) -> Vec<String> {
        Self::extract_segments(text, is_devanagari, |s| s.chars().any(is_devanagari))
    }

    /// Contiguous ASCII segments containing at least one letter
    pub fn extract_english_segments(&self, text: &str) -> Vec<String> {
        Self::extract_segments(
            text,
            |ch| ch.is_ascii(),
            |s| s.chars().any(|c| c.is_alphabetic()),
        )
    }

    fn extract_segments(
        text: &str,
        belongs: impl Fn(char) -> bool,
        keep: impl Fn(&str) -> bool,
    ) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();

        for ch in text.chars() {
            if belongs(ch) || ch == ' ' || ch == '\n' || ch == '\t' {
                current.push(ch);
            } else if !current.is_empty() {
                let segment = current.trim();
                if !segment.is_empty() && keep(segment) {
                    segments.push(segment.to_string());
                }
                current.clear();
            }
        }
        let segment = current.trim();
        if !segment.is_empty() && keep(segment) {
            segments.push(segment.to_string());
        }

        segments
    }

    /// Phonetic Latin rendering of Devanagari text; unmapped characters
    /// pass through unchanged
    pub fn transliterate(&self, hindi_text: &str) -> String {
        let mut result = String::with_capacity(hindi_text.len());
        for ch in hindi_text.chars() {
            match TRANSLITERATION_MAP.iter().find(|(c, _)| *c == ch) {
                Some((_, latin)) => result.push_str(latin),
                None => result.push(ch),
            }
        }
        result
    }

    /// Replace known Hindi legal terms with bracketed English equivalents
    pub fn translate_legal_terms(&self, text: &str) -> (String, Vec<(String, String)>) {
        let mut translated = text.to_string();
        let mut translations = Vec::new();

        for (hindi, english) in HINDI_LEGAL_TERMS {
            if translated.contains(hindi) {
                translated = translated.replace(hindi, &format!("[{english}]"));
                translations.push((hindi.to_string(), english.to_string()));
            }
        }

        (translated, translations)
    }

    /// Normalize multilingual text for downstream processing. English-only
    /// documents pass through untouched.
    pub fn normalize_for_analysis(&self, text: &str) -> NormalizedLanguage {
        let language_info = self.detect_language(text);

        let mut result = NormalizedLanguage {
            original_text: text.to_string(),
            normalized_text: text.to_string(),
            hindi_segments: Vec::new(),
            english_segments: Vec::new(),
            translations: Vec::new(),
            transliterated_text: None,
            language_info,
        };

        let info = &result.language_info;
        if info.is_multilingual || info.primary_language == Language::Hindi {
            result.hindi_segments = self.extract_hindi_segments(text);
            result.english_segments = self.extract_english_segments(text);

            let (normalized, translations) = self.translate_legal_terms(text);
            result.normalized_text = normalized;
            result.translations = translations;

            if result.language_info.primary_language == Language::Hindi {
                result.transliterated_text = Some(self.transliterate(text));
            }
        }

        tracing::debug!(
            language = result.language_info.primary_language.as_str(),
            multilingual = result.language_info.is_multilingual,
            translations = result.translations.len(),
            "Normalized language"
        );

        result
    }

    /// Legal vocabulary found in each language
    pub fn detect_legal_terms(&self, text: &str) -> DetectedLegalTerms {
        let text_lower = text.to_lowercase();
        DetectedLegalTerms {
            english_terms: ENGLISH_LEGAL_TERMS
                .iter()
                .filter(|term| text_lower.contains(*term))
                .map(|t| t.to_string())
                .collect(),
            hindi_terms: HINDI_LEGAL_TERMS
                .iter()
                .filter(|(hindi, _)| text.contains(hindi))
                .map(|(hindi, _)| hindi.to_string())
                .collect(),
        }
    }

    /// Replace archaic legalese with plain English
    pub fn simplify_english(&self, text: &str) -> String {
        let mut simplified = text.to_string();
        for (pattern, replacement) in SIMPLIFICATIONS.iter() {
            simplified = pattern.replace_all(&simplified, *replacement).into_owned();
        }
        simplified
    }

    /// Word and script statistics for the document
    pub fn language_stats(&self, text: &str) -> LanguageStats {
        let info = self.detect_language(text);
        let hindi_words: usize = self
            .extract_hindi_segments(text)
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum();
        let english_words: usize = self
            .extract_english_segments(text)
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum();

        LanguageStats {
            primary_language: info.primary_language,
            confidence: info.confidence,
            is_multilingual: info.is_multilingual,
            distribution: info.distribution,
            word_count: text.split_whitespace().count(),
            hindi_word_count: hindi_words,
            english_word_count: english_words,
            legal_terms_detected: self.detect_legal_terms(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_unknown() {
        let handler = LanguageHandler::new();
        let info = handler.detect_language("");
        assert_eq!(info.primary_language, Language::Unknown);
        assert_eq!(info.primary_language.code(), "und");
        assert_eq!(info.confidence, 0.0);
        assert!(!info.is_multilingual);
    }

    #[test]
    fn digits_and_punctuation_are_unknown() {
        let handler = LanguageHandler::new();
        let info = handler.detect_language("123 456 --- !!!");
        assert_eq!(info.primary_language, Language::Unknown);
    }

    #[test]
    fn english_text_detected_with_full_confidence() {
        let handler = LanguageHandler::new();
        let info = handler.detect_language("This agreement is made between the parties.");
        assert_eq!(info.primary_language, Language::English);
        assert_eq!(info.primary_language.code(), "en");
        assert!((info.confidence - 1.0).abs() < 1e-9);
        assert!(!info.is_multilingual);
    }

    #[test]
    fn devanagari_text_detected_as_hindi() {
        let handler = LanguageHandler::new();
        let info = handler.detect_language("यह अनुबंध पक्षों के बीच है");
        assert_eq!(info.primary_language, Language::Hindi);
        assert_eq!(info.primary_language.code(), "hi");
        assert!(info.confidence > 0.9);
    }

    #[test]
    fn mixed_text_is_multilingual() {
        let handler = LanguageHandler::new();
        let info =
            handler.detect_language("This अनुबंध between the पक्ष shall include भुगतान terms");
        assert!(info.is_multilingual);
        assert!(info.distribution.hindi > 0.1);
        assert!(info.distribution.english > 0.1);
    }

    #[test]
    fn segments_split_on_script_boundaries() {
        let handler = LanguageHandler::new();
        let text = "Payment of रुपये due monthly";
        let hindi = handler.extract_hindi_segments(text);
        assert_eq!(hindi, vec!["रुपये".to_string()]);
        let english = handler.extract_english_segments(text);
        assert_eq!(english.len(), 2);
        assert_eq!(english[0], "Payment of");
    }

    #[test]
    fn glossary_terms_get_bracketed_translations() {
        let handler = LanguageHandler::new();
        let (translated, translations) =
            handler.translate_legal_terms("यह अनुबंध में भुगतान की शर्तें हैं");
        assert!(translated.contains("[contract]"));
        assert!(translated.contains("[payment]"));
        assert!(translated.contains("[terms]"));
        assert_eq!(translations.len(), 3);
    }

    #[test]
    fn english_only_text_passes_through_normalization() {
        let handler = LanguageHandler::new();
        let result = handler.normalize_for_analysis("Plain English contract text.");
        assert_eq!(result.normalized_text, result.original_text);
        assert!(result.translations.is_empty());
        assert!(result.transliterated_text.is_none());
    }

    #[test]
    fn hindi_text_gets_transliteration() {
        let handler = LanguageHandler::new();
        let result = handler.normalize_for_analysis("नोटिस अवधि");
        assert_eq!(result.language_info.primary_language, Language::Hindi);
        assert!(result.transliterated_text.is_some());
    }

    #[test]
    fn simplification_replaces_legalese_case_insensitively() {
        let handler = LanguageHandler::new();
        let simplified =
            handler.simplify_english("WHEREAS the party shall act forthwith pursuant to law");
        assert!(simplified.contains("since"));
        assert!(simplified.contains("immediately"));
        assert!(simplified.contains("according to"));
    }

    #[test]
    fn stats_count_words_per_script() {
        let handler = LanguageHandler::new();
        let stats = handler.language_stats("Payment of रुपये due");
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.hindi_word_count, 1);
        assert_eq!(stats.english_word_count, 3);
        assert!(stats
            .legal_terms_detected
            .hindi_terms
            .contains(&"रुपये".to_string()));
    }
}
