//! # Text Normalizer Module
//!
//! ## Purpose
//! Multi-stage cleaning and normalization pipeline for raw contract text.
//! This is the leaf component of the analysis pipeline: it consumes the plain
//! Unicode text produced by the external document extractor and prepares it
//! for the clause parser and downstream analyzers.
//!
//! ## Input/Output Specification
//! - **Input**: Raw contract text (already extracted from PDF/DOCX/TXT)
//! - **Output**: Cleaned/normalized text, sentences, tokens, sections,
//!   document metadata, legal keyword frequencies
//!
//! ## Key Features
//! - Whitespace and encoding artifact cleanup (line structure preserved)
//! - Legal abbreviation expansion (inc., ltd., pvt., rs., w.e.f., ...)
//! - Date and currency normalization (₹/Rs./Rupees → INR, lakh/crore digits)
//! - Party reference canonicalization (FIRST_PARTY / SECOND_PARTY)
//! - Abbreviation-safe sentence splitting and word tokenization
//! - Section marker extraction and topic segmentation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Legal abbreviations expanded during normalization. Order matters: longer
/// forms first so "w.e.f." is not partially consumed by "e.g.".
const LEGAL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("w.r.t.", "with respect to"),
    ("w.e.f.", "with effect from"),
    ("i.e.", "that is"),
    ("e.g.", "for example"),
    ("etc.", "et cetera"),
    ("viz.", "namely"),
    ("inc.", "incorporated"),
    ("ltd.", "limited"),
    ("pvt.", "private"),
    ("llp", "limited liability partnership"),
    ("llc", "limited liability company"),
    ("corp.", "corporation"),
    ("govt.", "government"),
    ("nos.", "numbers"),
    ("no.", "number"),
    ("co.", "company"),
    ("rs.", "rupees"),
];

/// Abbreviation patterns compiled once: word-boundary-anchored so "rs." never
/// matches inside "hours."
static LEGAL_ABBREVIATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    LEGAL_ABBREVIATIONS
        .iter()
        .map(|(abbr, expansion)| {
            (
                Regex::new(&format!(r"(?i)\b{}", regex::escape(abbr)))
                    .expect("escaped abbreviation is a valid pattern"),
                *expansion,
            )
        })
        .collect()
});

/// Stopwords removed during optional token filtering. Legal operators such as
/// "shall"/"must"/"may" are deliberately excluded: they carry meaning in
/// contract text.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do",
        "does", "did", "could", "might", "can", "this", "that", "these", "those", "it", "its",
        "they", "them", "their", "we", "our", "you", "your", "he", "she", "him", "her", "his",
        "i", "me", "my", "who", "which", "what", "when", "where", "why", "how", "all", "each",
        "every", "both", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
        "only", "own", "same", "so", "than", "too", "very", "just", "also", "now", "here",
        "there", "then",
    ]
    .into_iter()
    .collect()
});

/// Legal keywords tallied by [`TextNormalizer::legal_keyword_frequencies`]
const LEGAL_KEYWORDS: &[&str] = &[
    "agreement",
    "contract",
    "party",
    "parties",
    "shall",
    "must",
    "obligation",
    "liability",
    "indemnify",
    "terminate",
    "termination",
    "breach",
    "default",
    "remedy",
    "damages",
    "penalty",
    "warranty",
    "representation",
    "covenant",
    "condition",
    "precedent",
    "subsequent",
    "confidential",
    "proprietary",
    "intellectual property",
    "jurisdiction",
    "arbitration",
    "dispute",
    "governing law",
    "force majeure",
    "assignment",
    "waiver",
    "amendment",
    "notice",
    "effective date",
    "term",
    "renewal",
];

/// Section marker patterns with their approximate hierarchy level. Checked in
/// declaration order; the first match wins.
static SECTION_MARKERS: Lazy<Vec<(Regex, usize)>> = Lazy::new(|| {
    [
        (r"^\d+\.\s", 1),
        (r"^\d+\.\d+\s", 2),
        (r"^\d+\.\d+\.\d+\s", 3),
        (r"^[a-z]\)\s", 2),
        (r"^\([a-z]\)\s", 2),
        (r"^[ivxlcdm]+\.\s", 3),
        (r"^\([ivxlcdm]+\)\s", 3),
        (r"(?i)^ARTICLE\s+\d+", 1),
        (r"(?i)^SECTION\s+\d+", 1),
        (r"(?i)^CLAUSE\s+\d+", 1),
        (r"(?i)^SCHEDULE\s+[A-Z\d]", 1),
    ]
    .iter()
    .map(|(p, level)| (Regex::new(p).expect("valid section marker pattern"), *level))
    .collect()
});

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static PAGE_NUMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Page\s+\d+\s+of\s+\d+").expect("valid regex"));
static PAGE_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*\d+\s*-").expect("valid regex"));
static MANY_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{4,}").expect("valid regex"));
static FIRST_PARTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:first\s+party|party\s+of\s+the\s+first\s+part)\b").expect("valid regex")
});
static SECOND_PARTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:second\s+party|party\s+of\s+the\s+second\s+part)\b")
        .expect("valid regex")
});
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})\b").expect("valid regex"));
static RUPEE_SIGN: Lazy<Regex> = Lazy::new(|| Regex::new(r"₹\s*").expect("valid regex"));
static RS_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bRs\.?\s*").expect("valid regex"));
static RUPEES_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bRupees?\s*").expect("valid regex"));
static LAKH_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*lakhs?").expect("valid regex"));
static CRORE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*crores?").expect("valid regex"));
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));
static SCHEDULE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SCHEDULE\s+[A-Z\d]").expect("valid regex"));
static ANNEXURE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ANNEXURE\s+[A-Z\d]").expect("valid regex"));
static EXHIBIT_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)EXHIBIT\s+[A-Z\d]").expect("valid regex"));

/// Normalized text bundle produced by one pass over a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedText {
    /// Original text as received
    pub original_text: String,
    /// Text after basic cleanup (whitespace, artifacts, quotes, dashes)
    pub cleaned_text: String,
    /// Text after legal-term, date, and currency normalization
    pub normalized_text: String,
    /// Sentences (abbreviation-safe split, fragments under 3 words dropped)
    pub sentences: Vec<String>,
    /// Lowercased word tokens
    pub tokens: Vec<String>,
    /// Sections recognized by the fixed marker list
    pub sections: Vec<Section>,
    /// Document statistics
    pub metadata: DocumentMetadata,
}

/// A document section delimited by a recognized marker line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// The marker line itself
    pub header: String,
    /// Approximate hierarchy level (1-3)
    pub level: usize,
    /// Body text up to the next marker
    pub content: String,
}

/// Document statistics computed from the raw text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub has_schedules: bool,
    pub has_annexures: bool,
    pub has_exhibits: bool,
    /// Rough estimate: one page per 3000 characters, minimum one
    pub estimated_pages: usize,
}

/// Text normalization pipeline. Stateless; all rule tables are static.
#[derive(Debug, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Run the full normalization pipeline
    pub fn normalize(&self, text: &str) -> NormalizedText {
        tracing::debug!("Normalizing text: {} characters", text.len());

        let cleaned = self.basic_clean(text);
        let normalized = self.normalize_legal_terms(&cleaned);
        let sections = self.extract_sections(&normalized);
        let sentences = self.tokenize_sentences(&normalized);
        let tokens = self.tokenize_words(&normalized, false);
        let metadata = self.metadata(text);

        NormalizedText {
            original_text: text.to_string(),
            cleaned_text: cleaned,
            normalized_text: normalized,
            sentences,
            tokens,
            sections,
            metadata,
        }
    }

    /// Basic cleanup: NFC normalization, whitespace collapse (line structure
    /// preserved so the clause parser still sees headers on their own lines),
    /// page artifacts, smart quotes, dashes, ellipsis runs
    pub fn basic_clean(&self, text: &str) -> String {
        let mut cleaned: String = text.nfc().collect();

        cleaned = PAGE_NUMBERS.replace_all(&cleaned, "").to_string();
        cleaned = PAGE_DASHES.replace_all(&cleaned, "").to_string();
        cleaned = SPACES.replace_all(&cleaned, " ").to_string();
        cleaned = BLANK_RUNS.replace_all(&cleaned, "\n\n").to_string();

        cleaned = cleaned
            .replace('\u{201C}', "\"")
            .replace('\u{201D}', "\"")
            .replace('\u{2018}', "'")
            .replace('\u{2019}', "'")
            .replace('\u{2013}', "-")
            .replace('\u{2014}', "-");

        cleaned = MANY_DOTS.replace_all(&cleaned, "...").to_string();

        // Drop control characters but keep line breaks and tabs
        cleaned = cleaned
            .chars()
            .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
            .collect();

        cleaned.trim().to_string()
    }

    /// Expand legal abbreviations, canonicalize party references, and
    /// normalize date and currency representations
    pub fn normalize_legal_terms(&self, text: &str) -> String {
        let mut normalized = text.to_string();

        for (pattern, expansion) in LEGAL_ABBREVIATION_PATTERNS.iter() {
            normalized = pattern.replace_all(&normalized, *expansion).to_string();
        }

        normalized = FIRST_PARTY.replace_all(&normalized, "FIRST_PARTY").to_string();
        normalized = SECOND_PARTY
            .replace_all(&normalized, "SECOND_PARTY")
            .to_string();

        normalized = self.normalize_dates(&normalized);
        normalized = self.normalize_currency(&normalized);

        normalized
    }

    /// Normalize numeric date separators to `/`
    pub fn normalize_dates(&self, text: &str) -> String {
        NUMERIC_DATE.replace_all(text, "${1}/${2}/${3}").to_string()
    }

    /// Normalize currency markers to `INR ` and rewrite lakh/crore amounts
    /// into Indian digit grouping
    pub fn normalize_currency(&self, text: &str) -> String {
        let mut normalized = RUPEE_SIGN.replace_all(text, "INR ").to_string();
        normalized = RS_PREFIX.replace_all(&normalized, "INR ").to_string();
        normalized = RUPEES_WORD.replace_all(&normalized, "INR ").to_string();
        normalized = LAKH_NUMBER
            .replace_all(&normalized, "${1},00,000")
            .to_string();
        normalized = CRORE_NUMBER
            .replace_all(&normalized, "${1},00,00,000")
            .to_string();
        normalized
    }

    /// Extract sections delimited by recognized marker lines
    pub fn extract_sections(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;
        let mut content: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let marker = SECTION_MARKERS
                .iter()
                .find(|(pattern, _)| pattern.is_match(line));

            if let Some((_, level)) = marker {
                if let Some(mut section) = current.take() {
                    section.content = content.join(" ");
                    sections.push(section);
                }
                current = Some(Section {
                    header: line.to_string(),
                    level: *level,
                    content: String::new(),
                });
                content.clear();
            } else {
                content.push(line);
            }
        }

        if let Some(mut section) = current.take() {
            section.content = content.join(" ");
            sections.push(section);
        }

        sections
    }

    /// Split text into sentences, shielding abbreviation periods from the
    /// sentence boundary pattern. Fragments under three words are dropped as
    /// tokenization artifacts.
    pub fn tokenize_sentences(&self, text: &str) -> Vec<String> {
        let mut shielded = text.to_string();
        for (abbr, _) in LEGAL_ABBREVIATIONS {
            if abbr.contains('.') {
                shielded = shielded.replace(abbr, &abbr.replace('.', "<DOT>"));
            }
        }

        SENTENCE_SPLIT
            .split(&shielded)
            .map(|s| s.replace("<DOT>", ".").trim().to_string())
            .filter(|s| s.split_whitespace().count() >= 3)
            .collect()
    }

    /// Tokenize into lowercased words, optionally removing stopwords (legal
    /// operators like "shall" are never removed)
    pub fn tokenize_words(&self, text: &str, remove_stopwords: bool) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|t| !remove_stopwords || !STOPWORDS.contains(t.as_str()))
            .collect()
    }

    /// Compute document statistics from raw text
    pub fn metadata(&self, text: &str) -> DocumentMetadata {
        let sentence_count = self.tokenize_sentences(text).len();
        DocumentMetadata {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            sentence_count,
            has_schedules: SCHEDULE_REF.is_match(text),
            has_annexures: ANNEXURE_REF.is_match(text),
            has_exhibits: EXHIBIT_REF.is_match(text),
            estimated_pages: std::cmp::max(1, text.chars().count() / 3000),
        }
    }

    /// Tally legal keyword occurrences, sorted by frequency descending
    pub fn legal_keyword_frequencies(&self, text: &str) -> Vec<(String, usize)> {
        static KEYWORD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
            LEGAL_KEYWORDS
                .iter()
                .map(|keyword| {
                    (
                        *keyword,
                        Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
                            .expect("escaped keyword is a valid pattern"),
                    )
                })
                .collect()
        });

        let text_lower = text.to_lowercase();
        let mut frequencies: Vec<(String, usize)> = KEYWORD_PATTERNS
            .iter()
            .filter_map(|(keyword, pattern)| {
                let count = pattern.find_iter(&text_lower).count();
                (count > 0).then(|| (keyword.to_string(), count))
            })
            .collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1));
        frequencies
    }

    /// Group section contents under common legal topics by header keywords
    pub fn segment_by_topic(&self, text: &str) -> BTreeMap<String, String> {
        static TOPIC_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
            [
                ("preamble", r"(WHEREAS|RECITALS|BACKGROUND)"),
                ("definitions", r"(DEFINITIONS|INTERPRETATION)"),
                ("scope", r"(SCOPE\s+OF\s+WORK|SERVICES|DELIVERABLES)"),
                ("payment", r"(PAYMENT|COMPENSATION|FEES|CONSIDERATION)"),
                ("term_termination", r"(TERM|DURATION|TERMINATION)"),
                ("confidentiality", r"(CONFIDENTIAL|NON-DISCLOSURE)"),
                ("ip_rights", r"(INTELLECTUAL\s+PROPERTY|IP\s+RIGHTS|COPYRIGHT)"),
                ("indemnification", r"(INDEMNIF|HOLD\s+HARMLESS)"),
                ("limitation_liability", r"(LIMITATION\s+OF\s+LIABILITY|LIABILITY\s+CAP)"),
                ("dispute_resolution", r"(DISPUTE|ARBITRATION|JURISDICTION)"),
                ("general_provisions", r"(GENERAL|MISCELLANEOUS|BOILERPLATE)"),
            ]
            .iter()
            .map(|(topic, pattern)| (*topic, Regex::new(pattern).expect("valid topic pattern")))
            .collect()
        });

        let mut topics: BTreeMap<String, String> = BTreeMap::new();

        for section in self.extract_sections(text) {
            let header_upper = section.header.to_uppercase();
            if let Some((topic, _)) = TOPIC_PATTERNS
                .iter()
                .find(|(_, pattern)| pattern.is_match(&header_upper))
            {
                let entry = topics.entry(topic.to_string()).or_default();
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(&section.content);
            }
        }

        topics.retain(|_, content| !content.trim().is_empty());
        topics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_page_artifacts_and_quotes() {
        let normalizer = TextNormalizer::new();
        let cleaned = normalizer.basic_clean("Term \u{201C}quoted\u{201D}  text\nPage 3 of 12");
        assert!(cleaned.contains("\"quoted\""));
        assert!(!cleaned.contains("Page 3 of 12"));
        assert!(!cleaned.contains("  "));
    }

    #[test]
    fn preserves_line_structure() {
        let normalizer = TextNormalizer::new();
        let cleaned = normalizer.basic_clean("1. DEFINITIONS\nBody text here.\n\n\n\n2. PAYMENT");
        assert_eq!(cleaned.lines().count(), 4);
    }

    #[test]
    fn expands_abbreviations() {
        let normalizer = TextNormalizer::new();
        let normalized = normalizer.normalize_legal_terms("Acme Pvt. Ltd. w.e.f. 1/4/2025");
        assert!(normalized.contains("private"));
        assert!(normalized.contains("limited"));
        assert!(normalized.contains("with effect from"));
    }

    #[test]
    fn normalizes_currency_to_inr() {
        let normalizer = TextNormalizer::new();
        let normalized = normalizer.normalize_currency("₹ 5,000 and Rs. 100 and 2 lakh");
        assert!(normalized.contains("INR 5,000"));
        assert!(normalized.contains("INR 100"));
        assert!(normalized.contains("2,00,000"));
    }

    #[test]
    fn canonicalizes_party_references() {
        let normalizer = TextNormalizer::new();
        let normalized =
            normalizer.normalize_legal_terms("the Party of the First Part agrees with the second party");
        assert!(normalized.contains("FIRST_PARTY"));
        assert!(normalized.contains("SECOND_PARTY"));
    }

    #[test]
    fn sentence_split_drops_short_fragments() {
        let normalizer = TextNormalizer::new();
        let sentences = normalizer
            .tokenize_sentences("The party shall pay on time. Yes. Notice must be in writing.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn stopword_removal_keeps_legal_operators() {
        let normalizer = TextNormalizer::new();
        let tokens = normalizer.tokenize_words("The Employee shall not disclose", true);
        assert!(tokens.contains(&"shall".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
    }

    #[test]
    fn sections_follow_marker_order() {
        let normalizer = TextNormalizer::new();
        let sections =
            normalizer.extract_sections("1. DEFINITIONS\nTerms defined here.\n2. PAYMENT\nPay now.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "Terms defined here.");
    }

    #[test]
    fn keyword_frequencies_sorted_descending() {
        let normalizer = TextNormalizer::new();
        let frequencies = normalizer
            .legal_keyword_frequencies("The agreement covers the agreement terms and one penalty.");
        assert_eq!(frequencies[0].0, "agreement");
        assert_eq!(frequencies[0].1, 2);
    }

    #[test]
    fn metadata_reports_minimum_one_page() {
        let normalizer = TextNormalizer::new();
        let metadata = normalizer.metadata("short text");
        assert_eq!(metadata.estimated_pages, 1);
        assert!(!metadata.has_schedules);
    }
}
