//! # Entity Extractor Module
//!
//! ## Purpose
//! Named entity recognition for contract documents: parties, dates, monetary
//! amounts, durations, jurisdictions, obligations, rights, prohibitions,
//! deliverables, and notice periods.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized contract text
//! - **Output**: [`ExtractedEntities`] grouping [`LegalEntity`] hits per kind,
//!   with counters for date/amount candidates that failed to parse
//!
//! ## Key Features
//! - Party detection via preamble, company-suffix, and alias patterns, with a
//!   capitalized-span fallback for names the patterns miss
//! - Three date families normalized to YYYY-MM-DD, day-first for numeric dates
//! - Currency detection (INR/USD/EUR/GBP, lakh/crore multipliers)
//! - Context-based retagging (effective/expiry/execution dates, penalty/
//!   payment/deposit/liability amounts)
//! - Indian jurisdiction gazetteer gated by nearby legal vocabulary

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::Config;

/// Closed set of entity kinds produced by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Party,
    Date,
    EffectiveDate,
    ExpiryDate,
    ExecutionDate,
    Amount,
    PenaltyAmount,
    PaymentAmount,
    DepositAmount,
    LiabilityCap,
    Duration,
    Jurisdiction,
    Obligation,
    Right,
    Prohibition,
    Deliverable,
    NoticePeriod,
}

/// One extracted entity with its source span and surrounding context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalEntity {
    pub entity_type: EntityType,
    pub value: String,
    pub start_pos: usize,
    pub end_pos: usize,
    pub confidence: f64,
    pub context: String,
    pub normalized_value: Option<String>,
}

/// All entities extracted from one document. Candidates that matched a
/// pattern but failed validation (unparseable dates, non-numeric amounts) are
/// not silently discarded: their counts are surfaced here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub parties: Vec<LegalEntity>,
    pub dates: Vec<LegalEntity>,
    pub amounts: Vec<LegalEntity>,
    pub durations: Vec<LegalEntity>,
    pub jurisdictions: Vec<LegalEntity>,
    pub obligations: Vec<LegalEntity>,
    pub rights: Vec<LegalEntity>,
    pub prohibitions: Vec<LegalEntity>,
    pub deliverables: Vec<LegalEntity>,
    pub notice_periods: Vec<LegalEntity>,
    pub dropped_date_candidates: usize,
    pub dropped_amount_candidates: usize,
}

/// Aggregate view over extracted entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySummary {
    pub total_entities: usize,
    pub entity_counts: BTreeMap<String, usize>,
    pub key_parties: Vec<String>,
    pub key_dates: Vec<String>,
    pub total_amounts: Vec<String>,
    pub jurisdictions: Vec<String>,
    pub obligation_count: usize,
    pub right_count: usize,
    pub prohibition_count: usize,
    pub dropped_date_candidates: usize,
    pub dropped_amount_candidates: usize,
}

/// Indian states, union territories, and major cities for jurisdiction
/// detection
const INDIAN_JURISDICTIONS: &[&str] = &[
    "andhra pradesh",
    "arunachal pradesh",
    "assam",
    "bihar",
    "chhattisgarh",
    "goa",
    "gujarat",
    "haryana",
    "himachal pradesh",
    "jharkhand",
    "karnataka",
    "kerala",
    "madhya pradesh",
    "maharashtra",
    "manipur",
    "meghalaya",
    "mizoram",
    "nagaland",
    "odisha",
    "punjab",
    "rajasthan",
    "sikkim",
    "tamil nadu",
    "telangana",
    "tripura",
    "uttar pradesh",
    "uttarakhand",
    "west bengal",
    "delhi",
    "new delhi",
    "mumbai",
    "bangalore",
    "bengaluru",
    "chennai",
    "hyderabad",
    "kolkata",
    "pune",
    "ahmedabad",
    "jaipur",
    "lucknow",
];

/// Suffixes that mark an organization name
const PARTY_INDICATORS: &[&str] = &[
    r"private\s+limited",
    r"pvt\.?\s*ltd\.?",
    r"limited",
    r"ltd\.?",
    r"llp",
    r"llc",
    r"inc\.?",
    r"incorporated",
    r"corporation",
    r"corp\.?",
    r"partnership",
    r"proprietorship",
    r"sole\s+proprietor",
    r"company",
    r"co\.?",
    r"enterprises?",
    r"industries",
    r"solutions",
    r"technologies",
    r"services",
    r"consultants?",
    r"associates?",
];

/// Currency patterns paired with a currency tag. The lakh/crore entries carry
/// a multiplier applied during normalization.
static CURRENCY_PATTERNS: Lazy<Vec<(Regex, &'static str, f64)>> = Lazy::new(|| {
    [
        (r"(?i)(?:INR|Rs\.?|₹)\s*([\d,]+(?:\.\d{2})?)", "INR", 1.0),
        (r"(?i)(?:USD|\$)\s*([\d,]+(?:\.\d{2})?)", "USD", 1.0),
        (r"(?i)(?:EUR|€)\s*([\d,]+(?:\.\d{2})?)", "EUR", 1.0),
        (r"(?i)(?:GBP|£)\s*([\d,]+(?:\.\d{2})?)", "GBP", 1.0),
        (r"(?i)([\d,]+(?:\.\d{2})?)\s*(?:lakhs?|lacs?)", "INR", 100_000.0),
        (r"(?i)([\d,]+(?:\.\d{2})?)\s*(?:crores?)", "INR", 10_000_000.0),
    ]
    .iter()
    .map(|(p, tag, mult)| (Regex::new(p).expect("valid currency pattern"), *tag, *mult))
    .collect()
});

const OBLIGATION_KEYWORDS: &[&str] = &[
    "shall",
    "must",
    "will",
    "agrees to",
    "undertakes to",
    "is required to",
    "is obligated to",
    "commits to",
];

const RIGHT_KEYWORDS: &[&str] = &[
    "may",
    "is entitled to",
    "has the right to",
    "can",
    "is authorized to",
    "is permitted to",
    "reserves the right",
];

const PROHIBITION_KEYWORDS: &[&str] = &[
    "shall not",
    "must not",
    "will not",
    "cannot",
    "is prohibited from",
    "is not permitted to",
    "is not allowed to",
    "may not",
];

fn statement_patterns(keywords: &'static [&'static str]) -> Vec<(&'static str, Regex)> {
    keywords
        .iter()
        .map(|keyword| {
            let pattern = format!(r"(?i){}\s+(.+?)(?:\.|;|$)", regex::escape(keyword));
            (
                *keyword,
                Regex::new(&pattern).expect("escaped keyword is a valid pattern"),
            )
        })
        .collect()
}

static OBLIGATION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| statement_patterns(OBLIGATION_KEYWORDS));
static RIGHT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| statement_patterns(RIGHT_KEYWORDS));
static PROHIBITION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> =
    Lazy::new(|| statement_patterns(PROHIBITION_KEYWORDS));

static PARTY_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:BETWEEN|between)\s+([A-Z][A-Za-z\s\.,]+?)(?:\s*\(|,\s*(?:a|an)\s+)")
        .expect("valid regex")
});
static PARTY_SUFFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PARTY_INDICATORS
        .iter()
        .map(|indicator| {
            Regex::new(&format!(r"(?i)([A-Z][A-Za-z\s&\-\.]+\s+{})", indicator))
                .expect("valid party suffix pattern")
        })
        .collect()
});
static PARTY_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)([A-Z][A-Za-z\s\.,]+?)\s*\(?\s*hereinafter\s+(?:referred\s+to\s+as|called)\s*["']?([A-Za-z\s]+)["']?\)?"#,
    )
    .expect("valid regex")
});
static CAPITALIZED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)\b").expect("valid regex"));

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})\b").expect("valid regex"));
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b({})\s+(\d{{1,2}}),?\s+(\d{{4}})\b", MONTHS)).expect("valid regex")
});
static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s+({})\s+(\d{{4}})\b", MONTHS)).expect("valid regex")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(years?|yrs?|months?|mos?|weeks?|wks?|days?|hours?|hrs?)")
        .expect("valid regex")
});

static JURISDICTION_CLAUSES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:jurisdiction|courts?\s+of|governed\s+by\s+the\s+laws?\s+of|subject\s+to)\s+([A-Za-z\s,]+?)(?:\.|,|\s+and|\s+shall)",
        r"(?i)(?:courts?\s+at|courts?\s+in)\s+([A-Za-z\s]+?)(?:\s+shall|\s+will|\.|,)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid jurisdiction pattern"))
    .collect()
});
static GAZETTEER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    INDIAN_JURISDICTIONS
        .iter()
        .map(|j| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(j)))
                .expect("escaped place name is a valid pattern")
        })
        .collect()
});

static DELIVERABLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:deliver|provide|submit|complete)\s+(?:the\s+)?(.+?)(?:\s+within|\s+by|\s+on|\.)",
        r"(?i)(?:deliverable|milestone|output):\s*(.+?)(?:\.|;|$)",
        r"(?i)(?:phase|stage)\s+\d+[:\s]+(.+?)(?:\.|;|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid deliverable pattern"))
    .collect()
});

static NOTICE_PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:notice\s+(?:period\s+)?of|prior\s+(?:written\s+)?notice\s+of|advance\s+notice\s+of)\s+(\d+)\s*(days?|weeks?|months?)",
    )
    .expect("valid regex")
});

/// Slice `text` by byte offsets, widened outward to char boundaries
fn safe_slice(text: &str, start: usize, end: usize) -> &str {
    let mut start = start.min(text.len());
    let mut end = end.min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

/// Format an amount with western thousands grouping and two decimals
fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };
    let digits: Vec<char> = int_part.chars().rev().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    let int_grouped: String = grouped.chars().rev().collect();
    format!("{}.{}", int_grouped, frac_part)
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}

/// Named entity extraction over contract text. Pattern tables are static;
/// the struct only carries tunables taken from [`Config`].
#[derive(Debug)]
pub struct LegalEntityExtractor {
    /// Only this many leading bytes are scanned by the capitalized-span
    /// fallback, matching how much text is worth the quadratic-ish cost
    ner_text_limit: usize,
    enable_generic_ner: bool,
}

impl Default for LegalEntityExtractor {
    fn default() -> Self {
        Self {
            ner_text_limit: 50_000,
            enable_generic_ner: true,
        }
    }
}

impl LegalEntityExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            ner_text_limit: config.limits.ner_text_limit,
            enable_generic_ner: config.analysis.enable_generic_ner,
        }
    }

    /// Extract every entity kind from the text
    pub fn extract_all_entities(&self, text: &str) -> ExtractedEntities {
        let (dates, dropped_dates) = self.extract_dates(text);
        let (amounts, dropped_amounts) = self.extract_amounts(text);

        if dropped_dates > 0 || dropped_amounts > 0 {
            tracing::debug!(
                dropped_dates,
                dropped_amounts,
                "Dropped unparseable entity candidates"
            );
        }

        ExtractedEntities {
            parties: self.extract_parties(text),
            dates,
            amounts,
            durations: self.extract_durations(text),
            jurisdictions: self.extract_jurisdictions(text),
            obligations: self.extract_statements(text, &OBLIGATION_PATTERNS, EntityType::Obligation),
            rights: self.extract_statements(text, &RIGHT_PATTERNS, EntityType::Right),
            prohibitions: self.extract_statements(
                text,
                &PROHIBITION_PATTERNS,
                EntityType::Prohibition,
            ),
            deliverables: self.extract_deliverables(text),
            notice_periods: self.extract_notice_periods(text),
            dropped_date_candidates: dropped_dates,
            dropped_amount_candidates: dropped_amounts,
        }
    }

    /// Extract contract parties (companies, individuals)
    pub fn extract_parties(&self, text: &str) -> Vec<LegalEntity> {
        let mut parties: Vec<LegalEntity> = Vec::new();

        for captures in PARTY_PREAMBLE.captures_iter(text) {
            let full = captures.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            if let Some(group) = captures.get(1) {
                let name = group.as_str().trim();
                if name.len() > 3 {
                    parties.push(LegalEntity {
                        entity_type: EntityType::Party,
                        value: name.to_string(),
                        start_pos: group.start(),
                        end_pos: group.end(),
                        confidence: 0.9,
                        context: safe_slice(text, full.0.saturating_sub(50), full.1 + 50)
                            .to_string(),
                        normalized_value: None,
                    });
                }
            }
        }

        for pattern in PARTY_SUFFIX_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let full = captures.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
                if let Some(group) = captures.get(1) {
                    let name = group.as_str().trim();
                    if name.len() > 5 && !parties.iter().any(|p| p.value == name) {
                        parties.push(LegalEntity {
                            entity_type: EntityType::Party,
                            value: name.to_string(),
                            start_pos: group.start(),
                            end_pos: group.end(),
                            confidence: 0.85,
                            context: safe_slice(text, full.0.saturating_sub(30), full.1 + 30)
                                .to_string(),
                            normalized_value: None,
                        });
                    }
                }
            }
        }

        for captures in PARTY_ALIAS.captures_iter(text) {
            let full = captures.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            if let (Some(group), Some(alias)) = (captures.get(1), captures.get(2)) {
                let name = group.as_str().trim();
                if name.len() > 3 {
                    parties.push(LegalEntity {
                        entity_type: EntityType::Party,
                        value: name.to_string(),
                        start_pos: group.start(),
                        end_pos: group.end(),
                        confidence: 0.95,
                        context: safe_slice(text, full.0.saturating_sub(20), full.1 + 20)
                            .to_string(),
                        normalized_value: Some(alias.as_str().trim().to_string()),
                    });
                }
            }
        }

        // Fallback over the leading slice: multi-word capitalized spans that
        // no structured pattern caught
        if self.enable_generic_ner {
            let scan = safe_slice(text, 0, self.ner_text_limit);
            for captures in CAPITALIZED_SPAN.captures_iter(scan) {
                if let Some(group) = captures.get(1) {
                    let name = group.as_str();
                    let already_seen = parties
                        .iter()
                        .any(|p| p.value.to_lowercase() == name.to_lowercase());
                    if !already_seen {
                        parties.push(LegalEntity {
                            entity_type: EntityType::Party,
                            value: name.to_string(),
                            start_pos: group.start(),
                            end_pos: group.end(),
                            confidence: 0.7,
                            context: safe_slice(
                                scan,
                                group.start().saturating_sub(30),
                                group.end() + 30,
                            )
                            .to_string(),
                            normalized_value: None,
                        });
                    }
                }
            }
        }

        deduplicate(parties)
    }

    /// Extract dates, normalized to YYYY-MM-DD. Returns the entities plus the
    /// number of candidates that matched a pattern but failed to parse.
    pub fn extract_dates(&self, text: &str) -> (Vec<LegalEntity>, usize) {
        let mut dates: Vec<LegalEntity> = Vec::new();
        let mut dropped = 0usize;

        let mut push = |value: &str, start: usize, end: usize, normalized: NaiveDate| {
            dates.push(LegalEntity {
                entity_type: EntityType::Date,
                value: value.to_string(),
                start_pos: start,
                end_pos: end,
                confidence: 0.95,
                context: safe_slice(text, start.saturating_sub(40), end + 40).to_string(),
                normalized_value: Some(normalized.format("%Y-%m-%d").to_string()),
            });
        };

        // Numeric dates, day-first with month-first fallback
        for captures in NUMERIC_DATE.captures_iter(text) {
            let (Some(whole), Some(g1), Some(g2), Some(g3)) = (
                captures.get(0),
                captures.get(1),
                captures.get(2),
                captures.get(3),
            ) else {
                continue;
            };
            let (a, b, year) = match (
                g1.as_str().parse::<u32>(),
                g2.as_str().parse::<u32>(),
                g3.as_str().parse::<i32>(),
            ) {
                (Ok(a), Ok(b), Ok(y)) => (a, b, y),
                _ => {
                    dropped += 1;
                    continue;
                }
            };
            let parsed = NaiveDate::from_ymd_opt(year, b, a)
                .or_else(|| NaiveDate::from_ymd_opt(year, a, b));
            match parsed {
                Some(date) => push(whole.as_str(), whole.start(), whole.end(), date),
                None => dropped += 1,
            }
        }

        // Month DD, YYYY
        for captures in MONTH_DAY_YEAR.captures_iter(text) {
            let (Some(whole), Some(month), Some(day), Some(year)) = (
                captures.get(0),
                captures.get(1),
                captures.get(2),
                captures.get(3),
            ) else {
                continue;
            };
            let parsed = match (
                month_number(month.as_str()),
                day.as_str().parse::<u32>(),
                year.as_str().parse::<i32>(),
            ) {
                (Some(m), Ok(d), Ok(y)) => NaiveDate::from_ymd_opt(y, m, d),
                _ => None,
            };
            match parsed {
                Some(date) => push(whole.as_str(), whole.start(), whole.end(), date),
                None => dropped += 1,
            }
        }

        // DD Month YYYY
        for captures in DAY_MONTH_YEAR.captures_iter(text) {
            let (Some(whole), Some(day), Some(month), Some(year)) = (
                captures.get(0),
                captures.get(1),
                captures.get(2),
                captures.get(3),
            ) else {
                continue;
            };
            let parsed = match (
                month_number(month.as_str()),
                day.as_str().parse::<u32>(),
                year.as_str().parse::<i32>(),
            ) {
                (Some(m), Ok(d), Ok(y)) => NaiveDate::from_ymd_opt(y, m, d),
                _ => None,
            };
            match parsed {
                Some(date) => push(whole.as_str(), whole.start(), whole.end(), date),
                None => dropped += 1,
            }
        }

        // Retag by context; rules are applied in sequence and a later rule
        // overwrites an earlier hit
        for date in &mut dates {
            let context = date.context.to_lowercase();
            if context.contains("effective") || context.contains("commencement") {
                date.entity_type = EntityType::EffectiveDate;
            }
            if context.contains("expir") || context.contains("terminat") {
                date.entity_type = EntityType::ExpiryDate;
            }
            if context.contains("sign") || context.contains("execut") {
                date.entity_type = EntityType::ExecutionDate;
            }
        }

        (deduplicate(dates), dropped)
    }

    /// Extract monetary amounts. Returns the entities plus the number of
    /// candidates dropped for failing numeric parsing.
    pub fn extract_amounts(&self, text: &str) -> (Vec<LegalEntity>, usize) {
        let mut amounts: Vec<LegalEntity> = Vec::new();
        let mut dropped = 0usize;

        for (pattern, currency, multiplier) in CURRENCY_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let (Some(whole), Some(group)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let raw = group.as_str().replace(',', "");
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                let normalized = match raw.parse::<f64>() {
                    Ok(value) => value * multiplier,
                    Err(_) => {
                        dropped += 1;
                        continue;
                    }
                };
                amounts.push(LegalEntity {
                    entity_type: EntityType::Amount,
                    value: whole.as_str().to_string(),
                    start_pos: whole.start(),
                    end_pos: whole.end(),
                    confidence: 0.9,
                    context: safe_slice(text, whole.start().saturating_sub(50), whole.end() + 50)
                        .to_string(),
                    normalized_value: Some(format!("{} {}", currency, format_amount(normalized))),
                });
            }
        }

        // Retag by context; the first matching rule wins
        for amount in &mut amounts {
            let context = amount.context.to_lowercase();
            if context.contains("penalty") || context.contains("fine") {
                amount.entity_type = EntityType::PenaltyAmount;
            } else if context.contains("payment")
                || context.contains("fee")
                || context.contains("consideration")
            {
                amount.entity_type = EntityType::PaymentAmount;
            } else if context.contains("deposit") || context.contains("security") {
                amount.entity_type = EntityType::DepositAmount;
            } else if context.contains("liability") || context.contains("cap") {
                amount.entity_type = EntityType::LiabilityCap;
            }
        }

        (deduplicate(amounts), dropped)
    }

    /// Extract time durations with canonical unit names
    pub fn extract_durations(&self, text: &str) -> Vec<LegalEntity> {
        let durations = DURATION
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let value = captures.get(1)?.as_str();
                let unit = captures.get(2)?.as_str().to_lowercase();
                let normalized_unit = if unit.starts_with('y') {
                    "years"
                } else if unit.starts_with("mo") {
                    "months"
                } else if unit.starts_with('w') {
                    "weeks"
                } else if unit.starts_with('d') {
                    "days"
                } else {
                    "hours"
                };
                Some(LegalEntity {
                    entity_type: EntityType::Duration,
                    value: whole.as_str().to_string(),
                    start_pos: whole.start(),
                    end_pos: whole.end(),
                    confidence: 0.9,
                    context: safe_slice(text, whole.start().saturating_sub(50), whole.end() + 50)
                        .to_string(),
                    normalized_value: Some(format!("{} {}", value, normalized_unit)),
                })
            })
            .collect();
        deduplicate(durations)
    }

    /// Extract jurisdiction references, tagged INDIA or FOREIGN
    pub fn extract_jurisdictions(&self, text: &str) -> Vec<LegalEntity> {
        let mut jurisdictions: Vec<LegalEntity> = Vec::new();

        for pattern in JURISDICTION_CLAUSES.iter() {
            for captures in pattern.captures_iter(text) {
                let (Some(whole), Some(group)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let value = group.as_str().trim();
                let value_lower = value.to_lowercase();
                let is_indian = INDIAN_JURISDICTIONS.iter().any(|j| value_lower.contains(j));
                jurisdictions.push(LegalEntity {
                    entity_type: EntityType::Jurisdiction,
                    value: value.to_string(),
                    start_pos: group.start(),
                    end_pos: group.end(),
                    confidence: if is_indian { 0.85 } else { 0.7 },
                    context: safe_slice(text, whole.start().saturating_sub(30), whole.end() + 30)
                        .to_string(),
                    normalized_value: Some(if is_indian { "INDIA" } else { "FOREIGN" }.to_string()),
                });
            }
        }

        // Gazetteer pass: a bare place name only counts if legal vocabulary
        // appears nearby
        for pattern in GAZETTEER_PATTERNS.iter() {
            for found in pattern.find_iter(text) {
                let context =
                    safe_slice(text, found.start().saturating_sub(100), found.end() + 100)
                        .to_lowercase();
                let legally_relevant = ["jurisdiction", "court", "law", "govern", "arbitrat"]
                    .iter()
                    .any(|kw| context.contains(kw));
                if legally_relevant {
                    jurisdictions.push(LegalEntity {
                        entity_type: EntityType::Jurisdiction,
                        value: found.as_str().to_string(),
                        start_pos: found.start(),
                        end_pos: found.end(),
                        confidence: 0.8,
                        context,
                        normalized_value: Some("INDIA".to_string()),
                    });
                }
            }
        }

        deduplicate(jurisdictions)
    }

    /// Shared keyword-sentence scan for obligations, rights, and prohibitions.
    /// The first keyword found in a sentence claims it; capped at 50 hits.
    fn extract_statements(
        &self,
        text: &str,
        patterns: &[(&str, Regex)],
        entity_type: EntityType,
    ) -> Vec<LegalEntity> {
        let mut statements = Vec::new();

        for sentence in text.split(|c| c == '.' || c == ';') {
            let sentence_lower = sentence.to_lowercase();
            for (keyword, pattern) in patterns {
                if sentence_lower.contains(keyword) {
                    if let Some(found) = pattern.find(sentence) {
                        statements.push(LegalEntity {
                            entity_type,
                            value: found.as_str().trim().to_string(),
                            start_pos: 0,
                            end_pos: 0,
                            confidence: 0.85,
                            context: sentence.trim().to_string(),
                            normalized_value: None,
                        });
                    }
                    break;
                }
            }
            if statements.len() >= 50 {
                break;
            }
        }

        statements.truncate(50);
        deduplicate(statements)
    }

    /// Extract deliverables and milestones, capped at 30
    pub fn extract_deliverables(&self, text: &str) -> Vec<LegalEntity> {
        let mut deliverables = Vec::new();

        for pattern in DELIVERABLE_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let (Some(whole), Some(group)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let value = group.as_str().trim();
                if value.len() > 5 && value.len() < 200 {
                    deliverables.push(LegalEntity {
                        entity_type: EntityType::Deliverable,
                        value: value.to_string(),
                        start_pos: group.start(),
                        end_pos: group.end(),
                        confidence: 0.75,
                        context: safe_slice(
                            text,
                            whole.start().saturating_sub(30),
                            whole.end() + 30,
                        )
                        .to_string(),
                        normalized_value: None,
                    });
                }
            }
        }

        deliverables.truncate(30);
        deduplicate(deliverables)
    }

    /// Extract notice period requirements
    pub fn extract_notice_periods(&self, text: &str) -> Vec<LegalEntity> {
        let periods = NOTICE_PERIOD
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let value = captures.get(1)?.as_str();
                let unit = captures.get(2)?.as_str();
                Some(LegalEntity {
                    entity_type: EntityType::NoticePeriod,
                    value: format!("{} {}", value, unit),
                    start_pos: whole.start(),
                    end_pos: whole.end(),
                    confidence: 0.9,
                    context: safe_slice(text, whole.start().saturating_sub(50), whole.end() + 50)
                        .to_string(),
                    normalized_value: Some(format!("{} {}", value, unit.to_lowercase())),
                })
            })
            .collect();
        deduplicate(periods)
    }

    /// Aggregate view of an extraction result
    pub fn entity_summary(&self, entities: &ExtractedEntities) -> EntitySummary {
        let groups: [(&str, &Vec<LegalEntity>); 10] = [
            ("parties", &entities.parties),
            ("dates", &entities.dates),
            ("amounts", &entities.amounts),
            ("durations", &entities.durations),
            ("jurisdictions", &entities.jurisdictions),
            ("obligations", &entities.obligations),
            ("rights", &entities.rights),
            ("prohibitions", &entities.prohibitions),
            ("deliverables", &entities.deliverables),
            ("notice_periods", &entities.notice_periods),
        ];

        let entity_counts: BTreeMap<String, usize> = groups
            .iter()
            .map(|(name, list)| (name.to_string(), list.len()))
            .collect();
        let total_entities = groups.iter().map(|(_, list)| list.len()).sum();

        let unique_jurisdictions: BTreeSet<String> = entities
            .jurisdictions
            .iter()
            .map(|e| e.value.clone())
            .collect();

        EntitySummary {
            total_entities,
            entity_counts,
            key_parties: entities
                .parties
                .iter()
                .take(5)
                .map(|e| e.value.clone())
                .collect(),
            key_dates: entities
                .dates
                .iter()
                .take(5)
                .map(|e| e.value.clone())
                .collect(),
            total_amounts: entities
                .amounts
                .iter()
                .filter_map(|e| e.normalized_value.clone())
                .collect(),
            jurisdictions: unique_jurisdictions.into_iter().collect(),
            obligation_count: entities.obligations.len(),
            right_count: entities.rights.len(),
            prohibition_count: entities.prohibitions.len(),
            dropped_date_candidates: entities.dropped_date_candidates,
            dropped_amount_candidates: entities.dropped_amount_candidates,
        }
    }
}

/// Remove duplicates by (entity kind, lowercased trimmed value), keeping the
/// first occurrence
fn deduplicate(entities: Vec<LegalEntity>) -> Vec<LegalEntity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|entity| {
            seen.insert((
                entity.entity_type,
                entity.value.to_lowercase().trim().to_string(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LegalEntityExtractor {
        LegalEntityExtractor::new()
    }

    #[test]
    fn extracts_party_from_preamble() {
        let parties = extractor().extract_parties(
            "This agreement is made BETWEEN Acme Technologies Private Limited (the Company) and another.",
        );
        assert!(parties
            .iter()
            .any(|p| p.value.contains("Acme Technologies")));
    }

    #[test]
    fn deduplication_keys_on_kind_and_lowercased_value() {
        let make = |value: &str, confidence: f64| LegalEntity {
            entity_type: EntityType::Party,
            value: value.to_string(),
            start_pos: 0,
            end_pos: 0,
            confidence,
            context: String::new(),
            normalized_value: None,
        };
        let unique = deduplicate(vec![
            make("Acme Solutions", 0.9),
            make("ACME SOLUTIONS", 0.7),
            make("Beta Corp", 0.85),
        ]);
        assert_eq!(unique.len(), 2);
        // first occurrence survives
        assert_eq!(unique[0].confidence, 0.9);
    }

    #[test]
    fn repeated_amounts_collapse_to_one() {
        let (amounts, dropped) = extractor().extract_amounts(
            "A penalty of Rs. 50,000 applies to late delivery, and a further penalty of \
             Rs. 50,000 applies to defective goods.",
        );
        assert_eq!(dropped, 0);
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].entity_type, EntityType::PenaltyAmount);
    }

    #[test]
    fn no_entity_list_carries_duplicate_keys() {
        let entities = extractor().extract_all_entities(
            "The Vendor shall deliver the report within 30 days. The Vendor shall deliver \
             the report within 30 days. A penalty of Rs. 50,000 applies. A penalty of \
             Rs. 50,000 applies. Either party may terminate with a notice period of 30 days \
             or a notice period of 30 days.",
        );
        let lists = [
            &entities.parties,
            &entities.dates,
            &entities.amounts,
            &entities.durations,
            &entities.jurisdictions,
            &entities.obligations,
            &entities.rights,
            &entities.prohibitions,
            &entities.deliverables,
            &entities.notice_periods,
        ];
        for list in lists {
            let mut seen = HashSet::new();
            for entity in list {
                assert!(
                    seen.insert((entity.entity_type, entity.value.to_lowercase())),
                    "duplicate entity: {:?} {:?}",
                    entity.entity_type,
                    entity.value
                );
            }
        }
    }

    #[test]
    fn numeric_dates_parse_day_first() {
        let (dates, dropped) = extractor().extract_dates("Signed on 25/12/2024 by both parties.");
        assert_eq!(dropped, 0);
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].normalized_value.as_deref(), Some("2024-12-25"));
        // "Signed" in context retags the date
        assert_eq!(dates[0].entity_type, EntityType::ExecutionDate);
    }

    #[test]
    fn invalid_dates_are_counted_not_silently_dropped() {
        let (dates, dropped) = extractor().extract_dates("Dated 45/45/2024 for reference.");
        assert!(dates.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn month_name_dates_normalize() {
        let (dates, _) = extractor().extract_dates("effective from January 15, 2025 onwards");
        assert_eq!(dates[0].normalized_value.as_deref(), Some("2025-01-15"));
        assert_eq!(dates[0].entity_type, EntityType::EffectiveDate);
    }

    #[test]
    fn expiry_context_overrides_effective() {
        let (dates, _) =
            extractor().extract_dates("effective until it shall expire on 1 March 2025 finally");
        assert_eq!(dates[0].entity_type, EntityType::ExpiryDate);
    }

    #[test]
    fn lakh_amounts_multiply_out() {
        let (amounts, dropped) = extractor().extract_amounts("a fee of 5 lakhs payable monthly");
        assert_eq!(dropped, 0);
        assert_eq!(
            amounts[0].normalized_value.as_deref(),
            Some("INR 500,000.00")
        );
        assert_eq!(amounts[0].entity_type, EntityType::PaymentAmount);
    }

    #[test]
    fn penalty_context_wins_over_payment() {
        let (amounts, _) =
            extractor().extract_amounts("penalty payment of Rs. 50,000 shall apply");
        assert_eq!(amounts[0].entity_type, EntityType::PenaltyAmount);
    }

    #[test]
    fn durations_canonicalize_units() {
        let durations = extractor().extract_durations("valid for 3 yrs and 6 mos thereafter");
        assert_eq!(durations.len(), 2);
        assert_eq!(durations[0].normalized_value.as_deref(), Some("3 years"));
        assert_eq!(durations[1].normalized_value.as_deref(), Some("6 months"));
    }

    #[test]
    fn gazetteer_requires_legal_context() {
        let with_context = extractor()
            .extract_jurisdictions("The courts of Mumbai shall have exclusive jurisdiction.");
        assert!(with_context
            .iter()
            .any(|j| j.normalized_value.as_deref() == Some("INDIA")));

        let without_context = extractor().extract_jurisdictions("Our office is in Mumbai.");
        assert!(without_context.is_empty());
    }

    #[test]
    fn obligations_capped_and_keyed_on_first_keyword() {
        let text = "The Vendor shall deliver the goods; The Client may inspect them.";
        let entities = extractor().extract_all_entities(text);
        assert_eq!(entities.obligations.len(), 1);
        assert_eq!(entities.rights.len(), 1);
        assert!(entities.obligations[0].value.starts_with("shall"));
    }

    #[test]
    fn notice_periods_found() {
        let periods = extractor()
            .extract_notice_periods("terminate with prior written notice of 30 days to the other");
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].normalized_value.as_deref(), Some("30 days"));
    }

    #[test]
    fn amount_formatting_groups_thousands() {
        assert_eq!(format_amount(50000.0), "50,000.00");
        assert_eq!(format_amount(10000000.0), "10,000,000.00");
        assert_eq!(format_amount(999.5), "999.50");
    }

    #[test]
    fn summary_counts_match() {
        let entities = extractor().extract_all_entities(
            "BETWEEN Acme Solutions (Company). The Company shall pay Rs. 10,000 within 30 days.",
        );
        let summary = extractor().entity_summary(&entities);
        assert_eq!(
            summary.total_entities,
            summary.entity_counts.values().sum::<usize>()
        );
        assert!(summary.obligation_count >= 1);
    }
}
