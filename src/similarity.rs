//! # Similarity Matcher Module
//!
//! ## Purpose
//! Compares contract clauses against standard clause templates for the
//! contract type and reports how closely the drafted language tracks
//! market-standard wording.
//!
//! ## Input/Output Specification
//! - **Input**: Contract text plus the classified contract type
//! - **Output**: [`TemplateComparisonReport`] with per-clause similarity
//!   scores, missing required clauses, and drafting recommendations
//!
//! ## Key Features
//! - Keyword gate before any expensive comparison (under 30% keyword
//!   presence means the clause is treated as absent)
//! - Sliding window of one to five sentence fragments scored with a
//!   longest-matching-subsequence ratio
//! - Difference scan for dropped legal operators and concerning additions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classifier::ContractType;

/// Band a similarity score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    High,
    Medium,
    Low,
    NoMatch,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::High => "high",
            MatchType::Medium => "medium",
            MatchType::Low => "low",
            MatchType::NoMatch => "no_match",
        }
    }
}

/// Result of matching one template clause against the contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub clause_name: String,
    pub clause_text: String,
    pub template_clause: String,
    pub similarity_score: f64,
    pub match_type: MatchType,
    pub differences: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Complete template comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateComparisonReport {
    pub contract_type: ContractType,
    pub overall_similarity: f64,
    pub matched_clauses: Vec<SimilarityResult>,
    pub missing_clauses: Vec<String>,
    pub extra_clauses: Vec<String>,
    pub quality_score: f64,
    pub recommendations: Vec<String>,
}

/// One standard clause template
#[derive(Debug, Clone, Serialize)]
pub struct ClauseTemplate {
    pub name: &'static str,
    pub template: &'static str,
    pub required: bool,
    pub keywords: &'static [&'static str],
}

const fn tpl(
    name: &'static str,
    template: &'static str,
    required: bool,
    keywords: &'static [&'static str],
) -> ClauseTemplate {
    ClauseTemplate {
        name,
        template,
        required,
        keywords,
    }
}

/// Clauses expected in most contracts regardless of type
static UNIVERSAL_CLAUSES: Lazy<Vec<ClauseTemplate>> = Lazy::new(|| {
    vec![
        tpl(
            "governing_law",
            "This Agreement shall be governed by and construed in accordance with the laws of \
             India. The courts of [City] shall have exclusive jurisdiction.",
            true,
            &["governing law", "jurisdiction", "courts", "laws of india"],
        ),
        tpl(
            "dispute_resolution",
            "Any dispute arising out of this Agreement shall first be attempted to be resolved \
             through mutual negotiation. If unresolved, the dispute shall be referred to \
             arbitration/mediation.",
            true,
            &["dispute", "resolution", "arbitration", "mediation", "negotiation"],
        ),
        tpl(
            "entire_agreement",
            "This Agreement constitutes the entire agreement between the parties and supersedes \
             all prior negotiations, representations, and agreements.",
            true,
            &["entire agreement", "supersedes", "prior"],
        ),
        tpl(
            "amendment",
            "This Agreement may only be amended by a written instrument signed by both parties.",
            true,
            &["amendment", "modify", "written", "signed"],
        ),
        tpl(
            "severability",
            "If any provision of this Agreement is held invalid or unenforceable, the remaining \
             provisions shall continue in full force and effect.",
            false,
            &["severability", "invalid", "unenforceable", "remaining"],
        ),
        tpl(
            "notices",
            "All notices under this Agreement shall be in writing and delivered to the addresses \
             specified herein or such other address as may be notified.",
            true,
            &["notice", "notices", "writing", "address"],
        ),
    ]
});

static EMPLOYMENT_TEMPLATES: Lazy<Vec<ClauseTemplate>> = Lazy::new(|| {
    vec![
        tpl(
            "definitions",
            "In this Agreement, unless the context otherwise requires, the following terms shall \
             have the meanings assigned to them: 'Company' means [Company Name]; 'Employee' means \
             [Employee Name]; 'Effective Date' means the date of commencement of employment.",
            true,
            &["definitions", "means", "shall have the meaning"],
        ),
        tpl(
            "position_duties",
            "The Employee shall be employed in the position of [Designation] and shall perform \
             such duties as may be assigned by the Company from time to time. The Employee shall \
             report to [Reporting Manager].",
            true,
            &["position", "duties", "designation", "report to"],
        ),
        tpl(
            "compensation",
            "The Company shall pay the Employee a gross salary of INR [Amount] per annum, payable \
             in monthly installments. The salary shall be subject to applicable tax deductions.",
            true,
            &["salary", "compensation", "payment", "per annum", "monthly"],
        ),
        tpl(
            "working_hours",
            "The normal working hours shall be [X] hours per day, [Y] days per week. The Employee \
             may be required to work additional hours as necessary for the proper performance of \
             duties.",
            true,
            &["working hours", "hours per day", "days per week"],
        ),
        tpl(
            "leave",
            "The Employee shall be entitled to [X] days of paid leave per annum, in addition to \
             public holidays as declared by the Company.",
            true,
            &["leave", "paid leave", "holidays", "vacation"],
        ),
        tpl(
            "confidentiality",
            "The Employee shall maintain strict confidentiality of all proprietary information, \
             trade secrets, and confidential business information of the Company, both during and \
             after employment.",
            true,
            &["confidential", "proprietary", "trade secret"],
        ),
        tpl(
            "termination",
            "Either party may terminate this Agreement by giving [X] days written notice. The \
             Company may terminate immediately for cause including misconduct, breach of duties, \
             or violation of company policies.",
            true,
            &["terminate", "termination", "notice period"],
        ),
        tpl(
            "non_compete",
            "For a period of [X] months after termination, the Employee shall not engage in any \
             business that directly competes with the Company within [geographic area].",
            false,
            &["non-compete", "compete", "restriction"],
        ),
    ]
});

static SERVICE_TEMPLATES: Lazy<Vec<ClauseTemplate>> = Lazy::new(|| {
    vec![
        tpl(
            "definitions",
            "In this Agreement: 'Client' means [Client Name]; 'Service Provider' means [Provider \
             Name]; 'Services' means the services described in Schedule A; 'Deliverables' means \
             the work products to be delivered.",
            true,
            &["definitions", "client", "service provider", "services"],
        ),
        tpl(
            "scope_of_services",
            "The Service Provider shall provide the Services as described in Schedule A attached \
             hereto. Any changes to the scope shall be agreed in writing by both parties.",
            true,
            &["scope", "services", "schedule", "deliverables"],
        ),
        tpl(
            "payment_terms",
            "The Client shall pay the Service Provider [Amount] for the Services. Payment shall \
             be made within [X] days of receipt of invoice. Late payments shall attract interest \
             at [Y]% per annum.",
            true,
            &["payment", "invoice", "fees", "compensation"],
        ),
        tpl(
            "timeline",
            "The Services shall be completed within [X] days/months from the Effective Date. \
             Milestones and deadlines are set forth in Schedule B.",
            true,
            &["timeline", "deadline", "milestone", "completion"],
        ),
        tpl(
            "warranties",
            "The Service Provider warrants that the Services shall be performed in a professional \
             and workmanlike manner in accordance with industry standards.",
            true,
            &["warranty", "warrants", "professional", "standards"],
        ),
        tpl(
            "intellectual_property",
            "All intellectual property created in the course of providing Services shall belong \
             to [Party]. The other party is granted a [license type] license to use such IP.",
            true,
            &["intellectual property", "ip", "ownership", "license"],
        ),
        tpl(
            "limitation_of_liability",
            "The total liability of the Service Provider under this Agreement shall not exceed \
             the total fees paid by the Client. Neither party shall be liable for indirect, \
             consequential, or punitive damages.",
            true,
            &["liability", "limitation", "damages", "cap"],
        ),
        tpl(
            "termination",
            "Either party may terminate this Agreement with [X] days written notice. Upon \
             termination, the Client shall pay for all Services rendered up to the termination \
             date.",
            true,
            &["terminate", "termination", "notice"],
        ),
    ]
});

static NDA_TEMPLATES: Lazy<Vec<ClauseTemplate>> = Lazy::new(|| {
    vec![
        tpl(
            "definitions",
            "'Confidential Information' means any information disclosed by the Disclosing Party \
             to the Receiving Party, whether orally, in writing, or by inspection, that is \
             designated as confidential or would reasonably be understood to be confidential.",
            true,
            &["confidential information", "disclosing party", "receiving party"],
        ),
        tpl(
            "obligations",
            "The Receiving Party shall: (a) maintain the confidentiality of the Confidential \
             Information; (b) not disclose it to any third party without prior written consent; \
             (c) use it only for the Purpose.",
            true,
            &["maintain", "not disclose", "third party", "purpose"],
        ),
        tpl(
            "exclusions",
            "Confidential Information does not include information that: (a) is publicly \
             available; (b) was known to the Receiving Party prior to disclosure; (c) is \
             independently developed; (d) is disclosed by a third party without breach.",
            true,
            &["exclude", "publicly available", "independently developed"],
        ),
        tpl(
            "term",
            "This Agreement shall remain in effect for [X] years from the Effective Date. The \
             confidentiality obligations shall survive termination for [Y] years.",
            true,
            &["term", "years", "survive", "termination"],
        ),
        tpl(
            "return_of_information",
            "Upon termination or request, the Receiving Party shall promptly return or destroy \
             all Confidential Information and certify such destruction in writing.",
            true,
            &["return", "destroy", "certify"],
        ),
    ]
});

static LEASE_TEMPLATES: Lazy<Vec<ClauseTemplate>> = Lazy::new(|| {
    vec![
        tpl(
            "premises",
            "The Lessor hereby leases to the Lessee the premises located at [Address], comprising \
             [description of premises] for the purpose of [permitted use].",
            true,
            &["premises", "located at", "address", "property"],
        ),
        tpl(
            "term",
            "The lease shall commence on [Start Date] and continue for a period of [X] \
             months/years, unless terminated earlier in accordance with this Agreement.",
            true,
            &["term", "commence", "period", "months", "years"],
        ),
        tpl(
            "rent",
            "The Lessee shall pay a monthly rent of INR [Amount], payable on or before the [X]th \
             day of each month. Rent shall be paid by [payment method].",
            true,
            &["rent", "monthly", "payable", "payment"],
        ),
        tpl(
            "security_deposit",
            "The Lessee shall pay a security deposit of INR [Amount] upon execution of this \
             Agreement. The deposit shall be refunded within [X] days of termination, less any \
             deductions for damages.",
            true,
            &["security deposit", "deposit", "refund"],
        ),
        tpl(
            "maintenance",
            "The Lessee shall maintain the premises in good condition. The Lessor shall be \
             responsible for structural repairs and major maintenance.",
            true,
            &["maintenance", "repair", "condition"],
        ),
        tpl(
            "termination",
            "Either party may terminate this lease by giving [X] months written notice. Early \
             termination by the Lessee may result in forfeiture of the security deposit.",
            true,
            &["terminate", "termination", "notice", "early termination"],
        ),
    ]
});

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.;]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Legal operators whose absence from a drafted clause is worth flagging
const IMPORTANT_TERMS: [&str; 10] = [
    "shall",
    "must",
    "may",
    "written",
    "notice",
    "days",
    "liability",
    "indemnify",
    "terminate",
    "confidential",
];

/// Additions that tilt a clause against the counterparty
const CONCERNING_TERMS: [&str; 4] = ["unlimited", "perpetual", "irrevocable", "sole discretion"];

enum Difference {
    MissingTerm(&'static str),
    ConcerningAddition(&'static str),
}

struct ClauseMatch {
    score: f64,
    matched_text: String,
    differences: Vec<Difference>,
}

/// Template comparison engine. Stateless; the templates are static.
#[derive(Debug, Default)]
pub struct SimilarityMatcher;

impl SimilarityMatcher {
    pub fn new() -> Self {
        Self
    }

    fn type_templates(contract_type: ContractType) -> &'static [ClauseTemplate] {
        match contract_type {
            ContractType::Employment => &EMPLOYMENT_TEMPLATES,
            ContractType::Service => &SERVICE_TEMPLATES,
            ContractType::NonDisclosure => &NDA_TEMPLATES,
            ContractType::Lease => &LEASE_TEMPLATES,
            _ => &[],
        }
    }

    /// Compare a contract against the standard template for its type
    pub fn compare_to_template(
        &self,
        contract_text: &str,
        contract_type: ContractType,
    ) -> TemplateComparisonReport {
        let text_lower = contract_text.to_lowercase();
        let sentences: Vec<&str> = SENTENCE_SPLIT.split(&text_lower).collect();

        let mut matched_clauses = Vec::new();
        let mut missing_clauses = Vec::new();

        let all_templates: Vec<&ClauseTemplate> = Self::type_templates(contract_type)
            .iter()
            .chain(UNIVERSAL_CLAUSES.iter())
            .collect();

        for template in &all_templates {
            match self.find_matching_clause(&text_lower, &sentences, template) {
                Some(found) => {
                    let differences: Vec<String> = found
                        .differences
                        .iter()
                        .map(|d| match d {
                            Difference::MissingTerm(t) => format!("Missing term: '{t}'"),
                            Difference::ConcerningAddition(t) => {
                                format!("Added concerning term: '{t}'")
                            }
                        })
                        .collect();
                    let suggestions =
                        self.generate_suggestions(template.name, found.score, &found.differences);
                    matched_clauses.push(SimilarityResult {
                        clause_name: template.name.to_string(),
                        clause_text: found.matched_text,
                        template_clause: template.template.to_string(),
                        similarity_score: found.score,
                        match_type: score_to_match_type(found.score),
                        differences,
                        suggestions,
                    });
                }
                None => {
                    if template.required {
                        missing_clauses.push(title_case(template.name));
                    }
                }
            }
        }

        let overall_similarity = if matched_clauses.is_empty() {
            0.0
        } else {
            matched_clauses
                .iter()
                .map(|m| m.similarity_score)
                .sum::<f64>()
                / matched_clauses.len() as f64
        };

        let required_count = all_templates.iter().filter(|t| t.required).count();
        let matched_required = matched_clauses
            .iter()
            .filter(|m| m.similarity_score > 0.3)
            .count();
        let quality_score = if required_count > 0 {
            matched_required as f64 / required_count as f64
        } else {
            0.0
        };

        let recommendations =
            self.generate_recommendations(&matched_clauses, &missing_clauses, quality_score);

        tracing::debug!(
            contract_type = contract_type.as_str(),
            matched = matched_clauses.len(),
            missing = missing_clauses.len(),
            "Compared contract to templates"
        );

        TemplateComparisonReport {
            contract_type,
            overall_similarity: round2(overall_similarity),
            matched_clauses,
            missing_clauses,
            extra_clauses: Vec::new(),
            quality_score: round2(quality_score),
            recommendations,
        }
    }

    fn find_matching_clause(
        &self,
        text_lower: &str,
        sentences: &[&str],
        template: &ClauseTemplate,
    ) -> Option<ClauseMatch> {
        let keyword_matches = template
            .keywords
            .iter()
            .filter(|kw| text_lower.contains(&kw.to_lowercase()))
            .count();
        if template.keywords.is_empty()
            || (keyword_matches as f64) < template.keywords.len() as f64 * 0.3
        {
            return None;
        }

        let template_lower = template.template.to_lowercase();
        let keyword_floor = template.keywords.len() as f64 * 0.3;
        let mut best_score = 0.0;
        let mut best_match = String::new();

        // Window of one to five consecutive fragments
        for i in 0..sentences.len() {
            for j in (i + 1)..=(i + 5).min(sentences.len()) {
                let section = sentences[i..j].join(". ");
                let section_keywords = template
                    .keywords
                    .iter()
                    .filter(|kw| section.contains(&kw.to_lowercase()))
                    .count();
                if (section_keywords as f64) < keyword_floor {
                    continue;
                }
                let score = text_similarity(&section, &template_lower);
                if score > best_score {
                    best_score = score;
                    best_match = section;
                }
            }
        }

        if best_score > 0.2 {
            let differences = identify_differences(&best_match, &template_lower);
            Some(ClauseMatch {
                score: best_score,
                matched_text: best_match.chars().take(500).collect(),
                differences,
            })
        } else {
            None
        }
    }

    fn generate_suggestions(
        &self,
        clause_name: &str,
        score: f64,
        differences: &[Difference],
    ) -> Vec<String> {
        let mut suggestions = Vec::new();
        if score < 0.4 {
            suggestions.push(format!(
                "Consider revising {clause_name} to align with standard practices"
            ));
        }
        if score < 0.6 {
            suggestions.push("Review clause for completeness".to_string());
        }
        for diff in differences {
            match diff {
                Difference::MissingTerm(term) => {
                    suggestions.push(format!("Consider adding '{term}' for clarity"));
                }
                Difference::ConcerningAddition(term) => {
                    suggestions.push(format!("Review use of '{term}' - may be unfavorable"));
                }
            }
        }
        suggestions
    }

    fn generate_recommendations(
        &self,
        matched: &[SimilarityResult],
        missing: &[String],
        quality_score: f64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if quality_score >= 0.8 {
            recommendations
                .push("✅ Contract structure aligns well with standard templates".to_string());
        } else if quality_score >= 0.6 {
            recommendations.push(
                "⚡ Contract has most standard clauses but needs some additions".to_string(),
            );
        } else {
            recommendations.push("⚠️ Contract is missing several standard clauses".to_string());
        }

        if !missing.is_empty() {
            let listed: Vec<&str> = missing.iter().take(5).map(String::as_str).collect();
            recommendations.push(format!("Add missing clauses: {}", listed.join(", ")));
        }

        let low_matches = matched.iter().filter(|m| m.similarity_score < 0.4).count();
        if low_matches > 0 {
            recommendations.push(format!(
                "Review and strengthen {low_matches} clauses that deviate from standards"
            ));
        }

        recommendations
    }

    /// Full template set for a contract type, universal clauses included
    pub fn template_for_type(&self, contract_type: ContractType) -> Vec<&'static ClauseTemplate> {
        Self::type_templates(contract_type)
            .iter()
            .chain(UNIVERSAL_CLAUSES.iter())
            .collect()
    }

    /// Template text for one named clause, if the type defines it
    pub fn clause_template(
        &self,
        contract_type: ContractType,
        clause_name: &str,
    ) -> Option<&'static str> {
        let key = clause_name.to_lowercase().replace(' ', "_");
        self.template_for_type(contract_type)
            .into_iter()
            .find(|t| t.name == key)
            .map(|t| t.template)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn score_to_match_type(score: f64) -> MatchType {
    if score >= 0.8 {
        MatchType::Exact
    } else if score >= 0.6 {
        MatchType::High
    } else if score >= 0.4 {
        MatchType::Medium
    } else if score >= 0.2 {
        MatchType::Low
    } else {
        MatchType::NoMatch
    }
}

/// Whitespace-normalized longest-matching-subsequence ratio
fn text_similarity(text1: &str, text2: &str) -> f64 {
    let a = WHITESPACE.replace_all(text1.trim(), " ");
    let b = WHITESPACE.replace_all(text2.trim(), " ");
    sequence_ratio(&a, &b)
}

/// Ratio of matching characters to total length, 2M / (len_a + len_b).
/// Matching blocks are found greedily: the longest common block first, then
/// recursively on the pieces to its left and right.
fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }

    let mut matches = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(&a, &b2j, alo, ahi, blo, bhi);
        if k > 0 {
            matches += k;
            queue.push((alo, i, blo, j));
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    2.0 * matches as f64 / total as f64
}

fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, &ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}

fn identify_differences(actual: &str, template: &str) -> Vec<Difference> {
    let template_words: std::collections::HashSet<&str> = template.split_whitespace().collect();
    let actual_words: std::collections::HashSet<&str> = actual.split_whitespace().collect();

    let mut differences = Vec::new();
    for term in IMPORTANT_TERMS {
        if template_words.contains(term) && !actual_words.contains(term) {
            differences.push(Difference::MissingTerm(term));
        }
    }
    for term in CONCERNING_TERMS {
        if actual.contains(term) && !template.contains(term) {
            differences.push(Difference::ConcerningAddition(term));
        }
    }
    differences.truncate(5);
    differences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert!((sequence_ratio("abcdef", "abcdef") - 1.0).abs() < 1e-9);
        assert!((sequence_ratio("", "") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_ratio_matches_expectation() {
        // longest common block "bcd" of length 3, 2*3 / 8 = 0.75
        assert!((sequence_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((sequence_ratio("abc", "xyz") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn match_type_bands_resolve_upward() {
        assert_eq!(score_to_match_type(0.8), MatchType::Exact);
        assert_eq!(score_to_match_type(0.6), MatchType::High);
        assert_eq!(score_to_match_type(0.4), MatchType::Medium);
        assert_eq!(score_to_match_type(0.2), MatchType::Low);
        assert_eq!(score_to_match_type(0.19), MatchType::NoMatch);
    }

    #[test]
    fn near_verbatim_clause_matches_strongly() {
        let matcher = SimilarityMatcher::new();
        let text = "The Company shall pay the Employee a gross salary of INR 1,200,000 per \
                    annum, payable in monthly installments. The salary shall be subject to \
                    applicable tax deductions.";
        let report = matcher.compare_to_template(text, ContractType::Employment);
        let compensation = report
            .matched_clauses
            .iter()
            .find(|m| m.clause_name == "compensation")
            .expect("compensation clause matched");
        assert!(compensation.similarity_score >= 0.6);
        assert!(matches!(
            compensation.match_type,
            MatchType::Exact | MatchType::High
        ));
    }

    #[test]
    fn unrelated_text_reports_missing_required_clauses() {
        let matcher = SimilarityMatcher::new();
        let report = matcher.compare_to_template(
            "The quick brown fox jumps over the lazy dog.",
            ContractType::NonDisclosure,
        );
        assert!(report.matched_clauses.is_empty());
        assert_eq!(report.overall_similarity, 0.0);
        assert_eq!(report.quality_score, 0.0);
        assert!(report
            .missing_clauses
            .contains(&"Return Of Information".to_string()));
        assert!(report.recommendations[0].contains("missing several"));
    }

    #[test]
    fn differences_flag_dropped_operators_and_concerning_additions() {
        let diffs = identify_differences(
            "the party gives unlimited notification",
            "the party shall give written notice",
        );
        let rendered: Vec<String> = diffs
            .iter()
            .map(|d| match d {
                Difference::MissingTerm(t) => format!("missing {t}"),
                Difference::ConcerningAddition(t) => format!("added {t}"),
            })
            .collect();
        assert!(rendered.contains(&"missing shall".to_string()));
        assert!(rendered.contains(&"missing written".to_string()));
        assert!(rendered.contains(&"missing notice".to_string()));
        assert!(rendered.contains(&"added unlimited".to_string()));
    }

    #[test]
    fn unknown_type_still_checks_universal_clauses() {
        let matcher = SimilarityMatcher::new();
        let templates = matcher.template_for_type(ContractType::Unknown);
        assert_eq!(templates.len(), UNIVERSAL_CLAUSES.len());
    }

    #[test]
    fn clause_template_lookup_normalizes_names() {
        let matcher = SimilarityMatcher::new();
        let template = matcher
            .clause_template(ContractType::Lease, "Security Deposit")
            .expect("lease template exists");
        assert!(template.contains("security deposit"));
        assert!(matcher
            .clause_template(ContractType::Lease, "compensation")
            .is_none());
    }
}
