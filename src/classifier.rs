//! # Contract Classifier Module
//!
//! ## Purpose
//! Classifies contracts into a closed set of commercial contract types using
//! keyword frequencies, explicit title patterns, and a structural sanity
//! check, and exposes reference information per type.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized contract text
//! - **Output**: [`ClassificationResult`] with primary type, confidence,
//!   secondary candidates, matched indicators, and human-readable reasoning
//!
//! ## Key Features
//! - Keyword hits score 0.1 each, title patterns 0.5 each, per-type weight
//! - Scores max-normalized; confidence blends 80% score with 20% structure
//! - Secondary types from ranks two to four above 0.3
//! - Reference tables: type descriptions and suggested required clauses

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of recognized contract types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Employment Agreement")]
    Employment,
    #[serde(rename = "Vendor Contract")]
    Vendor,
    #[serde(rename = "Lease Agreement")]
    Lease,
    #[serde(rename = "Partnership Deed")]
    Partnership,
    #[serde(rename = "Service Contract")]
    Service,
    #[serde(rename = "Non-Disclosure Agreement")]
    NonDisclosure,
    #[serde(rename = "Consultancy Agreement")]
    Consultancy,
    #[serde(rename = "Supply Agreement")]
    Supply,
    #[serde(rename = "Franchise Agreement")]
    Franchise,
    #[serde(rename = "Joint Venture Agreement")]
    JointVenture,
    #[serde(rename = "Loan Agreement")]
    Loan,
    #[serde(rename = "Shareholders Agreement")]
    Shareholders,
    Unknown,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Employment => "Employment Agreement",
            ContractType::Vendor => "Vendor Contract",
            ContractType::Lease => "Lease Agreement",
            ContractType::Partnership => "Partnership Deed",
            ContractType::Service => "Service Contract",
            ContractType::NonDisclosure => "Non-Disclosure Agreement",
            ContractType::Consultancy => "Consultancy Agreement",
            ContractType::Supply => "Supply Agreement",
            ContractType::Franchise => "Franchise Agreement",
            ContractType::JointVenture => "Joint Venture Agreement",
            ContractType::Loan => "Loan Agreement",
            ContractType::Shareholders => "Shareholders Agreement",
            ContractType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicators matched for one contract type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorHits {
    pub keywords: Vec<String>,
    pub patterns: Vec<String>,
}

/// Result of contract classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub contract_type: ContractType,
    pub confidence: f64,
    pub secondary_types: Vec<(ContractType, f64)>,
    pub indicators_found: BTreeMap<String, IndicatorHits>,
    pub reasoning: String,
}

/// Reference information about a contract type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTypeInfo {
    pub description: String,
    pub key_clauses: Vec<String>,
    pub applicable_laws: Vec<String>,
    pub common_risks: Vec<String>,
}

struct TypeIndicators {
    contract_type: ContractType,
    keywords: Vec<(&'static str, Regex)>,
    patterns: Vec<(&'static str, Regex)>,
    weight: f64,
}

fn keyword_regexes(keywords: &'static [&'static str]) -> Vec<(&'static str, Regex)> {
    keywords
        .iter()
        .map(|kw| {
            let pattern = format!(r"\b{}\b", regex::escape(kw));
            (
                *kw,
                Regex::new(&pattern).expect("escaped keyword is a valid pattern"),
            )
        })
        .collect()
}

fn title_regexes(patterns: &'static [&'static str]) -> Vec<(&'static str, Regex)> {
    patterns
        .iter()
        .map(|p| (*p, Regex::new(p).expect("valid title pattern")))
        .collect()
}

/// Per-type indicator tables, in declaration order. NDA carries a higher
/// weight because its vocabulary is very specific.
static CONTRACT_INDICATORS: Lazy<Vec<TypeIndicators>> = Lazy::new(|| {
    let table: &[(ContractType, &[&str], &[&str], f64)] = &[
        (
            ContractType::Employment,
            &[
                "employment", "employee", "employer", "salary", "wages", "probation",
                "working hours", "leave", "resignation", "termination of employment",
                "job title", "designation", "reporting", "workplace", "benefits",
                "provident fund", "gratuity", "bonus", "appraisal", "notice period",
            ],
            &[
                r"employment\s+agreement",
                r"letter\s+of\s+appointment",
                r"offer\s+letter",
                r"service\s+agreement",
                r"terms\s+of\s+employment",
            ],
            1.0,
        ),
        (
            ContractType::Vendor,
            &[
                "vendor", "supplier", "supply", "purchase order", "procurement", "goods",
                "materials", "delivery", "quality", "inspection", "rejection", "warranty",
                "price", "payment terms", "invoice",
            ],
            &[
                r"vendor\s+agreement",
                r"supply\s+agreement",
                r"purchase\s+agreement",
                r"procurement\s+contract",
            ],
            1.0,
        ),
        (
            ContractType::Lease,
            &[
                "lease", "lessor", "lessee", "rent", "premises", "tenant", "landlord",
                "property", "occupation", "security deposit", "maintenance", "utilities",
                "sub-lease", "eviction", "renewal", "lock-in",
            ],
            &[
                r"lease\s+agreement",
                r"rental\s+agreement",
                r"tenancy\s+agreement",
                r"leave\s+and\s+license",
            ],
            1.0,
        ),
        (
            ContractType::Partnership,
            &[
                "partnership", "partner", "partners", "firm", "profit sharing",
                "loss sharing", "capital contribution", "partnership firm",
                "managing partner", "sleeping partner", "dissolution", "goodwill",
                "partnership act",
            ],
            &[
                r"partnership\s+deed",
                r"partnership\s+agreement",
                r"deed\s+of\s+partnership",
            ],
            1.0,
        ),
        (
            ContractType::Service,
            &[
                "service", "services", "service provider", "client", "scope of work",
                "deliverables", "milestones", "service level", "sla", "performance",
                "acceptance", "professional services", "consulting",
            ],
            &[
                r"service\s+agreement",
                r"master\s+service\s+agreement",
                r"professional\s+services\s+agreement",
                r"msa",
            ],
            1.0,
        ),
        (
            ContractType::NonDisclosure,
            &[
                "confidential", "confidentiality", "non-disclosure", "nda", "proprietary",
                "trade secret", "disclosure", "receiving party", "disclosing party",
                "confidential information",
            ],
            &[
                r"non-disclosure\s+agreement",
                r"confidentiality\s+agreement",
                r"nda",
                r"mutual\s+nda",
            ],
            1.2,
        ),
        (
            ContractType::Consultancy,
            &[
                "consultant", "consultancy", "advisory", "advisor", "engagement",
                "professional fees", "retainer", "independent contractor", "expertise",
                "recommendations",
            ],
            &[
                r"consultancy\s+agreement",
                r"consulting\s+agreement",
                r"advisory\s+agreement",
                r"engagement\s+letter",
            ],
            1.0,
        ),
        (
            ContractType::Supply,
            &[
                "supply", "supplier", "buyer", "goods", "products", "quantity",
                "specifications", "delivery schedule", "purchase price", "minimum order",
                "exclusivity",
            ],
            &[
                r"supply\s+agreement",
                r"distribution\s+agreement",
                r"product\s+supply",
            ],
            1.0,
        ),
        (
            ContractType::Franchise,
            &[
                "franchise", "franchisor", "franchisee", "royalty", "brand",
                "trademark license", "territory", "exclusivity", "franchise fee",
                "training", "operations manual",
            ],
            &[
                r"franchise\s+agreement",
                r"franchising\s+agreement",
                r"master\s+franchise",
            ],
            1.0,
        ),
        (
            ContractType::JointVenture,
            &[
                "joint venture", "jv", "venture", "collaboration", "joint enterprise",
                "co-venture", "profit sharing", "management committee",
                "steering committee",
            ],
            &[
                r"joint\s+venture\s+agreement",
                r"jv\s+agreement",
                r"collaboration\s+agreement",
            ],
            1.0,
        ),
        (
            ContractType::Loan,
            &[
                "loan", "lender", "borrower", "principal", "interest", "repayment", "emi",
                "collateral", "security", "mortgage", "default", "prepayment",
                "disbursement",
            ],
            &[
                r"loan\s+agreement",
                r"credit\s+agreement",
                r"facility\s+agreement",
            ],
            1.0,
        ),
        (
            ContractType::Shareholders,
            &[
                "shareholder", "shareholders", "equity", "shares", "voting rights",
                "board", "directors", "dividend", "drag along", "tag along",
                "pre-emptive", "rofr",
            ],
            &[r"shareholders?\s+agreement", r"sha", r"subscription\s+agreement"],
            1.0,
        ),
    ];

    table
        .iter()
        .map(|(contract_type, keywords, patterns, weight)| TypeIndicators {
            contract_type: *contract_type,
            keywords: keyword_regexes(keywords),
            patterns: title_regexes(patterns),
            weight: *weight,
        })
        .collect()
});

/// Structural markers a real contract is expected to carry
static STRUCTURAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(WHEREAS|RECITALS|BACKGROUND)",
        r"(?i)(DEFINITIONS|INTERPRETATION)",
        r"(?i)(SCHEDULE|ANNEXURE|EXHIBIT)\s+[A-Z\d]",
        r"(?i)(SIGNED|EXECUTED|WITNESS)",
        r"(?i)(BETWEEN|PARTY\s+OF\s+THE\s+FIRST\s+PART)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid structural pattern"))
    .collect()
});

/// Keyword/pattern based contract type classifier. Stateless; all indicator
/// tables are static and loaded once.
#[derive(Debug, Default)]
pub struct ContractClassifier;

impl ContractClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a contract based on its content
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let text_lower = text.to_lowercase();
        let mut scores: Vec<(ContractType, f64)> = Vec::new();
        let mut indicators_found: BTreeMap<String, IndicatorHits> = BTreeMap::new();

        for indicators in CONTRACT_INDICATORS.iter() {
            let mut score = 0.0;
            let mut found_keywords = Vec::new();
            let mut found_patterns = Vec::new();

            for (keyword, pattern) in &indicators.keywords {
                let count = pattern.find_iter(&text_lower).count();
                if count > 0 {
                    score += count as f64 * 0.1;
                    found_keywords.push(format!("{} ({})", keyword, count));
                }
            }

            for (source, pattern) in &indicators.patterns {
                let count = pattern.find_iter(&text_lower).count();
                if count > 0 {
                    score += count as f64 * 0.5;
                    found_patterns.push(source.to_string());
                }
            }

            score *= indicators.weight;
            scores.push((indicators.contract_type, score));

            if !found_keywords.is_empty() || !found_patterns.is_empty() {
                found_keywords.truncate(10);
                indicators_found.insert(
                    indicators.contract_type.as_str().to_string(),
                    IndicatorHits {
                        keywords: found_keywords,
                        patterns: found_patterns,
                    },
                );
            }
        }

        let max_score = scores.iter().map(|(_, s)| *s).fold(0.0f64, f64::max);
        if max_score > 0.0 {
            for (_, score) in &mut scores {
                *score /= max_score;
            }
        }

        // Stable sort keeps table order among equal scores
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let (contract_type, confidence) = match scores.first() {
            Some((top_type, top_score)) if *top_score > 0.0 => {
                let structure_score = self.structure_score(text);
                let confidence = top_score.min(1.0) * 0.8 + structure_score * 0.2;
                (*top_type, (confidence * 100.0).round() / 100.0)
            }
            _ => (ContractType::Unknown, 0.0),
        };

        let secondary_types: Vec<(ContractType, f64)> = scores
            .iter()
            .skip(1)
            .take(3)
            .filter(|(_, s)| *s > 0.3)
            .map(|(t, s)| (*t, s.min(1.0)))
            .collect();

        let reasoning = self.generate_reasoning(
            contract_type,
            confidence,
            indicators_found.get(contract_type.as_str()),
        );

        tracing::debug!(
            contract_type = contract_type.as_str(),
            confidence,
            "Classified contract"
        );

        ClassificationResult {
            contract_type,
            confidence,
            secondary_types,
            indicators_found,
            reasoning,
        }
    }

    /// Fraction of structural markers present, 0 to 1
    fn structure_score(&self, text: &str) -> f64 {
        let hits = STRUCTURAL_PATTERNS
            .iter()
            .filter(|p| p.is_match(text))
            .count();
        hits as f64 / STRUCTURAL_PATTERNS.len() as f64
    }

    fn generate_reasoning(
        &self,
        contract_type: ContractType,
        confidence: f64,
        indicators: Option<&IndicatorHits>,
    ) -> String {
        if contract_type == ContractType::Unknown {
            return "Unable to determine contract type. The document may not be a standard \
                    contract or may be missing key indicators."
                .to_string();
        }

        let mut reasoning = format!(
            "Classified as {} with {:.0}% confidence. ",
            contract_type,
            confidence * 100.0
        );

        if let Some(hits) = indicators {
            if !hits.patterns.is_empty() {
                reasoning.push_str(&format!(
                    "Found explicit mentions matching {} patterns. ",
                    contract_type
                ));
            }
            if !hits.keywords.is_empty() {
                let top: Vec<&str> = hits.keywords.iter().take(5).map(String::as_str).collect();
                reasoning.push_str(&format!("Key indicators found: {}. ", top.join(", ")));
            }
        }

        if confidence < 0.5 {
            reasoning.push_str("Low confidence - consider manual review.");
        } else if confidence < 0.75 {
            reasoning.push_str("Moderate confidence - verify classification.");
        } else {
            reasoning.push_str("High confidence classification.");
        }

        reasoning
    }

    /// Reference information for a contract type
    pub fn contract_type_info(&self, contract_type: ContractType) -> ContractTypeInfo {
        let (description, key_clauses, applicable_laws, common_risks): (
            &str,
            &[&str],
            &[&str],
            &[&str],
        ) = match contract_type {
            ContractType::Employment => (
                "Agreement between employer and employee defining terms of employment",
                &[
                    "Job Description",
                    "Compensation",
                    "Benefits",
                    "Termination",
                    "Non-Compete",
                    "Confidentiality",
                ],
                &[
                    "Indian Contract Act",
                    "Labour Laws",
                    "Shops and Establishments Act",
                ],
                &[
                    "Unfair termination terms",
                    "Restrictive non-compete",
                    "Unclear compensation structure",
                ],
            ),
            ContractType::Vendor => (
                "Agreement for supply of goods or materials from a vendor",
                &[
                    "Specifications",
                    "Pricing",
                    "Delivery",
                    "Quality",
                    "Warranty",
                    "Payment Terms",
                ],
                &["Indian Contract Act", "Sale of Goods Act"],
                &["Quality issues", "Delivery delays", "Payment disputes"],
            ),
            ContractType::Lease => (
                "Agreement for rental of property or premises",
                &[
                    "Rent",
                    "Security Deposit",
                    "Term",
                    "Maintenance",
                    "Termination",
                    "Renewal",
                ],
                &["Transfer of Property Act", "Rent Control Acts", "Stamp Act"],
                &["Lock-in periods", "Unfair termination", "Maintenance disputes"],
            ),
            ContractType::Service => (
                "Agreement for provision of professional services",
                &[
                    "Scope of Work",
                    "Deliverables",
                    "Payment",
                    "Timeline",
                    "Acceptance",
                    "Liability",
                ],
                &["Indian Contract Act", "IT Act (for digital services)"],
                &["Scope creep", "Unclear deliverables", "Payment delays"],
            ),
            ContractType::NonDisclosure => (
                "Agreement to protect confidential information",
                &[
                    "Definition of Confidential Information",
                    "Obligations",
                    "Exclusions",
                    "Term",
                    "Return of Information",
                ],
                &["Indian Contract Act", "IT Act"],
                &[
                    "Overly broad definitions",
                    "Perpetual obligations",
                    "Unclear exceptions",
                ],
            ),
            _ => (
                "Standard commercial agreement",
                &[
                    "Terms",
                    "Obligations",
                    "Payment",
                    "Termination",
                    "Dispute Resolution",
                ],
                &["Indian Contract Act"],
                &[
                    "Unfavorable terms",
                    "Unclear obligations",
                    "Dispute resolution issues",
                ],
            ),
        };

        ContractTypeInfo {
            description: description.to_string(),
            key_clauses: key_clauses.iter().map(|s| s.to_string()).collect(),
            applicable_laws: applicable_laws.iter().map(|s| s.to_string()).collect(),
            common_risks: common_risks.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Clauses a contract of this type is expected to carry
    pub fn suggest_required_clauses(&self, contract_type: ContractType) -> Vec<String> {
        let clauses: &[&str] = match contract_type {
            ContractType::Employment => &[
                "Definitions",
                "Position and Duties",
                "Compensation and Benefits",
                "Working Hours",
                "Leave Policy",
                "Probation Period",
                "Termination",
                "Notice Period",
                "Confidentiality",
                "Non-Compete",
                "Intellectual Property",
                "Dispute Resolution",
                "Governing Law",
            ],
            ContractType::Vendor => &[
                "Definitions",
                "Scope of Supply",
                "Specifications",
                "Pricing",
                "Payment Terms",
                "Delivery",
                "Inspection and Acceptance",
                "Warranty",
                "Indemnification",
                "Limitation of Liability",
                "Termination",
                "Dispute Resolution",
            ],
            ContractType::Lease => &[
                "Definitions",
                "Premises Description",
                "Term",
                "Rent and Payment",
                "Security Deposit",
                "Maintenance",
                "Permitted Use",
                "Alterations",
                "Insurance",
                "Termination",
                "Renewal",
                "Dispute Resolution",
            ],
            ContractType::Service => &[
                "Definitions",
                "Scope of Services",
                "Deliverables",
                "Timeline",
                "Payment Terms",
                "Acceptance Criteria",
                "Warranties",
                "Confidentiality",
                "Intellectual Property",
                "Indemnification",
                "Limitation of Liability",
                "Termination",
                "Dispute Resolution",
            ],
            ContractType::NonDisclosure => &[
                "Definitions",
                "Confidential Information",
                "Obligations of Receiving Party",
                "Exclusions",
                "Term",
                "Return of Information",
                "Remedies",
                "No License",
                "Governing Law",
            ],
            _ => &[
                "Definitions",
                "Scope",
                "Obligations",
                "Payment",
                "Term",
                "Termination",
                "Confidentiality",
                "Dispute Resolution",
                "Governing Law",
            ],
        };
        clauses.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_employment_agreement() {
        let classifier = ContractClassifier::new();
        let result = classifier.classify(
            "EMPLOYMENT AGREEMENT between the Employer and the Employee. The Employee shall \
             receive a salary. Probation period of six months. Notice period of 30 days. \
             WHEREAS the parties agree. DEFINITIONS follow. SIGNED by both parties.",
        );
        assert_eq!(result.contract_type, ContractType::Employment);
        assert!(result.confidence > 0.5);
        assert!(result.reasoning.contains("Employment Agreement"));
    }

    #[test]
    fn no_signal_yields_unknown_with_zero_confidence() {
        let classifier = ContractClassifier::new();
        let result = classifier.classify("The quick brown fox jumps over the lazy dog.");
        assert_eq!(result.contract_type, ContractType::Unknown);
        assert_eq!(result.confidence, 0.0);
        assert!(result.secondary_types.is_empty());
        assert!(result.reasoning.contains("Unable to determine"));
    }

    #[test]
    fn secondary_types_need_a_third_of_top_score() {
        let classifier = ContractClassifier::new();
        let result = classifier.classify(
            "NON-DISCLOSURE AGREEMENT. Confidential information of the disclosing party \
             shall be protected by the receiving party. Trade secret and proprietary data. \
             The consultant provides advisory services under this engagement.",
        );
        assert_eq!(result.contract_type, ContractType::NonDisclosure);
        for (_, score) in &result.secondary_types {
            assert!(*score > 0.3 && *score <= 1.0);
        }
    }

    #[test]
    fn structure_score_counts_all_five_markers() {
        let classifier = ContractClassifier::new();
        let full = classifier.structure_score(
            "WHEREAS ... DEFINITIONS ... SCHEDULE A ... SIGNED ... BETWEEN the parties",
        );
        assert!((full - 1.0).abs() < 1e-9);
        assert_eq!(classifier.structure_score("nothing structural"), 0.0);
    }

    #[test]
    fn type_info_falls_back_for_uncatalogued_types() {
        let classifier = ContractClassifier::new();
        let info = classifier.contract_type_info(ContractType::Loan);
        assert_eq!(info.description, "Standard commercial agreement");
        let nda = classifier.contract_type_info(ContractType::NonDisclosure);
        assert!(nda.key_clauses.contains(&"Exclusions".to_string()));
    }

    #[test]
    fn required_clauses_default_list_has_nine_entries() {
        let classifier = ContractClassifier::new();
        assert_eq!(
            classifier
                .suggest_required_clauses(ContractType::Unknown)
                .len(),
            9
        );
        assert_eq!(
            classifier
                .suggest_required_clauses(ContractType::Employment)
                .len(),
            13
        );
    }
}
