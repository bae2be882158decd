//! # Risk Analyzer Module
//!
//! ## Purpose
//! Scores contract clauses against a fixed taxonomy of risk categories, red
//! flags, and ambiguity indicators, then rolls clause scores up into an
//! overall contract risk assessment with prioritized issues and
//! recommendations.
//!
//! ## Input/Output Specification
//! - **Input**: Full contract text, optionally with parsed clauses
//! - **Output**: [`ContractRisk`] holding per-clause [`ClauseRisk`] records,
//!   level distribution, category averages, issues, and recommendations
//!
//! ## Key Features
//! - Twelve weighted risk categories with calibrated base risks
//! - Pattern hits score 0.3 each, keyword hits 0.2, clamped with base risk
//! - Clause score blends 40% weighted category sum with 60% peak category
//! - Red flags add 0.15 each, clamped at 1.0
//! - Levels: >=0.8 critical, >=0.6 high, >=0.35 medium, else low

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clause_parser::Clause;

/// Risk severity, ordered low to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of risk categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    PenaltyClause,
    IndemnityClause,
    TerminationClause,
    ArbitrationClause,
    AutoRenewal,
    NonCompete,
    IpTransfer,
    LiabilityLimitation,
    Confidentiality,
    UnlimitedLiability,
    UnilateralAmendment,
    WaiverOfRights,
    /// Clause matched no category
    General,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::PenaltyClause => "penalty_clause",
            RiskCategory::IndemnityClause => "indemnity_clause",
            RiskCategory::TerminationClause => "termination_clause",
            RiskCategory::ArbitrationClause => "arbitration_clause",
            RiskCategory::AutoRenewal => "auto_renewal",
            RiskCategory::NonCompete => "non_compete",
            RiskCategory::IpTransfer => "ip_transfer",
            RiskCategory::LiabilityLimitation => "liability_limitation",
            RiskCategory::Confidentiality => "confidentiality",
            RiskCategory::UnlimitedLiability => "unlimited_liability",
            RiskCategory::UnilateralAmendment => "unilateral_amendment",
            RiskCategory::WaiverOfRights => "waiver_of_rights",
            RiskCategory::General => "general",
        }
    }

    /// Display name used in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            RiskCategory::PenaltyClause => "Penalty Clauses",
            RiskCategory::IndemnityClause => "Indemnity Clauses",
            RiskCategory::TerminationClause => "Unilateral Termination",
            RiskCategory::ArbitrationClause => "Arbitration & Jurisdiction",
            RiskCategory::AutoRenewal => "Auto-Renewal & Lock-in",
            RiskCategory::NonCompete => "Non-Compete Clauses",
            RiskCategory::IpTransfer => "IP Transfer Clauses",
            RiskCategory::LiabilityLimitation => "Liability Limitation",
            RiskCategory::Confidentiality => "Confidentiality & NDA",
            RiskCategory::UnlimitedLiability => "Unlimited Liability",
            RiskCategory::UnilateralAmendment => "Unilateral Amendment",
            RiskCategory::WaiverOfRights => "Waiver of Rights",
            RiskCategory::General => "General",
        }
    }
}

/// Risk assessment for a single clause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseRisk {
    pub clause_id: String,
    pub clause_type: String,
    /// Clause text, truncated to 500 characters
    pub clause_text: String,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub risk_factors: Vec<String>,
    pub red_flags: Vec<String>,
    pub impact_description: String,
    pub mitigation_suggestions: Vec<String>,
    pub category: RiskCategory,
}

/// Count of clauses per risk level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

/// Overall contract risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRisk {
    pub overall_score: f64,
    pub overall_level: RiskLevel,
    pub clause_risks: Vec<ClauseRisk>,
    pub high_risk_clauses: Vec<ClauseRisk>,
    pub risk_distribution: RiskDistribution,
    pub category_scores: BTreeMap<String, f64>,
    pub priority_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Condensed view of a [`ContractRisk`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub overall_risk_score: f64,
    pub overall_risk_level: RiskLevel,
    pub total_clauses_analyzed: usize,
    pub high_risk_clause_count: usize,
    pub risk_distribution: RiskDistribution,
    pub top_risk_categories: Vec<(String, f64)>,
    pub priority_issues: Vec<String>,
    pub key_recommendations: Vec<String>,
}

struct CategoryRules {
    category: RiskCategory,
    patterns: Vec<Regex>,
    keywords: &'static [&'static str],
    weight: f64,
    base_risk: f64,
}

/// Risk category rule tables, loaded once. Weights and base risks are
/// calibrated values; changing them shifts every score downstream.
static RISK_CATEGORIES: Lazy<Vec<CategoryRules>> = Lazy::new(|| {
    let table: &[(RiskCategory, &[&str], &[&str], f64, f64)] = &[
        (
            RiskCategory::PenaltyClause,
            &[
                r"penalty\s+of\s+(?:rs\.?|inr|₹)?\s*[\d,]+",
                r"liquidated\s+damages",
                r"forfeit",
                r"fine\s+of",
                r"punitive\s+damages",
            ],
            &["penalty", "liquidated damages", "fine", "forfeit", "punitive"],
            0.15,
            0.6,
        ),
        (
            RiskCategory::IndemnityClause,
            &[
                r"indemnify\s+and\s+hold\s+harmless",
                r"shall\s+indemnify",
                r"indemnification\s+obligation",
                r"defend\s+and\s+indemnify",
            ],
            &["indemnify", "indemnification", "hold harmless", "defend"],
            0.15,
            0.5,
        ),
        (
            RiskCategory::TerminationClause,
            &[
                r"terminate\s+(?:this\s+)?agreement\s+(?:at\s+)?(?:its?\s+)?(?:sole\s+)?discretion",
                r"terminate\s+without\s+(?:any\s+)?(?:cause|reason)",
                r"immediate\s+termination",
                r"terminate\s+forthwith",
            ],
            &["terminate", "termination", "cancel", "revoke"],
            0.12,
            0.7,
        ),
        (
            RiskCategory::ArbitrationClause,
            &[
                r"arbitration\s+(?:in|at)\s+\w+",
                r"exclusive\s+jurisdiction",
                r"courts?\s+(?:of|at|in)\s+\w+\s+shall\s+have",
                r"governed\s+by\s+the\s+laws?\s+of",
            ],
            &["arbitration", "jurisdiction", "dispute resolution", "governing law"],
            0.10,
            0.4,
        ),
        (
            RiskCategory::AutoRenewal,
            &[
                r"auto(?:matic(?:ally)?)?[\s-]?renew",
                r"lock[\s-]?in\s+period",
                r"minimum\s+(?:term|period|commitment)",
                r"shall\s+(?:automatically\s+)?(?:be\s+)?renewed",
            ],
            &["auto-renewal", "automatic renewal", "lock-in", "minimum term"],
            0.10,
            0.5,
        ),
        (
            RiskCategory::NonCompete,
            &[
                r"non[\s-]?compete",
                r"not\s+(?:directly\s+or\s+indirectly\s+)?(?:engage|compete)",
                r"restrictive\s+covenant",
                r"shall\s+not\s+(?:carry\s+on|engage\s+in)",
            ],
            &["non-compete", "non-competition", "restrictive covenant", "compete"],
            0.12,
            0.6,
        ),
        (
            RiskCategory::IpTransfer,
            &[
                r"(?:all\s+)?intellectual\s+property\s+(?:rights?\s+)?(?:shall\s+)?(?:belong|vest|transfer)",
                r"assign(?:s|ment)?\s+(?:all\s+)?(?:right|title|interest)",
                r"work[\s-]?(?:made[\s-]?)?for[\s-]?hire",
                r"ownership\s+of\s+(?:all\s+)?(?:work|deliverables|ip)",
            ],
            &["intellectual property", "ip rights", "patent", "copyright", "ownership"],
            0.13,
            0.6,
        ),
        (
            RiskCategory::LiabilityLimitation,
            &[
                r"(?:total|aggregate|maximum)\s+liability\s+(?:shall\s+)?(?:not\s+)?exceed",
                r"cap\s+(?:on\s+)?liability",
                r"exclude(?:s|d)?\s+(?:all\s+)?liability",
                r"in\s+no\s+event\s+(?:shall|will)\s+(?:\w+\s+)?be\s+liable",
            ],
            &["limitation of liability", "cap on liability", "exclude liability"],
            0.08,
            0.5,
        ),
        (
            RiskCategory::Confidentiality,
            &[
                r"confidential\s+information",
                r"non[\s-]?disclosure",
                r"proprietary\s+information",
                r"trade\s+secret",
            ],
            &["confidential", "confidentiality", "non-disclosure", "proprietary"],
            0.05,
            0.3,
        ),
        (
            RiskCategory::UnlimitedLiability,
            &[
                r"unlimited\s+liability",
                r"fully\s+liable",
                r"liable\s+(?:for\s+)?(?:all|any)\s+(?:losses?|damages?)",
                r"without\s+(?:any\s+)?limitation",
            ],
            &["unlimited liability", "fully liable", "all losses"],
            0.15,
            0.9,
        ),
        (
            RiskCategory::UnilateralAmendment,
            &[
                r"(?:may|shall\s+have\s+the\s+right\s+to)\s+(?:amend|modify|change)\s+(?:this\s+agreement|these\s+terms)",
                r"(?:sole|absolute)\s+discretion\s+(?:to\s+)?(?:amend|modify)",
                r"reserves?\s+the\s+right\s+to\s+(?:amend|modify|change)",
            ],
            &["amend", "modify", "change", "sole discretion"],
            0.10,
            0.7,
        ),
        (
            RiskCategory::WaiverOfRights,
            &[
                r"waive(?:s|r)?\s+(?:any\s+)?(?:right|claim)",
                r"release(?:s|d)?\s+(?:and\s+)?(?:discharge)?",
                r"forever\s+(?:waive|release|discharge)",
            ],
            &["waive", "waiver", "release", "discharge", "relinquish"],
            0.08,
            0.6,
        ),
    ];

    table
        .iter()
        .map(|(category, patterns, keywords, weight, base_risk)| CategoryRules {
            category: *category,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("valid risk pattern"))
                .collect(),
            keywords,
            weight: *weight,
            base_risk: *base_risk,
        })
        .collect()
});

/// Patterns that are red flags regardless of category
static RED_FLAGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"sole\s+and\s+absolute\s+discretion", "Absolute discretion given to one party"),
        (r"without\s+(?:any\s+)?(?:cause|reason|notice)", "Action without cause or notice"),
        (r"irrevocable", "Irrevocable commitment"),
        (r"perpetual(?:ly)?", "Perpetual obligation"),
        (r"unconditional(?:ly)?", "Unconditional obligation"),
        (
            r"(?:shall|will)\s+not\s+(?:be\s+)?(?:entitled|have\s+(?:any\s+)?right)",
            "Denial of rights",
        ),
        (
            r"at\s+(?:its?|their)\s+(?:own\s+)?(?:sole\s+)?(?:cost|expense)",
            "Cost burden on one party",
        ),
        (
            r"(?:any|all)\s+(?:claims?|disputes?)\s+(?:shall\s+)?(?:be\s+)?(?:waived|released)",
            "Waiver of claims",
        ),
        (r"binding\s+(?:and\s+)?(?:final|conclusive)", "Binding without recourse"),
        (r"(?:no|without)\s+(?:right\s+(?:of|to)\s+)?appeal", "No right of appeal"),
    ]
    .iter()
    .map(|(p, desc)| (Regex::new(p).expect("valid red flag pattern"), *desc))
    .collect()
});

/// Vague language indicators
static AMBIGUITY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\breasonable\b", "Subjective 'reasonable' standard"),
        (r"\bmaterial(?:ly)?\b", "Undefined 'material' threshold"),
        (r"\bsubstantial(?:ly)?\b", "Vague 'substantial' quantifier"),
        (r"\bpromptly\b", "Undefined 'promptly' timeframe"),
        (r"\btimely\b", "Undefined 'timely' timeframe"),
        (r"\bbest\s+efforts?\b", "Unclear 'best efforts' standard"),
        (r"\breasonable\s+efforts?\b", "Unclear 'reasonable efforts' standard"),
        (r"\bas\s+(?:needed|required|appropriate)\b", "Discretionary language"),
        (r"\band/or\b", "Ambiguous 'and/or' conjunction"),
        (r"\bincluding\s+(?:but\s+)?not\s+limited\s+to\b", "Open-ended list"),
    ]
    .iter()
    .map(|(p, desc)| (Regex::new(p).expect("valid ambiguity pattern"), *desc))
    .collect()
});

static SECTION_SPLITS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\n\d+\.\s+[A-Z]", r"\n[A-Z][A-Z\s]+\n", r"\n\n+"]
        .iter()
        .map(|p| Regex::new(p).expect("valid section split pattern"))
        .collect()
});

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk analysis engine. Stateless; rule tables are static.
#[derive(Debug, Default)]
pub struct RiskAnalyzer;

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a contract, using parsed clauses when available and falling
    /// back to a section split of the raw text otherwise
    pub fn analyze_contract(&self, text: &str, clauses: Option<&[Clause]>) -> ContractRisk {
        let clause_risks: Vec<ClauseRisk> = match clauses {
            Some(parsed) if !parsed.is_empty() => {
                let mut flat = Vec::new();
                flatten_clauses(parsed, &mut flat);
                flat.iter()
                    .map(|clause| {
                        self.analyze_clause(
                            &clause.clause_id,
                            clause.clause_type.as_str(),
                            &format!("{}\n{}", clause.title, clause.content),
                        )
                    })
                    .collect()
            }
            _ => self
                .split_into_sections(text)
                .iter()
                .enumerate()
                .map(|(i, section)| {
                    self.analyze_clause(&format!("section_{}", i), "unknown", section)
                })
                .collect(),
        };

        let overall_score = round2(self.overall_score(&clause_risks));
        let overall_level = score_to_level(overall_score);

        let high_risk_clauses: Vec<ClauseRisk> = clause_risks
            .iter()
            .filter(|cr| cr.risk_level >= RiskLevel::High)
            .cloned()
            .collect();

        let mut risk_distribution = RiskDistribution::default();
        for cr in &clause_risks {
            match cr.risk_level {
                RiskLevel::Low => risk_distribution.low += 1,
                RiskLevel::Medium => risk_distribution.medium += 1,
                RiskLevel::High => risk_distribution.high += 1,
                RiskLevel::Critical => risk_distribution.critical += 1,
            }
        }

        let category_scores = self.category_scores(&clause_risks);
        let priority_issues = self.priority_issues(&clause_risks);
        let recommendations = self.recommendations(&clause_risks, overall_score);

        tracing::debug!(
            overall_score,
            overall_level = overall_level.as_str(),
            clauses = clause_risks.len(),
            "Analyzed contract risk"
        );

        ContractRisk {
            overall_score,
            overall_level,
            clause_risks,
            high_risk_clauses,
            risk_distribution,
            category_scores,
            priority_issues,
            recommendations,
        }
    }

    /// Score a single clause against all risk categories
    pub fn analyze_clause(&self, clause_id: &str, clause_type: &str, text: &str) -> ClauseRisk {
        let text_lower = text.to_lowercase();

        let mut risk_factors: Vec<String> = Vec::new();
        let mut red_flags: Vec<String> = Vec::new();
        // (category, clamped score) in table order
        let mut category_scores: Vec<(RiskCategory, f64)> = Vec::new();

        for rules in RISK_CATEGORIES.iter() {
            let mut category_score = 0.0;

            for pattern in &rules.patterns {
                let matches = pattern.find_iter(&text_lower).count();
                if matches > 0 {
                    category_score += matches as f64 * 0.3;
                    risk_factors.push(format!(
                        "{}: Pattern match found",
                        rules.category.display_name()
                    ));
                }
            }

            for keyword in rules.keywords {
                if text_lower.contains(keyword) {
                    category_score += 0.2;
                }
            }

            if category_score > 0.0 {
                category_scores.push((
                    rules.category,
                    (category_score + rules.base_risk).min(1.0),
                ));
            }
        }

        for (pattern, description) in RED_FLAGS.iter() {
            if pattern.is_match(&text_lower) {
                red_flags.push(description.to_string());
            }
        }

        let ambiguity_count = AMBIGUITY_PATTERNS
            .iter()
            .filter(|(pattern, _)| pattern.is_match(&text_lower))
            .count();
        if ambiguity_count > 0 {
            risk_factors.push(format!("Ambiguous language: {} instances", ambiguity_count));
        }

        let mut risk_score = if category_scores.is_empty() {
            // Flat base risk for an uncategorized clause
            0.2
        } else {
            let weighted: f64 = category_scores
                .iter()
                .map(|(category, score)| score * category_weight(*category))
                .sum();
            let peak = category_scores
                .iter()
                .map(|(_, score)| *score)
                .fold(0.0f64, f64::max);
            weighted * 0.4 + peak * 0.6
        };

        if !red_flags.is_empty() {
            risk_score = (risk_score + red_flags.len() as f64 * 0.15).min(1.0);
        }

        let risk_level = score_to_level(risk_score);

        // First maximal entry in table order wins ties
        let category = category_scores
            .iter()
            .fold(None::<(RiskCategory, f64)>, |best, &(cat, score)| {
                match best {
                    Some((_, best_score)) if best_score >= score => best,
                    _ => Some((cat, score)),
                }
            })
            .map(|(cat, _)| cat)
            .unwrap_or(RiskCategory::General);

        let clause_text = if text.chars().count() > 500 {
            let truncated: String = text.chars().take(500).collect();
            format!("{}...", truncated)
        } else {
            text.to_string()
        };

        ClauseRisk {
            clause_id: clause_id.to_string(),
            clause_type: clause_type.to_string(),
            clause_text,
            risk_level,
            risk_score: round2(risk_score),
            risk_factors,
            red_flags: red_flags.clone(),
            impact_description: impact_description(category, risk_level),
            mitigation_suggestions: mitigation_suggestions(category, &red_flags),
            category,
        }
    }

    /// Split unparsed text into analyzable sections. Fragments of 100
    /// characters or less are discarded; if nothing survives, non-blank text
    /// is analyzed whole and blank text yields no sections at all.
    fn split_into_sections(&self, text: &str) -> Vec<String> {
        let mut sections = vec![text.to_string()];
        for pattern in SECTION_SPLITS.iter() {
            sections = sections
                .iter()
                .flat_map(|section| pattern.split(section))
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect();
        }

        sections.retain(|s| s.chars().count() > 100);

        if sections.is_empty() {
            if text.trim().is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            }
        } else {
            sections
        }
    }

    /// An empty clause list scores 0.5 (medium): there is nothing to clear it
    fn overall_score(&self, clause_risks: &[ClauseRisk]) -> f64 {
        if clause_risks.is_empty() {
            return 0.5;
        }

        let scores: Vec<f64> = clause_risks.iter().map(|cr| cr.risk_score).collect();
        let avg = scores.iter().sum::<f64>() / scores.len() as f64;
        let max = scores.iter().cloned().fold(0.0f64, f64::max);

        let high_risk_count = clause_risks
            .iter()
            .filter(|cr| cr.risk_level >= RiskLevel::High)
            .count();
        let high_risk_factor = (high_risk_count as f64 * 0.1).min(0.3);

        (avg * 0.4 + max * 0.4 + high_risk_factor).min(1.0)
    }

    /// Average clause score per primary category
    fn category_scores(&self, clause_risks: &[ClauseRisk]) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for cr in clause_risks {
            let entry = sums.entry(cr.category.as_str().to_string()).or_insert((0.0, 0));
            entry.0 += cr.risk_score;
            entry.1 += 1;
        }
        sums.into_iter()
            .map(|(cat, (sum, count))| (cat, round2(sum / count as f64)))
            .collect()
    }

    /// Unique red flags first, then high-risk category callouts, capped at 10
    fn priority_issues(&self, clause_risks: &[ClauseRisk]) -> Vec<String> {
        let mut issues: Vec<String> = Vec::new();

        for cr in clause_risks {
            for flag in &cr.red_flags {
                if !issues.contains(flag) {
                    issues.push(flag.clone());
                }
            }
        }

        for cr in clause_risks {
            if cr.risk_level >= RiskLevel::High {
                let issue = format!("High-risk {} detected", cr.category.display_name());
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }

        issues.truncate(10);
        issues
    }

    fn recommendations(&self, clause_risks: &[ClauseRisk], overall_score: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        if overall_score >= 0.7 {
            recommendations
                .push("[!] HIGH RISK: Strongly recommend legal review before signing".to_string());
            recommendations.push("Consider renegotiating major terms".to_string());
        } else if overall_score >= 0.5 {
            recommendations.push("[!] MODERATE RISK: Legal review recommended".to_string());
            recommendations.push("Review highlighted clauses carefully".to_string());
        } else {
            recommendations.push("[OK] LOW RISK: Contract appears reasonable".to_string());
            recommendations.push("Standard review recommended".to_string());
        }

        let flagged: Vec<RiskCategory> = clause_risks
            .iter()
            .filter(|cr| cr.risk_score > 0.5)
            .map(|cr| cr.category)
            .collect();
        let has = |cat: RiskCategory| flagged.contains(&cat);

        if has(RiskCategory::PenaltyClause) {
            recommendations.push("Negotiate penalty caps or removal".to_string());
        }
        if has(RiskCategory::IndemnityClause) {
            recommendations.push("Request mutual indemnification or caps".to_string());
        }
        if has(RiskCategory::TerminationClause) {
            recommendations.push("Ensure termination rights are balanced".to_string());
        }
        if has(RiskCategory::NonCompete) {
            recommendations.push("Review non-compete scope and duration".to_string());
        }
        if has(RiskCategory::IpTransfer) {
            recommendations.push("Clarify IP ownership and licensing terms".to_string());
        }
        if has(RiskCategory::UnlimitedLiability) {
            recommendations.push("CRITICAL: Negotiate liability caps".to_string());
        }

        recommendations
    }

    /// Condensed view of a full risk assessment
    pub fn risk_summary(&self, contract_risk: &ContractRisk) -> RiskSummary {
        let mut top_categories: Vec<(String, f64)> = contract_risk
            .category_scores
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        top_categories
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        top_categories.truncate(5);

        RiskSummary {
            overall_risk_score: contract_risk.overall_score,
            overall_risk_level: contract_risk.overall_level,
            total_clauses_analyzed: contract_risk.clause_risks.len(),
            high_risk_clause_count: contract_risk.high_risk_clauses.len(),
            risk_distribution: contract_risk.risk_distribution.clone(),
            top_risk_categories: top_categories,
            priority_issues: contract_risk.priority_issues.iter().take(5).cloned().collect(),
            key_recommendations: contract_risk
                .recommendations
                .iter()
                .take(5)
                .cloned()
                .collect(),
        }
    }
}

fn flatten_clauses<'a>(clauses: &'a [Clause], out: &mut Vec<&'a Clause>) {
    for clause in clauses {
        out.push(clause);
        flatten_clauses(&clause.sub_clauses, out);
    }
}

fn category_weight(category: RiskCategory) -> f64 {
    RISK_CATEGORIES
        .iter()
        .find(|rules| rules.category == category)
        .map(|rules| rules.weight)
        .unwrap_or(0.0)
}

/// Boundary scores resolve upward
fn score_to_level(score: f64) -> RiskLevel {
    if score >= 0.8 {
        RiskLevel::Critical
    } else if score >= 0.6 {
        RiskLevel::High
    } else if score >= 0.35 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn impact_description(category: RiskCategory, risk_level: RiskLevel) -> String {
    let base = match category {
        RiskCategory::PenaltyClause => {
            "May result in significant financial penalties if obligations are not met"
        }
        RiskCategory::IndemnityClause => {
            "Could require compensation for third-party claims or losses"
        }
        RiskCategory::TerminationClause => {
            "Contract may be terminated unexpectedly, disrupting business"
        }
        RiskCategory::ArbitrationClause => {
            "Disputes may need to be resolved in specific jurisdiction"
        }
        RiskCategory::AutoRenewal => {
            "Contract may automatically extend, creating ongoing obligations"
        }
        RiskCategory::NonCompete => "May restrict future business activities and opportunities",
        RiskCategory::IpTransfer => "May lose ownership of created intellectual property",
        RiskCategory::LiabilityLimitation => "May limit ability to recover damages",
        RiskCategory::Confidentiality => "Imposes obligations to protect information",
        RiskCategory::UnlimitedLiability => {
            "Full exposure to all potential losses without cap"
        }
        RiskCategory::UnilateralAmendment => "Terms may change without consent",
        RiskCategory::WaiverOfRights => "May lose important legal protections",
        RiskCategory::General => "May have legal or financial implications",
    };

    match risk_level {
        RiskLevel::Critical => format!("CRITICAL: {}. Immediate attention required.", base),
        RiskLevel::High => format!("HIGH RISK: {}. Careful review needed.", base),
        RiskLevel::Medium => format!("MODERATE: {}. Consider negotiating.", base),
        RiskLevel::Low => format!("LOW RISK: {}. Standard terms.", base),
    }
}

fn mitigation_suggestions(category: RiskCategory, red_flags: &[String]) -> Vec<String> {
    let suggestions: &[&str] = match category {
        RiskCategory::PenaltyClause => &[
            "Negotiate a cap on total penalties",
            "Request cure period before penalties apply",
            "Add force majeure exceptions",
        ],
        RiskCategory::IndemnityClause => &[
            "Request mutual indemnification",
            "Add cap on indemnity obligations",
            "Limit to direct damages only",
        ],
        RiskCategory::TerminationClause => &[
            "Add termination for convenience for both parties",
            "Require reasonable notice period",
            "Include cure period for breaches",
        ],
        RiskCategory::NonCompete => &[
            "Limit geographic scope",
            "Reduce duration to reasonable period",
            "Narrow scope of restricted activities",
        ],
        RiskCategory::IpTransfer => &[
            "Retain license to use created IP",
            "Limit transfer to project-specific IP",
            "Add fair compensation for IP transfer",
        ],
        RiskCategory::UnlimitedLiability => &[
            "Add liability cap (e.g., contract value)",
            "Exclude consequential damages",
            "Add insurance requirements",
        ],
        _ => &[
            "Review clause with legal counsel",
            "Consider negotiating more balanced terms",
            "Document any concerns before signing",
        ],
    };

    let mut result: Vec<String> = suggestions.iter().map(|s| s.to_string()).collect();
    if !red_flags.is_empty() {
        result.insert(0, "Address red flags before proceeding".to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_and_indemnity_clause_scores_high() {
        let analyzer = RiskAnalyzer::new();
        let risk = analyzer.analyze_clause(
            "clause_1",
            "penalty",
            "Penalty of Rs. 50,000 shall apply. Employee shall indemnify the Company.",
        );
        // penalty: pattern 0.3 + keyword 0.2 + base 0.6 -> 1.0 (clamped)
        // indemnity: pattern 0.3 + keyword 0.2 + base 0.5 -> 1.0 (clamped)
        // weighted 0.4 * (1.0*0.15 + 1.0*0.15) + 0.6 * 1.0 = 0.72
        assert!((risk.risk_score - 0.72).abs() < 1e-9);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.category, RiskCategory::PenaltyClause);
    }

    #[test]
    fn uncategorized_clause_gets_flat_base() {
        let analyzer = RiskAnalyzer::new();
        let risk = analyzer.analyze_clause("c", "unknown", "The sky above the port was blue.");
        assert!((risk.risk_score - 0.2).abs() < 1e-9);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(risk.category, RiskCategory::General);
    }

    #[test]
    fn red_flags_push_score_up_clamped() {
        let analyzer = RiskAnalyzer::new();
        let risk = analyzer.analyze_clause(
            "c",
            "unknown",
            "This irrevocable and perpetual commitment is binding and final.",
        );
        // 0.2 base + 3 red flags * 0.15 = 0.65
        assert!((risk.risk_score - 0.65).abs() < 1e-9);
        assert_eq!(risk.red_flags.len(), 3);
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(
            risk.mitigation_suggestions[0],
            "Address red flags before proceeding"
        );
    }

    #[test]
    fn level_boundaries_resolve_upward() {
        assert_eq!(score_to_level(0.8), RiskLevel::Critical);
        assert_eq!(score_to_level(0.6), RiskLevel::High);
        assert_eq!(score_to_level(0.35), RiskLevel::Medium);
        assert_eq!(score_to_level(0.34), RiskLevel::Low);
    }

    #[test]
    fn blank_text_defaults_to_medium() {
        let analyzer = RiskAnalyzer::new();
        let risk = analyzer.analyze_contract("", None);
        assert!(risk.clause_risks.is_empty());
        assert!((risk.overall_score - 0.5).abs() < 1e-9);
        assert_eq!(risk.overall_level, RiskLevel::Medium);
    }

    #[test]
    fn short_nonblank_text_is_analyzed_whole() {
        let analyzer = RiskAnalyzer::new();
        let risk = analyzer.analyze_contract("Short unlimited liability clause.", None);
        assert_eq!(risk.clause_risks.len(), 1);
        assert_eq!(risk.clause_risks[0].clause_id, "section_0");
    }

    #[test]
    fn unlimited_liability_drives_high_overall() {
        let analyzer = RiskAnalyzer::new();
        let text = "1. LIABILITY\nThe Contractor shall have unlimited liability and shall be \
                    fully liable for all losses arising out of this agreement without any \
                    limitation whatsoever, and this obligation is perpetual in nature.";
        let risk = analyzer.analyze_contract(text, None);
        // single clause: 0.4*0.15 + 0.6*1.0 + one red flag = 0.81 (critical)
        // rollup: 0.4*0.81 + 0.4*0.81 + 0.1 = 0.75
        assert!((risk.overall_score - 0.75).abs() < 1e-9);
        assert_eq!(risk.overall_level, RiskLevel::High);
        assert_eq!(risk.high_risk_clauses.len(), 1);
        assert_eq!(risk.clause_risks[0].risk_level, RiskLevel::Critical);
        assert!(risk
            .recommendations
            .contains(&"CRITICAL: Negotiate liability caps".to_string()));
    }

    #[test]
    fn priority_issues_deduplicate_and_cap() {
        let analyzer = RiskAnalyzer::new();
        let make = |id: &str| {
            analyzer.analyze_clause(id, "unknown", "This commitment is irrevocable and perpetual.")
        };
        let clause_risks = vec![make("a"), make("b")];
        let issues = analyzer.priority_issues(&clause_risks);
        let irrevocable_count = issues
            .iter()
            .filter(|i| i.contains("Irrevocable"))
            .count();
        assert_eq!(irrevocable_count, 1);
        assert!(issues.len() <= 10);
    }

    #[test]
    fn summary_takes_top_five_categories() {
        let analyzer = RiskAnalyzer::new();
        let text = "1. PENALTY\nPenalty of Rs. 10,000 applies with liquidated damages for breach \
                    of the terms herein, and the defaulting party shall forfeit its deposit.\n\
                    2. INDEMNITY\nThe Vendor shall indemnify and hold harmless the Client from \
                    any claims, damages, and losses arising out of the Vendor's performance.";
        let contract_risk = analyzer.analyze_contract(text, None);
        let summary = analyzer.risk_summary(&contract_risk);
        assert!(summary.top_risk_categories.len() <= 5);
        assert_eq!(
            summary.total_clauses_analyzed,
            contract_risk.clause_risks.len()
        );
    }
}
