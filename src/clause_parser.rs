//! # Clause Parser Module
//!
//! ## Purpose
//! Splits normalized contract text into a hierarchical clause tree, tags each
//! clause with a closed set of types, and provides structural analysis on top
//! of the tree (census, missing standard clauses, ambiguity scan, defined
//! terms, summaries).
//!
//! ## Input/Output Specification
//! - **Input**: Normalized contract text with line structure intact
//! - **Output**: Top-level [`Clause`] trees (parents own children; each child
//!   carries a non-owning `parent_id` back-reference)
//!
//! ## Key Features
//! - Fixed header pattern table, first match wins, levels 1-3
//! - Clause type detection in fixed table order
//! - Level-pointer hierarchy construction
//! - Ambiguity indicator scan sorted by total occurrences
//! - Defined-term extraction (three pattern families, later overwrites earlier)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of clause categories recognized in contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseType {
    Definitions,
    #[serde(rename = "scope_of_work")]
    Scope,
    #[serde(rename = "payment_terms")]
    Payment,
    #[serde(rename = "delivery_performance")]
    Delivery,
    #[serde(rename = "warranties_representations")]
    Warranty,
    #[serde(rename = "indemnification")]
    Indemnity,
    #[serde(rename = "limitation_of_liability")]
    Liability,
    Confidentiality,
    #[serde(rename = "intellectual_property")]
    IpRights,
    #[serde(rename = "term_duration")]
    Term,
    Termination,
    #[serde(rename = "dispute_resolution")]
    Dispute,
    ForceMajeure,
    Assignment,
    Notices,
    GoverningLaw,
    EntireAgreement,
    Amendment,
    Severability,
    Waiver,
    NonCompete,
    NonSolicitation,
    Penalty,
    Insurance,
    Compliance,
    #[serde(rename = "audit_rights")]
    Audit,
    DataProtection,
    Miscellaneous,
    Unknown,
}

impl ClauseType {
    /// Stable string identifier used in reports and keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Definitions => "definitions",
            ClauseType::Scope => "scope_of_work",
            ClauseType::Payment => "payment_terms",
            ClauseType::Delivery => "delivery_performance",
            ClauseType::Warranty => "warranties_representations",
            ClauseType::Indemnity => "indemnification",
            ClauseType::Liability => "limitation_of_liability",
            ClauseType::Confidentiality => "confidentiality",
            ClauseType::IpRights => "intellectual_property",
            ClauseType::Term => "term_duration",
            ClauseType::Termination => "termination",
            ClauseType::Dispute => "dispute_resolution",
            ClauseType::ForceMajeure => "force_majeure",
            ClauseType::Assignment => "assignment",
            ClauseType::Notices => "notices",
            ClauseType::GoverningLaw => "governing_law",
            ClauseType::EntireAgreement => "entire_agreement",
            ClauseType::Amendment => "amendment",
            ClauseType::Severability => "severability",
            ClauseType::Waiver => "waiver",
            ClauseType::NonCompete => "non_compete",
            ClauseType::NonSolicitation => "non_solicitation",
            ClauseType::Penalty => "penalty",
            ClauseType::Insurance => "insurance",
            ClauseType::Compliance => "compliance",
            ClauseType::Audit => "audit_rights",
            ClauseType::DataProtection => "data_protection",
            ClauseType::Miscellaneous => "miscellaneous",
            ClauseType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ClauseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contract clause. Parents own their sub-clauses; `parent_id` is a
/// non-owning back-reference by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    pub clause_id: String,
    pub clause_type: ClauseType,
    pub title: String,
    pub content: String,
    /// Hierarchy level (1 = main clause, 2 = sub-clause, ...)
    pub level: usize,
    pub parent_id: Option<String>,
    /// Line index where the header was found
    pub start_position: usize,
    /// Line index where the clause body ends
    pub end_position: usize,
    pub sub_clauses: Vec<Clause>,
}

/// Clause type detection patterns, checked in declaration order. The order is
/// a semantic contract: earlier entries win ties (e.g. "limitation of
/// liability" before "penalty").
static CLAUSE_TYPE_PATTERNS: Lazy<Vec<(ClauseType, Vec<Regex>)>> = Lazy::new(|| {
    let table: &[(ClauseType, &[&str])] = &[
        (
            ClauseType::Definitions,
            &[r"definition", r"interpret", r"meaning", r"glossary"],
        ),
        (
            ClauseType::Scope,
            &[
                r"scope\s+of\s+work",
                r"scope\s+of\s+services",
                r"services",
                r"deliverables",
                r"work\s+order",
                r"statement\s+of\s+work",
            ],
        ),
        (
            ClauseType::Payment,
            &[
                r"payment",
                r"compensation",
                r"fee",
                r"price",
                r"consideration",
                r"invoice",
                r"billing",
                r"remuneration",
            ],
        ),
        (
            ClauseType::Delivery,
            &[
                r"delivery",
                r"performance",
                r"milestone",
                r"timeline",
                r"schedule",
                r"completion",
            ],
        ),
        (
            ClauseType::Warranty,
            &[r"warrant", r"representation", r"guarantee", r"assurance"],
        ),
        (
            ClauseType::Indemnity,
            &[r"indemnif", r"hold\s+harmless", r"defend"],
        ),
        (
            ClauseType::Liability,
            &[
                r"limitation\s+of\s+liability",
                r"liability\s+cap",
                r"liability\s+limit",
                r"exclusion\s+of\s+liability",
                r"cap\s+on\s+liability",
            ],
        ),
        (
            ClauseType::Confidentiality,
            &[
                r"confidential",
                r"non-disclosure",
                r"nda",
                r"proprietary",
                r"trade\s+secret",
                r"sensitive\s+information",
            ],
        ),
        (
            ClauseType::IpRights,
            &[
                r"intellectual\s+property",
                r"ip\s+rights",
                r"copyright",
                r"patent",
                r"trademark",
                r"ownership\s+of\s+work",
            ],
        ),
        (
            ClauseType::Term,
            &[r"^term$", r"duration", r"period\s+of\s+agreement", r"validity"],
        ),
        (
            ClauseType::Termination,
            &[r"terminat", r"cancel", r"end\s+of\s+agreement", r"expir"],
        ),
        (
            ClauseType::Dispute,
            &[r"dispute", r"arbitrat", r"mediat", r"resolution", r"settlement"],
        ),
        (
            ClauseType::ForceMajeure,
            &[
                r"force\s+majeure",
                r"act\s+of\s+god",
                r"unforeseeable",
                r"beyond\s+control",
            ],
        ),
        (
            ClauseType::Assignment,
            &[r"assignment", r"transfer\s+of\s+rights", r"subcontract"],
        ),
        (
            ClauseType::Notices,
            &[r"notice", r"communication", r"notification"],
        ),
        (
            ClauseType::GoverningLaw,
            &[
                r"governing\s+law",
                r"applicable\s+law",
                r"jurisdiction",
                r"choice\s+of\s+law",
                r"legal\s+framework",
            ],
        ),
        (
            ClauseType::EntireAgreement,
            &[
                r"entire\s+agreement",
                r"whole\s+agreement",
                r"complete\s+agreement",
                r"integration",
                r"merger",
            ],
        ),
        (
            ClauseType::Amendment,
            &[r"amendment", r"modification", r"variation", r"change"],
        ),
        (
            ClauseType::Severability,
            &[r"severab", r"invalid", r"unenforceable"],
        ),
        (ClauseType::Waiver, &[r"waiver", r"forbearance", r"no\s+waiver"]),
        (
            ClauseType::NonCompete,
            &[
                r"non-compete",
                r"non\s+compete",
                r"competition",
                r"restrictive\s+covenant",
            ],
        ),
        (
            ClauseType::NonSolicitation,
            &[r"non-solicitation", r"non\s+solicitation", r"no\s+poaching"],
        ),
        (
            ClauseType::Penalty,
            &[r"penalty", r"liquidated\s+damages", r"fine", r"forfeit"],
        ),
        (ClauseType::Insurance, &[r"insurance", r"coverage", r"policy"]),
        (
            ClauseType::Compliance,
            &[r"compliance", r"regulatory", r"legal\s+requirement"],
        ),
        (
            ClauseType::Audit,
            &[r"audit", r"inspection", r"review\s+rights", r"access\s+to\s+records"],
        ),
        (
            ClauseType::DataProtection,
            &[r"data\s+protection", r"privacy", r"personal\s+data", r"gdpr", r"dpdp"],
        ),
    ];

    table
        .iter()
        .map(|(clause_type, patterns)| {
            (
                *clause_type,
                patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("valid clause type pattern"))
                    .collect(),
            )
        })
        .collect()
});

/// Section header patterns with hierarchy levels, checked in order; the first
/// match wins. The bare ALL CAPS pattern is case sensitive so body prose never
/// masquerades as a header.
static HEADER_PATTERNS: Lazy<Vec<(Regex, usize)>> = Lazy::new(|| {
    [
        (r"(?i)^(\d+)\.\s+([A-Z][A-Z\s]+)$", 1),
        (r"(?i)^(\d+)\.\s+([A-Z][a-zA-Z\s]+)$", 1),
        (r"(?i)^(\d+\.\d+)\s+(.+)$", 2),
        (r"(?i)^(\d+\.\d+\.\d+)\s+(.+)$", 3),
        (r"(?i)^ARTICLE\s+(\d+)[:\s]+(.+)$", 1),
        (r"(?i)^SECTION\s+(\d+)[:\s]+(.+)$", 1),
        (r"(?i)^CLAUSE\s+(\d+)[:\s]+(.+)$", 1),
        (r"(?i)^\(([a-z])\)\s+(.+)$", 2),
        (r"(?i)^([a-z])\)\s+(.+)$", 2),
        (r"(?i)^\(([ivxlcdm]+)\)\s+(.+)$", 3),
        (r"^([A-Z][A-Z\s]{3,})$", 1),
        (r"(?i)^SCHEDULE\s+([A-Z\d]+)[:\s]*(.*)$", 1),
        (r"(?i)^ANNEXURE\s+([A-Z\d]+)[:\s]*(.*)$", 1),
        (r"(?i)^EXHIBIT\s+([A-Z\d]+)[:\s]*(.*)$", 1),
    ]
    .iter()
    .map(|(p, level)| (Regex::new(p).expect("valid header pattern"), *level))
    .collect()
});

/// Ambiguity indicators paired with a human-readable description
static AMBIGUITY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b(reasonable|reasonably)\b", "Subjective standard: \"reasonable\""),
        (r"\b(material|materially)\b", "Undefined materiality threshold"),
        (r"\b(substantial|substantially)\b", "Vague quantifier"),
        (r"\b(promptly|timely)\b", "Undefined time frame"),
        (r"\b(best\s+efforts?|reasonable\s+efforts?)\b", "Effort standard unclear"),
        (
            r"\b(as\s+needed|as\s+required|as\s+appropriate)\b",
            "Discretionary language",
        ),
        (r"\b(including\s+but\s+not\s+limited\s+to)\b", "Open-ended list"),
        (
            r"\b(may\s+be\s+amended|subject\s+to\s+change)\b",
            "Unilateral modification",
        ),
        (r"\b(sole\s+discretion|absolute\s+discretion)\b", "Discretionary power"),
        (r"\b(and/or)\b", "Ambiguous conjunction"),
    ]
    .iter()
    .map(|(p, desc)| (Regex::new(p).expect("valid ambiguity pattern"), *desc))
    .collect()
});

static DEFINITION_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"([^"]+)"\s+(?:means|shall\s+mean|refers\s+to)\s+([^.]+\.)"#)
        .expect("valid regex")
});
static DEFINITION_LETTERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\([a-z]\)\s+"([^"]+)"\s+(?:means|shall\s+mean)\s+([^.]+\.)"#)
        .expect("valid regex")
});
static DEFINITION_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-zA-Z\s]+):\s+(?:means\s+)?([^.;]+[.;])").expect("valid regex"));

/// Standard clause types every well-formed contract is expected to carry
const STANDARD_CLAUSE_TYPES: &[ClauseType] = &[
    ClauseType::Definitions,
    ClauseType::Scope,
    ClauseType::Payment,
    ClauseType::Term,
    ClauseType::Termination,
    ClauseType::Confidentiality,
    ClauseType::Liability,
    ClauseType::Dispute,
    ClauseType::GoverningLaw,
];

/// Structural census of a clause tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub total: usize,
    pub top_level_clauses: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_level: BTreeMap<usize, usize>,
    pub max_depth: usize,
    pub missing_standard_clauses: Vec<String>,
}

/// One ambiguity indicator hit inside a clause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbiguityIssue {
    pub pattern: String,
    pub description: String,
    pub occurrences: usize,
}

/// A clause flagged by the ambiguity scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbiguousClause {
    pub clause_id: String,
    pub title: String,
    pub clause_type: ClauseType,
    pub issues: Vec<AmbiguityIssue>,
    pub total_issues: usize,
}

/// Flat summary row for one clause in the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseSummary {
    pub id: String,
    pub title: String,
    pub clause_type: ClauseType,
    pub level: usize,
    pub indent: usize,
    pub content_preview: String,
    pub has_subclauses: bool,
    pub subclause_count: usize,
}

/// Clause extraction and structural analysis. Stateless; all rule tables are
/// static and loaded once.
#[derive(Debug, Default)]
pub struct ClauseParser;

impl ClauseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse contract text into top-level clause trees
    pub fn parse_clauses(&self, text: &str) -> Vec<Clause> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut flat: Vec<Clause> = Vec::new();
        let mut current: Option<Clause> = None;
        let mut content: Vec<&str> = Vec::new();
        let mut counter = 0usize;

        for (line_num, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((_, title, level)) = self.match_header(line) {
                if let Some(mut clause) = current.take() {
                    clause.content = content.join(" ").trim().to_string();
                    clause.end_position = line_num.saturating_sub(1);
                    flat.push(clause);
                }

                counter += 1;
                let clause_type = self.detect_clause_type(&format!("{} {}", title, line));
                current = Some(Clause {
                    clause_id: format!("clause_{}", counter),
                    clause_type,
                    title,
                    content: String::new(),
                    level,
                    parent_id: None,
                    start_position: line_num,
                    end_position: 0,
                    sub_clauses: Vec::new(),
                });
                content.clear();
            } else {
                content.push(line);
            }
        }

        if let Some(mut clause) = current.take() {
            clause.content = content.join(" ").trim().to_string();
            clause.end_position = lines.len().saturating_sub(1);
            flat.push(clause);
        }

        tracing::debug!("Parsed {} clauses", flat.len());
        self.build_hierarchy(flat)
    }

    /// Match a line against the header table; first match wins
    fn match_header(&self, line: &str) -> Option<(String, String, usize)> {
        for (pattern, level) in HEADER_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(line) {
                let first = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                // A title group that matched empty stays empty; only patterns
                // without a title group fall back to the first capture
                let title = match captures.get(2) {
                    Some(m) => m.as_str().trim(),
                    None => first,
                };
                return Some((first.to_string(), title.to_string(), *level));
            }
        }
        None
    }

    /// Detect the clause type from header text; table order decides ties
    fn detect_clause_type(&self, text: &str) -> ClauseType {
        let text_lower = text.to_lowercase();
        for (clause_type, patterns) in CLAUSE_TYPE_PATTERNS.iter() {
            if patterns.iter().any(|p| p.is_match(&text_lower)) {
                return *clause_type;
            }
        }
        ClauseType::Unknown
    }

    /// Attach each clause to the deepest preceding clause with a smaller
    /// level. Levels at or below the new clause are cleared from the pointer
    /// stack, mirroring document reading order.
    fn build_hierarchy(&self, flat: Vec<Clause>) -> Vec<Clause> {
        let mut roots: Vec<Clause> = Vec::new();
        // (level, index path into the roots tree)
        let mut stack: Vec<(usize, Vec<usize>)> = Vec::new();

        for mut clause in flat {
            let level = clause.level;
            while matches!(stack.last(), Some((l, _)) if *l >= level) {
                stack.pop();
            }

            match stack.last().cloned() {
                Some((_, parent_path)) => {
                    let parent = Self::clause_at_path(&mut roots, &parent_path);
                    clause.parent_id = Some(parent.clause_id.clone());
                    parent.sub_clauses.push(clause);
                    let child_index = parent.sub_clauses.len() - 1;
                    let mut path = parent_path;
                    path.push(child_index);
                    stack.push((level, path));
                }
                None => {
                    roots.push(clause);
                    stack.push((level, vec![roots.len() - 1]));
                }
            }
        }

        roots
    }

    fn clause_at_path<'a>(roots: &'a mut [Clause], path: &[usize]) -> &'a mut Clause {
        let mut node = &mut roots[path[0]];
        for &index in &path[1..] {
            node = &mut node.sub_clauses[index];
        }
        node
    }

    /// Collect all clauses of one type, depth first
    pub fn clauses_of_type<'a>(
        &self,
        clauses: &'a [Clause],
        clause_type: ClauseType,
    ) -> Vec<&'a Clause> {
        let mut found = Vec::new();
        fn walk<'a>(clauses: &'a [Clause], clause_type: ClauseType, out: &mut Vec<&'a Clause>) {
            for clause in clauses {
                if clause.clause_type == clause_type {
                    out.push(clause);
                }
                walk(&clause.sub_clauses, clause_type, out);
            }
        }
        walk(clauses, clause_type, &mut found);
        found
    }

    /// Full text of a clause, optionally including its sub-clauses
    pub fn clause_text(&self, clause: &Clause, include_subclauses: bool) -> String {
        let mut text = format!("{}\n{}", clause.title, clause.content);
        if include_subclauses {
            for sub in &clause.sub_clauses {
                text.push('\n');
                text.push_str(&self.clause_text(sub, true));
            }
        }
        text
    }

    /// Census of the clause tree plus missing standard clause types
    pub fn analyze_structure(&self, clauses: &[Clause]) -> StructureAnalysis {
        let mut analysis = StructureAnalysis {
            total: 0,
            top_level_clauses: clauses.len(),
            by_type: BTreeMap::new(),
            by_level: BTreeMap::new(),
            max_depth: 1,
            missing_standard_clauses: Vec::new(),
        };

        fn walk(clauses: &[Clause], depth: usize, analysis: &mut StructureAnalysis) {
            for clause in clauses {
                analysis.total += 1;
                *analysis
                    .by_type
                    .entry(clause.clause_type.as_str().to_string())
                    .or_insert(0) += 1;
                *analysis.by_level.entry(clause.level).or_insert(0) += 1;
                if !clause.sub_clauses.is_empty() {
                    analysis.max_depth = analysis.max_depth.max(depth + 1);
                    walk(&clause.sub_clauses, depth + 1, analysis);
                }
            }
        }
        walk(clauses, 1, &mut analysis);

        analysis.missing_standard_clauses = STANDARD_CLAUSE_TYPES
            .iter()
            .filter(|ct| !analysis.by_type.contains_key(ct.as_str()))
            .map(|ct| ct.as_str().to_string())
            .collect();

        analysis
    }

    /// Find clauses whose title or content mentions any of the keywords
    pub fn find_related_clauses<'a>(
        &self,
        clauses: &'a [Clause],
        keywords: &[&str],
    ) -> Vec<&'a Clause> {
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut related = Vec::new();
        fn walk<'a>(clauses: &'a [Clause], keywords: &[String], out: &mut Vec<&'a Clause>) {
            for clause in clauses {
                let text = format!("{} {}", clause.title, clause.content).to_lowercase();
                if keywords.iter().any(|k| text.contains(k.as_str())) {
                    out.push(clause);
                }
                walk(&clause.sub_clauses, keywords, out);
            }
        }
        walk(clauses, &lowered, &mut related);
        related
    }

    /// Extract defined terms. Three pattern families are applied in order and
    /// a later family overwrites an earlier hit for the same term.
    pub fn extract_definitions(&self, text: &str) -> BTreeMap<String, String> {
        let mut definitions = BTreeMap::new();

        for captures in DEFINITION_QUOTED.captures_iter(text) {
            definitions.insert(
                captures[1].trim().to_string(),
                captures[2].trim().to_string(),
            );
        }
        for captures in DEFINITION_LETTERED.captures_iter(text) {
            definitions.insert(
                captures[1].trim().to_string(),
                captures[2].trim().to_string(),
            );
        }
        for captures in DEFINITION_COLON.captures_iter(text) {
            let term = captures[1].trim().to_string();
            if term.len() < 50 {
                definitions.insert(term, captures[2].trim().to_string());
            }
        }

        definitions
    }

    /// Flatten the tree into summary rows, depth first
    pub fn clause_summary(&self, clauses: &[Clause]) -> Vec<ClauseSummary> {
        let mut summary = Vec::new();
        fn walk(clauses: &[Clause], indent: usize, out: &mut Vec<ClauseSummary>) {
            for clause in clauses {
                let preview: String = if clause.content.chars().count() > 200 {
                    let truncated: String = clause.content.chars().take(200).collect();
                    format!("{}...", truncated)
                } else {
                    clause.content.clone()
                };
                out.push(ClauseSummary {
                    id: clause.clause_id.clone(),
                    title: clause.title.clone(),
                    clause_type: clause.clause_type,
                    level: clause.level,
                    indent,
                    content_preview: preview,
                    has_subclauses: !clause.sub_clauses.is_empty(),
                    subclause_count: clause.sub_clauses.len(),
                });
                walk(&clause.sub_clauses, indent + 1, out);
            }
        }
        walk(clauses, 0, &mut summary);
        summary
    }

    /// Scan clause contents for ambiguity indicators, sorted by total
    /// occurrences descending
    pub fn detect_ambiguous_clauses(&self, clauses: &[Clause]) -> Vec<AmbiguousClause> {
        let mut ambiguous = Vec::new();

        fn walk(clauses: &[Clause], out: &mut Vec<AmbiguousClause>) {
            for clause in clauses {
                let text = clause.content.to_lowercase();
                let issues: Vec<AmbiguityIssue> = AMBIGUITY_PATTERNS
                    .iter()
                    .filter_map(|(pattern, description)| {
                        let occurrences = pattern.find_iter(&text).count();
                        (occurrences > 0).then(|| AmbiguityIssue {
                            pattern: pattern.as_str().to_string(),
                            description: description.to_string(),
                            occurrences,
                        })
                    })
                    .collect();

                if !issues.is_empty() {
                    let total_issues = issues.iter().map(|i| i.occurrences).sum();
                    out.push(AmbiguousClause {
                        clause_id: clause.clause_id.clone(),
                        title: clause.title.clone(),
                        clause_type: clause.clause_type,
                        issues,
                        total_issues,
                    });
                }
                walk(&clause.sub_clauses, out);
            }
        }
        walk(clauses, &mut ambiguous);

        ambiguous.sort_by(|a, b| b.total_issues.cmp(&a.total_issues));
        ambiguous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbered_headers() {
        let parser = ClauseParser::new();
        let clauses = parser.parse_clauses(
            "1. DEFINITIONS\nTerms are defined below.\n2. PAYMENT TERMS\nPayment within 30 days.",
        );
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].clause_type, ClauseType::Definitions);
        assert_eq!(clauses[1].clause_type, ClauseType::Payment);
        assert_eq!(clauses[1].content, "Payment within 30 days.");
    }

    #[test]
    fn builds_parent_child_links() {
        let parser = ClauseParser::new();
        let clauses = parser.parse_clauses(
            "1. PAYMENT TERMS\nMain body.\n1.1 Invoicing\nMonthly invoices.\n1.1.1 Late fees\nTwo percent.\n2. TERMINATION\nEither party.",
        );
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].sub_clauses.len(), 1);
        assert_eq!(clauses[0].sub_clauses[0].sub_clauses.len(), 1);
        assert_eq!(
            clauses[0].sub_clauses[0].parent_id.as_deref(),
            Some("clause_1")
        );
        assert!(clauses[1].sub_clauses.is_empty());
    }

    #[test]
    fn type_detection_respects_table_order() {
        let parser = ClauseParser::new();
        // "services" (Scope) appears before Notices in the table
        assert_eq!(
            parser.detect_clause_type("NOTICE OF SERVICES"),
            ClauseType::Scope
        );
        assert_eq!(parser.detect_clause_type("XYZZY HEADER"), ClauseType::Unknown);
    }

    #[test]
    fn bare_schedule_header_keeps_empty_title() {
        let parser = ClauseParser::new();
        let (_, title, level) = parser.match_header("SCHEDULE 1").unwrap();
        assert_eq!(title, "");
        assert_eq!(level, 1);

        let (_, titled, _) = parser.match_header("SCHEDULE 2: Payment Milestones").unwrap();
        assert_eq!(titled, "Payment Milestones");
    }

    #[test]
    fn all_caps_header_is_case_sensitive() {
        let parser = ClauseParser::new();
        assert!(parser.match_header("CONFIDENTIALITY").is_some());
        assert!(parser.match_header("some body prose here").is_none());
    }

    #[test]
    fn structure_analysis_reports_missing_standard_clauses() {
        let parser = ClauseParser::new();
        let clauses = parser.parse_clauses("1. PAYMENT TERMS\nPay within 30 days.");
        let analysis = parser.analyze_structure(&clauses);
        assert_eq!(analysis.total, 1);
        assert!(analysis
            .missing_standard_clauses
            .contains(&"termination".to_string()));
        assert!(!analysis
            .missing_standard_clauses
            .contains(&"payment_terms".to_string()));
    }

    #[test]
    fn extracts_quoted_definitions() {
        let parser = ClauseParser::new();
        let definitions = parser.extract_definitions(
            "\"Confidential Information\" means any non-public information disclosed by a party.",
        );
        assert_eq!(
            definitions.get("Confidential Information").map(String::as_str),
            Some("any non-public information disclosed by a party.")
        );
    }

    #[test]
    fn ambiguity_scan_sorts_by_occurrences() {
        let parser = ClauseParser::new();
        let clauses = parser.parse_clauses(
            "1. DELIVERY\nDeliver promptly as needed with reasonable efforts and reasonable care.\n2. NOTICES\nNotices must be reasonable.",
        );
        let ambiguous = parser.detect_ambiguous_clauses(&clauses);
        assert_eq!(ambiguous.len(), 2);
        assert!(ambiguous[0].total_issues >= ambiguous[1].total_issues);
        assert_eq!(ambiguous[0].clause_id, "clause_1");
    }

    #[test]
    fn empty_text_yields_no_clauses() {
        let parser = ClauseParser::new();
        assert!(parser.parse_clauses("").is_empty());
        assert!(parser.parse_clauses("   \n  \n").is_empty());
    }
}
