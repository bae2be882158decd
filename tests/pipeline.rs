//! End-to-end pipeline tests over a realistic employment contract, plus
//! defined-behavior checks for each analyzer on minimal and empty input.

use contract_analyzer::classifier::ContractClassifier;
use contract_analyzer::clause_parser::ClauseParser;
use contract_analyzer::compliance::{ComplianceChecker, ComplianceStatus, Severity};
use contract_analyzer::entities::LegalEntityExtractor;
use contract_analyzer::risk::{RiskAnalyzer, RiskLevel};
use contract_analyzer::similarity::SimilarityMatcher;
use contract_analyzer::{Config, ContractAnalyzer, ContractType};

const SAMPLE_CONTRACT: &str = r#"
EMPLOYMENT AGREEMENT

This Employment Agreement ("Agreement") is made on January 15, 2026

BETWEEN:

TechVision Solutions Private Limited, a company incorporated under the Companies Act,
having its registered office at Bangalore, Karnataka (hereinafter referred to as the "Company")

AND

Rahul Sharma, residing at Koramangala, Bangalore (hereinafter referred to as the "Employee")

WHEREAS the Company desires to employ the Employee as a Senior Software Engineer.

1. POSITION AND DUTIES

1.1 The Company hereby employs the Employee in the position of Senior Software Engineer.
1.2 The Employee shall report to the Engineering Manager.

2. COMPENSATION

2.1 The Company shall pay the Employee a gross annual salary of INR 18,00,000 (Rupees Eighteen Lakhs only).
2.2 The Employee shall be entitled to Provident Fund and medical insurance of Rs. 5,00,000.

3. CONFIDENTIALITY

3.1 The Employee shall maintain strict confidentiality of all proprietary information and trade secrets.
3.2 This obligation shall survive termination for 3 years.

4. NON-COMPETE

4.1 During employment and for 24 months thereafter, the Employee shall not engage in any
business that competes with the Company anywhere in India.

5. TERMINATION

5.1 Either Party may terminate with 90 days' written notice.
5.2 The Company may terminate immediately at its sole discretion without cause.

6. INTELLECTUAL PROPERTY

6.1 All intellectual property created by the Employee shall irrevocably belong to the Company.

7. DISPUTE RESOLUTION

7.1 Any dispute shall be referred to arbitration in Bangalore under the Arbitration Act, 1996.

8. GOVERNING LAW

8.1 This Agreement shall be governed by the laws of India.
8.2 The courts of Bangalore shall have exclusive jurisdiction.

IN WITNESS WHEREOF, the Parties have executed this Agreement.
"#;

#[test]
fn full_pipeline_on_employment_contract() {
    let analyzer = ContractAnalyzer::new(Config::default());
    let analysis = analyzer.analyze(SAMPLE_CONTRACT).unwrap();

    assert_eq!(analysis.classification.contract_type, ContractType::Employment);
    assert!(analysis.classification.confidence > 0.0);

    assert!(!analysis.clauses.is_empty());
    assert!(analysis.structure.total >= 8);

    assert!(!analysis.entities.dates.is_empty());
    assert!(!analysis.entities.amounts.is_empty());
    assert!(!analysis.entities.jurisdictions.is_empty());

    // termination "without cause" is a fixed red flag
    assert!(!analysis.risk.priority_issues.is_empty());
    assert!(analysis.risk.overall_level >= RiskLevel::Medium);

    assert!(analysis
        .compliance
        .laws_checked
        .contains(&"Labour Laws (Employment Contracts)".to_string()));

    assert!(!analysis.template_comparison.matched_clauses.is_empty());
}

#[test]
fn penalty_and_indemnity_categories_both_score() {
    let analyzer = RiskAnalyzer::new();
    let risk = analyzer.analyze_contract(
        "Penalty of Rs. 50,000 shall apply. Employee shall indemnify the Company.",
        None,
    );

    let penalty = risk.category_scores.get("penalty_clause").copied().unwrap_or(0.0);
    let indemnity = risk
        .category_scores
        .get("indemnity_clause")
        .copied()
        .unwrap_or(0.0);
    assert!(penalty > 0.0);
    assert!(indemnity > 0.0);
    assert!(risk.overall_level >= RiskLevel::Medium);
}

#[test]
fn numbered_headers_become_top_level_clauses() {
    let parser = ClauseParser::new();
    let clauses = parser.parse_clauses(
        "1. DEFINITIONS\nTerms used in this agreement have assigned meanings.\n\
         2. PAYMENT TERMS\nAll invoices are payable within thirty days.",
    );

    assert_eq!(clauses.len(), 2);
    assert!(clauses.iter().all(|c| c.level == 1 && c.parent_id.is_none()));
    assert_eq!(clauses[0].clause_type.as_str(), "definitions");
    assert_eq!(clauses[1].clause_type.as_str(), "payment_terms");
}

#[test]
fn textual_date_normalizes_to_iso() {
    let extractor = LegalEntityExtractor::new();
    let (dates, dropped) = extractor.extract_dates("This Agreement commences on 15 January 2026.");
    assert_eq!(dropped, 0);
    assert_eq!(
        dates[0].normalized_value.as_deref(),
        Some("2026-01-15")
    );
}

#[test]
fn arbitration_without_seat_is_a_medium_issue() {
    let checker = ComplianceChecker::new();
    let report =
        checker.check_compliance("Any dispute shall be settled through arbitration.", None);

    let seat_issue = report
        .issues
        .iter()
        .find(|i| i.issue_id == "arb_002")
        .expect("seat of arbitration issue raised");
    assert_eq!(seat_issue.severity, Severity::Medium);
}

#[test]
fn missing_governing_law_is_reported_for_any_type() {
    let matcher = SimilarityMatcher::new();
    let report = matcher.compare_to_template(
        "The supplier shall deliver the goods and the buyer shall inspect them on arrival.",
        ContractType::Vendor,
    );
    assert!(report
        .missing_clauses
        .contains(&"Governing Law".to_string()));
}

#[test]
fn empty_input_yields_neutral_defaults() {
    let risk = RiskAnalyzer::new().analyze_contract("", None);
    assert_eq!(risk.overall_score, 0.5);
    assert_eq!(risk.overall_level, RiskLevel::Medium);
    assert!(risk.clause_risks.is_empty());

    let compliance = ComplianceChecker::new().check_compliance("", None);
    assert_eq!(compliance.overall_status, ComplianceStatus::Compliant);
    assert!(compliance.issues.is_empty());

    let classification = ContractClassifier::new().classify("");
    assert_eq!(classification.contract_type, ContractType::Unknown);
    assert_eq!(classification.confidence, 0.0);
}

#[test]
fn batch_analysis_matches_single_analysis() {
    let analyzer = ContractAnalyzer::new(Config::default());
    let texts = vec![SAMPLE_CONTRACT.to_string(), SAMPLE_CONTRACT.to_string()];
    let results = analyzer.analyze_batch(&texts);
    assert_eq!(results.len(), 2);

    let single = analyzer.analyze(SAMPLE_CONTRACT).unwrap();
    for result in results {
        let analysis = result.unwrap();
        assert_eq!(
            analysis.classification.contract_type,
            single.classification.contract_type
        );
        assert_eq!(analysis.risk.overall_score, single.risk.overall_score);
        assert_eq!(
            analysis.compliance.overall_status,
            single.compliance.overall_status
        );
    }
}
