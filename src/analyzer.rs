//! # Contract Analyzer Module
//!
//! ## Purpose
//! Composes the full analysis pipeline: text normalization, clause parsing,
//! entity extraction, classification, risk scoring, statute compliance, and
//! template comparison, producing one consolidated report per contract.
//!
//! ## Input/Output Specification
//! - **Input**: Raw contract text (single document or a batch)
//! - **Output**: [`ContractAnalysis`] aggregating every stage's report
//! - **Error Conditions**: Empty input or input over the configured length
//!   limit fails validation before any stage runs
//!
//! ## Key Features
//! - Classification result feeds the compliance and template stages
//! - Parsed clauses feed clause-level risk scoring
//! - Batch analysis fans out across a rayon thread pool

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassificationResult, ContractClassifier};
use crate::clause_parser::{Clause, ClauseParser, StructureAnalysis};
use crate::compliance::{ComplianceChecker, ComplianceReport};
use crate::config::Config;
use crate::entities::{EntitySummary, ExtractedEntities, LegalEntityExtractor};
use crate::errors::{AnalysisError, Result};
use crate::language::{LanguageHandler, LanguageInfo};
use crate::normalizer::{NormalizedText, TextNormalizer};
use crate::risk::{ContractRisk, RiskAnalyzer};
use crate::similarity::{SimilarityMatcher, TemplateComparisonReport};

/// Consolidated output of the full pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub language: Option<LanguageInfo>,
    pub document: NormalizedText,
    pub clauses: Vec<Clause>,
    pub structure: StructureAnalysis,
    pub classification: ClassificationResult,
    pub entities: ExtractedEntities,
    pub entity_summary: EntitySummary,
    pub risk: ContractRisk,
    pub compliance: ComplianceReport,
    pub template_comparison: TemplateComparisonReport,
}

/// End-to-end contract analysis engine
pub struct ContractAnalyzer {
    config: Config,
    normalizer: TextNormalizer,
    parser: ClauseParser,
    extractor: LegalEntityExtractor,
    classifier: ContractClassifier,
    risk_analyzer: RiskAnalyzer,
    compliance_checker: ComplianceChecker,
    similarity_matcher: SimilarityMatcher,
    language_handler: LanguageHandler,
}

impl Default for ContractAnalyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ContractAnalyzer {
    pub fn new(config: Config) -> Self {
        let extractor = LegalEntityExtractor::from_config(&config);
        Self {
            config,
            normalizer: TextNormalizer::new(),
            parser: ClauseParser::new(),
            extractor,
            classifier: ContractClassifier::new(),
            risk_analyzer: RiskAnalyzer::new(),
            compliance_checker: ComplianceChecker::new(),
            similarity_matcher: SimilarityMatcher::new(),
            language_handler: LanguageHandler::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline on one contract
    pub fn analyze(&self, text: &str) -> Result<ContractAnalysis> {
        self.validate_input(text)?;

        let language = if self.config.analysis.enable_language_detection {
            let normalized = self.language_handler.normalize_for_analysis(text);
            Some(normalized.language_info)
        } else {
            None
        };

        let document = self.normalizer.normalize(text);
        tracing::debug!(
            sections = document.sections.len(),
            sentences = document.sentences.len(),
            "Normalized document"
        );

        let clauses = self.parser.parse_clauses(&document.normalized_text);
        let structure = self.parser.analyze_structure(&clauses);
        tracing::debug!(clauses = structure.total, "Parsed clauses");

        let classification = self.classifier.classify(&document.normalized_text);
        tracing::debug!(
            contract_type = classification.contract_type.as_str(),
            confidence = classification.confidence,
            "Classified contract"
        );

        let entities = self.extractor.extract_all_entities(&document.normalized_text);
        let entity_summary = self.extractor.entity_summary(&entities);

        let risk = self
            .risk_analyzer
            .analyze_contract(&document.normalized_text, Some(&clauses));
        tracing::debug!(
            overall = risk.overall_score,
            level = risk.overall_level.as_str(),
            "Scored risk"
        );

        let compliance = self.compliance_checker.check_compliance(
            &document.normalized_text,
            Some(classification.contract_type),
        );

        let template_comparison = self
            .similarity_matcher
            .compare_to_template(&document.normalized_text, classification.contract_type);

        Ok(ContractAnalysis {
            language,
            document,
            clauses,
            structure,
            classification,
            entities,
            entity_summary,
            risk,
            compliance,
            template_comparison,
        })
    }

    /// Analyze a batch of contracts in parallel. Each document gets its own
    /// result; one failing input does not abort the rest.
    pub fn analyze_batch(&self, texts: &[String]) -> Vec<Result<ContractAnalysis>> {
        tracing::info!(count = texts.len(), "Analyzing contract batch");
        texts.par_iter().map(|text| self.analyze(text)).collect()
    }

    fn validate_input(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AnalysisError::ValidationFailed {
                field: "text".to_string(),
                reason: "contract text is empty".to_string(),
            });
        }
        let max = self.config.limits.max_text_length;
        if text.len() > max {
            return Err(AnalysisError::ValidationFailed {
                field: "text".to_string(),
                reason: format!("contract text exceeds {max} bytes"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ContractType;

    const EMPLOYMENT_CONTRACT: &str = "EMPLOYMENT AGREEMENT\n\n\
        1. POSITION AND DUTIES\n\
        The Employee shall be employed as Senior Engineer and shall perform duties assigned \
        by the Company.\n\n\
        2. COMPENSATION\n\
        The Company shall pay the Employee a salary of Rs. 12,00,000 per annum, payable in \
        monthly installments.\n\n\
        3. TERMINATION\n\
        Either party may terminate this Agreement by giving 60 days written notice.\n\n\
        4. GOVERNING LAW\n\
        This Agreement shall be governed by the laws of India and the courts of Mumbai shall \
        have exclusive jurisdiction.";

    #[test]
    fn empty_input_fails_validation() {
        let analyzer = ContractAnalyzer::default();
        let err = analyzer.analyze("   ").unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn oversized_input_fails_validation() {
        let mut config = Config::default();
        config.limits.max_text_length = 10;
        let analyzer = ContractAnalyzer::new(config);
        assert!(analyzer.analyze("this text is longer than ten bytes").is_err());
    }

    #[test]
    fn pipeline_produces_consistent_reports() {
        let analyzer = ContractAnalyzer::default();
        let analysis = analyzer.analyze(EMPLOYMENT_CONTRACT).unwrap();

        assert_eq!(analysis.classification.contract_type, ContractType::Employment);
        assert!(!analysis.clauses.is_empty());
        assert!(analysis.structure.total >= analysis.clauses.len());
        assert!(analysis
            .compliance
            .laws_checked
            .contains(&"Labour Laws (Employment Contracts)".to_string()));
        assert_eq!(
            analysis.template_comparison.contract_type,
            ContractType::Employment
        );
        assert!(analysis.language.is_some());
    }

    #[test]
    fn batch_returns_one_result_per_input() {
        let analyzer = ContractAnalyzer::default();
        let texts = vec![
            EMPLOYMENT_CONTRACT.to_string(),
            String::new(),
            "The lessee shall pay monthly rent for the premises located at the address, with a \
             security deposit refundable on termination of the lease."
                .to_string(),
        ];
        let results = analyzer.analyze_batch(&texts);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
