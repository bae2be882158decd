//! # Contract Analysis Engine
//!
//! ## Overview
//! This library implements an analysis engine for Indian commercial contracts
//! that combines rule-based NLP with statute-aware compliance and risk scoring.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `normalizer`: Text cleanup, legal-term normalization, and segmentation
//! - `clause_parser`: Clause detection, typing, and hierarchy construction
//! - `entities`: Extraction of parties, dates, amounts, and other legal entities
//! - `classifier`: Contract type classification with confidence scoring
//! - `risk`: Clause-level and contract-level risk analysis
//! - `compliance`: Checks against Indian statute requirements
//! - `similarity`: Comparison of drafted clauses to standard templates
//! - `language`: English/Hindi detection and glossary translation
//! - `analyzer`: Pipeline orchestration over all stages
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Contract text (plain text, English or mixed English/Hindi)
//! - **Output**: Structured reports per stage plus one consolidated analysis
//! - **Performance**: Deterministic results; batch analysis runs in parallel
//!
//! ## Usage
//! ```rust,no_run
//! use contract_analyzer::{Config, ContractAnalyzer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = ContractAnalyzer::new(Config::default());
//!     let analysis = analyzer.analyze("This Employment Agreement is made between ...")?;
//!     println!(
//!         "{} risk, {} compliance issues",
//!         analysis.risk.overall_level.as_str(),
//!         analysis.compliance.issues.len()
//!     );
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod normalizer;
pub mod clause_parser;
pub mod entities;
pub mod classifier;
pub mod risk;
pub mod compliance;
pub mod similarity;
pub mod language;
pub mod analyzer;

// Re-exports for convenience
pub use analyzer::{ContractAnalysis, ContractAnalyzer};
pub use classifier::{ClassificationResult, ContractType};
pub use clause_parser::{Clause, ClauseParser, ClauseType};
pub use compliance::{ComplianceChecker, ComplianceReport, ComplianceStatus};
pub use config::Config;
pub use entities::{ExtractedEntities, LegalEntityExtractor};
pub use errors::{AnalysisError, Result};
pub use language::{Language, LanguageHandler, LanguageInfo};
pub use normalizer::{NormalizedText, TextNormalizer};
pub use risk::{ContractRisk, RiskAnalyzer, RiskLevel};
pub use similarity::{SimilarityMatcher, TemplateComparisonReport};
