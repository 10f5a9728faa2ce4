//! Inspection analysis pipeline: prompt the external text-generation service
//! with an inspection narrative, then parse the returned write-up into issue
//! records, classify each record into a home-system category, and aggregate a
//! weight-normalized home health score.
//!
//! The parse/classify/score stages are pure, synchronous functions over
//! request-scoped data; the only blocking step is the generation call, which
//! carries its own deadline and bounded retry.

pub(crate) mod classifier;
pub mod domain;
pub mod generator;
pub(crate) mod parser;
pub mod prompt;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

pub use classifier::classify_title;
pub use domain::{
    AnalysisOutcome, AnalysisSubmission, Category, ClassifiedIssue, InspectionId, IssueRecord,
    PropertyId,
};
pub use generator::{GeneratorError, OpenAiGenerator, TextGenerator};
pub use parser::parse_issue_records;
pub use prompt::AnalysisPrompt;
pub use repository::{AnalysisRepository, RepositoryError};
pub use router::analysis_router;
pub use scoring::{HomeHealthScore, ScoreBasis, ScoreEngine, ScoringRubric};
pub use service::{
    score_analysis_text, AnalysisServiceError, InspectionAnalysisService, SCORE_SOURCE,
};
