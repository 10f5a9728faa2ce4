use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::classifier::classify_title;
use super::domain::{AnalysisOutcome, AnalysisSubmission, ClassifiedIssue, InspectionId};
use super::generator::{GeneratorError, TextGenerator};
use super::parser::parse_issue_records;
use super::prompt::AnalysisPrompt;
use super::repository::{AnalysisRepository, RepositoryError};
use super::scoring::{HomeHealthScore, ScoreEngine, ScoringRubric};

/// Provenance label recorded with every score this pipeline persists.
pub const SCORE_SOURCE: &str = "inspection_analysis";

/// Run the offline half of the pipeline over already-generated analysis
/// text: parse into records, classify each title, aggregate the score.
/// Pure and deterministic for a given engine rubric.
pub fn score_analysis_text(
    engine: &ScoreEngine,
    analysis_text: &str,
) -> (Vec<ClassifiedIssue>, HomeHealthScore) {
    let issues: Vec<ClassifiedIssue> = parse_issue_records(analysis_text)
        .into_iter()
        .map(|record| ClassifiedIssue {
            category: classify_title(&record.title),
            record,
        })
        .collect();

    let score = engine.score(&issues);
    (issues, score)
}

/// Service composing the generator, the analysis store, and the score
/// engine into the one-request analysis pipeline.
pub struct InspectionAnalysisService<G, R> {
    generator: Arc<G>,
    repository: Arc<R>,
    engine: ScoreEngine,
}

impl<G, R> InspectionAnalysisService<G, R>
where
    G: TextGenerator + 'static,
    R: AnalysisRepository + 'static,
{
    pub fn new(generator: Arc<G>, repository: Arc<R>, rubric: ScoringRubric) -> Self {
        Self {
            generator,
            repository,
            engine: ScoreEngine::new(rubric),
        }
    }

    /// Full pipeline for one submission: prompt, generate, persist the raw
    /// write-up, then parse/classify/score and persist the score.
    ///
    /// If the score upsert fails after the text upsert succeeded, the store
    /// is left with text but no score; the error is surfaced and no
    /// rollback is attempted.
    pub async fn analyze(
        &self,
        submission: AnalysisSubmission,
    ) -> Result<AnalysisOutcome, AnalysisServiceError> {
        let prompt = AnalysisPrompt::for_inspection(
            &submission.inspection_text,
            &submission.photo_descriptions,
        );

        let analysis_text = self.generator.generate(&prompt.system, &prompt.user).await?;

        self.repository.upsert_analysis_text(
            submission.property_id,
            submission.inspection_id,
            &analysis_text,
        )?;

        let (issues, home_health_score) = self.score_text(&analysis_text);

        self.repository.upsert_home_health_score(
            submission.property_id,
            submission.inspection_id,
            &home_health_score,
            SCORE_SOURCE,
        )?;

        info!(
            inspection_id = submission.inspection_id.0,
            property_id = submission.property_id.0,
            issues = issues.len(),
            overall = home_health_score.overall,
            "inspection analysis stored"
        );

        Ok(AnalysisOutcome {
            analysis_text,
            issues,
            home_health_score,
            generated_at: Utc::now(),
        })
    }

    /// Parse/classify/score without calling the generator. Used by the
    /// rescore endpoint and the CLI against saved analysis text.
    pub fn score_text(&self, analysis_text: &str) -> (Vec<ClassifiedIssue>, HomeHealthScore) {
        score_analysis_text(&self.engine, analysis_text)
    }

    /// Stored raw analysis text for an inspection.
    pub fn stored_analysis(
        &self,
        inspection_id: InspectionId,
    ) -> Result<String, AnalysisServiceError> {
        self.repository
            .fetch_analysis_text(inspection_id)?
            .ok_or(AnalysisServiceError::Repository(RepositoryError::NotFound))
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error(transparent)]
    Generation(#[from] GeneratorError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
