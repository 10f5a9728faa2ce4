use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inspector_ai::workflows::analysis::{
    analysis_router, AnalysisRepository, AnalysisServiceError, AnalysisSubmission, Category,
    GeneratorError, HomeHealthScore, InspectionAnalysisService, InspectionId, PropertyId,
    RepositoryError, ScoreBasis, ScoringRubric, TextGenerator, SCORE_SOURCE,
};

const SAMPLE_ANALYSIS: &str = "Roof – Missing Shingles\n\
Severity: Critical\n\
Issue: Several shingles missing\n\
Professional Estimate: $800\n\
DIY Estimate: $150\n\
\n\
Plumbing – Slow Drain\n\
Severity: Minor\n\
Issue: Bathroom sink drains slowly\n\
DIY Estimate: $20";

struct FixedGenerator {
    response: String,
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GeneratorError> {
        Ok(self.response.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GeneratorError> {
        Err(GeneratorError::EmptyCompletion)
    }
}

#[derive(Default)]
struct RecordingRepository {
    texts: Mutex<HashMap<InspectionId, (PropertyId, String)>>,
    scores: Mutex<Vec<(PropertyId, InspectionId, HomeHealthScore, String)>>,
    fail_score_upsert: bool,
}

impl AnalysisRepository for RecordingRepository {
    fn upsert_analysis_text(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        analysis_text: &str,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.texts.lock().expect("text mutex poisoned");
        guard.insert(inspection_id, (property_id, analysis_text.to_string()));
        Ok(())
    }

    fn upsert_home_health_score(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        score: &HomeHealthScore,
        source: &str,
    ) -> Result<(), RepositoryError> {
        if self.fail_score_upsert {
            return Err(RepositoryError::Unavailable("score table offline".to_string()));
        }
        let mut guard = self.scores.lock().expect("score mutex poisoned");
        guard.push((property_id, inspection_id, score.clone(), source.to_string()));
        Ok(())
    }

    fn fetch_analysis_text(
        &self,
        inspection_id: InspectionId,
    ) -> Result<Option<String>, RepositoryError> {
        let guard = self.texts.lock().expect("text mutex poisoned");
        Ok(guard.get(&inspection_id).map(|(_, text)| text.clone()))
    }
}

fn sample_submission() -> AnalysisSubmission {
    AnalysisSubmission {
        property_id: PropertyId(7),
        inspection_id: InspectionId(42),
        inspection_text: "South roof slope is missing shingles; bathroom sink drains slowly."
            .to_string(),
        photo_descriptions: vec!["Close-up of lifted shingles".to_string()],
    }
}

fn service_with(
    generator: impl TextGenerator + 'static,
    repository: Arc<RecordingRepository>,
) -> InspectionAnalysisService<impl TextGenerator, RecordingRepository> {
    InspectionAnalysisService::new(Arc::new(generator), repository, ScoringRubric::standard())
}

#[tokio::test]
async fn analyze_persists_text_and_score_and_returns_breakdown() {
    let repository = Arc::new(RecordingRepository::default());
    let service = service_with(
        FixedGenerator {
            response: SAMPLE_ANALYSIS.to_string(),
        },
        repository.clone(),
    );

    let outcome = service
        .analyze(sample_submission())
        .await
        .expect("analysis succeeds");

    assert_eq!(outcome.analysis_text, SAMPLE_ANALYSIS);
    assert_eq!(outcome.issues.len(), 2);
    assert_eq!(outcome.issues[0].category, Category::Roof);
    assert_eq!(outcome.issues[0].record.severity, "CRITICAL");
    assert_eq!(outcome.issues[1].category, Category::Plumbing);

    let score = &outcome.home_health_score;
    assert_eq!(score.breakdown[&Category::Roof], 0.25);
    assert_eq!(score.breakdown[&Category::Plumbing], 0.9);
    let expected = 100.0 * (0.25 * 0.20 + 0.9 * 0.15) / (0.20 + 0.15);
    assert!((score.overall - expected).abs() < 1e-9);
    assert!((score.overall - 52.86).abs() < 0.01);
    assert_eq!(score.basis, ScoreBasis::Findings);

    let texts = repository.texts.lock().expect("text mutex poisoned");
    assert_eq!(
        texts[&InspectionId(42)],
        (PropertyId(7), SAMPLE_ANALYSIS.to_string())
    );

    let scores = repository.scores.lock().expect("score mutex poisoned");
    assert_eq!(scores.len(), 1);
    let (property_id, inspection_id, stored, source) = &scores[0];
    assert_eq!(*property_id, PropertyId(7));
    assert_eq!(*inspection_id, InspectionId(42));
    assert_eq!(stored, score);
    assert_eq!(source, SCORE_SOURCE);
}

#[tokio::test]
async fn generation_failure_persists_nothing() {
    let repository = Arc::new(RecordingRepository::default());
    let service = service_with(FailingGenerator, repository.clone());

    let error = service
        .analyze(sample_submission())
        .await
        .expect_err("generation fails");
    assert!(matches!(error, AnalysisServiceError::Generation(_)));

    assert!(repository.texts.lock().expect("mutex").is_empty());
    assert!(repository.scores.lock().expect("mutex").is_empty());
}

#[tokio::test]
async fn score_write_failure_leaves_text_persisted() {
    let repository = Arc::new(RecordingRepository {
        fail_score_upsert: true,
        ..RecordingRepository::default()
    });
    let service = service_with(
        FixedGenerator {
            response: SAMPLE_ANALYSIS.to_string(),
        },
        repository.clone(),
    );

    let error = service
        .analyze(sample_submission())
        .await
        .expect_err("score upsert fails");
    assert!(matches!(
        error,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_))
    ));

    // Partial state by design: the raw write-up survives the failed score write.
    assert!(!repository.texts.lock().expect("mutex").is_empty());
    assert!(repository.scores.lock().expect("mutex").is_empty());
}

#[tokio::test]
async fn repeated_analysis_of_identical_text_is_deterministic() {
    let repository = Arc::new(RecordingRepository::default());
    let service = service_with(
        FixedGenerator {
            response: SAMPLE_ANALYSIS.to_string(),
        },
        repository.clone(),
    );

    let first = service
        .analyze(sample_submission())
        .await
        .expect("first run succeeds");
    let second = service
        .analyze(sample_submission())
        .await
        .expect("second run succeeds");

    assert_eq!(first.issues, second.issues);
    assert_eq!(first.home_health_score, second.home_health_score);

    let (issues, rescored) = service.score_text(SAMPLE_ANALYSIS);
    assert_eq!(issues, first.issues);
    assert_eq!(rescored, first.home_health_score);
}

#[tokio::test]
async fn stored_analysis_round_trips_and_missing_is_not_found() {
    let repository = Arc::new(RecordingRepository::default());
    let service = service_with(
        FixedGenerator {
            response: SAMPLE_ANALYSIS.to_string(),
        },
        repository.clone(),
    );

    service
        .analyze(sample_submission())
        .await
        .expect("analysis succeeds");

    let stored = service
        .stored_analysis(InspectionId(42))
        .expect("text stored");
    assert_eq!(stored, SAMPLE_ANALYSIS);

    let missing = service
        .stored_analysis(InspectionId(999))
        .expect_err("unknown inspection");
    assert!(matches!(
        missing,
        AnalysisServiceError::Repository(RepositoryError::NotFound)
    ));
}

mod router {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn rescore_endpoint_scores_supplied_text() {
        let repository = Arc::new(RecordingRepository::default());
        let service = Arc::new(service_with(
            FixedGenerator {
                response: SAMPLE_ANALYSIS.to_string(),
            },
            repository,
        ));
        let app = analysis_router(service);

        let body = serde_json::json!({ "analysisText": SAMPLE_ANALYSIS }).to_string();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/inspections/analysis/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

        assert_eq!(payload["issues"].as_array().expect("issues array").len(), 2);
        assert_eq!(payload["homeHealthScore"]["breakdown"]["Roof"], 0.25);
        assert_eq!(payload["homeHealthScore"]["breakdown"]["Plumbing"], 0.9);
        assert_eq!(payload["homeHealthScore"]["basis"], "findings");
    }

    #[tokio::test]
    async fn stored_analysis_endpoint_returns_not_found_when_absent() {
        let repository = Arc::new(RecordingRepository::default());
        let service = Arc::new(service_with(
            FixedGenerator {
                response: SAMPLE_ANALYSIS.to_string(),
            },
            repository,
        ));
        let app = analysis_router(service);

        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/inspections/42/analysis")
            .body(Body::empty())
            .expect("request builds");

        let response = app.oneshot(request).await.expect("handler responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
