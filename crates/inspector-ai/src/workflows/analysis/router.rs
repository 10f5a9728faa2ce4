use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{AnalysisSubmission, ClassifiedIssue, InspectionId};
use super::generator::TextGenerator;
use super::repository::{AnalysisRepository, RepositoryError};
use super::scoring::HomeHealthScore;
use super::service::{AnalysisServiceError, InspectionAnalysisService};

/// Router builder exposing the analysis endpoints.
pub fn analysis_router<G, R>(service: Arc<InspectionAnalysisService<G, R>>) -> Router
where
    G: TextGenerator + 'static,
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route("/api/v1/inspections/analysis", post(analyze_handler::<G, R>))
        .route(
            "/api/v1/inspections/analysis/score",
            post(rescore_handler::<G, R>),
        )
        .route(
            "/api/v1/inspections/:inspection_id/analysis",
            get(stored_analysis_handler::<G, R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RescoreRequest {
    pub(crate) analysis_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RescoreResponse {
    pub(crate) issues: Vec<ClassifiedIssue>,
    pub(crate) home_health_score: HomeHealthScore,
}

pub(crate) async fn analyze_handler<G, R>(
    State(service): State<Arc<InspectionAnalysisService<G, R>>>,
    axum::Json(submission): axum::Json<AnalysisSubmission>,
) -> Response
where
    G: TextGenerator + 'static,
    R: AnalysisRepository + 'static,
{
    match service.analyze(submission).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(AnalysisServiceError::Generation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rescore_handler<G, R>(
    State(service): State<Arc<InspectionAnalysisService<G, R>>>,
    axum::Json(request): axum::Json<RescoreRequest>,
) -> Response
where
    G: TextGenerator + 'static,
    R: AnalysisRepository + 'static,
{
    let (issues, home_health_score) = service.score_text(&request.analysis_text);
    (
        StatusCode::OK,
        axum::Json(RescoreResponse {
            issues,
            home_health_score,
        }),
    )
        .into_response()
}

pub(crate) async fn stored_analysis_handler<G, R>(
    State(service): State<Arc<InspectionAnalysisService<G, R>>>,
    Path(inspection_id): Path<i64>,
) -> Response
where
    G: TextGenerator + 'static,
    R: AnalysisRepository + 'static,
{
    match service.stored_analysis(InspectionId(inspection_id)) {
        Ok(analysis_text) => {
            let payload = json!({ "analysisText": analysis_text });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(AnalysisServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": "analysis not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
