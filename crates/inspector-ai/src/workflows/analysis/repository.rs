use super::domain::{InspectionId, PropertyId};
use super::scoring::HomeHealthScore;

/// Storage abstraction over the external persistence collaborator. Writes
/// are upserts keyed by (property, inspection) with last-write-wins
/// semantics at the store; concurrent analyses of the same inspection race
/// there and need no extra coordination here.
pub trait AnalysisRepository: Send + Sync {
    fn upsert_analysis_text(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        analysis_text: &str,
    ) -> Result<(), RepositoryError>;

    fn upsert_home_health_score(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        score: &HomeHealthScore,
        source: &str,
    ) -> Result<(), RepositoryError>;

    fn fetch_analysis_text(
        &self,
        inspection_id: InspectionId,
    ) -> Result<Option<String>, RepositoryError>;
}

/// Error enumeration for analysis store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("analysis not found")]
    NotFound,
    #[error("analysis store unavailable: {0}")]
    Unavailable(String),
}
