use inspector_ai::workflows::analysis::{
    AnalysisRepository, HomeHealthScore, InspectionId, PropertyId, RepositoryError, ScoringRubric,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredAnalysis {
    pub(crate) property_id: PropertyId,
    pub(crate) analysis_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredScore {
    pub(crate) property_id: PropertyId,
    pub(crate) score: HomeHealthScore,
    pub(crate) source: String,
}

/// Stand-in for the external analysis store. Upserts are keyed by
/// inspection and carry last-write-wins semantics, matching the store's
/// contract for concurrent analyses of the same inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    texts: Arc<Mutex<HashMap<InspectionId, StoredAnalysis>>>,
    scores: Arc<Mutex<HashMap<InspectionId, StoredScore>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn upsert_analysis_text(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        analysis_text: &str,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.texts.lock().expect("analysis mutex poisoned");
        guard.insert(
            inspection_id,
            StoredAnalysis {
                property_id,
                analysis_text: analysis_text.to_string(),
            },
        );
        Ok(())
    }

    fn upsert_home_health_score(
        &self,
        property_id: PropertyId,
        inspection_id: InspectionId,
        score: &HomeHealthScore,
        source: &str,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.scores.lock().expect("score mutex poisoned");
        guard.insert(
            inspection_id,
            StoredScore {
                property_id,
                score: score.clone(),
                source: source.to_string(),
            },
        );
        Ok(())
    }

    fn fetch_analysis_text(
        &self,
        inspection_id: InspectionId,
    ) -> Result<Option<String>, RepositoryError> {
        let guard = self.texts.lock().expect("analysis mutex poisoned");
        Ok(guard
            .get(&inspection_id)
            .map(|stored| stored.analysis_text.clone()))
    }
}

impl InMemoryAnalysisRepository {
    #[cfg(test)]
    pub(crate) fn stored_score(&self, inspection_id: InspectionId) -> Option<StoredScore> {
        self.scores
            .lock()
            .expect("score mutex poisoned")
            .get(&inspection_id)
            .cloned()
    }
}

pub(crate) fn standard_rubric() -> ScoringRubric {
    ScoringRubric::standard()
}
