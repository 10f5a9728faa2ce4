use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Category;

/// Immutable scoring tables: severity labels to numeric scores and category
/// weights for the overall roll-up. Injectable so tests and future product
/// decisions can swap rubrics without touching the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRubric {
    pub severity_scores: BTreeMap<String, f64>,
    /// Score applied to severity labels missing from `severity_scores`.
    /// The standard rubric keeps the source behavior of treating an
    /// unrecognized label as a perfect 1.0.
    pub unrecognized_severity_score: f64,
    pub category_weights: BTreeMap<Category, f64>,
}

impl ScoringRubric {
    /// The production rubric. Category weights sum to 1.0.
    pub fn standard() -> Self {
        let severity_scores = BTreeMap::from([
            ("CRITICAL".to_string(), 0.25),
            ("MAJOR".to_string(), 0.5),
            ("MODERATE".to_string(), 0.75),
            ("MINOR".to_string(), 0.9),
        ]);

        let category_weights = BTreeMap::from([
            (Category::Roof, 0.20),
            (Category::Foundation, 0.20),
            (Category::Hvac, 0.15),
            (Category::Plumbing, 0.15),
            (Category::Electrical, 0.10),
            (Category::Exterior, 0.10),
            (Category::Interior, 0.05),
            (Category::Appliances, 0.05),
        ]);

        Self {
            severity_scores,
            unrecognized_severity_score: 1.0,
            category_weights,
        }
    }

    pub fn severity_score(&self, severity: &str) -> f64 {
        self.severity_scores
            .get(severity)
            .copied()
            .unwrap_or(self.unrecognized_severity_score)
    }

    pub fn weight(&self, category: Category) -> Option<f64> {
        self.category_weights.get(&category).copied()
    }
}
