mod config;

pub use config::ScoringRubric;

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Category, ClassifiedIssue};

/// Whether the overall number reflects weighted findings or the explicit
/// no-findings convention (no classifiable issue carried a weight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    Findings,
    NoFindings,
}

/// Overall home health score with the per-category averages that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeHealthScore {
    pub overall: f64,
    pub breakdown: BTreeMap<Category, f64>,
    pub basis: ScoreBasis,
}

/// Stateless aggregator applying a rubric to classified issues.
pub struct ScoreEngine {
    rubric: ScoringRubric,
}

impl ScoreEngine {
    pub fn new(rubric: ScoringRubric) -> Self {
        Self { rubric }
    }

    pub fn rubric(&self) -> &ScoringRubric {
        &self.rubric
    }

    /// Aggregate classified issues into a 0-100 score.
    ///
    /// Each severity maps through the rubric table, per-category arithmetic
    /// means form the breakdown, and the overall score renormalizes over the
    /// weights of the categories actually present. Because of that
    /// renormalization, two inspections covering different categories are
    /// not directly comparable on the overall number. When no present
    /// category carries a weight the score is 100 with `NoFindings`.
    pub fn score(&self, issues: &[ClassifiedIssue]) -> HomeHealthScore {
        let mut totals: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
        for issue in issues {
            let score = self.rubric.severity_score(&issue.record.severity);
            let entry = totals.entry(issue.category).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }

        let breakdown: BTreeMap<Category, f64> = totals
            .into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect();

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (category, average) in &breakdown {
            if let Some(weight) = self.rubric.weight(*category) {
                weighted_sum += average * weight;
                weight_sum += weight;
            }
        }

        if weight_sum == 0.0 {
            return HomeHealthScore {
                overall: 100.0,
                breakdown,
                basis: ScoreBasis::NoFindings,
            };
        }

        HomeHealthScore {
            overall: 100.0 * weighted_sum / weight_sum,
            breakdown,
            basis: ScoreBasis::Findings,
        }
    }
}
