use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::HomeHealthScore;

/// Identifier of an inspection row owned by the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(pub i64);

/// Identifier of the property an inspection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub i64);

/// One problem entry extracted from generated analysis text.
///
/// Produced fresh on every parse and never persisted; only the raw analysis
/// text and the derived score reach the store. A record escapes the parser
/// only when a severity value was extracted, so `severity` is always
/// non-empty (and upper-cased) on emitted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub title: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diy_estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_estimate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_life: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diy_tutorial: Option<String>,
}

impl IssueRecord {
    pub(crate) fn with_title(title: String) -> Self {
        Self {
            title,
            severity: String::new(),
            issue: None,
            diy_estimate: None,
            professional_estimate: None,
            remaining_life: None,
            diy_tutorial: None,
        }
    }
}

/// Fixed home-system buckets used for classification and weighting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Roof,
    Foundation,
    #[serde(rename = "HVAC")]
    Hvac,
    Plumbing,
    Electrical,
    Exterior,
    Interior,
    Appliances,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Roof => "Roof",
            Category::Foundation => "Foundation",
            Category::Hvac => "HVAC",
            Category::Plumbing => "Plumbing",
            Category::Electrical => "Electrical",
            Category::Exterior => "Exterior",
            Category::Interior => "Interior",
            Category::Appliances => "Appliances",
        }
    }

    pub fn ordered() -> [Category; 8] {
        [
            Category::Roof,
            Category::Foundation,
            Category::Hvac,
            Category::Plumbing,
            Category::Electrical,
            Category::Exterior,
            Category::Interior,
            Category::Appliances,
        ]
    }
}

/// An issue record annotated with the home-system category it was filed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedIssue {
    pub category: Category,
    #[serde(flatten)]
    pub record: IssueRecord,
}

/// Caller-supplied input for one analysis run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSubmission {
    pub property_id: PropertyId,
    pub inspection_id: InspectionId,
    pub inspection_text: String,
    #[serde(default)]
    pub photo_descriptions: Vec<String>,
}

/// Result of a full analysis run handed back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub analysis_text: String,
    pub issues: Vec<ClassifiedIssue>,
    pub home_health_score: HomeHealthScore,
    pub generated_at: DateTime<Utc>,
}
