use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

/// A persisted career page. One per sector; never updated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecord {
    pub id: Uuid,
    pub sector: String,
    #[serde(flatten)]
    pub content: CareerContent,
    pub created_at: DateTime<Utc>,
}

/// The generated body of a career page, exactly as the content generator emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerContent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub job_growth: String,
    #[serde(default)]
    pub study_guidance: Vec<String>,
    pub future_scope: FutureScope,
    #[serde(default)]
    pub expert_experiences: Vec<ExpertExperience>,
    #[serde(default)]
    pub free_courses: Vec<FreeCourse>,
    #[serde(default)]
    pub related_jobs: Vec<RelatedJob>,
    pub growth_chart: GrowthChart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureScope {
    pub description: String,
    #[serde(default)]
    pub trends: Vec<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertExperience {
    pub name: String,
    pub position: String,
    pub journey: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeCourse {
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedJob {
    pub title: String,
    pub company: String,
    pub link: String,
}

/// Chart.js-shaped time series: one label per point, one or more datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthChart {
    pub labels: Vec<ChartLabel>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartLabel {
    Year(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    /// Kept as JSON numbers so integer series round-trip without becoming floats.
    pub data: Vec<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ChartFill>,
}

/// Chart.js `fill`: a flag, a named target such as `"origin"`, or a dataset index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartFill {
    Flag(bool),
    Index(i64),
    Target(String),
}

/// Listing projection used by the careers index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSummary {
    pub sector: String,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub job_growth: String,
    pub created_at: DateTime<Utc>,
}

/// Input to `ContentRepository::create`.
#[derive(Debug, Clone)]
pub struct NewCareer {
    pub sector: String,
    pub content: CareerContent,
}

impl CareerContent {
    /// Rejects generator output that deserialized but is unusable as a page.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("category", &self.category),
            ("difficulty", &self.difficulty),
            ("jobGrowth", &self.job_growth),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} is empty"));
            }
        }
        self.growth_chart.validate()
    }
}

impl GrowthChart {
    pub fn validate(&self) -> Result<(), String> {
        if self.labels.is_empty() {
            return Err("growth chart has no labels".to_string());
        }
        if self.datasets.is_empty() {
            return Err("growth chart has no datasets".to_string());
        }
        for dataset in &self.datasets {
            if dataset.data.len() != self.labels.len() {
                return Err(format!(
                    "dataset '{}' has {} points for {} labels",
                    dataset.label,
                    dataset.data.len(),
                    self.labels.len()
                ));
            }
        }
        Ok(())
    }
}

impl CareerRecord {
    pub fn summary(&self) -> CareerSummary {
        CareerSummary {
            sector: self.sector.clone(),
            title: self.content.title.clone(),
            category: self.content.category.clone(),
            difficulty: self.content.difficulty.clone(),
            job_growth: self.content.job_growth.clone(),
            created_at: self.created_at,
        }
    }
}
