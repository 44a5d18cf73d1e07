use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

pub const MAX_MATCH_SCORE: f64 = 100.0;

/// One career recommended by the path suggester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestion {
    pub career: String,
    pub description: String,
    /// Kept as the generator's JSON number; integer and fractional scores both pass.
    pub match_score: Number,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl CareerSuggestion {
    pub fn validate(&self) -> Result<(), String> {
        if self.career.trim().is_empty() {
            return Err("suggestion has an empty career".to_string());
        }
        let in_range = self
            .match_score
            .as_f64()
            .is_some_and(|score| score.is_finite() && (0.0..=MAX_MATCH_SCORE).contains(&score));
        if !in_range {
            return Err(format!(
                "matchScore {} for '{}' is outside 0-{MAX_MATCH_SCORE}",
                self.match_score, self.career
            ));
        }
        Ok(())
    }
}

/// Payload handed to the path suggester as its single argument.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionInput<'a> {
    pub skills: &'a [String],
    pub interests: &'a [String],
}

/// A past suggestion request attached to a user. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub suggestions: Vec<CareerSuggestion>,
    pub timestamp: DateTime<Utc>,
}

/// Input to `ContentRepository::append_history`.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub suggestions: Vec<CareerSuggestion>,
    pub timestamp: DateTime<Utc>,
}
