//! Personalized career path suggestions. Always generated fresh; every success is
//! appended to the requesting user's history.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::careers::validation::clean_terms;
use crate::errors::AppError;
use crate::generator::{invoke_typed, Generator, GeneratorError, Script};
use crate::models::suggestion::{CareerSuggestion, NewHistoryEntry, SuggestionInput};
use crate::repository::ContentRepository;

const SUGGESTION_FAILURE: &str = "Failed to generate career suggestions";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub user_id: Option<Uuid>,
}

/// The suggester emits either a bare list or `{"suggestions": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggesterOutput {
    List(Vec<CareerSuggestion>),
    Wrapped { suggestions: Vec<CareerSuggestion> },
}

impl SuggesterOutput {
    fn into_vec(self) -> Vec<CareerSuggestion> {
        match self {
            SuggesterOutput::List(list) | SuggesterOutput::Wrapped { suggestions: list } => list,
        }
    }
}

pub async fn suggest_career_path(
    repository: &dyn ContentRepository,
    generator: &dyn Generator,
    request: SuggestionRequest,
) -> Result<Vec<CareerSuggestion>, AppError> {
    let user_id = request
        .user_id
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;
    let skills = clean_terms(request.skills);
    let interests = clean_terms(request.interests);

    if !repository.user_exists(user_id).await? {
        return Err(AppError::NotFound(format!("User {user_id}")));
    }

    let payload = serde_json::to_string(&SuggestionInput {
        skills: &skills,
        interests: &interests,
    })
    .map_err(|e| AppError::Internal(e.into()))?;

    let suggestions = invoke_typed::<SuggesterOutput>(generator, Script::CareerPath, &[payload])
        .await
        .map_err(|e| AppError::generation(SUGGESTION_FAILURE, e))?
        .into_vec();
    if suggestions.is_empty() {
        return Err(AppError::generation(SUGGESTION_FAILURE, GeneratorError::Empty));
    }
    for suggestion in &suggestions {
        suggestion.validate().map_err(|reason| {
            AppError::generation(SUGGESTION_FAILURE, GeneratorError::Invalid(reason))
        })?;
    }

    let entry = repository
        .append_history(
            user_id,
            NewHistoryEntry {
                skills,
                interests,
                suggestions: suggestions.clone(),
                timestamp: Utc::now(),
            },
        )
        .await?;

    info!(
        "Recorded {} suggestions for user {user_id} (history entry {})",
        suggestions.len(),
        entry.id
    );
    Ok(suggestions)
}
