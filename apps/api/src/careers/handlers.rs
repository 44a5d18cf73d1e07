//! Axum route handlers for the career content API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::careers::content::generate_career_content;
use crate::careers::growth::generate_growth_chart;
use crate::careers::suggestions::{suggest_career_path, SuggestionRequest};
use crate::careers::validation::{page_limit, validate_sector};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::career::{CareerRecord, CareerSummary, GrowthChart};
use crate::models::suggestion::{CareerSuggestion, HistoryEntry};
use crate::response::ApiResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SectorRequest {
    #[serde(default)]
    pub sector: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CareerData {
    pub career: CareerRecord,
}

#[derive(Debug, Serialize)]
pub struct CareerListData {
    pub careers: Vec<CareerSummary>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionData {
    pub suggestions: Vec<CareerSuggestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_data: GrowthChart,
}

#[derive(Debug, Serialize)]
pub struct HistoryData {
    pub history: Vec<HistoryEntry>,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/generate-career-content
///
/// 200 when the sector was already stored, 201 when this request generated it.
pub async fn handle_generate_career_content(
    State(state): State<AppState>,
    AppJson(request): AppJson<SectorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CareerData>>), AppError> {
    let outcome = generate_career_content(
        state.repository.as_ref(),
        state.generator.as_ref(),
        &state.sector_locks,
        &request.sector,
    )
    .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        ApiResponse::success(CareerData {
            career: outcome.into_record(),
        }),
    ))
}

/// POST /api/v1/ai/suggest-career-path
pub async fn handle_suggest_career_path(
    State(state): State<AppState>,
    AppJson(request): AppJson<SuggestionRequest>,
) -> ApiResult<SuggestionData> {
    let suggestions =
        suggest_career_path(state.repository.as_ref(), state.generator.as_ref(), request).await?;
    Ok(ApiResponse::success(SuggestionData { suggestions }))
}

/// POST /api/v1/ai/generate-growth-chart
pub async fn handle_generate_growth_chart(
    State(state): State<AppState>,
    AppJson(request): AppJson<SectorRequest>,
) -> ApiResult<ChartData> {
    let chart_data = generate_growth_chart(state.generator.as_ref(), &request.sector).await?;
    Ok(ApiResponse::success(ChartData { chart_data }))
}

/// GET /api/v1/careers
///
/// Most recently generated careers first.
pub async fn handle_list_careers(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LimitQuery>,
) -> ApiResult<CareerListData> {
    let careers = state
        .repository
        .list_careers(page_limit(query.limit))
        .await?;
    Ok(ApiResponse::success(CareerListData { careers }))
}

/// GET /api/v1/careers/:sector
///
/// Read-only lookup; never triggers generation.
pub async fn handle_get_career(
    State(state): State<AppState>,
    AppPath(sector): AppPath<String>,
) -> ApiResult<CareerData> {
    let sector = validate_sector(&sector)?;
    let career = state
        .repository
        .find_by_sector(&sector)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Career for sector '{sector}' not found")))?;
    Ok(ApiResponse::success(CareerData { career }))
}

/// GET /api/v1/users/:id/suggestions
pub async fn handle_suggestion_history(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<LimitQuery>,
) -> ApiResult<HistoryData> {
    if !state.repository.user_exists(user_id).await? {
        return Err(AppError::NotFound(format!("User {user_id}")));
    }
    let history = state
        .repository
        .history(user_id, page_limit(query.limit))
        .await?;
    Ok(ApiResponse::success(HistoryData { history }))
}
