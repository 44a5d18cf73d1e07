pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::careers::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let ai = Router::new()
        .route(
            "/generate-career-content",
            post(handlers::handle_generate_career_content),
        )
        .route(
            "/suggest-career-path",
            post(handlers::handle_suggest_career_path),
        )
        .route(
            "/generate-growth-chart",
            post(handlers::handle_generate_growth_chart),
        );

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1/ai", ai)
        .route("/api/v1/careers", get(handlers::handle_list_careers))
        .route("/api/v1/careers/:sector", get(handlers::handle_get_career))
        .route(
            "/api/v1/users/:id/suggestions",
            get(handlers::handle_suggestion_history),
        )
        .with_state(state)
}
