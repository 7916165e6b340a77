use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MealPlanRequest, PreferenceRequest, RecommendationResult},
    services::assistant::{self, ChatOutcome},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_items: usize,
    pub catalog_loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub catalog_items: usize,
    pub catalog_loaded_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.planner.snapshot();
    Json(HealthResponse {
        status: "healthy",
        catalog_items: snapshot.catalog().row_count(),
        catalog_loaded_at: snapshot.loaded_at(),
    })
}

/// Build a meal plan from structured preferences
pub async fn get_meal_plan(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<MealPlanRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResult>> {
    let Json(request) = payload?;
    let preferences = PreferenceRequest::try_from(request)?;

    tracing::info!(
        request_id = %request_id,
        vegan = preferences.vegan,
        vegetarian = preferences.vegetarian,
        gluten_free = preferences.gluten_free,
        halal = preferences.halal,
        "Processing meal plan request"
    );

    let meal_plan = state.planner.recommend(&preferences)?;
    Ok(Json(meal_plan))
}

/// Parse free text into structured preferences without ranking
pub async fn extract_preferences(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<PreferenceRequest>> {
    let Json(request) = payload?;
    Ok(Json(state.planner.extract_preferences(&request.message)))
}

/// Chat turn: preferences from text, a meal plan, and an assistant reply
pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatOutcome>> {
    let Json(request) = payload?;
    tracing::info!(
        request_id = %request_id,
        message_chars = request.message.len(),
        provider = state.assistant.name(),
        "Processing chat message"
    );

    let outcome = assistant::converse(&state.planner, state.assistant.as_ref(), &request.message).await?;
    Ok(Json(outcome))
}

/// Re-read the catalog file and swap in a fresh snapshot
pub async fn reload_catalog(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    let path = state.catalog_path.clone().ok_or_else(|| {
        AppError::InvalidInput("No catalog file is configured for reloading".to_string())
    })?;

    tracing::info!(request_id = %request_id, path = %path.display(), "Reloading catalog");

    let planner = state.planner.clone();
    tokio::task::spawn_blocking(move || planner.reload(&path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let snapshot = state.planner.snapshot();
    Ok(Json(ReloadResponse {
        catalog_items: snapshot.catalog().row_count(),
        catalog_loaded_at: snapshot.loaded_at(),
    }))
}
