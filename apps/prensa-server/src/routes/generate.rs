//! Generative-text endpoint
//!
//! POST / - forward a prompt to the external generative-text service.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Generation request body
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Overrides the configured default model when present.
    #[serde(default)]
    pub model: Option<String>,
}

/// Generation response body
#[derive(Serialize)]
pub struct GenerateResponse {
    text: String,
}

/// Create the generation router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(generate_text))
}

async fn generate_text(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }

    let text = state
        .generator()
        .generate(&request.prompt, request.model.as_deref())
        .await?;

    Ok(Json(GenerateResponse { text }))
}
