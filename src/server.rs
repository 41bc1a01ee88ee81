use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    cors::{build_cors_layer, reject_foreign_origin},
    error::ServiceError,
    qr::{self, GenerationResponse},
    upload::GenerationForm,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

pub fn build_router(config: Arc<AppConfig>) -> Router {
    let allowed_origin = config.allowed_origin.clone();
    let body_limit = config.max_upload_bytes;
    let state = AppState { config };

    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            allowed_origin.clone(),
            reject_foreign_origin,
        ))
        .layer(build_cors_layer(&allowed_origin))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<AppState>,
    GenerationForm(request): GenerationForm,
) -> Result<Json<GenerationResponse>, ServiceError> {
    info!("received a request to /generate");

    let job = request.normalize(&state.config)?;
    if let Some(icon) = job.icon.as_ref() {
        info!(
            file_name = icon.file_name.as_deref().unwrap_or("<unnamed>"),
            bytes = icon.data.len(),
            "icon received"
        );
    }

    let response = qr::compose(job).await?;
    Ok(Json(response))
}
