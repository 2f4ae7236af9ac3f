pub mod appointments;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::appointment::AppointmentService;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

/// Shared handler state; the service carries the injected repository and clock.
#[derive(Clone)]
pub struct ServerState {
    pub appointments: Arc<AppointmentService>,
}

impl ServerState {
    pub fn new(appointments: AppointmentService) -> Self {
        Self { appointments: Arc::new(appointments) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> JsonApiError {
    JsonApiError::new(StatusCode::NOT_FOUND, "route not found")
}

async fn method_not_allowed() -> JsonApiError {
    JsonApiError::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

/// Build the full application router: agenda API, health and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/agenda", get(appointments::list))
        .route("/api/agendar", post(appointments::create))
        .route("/api/agenda/:id", patch(appointments::update).delete(appointments::delete));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and handler failures at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
