//! Interaction endpoint handlers.
//!
//! Handlers only pull the raw body and headers off the request and hand them to
//! the dispatcher. The body must reach signature verification byte-for-byte, so
//! it is taken as `Bytes` and never through a JSON extractor.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::commands::CommandRegistry;
use crate::dispatch::handle_interaction;
use crate::interaction::InteractionResponse;
use crate::web::proxy::{handle_proxy_event, ProxyEvent, ProxyResponse};
use crate::web::signature::Verifier;
use crate::Config;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<Verifier>,
    pub registry: Arc<CommandRegistry>,
}

impl AppState {
    pub fn new(config: Config, verifier: Verifier, registry: CommandRegistry) -> Self {
        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            registry: Arc::new(registry),
        }
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/interactions", post(interactions))
        .route("/interactions/proxy", post(proxy_interactions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub commands: usize,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        commands: state.registry.len(),
    })
}

// =============================================================================
// Interactions
// =============================================================================

/// Discord interactions endpoint.
pub async fn interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> InteractionResponse {
    info!(body_length = body.len(), "interaction_received");

    let response = handle_interaction(&state.verifier, &state.registry, headers, body);

    info!(status_code = response.status.as_u16(), "interaction_responded");
    response
}

/// Same as [`interactions`], wrapped in the API-gateway envelope.
pub async fn proxy_interactions(
    State(state): State<AppState>,
    Json(event): Json<ProxyEvent>,
) -> Json<ProxyResponse> {
    info!(
        header_count = event.headers.len(),
        is_base64_encoded = event.is_base64_encoded,
        "proxy_interaction_received"
    );

    Json(handle_proxy_event(&state.verifier, &state.registry, &event))
}
