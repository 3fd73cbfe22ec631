//! PING handling. Discord sends these when the endpoint URL is saved.

use tracing::info;

use crate::interaction::{InteractionRequest, InteractionResponse};

/// Acknowledge a ping. Never touches the command registry.
pub fn handle_ping(request: &InteractionRequest) -> InteractionResponse {
    info!(interaction_id = ?request.id, "ping_acknowledged");
    InteractionResponse::pong()
}
