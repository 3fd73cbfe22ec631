//! Interaction dispatch.
//!
//! Turns a raw, signed request into a response. Nothing in here returns an
//! error: every outcome, including rejection, is an [`InteractionResponse`].
//!
//! ## Dispatch Flow
//!
//! ```text
//! headers + raw body → verify → parse → PING          → pong
//!                                     → COMMAND       → registry → Command::execute
//!                                     → anything else → 501
//! ```

pub mod command;
pub mod ping;

use axum::body::Bytes;
use axum::http::HeaderMap;
use tracing::{info, warn};

use crate::commands::CommandRegistry;
use crate::interaction::{InteractionRequest, InteractionResponse, InteractionType};
use crate::web::signature::Verifier;

pub use command::handle_command;
pub use ping::handle_ping;

/// Authenticate, parse and route a single inbound request.
pub fn handle_interaction(
    verifier: &Verifier,
    registry: &CommandRegistry,
    headers: HeaderMap,
    raw_body: Bytes,
) -> InteractionResponse {
    if !verifier.verify_headers(&headers, &raw_body) {
        warn!(body_length = raw_body.len(), "interaction_rejected");
        return InteractionResponse::unauthorized();
    }

    let request = match InteractionRequest::parse(headers, raw_body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "interaction_parse_failed");
            return InteractionResponse::malformed();
        }
    };

    dispatch(registry, &request)
}

/// Route an authenticated interaction by its type.
pub fn dispatch(registry: &CommandRegistry, request: &InteractionRequest) -> InteractionResponse {
    let interaction_type = u8::from(request.kind);
    info!(
        interaction_type = interaction_type,
        interaction_id = ?request.id,
        "interaction_routing"
    );

    match request.kind {
        InteractionType::Ping => handle_ping(request),
        InteractionType::ApplicationCommand => handle_command(registry, request),
        InteractionType::MessageComponent
        | InteractionType::Autocomplete
        | InteractionType::ModalSubmit
        | InteractionType::Unknown(_) => {
            warn!(interaction_type = interaction_type, "interaction_type_unhandled");
            InteractionResponse::unhandled_type()
        }
    }
}
