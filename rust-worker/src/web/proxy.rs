//! API-gateway style envelope.
//!
//! Serverless deployments hand the function `{headers, body, isBase64Encoded}` and
//! expect `{statusCode, body}` back, with `body` being the JSON text of the
//! response. These types convert between that envelope and the dispatcher.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commands::CommandRegistry;
use crate::dispatch::handle_interaction;
use crate::interaction::InteractionResponse;
use crate::web::signature::Verifier;

/// Inbound proxy event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProxyEvent {
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

/// Outbound proxy response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProxyResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl From<InteractionResponse> for ProxyResponse {
    fn from(response: InteractionResponse) -> Self {
        Self {
            status_code: response.status.as_u16(),
            body: response.body_json(),
        }
    }
}

impl ProxyEvent {
    /// Headers as a case-insensitive map. Entries that are not valid HTTP headers
    /// are dropped.
    ///
    /// When several spellings of one name are present, the all-lowercase spelling
    /// wins, then the lexically smallest of the others.
    pub fn header_map(&self) -> HeaderMap {
        let has_upper = |name: &str| name.bytes().any(|b| b.is_ascii_uppercase());
        let mut entries: Vec<_> = self.headers.iter().collect();
        entries.sort_by(|(a, _), (b, _)| (has_upper(a), a).cmp(&(has_upper(b), b)));

        let mut headers = HeaderMap::with_capacity(entries.len());
        for (name, value) in entries {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.entry(name).or_insert(value);
                }
                _ => warn!(header = %name, "proxy_header_invalid"),
            }
        }
        headers
    }

    /// Body bytes exactly as the platform sent them.
    pub fn raw_body(&self) -> Result<Bytes, base64::DecodeError> {
        let body = self.body.as_deref().unwrap_or_default();
        if self.is_base64_encoded {
            Ok(Bytes::from(STANDARD.decode(body)?))
        } else {
            Ok(Bytes::copy_from_slice(body.as_bytes()))
        }
    }
}

/// Run a proxy event through verification and dispatch.
pub fn handle_proxy_event(
    verifier: &Verifier,
    registry: &CommandRegistry,
    event: &ProxyEvent,
) -> ProxyResponse {
    let raw_body = match event.raw_body() {
        Ok(body) => body,
        Err(e) => {
            // An undecodable body cannot be verified.
            warn!(error = %e, "proxy_body_decode_failed");
            return InteractionResponse::unauthorized().into();
        }
    };

    handle_interaction(verifier, registry, event.header_map(), raw_body).into()
}
