//! Outbound interaction responses.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::types::numbered_enum;

numbered_enum! {
    /// The kind of callback sent back to Discord.
    pub enum InteractionResponseType {
        Pong = 1,
        ChannelMessageWithSource = 4,
        DeferredChannelMessageWithSource = 5,
        DeferredUpdateMessage = 6,
        UpdateMessage = 7,
        AutocompleteResult = 8,
        Modal = 9,
    }
}

/// Message flags that can be set on a callback message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageFlags(pub u64);

impl MessageFlags {
    /// Only the invoking user sees the message.
    pub const EPHEMERAL: MessageFlags = MessageFlags(1 << 6);
}

/// Message payload of a callback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<MessageFlags>,
}

/// `{type, data?}` callback body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionCallback {
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CallbackData>,
}

/// `{content}` body used for rejected or unprocessable requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Callback(InteractionCallback),
    Diagnostic(Diagnostic),
}

/// Body returned for any signature failure. Deliberately the same for every cause.
pub const INVALID_SIGNATURE: &str = "Invalid Request Signature";

/// Body returned when a signed body is not an interaction.
pub const MALFORMED_PAYLOAD: &str = "Malformed Interaction Payload";

/// Body returned for interaction types without a handler.
pub const UNHANDLED_TYPE: &str = "Unhandled Interaction Type";

/// A complete response: HTTP status plus optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionResponse {
    pub status: StatusCode,
    pub body: Option<ResponseBody>,
}

impl InteractionResponse {
    fn callback(kind: InteractionResponseType, data: Option<CallbackData>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(ResponseBody::Callback(InteractionCallback { kind, data })),
        }
    }

    fn diagnostic(status: StatusCode, content: &str) -> Self {
        Self {
            status,
            body: Some(ResponseBody::Diagnostic(Diagnostic {
                content: content.to_string(),
            })),
        }
    }

    /// Acknowledge a ping.
    pub fn pong() -> Self {
        Self::callback(InteractionResponseType::Pong, None)
    }

    /// Reply in channel with a message.
    pub fn message(content: impl Into<String>) -> Self {
        Self::callback(
            InteractionResponseType::ChannelMessageWithSource,
            Some(CallbackData {
                content: Some(content.into()),
                flags: None,
            }),
        )
    }

    /// Reply with a message only the invoking user sees.
    pub fn ephemeral_message(content: impl Into<String>) -> Self {
        Self::callback(
            InteractionResponseType::ChannelMessageWithSource,
            Some(CallbackData {
                content: Some(content.into()),
                flags: Some(MessageFlags::EPHEMERAL),
            }),
        )
    }

    pub fn unauthorized() -> Self {
        Self::diagnostic(StatusCode::UNAUTHORIZED, INVALID_SIGNATURE)
    }

    pub fn malformed() -> Self {
        Self::diagnostic(StatusCode::BAD_REQUEST, MALFORMED_PAYLOAD)
    }

    pub fn unhandled_type() -> Self {
        Self::diagnostic(StatusCode::NOT_IMPLEMENTED, UNHANDLED_TYPE)
    }

    /// JSON text of the body, or an empty string when there is none.
    pub fn body_json(&self) -> String {
        self.body
            .as_ref()
            .and_then(|b| serde_json::to_string(b).ok())
            .unwrap_or_default()
    }
}

impl IntoResponse for InteractionResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(ref body) => match serde_json::to_vec(body) {
                Ok(bytes) => (
                    self.status,
                    [(header::CONTENT_TYPE, "application/json")],
                    bytes,
                )
                    .into_response(),
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            },
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pong_json() {
        let response = InteractionResponse::pong();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body_json(), r#"{"type":1}"#);
    }

    #[test]
    fn test_message_json() {
        assert_eq!(
            InteractionResponse::message("Hello World!").body_json(),
            r#"{"type":4,"data":{"content":"Hello World!"}}"#
        );
    }

    #[test]
    fn test_ephemeral_message_sets_flag() {
        assert_eq!(
            InteractionResponse::ephemeral_message("psst").body_json(),
            r#"{"type":4,"data":{"content":"psst","flags":64}}"#
        );
    }

    #[test]
    fn test_unauthorized_json() {
        let response = InteractionResponse::unauthorized();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body_json(), r#"{"content":"Invalid Request Signature"}"#);
    }

    #[test]
    fn test_unhandled_status() {
        assert_eq!(
            InteractionResponse::unhandled_type().status,
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(InteractionResponse::malformed().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_body_json() {
        let response = InteractionResponse {
            status: StatusCode::OK,
            body: None,
        };
        assert_eq!(response.body_json(), "");
    }
}
