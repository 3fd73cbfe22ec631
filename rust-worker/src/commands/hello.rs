//! The `test` command: a fixed greeting.

use super::{Command, CommandManifest};
use crate::interaction::{InteractionRequest, InteractionResponse};

pub struct HelloCommand;

impl Command for HelloCommand {
    fn manifest(&self) -> CommandManifest {
        CommandManifest::chat_input("test", "Basic guild command")
    }

    fn execute(&self, _request: &InteractionRequest) -> InteractionResponse {
        InteractionResponse::message("Hello World!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::HeaderMap;

    #[test]
    fn test_hello_replies() {
        let request = InteractionRequest::parse(
            HeaderMap::new(),
            Bytes::from_static(br#"{"type":2,"data":{"name":"test"}}"#),
        )
        .unwrap();

        let response = HelloCommand.execute(&request);

        assert_eq!(
            response.body_json(),
            r#"{"type":4,"data":{"content":"Hello World!"}}"#
        );
        assert_eq!(response, HelloCommand.execute(&request));
    }
}
