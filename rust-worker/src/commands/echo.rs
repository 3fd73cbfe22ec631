//! The `echo` command: repeats its `text` option back to the caller only.

use super::{Command, CommandManifest, CommandOption};
use crate::interaction::{CommandOptionType, InteractionRequest, InteractionResponse};

const TEXT_OPTION: &str = "text";

pub struct EchoCommand;

impl Command for EchoCommand {
    fn manifest(&self) -> CommandManifest {
        CommandManifest::chat_input("echo", "Repeat a message back to you").with_option(
            CommandOption {
                kind: CommandOptionType::String,
                name: TEXT_OPTION.to_string(),
                description: "Text to repeat".to_string(),
                required: Some(true),
            },
        )
    }

    fn execute(&self, request: &InteractionRequest) -> InteractionResponse {
        let text = request
            .data
            .as_ref()
            .and_then(|d| d.option_str(TEXT_OPTION))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match text {
            Some(text) => InteractionResponse::ephemeral_message(text),
            None => InteractionResponse::ephemeral_message("Nothing to echo."),
        }
    }
}
