//! Slash commands served by the bot.
//!
//! Every command implements [`Command`]. The set of commands is enumerated in
//! [`builtin`]; adding a command means adding a module here and listing it there.
//! The [`CommandRegistry`] built from that list is the single source for both
//! request dispatch and remote registration.

pub mod echo;
pub mod hello;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::interaction::{CommandOptionType, CommandType, InteractionRequest, InteractionResponse};

pub use echo::EchoCommand;
pub use hello::HelloCommand;
pub use registry::CommandRegistry;

/// Static declaration of a command, as sent to Discord when installing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandManifest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<CommandOption>>,
}

/// Option schema of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl CommandManifest {
    /// A chat-input (slash) command without options.
    pub fn chat_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandType::ChatInput,
            options: None,
        }
    }

    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.get_or_insert_with(Vec::new).push(option);
        self
    }
}

/// A command handler.
///
/// `execute` must depend only on the request: no shared mutable state, so the
/// same request always yields the same response.
pub trait Command: Send + Sync {
    /// The declaration this handler answers to.
    fn manifest(&self) -> CommandManifest;

    /// Handle one invocation.
    fn execute(&self, request: &InteractionRequest) -> InteractionResponse;
}

/// Every command the bot ships with.
pub fn builtin() -> Vec<Box<dyn Command>> {
    vec![Box::new(HelloCommand), Box::new(EchoCommand)]
}
