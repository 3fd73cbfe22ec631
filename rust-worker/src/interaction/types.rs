//! Inbound interaction types.
//!
//! Only the fields the dispatcher and commands read are modelled; everything else
//! in Discord's payload is ignored. The raw body and headers travel with the
//! request so nothing downstream has to re-serialise it.

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Declares a `u8`-backed enum with an `Unknown` catch-all, serialised as the number.
macro_rules! numbered_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "u8", into = "u8")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            Unknown(u8),
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                match value {
                    $( $value => $name::$variant, )*
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $( $name::$variant => $value, )*
                    $name::Unknown(other) => other,
                }
            }
        }
    };
}

pub(crate) use numbered_enum;

numbered_enum! {
    /// The kind of interaction Discord is delivering.
    pub enum InteractionType {
        Ping = 1,
        ApplicationCommand = 2,
        MessageComponent = 3,
        Autocomplete = 4,
        ModalSubmit = 5,
    }
}

numbered_enum! {
    /// Application command kind.
    pub enum CommandType {
        ChatInput = 1,
        User = 2,
        Message = 3,
    }
}

numbered_enum! {
    /// Type of a command option, both in manifests and in invocations.
    pub enum CommandOptionType {
        SubCommand = 1,
        SubCommandGroup = 2,
        String = 3,
        Integer = 4,
        Boolean = 5,
        User = 6,
        Channel = 7,
        Role = 8,
        Mentionable = 9,
        Number = 10,
        Attachment = 11,
    }
}

/// Data of an application command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<CommandType>,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

/// A filled-in option of an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    #[serde(default)]
    pub focused: bool,
}

impl CommandData {
    /// Top-level option by name.
    pub fn option(&self, name: &str) -> Option<&CommandDataOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Top-level string option value by name.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.option(name)?.value.as_ref()?.as_str()
    }
}

/// Wire shape of the fields read from the JSON body.
#[derive(Debug, Deserialize)]
struct InteractionPayload {
    #[serde(rename = "type")]
    kind: InteractionType,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    application_id: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    guild_id: Option<String>,
    #[serde(default)]
    channel_id: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// A received interaction. Built once per HTTP request and never mutated.
#[derive(Debug, Clone)]
pub struct InteractionRequest {
    pub kind: InteractionType,
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub token: Option<String>,
    pub guild_id: Option<String>,
    pub channel_id: Option<String>,
    /// Present only for application command interactions.
    pub data: Option<CommandData>,
    pub raw_body: Bytes,
    pub headers: HeaderMap,
}

impl InteractionRequest {
    /// Parse the raw body. Fails if the body is not an interaction object, or if a
    /// command interaction carries `data` that is not command data.
    pub fn parse(headers: HeaderMap, raw_body: Bytes) -> Result<Self, serde_json::Error> {
        let payload: InteractionPayload = serde_json::from_slice(&raw_body)?;

        let data = match (payload.kind, payload.data) {
            (InteractionType::ApplicationCommand, Some(value)) => {
                Some(serde_json::from_value::<CommandData>(value)?)
            }
            _ => None,
        };

        Ok(Self {
            kind: payload.kind,
            id: payload.id,
            application_id: payload.application_id,
            token: payload.token,
            guild_id: payload.guild_id,
            channel_id: payload.channel_id,
            data,
            raw_body,
            headers,
        })
    }

    /// Invoked command name, if this is a command interaction.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str())
    }
}
