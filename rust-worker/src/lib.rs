//! GuildBot - Discord interactions endpoint and command registration.
//!
//! This library provides shared modules for the two GuildBot binaries:
//! - `guildbot-web`: Web server answering Discord interaction webhooks
//! - `guildbot-commands`: Administrative tool that installs guild commands
//!
//! ## Architecture
//!
//! ```text
//! Discord → /interactions → signature check → dispatcher → CommandRegistry → Command
//!
//! guildbot-commands → DiscordClient (GET list, POST missing) ← CommandRegistry
//! ```

pub mod commands;
pub mod config;
pub mod discord;
pub mod dispatch;
pub mod error;
pub mod interaction;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use commands::{Command, CommandManifest, CommandRegistry};
pub use config::Config;
pub use discord::{sync_commands, DiscordClient, GuildCommandApi, SyncReport};
pub use dispatch::handle_interaction;
pub use error::{ConfigError, RegistryError, RemoteApiError};
pub use interaction::{InteractionRequest, InteractionResponse, InteractionType};
pub use web::{AppState, Verifier};
