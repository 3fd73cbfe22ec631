//! Discord REST API access and command registration.
//!
//! ```text
//! CommandRegistry::all() ─┐
//!                         ├→ sync::diff → sync::apply → POST per missing command
//! GET guild commands ─────┘
//! ```

pub mod client;
pub mod sync;

pub use client::{DiscordClient, GuildCommandApi, RemoteCommand};
pub use sync::{apply, diff, sync_commands, SyncPlan, SyncReport};
