//! Application command handling.

use tracing::{info, warn};

use crate::commands::CommandRegistry;
use crate::interaction::{InteractionRequest, InteractionResponse};

/// Look up the invoked command and run it.
///
/// An unknown name is logged and answered with an ephemeral notice; no handler
/// runs. A command interaction without `data` is malformed.
pub fn handle_command(registry: &CommandRegistry, request: &InteractionRequest) -> InteractionResponse {
    let name = match request.command_name() {
        Some(name) => name,
        None => {
            warn!(interaction_id = ?request.id, "command_data_missing");
            return InteractionResponse::malformed();
        }
    };

    match registry.resolve(name) {
        Some(command) => {
            info!(command = %name, guild_id = ?request.guild_id, "command_dispatched");
            command.execute(request)
        }
        None => {
            warn!(
                command = %name,
                registered = registry.len(),
                "command_unknown"
            );
            InteractionResponse::ephemeral_message(format!("Unknown command `{name}`"))
        }
    }
}
