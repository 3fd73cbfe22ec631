//! GuildBot Commands - guild command administration.
//!
//! Subcommands:
//! - `sync`: install every built-in command missing from the guild (default)
//! - `list`: print the commands currently installed in the guild
//! - `delete <id>`: remove one installed command
//!
//! `sync` only ever adds commands. Removal is always an explicit `delete`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing::info;

use guildbot::discord::{DiscordClient, GuildCommandApi};
use guildbot::util::init_logging;
use guildbot::{sync_commands, CommandRegistry, Config};

#[derive(Parser)]
#[command(name = "guildbot-commands")]
#[command(about = "Manage GuildBot's guild application commands")]
#[command(version)]
struct Cli {
    /// Override the per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install built-in commands that are missing from the guild
    Sync,
    /// List commands installed in the guild
    List,
    /// Delete an installed command by id
    Delete {
        /// Discord command id
        command_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    info!(
        application_id = %config.application_id,
        guild_id = %config.guild_id,
        api_base = %config.api_base,
        "config_loaded"
    );

    let http = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let mut client = DiscordClient::from_config(http, &config);
    if let Some(ms) = cli.timeout_ms {
        client = client.with_timeout(Duration::from_millis(ms));
    }

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => sync(&client).await,
        Commands::List => list(&client).await,
        Commands::Delete { command_id } => {
            client
                .delete_guild_command(&command_id)
                .await
                .with_context(|| format!("Failed to delete command {command_id}"))?;
            info!(command_id = %command_id, "command_deleted");
            Ok(())
        }
    }
}

async fn sync(client: &DiscordClient) -> Result<()> {
    let registry = CommandRegistry::builtin().context("Invalid command registry")?;

    let report = sync_commands(client, &registry)
        .await
        .context("Failed to list installed commands")?;

    if !report.is_success() {
        bail!(
            "{} of {} command installs failed",
            report.failed.len(),
            report.failed.len() + report.installed.len()
        );
    }

    Ok(())
}

async fn list(client: &DiscordClient) -> Result<()> {
    let commands = client
        .list_guild_commands()
        .await
        .context("Failed to list installed commands")?;

    info!(count = commands.len(), "commands_listed");
    println!(
        "{}",
        serde_json::to_string_pretty(&commands).context("Failed to format commands")?
    );

    Ok(())
}
