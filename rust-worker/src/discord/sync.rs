//! Reconcile local command manifests with the guild's installed commands.
//!
//! Commands are matched by name only. A command whose description, type or
//! options changed locally is considered installed and is not re-sent. Sync never
//! deletes remote commands; use [`DiscordClient::delete_guild_command`] for that.
//!
//! [`DiscordClient::delete_guild_command`]: super::DiscordClient::delete_guild_command

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{error, info};

use super::client::{GuildCommandApi, RemoteCommand};
use crate::commands::{CommandManifest, CommandRegistry};
use crate::error::{InstallFailure, RemoteApiError};

/// What a sync run intends to do.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    /// Local manifests with no remote command of the same name.
    pub to_install: Vec<CommandManifest>,
    /// Local names already present remotely.
    pub already_installed: Vec<String>,
}

/// Outcome of a sync run. Each install is reported on its own.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub already_installed: Vec<String>,
    pub installed: Vec<RemoteCommand>,
    pub failed: Vec<InstallFailure>,
}

impl SyncReport {
    /// True when no install failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Split local manifests into those missing remotely and those already present.
pub fn diff(local: &[CommandManifest], remote: &[RemoteCommand]) -> SyncPlan {
    let remote_names: HashSet<&str> = remote.iter().map(|c| c.name.as_str()).collect();

    let (present, missing): (Vec<_>, Vec<_>) = local
        .iter()
        .partition(|m| remote_names.contains(m.name.as_str()));

    SyncPlan {
        to_install: missing.into_iter().cloned().collect(),
        already_installed: present.into_iter().map(|m| m.name.clone()).collect(),
    }
}

/// Install each manifest. Installs run concurrently and a failure never stops
/// the others from being attempted.
pub async fn apply<A>(api: &A, to_install: &[CommandManifest]) -> SyncReport
where
    A: GuildCommandApi + ?Sized,
{
    let attempts = to_install.iter().map(|manifest| async move {
        info!(command = %manifest.name, "command_installing");
        (manifest, api.install_guild_command(manifest).await)
    });

    let mut report = SyncReport::default();
    for (manifest, result) in join_all(attempts).await {
        match result {
            Ok(command) => {
                info!(command = %command.name, command_id = %command.id, "command_installed");
                report.installed.push(command);
            }
            Err(e) => {
                error!(
                    command = %manifest.name,
                    status_code = ?e.status(),
                    error = %e,
                    "command_install_failed"
                );
                report.failed.push(InstallFailure {
                    name: manifest.name.clone(),
                    error: e,
                });
            }
        }
    }

    report
}

/// Fetch the remote list, then install every registry command missing from it.
///
/// A failed listing is returned as an error before anything is installed.
pub async fn sync_commands<A>(api: &A, registry: &CommandRegistry) -> Result<SyncReport, RemoteApiError>
where
    A: GuildCommandApi + ?Sized,
{
    let remote = api.list_guild_commands().await?;
    let local = registry.all();
    let plan = diff(&local, &remote);

    for name in &plan.already_installed {
        info!(command = %name, "command_already_installed");
    }

    info!(
        local_commands = local.len(),
        remote_commands = remote.len(),
        to_install = plan.to_install.len(),
        "command_sync_planned"
    );

    let mut report = apply(api, &plan.to_install).await;
    report.already_installed = plan.already_installed;

    info!(
        installed = report.installed.len(),
        already_installed = report.already_installed.len(),
        failed = report.failed.len(),
        "command_sync_complete"
    );

    Ok(report)
}
