//! Name-keyed command registry.
//!
//! Built once during startup and shared read-only afterwards (usually behind an
//! `Arc`). There is no way to add or remove commands once it is handed out.

use std::collections::HashMap;

use tracing::info;

use super::{Command, CommandManifest};
use crate::error::RegistryError;
use crate::interaction::CommandType;

/// Maximum length Discord accepts for a command name.
const MAX_NAME_LENGTH: usize = 32;

struct Entry {
    manifest: CommandManifest,
    handler: Box<dyn Command>,
}

/// Maps command names to their handlers.
///
/// Every key equals the name in its handler's manifest.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Entry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of handlers, failing on the first bad manifest.
    pub fn from_commands<I>(commands: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Box<dyn Command>>,
    {
        let mut registry = Self::new();
        for command in commands {
            registry.register(command)?;
        }
        Ok(registry)
    }

    /// Registry of all built-in commands.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_commands(super::builtin())
    }

    /// Add a handler. Duplicate names are rejected, never overwritten.
    pub fn register(&mut self, handler: Box<dyn Command>) -> Result<(), RegistryError> {
        let manifest = handler.manifest();
        validate_name(&manifest)?;

        if self.commands.contains_key(&manifest.name) {
            return Err(RegistryError::DuplicateName(manifest.name));
        }

        info!(command = %manifest.name, "command_registered");

        self.commands
            .insert(manifest.name.clone(), Entry { manifest, handler });
        Ok(())
    }

    /// Handler for `name`, or `None` if no such command exists.
    pub fn resolve(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|e| e.handler.as_ref())
    }

    /// Manifest registered under `name`.
    pub fn manifest(&self, name: &str) -> Option<&CommandManifest> {
        self.commands.get(name).map(|e| &e.manifest)
    }

    /// All manifests, sorted by name.
    pub fn all(&self) -> Vec<CommandManifest> {
        let mut manifests: Vec<_> = self.commands.values().map(|e| e.manifest.clone()).collect();
        manifests.sort_by(|a, b| a.name.cmp(&b.name));
        manifests
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Reject names Discord would refuse at install time.
fn validate_name(manifest: &CommandManifest) -> Result<(), RegistryError> {
    let name = &manifest.name;
    let invalid = |reason| {
        Err(RegistryError::InvalidName {
            name: name.clone(),
            reason,
        })
    };

    if name.is_empty() {
        return invalid("must not be empty");
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return invalid("must be at most 32 characters");
    }
    if name.chars().any(char::is_whitespace) {
        return invalid("must not contain whitespace");
    }
    if manifest.kind == CommandType::ChatInput && name.chars().any(char::is_uppercase) {
        return invalid("chat input command names must be lowercase");
    }

    Ok(())
}
