//! Configuration module for environment variable parsing.
//!
//! Reads configuration from environment variables, or from a JSON file in the
//! `env.json` layout used by existing bot deployments. Required values that are
//! missing or malformed are reported as [`ConfigError`] and must stop the process
//! before it serves traffic.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::ConfigError;
use crate::web::signature::Verifier;

/// Default Discord REST API root.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10/";

/// Environment variable pointing at an optional JSON config file.
pub const CONFIG_FILE_VAR: &str = "GUILDBOT_CONFIG";

/// Names under which each setting is looked up.
struct Keys {
    token: &'static str,
    application_id: &'static str,
    guild_id: &'static str,
    public_key: &'static str,
    port: &'static str,
    api_base: &'static str,
    request_timeout_ms: &'static str,
}

const ENV_KEYS: Keys = Keys {
    token: "DISCORD_TOKEN",
    application_id: "DISCORD_APPLICATION_ID",
    guild_id: "DISCORD_GUILD_ID",
    public_key: "DISCORD_PUBLIC_KEY",
    port: "PORT",
    api_base: "DISCORD_API_BASE",
    request_timeout_ms: "REQUEST_TIMEOUT_MS",
};

const FILE_KEYS: Keys = Keys {
    token: "TOKEN",
    application_id: "CLIENT_ID",
    guild_id: "GUILD_ID",
    public_key: "PUBLIC_KEY",
    port: "PORT",
    api_base: "API_BASE",
    request_timeout_ms: "REQUEST_TIMEOUT_MS",
};

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Bot token used for the `Authorization: Bot ...` header
    pub token: String,

    /// Application (client) id owning the commands
    pub application_id: String,

    /// Guild the commands are scoped to
    pub guild_id: String,

    /// Hex-encoded Ed25519 public key from the developer portal
    pub public_key: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Root of the Discord REST API, always ending in `/`
    pub api_base: Url,

    /// Per-call timeout for remote API requests in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load from the file named by `GUILDBOT_CONFIG`, or from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_FILE_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Self::from_env(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ENV_KEYS, |name| env::var(name).ok())
    }

    /// Load configuration from a JSON file shaped like `{"TOKEN": "...", ...}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        Self::from_json_str(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: display,
                source,
            },
            other => other,
        })
    }

    fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let values: HashMap<String, serde_json::Value> =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
                path: String::new(),
                source,
            })?;

        // Ids are sometimes written as bare numbers.
        Self::from_lookup(&FILE_KEYS, |name| match values.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn from_lookup<F>(keys: &Keys, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let token = required(keys.token)?;
        let application_id = required(keys.application_id)?;
        let guild_id = required(keys.guild_id)?;
        let public_key = required(keys.public_key)?;

        // Reject a bad key now rather than on the first request.
        Verifier::from_hex(&public_key)?;

        let api_base = parse_api_base(keys.api_base, lookup(keys.api_base))?;

        Ok(Config {
            token,
            application_id,
            guild_id,
            public_key,
            port: parse_or_default(keys.port, lookup(keys.port), 8080),
            api_base,
            request_timeout_ms: parse_or_default(
                keys.request_timeout_ms,
                lookup(keys.request_timeout_ms),
                8000,
            ),
        })
    }

    /// Timeout applied to each remote API call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("guild_id", &self.guild_id)
            .field("public_key", &self.public_key)
            .field("port", &self.port)
            .field("api_base", &self.api_base.as_str())
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Parse an optional numeric value, falling back to the default with a warning.
fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let raw = match raw {
        Some(v) if !v.trim().is_empty() => v,
        _ => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(config_key = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

/// Parse the API base, forcing a trailing slash so endpoint joins append.
fn parse_api_base(name: &'static str, raw: Option<String>) -> Result<Url, ConfigError> {
    let mut raw = raw
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    if !raw.ends_with('/') {
        raw.push('/');
    }

    let url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            name,
            reason: "not a base URL".to_string(),
        });
    }

    Ok(url)
}
