//! Error types shared across the library.
//!
//! The inbound dispatch path never surfaces these to the webhook caller; it turns
//! every failure into an HTTP response. Startup and the administrative sync flow
//! propagate them to the caller.

use thiserror::Error;

/// Fatal configuration problems detected at process start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value `{0}`")]
    Missing(&'static str),

    #[error("invalid value for `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Problems building the command registry. Any of these stops startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("command name `{name}` is invalid: {reason}")]
    InvalidName { name: String, reason: &'static str },
}

/// Failure talking to the remote Discord API.
#[derive(Debug, Error)]
pub enum RemoteApiError {
    #[error("{method} {endpoint} returned {status}: {body}")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        body: serde_json::Value,
    },

    #[error("{method} {endpoint} timed out")]
    Timeout { method: String, endpoint: String },

    #[error("{method} {endpoint} failed: {source}")]
    Transport {
        method: String,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body for {endpoint}: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl RemoteApiError {
    /// HTTP status returned by Discord, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single command install that did not succeed during sync.
#[derive(Debug, Error)]
#[error("failed to install command `{name}`: {error}")]
pub struct InstallFailure {
    pub name: String,
    #[source]
    pub error: RemoteApiError,
}
