//! Web server module for the Discord interactions endpoint.
//!
//! This module provides a small web server that:
//! - Receives interaction webhooks from Discord
//! - Verifies the Ed25519 request signature
//! - Dispatches to the ping handler or the command registry
//! - Answers synchronously with the interaction callback
//!
//! Dispatch itself is pure and lives in [`crate::dispatch`].

pub mod handlers;
pub mod proxy;
pub mod signature;

pub use handlers::{
    health, interactions, proxy_interactions, router, AppState, HealthResponse,
};
pub use proxy::{handle_proxy_event, ProxyEvent, ProxyResponse};
pub use signature::{verify_signature, Verifier};
