//! Discord REST client for guild-scoped application commands.
//!
//! Every call goes through [`DiscordClient::request`], which adds the bot
//! authorization header, sends JSON, applies the per-call timeout and turns any
//! non-2xx status into [`RemoteApiError::Status`]. Nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use crate::commands::CommandManifest;
use crate::error::RemoteApiError;
use crate::interaction::CommandType;
use crate::Config;

/// Content type sent with every request.
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A command as Discord reports it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_command_type")]
    pub kind: CommandType,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

fn default_command_type() -> CommandType {
    CommandType::ChatInput
}

/// Remote operations the sync flow needs.
#[async_trait]
pub trait GuildCommandApi: Send + Sync {
    /// Fresh listing of the guild's installed commands.
    async fn list_guild_commands(&self) -> Result<Vec<RemoteCommand>, RemoteApiError>;

    /// Install (create or overwrite by name) a single command.
    async fn install_guild_command(
        &self,
        manifest: &CommandManifest,
    ) -> Result<RemoteCommand, RemoteApiError>;
}

/// Client bound to one application and guild.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: Url,
    token: String,
    application_id: String,
    guild_id: String,
    timeout: Duration,
}

impl DiscordClient {
    pub fn new(
        http: Client,
        api_base: Url,
        token: impl Into<String>,
        application_id: impl Into<String>,
        guild_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base,
            token: token.into(),
            application_id: application_id.into(),
            guild_id: guild_id.into(),
            timeout: Duration::from_millis(8000),
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(
            http,
            config.api_base.clone(),
            config.token.clone(),
            config.application_id.clone(),
            config.guild_id.clone(),
        )
        .with_timeout(config.request_timeout())
    }

    /// Timeout applied to each individual call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn commands_endpoint(&self) -> String {
        format!(
            "applications/{}/guilds/{}/commands",
            self.application_id, self.guild_id
        )
    }

    /// Send one request to `endpoint` (relative to the API base).
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Bytes, RemoteApiError> {
        let url = self
            .api_base
            .join(endpoint)
            .map_err(|source| RemoteApiError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .timeout(self.timeout)
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|source| RemoteApiError::Encode {
                endpoint: endpoint.to_string(),
                source,
            })?;
            request = request.body(bytes);
        }

        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                RemoteApiError::Timeout {
                    method: method.to_string(),
                    endpoint: endpoint.to_string(),
                }
            } else {
                RemoteApiError::Transport {
                    method: method.to_string(),
                    endpoint: endpoint.to_string(),
                    source: e,
                }
            }
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            });

            error!(
                method = %method,
                endpoint = endpoint,
                status_code = status.as_u16(),
                body = %body,
                "discord_request_failed"
            );

            return Err(RemoteApiError::Status {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        info!(
            method = %method,
            endpoint = endpoint,
            status_code = status.as_u16(),
            body_length = bytes.len(),
            "discord_request_complete"
        );

        Ok(bytes)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, RemoteApiError> {
        let bytes = self.request(method, endpoint, body).await?;
        serde_json::from_slice(&bytes).map_err(|source| RemoteApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Whether a command with the manifest's name is installed. Always re-lists.
    pub async fn has_guild_command(&self, manifest: &CommandManifest) -> Result<bool, RemoteApiError> {
        let installed = self.list_guild_commands().await?;
        Ok(installed.iter().any(|c| c.name == manifest.name))
    }

    /// Delete a command by its Discord id.
    pub async fn delete_guild_command(&self, command_id: &str) -> Result<(), RemoteApiError> {
        let endpoint = format!("{}/{}", self.commands_endpoint(), command_id);
        self.request(Method::DELETE, &endpoint, None).await?;

        info!(command_id = command_id, "discord_command_deleted");
        Ok(())
    }
}

#[async_trait]
impl GuildCommandApi for DiscordClient {
    async fn list_guild_commands(&self) -> Result<Vec<RemoteCommand>, RemoteApiError> {
        let endpoint = self.commands_endpoint();
        let commands: Option<Vec<RemoteCommand>> =
            self.request_json(Method::GET, &endpoint, None).await?;
        Ok(commands.unwrap_or_default())
    }

    async fn install_guild_command(
        &self,
        manifest: &CommandManifest,
    ) -> Result<RemoteCommand, RemoteApiError> {
        let endpoint = self.commands_endpoint();
        let body = serde_json::to_value(manifest).map_err(|source| RemoteApiError::Encode {
            endpoint: endpoint.clone(),
            source,
        })?;

        self.request_json(Method::POST, &endpoint, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    struct Recorded {
        method: String,
        path: String,
        authorization: Option<String>,
        content_type: Option<String>,
        body: Option<serde_json::Value>,
    }

    #[derive(Clone, Default)]
    struct FakeDiscord {
        installed: Arc<Mutex<Vec<RemoteCommand>>>,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl FakeDiscord {
        fn record(&self, method: &str, path: String, headers: &HeaderMap, body: Option<serde_json::Value>) {
            let header = |name: &str| {
                headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            self.requests.lock().unwrap().push(Recorded {
                method: method.to_string(),
                path,
                authorization: header("authorization"),
                content_type: header("content-type"),
                body,
            });
        }
    }

    async fn list(
        State(fake): State<FakeDiscord>,
        Path((app, guild)): Path<(String, String)>,
        headers: HeaderMap,
    ) -> axum::response::Response {
        fake.record("GET", format!("{app}/{guild}"), &headers, None);
        match guild.as_str() {
            "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(Vec::<RemoteCommand>::new()).into_response()
            }
            _ => {
                let installed = fake.installed.lock().unwrap().clone();
                Json(installed).into_response()
            }
        }
    }

    async fn install(
        State(fake): State<FakeDiscord>,
        Path((app, guild)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        fake.record("POST", format!("{app}/{guild}"), &headers, Some(body.clone()));

        let name = body["name"].as_str().unwrap_or_default().to_string();
        if name == "rejected" {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"message": "Invalid Form Body", "code": 50035})),
            )
                .into_response();
        }

        let command = RemoteCommand {
            id: format!("id-{name}"),
            name,
            description: body["description"].as_str().unwrap_or_default().to_string(),
            kind: CommandType::ChatInput,
            application_id: Some(app),
            guild_id: Some(guild),
            version: Some("1".to_string()),
        };
        fake.installed.lock().unwrap().push(command.clone());
        (StatusCode::CREATED, Json(command)).into_response()
    }

    async fn remove(
        State(fake): State<FakeDiscord>,
        Path((app, guild, id)): Path<(String, String, String)>,
        headers: HeaderMap,
    ) -> StatusCode {
        fake.record("DELETE", format!("{app}/{guild}/{id}"), &headers, None);
        let mut installed = fake.installed.lock().unwrap();
        let before = installed.len();
        installed.retain(|c| c.id != id);
        if installed.len() == before {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn spawn_fake(fake: FakeDiscord) -> Url {
        let router = Router::new()
            .route(
                "/api/v10/applications/:app/guilds/:guild/commands",
                get(list).post(install),
            )
            .route(
                "/api/v10/applications/:app/guilds/:guild/commands/:id",
                delete(remove),
            )
            .with_state(fake);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Url::parse(&format!("http://{addr}/api/v10/")).unwrap()
    }

    fn client(base: Url, guild: &str) -> DiscordClient {
        DiscordClient::new(Client::new(), base, "secret-token", "app1", guild)
    }

    #[tokio::test]
    async fn test_install_sends_auth_and_json() {
        let fake = FakeDiscord::default();
        let client = client(spawn_fake(fake.clone()).await, "guild1");

        let manifest = CommandManifest::chat_input("test", "Basic guild command");
        let installed = client.install_guild_command(&manifest).await.unwrap();

        assert_eq!(installed.id, "id-test");
        assert_eq!(installed.name, "test");

        let requests = fake.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "app1/guild1");
        assert_eq!(requests[0].authorization.as_deref(), Some("Bot secret-token"));
        assert_eq!(requests[0].content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({"name": "test", "description": "Basic guild command", "type": 1}))
        );
    }

    #[tokio::test]
    async fn test_list_and_has_always_fetch_fresh() {
        let fake = FakeDiscord::default();
        let client = client(spawn_fake(fake.clone()).await, "guild1");
        let manifest = CommandManifest::chat_input("test", "Basic guild command");

        assert!(client.list_guild_commands().await.unwrap().is_empty());
        assert!(!client.has_guild_command(&manifest).await.unwrap());

        client.install_guild_command(&manifest).await.unwrap();

        assert!(client.has_guild_command(&manifest).await.unwrap());
        let gets = fake
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == "GET")
            .count();
        assert_eq!(gets, 3);
    }

    #[tokio::test]
    async fn test_non_success_status_carries_parsed_body() {
        let client = client(spawn_fake(FakeDiscord::default()).await, "guild1");
        let manifest = CommandManifest::chat_input("rejected", "Refused by Discord");

        let err = client.install_guild_command(&manifest).await.unwrap_err();

        match err {
            RemoteApiError::Status {
                method,
                status,
                body,
                ..
            } => {
                assert_eq!(method, "POST");
                assert_eq!(status, 400);
                assert_eq!(body["code"], 50035);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_as_text() {
        let client = client(spawn_fake(FakeDiscord::default()).await, "broken");

        let err = client.list_guild_commands().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        match err {
            RemoteApiError::Status { body, .. } => {
                assert_eq!(body, serde_json::json!("upstream exploded"))
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_reported() {
        let client = client(spawn_fake(FakeDiscord::default()).await, "slow")
            .with_timeout(Duration::from_millis(50));

        let err = client.list_guild_commands().await.unwrap_err();
        assert!(matches!(err, RemoteApiError::Timeout { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_delete_command() {
        let fake = FakeDiscord::default();
        let client = client(spawn_fake(fake.clone()).await, "guild1");
        let manifest = CommandManifest::chat_input("test", "Basic guild command");
        let installed = client.install_guild_command(&manifest).await.unwrap();

        client.delete_guild_command(&installed.id).await.unwrap();
        assert!(client.list_guild_commands().await.unwrap().is_empty());

        let err = client.delete_guild_command(&installed.id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let requests = fake.requests.lock().unwrap().clone();
        assert!(requests
            .iter()
            .any(|r| r.method == "DELETE" && r.path == "app1/guild1/id-test"));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on the discard port.
        let base = Url::parse("http://127.0.0.1:9/api/v10/").unwrap();
        let err = client(base, "guild1").list_guild_commands().await.unwrap_err();

        assert!(
            matches!(err, RemoteApiError::Transport { .. } | RemoteApiError::Timeout { .. }),
            "{err:?}"
        );
    }
}
