//! Platform client (the external collaborator).
//!
//! `ComposioApi` is the seam every command talks to; `ComposioClient` is the
//! reqwest implementation against the v3 REST API. Nothing here retries,
//! caches or paginates on its own.
//!
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub mod types;

#[cfg(test)]
pub mod fake;

pub use types::*;

/// Default platform endpoint.
pub const DEFAULT_BASE_URL: &str = "https://backend.composio.dev";

/// User agent for API requests.
const USER_AGENT: &str = concat!("composio-cli/", env!("CARGO_PKG_VERSION"));

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// Failures raised by the platform or the transport. Messages are shown as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response; `message` is the platform's own error text.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Error envelope returned by the platform.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: ErrorDetail },
    Flat { message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the human-readable message from an error body, falling back to
/// the raw text (or the status line when the body is empty).
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Nested { error }) => error.message,
        Ok(ErrorBody::Flat { message }) => message,
        Err(_) if body.trim().is_empty() => format!("request failed with status {status}"),
        Err(_) => body.trim().to_string(),
    }
}

/* ---- Collaborator contract ---- */

#[async_trait]
pub trait ComposioApi: Send + Sync {
    async fn get_toolkit(&self, slug: &str) -> Result<Toolkit, ApiError>;

    async fn list_toolkits(&self, query: &ToolkitQuery) -> Result<Page<Toolkit>, ApiError>;

    async fn get_tool(&self, slug: &str) -> Result<ToolDefinition, ApiError>;

    /// Tools visible to `user_id` matching `filters`.
    async fn list_tools(
        &self,
        user_id: &str,
        filters: &ToolFilters,
    ) -> Result<Page<ToolDefinition>, ApiError>;

    /// Every tool slug the platform can enumerate.
    async fn list_tool_enum(&self) -> Result<Vec<String>, ApiError>;

    async fn list_connected_accounts(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Page<ConnectedAccount>, ApiError>;

    async fn list_auth_configs(&self, toolkit: &str) -> Result<Page<AuthConfig>, ApiError>;

    /// Start a new authorization for (user, toolkit).
    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest, ApiError>;

    async fn execute_tool(&self, slug: &str, request: &ExecuteRequest)
    -> Result<Value, ApiError>;
}

/* ---- REST implementation ---- */

/// Client for the platform's v3 REST API.
pub struct ComposioClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
    toolkit_versions: Option<ToolkitVersions>,
}

impl ComposioClient {
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        toolkit_versions: Option<ToolkitVersions>,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
            toolkit_versions,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `/api/v3/<segments..>` under the base URL, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty().extend(["api", "v3"]).extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.http_client
            .request(method, url.clone())
            .header("x-api-key", &self.api_key)
    }

    /// `toolkit_versions` query value, if versions are pinned.
    fn versions_param(&self) -> Option<(&'static str, String)> {
        let versions = self.toolkit_versions.as_ref()?;
        serde_json::to_string(versions)
            .ok()
            .map(|s| ("toolkit_versions", s))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, ?query, "GET");
        let req = self.request(Method::GET, &url).query(query);
        self.send(req, &url).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "POST");
        let req = self.request(Method::POST, &url).json(body);
        self.send(req, &url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        url: &Url,
    ) -> Result<T, ApiError> {
        let response = req.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "platform returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Auth config to authorize against: the given id, else the first one
    /// for the toolkit, else a newly created platform-managed one.
    async fn resolve_auth_config(
        &self,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<String, ApiError> {
        if let Some(id) = auth_config_id {
            return Ok(id.to_string());
        }
        let existing = self.list_auth_configs(toolkit).await?;
        if let Some(first) = existing.items.into_iter().next() {
            tracing::info!(auth_config = %first.id, toolkit, "using existing auth config");
            return Ok(first.id);
        }
        tracing::info!(toolkit, "creating managed auth config");
        let created: CreatedAuthConfig = self
            .post(
                &["auth_configs"],
                &json!({
                    "toolkit": { "slug": toolkit },
                    "auth_config": { "type": "use_composio_managed_auth" }
                }),
            )
            .await?;
        Ok(created.auth_config.id)
    }
}

#[async_trait]
impl ComposioApi for ComposioClient {
    async fn get_toolkit(&self, slug: &str) -> Result<Toolkit, ApiError> {
        self.get(&["toolkits", slug], &[]).await
    }

    async fn list_toolkits(&self, query: &ToolkitQuery) -> Result<Page<Toolkit>, ApiError> {
        self.get(&["toolkits"], &query.query_pairs()).await
    }

    async fn get_tool(&self, slug: &str) -> Result<ToolDefinition, ApiError> {
        let query: Vec<_> = self.versions_param().into_iter().collect();
        self.get(&["tools", slug], &query).await
    }

    async fn list_tools(
        &self,
        user_id: &str,
        filters: &ToolFilters,
    ) -> Result<Page<ToolDefinition>, ApiError> {
        // GET /tools is not user-scoped; the user only labels the log line.
        tracing::debug!(user_id, "listing tools");
        let mut query = filters.query_pairs();
        query.extend(self.versions_param());
        self.get(&["tools"], &query).await
    }

    async fn list_tool_enum(&self) -> Result<Vec<String>, ApiError> {
        self.get(&["tools", "enum"], &[]).await
    }

    async fn list_connected_accounts(
        &self,
        query: &ConnectionQuery,
    ) -> Result<Page<ConnectedAccount>, ApiError> {
        self.get(&["connected_accounts"], &query.query_pairs())
            .await
    }

    async fn list_auth_configs(&self, toolkit: &str) -> Result<Page<AuthConfig>, ApiError> {
        self.get(&["auth_configs"], &[("toolkit_slug", toolkit.to_string())])
            .await
    }

    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest, ApiError> {
        let auth_config = self.resolve_auth_config(toolkit, auth_config_id).await?;
        self.post(
            &["connected_accounts"],
            &json!({
                "auth_config": { "id": auth_config },
                "connection": { "user_id": user_id }
            }),
        )
        .await
    }

    async fn execute_tool(
        &self,
        slug: &str,
        request: &ExecuteRequest,
    ) -> Result<Value, ApiError> {
        self.post(&["tools", "execute", slug], request).await
    }
}
