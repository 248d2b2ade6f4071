//! JSON-over-HTTP backends.
//!
//! Both backends share the same response handling: non-success statuses
//! become `ClientError::Server` with the response body as message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use govlens_core::{UserArgs, UserProfile};

use super::traits::*;
use crate::error::{ClientError, Result};

/// Connection settings for an HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Server {
            status,
            message: body,
        });
    }

    let body = response.json().await?;
    Ok(body)
}

/// Like [`handle_response`], but a 404 is `Ok(None)`.
async fn handle_optional<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    handle_response(response).await
}

/// Governance interface over HTTP. Anonymous; no credentials are sent.
pub struct HttpGovernanceBackend {
    client: Client,
    config: HttpConfig,
}

impl HttpGovernanceBackend {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl GovernanceBackend for HttpGovernanceBackend {
    async fn list_proposals(&self, request: ListProposalsRequest) -> Result<ListProposalsResponse> {
        debug!(
            limit = request.limit,
            before = ?request.before_proposal,
            "Listing proposals"
        );
        let response = self
            .client
            .post(self.config.url("/list_proposals"))
            .json(&request)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn get_proposal(&self, id: u64) -> Result<Option<ProposalInfo>> {
        debug!(id, "Fetching proposal");
        let response = self
            .client
            .get(self.config.url(&format!("/proposals/{}", id)))
            .send()
            .await?;
        handle_optional(response).await
    }
}

/// User-preference service over HTTP, acting for one bearer identity.
pub struct HttpUserBackend {
    client: Client,
    config: HttpConfig,
    token: Option<String>,
}

impl HttpUserBackend {
    pub fn new(config: HttpConfig, token: Option<String>) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            token,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn follows_url(&self, topic_id: &str) -> String {
        self.config.url(&format!(
            "/users/me/follows/{}",
            urlencoding::encode(topic_id)
        ))
    }
}

#[async_trait]
impl UserBackend for HttpUserBackend {
    async fn get_current_user(&self) -> Result<Option<UserProfile>> {
        let request = self.client.get(self.config.url("/users/me"));
        let response = self.authorized(request).send().await?;
        Ok(handle_optional::<Option<UserProfile>>(response).await?.flatten())
    }

    async fn get_user(&self, principal: &str) -> Result<Option<UserProfile>> {
        let url = self
            .config
            .url(&format!("/users/{}", urlencoding::encode(principal)));
        let response = self.authorized(self.client.get(url)).send().await?;
        Ok(handle_optional::<Option<UserProfile>>(response).await?.flatten())
    }

    async fn user_count(&self) -> Result<u64> {
        let request = self.client.get(self.config.url("/users/count"));
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn list_users(&self, page: u32, limit: u32) -> Result<Vec<UserProfile>> {
        let url = self
            .config
            .url(&format!("/users?page={}&limit={}", page, limit));
        let response = self.authorized(self.client.get(url)).send().await?;
        handle_response(response).await
    }

    async fn create_user(&self, args: UserArgs) -> Result<RemoteResult<String>> {
        let request = self.client.post(self.config.url("/users")).json(&args);
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn update_user(&self, args: UserArgs) -> Result<RemoteResult<()>> {
        let request = self.client.put(self.config.url("/users/me")).json(&args);
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn delete_user(&self) -> Result<()> {
        let request = self.client.delete(self.config.url("/users/me"));
        let response = self.authorized(request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: body,
            });
        }
        Ok(())
    }

    async fn add_neuron_id(&self, neuron_id: u64) -> Result<RemoteResult<()>> {
        let request = self
            .client
            .post(self.config.url("/users/me/neuron"))
            .json(&serde_json::json!({ "neuron_id": neuron_id }));
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn follow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>> {
        let request = self.client.put(self.follows_url(topic_id));
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn unfollow_topic(&self, topic_id: &str) -> Result<RemoteResult<()>> {
        let request = self.client.delete(self.follows_url(topic_id));
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }

    async fn followed_topics(&self) -> Result<Vec<String>> {
        let request = self.client.get(self.config.url("/users/me/follows"));
        let response = self.authorized(request).send().await?;
        handle_response(response).await
    }
}
