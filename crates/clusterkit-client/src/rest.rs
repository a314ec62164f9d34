//! REST implementation of [`WorkspaceApi`].
//!
//! Authenticates as a service principal with the OAuth client-credentials
//! flow (`POST /oidc/v1/token`), caches the access token until shortly
//! before it expires, and sends every API call with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use clusterkit_core::ClientConfig;
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::WorkspaceApi;
use crate::error::{ApiError, ApiResult};
use crate::types::*;

const TOKEN_PATH: &str = "/oidc/v1/token";
const POLICIES_LIST: &str = "/api/2.0/policies/clusters/list";
const POLICIES_CREATE: &str = "/api/2.0/policies/clusters/create";
const CLUSTERS_CREATE: &str = "/api/2.1/clusters/create";
const CLUSTERS_GET: &str = "/api/2.1/clusters/get";
const CLUSTERS_LIST: &str = "/api/2.1/clusters/list";
const CLUSTERS_DELETE: &str = "/api/2.1/clusters/delete";
const LIBRARIES_INSTALL: &str = "/api/2.0/libraries/install";

/// Tokens are refreshed this long before the service says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// How long `create_cluster` waits for the cluster to come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20 * 60),
            poll_interval: Duration::from_secs(10),
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Default, serde::Deserialize)]
struct ErrorBody {
    error_code: Option<String>,
    message: Option<String>,
}

/// Workspace client authenticated as a service principal.
pub struct WorkspaceClient {
    http: reqwest::Client,
    host: String,
    client_id: String,
    client_secret: String,
    wait: WaitOptions,
    token: Mutex<Option<CachedToken>>,
}

impl WorkspaceClient {
    /// Build a client for the workspace described by `config`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        let host = normalize_host(&config.host);
        info!(%host, "workspace client configured");
        Ok(Self {
            http,
            host,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            wait: WaitOptions::default(),
            token: Mutex::new(None),
        })
    }

    /// Override how long cluster creation waits for `RUNNING`.
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch a single cluster's current details.
    pub async fn get_cluster(&self, cluster_id: &str) -> ApiResult<ClusterDetails> {
        let request = self
            .http
            .get(self.url(CLUSTERS_GET))
            .query(&[("cluster_id", cluster_id)]);
        self.send(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    async fn access_token(&self) -> ApiResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!(host = %self.host, "requesting OAuth access token");
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", "all-apis")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(host = %self.host, %status, "token request rejected");
            return Err(ApiError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Auth(format!("invalid token response: {e}")))?;
        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
        });
        Ok(token.access_token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn wait_until_running(&self, cluster_id: &str) -> ApiResult<ClusterDetails> {
        let started = Instant::now();
        loop {
            let details = self.get_cluster(cluster_id).await?;
            if details.state == ClusterState::Running {
                return Ok(details);
            }
            if details.state.is_failed() {
                return Err(ApiError::ClusterFailed {
                    cluster_id: cluster_id.to_string(),
                    state: details.state,
                    message: details.state_message.unwrap_or_default(),
                });
            }
            if started.elapsed() >= self.wait.timeout {
                return Err(ApiError::Timeout {
                    cluster_id: cluster_id.to_string(),
                    waited: self.wait.timeout,
                });
            }
            debug!(%cluster_id, state = ?details.state, "waiting for cluster to reach RUNNING");
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }
}

#[async_trait]
impl WorkspaceApi for WorkspaceClient {
    async fn list_policies(&self) -> ApiResult<Vec<Policy>> {
        let response: ListPoliciesResponse = self.send(self.http.get(self.url(POLICIES_LIST))).await?;
        Ok(response.policies)
    }

    async fn create_policy(&self, request: &CreatePolicy) -> ApiResult<CreatePolicyResponse> {
        self.post(POLICIES_CREATE, request).await
    }

    async fn create_cluster(&self, request: &CreateCluster) -> ApiResult<ClusterDetails> {
        let created: CreateClusterResponse = self.post(CLUSTERS_CREATE, request).await?;
        info!(cluster_id = %created.cluster_id, "cluster creation accepted");
        self.wait_until_running(&created.cluster_id).await
    }

    async fn list_clusters(&self) -> ApiResult<Vec<ClusterDetails>> {
        let response: ListClustersResponse = self.send(self.http.get(self.url(CLUSTERS_LIST))).await?;
        Ok(response.clusters)
    }

    async fn delete_cluster(&self, cluster_id: &str) -> ApiResult<()> {
        let _: Empty = self.post(CLUSTERS_DELETE, &DeleteCluster { cluster_id }).await?;
        Ok(())
    }

    async fn install_libraries(&self, request: &InstallLibraries) -> ApiResult<()> {
        let _: Empty = self.post(LIBRARIES_INSTALL, request).await?;
        Ok(())
    }
}

/// Turn a response into `T`, or into [`ApiError::Status`] for non-2xx.
async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            error_code: body.error_code.unwrap_or_else(|| "UNKNOWN".to_string()),
            message: body.message.unwrap_or(text),
        });
    }

    // Some endpoints answer with an empty body instead of `{}`.
    let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Ensure a scheme is present and drop any trailing slash.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
