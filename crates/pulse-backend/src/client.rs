use crate::Backend;
use crate::error::{BackendError, BackendResult};
use crate::http::{decode, send_with_retry};
use crate::models::{
    ConnectResponse, Job, Overview, PublishRequest, PublishResponse, RefreshOutcome,
    RefreshRequest, SchedulerStatus, SocialAccount,
};
use async_trait::async_trait;
use pulse_core::config::AppConfig;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// REST client for the marketing backend.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str, token: Option<String>) -> BackendResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|err| {
            BackendError::InvalidRequest(format!("invalid backend url {base_url}: {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidRequest(format!(
                "backend url {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder()
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| BackendError::InvalidRequest(format!("build http client: {err}")))?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|value| !value.trim().is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> BackendResult<Self> {
        Self::new(&config.api_base_url, config.api_token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T>(&self, segments: &[&str]) -> BackendResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        debug!(method = "GET", path = url.path(), "Calling backend");
        let response = send_with_retry(url.path(), || self.request(Method::GET, &url)).await?;
        decode(url.path(), response).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> BackendResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        debug!(method = "POST", path = url.path(), "Calling backend");
        let response = send_with_retry(url.path(), || {
            self.request(Method::POST, &url).json(body)
        })
        .await?;
        decode(url.path(), response).await
    }

    async fn send_unit(&self, method: Method, segments: &[&str]) -> BackendResult<()> {
        let url = self.endpoint(segments);
        debug!(method = %method, path = url.path(), "Calling backend");
        let response = send_with_retry(url.path(), || self.request(method.clone(), &url)).await?;
        let _ = response.bytes().await;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn overview(&self) -> BackendResult<Overview> {
        self.get_json(&["api", "overview"]).await
    }

    async fn scheduler_status(&self) -> BackendResult<SchedulerStatus> {
        self.get_json(&["api", "scheduler", "status"]).await
    }

    async fn start_scheduler(&self) -> BackendResult<()> {
        self.send_unit(Method::POST, &["api", "scheduler", "start"])
            .await
    }

    async fn stop_scheduler(&self) -> BackendResult<()> {
        self.send_unit(Method::POST, &["api", "scheduler", "stop"])
            .await
    }

    async fn refresh_tokens(&self, platform: Option<&str>) -> BackendResult<RefreshOutcome> {
        self.post_json(&["api", "tokens", "refresh"], &RefreshRequest { platform })
            .await
    }

    async fn social_accounts(&self) -> BackendResult<Vec<SocialAccount>> {
        self.get_json(&["api", "social", "accounts"]).await
    }

    async fn connect_account(&self, platform: &str) -> BackendResult<ConnectResponse> {
        self.post_json(&["api", "social", platform, "connect"], &serde_json::json!({}))
            .await
    }

    async fn disconnect_account(&self, platform: &str, account_id: &str) -> BackendResult<()> {
        self.send_unit(
            Method::DELETE,
            &["api", "social", platform, "accounts", account_id],
        )
        .await
    }

    async fn publish(&self, request: &PublishRequest) -> BackendResult<PublishResponse> {
        self.post_json(&["api", "posts", "publish"], request).await
    }

    async fn schedule(&self, request: &PublishRequest) -> BackendResult<PublishResponse> {
        self.post_json(&["api", "posts", "schedule"], request).await
    }

    async fn jobs(&self) -> BackendResult<Vec<Job>> {
        self.get_json(&["api", "jobs"]).await
    }

    async fn cancel_job(&self, job_id: &str) -> BackendResult<()> {
        self.send_unit(Method::POST, &["api", "jobs", job_id, "cancel"])
            .await
    }
}
