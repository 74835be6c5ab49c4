pub mod client;
pub mod error;
mod http;
pub mod models;
pub mod views;

use async_trait::async_trait;

pub use client::HttpBackend;
pub use error::{BackendError, BackendResult};

use models::{
    ConnectResponse, Job, Overview, PublishRequest, PublishResponse, RefreshOutcome,
    SchedulerStatus, SocialAccount,
};

/// The marketing backend as seen by the views.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn overview(&self) -> BackendResult<Overview>;
    async fn scheduler_status(&self) -> BackendResult<SchedulerStatus>;
    async fn start_scheduler(&self) -> BackendResult<()>;
    async fn stop_scheduler(&self) -> BackendResult<()>;

    /// Refreshes every token, or only those of `platform`.
    async fn refresh_tokens(&self, platform: Option<&str>) -> BackendResult<RefreshOutcome>;

    async fn social_accounts(&self) -> BackendResult<Vec<SocialAccount>>;
    async fn connect_account(&self, platform: &str) -> BackendResult<ConnectResponse>;
    async fn disconnect_account(&self, platform: &str, account_id: &str) -> BackendResult<()>;

    async fn publish(&self, request: &PublishRequest) -> BackendResult<PublishResponse>;
    async fn schedule(&self, request: &PublishRequest) -> BackendResult<PublishResponse>;

    async fn jobs(&self) -> BackendResult<Vec<Job>>;
    async fn cancel_job(&self, job_id: &str) -> BackendResult<()>;
}
