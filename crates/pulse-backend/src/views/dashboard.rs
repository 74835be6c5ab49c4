use super::{Slot, settle};
use crate::Backend;
use crate::error::BackendResult;
use crate::models::{Overview, RefreshOutcome, SchedulerStatus};
use pulse_core::ExpiryPolicy;
use pulse_core::TokenRecord;
use pulse_core::dashboard::{
    ClassifiedToken, PlatformGroup, TokenSummary, classify_all, group_by_platform,
    merge_refreshed,
};
use time::OffsetDateTime;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub overview: Slot<Overview>,
    pub scheduler: Slot<SchedulerStatus>,
    pub last_refresh: Slot<RefreshOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    Overview(Slot<Overview>),
    Scheduler(Slot<SchedulerStatus>),
    /// A completed refresh also folds its records into the loaded overview.
    Refresh(Slot<RefreshOutcome>),
}

impl DashboardState {
    pub fn apply(&mut self, update: DashboardUpdate) {
        match update {
            DashboardUpdate::Overview(slot) => self.overview = slot,
            DashboardUpdate::Scheduler(slot) => self.scheduler = slot,
            DashboardUpdate::Refresh(slot) => {
                if let Slot::Ready(outcome) = &slot
                    && let Some(overview) = self.overview.ready_mut()
                {
                    merge_refreshed(&mut overview.tokens, outcome.refreshed.clone());
                }
                self.last_refresh = slot;
            }
        }
    }

    pub fn tokens(&self) -> &[TokenRecord] {
        self.overview
            .ready()
            .map(|overview| overview.tokens.as_slice())
            .unwrap_or(&[])
    }
}

pub struct DashboardController<B> {
    backend: B,
    policy: ExpiryPolicy,
    state: DashboardState,
}

impl<B: Backend> DashboardController<B> {
    pub fn new(backend: B, policy: ExpiryPolicy) -> Self {
        Self {
            backend,
            policy,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    /// Fetches overview and scheduler status together. Both slots are
    /// updated even when one request fails; the first error is returned.
    pub async fn load(&mut self) -> BackendResult<()> {
        self.state.apply(DashboardUpdate::Overview(Slot::Loading));
        self.state.apply(DashboardUpdate::Scheduler(Slot::Loading));

        let (overview, scheduler) =
            tokio::join!(self.backend.overview(), self.backend.scheduler_status());

        let (overview_slot, overview) = settle(overview);
        let (scheduler_slot, scheduler) = settle(scheduler);
        self.state.apply(DashboardUpdate::Overview(overview_slot));
        self.state.apply(DashboardUpdate::Scheduler(scheduler_slot));

        let overview = overview?;
        scheduler?;
        info!(tokens = overview.tokens.len(), "Dashboard loaded");
        Ok(())
    }

    pub async fn refresh_tokens(&mut self, platform: Option<&str>) -> BackendResult<RefreshOutcome> {
        self.state.apply(DashboardUpdate::Refresh(Slot::Loading));
        let (slot, result) = settle(self.backend.refresh_tokens(platform).await);
        self.state.apply(DashboardUpdate::Refresh(slot));
        let outcome = result?;
        for failure in &outcome.failed {
            warn!(
                platform = %failure.platform,
                account_id = failure.account_id.as_deref().unwrap_or(""),
                error = %failure.error,
                "Token refresh failed"
            );
        }
        info!(
            platform = platform.unwrap_or("all"),
            refreshed = outcome.refreshed.len(),
            failed = outcome.failed.len(),
            "Tokens refreshed"
        );
        Ok(outcome)
    }

    pub async fn start_scheduler(&mut self) -> BackendResult<SchedulerStatus> {
        self.backend.start_scheduler().await?;
        self.reload_scheduler().await
    }

    pub async fn stop_scheduler(&mut self) -> BackendResult<SchedulerStatus> {
        self.backend.stop_scheduler().await?;
        self.reload_scheduler().await
    }

    pub async fn reload_scheduler(&mut self) -> BackendResult<SchedulerStatus> {
        let (slot, result) = settle(self.backend.scheduler_status().await);
        self.state.apply(DashboardUpdate::Scheduler(slot));
        result
    }

    /// `None` until an overview has loaded.
    pub fn summary(&self, now: OffsetDateTime) -> Option<TokenSummary> {
        self.state
            .overview
            .ready()
            .map(|overview| TokenSummary::from_records(&overview.tokens, now, &self.policy))
    }

    pub fn groups(&self) -> Vec<PlatformGroup<'_>> {
        group_by_platform(self.state.tokens())
    }

    pub fn classified(&self, now: OffsetDateTime) -> Vec<ClassifiedToken<'_>> {
        classify_all(self.state.tokens(), now, &self.policy)
    }
}
