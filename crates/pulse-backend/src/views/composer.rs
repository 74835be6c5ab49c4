use super::{Slot, invalid, settle};
use crate::Backend;
use crate::error::BackendResult;
use crate::models::{Job, JobStatus, PublishRequest, PublishResponse};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub content: String,
    pub platforms: Vec<String>,
    pub media_urls: Vec<String>,
    /// `None` publishes immediately.
    pub scheduled_at: Option<OffsetDateTime>,
}

impl PostDraft {
    pub fn into_request(self, now: OffsetDateTime) -> BackendResult<PublishRequest> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err(invalid("post content is empty"));
        }
        let mut platforms: Vec<String> = Vec::new();
        for platform in self.platforms {
            let platform = platform.trim().to_ascii_lowercase();
            if !platform.is_empty() && !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        if platforms.is_empty() {
            return Err(invalid("select at least one platform"));
        }
        let scheduled_at = match self.scheduled_at {
            Some(at) if at <= now => {
                return Err(invalid("scheduled time must be in the future"));
            }
            Some(at) => Some(
                at.format(&Rfc3339)
                    .map_err(|err| invalid(format!("format scheduled time: {err}")))?,
            ),
            None => None,
        };
        Ok(PublishRequest {
            content,
            platforms,
            media_urls: self
                .media_urls
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            scheduled_at,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposerState {
    pub jobs: Slot<Vec<Job>>,
    pub last_publish: Slot<PublishResponse>,
}

impl ComposerState {
    fn job(&self, job_id: &str) -> Option<&Job> {
        self.jobs.ready()?.iter().find(|job| job.id == job_id)
    }

    fn mark_cancelled(&mut self, job_id: &str) {
        if let Some(jobs) = self.jobs.ready_mut() {
            for job in jobs.iter_mut().filter(|job| job.id == job_id) {
                job.status = JobStatus::Cancelled;
            }
        }
    }
}

pub struct ComposerController<B> {
    backend: B,
    state: ComposerState,
}

impl<B: Backend> ComposerController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ComposerState::default(),
        }
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    /// Publishes now, or hands the post to the backend scheduler when the
    /// draft carries a time.
    pub async fn publish(
        &mut self,
        draft: PostDraft,
        now: OffsetDateTime,
    ) -> BackendResult<PublishResponse> {
        let request = draft.into_request(now)?;
        self.state.last_publish = Slot::Loading;
        let result = match request.scheduled_at {
            Some(_) => self.backend.schedule(&request).await,
            None => self.backend.publish(&request).await,
        };
        let (slot, result) = settle(result);
        self.state.last_publish = slot;
        let response = result?;
        info!(
            platforms = %request.platforms.join(","),
            scheduled = request.scheduled_at.is_some(),
            job_id = response.job_id.as_deref().unwrap_or(""),
            "Post submitted"
        );
        Ok(response)
    }

    pub async fn load_jobs(&mut self) -> BackendResult<Vec<Job>> {
        self.state.jobs = Slot::Loading;
        let (slot, result) = settle(self.backend.jobs().await);
        self.state.jobs = slot;
        result
    }

    /// Jobs already known to be past the cancellable stage are rejected
    /// locally; unknown ids go to the backend.
    pub async fn cancel_job(&mut self, job_id: &str) -> BackendResult<()> {
        if let Some(job) = self.state.job(job_id)
            && !job.status.is_cancellable()
        {
            return Err(invalid(format!(
                "job {job_id} is {} and cannot be cancelled",
                job.status
            )));
        }
        self.backend.cancel_job(job_id).await?;
        self.state.mark_cancelled(job_id);
        info!(job_id, "Job cancelled");
        Ok(())
    }
}
