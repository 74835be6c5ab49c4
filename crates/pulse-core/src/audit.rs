use crate::config::default_audit_dir;
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use uuid::Uuid;

const MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Append-only JSON-lines record of user actions (publishes, refreshes, scheduler toggles).
#[derive(Clone)]
pub struct AuditLogger {
    session_id: String,
    base_dir: PathBuf,
    max_bytes: u64,
}

impl AuditLogger {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::new_with_dir(default_audit_dir()?, MAX_BYTES))
    }

    /// The directory is created on the first write.
    pub fn new_with_dir(base_dir: PathBuf, max_bytes: u64) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            base_dir,
            max_bytes,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn record(
        &self,
        event: &str,
        status: AuditStatus,
        details: Option<Value>,
        error: Option<&str>,
    ) -> anyhow::Result<String> {
        self.record_with_context(event, status, AuditContext::default(), details, error)
    }

    pub fn record_with_context(
        &self,
        event: &str,
        status: AuditStatus,
        context: AuditContext,
        details: Option<Value>,
        error: Option<&str>,
    ) -> anyhow::Result<String> {
        let ts = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("format timestamp")?;
        let audit_id = Uuid::new_v4().to_string();
        let entry = AuditEvent {
            ts,
            level: status.level(),
            event: event.to_string(),
            audit_id: audit_id.clone(),
            session_id: self.session_id.clone(),
            status: status.as_str(),
            platform: context.platform,
            account_id: context.account_id,
            job_id: context.job_id,
            error: error.map(|value| value.to_string()),
            details,
        };
        self.write_entry(&entry)?;
        Ok(audit_id)
    }

    fn write_entry(&self, entry: &AuditEvent) -> anyhow::Result<()> {
        fs::create_dir_all(&self.base_dir).context("create audit dir")?;
        let date = OffsetDateTime::now_utc()
            .format(format_description!("[year][month][day]"))
            .context("format date")?;
        let path = next_audit_path(&self.base_dir, &date, self.max_bytes);
        let line = serde_json::to_string(entry).context("serialize audit entry")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open audit log {}", path.display()))?;
        writeln!(file, "{line}").context("write audit entry")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Ok,
    Failed,
}

impl AuditStatus {
    fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "ok",
            AuditStatus::Failed => "failed",
        }
    }

    fn level(&self) -> &'static str {
        match self {
            AuditStatus::Ok => "INFO",
            AuditStatus::Failed => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub platform: Option<String>,
    pub account_id: Option<String>,
    pub job_id: Option<String>,
}

impl AuditContext {
    pub fn platform(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            ..Self::default()
        }
    }

    pub fn job(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct AuditEvent {
    ts: String,
    level: &'static str,
    event: String,
    audit_id: String,
    session_id: String,
    status: &'static str,
    platform: Option<String>,
    account_id: Option<String>,
    job_id: Option<String>,
    error: Option<String>,
    details: Option<Value>,
}

fn next_audit_path(base_dir: &Path, date: &str, max_bytes: u64) -> PathBuf {
    let mut suffix = 0;
    loop {
        let name = if suffix == 0 {
            format!("audit-{date}.jsonl")
        } else {
            format!("audit-{date}-{suffix}.jsonl")
        };
        let path = base_dir.join(name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.len() >= max_bytes => suffix += 1,
            _ => return path,
        }
    }
}
