use pulse_backend::models::{Job, PublishResponse, SchedulerStatus, SocialAccount};
use pulse_core::PlatformKind;
use pulse_core::dashboard::{ClassifiedToken, PlatformGroup, TokenSummary};
use pulse_core::expiry::{ExpiryPolicy, classify_with, format_remaining};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRow<'a> {
    pub platform: &'a str,
    pub account_id: Option<&'a str>,
    pub account_name: Option<&'a str>,
    pub status: &'static str,
    pub expires_at: Option<String>,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    pub remaining_seconds: Option<i64>,
}

impl<'a> TokenRow<'a> {
    pub fn new(token: &ClassifiedToken<'a>, now: OffsetDateTime) -> Self {
        let record = token.record;
        Self {
            platform: &record.platform,
            account_id: record.account_id.as_deref(),
            account_name: record.account_name.as_deref(),
            status: token.status().label(),
            expires_at: token
                .info
                .expires_at
                .and_then(|instant| instant.format(&Rfc3339).ok()),
            is_expired: token.info.is_expired,
            is_expiring_soon: token.info.is_expiring_soon,
            remaining_seconds: token
                .info
                .remaining(now)
                .map(|remaining| remaining.whole_seconds()),
        }
    }
}

pub fn format_instant(instant: OffsetDateTime) -> String {
    instant
        .to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
        .unwrap_or_else(|_| instant.unix_timestamp().to_string())
}

pub fn summary_line(summary: &TokenSummary) -> String {
    let mut line = format!(
        "{} tokens: {} active, {} expiring soon, {} expired",
        summary.total, summary.active, summary.expiring_soon, summary.expired
    );
    if summary.unknown_expiry > 0 {
        line.push_str(&format!(" ({} with unknown expiry)", summary.unknown_expiry));
    }
    line
}

pub fn token_line(token: &ClassifiedToken<'_>, now: OffsetDateTime) -> String {
    let expiry = match token.info.expires_at {
        Some(at) => format!(
            "expires {} ({})",
            format_instant(at),
            format_remaining(at - now)
        ),
        None => "expiry unknown".to_string(),
    };
    format!(
        "  {:<13} {:<28} {expiry}",
        token.status().label(),
        token.record.display_label()
    )
}

pub fn group_lines(
    groups: &[PlatformGroup<'_>],
    now: OffsetDateTime,
    policy: &ExpiryPolicy,
) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        lines.push(format!("{} ({})", group.kind().display_name(), group.records.len()));
        for &record in &group.records {
            let token = ClassifiedToken {
                record,
                info: classify_with(record, now, policy),
            };
            lines.push(token_line(&token, now));
        }
    }
    lines
}

pub fn scheduler_line(status: &SchedulerStatus) -> String {
    let mut line = format!(
        "Scheduler: {}",
        if status.running { "running" } else { "stopped" }
    );
    let mut extras = Vec::new();
    if let Some(next) = status.next_run_at.as_deref() {
        extras.push(format!("next run {next}"));
    }
    if let Some(pending) = status.pending_jobs {
        extras.push(format!("{pending} pending"));
    }
    if !extras.is_empty() {
        line.push_str(&format!(" ({})", extras.join(", ")));
    }
    line
}

pub fn account_line(account: &SocialAccount) -> String {
    let platform = PlatformKind::parse(&account.platform);
    let name = account
        .account_name
        .as_deref()
        .unwrap_or(account.account_id.as_str());
    match account.connected_at.as_deref() {
        Some(connected) => format!(
            "{:<12} {name} [{}] connected {connected}",
            platform.display_name(),
            account.account_id
        ),
        None => format!("{:<12} {name} [{}]", platform.display_name(), account.account_id),
    }
}

pub fn job_line(job: &Job) -> String {
    let mut line = format!("{:<24} {:<10}", job.id, job.status.as_str());
    if !job.platforms.is_empty() {
        line.push_str(&format!(" {}", job.platforms.join(",")));
    }
    if let Some(at) = job.scheduled_at.as_deref() {
        line.push_str(&format!(" at {at}"));
    }
    if let Some(error) = job.error.as_deref() {
        line.push_str(&format!(" error: {error}"));
    }
    line
}

pub fn publish_lines(response: &PublishResponse) -> Vec<String> {
    let mut lines = vec![match response.job_id.as_deref() {
        Some(job_id) => format!("Post {} (job {job_id})", response.status),
        None => format!("Post {}", response.status),
    }];
    for result in &response.results {
        let line = match (&result.post_id, &result.error) {
            (_, Some(error)) if !result.success => format!("  {}: failed: {error}", result.platform),
            (Some(post_id), _) => format!("  {}: ok ({post_id})", result.platform),
            _ if result.success => format!("  {}: ok", result.platform),
            _ => format!("  {}: failed", result.platform),
        };
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_backend::models::{JobStatus, PlatformPublishResult};
    use pulse_core::TokenRecord;
    use pulse_core::dashboard::group_by_platform;

    fn now() -> OffsetDateTime {
        OffsetDateTime::parse("2025-06-01T12:00:00Z", &Rfc3339).unwrap()
    }

    #[test]
    fn summary_mentions_unknown_only_when_present() {
        let mut summary = TokenSummary {
            total: 2,
            active: 1,
            expiring_soon: 0,
            expired: 1,
            unknown_expiry: 0,
        };
        assert_eq!(
            summary_line(&summary),
            "2 tokens: 1 active, 0 expiring soon, 1 expired"
        );
        summary.unknown_expiry = 1;
        assert!(summary_line(&summary).ends_with("(1 with unknown expiry)"));
    }

    #[test]
    fn groups_render_headers_and_statuses() {
        let mut expired = TokenRecord::new("facebook", "page");
        expired.account_name = Some("Acme".to_string());
        expired.expires_at = Some("2025-06-01T10:00:00Z".to_string());
        let unknown = TokenRecord::new("crm", "loc-1");
        let records = vec![expired, unknown];
        let groups = group_by_platform(&records);

        let lines = group_lines(&groups, now(), &ExpiryPolicy::default());

        assert_eq!(lines[0], "Facebook (1)");
        assert!(lines[1].contains("expired"));
        assert!(lines[1].contains("Acme"));
        assert!(lines[1].contains("2025-06-01 10:00 UTC"));
        assert!(lines[1].contains("expired 2h 0m ago"));
        assert_eq!(lines[2], "CRM (1)");
        assert!(lines[3].contains("active"));
        assert!(lines[3].ends_with("expiry unknown"));
    }

    #[test]
    fn token_row_serializes_camel_case() {
        let mut record = TokenRecord::new("instagram", "brand");
        record.time_until_expiry_seconds = Some(60.0);
        let token = ClassifiedToken {
            record: &record,
            info: classify_with(&record, now(), &ExpiryPolicy::default()),
        };
        let json = serde_json::to_value(TokenRow::new(&token, now())).unwrap();
        assert_eq!(json["status"], "expiring-soon");
        assert_eq!(json["accountId"], "brand");
        assert_eq!(json["expiresAt"], "2025-06-01T12:01:00Z");
        assert_eq!(json["remainingSeconds"], 60);
    }

    #[test]
    fn scheduler_line_lists_extras() {
        let status = SchedulerStatus {
            running: true,
            next_run_at: Some("2025-06-01T13:00:00Z".to_string()),
            last_run_at: None,
            pending_jobs: Some(2),
        };
        assert_eq!(
            scheduler_line(&status),
            "Scheduler: running (next run 2025-06-01T13:00:00Z, 2 pending)"
        );
        assert_eq!(
            scheduler_line(&SchedulerStatus::default()),
            "Scheduler: stopped"
        );
    }

    #[test]
    fn job_and_publish_lines() {
        let job = Job {
            id: "job-1".to_string(),
            kind: None,
            status: JobStatus::Failed,
            platforms: vec!["linkedin".to_string()],
            scheduled_at: None,
            created_at: None,
            error: Some("token expired".to_string()),
        };
        let line = job_line(&job);
        assert!(line.starts_with("job-1"));
        assert!(line.contains("failed"));
        assert!(line.ends_with("error: token expired"));

        let response = PublishResponse {
            job_id: None,
            status: "published".to_string(),
            results: vec![
                PlatformPublishResult {
                    platform: "facebook".to_string(),
                    success: true,
                    post_id: Some("p1".to_string()),
                    error: None,
                },
                PlatformPublishResult {
                    platform: "twitter".to_string(),
                    success: false,
                    post_id: None,
                    error: Some("rate limited".to_string()),
                },
            ],
        };
        assert_eq!(
            publish_lines(&response),
            vec![
                "Post published".to_string(),
                "  facebook: ok (p1)".to_string(),
                "  twitter: failed: rate limited".to_string(),
            ]
        );
    }
}
