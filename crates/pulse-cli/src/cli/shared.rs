use super::*;
use serde::Serialize;

pub(super) fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    AppConfig::load_with_env(path).with_context(|| format!("load config {}", path.display()))
}

pub(super) fn backend_from(config: &AppConfig) -> anyhow::Result<HttpBackend> {
    HttpBackend::from_config(config).context("create backend client")
}

pub(super) fn parse_instant(value: &str) -> anyhow::Result<OffsetDateTime> {
    pulse_core::expiry::parse_timestamp(value)
        .with_context(|| format!("invalid timestamp: {value}"))
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{data}");
    Ok(())
}

/// Writes the audit entry for a finished action and passes the result through.
pub(super) fn audited<T>(
    audit: Option<&AuditLogger>,
    event: &str,
    context: AuditContext,
    result: anyhow::Result<T>,
) -> anyhow::Result<T> {
    let Some(audit) = audit else {
        return result;
    };
    let recorded = match &result {
        Ok(_) => audit.record_with_context(event, AuditStatus::Ok, context, None, None),
        Err(err) => audit.record_with_context(
            event,
            AuditStatus::Failed,
            context,
            None,
            Some(&err.to_string()),
        ),
    };
    if let Err(err) = recorded {
        warn!(event, error = %err, "Failed to write audit entry");
    }
    result
}
