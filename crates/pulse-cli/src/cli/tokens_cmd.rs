use super::*;
use crate::render::TokenRow;
use serde::Serialize;
use std::fs;

/// Token records as exported by the backend: either a bare array or the
/// overview payload that carries them under `tokens`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum TokenFile {
    List(Vec<TokenRecord>),
    Overview { tokens: Vec<TokenRecord> },
}

impl TokenFile {
    pub(super) fn into_records(self) -> Vec<TokenRecord> {
        match self {
            TokenFile::List(records) => records,
            TokenFile::Overview { tokens } => tokens,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport<'a> {
    evaluated_at: String,
    summary: TokenSummary,
    tokens: Vec<TokenRow<'a>>,
}

pub(super) async fn handle_tokens(
    args: TokensArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    match args.command {
        TokensCommands::Classify(args) => {
            let result = classify_output(args, config_path).map(|output| println!("{output}"));
            audited(audit, "tokens.classify", AuditContext::default(), result)
        }
        TokensCommands::Refresh(args) => {
            let context = args
                .platform
                .clone()
                .map(AuditContext::platform)
                .unwrap_or_default();
            let result = refresh(args, config_path).await;
            audited(audit, "tokens.refresh", context, result)
        }
    }
}

pub(super) fn read_token_file(path: &Path) -> anyhow::Result<Vec<TokenRecord>> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let file: TokenFile = serde_json::from_str(&data)
        .with_context(|| format!("parse token records from {}", path.display()))?;
    Ok(file.into_records())
}

/// Classifies a token file offline and renders the text or JSON report.
pub(super) fn classify_output(args: ClassifyArgs, config_path: &Path) -> anyhow::Result<String> {
    let config = load_config(config_path)?;
    let policy = config.expiry.policy();
    let now = match args.now.as_deref() {
        Some(value) => parse_instant(value)?,
        None => OffsetDateTime::now_utc(),
    };
    let records = read_token_file(&args.file)?;
    info!(count = records.len(), file = %args.file.display(), "Classifying token records");

    let summary = TokenSummary::from_records(&records, now, &policy);
    if args.json {
        let report = ClassifyReport {
            evaluated_at: render::format_instant(now),
            summary,
            tokens: classify_all(&records, now, &policy)
                .iter()
                .map(|token| TokenRow::new(token, now))
                .collect(),
        };
        return serde_json::to_string_pretty(&report).context("serialize output");
    }

    let mut lines = vec![render::summary_line(&summary)];
    lines.extend(render::group_lines(&group_by_platform(&records), now, &policy));
    Ok(lines.join("\n"))
}

async fn refresh(args: RefreshArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let backend = backend_from(&config)?;
    let mut dashboard = DashboardController::new(backend, config.expiry.policy());
    let outcome = dashboard
        .refresh_tokens(args.platform.as_deref())
        .await
        .context("refresh tokens")?;

    println!("Refreshed {} token(s)", outcome.refreshed.len());
    let now = OffsetDateTime::now_utc();
    let refreshed = classify_all(&outcome.refreshed, now, dashboard.policy());
    for token in &refreshed {
        println!("{}", render::token_line(token, now));
    }
    for failure in &outcome.failed {
        let target = match failure.account_id.as_deref() {
            Some(account) => format!("{}/{account}", failure.platform),
            None => failure.platform.clone(),
        };
        warn!(target = %target, error = %failure.error, "Token refresh failed");
        println!("  failed {target}: {}", failure.error);
    }
    if !outcome.failed.is_empty() {
        anyhow::bail!("{} token(s) could not be refreshed", outcome.failed.len());
    }
    Ok(())
}
