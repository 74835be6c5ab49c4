use super::*;
use crate::render::TokenRow;
use pulse_backend::models::SchedulerStatus;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport<'a> {
    summary: Option<TokenSummary>,
    tokens: Vec<TokenRow<'a>>,
    scheduler: Option<&'a SchedulerStatus>,
    stats: BTreeMap<&'a str, f64>,
    errors: Vec<&'a str>,
}

pub(super) async fn handle_dashboard(
    args: DashboardArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    let result = show_dashboard(args, config_path).await;
    audited(audit, "dashboard.load", AuditContext::default(), result)
}

async fn show_dashboard(args: DashboardArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let backend = backend_from(&config)?;
    let mut dashboard = DashboardController::new(backend, config.expiry.policy());

    // Render whatever arrived before reporting a failed fetch.
    let loaded = dashboard.load().await;
    let now = OffsetDateTime::now_utc();
    if args.json {
        print_json(&report(&dashboard, now))?;
    } else {
        for line in dashboard_lines(&dashboard, now) {
            println!("{line}");
        }
    }
    loaded.context("load dashboard")
}

fn report<B: Backend>(dashboard: &DashboardController<B>, now: OffsetDateTime) -> DashboardReport<'_> {
    let state = dashboard.state();
    DashboardReport {
        summary: dashboard.summary(now),
        tokens: dashboard
            .classified(now)
            .iter()
            .map(|token| TokenRow::new(token, now))
            .collect(),
        scheduler: state.scheduler.ready(),
        stats: state
            .overview
            .ready()
            .map(|overview| overview.numeric_stats().into_iter().collect())
            .unwrap_or_default(),
        errors: [state.overview.error(), state.scheduler.error()]
            .into_iter()
            .flatten()
            .collect(),
    }
}

pub(super) fn dashboard_lines<B: Backend>(
    dashboard: &DashboardController<B>,
    now: OffsetDateTime,
) -> Vec<String> {
    let state = dashboard.state();
    let mut lines = Vec::new();
    match dashboard.summary(now) {
        Some(summary) => {
            lines.push(render::summary_line(&summary));
            if summary.needs_attention() {
                lines.push("Run `pulse tokens refresh` or reconnect the affected accounts.".to_string());
            }
        }
        None => lines.push(format!(
            "Tokens unavailable: {}",
            state.overview.error().unwrap_or("not loaded")
        )),
    }
    match &state.scheduler {
        Slot::Ready(status) => lines.push(render::scheduler_line(status)),
        Slot::Failed(error) => lines.push(format!("Scheduler: unavailable ({error})")),
        Slot::Idle | Slot::Loading => {}
    }
    if let Some(overview) = state.overview.ready() {
        let stats = overview.numeric_stats();
        if !stats.is_empty() {
            lines.push("Stats:".to_string());
            for (name, value) in stats {
                lines.push(format!("  {name}: {value}"));
            }
        }
    }
    lines.extend(render::group_lines(&dashboard.groups(), now, dashboard.policy()));
    lines
}
