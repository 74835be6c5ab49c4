use super::*;

pub(super) async fn handle_scheduler(
    args: SchedulerArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let backend = backend_from(&config)?;
    let mut dashboard = DashboardController::new(backend, config.expiry.policy());

    let (event, result) = match args.command {
        SchedulerCommands::Status => (
            "scheduler.status",
            dashboard
                .reload_scheduler()
                .await
                .context("load scheduler status"),
        ),
        SchedulerCommands::Start => (
            "scheduler.start",
            dashboard.start_scheduler().await.context("start scheduler"),
        ),
        SchedulerCommands::Stop => (
            "scheduler.stop",
            dashboard.stop_scheduler().await.context("stop scheduler"),
        ),
    };

    let status = audited(audit, event, AuditContext::default(), result)?;
    println!("{}", render::scheduler_line(&status));
    Ok(())
}
