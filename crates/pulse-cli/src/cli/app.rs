use super::*;
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    // Commands still run when no audit directory can be resolved.
    let audit = match AuditLogger::new() {
        Ok(audit) => Some(audit),
        Err(err) => {
            warn!(error = %err, "Audit log disabled");
            None
        }
    };
    let audit = audit.as_ref();
    info!(command = command_label(&cli.command), "Running command");

    let result = match cli.command {
        Commands::Dashboard(args) => handle_dashboard(args, &config_path, audit).await,
        Commands::Tokens(args) => handle_tokens(args, &config_path, audit).await,
        Commands::Scheduler(args) => handle_scheduler(args, &config_path, audit).await,
        Commands::Accounts(args) => handle_accounts(args, &config_path, audit).await,
        Commands::Post(args) => handle_post(args, &config_path, audit).await,
        Commands::Jobs(args) => handle_jobs(args, &config_path, audit).await,
        Commands::Config(args) => handle_config(args, &config_path, audit),
    };

    if let Err(err) = &result
        && let Some(audit) = audit
    {
        let _ = audit.record("app.error", AuditStatus::Failed, None, Some(&err.to_string()));
    }

    result
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Dashboard(_) => "dashboard",
        Commands::Tokens(_) => "tokens",
        Commands::Scheduler(_) => "scheduler",
        Commands::Accounts(_) => "accounts",
        Commands::Post(_) => "post",
        Commands::Jobs(_) => "jobs",
        Commands::Config(_) => "config",
    }
}
