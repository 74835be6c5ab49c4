use super::*;

pub(super) async fn handle_post(
    args: PostArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    match args.command {
        PostCommands::Publish(args) => {
            let event = if args.at.is_some() {
                "post.schedule"
            } else {
                "post.publish"
            };
            let context = AuditContext::platform(args.platform.join(","));
            let result = publish(args, config_path).await;
            audited(audit, event, context, result)
        }
    }
}

async fn publish(args: PublishArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut composer = ComposerController::new(backend_from(&config)?);
    let scheduled_at = args.at.as_deref().map(parse_instant).transpose()?;
    let draft = PostDraft {
        content: args.content,
        platforms: args.platform,
        media_urls: args.media,
        scheduled_at,
    };

    let response = composer
        .publish(draft, OffsetDateTime::now_utc())
        .await
        .context("submit post")?;
    for line in render::publish_lines(&response) {
        println!("{line}");
    }
    let failures = response.failures().count();
    if failures > 0 {
        anyhow::bail!("post failed on {failures} platform(s)");
    }
    Ok(())
}

pub(super) async fn handle_jobs(
    args: JobsArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut composer = ComposerController::new(backend_from(&config)?);

    match args.command {
        JobsCommands::List => {
            let result = composer.load_jobs().await.context("load jobs");
            let jobs = audited(audit, "jobs.list", AuditContext::default(), result)?;
            if jobs.is_empty() {
                println!("No jobs.");
            }
            for job in &jobs {
                println!("{}", render::job_line(job));
            }
            Ok(())
        }
        JobsCommands::Cancel(args) => {
            // Loading first lets the controller refuse jobs that already finished.
            if let Err(err) = composer.load_jobs().await {
                warn!(error = %err, "Could not load jobs before cancelling");
            }
            let result = composer
                .cancel_job(&args.id)
                .await
                .with_context(|| format!("cancel job {}", args.id));
            audited(audit, "jobs.cancel", AuditContext::job(&args.id), result)?;
            println!("Cancelled job {}", args.id);
            Ok(())
        }
    }
}
