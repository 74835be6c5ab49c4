use super::*;

pub(super) async fn handle_accounts(
    args: AccountsArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut integrations = IntegrationsController::new(backend_from(&config)?);

    match args.command {
        AccountsCommands::List => {
            let result = integrations.load().await.context("load social accounts");
            let accounts = audited(audit, "accounts.list", AuditContext::default(), result)?;
            if accounts.is_empty() {
                println!("No connected accounts.");
            }
            for account in &accounts {
                println!("{}", render::account_line(account));
            }
            Ok(())
        }
        AccountsCommands::Connect(args) => {
            let result = integrations
                .connect(&args.platform)
                .await
                .with_context(|| format!("connect {}", args.platform));
            let url = audited(
                audit,
                "accounts.connect",
                AuditContext::platform(&args.platform),
                result,
            )?;
            println!("Open this URL to authorize {}:", args.platform);
            println!("{url}");
            Ok(())
        }
        AccountsCommands::Disconnect(args) => {
            let context = AuditContext {
                account_id: Some(args.account_id.clone()),
                ..AuditContext::platform(&args.platform)
            };
            let result = integrations
                .disconnect(&args.platform, &args.account_id)
                .await
                .with_context(|| format!("disconnect {}/{}", args.platform, args.account_id));
            audited(audit, "accounts.disconnect", context, result)?;
            println!("Disconnected {}/{}", args.platform, args.account_id);
            Ok(())
        }
    }
}
