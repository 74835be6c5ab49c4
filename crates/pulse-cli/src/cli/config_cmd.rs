use super::*;

const MASKED_TOKEN: &str = "********";

pub(super) fn handle_config(
    args: ConfigArgs,
    config_path: &Path,
    audit: Option<&AuditLogger>,
) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init(args) => {
            let result = init_config(args, config_path);
            audited(audit, "config.init", AuditContext::default(), result)
        }
        ConfigCommands::Show => {
            let result = load_config(config_path).and_then(|config| print_json(&masked(config)));
            audited(audit, "config.show", AuditContext::default(), result)
        }
        ConfigCommands::Set(args) => {
            let result = set_config(args, config_path);
            audited(audit, "config.set", AuditContext::default(), result)
        }
    }
}

fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    check_api_url(&args.api_url)?;
    let config = AppConfig {
        api_base_url: args.api_url,
        api_token: args.api_token,
        ..AppConfig::default()
    };
    config.save(config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}

fn set_config(args: SetArgs, config_path: &Path) -> anyhow::Result<()> {
    // Env overrides stay out of the saved file.
    let mut config = AppConfig::load(config_path)?;
    if let Some(url) = args.api_url {
        check_api_url(&url)?;
        config.api_base_url = url;
    }
    if let Some(hours) = args.expiring_soon_hours {
        if hours == 0 {
            anyhow::bail!("expiring-soon-hours must be at least 1");
        }
        config.expiry.expiring_soon_hours = hours;
    }
    if let Some(trust) = args.trust_backend_flags {
        config.expiry.trust_backend_flags = trust;
    }
    config.save(config_path)?;
    println!("Config updated");
    Ok(())
}

fn check_api_url(url: &str) -> anyhow::Result<()> {
    HttpBackend::new(url, None)
        .map(|_| ())
        .with_context(|| format!("invalid api url: {url}"))
}

pub(super) fn masked(mut config: AppConfig) -> AppConfig {
    if config.api_token.is_some() {
        config.api_token = Some(MASKED_TOKEN.to_string());
    }
    config
}
