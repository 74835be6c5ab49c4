use super::config_cmd::masked;
use super::dashboard_cmd::dashboard_lines;
use super::tokens_cmd::{classify_output, read_token_file};
use super::*;
use pulse_core::ExpiryPolicy;
use std::fs;

#[test]
fn tokens_classify_parses() {
    let cli = Cli::try_parse_from([
        "pulse",
        "tokens",
        "classify",
        "--file",
        "tokens.json",
        "--now",
        "2025-06-01T12:00:00Z",
        "--json",
    ])
    .unwrap();
    match cli.command {
        Commands::Tokens(TokensArgs {
            command: TokensCommands::Classify(args),
        }) => {
            assert_eq!(args.file, PathBuf::from("tokens.json"));
            assert_eq!(args.now.as_deref(), Some("2025-06-01T12:00:00Z"));
            assert!(args.json);
        }
        _ => panic!("expected tokens classify"),
    }
}

#[test]
fn post_publish_splits_platforms() {
    let cli = Cli::try_parse_from([
        "pulse",
        "--config",
        "/tmp/pulse.json",
        "post",
        "publish",
        "--platform",
        "facebook,linkedin",
        "--content",
        "hello",
        "--media",
        "https://cdn.example.com/a.png",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/pulse.json")));
    match cli.command {
        Commands::Post(PostArgs {
            command: PostCommands::Publish(args),
        }) => {
            assert_eq!(args.platform, vec!["facebook", "linkedin"]);
            assert_eq!(args.media.len(), 1);
            assert!(args.at.is_none());
        }
        _ => panic!("expected post publish"),
    }
}

#[test]
fn post_publish_requires_platform() {
    assert!(Cli::try_parse_from(["pulse", "post", "publish", "--content", "hi"]).is_err());
}

#[test]
fn config_set_parses_bool_flag() {
    let cli = Cli::try_parse_from([
        "pulse",
        "config",
        "set",
        "--expiring-soon-hours",
        "24",
        "--trust-backend-flags",
        "false",
    ])
    .unwrap();
    match cli.command {
        Commands::Config(ConfigArgs {
            command: ConfigCommands::Set(args),
        }) => {
            assert_eq!(args.expiring_soon_hours, Some(24));
            assert_eq!(args.trust_backend_flags, Some(false));
            assert!(args.api_url.is_none());
        }
        _ => panic!("expected config set"),
    }
}

#[test]
fn accounts_disconnect_parses() {
    let cli = Cli::try_parse_from([
        "pulse",
        "accounts",
        "disconnect",
        "--platform",
        "twitter",
        "--account-id",
        "acct-1",
    ])
    .unwrap();
    match cli.command {
        Commands::Accounts(AccountsArgs {
            command: AccountsCommands::Disconnect(args),
        }) => {
            assert_eq!(args.platform, "twitter");
            assert_eq!(args.account_id, "acct-1");
        }
        _ => panic!("expected accounts disconnect"),
    }
}

#[test]
fn token_file_accepts_array_and_overview() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("list.json");
    fs::write(
        &list,
        r#"[{"platform":"facebook","accountId":"page","expiresAt":"2025-06-02T00:00:00Z"}]"#,
    )
    .unwrap();
    let overview = dir.path().join("overview.json");
    fs::write(
        &overview,
        r#"{"tokens":[{"platform":"crm","accountId":42},{"platform":"x"}],"stats":{"posts":3}}"#,
    )
    .unwrap();

    let records = read_token_file(&list).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].account_id.as_deref(), Some("page"));

    let records = read_token_file(&overview).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].account_id.as_deref(), Some("42"));
}

#[test]
fn token_file_rejects_other_shapes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"accounts":[]}"#).unwrap();
    assert!(read_token_file(&path).is_err());
    assert!(read_token_file(&dir.path().join("missing.json")).is_err());
}

#[test]
fn show_masks_token() {
    let config = AppConfig {
        api_token: Some("secret".to_string()),
        ..AppConfig::default()
    };
    assert_eq!(masked(config).api_token.as_deref(), Some("********"));
    assert_eq!(masked(AppConfig::default()).api_token, None);
}

#[test]
fn unloaded_dashboard_says_so() {
    let backend = HttpBackend::new("http://localhost:3000", None).unwrap();
    let dashboard = DashboardController::new(backend, ExpiryPolicy::default());
    let lines = dashboard_lines(&dashboard, OffsetDateTime::now_utc());
    assert_eq!(lines, vec!["Tokens unavailable: not loaded".to_string()]);
}

fn write_sample_tokens(dir: &Path) -> PathBuf {
    let path = dir.join("tokens.json");
    fs::write(
        &path,
        r#"{"tokens":[
            {"platform":"facebook","accountId":"page","accountName":"Acme","expiresAt":"2025-06-01T10:00:00Z"},
            {"platform":"instagram","accountId":"brand","expiresAt":"soon","timeUntilExpirySeconds":3600},
            {"platform":"crm","accountId":"loc-1"}
        ]}"#,
    )
    .unwrap();
    path
}

#[test]
fn classify_file_reports_json_at_fixed_instant() {
    let dir = tempfile::tempdir().unwrap();
    let args = ClassifyArgs {
        file: write_sample_tokens(dir.path()),
        now: Some("2025-06-01T12:00:00Z".to_string()),
        json: true,
    };

    let output = classify_output(args, &dir.path().join("config.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["evaluatedAt"], "2025-06-01 12:00 UTC");
    assert_eq!(
        report["summary"],
        serde_json::json!({
            "total": 3,
            "active": 1,
            "expiringSoon": 1,
            "expired": 1,
            "unknownExpiry": 1
        })
    );
    let tokens = report["tokens"].as_array().unwrap();
    assert_eq!(tokens[0]["status"], "expired");
    assert_eq!(tokens[1]["status"], "expiring-soon");
    assert_eq!(tokens[1]["expiresAt"], "2025-06-01T13:00:00Z");
    assert_eq!(tokens[2]["status"], "active");
    assert!(tokens[2].get("expiresAt").is_none() || tokens[2]["expiresAt"].is_null());
}

#[test]
fn classify_file_renders_text_groups() {
    let dir = tempfile::tempdir().unwrap();
    let args = ClassifyArgs {
        file: write_sample_tokens(dir.path()),
        now: Some("2025-06-01T12:00:00Z".to_string()),
        json: false,
    };

    let output = classify_output(args, &dir.path().join("config.json")).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines[0],
        "3 tokens: 1 active, 1 expiring soon, 1 expired (1 with unknown expiry)"
    );
    assert_eq!(lines[1], "Facebook (1)");
    assert!(lines[2].contains("Acme"));
    assert_eq!(lines[3], "Instagram (1)");
    assert_eq!(lines[5], "CRM (1)");
}

#[test]
fn classify_file_honours_configured_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let mut config = AppConfig::default();
    config.expiry.expiring_soon_hours = 1;
    config.save(&config_path).unwrap();
    let args = ClassifyArgs {
        file: write_sample_tokens(dir.path()),
        now: Some("2025-06-01T12:00:00Z".to_string()),
        json: true,
    };

    let output = classify_output(args, &config_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["summary"]["expiringSoon"], 0);
    assert_eq!(report["summary"]["active"], 2);
}

#[test]
fn classify_file_rejects_bad_now() {
    let dir = tempfile::tempdir().unwrap();
    let args = ClassifyArgs {
        file: write_sample_tokens(dir.path()),
        now: Some("yesterday".to_string()),
        json: false,
    };
    assert!(classify_output(args, &dir.path().join("config.json")).is_err());
}

#[test]
fn audited_passes_through_without_logger() {
    let ok: anyhow::Result<u32> = Ok(7);
    assert_eq!(audited(None, "config.show", AuditContext::default(), ok).unwrap(), 7);
    let failed: anyhow::Result<u32> = Err(anyhow::anyhow!("boom"));
    let err = audited(None, "config.show", AuditContext::default(), failed).unwrap_err();
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn audited_records_reads_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let audit_dir = dir.path().join("audit");
    let audit = AuditLogger::new_with_dir(audit_dir.clone(), 1024 * 1024);

    audited(Some(&audit), "accounts.list", AuditContext::default(), Ok(())).unwrap();
    let failed: anyhow::Result<()> = Err(anyhow::anyhow!("backend down"));
    assert!(audited(Some(&audit), "jobs.list", AuditContext::default(), failed).is_err());

    let mut contents = String::new();
    for entry in fs::read_dir(&audit_dir).unwrap() {
        contents.push_str(&fs::read_to_string(entry.unwrap().path()).unwrap());
    }
    assert!(contents.contains("\"event\":\"accounts.list\""));
    assert!(contents.contains("\"event\":\"jobs.list\""));
    assert!(contents.contains("\"error\":\"backend down\""));
}

#[test]
fn config_init_runs_without_audit_logger() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pulse").join("config.json");
    let args = ConfigArgs {
        command: ConfigCommands::Init(InitArgs {
            api_url: "https://api.example.com".to_string(),
            api_token: None,
        }),
    };

    handle_config(args, &config_path, None).unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    assert_eq!(config.api_base_url, "https://api.example.com");
}
