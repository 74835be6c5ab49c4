use crate::expiry::{DEFAULT_EXPIRING_SOON_HOURS, ExpiryPolicy};
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const API_URL_ENV: &str = "PULSE_API_URL";
pub const API_TOKEN_ENV: &str = "PULSE_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default)]
    pub expiry: ExpiryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            expiry: ExpiryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryConfig {
    #[serde(default = "default_expiring_soon_hours")]
    pub expiring_soon_hours: u32,
    #[serde(default = "default_true")]
    pub trust_backend_flags: bool,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            expiring_soon_hours: DEFAULT_EXPIRING_SOON_HOURS,
            trust_backend_flags: true,
        }
    }
}

impl ExpiryConfig {
    pub fn policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            trust_backend_flags: self.trust_backend_flags,
            ..ExpiryPolicy::with_threshold_hours(self.expiring_soon_hours)
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    /// Applies `PULSE_API_URL` / `PULSE_API_TOKEN` style overrides. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = present(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(token) = present(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
    }

    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_expiring_soon_hours() -> u32 {
    DEFAULT_EXPIRING_SOON_HOURS
}

fn default_true() -> bool {
    true
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from("com", "pulse", "pulse").context("resolve project dirs")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn default_audit_dir() -> anyhow::Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("audit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use time::Duration;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.expiry.policy(), ExpiryPolicy::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = AppConfig {
            api_base_url: "https://api.example.com".to_string(),
            api_token: Some("secret".to_string()),
            expiry: ExpiryConfig {
                expiring_soon_hours: 24,
                trust_backend_flags: false,
            },
        };
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"apiBaseUrl\""));
        assert!(raw.contains("\"expiringSoonHours\": 24"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"expiry": {"expiringSoonHours": 48}}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.expiry.trust_backend_flags);
        let policy = config.expiry.policy();
        assert_eq!(policy.expiring_soon_threshold, Duration::hours(48));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn overrides_replace_non_blank_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(|name| match name {
            API_URL_ENV => Some("https://staging.example.com".to_string()),
            API_TOKEN_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://staging.example.com");
        assert_eq!(config.api_token, None);
    }
}
