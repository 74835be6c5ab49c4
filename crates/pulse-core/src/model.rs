use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Platform key reported by the backend for CRM integrations.
pub const CRM_PLATFORM: &str = "crm";

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PlatformKind {
    Facebook,
    Instagram,
    LinkedIn,
    Twitter,
    TikTok,
    YouTube,
    Pinterest,
    Crm,
    Other(String),
}

impl PlatformKind {
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "facebook" => PlatformKind::Facebook,
            "instagram" => PlatformKind::Instagram,
            "linkedin" => PlatformKind::LinkedIn,
            "twitter" | "x" => PlatformKind::Twitter,
            "tiktok" => PlatformKind::TikTok,
            "youtube" => PlatformKind::YouTube,
            "pinterest" => PlatformKind::Pinterest,
            CRM_PLATFORM => PlatformKind::Crm,
            _ => PlatformKind::Other(key.to_string()),
        }
    }

    pub fn as_key(&self) -> &str {
        match self {
            PlatformKind::Facebook => "facebook",
            PlatformKind::Instagram => "instagram",
            PlatformKind::LinkedIn => "linkedin",
            PlatformKind::Twitter => "twitter",
            PlatformKind::TikTok => "tiktok",
            PlatformKind::YouTube => "youtube",
            PlatformKind::Pinterest => "pinterest",
            PlatformKind::Crm => CRM_PLATFORM,
            PlatformKind::Other(key) => key,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PlatformKind::Facebook => "Facebook",
            PlatformKind::Instagram => "Instagram",
            PlatformKind::LinkedIn => "LinkedIn",
            PlatformKind::Twitter => "X (Twitter)",
            PlatformKind::TikTok => "TikTok",
            PlatformKind::YouTube => "YouTube",
            PlatformKind::Pinterest => "Pinterest",
            PlatformKind::Crm => "CRM",
            PlatformKind::Other(key) => key,
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token record as returned by the backend.
///
/// Expiry arrives in up to three shapes (`expiresAt`, `tokenExpiresAt`,
/// `timeUntilExpirySeconds`). Values of the wrong JSON type are dropped at
/// deserialization so one odd field never rejects the whole record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    #[serde(default, deserialize_with = "lenient_platform")]
    pub platform: String,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_expires_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_until_expiry_seconds: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_expired: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_expiring_soon: Option<bool>,
}

impl TokenRecord {
    pub fn new(platform: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            account_id: Some(account_id.into()),
            ..Self::default()
        }
    }

    pub fn key(&self) -> TokenKey {
        TokenKey {
            platform: self.platform.clone(),
            account_id: self.account_id.clone().unwrap_or_default(),
        }
    }

    pub fn platform_kind(&self) -> PlatformKind {
        PlatformKind::parse(&self.platform)
    }

    /// Label used in listings: account name, then account id, then a placeholder.
    pub fn display_label(&self) -> &str {
        self.account_name
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or(self.account_id.as_deref())
            .unwrap_or("(unnamed account)")
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TokenKey {
    pub platform: String,
    pub account_id: String,
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.account_id)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(value)) => Some(value),
        _ => None,
    })
}

fn lenient_platform<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(value)) => Some(value),
        Some(Value::Number(value)) => Some(value.to_string()),
        _ => None,
    })
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(value)) => value.as_f64(),
        Some(Value::String(value)) => value.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(value)) => Some(value),
        _ => None,
    })
}
