//! Token expiry classification.
//!
//! A [`TokenRecord`] is reduced to an [`ExpirySource`] at the ingestion
//! boundary, resolved against `now`, and compared with the configured
//! [`ExpiryPolicy`]. Nothing here fails: malformed input degrades to an
//! unknown expiry.

use crate::model::TokenRecord;
use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::trace;

pub const DEFAULT_EXPIRING_SOON_HOURS: u32 = 72;

// Relative offsets beyond this are outside any representable instant.
const MAX_RELATIVE_SECS: f64 = 1.0e12;

const NAIVE_DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Where a record's expiry comes from, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExpirySource {
    Absolute(OffsetDateTime),
    /// Seconds from "now"; zero and negative values are kept.
    Relative(f64),
    Unknown,
}

impl ExpirySource {
    pub fn from_record(record: &TokenRecord) -> Self {
        let fields = [
            ("expiresAt", record.expires_at.as_deref()),
            ("tokenExpiresAt", record.token_expires_at.as_deref()),
        ];
        for (field, value) in fields {
            let Some(value) = value else {
                continue;
            };
            match parse_timestamp(value) {
                Some(instant) => return ExpirySource::Absolute(instant),
                None => trace!(
                    platform = %record.platform,
                    field,
                    value,
                    "Ignoring unparseable expiry timestamp"
                ),
            }
        }
        match record.time_until_expiry_seconds {
            Some(seconds) if seconds.is_finite() => ExpirySource::Relative(seconds),
            _ => ExpirySource::Unknown,
        }
    }

    pub fn resolve(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            ExpirySource::Absolute(instant) => Some(instant),
            ExpirySource::Relative(seconds) => offset_by_seconds(now, seconds),
            ExpirySource::Unknown => None,
        }
    }
}

fn offset_by_seconds(now: OffsetDateTime, seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() || seconds.abs() > MAX_RELATIVE_SECS {
        return None;
    }
    now.checked_add(Duration::seconds_f64(seconds))
}

/// Parses the timestamp shapes the backend has been seen to emit.
///
/// RFC 3339 first; then a date-time without offset (taken as UTC, `T` or a
/// space as separator); then a bare date at UTC midnight.
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(instant);
    }
    let normalized = value.replacen(' ', "T", 1);
    for &format in NAIVE_DATETIME_FORMATS {
        if let Ok(datetime) = PrimitiveDateTime::parse(&normalized, format) {
            return Some(datetime.assume_utc());
        }
    }
    Date::parse(value, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Thresholds and precedence rules applied by [`classify_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub expiring_soon_threshold: Duration,
    /// Backend-supplied `isExpired` / `isExpiringSoon` win over derived values.
    pub trust_backend_flags: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::with_threshold_hours(DEFAULT_EXPIRING_SOON_HOURS)
    }
}

impl ExpiryPolicy {
    pub fn with_threshold_hours(hours: u32) -> Self {
        Self {
            expiring_soon_threshold: Duration::hours(i64::from(hours)),
            trust_backend_flags: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenStatus {
    Expired,
    ExpiringSoon,
    Active,
}

impl TokenStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TokenStatus::Expired => "expired",
            TokenStatus::ExpiringSoon => "expiring-soon",
            TokenStatus::Active => "active",
        }
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryInfo {
    /// `None` when no source field could be resolved.
    pub expires_at: Option<OffsetDateTime>,
    pub is_expired: bool,
    /// Raw flag; can be set together with `is_expired`.
    pub is_expiring_soon: bool,
}

impl ExpiryInfo {
    /// Display status. Expired wins over expiring-soon, which wins over active.
    pub fn status(&self) -> TokenStatus {
        if self.is_expired {
            TokenStatus::Expired
        } else if self.is_expiring_soon {
            TokenStatus::ExpiringSoon
        } else {
            TokenStatus::Active
        }
    }

    pub fn is_known(&self) -> bool {
        self.expires_at.is_some()
    }

    pub fn remaining(&self, now: OffsetDateTime) -> Option<Duration> {
        self.expires_at.map(|expires_at| expires_at - now)
    }
}

/// Classifies `record` at `now` with the default policy.
pub fn classify(record: &TokenRecord, now: OffsetDateTime) -> ExpiryInfo {
    classify_with(record, now, &ExpiryPolicy::default())
}

pub fn classify_with(record: &TokenRecord, now: OffsetDateTime, policy: &ExpiryPolicy) -> ExpiryInfo {
    let backend_expired = record.is_expired.filter(|_| policy.trust_backend_flags);
    let backend_expiring = record
        .is_expiring_soon
        .filter(|_| policy.trust_backend_flags);

    let Some(expires_at) = ExpirySource::from_record(record).resolve(now) else {
        return ExpiryInfo {
            expires_at: None,
            is_expired: backend_expired.unwrap_or(false),
            is_expiring_soon: backend_expiring.unwrap_or(false),
        };
    };

    let diff = expires_at - now;
    ExpiryInfo {
        expires_at: Some(expires_at),
        is_expired: backend_expired.unwrap_or(diff <= Duration::ZERO),
        is_expiring_soon: backend_expiring.unwrap_or(diff < policy.expiring_soon_threshold),
    }
}

/// Short human form of a signed remaining duration, e.g. `2d 3h` or `expired 5m ago`.
pub fn format_remaining(remaining: Duration) -> String {
    let expired = remaining <= Duration::ZERO;
    let secs = remaining.whole_seconds().unsigned_abs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let body = if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    };
    if expired {
        format!("expired {body} ago")
    } else {
        body
    }
}
