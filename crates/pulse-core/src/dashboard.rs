use crate::expiry::{ExpiryInfo, ExpiryPolicy, TokenStatus, classify_with};
use crate::model::{PlatformKind, TokenRecord};
use serde::Serialize;
use std::collections::HashMap;
use time::OffsetDateTime;

#[derive(Debug)]
pub struct PlatformGroup<'a> {
    pub platform: &'a str,
    pub records: Vec<&'a TokenRecord>,
}

impl PlatformGroup<'_> {
    pub fn kind(&self) -> PlatformKind {
        PlatformKind::parse(self.platform)
    }
}

/// Groups records by platform.
///
/// Groups appear in order of the first record for each platform; records keep
/// their input order inside a group.
pub fn group_by_platform(records: &[TokenRecord]) -> Vec<PlatformGroup<'_>> {
    let mut groups: Vec<PlatformGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let slot = *index.entry(record.platform.as_str()).or_insert_with(|| {
            groups.push(PlatformGroup {
                platform: record.platform.as_str(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }
    groups
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifiedToken<'a> {
    pub record: &'a TokenRecord,
    pub info: ExpiryInfo,
}

impl ClassifiedToken<'_> {
    pub fn status(&self) -> TokenStatus {
        self.info.status()
    }
}

pub fn classify_all<'a>(
    records: &'a [TokenRecord],
    now: OffsetDateTime,
    policy: &ExpiryPolicy,
) -> Vec<ClassifiedToken<'a>> {
    records
        .iter()
        .map(|record| ClassifiedToken {
            record,
            info: classify_with(record, now, policy),
        })
        .collect()
}

/// Counts shown in the dashboard header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub total: usize,
    pub active: usize,
    /// Expiring soon and not already expired.
    pub expiring_soon: usize,
    pub expired: usize,
    pub unknown_expiry: usize,
}

impl TokenSummary {
    pub fn from_records(records: &[TokenRecord], now: OffsetDateTime, policy: &ExpiryPolicy) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.add(&classify_with(record, now, policy));
        }
        summary
    }

    fn add(&mut self, info: &ExpiryInfo) {
        self.total += 1;
        if !info.is_known() {
            self.unknown_expiry += 1;
        }
        match info.status() {
            TokenStatus::Expired => self.expired += 1,
            TokenStatus::ExpiringSoon => self.expiring_soon += 1,
            TokenStatus::Active => self.active += 1,
        }
    }

    pub fn needs_attention(&self) -> bool {
        self.expired > 0 || self.expiring_soon > 0
    }
}

/// Folds refreshed records into `existing`, replacing by `(platform, accountId)`
/// in place and appending unseen keys. Returns how many records were replaced.
pub fn merge_refreshed(existing: &mut Vec<TokenRecord>, refreshed: Vec<TokenRecord>) -> usize {
    let mut replaced = 0;
    for record in refreshed {
        let key = record.key();
        match existing.iter_mut().find(|current| current.key() == key) {
            Some(current) => {
                *current = record;
                replaced += 1;
            }
            None => existing.push(record),
        }
    }
    replaced
}
