use crate::config::ReactionConfig;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

const HOUR_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct ReactionRecord {
    last_at: Option<DateTime<Utc>>,
    hour_start: DateTime<Utc>,
    hour_count: u32,
}

/// Per-user budget for automatic reactions: a short cooldown between two
/// reactions plus an hourly cap.
#[derive(Clone)]
pub struct ReactionLimiter {
    records: Arc<DashMap<i64, ReactionRecord>>,
    config: ReactionConfig,
}

impl ReactionLimiter {
    pub fn new(config: ReactionConfig) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Takes one reaction from the user's budget if any is left.
    pub fn try_acquire(&self, user_id: i64, now: DateTime<Utc>) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut record = self.records.entry(user_id).or_insert(ReactionRecord {
            last_at: None,
            hour_start: now,
            hour_count: 0,
        });

        if now - record.hour_start >= chrono::Duration::seconds(HOUR_SECS) {
            record.hour_start = now;
            record.hour_count = 0;
        }

        let cooldown = chrono::Duration::from_std(self.config.cooldown).unwrap_or(chrono::Duration::MAX);
        let cooling = record.last_at.is_some_and(|last| now - last < cooldown);
        if cooling || record.hour_count >= self.config.max_per_hour {
            return false;
        }

        record.last_at = Some(now);
        record.hour_count += 1;
        true
    }

    /// Drops users with no reaction in the last hour.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        let hour = chrono::Duration::seconds(HOUR_SECS);
        self.records
            .retain(|_, record| record.last_at.is_some_and(|last| now - last < hour));
        before.saturating_sub(self.records.len())
    }
}
