use crate::config::CooldownConfig;
use crate::domain::User;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

const RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    Cooldown,
    DailyLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    Permitted,
    Denied {
        kind: DenialKind,
        retry_after: Duration,
    },
}

impl CooldownDecision {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Permitted)
    }

    /// Whole seconds, rounded up so "0s" is never shown while still denied.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Permitted => 0,
            Self::Denied { retry_after, .. } => {
                retry_after
                    .as_secs()
                    .saturating_add(u64::from(retry_after.subsec_nanos() > 0))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct CooldownState {
    last_roast_at: DateTime<Utc>,
    day: NaiveDate,
    day_count: u32,
}

#[derive(Clone)]
pub struct CooldownTracker {
    states: Arc<DashMap<i64, CooldownState>>,
    config: CooldownConfig,
}

impl CooldownTracker {
    pub fn new(config: CooldownConfig) -> Self {
        Self {
            states: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Checks the user's window and, when it has elapsed, records `now` in
    /// the same critical section. Denied requests leave the state untouched.
    pub fn check_and_record(&self, user: &User, now: DateTime<Utc>) -> CooldownDecision {
        if self.config.admin_bypass && user.role.is_privileged() {
            return CooldownDecision::Permitted;
        }

        let today = self.local_day(now);
        match self.states.entry(user.id) {
            Entry::Vacant(slot) => {
                slot.insert(CooldownState {
                    last_roast_at: now,
                    day: today,
                    day_count: 1,
                });
                CooldownDecision::Permitted
            }
            Entry::Occupied(mut slot) => {
                let state = slot.get_mut();
                let elapsed = now - state.last_roast_at;
                let window = chrono::Duration::from_std(self.config.window)
                    .unwrap_or(chrono::Duration::MAX);

                // A clock that went backwards yields a negative elapsed time,
                // which is denied like any other early request.
                if elapsed < window {
                    let retry_after = window
                        .checked_sub(&elapsed)
                        .and_then(|left| left.to_std().ok())
                        .unwrap_or(self.config.window);
                    return CooldownDecision::Denied {
                        kind: DenialKind::Cooldown,
                        retry_after,
                    };
                }

                let count = if state.day == today { state.day_count } else { 0 };
                if self.config.daily_limit > 0 && count >= self.config.daily_limit {
                    return CooldownDecision::Denied {
                        kind: DenialKind::DailyLimit,
                        retry_after: self.until_next_day(now),
                    };
                }

                state.last_roast_at = now;
                state.day = today;
                state.day_count = count + 1;
                CooldownDecision::Permitted
            }
        }
    }

    /// Seeds a timestamp recovered from storage. Never moves a newer
    /// in-memory timestamp backwards.
    pub fn restore(&self, user_id: i64, last_roast_at: DateTime<Utc>) {
        let day = self.local_day(last_roast_at);
        self.states
            .entry(user_id)
            .and_modify(|state| {
                if last_roast_at > state.last_roast_at {
                    state.last_roast_at = last_roast_at;
                }
            })
            .or_insert(CooldownState {
                last_roast_at,
                day,
                day_count: 1,
            });
    }

    pub fn last_roast_at(&self, user_id: i64) -> Option<DateTime<Utc>> {
        self.states.get(&user_id).map(|state| state.last_roast_at)
    }

    pub fn tracked_users(&self) -> usize {
        self.states.len()
    }

    fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.config.utc_offset).date_naive()
    }

    fn until_next_day(&self, now: DateTime<Utc>) -> Duration {
        let offset = self.config.utc_offset;
        self.local_day(now)
            .succ_opt()
            .and_then(|tomorrow| {
                offset
                    .from_local_datetime(&tomorrow.and_time(NaiveTime::MIN))
                    .single()
            })
            .and_then(|midnight| (midnight.with_timezone(&Utc) - now).to_std().ok())
            .unwrap_or(Duration::from_secs(RETENTION_HOURS as u64 * 3600))
    }

    /// Forgets users whose last roast is older than a day (or the window,
    /// when that is longer). Returns how many entries were dropped.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let keep_for = chrono::Duration::from_std(self.config.window)
            .unwrap_or(chrono::Duration::MAX)
            .max(chrono::Duration::hours(RETENTION_HOURS));
        let before = self.states.len();
        self.states.retain(|_, state| now - state.last_roast_at <= keep_for);
        before.saturating_sub(self.states.len())
    }
}
