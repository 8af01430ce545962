use super::RoastStore;
use crate::domain::{RoastEvent, User, Vote, VoteUpsert};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use roastify_errors::AppError;
use uuid::Uuid;

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<i64, User>,
    roasts: DashMap<Uuid, RoastEvent>,
    votes: DashMap<(Uuid, i64), Vote>,
    cooldowns: DashMap<i64, DateTime<Utc>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoastStore for MemoryStore {
    async fn upsert_user(&self, user: &User) -> Result<User, AppError> {
        let now = Utc::now();
        let stored = match self.users.entry(user.id) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.display_name = user.display_name.clone();
                existing.username = user.username.clone();
                existing.role = user.role;
                existing.protection_opt_out = user.protection_opt_out;
                existing.updated_at = Some(now);
                existing.clone()
            }
            Entry::Vacant(entry) => {
                let mut fresh = user.clone();
                fresh.created_at = Some(now);
                fresh.updated_at = Some(now);
                entry.insert(fresh).value().clone()
            }
        };
        Ok(stored)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .iter()
            .filter(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .max_by_key(|u| u.updated_at)
            .map(|u| u.value().clone()))
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn insert_roast(&self, event: &RoastEvent) -> Result<(), AppError> {
        match self.roasts.entry(event.id) {
            Entry::Occupied(_) => Err(AppError::database(format!("duplicate roast event {}", event.id))),
            Entry::Vacant(entry) => {
                entry.insert(event.clone());
                Ok(())
            }
        }
    }

    async fn find_roast(&self, id: Uuid) -> Result<Option<RoastEvent>, AppError> {
        Ok(self.roasts.get(&id).map(|r| r.value().clone()))
    }

    async fn roasts_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<RoastEvent>, AppError> {
        let mut events: Vec<RoastEvent> = self
            .roasts
            .iter()
            .filter(|r| since.map_or(true, |since| r.created_at >= since))
            .map(|r| r.value().clone())
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn upsert_vote(&self, vote: &Vote, allow_change: bool) -> Result<VoteUpsert, AppError> {
        let now = Utc::now();
        match self.votes.entry((vote.roast_id, vote.voter_id)) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                let previous = existing.category;
                if allow_change && previous != vote.category {
                    existing.category = vote.category;
                    existing.updated_at = Some(now);
                }
                Ok(VoteUpsert {
                    previous: Some(previous),
                    stored: existing.category,
                })
            }
            Entry::Vacant(entry) => {
                let mut fresh = vote.clone();
                fresh.created_at = Some(now);
                fresh.updated_at = Some(now);
                entry.insert(fresh);
                Ok(VoteUpsert {
                    previous: None,
                    stored: vote.category,
                })
            }
        }
    }

    async fn votes_for_roast(&self, roast_id: Uuid) -> Result<Vec<Vote>, AppError> {
        Ok(self
            .votes
            .iter()
            .filter(|v| v.roast_id == roast_id)
            .map(|v| v.value().clone())
            .collect())
    }

    async fn votes_for_roasts(&self, roast_ids: &[Uuid]) -> Result<Vec<Vote>, AppError> {
        Ok(self
            .votes
            .iter()
            .filter(|v| roast_ids.contains(&v.roast_id))
            .map(|v| v.value().clone())
            .collect())
    }

    async fn save_cooldown(&self, user_id: i64, last_roast_at: DateTime<Utc>) -> Result<(), AppError> {
        self.cooldowns
            .entry(user_id)
            .and_modify(|stored| {
                if *stored < last_roast_at {
                    *stored = last_roast_at;
                }
            })
            .or_insert(last_roast_at);
        Ok(())
    }

    async fn load_cooldowns(&self, since: DateTime<Utc>) -> Result<Vec<(i64, DateTime<Utc>)>, AppError> {
        Ok(self
            .cooldowns
            .iter()
            .filter(|c| *c.value() >= since)
            .map(|c| (*c.key(), *c.value()))
            .collect())
    }
}
