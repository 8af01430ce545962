mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::domain::{RoastEvent, User, Vote, VoteUpsert};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roastify_errors::AppError;
use uuid::Uuid;

/// Persistence for users, roast events, votes and cooldown timestamps.
#[async_trait]
pub trait RoastStore: Send + Sync {
    async fn upsert_user(&self, user: &User) -> Result<User, AppError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Case-insensitive, without the leading `@`.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError>;

    async fn insert_roast(&self, event: &RoastEvent) -> Result<(), AppError>;

    async fn find_roast(&self, id: Uuid) -> Result<Option<RoastEvent>, AppError>;

    /// Roast events created at or after `since`, all of them when `None`.
    async fn roasts_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<RoastEvent>, AppError>;

    /// Atomic per (roast, voter). With `allow_change` off an existing vote
    /// is not touched, and the result reports the category that stays.
    async fn upsert_vote(&self, vote: &Vote, allow_change: bool) -> Result<VoteUpsert, AppError>;

    async fn votes_for_roast(&self, roast_id: Uuid) -> Result<Vec<Vote>, AppError>;

    async fn votes_for_roasts(&self, roast_ids: &[Uuid]) -> Result<Vec<Vote>, AppError>;

    async fn save_cooldown(&self, user_id: i64, last_roast_at: DateTime<Utc>) -> Result<(), AppError>;

    async fn load_cooldowns(&self, since: DateTime<Utc>) -> Result<Vec<(i64, DateTime<Utc>)>, AppError>;
}
