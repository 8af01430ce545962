use super::RoastStore;
use crate::domain::{RoastEvent, User, Vote, VoteUpsert};
use crate::infrastructure::db::{CooldownRepository, RoastEventRepository, UserRepository, VoteRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roastify_errors::AppError;
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    users: UserRepository,
    roasts: RoastEventRepository,
    votes: VoteRepository,
    cooldowns: CooldownRepository,
}

impl PgStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            roasts: RoastEventRepository::new(db.clone()),
            votes: VoteRepository::new(db.clone()),
            cooldowns: CooldownRepository::new(db),
        }
    }
}

fn db_error(e: DbErr) -> AppError {
    tracing::error!("Database error: {}", e);
    AppError::database(e)
}

fn into_votes(models: Vec<crate::infrastructure::db::entities::vote::Model>) -> Vec<Vote> {
    models
        .into_iter()
        .filter_map(|model| match Vote::try_from(model) {
            Ok(vote) => Some(vote),
            Err(e) => {
                tracing::warn!("Skipping stored vote: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl RoastStore for PgStore {
    async fn upsert_user(&self, user: &User) -> Result<User, AppError> {
        self.users.upsert(user).await.map(User::from).map_err(db_error)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.find_by_id(id).await.map_err(db_error)?.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .find_by_username(username)
            .await
            .map_err(db_error)?
            .map(User::from))
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError> {
        let models = self.users.find_by_ids(ids).await.map_err(db_error)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn insert_roast(&self, event: &RoastEvent) -> Result<(), AppError> {
        self.roasts.create(event).await.map_err(db_error)?;
        Ok(())
    }

    async fn find_roast(&self, id: Uuid) -> Result<Option<RoastEvent>, AppError> {
        Ok(self
            .roasts
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .map(RoastEvent::from))
    }

    async fn roasts_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<RoastEvent>, AppError> {
        let models = self.roasts.created_since(since).await.map_err(db_error)?;
        Ok(models.into_iter().map(RoastEvent::from).collect())
    }

    async fn upsert_vote(&self, vote: &Vote, allow_change: bool) -> Result<VoteUpsert, AppError> {
        self.votes.upsert(vote, allow_change).await.map_err(db_error)
    }

    async fn votes_for_roast(&self, roast_id: Uuid) -> Result<Vec<Vote>, AppError> {
        let models = self.votes.for_roast(roast_id).await.map_err(db_error)?;
        Ok(into_votes(models))
    }

    async fn votes_for_roasts(&self, roast_ids: &[Uuid]) -> Result<Vec<Vote>, AppError> {
        let models = self.votes.for_roasts(roast_ids).await.map_err(db_error)?;
        Ok(into_votes(models))
    }

    async fn save_cooldown(&self, user_id: i64, last_roast_at: DateTime<Utc>) -> Result<(), AppError> {
        self.cooldowns.save(user_id, last_roast_at).await.map_err(db_error)
    }

    async fn load_cooldowns(&self, since: DateTime<Utc>) -> Result<Vec<(i64, DateTime<Utc>)>, AppError> {
        let models = self.cooldowns.load_since(since).await.map_err(db_error)?;
        Ok(models.into_iter().map(|m| (m.user_id, m.last_roast_at)).collect())
    }
}
