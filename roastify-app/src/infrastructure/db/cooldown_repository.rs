use super::entities::{cooldown_state, CooldownState};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct CooldownRepository {
    db: DatabaseConnection,
}

impl CooldownRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stored timestamps only ever move forward.
    pub async fn save(&self, user_id: i64, last_roast_at: DateTime<Utc>) -> Result<(), DbErr> {
        let active = cooldown_state::ActiveModel {
            user_id: Set(user_id),
            last_roast_at: Set(last_roast_at),
        };

        CooldownState::insert(active)
            .on_conflict(
                OnConflict::column(cooldown_state::Column::UserId)
                    .update_column(cooldown_state::Column::LastRoastAt)
                    .action_and_where(
                        Expr::col((CooldownState, cooldown_state::Column::LastRoastAt)).lt(last_roast_at),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn load_since(&self, since: DateTime<Utc>) -> Result<Vec<cooldown_state::Model>, DbErr> {
        CooldownState::find()
            .filter(cooldown_state::Column::LastRoastAt.gte(since))
            .all(&self.db)
            .await
    }
}
