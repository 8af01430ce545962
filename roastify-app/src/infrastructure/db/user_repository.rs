use super::entities::{user, User};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<user::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        User::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// Case-insensitive; the most recently seen holder wins if a name moved.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Username))).eq(username.to_lowercase()))
            .order_by_desc(user::Column::UpdatedAt)
            .one(&self.db)
            .await
    }

    /// Inserts on first sight; later calls refresh the profile and role but
    /// keep `created_at`.
    pub async fn upsert(&self, user_data: &crate::domain::User) -> Result<user::Model, DbErr> {
        let now = chrono::Utc::now();
        let active = user::ActiveModel {
            id: Set(user_data.id),
            display_name: Set(user_data.display_name.clone()),
            username: Set(user_data.username.clone()),
            role: Set(user_data.role.as_str().to_string()),
            protection_opt_out: Set(user_data.protection_opt_out),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        User::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::DisplayName,
                        user::Column::Username,
                        user::Column::Role,
                        user::Column::ProtectionOptOut,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
    }
}
