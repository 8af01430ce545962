use super::entities::{roast_event, RoastEvent};
use chrono::{DateTime, Utc};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct RoastEventRepository {
    db: DatabaseConnection,
}

impl RoastEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, event: &crate::domain::RoastEvent) -> Result<roast_event::Model, DbErr> {
        let active = roast_event::ActiveModel {
            id: Set(event.id),
            author_id: Set(event.author_id),
            target_id: Set(event.target_id),
            chat_id: Set(event.chat_id),
            template_id: Set(event.template_id.clone()),
            input_text: Set(event.input_text.clone()),
            created_at: Set(event.created_at),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<roast_event::Model>, DbErr> {
        RoastEvent::find_by_id(id).one(&self.db).await
    }

    pub async fn created_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<roast_event::Model>, DbErr> {
        let mut query = RoastEvent::find();
        if let Some(since) = since {
            query = query.filter(roast_event::Column::CreatedAt.gte(since));
        }
        query
            .order_by_desc(roast_event::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
