use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub role: String,
    pub protection_opt_out: bool,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roast_event::Entity")]
    RoastEvents,
    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::roast_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoastEvents.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            display_name: model.display_name,
            username: model.username,
            role: model.role.parse().unwrap_or(crate::domain::UserRole::Regular),
            protection_opt_out: model.protection_opt_out,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
