use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roast_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub voter_id: i64,
    pub category: String,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VoterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Voter,
    #[sea_orm(
        belongs_to = "super::roast_event::Entity",
        from = "Column::RoastId",
        to = "super::roast_event::Column::Id",
        on_delete = "Cascade"
    )]
    RoastEvent,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voter.def()
    }
}

impl Related<super::roast_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoastEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for crate::domain::Vote {
    type Error = crate::domain::ParseCategoryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            roast_id: model.roast_id,
            voter_id: model.voter_id,
            category: model.category.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
