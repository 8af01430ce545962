use super::entities::{vote, Vote};
use crate::domain::{VoteCategory, VoteUpsert};
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn for_roast(&self, roast_id: Uuid) -> Result<Vec<vote::Model>, DbErr> {
        Vote::find()
            .filter(vote::Column::RoastId.eq(roast_id))
            .all(&self.db)
            .await
    }

    pub async fn for_roasts(&self, roast_ids: &[Uuid]) -> Result<Vec<vote::Model>, DbErr> {
        if roast_ids.is_empty() {
            return Ok(Vec::new());
        }
        Vote::find()
            .filter(vote::Column::RoastId.is_in(roast_ids.iter().copied()))
            .all(&self.db)
            .await
    }

    /// Inserts the vote or, when `allow_change` is on, moves an existing one
    /// to the new category. The result is read from the stored row under a
    /// row lock, so concurrent callers agree on what was kept.
    pub async fn upsert(&self, vote_data: &crate::domain::Vote, allow_change: bool) -> Result<VoteUpsert, DbErr> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        let active = vote::ActiveModel {
            roast_id: Set(vote_data.roast_id),
            voter_id: Set(vote_data.voter_id),
            category: Set(vote_data.category.as_str().to_string()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };
        let mut conflict = OnConflict::columns([vote::Column::RoastId, vote::Column::VoterId]);
        conflict.do_nothing();

        let inserted = Vote::insert(active)
            .on_conflict(conflict)
            .exec_without_returning(&txn)
            .await?;
        if inserted == 1 {
            txn.commit().await?;
            return Ok(VoteUpsert {
                previous: None,
                stored: vote_data.category,
            });
        }

        let existing = Vote::find_by_id((vote_data.roast_id, vote_data.voter_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("vote on {}", vote_data.roast_id)))?;
        let previous = existing
            .category
            .parse::<VoteCategory>()
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        let stored = if allow_change && previous != vote_data.category {
            let mut changed: vote::ActiveModel = existing.into();
            changed.category = Set(vote_data.category.as_str().to_string());
            changed.updated_at = Set(Some(now));
            changed.update(&txn).await?;
            vote_data.category
        } else {
            previous
        };

        txn.commit().await?;
        Ok(VoteUpsert {
            previous: Some(previous),
            stored,
        })
    }
}
