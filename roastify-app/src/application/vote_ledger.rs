use crate::config::VotePolicy;
use crate::domain::{Vote, VoteCategory, VoteChange, VoteCounts, VoteReceipt};
use crate::infrastructure::store::RoastStore;
use chrono::{DateTime, Utc};
use roastify_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub struct VoteLedger {
    store: Arc<dyn RoastStore>,
    policy: VotePolicy,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn RoastStore>, policy: VotePolicy) -> Self {
        Self { store, policy }
    }

    /// Records the voter's current opinion of a roast. Re-voting replaces
    /// the category unless vote changes are disabled.
    pub async fn cast_vote(
        &self,
        roast_id: Uuid,
        voter_id: i64,
        category: VoteCategory,
        now: DateTime<Utc>,
    ) -> Result<VoteReceipt, AppError> {
        let roast = self
            .store
            .find_roast(roast_id)
            .await?
            .ok_or(AppError::UnknownRoast)?;

        if let Some(window) = self.policy.window {
            if now - roast.created_at > window {
                return Err(AppError::UnknownRoast);
            }
        }

        if !self.policy.allow_self_vote && roast.author_id == voter_id {
            return Err(AppError::SelfVoteRejected);
        }

        let upsert = self
            .store
            .upsert_vote(&Vote::new(roast_id, voter_id, category), self.policy.allow_vote_change)
            .await?;
        if upsert.stored != category {
            return Err(AppError::AlreadyVoted);
        }

        let change = match upsert.previous {
            None => VoteChange::Created,
            Some(from) if from == category => VoteChange::Unchanged,
            Some(from) => VoteChange::Changed { from },
        };

        tracing::debug!("Vote {:?} on {} by {}: {:?}", category, roast_id, voter_id, change);

        Ok(VoteReceipt {
            roast_id,
            category: upsert.stored,
            change,
            counts: self.get_counts(roast_id).await?,
        })
    }

    pub async fn get_counts(&self, roast_id: Uuid) -> Result<VoteCounts, AppError> {
        let votes = self.store.votes_for_roast(roast_id).await?;
        Ok(VoteCounts::tally(votes.iter().map(|v| &v.category)))
    }
}
