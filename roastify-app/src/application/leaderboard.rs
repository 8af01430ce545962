use crate::domain::{LeaderboardEntry, LeaderboardWindow, RoastEvent, Vote, VoteCounts};
use crate::infrastructure::store::RoastStore;
use chrono::{DateTime, Utc};
use roastify_errors::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Derives the "most roasted" ranking from stored events and votes on
/// every call. Nothing is cached or counted incrementally.
pub struct LeaderboardAggregator {
    store: Arc<dyn RoastStore>,
}

impl LeaderboardAggregator {
    pub fn new(store: Arc<dyn RoastStore>) -> Self {
        Self { store }
    }

    pub async fn top_roasted(
        &self,
        limit: usize,
        window: LeaderboardWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let since = window.duration().map(|d| now - d);
        let events = self.store.roasts_since(since).await?;
        let roast_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let votes = self.store.votes_for_roasts(&roast_ids).await?;

        let mut entries = rank_roasted(&events, &votes);
        entries.truncate(limit);

        let user_ids: Vec<i64> = entries.iter().map(|e| e.user_id).collect();
        let names: HashMap<i64, String> = self
            .store
            .users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name))
            .collect();
        for entry in &mut entries {
            entry.display_name = names.get(&entry.user_id).cloned();
        }

        Ok(entries)
    }
}

/// Groups events by roasted user and orders by total votes, then most
/// recent roast, then user id.
pub fn rank_roasted(events: &[RoastEvent], votes: &[Vote]) -> Vec<LeaderboardEntry> {
    let mut per_roast: HashMap<Uuid, VoteCounts> = HashMap::new();
    for vote in votes {
        per_roast.entry(vote.roast_id).or_default().add(vote.category);
    }

    let mut per_user: HashMap<i64, LeaderboardEntry> = HashMap::new();
    for event in events {
        let entry = per_user
            .entry(event.roasted_user())
            .or_insert_with(|| LeaderboardEntry {
                user_id: event.roasted_user(),
                display_name: None,
                total_votes: 0,
                breakdown: VoteCounts::default(),
                roast_count: 0,
                last_roasted_at: event.created_at,
            });
        if let Some(counts) = per_roast.get(&event.id) {
            entry.breakdown.merge(counts);
        }
        entry.total_votes = entry.breakdown.total();
        entry.roast_count += 1;
        entry.last_roasted_at = entry.last_roasted_at.max(event.created_at);
    }

    let mut entries: Vec<LeaderboardEntry> = per_user.into_values().collect();
    entries.sort_by(|a, b| {
        b.total_votes
            .cmp(&a.total_votes)
            .then_with(|| b.last_roasted_at.cmp(&a.last_roasted_at))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, VoteCategory};
    use crate::infrastructure::store::MemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn votes_on(event: &RoastEvent, categories: &[(VoteCategory, usize)]) -> Vec<Vote> {
        let mut voter = 100;
        let mut votes = Vec::new();
        for (category, n) in categories {
            for _ in 0..*n {
                voter += 1;
                votes.push(Vote::new(event.id, voter, *category));
            }
        }
        votes
    }

    #[test]
    fn test_totals_sum_across_roasts() {
        let first = RoastEvent::new(1, Some(5), "neon_1".into(), "first roast", at(9));
        let second = RoastEvent::new(2, Some(5), "dark_1".into(), "second roast", at(10));
        let mut votes = votes_on(&first, &[(VoteCategory::Funny, 3), (VoteCategory::Savage, 2)]);
        votes.extend(votes_on(&second, &[(VoteCategory::Savage, 5), (VoteCategory::Mid, 2)]));

        let entries = rank_roasted(&[first, second], &votes);
        assert_eq!(entries.len(), 1);
        let top = &entries[0];
        assert_eq!(top.user_id, 5);
        assert_eq!(top.total_votes, 12);
        assert_eq!(
            top.breakdown,
            VoteCounts {
                funny: 3,
                mid: 2,
                savage: 7
            }
        );
        assert_eq!(top.roast_count, 2);
        assert_eq!(top.last_roasted_at, at(10));
    }

    #[test]
    fn test_ties_prefer_most_recent_then_user_id() {
        let older = RoastEvent::new(1, Some(5), "neon_1".into(), "older roast", at(9));
        let newer = RoastEvent::new(1, Some(6), "neon_1".into(), "newer roast", at(11));
        let same_time = RoastEvent::new(1, Some(4), "neon_1".into(), "also newer", at(11));
        let mut votes = votes_on(&older, &[(VoteCategory::Funny, 2)]);
        votes.extend(votes_on(&newer, &[(VoteCategory::Mid, 2)]));
        votes.extend(votes_on(&same_time, &[(VoteCategory::Savage, 2)]));

        let order: Vec<i64> = rank_roasted(&[older, newer, same_time], &votes)
            .iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(order, vec![4, 6, 5]);
    }

    #[test]
    fn test_untargeted_roast_counts_for_author() {
        let roast_me = RoastEvent::new(3, None, "neon_1".into(), "roast me", at(9));
        let votes = votes_on(&roast_me, &[(VoteCategory::Funny, 1)]);
        let entries = rank_roasted(&[roast_me], &votes);
        assert_eq!(entries[0].user_id, 3);
        assert_eq!(entries[0].total_votes, 1);
    }

    #[tokio::test]
    async fn test_top_roasted_is_idempotent_and_windowed() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_user(&User::new(5, "Bob".into(), None)).await.unwrap();

        let recent = RoastEvent::new(1, Some(5), "neon_1".into(), "recent roast", at(11));
        let old = RoastEvent::new(1, Some(6), "neon_1".into(), "old roast", at(11) - chrono::Duration::days(3));
        store.insert_roast(&recent).await.unwrap();
        store.insert_roast(&old).await.unwrap();
        for vote in votes_on(&old, &[(VoteCategory::Savage, 4)]) {
            store.upsert_vote(&vote, true).await.unwrap();
        }
        store
            .upsert_vote(&Vote::new(recent.id, 9, VoteCategory::Funny), true)
            .await
            .unwrap();

        let aggregator = LeaderboardAggregator::new(store);
        let now = at(12);

        let all = aggregator.top_roasted(10, LeaderboardWindow::All, now).await.unwrap();
        assert_eq!(all.iter().map(|e| e.user_id).collect::<Vec<_>>(), vec![6, 5]);
        assert_eq!(all, aggregator.top_roasted(10, LeaderboardWindow::All, now).await.unwrap());
        assert_eq!(all[1].display_name.as_deref(), Some("Bob"));
        assert_eq!(all[0].display_name, None);

        let today = aggregator.top_roasted(10, LeaderboardWindow::Day, now).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].user_id, 5);

        let top_one = aggregator.top_roasted(1, LeaderboardWindow::All, now).await.unwrap();
        assert_eq!(top_one.len(), 1);
    }

    #[tokio::test]
    async fn test_target_totals_span_several_authors() {
        let store = Arc::new(MemoryStore::new());
        store.upsert_user(&User::new(50, "X".into(), None)).await.unwrap();

        let mut voter = 1000;
        for (author, n) in [(1, 5), (2, 2), (3, 5)] {
            let event = RoastEvent::new(author, Some(50), "neon_1".into(), "roast for x", at(9 + author as u32));
            store.insert_roast(&event).await.unwrap();
            for _ in 0..n {
                voter += 1;
                store
                    .upsert_vote(&Vote::new(event.id, voter, VoteCategory::Funny), true)
                    .await
                    .unwrap();
            }
        }
        let lone = RoastEvent::new(4, Some(60), "neon_1".into(), "roast for y", at(9));
        store.insert_roast(&lone).await.unwrap();
        for vote in votes_on(&lone, &[(VoteCategory::Savage, 11)]) {
            store.upsert_vote(&vote, true).await.unwrap();
        }

        let top = LeaderboardAggregator::new(store)
            .top_roasted(1, LeaderboardWindow::All, at(20))
            .await
            .unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_id, 50);
        assert_eq!(top[0].total_votes, 12);
        assert_eq!(top[0].roast_count, 3);
    }
}
