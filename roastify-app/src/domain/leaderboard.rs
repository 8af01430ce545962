use super::VoteCounts;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A "most roasted" row. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub total_votes: u32,
    pub breakdown: VoteCounts,
    pub roast_count: u32,
    pub last_roasted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardWindow {
    #[default]
    All,
    Week,
    Day,
}

impl LeaderboardWindow {
    pub fn duration(&self) -> Option<chrono::Duration> {
        match self {
            Self::All => None,
            Self::Week => Some(chrono::Duration::days(7)),
            Self::Day => Some(chrono::Duration::days(1)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Week => "This week",
            Self::Day => "Today",
        }
    }
}

impl FromStr for LeaderboardWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" | "alltime" => Ok(Self::All),
            "week" | "weekly" => Ok(Self::Week),
            "day" | "today" | "daily" => Ok(Self::Day),
            other => Err(format!("unknown leaderboard window: {other}")),
        }
    }
}
