use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteCategory {
    Funny,
    Mid,
    Savage,
}

impl VoteCategory {
    pub const ALL: [VoteCategory; 3] = [Self::Funny, Self::Mid, Self::Savage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Funny => "funny",
            Self::Mid => "mid",
            Self::Savage => "savage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Funny => "🔥 Funny",
            Self::Mid => "😐 Mid",
            Self::Savage => "💀 Savage",
        }
    }
}

impl fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vote category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for VoteCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "funny" => Ok(Self::Funny),
            "mid" => Ok(Self::Mid),
            "savage" => Ok(Self::Savage),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub roast_id: uuid::Uuid,
    pub voter_id: i64,
    pub category: VoteCategory,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Vote {
    pub fn new(roast_id: uuid::Uuid, voter_id: i64, category: VoteCategory) -> Self {
        Self {
            roast_id,
            voter_id,
            category,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub funny: u32,
    pub mid: u32,
    pub savage: u32,
}

impl VoteCounts {
    pub fn tally<'a>(categories: impl IntoIterator<Item = &'a VoteCategory>) -> Self {
        let mut counts = Self::default();
        for category in categories {
            counts.add(*category);
        }
        counts
    }

    pub fn add(&mut self, category: VoteCategory) {
        *self.slot(category) += 1;
    }

    pub fn merge(&mut self, other: &VoteCounts) {
        self.funny += other.funny;
        self.mid += other.mid;
        self.savage += other.savage;
    }

    pub fn get(&self, category: VoteCategory) -> u32 {
        match category {
            VoteCategory::Funny => self.funny,
            VoteCategory::Mid => self.mid,
            VoteCategory::Savage => self.savage,
        }
    }

    pub fn total(&self) -> u32 {
        self.funny + self.mid + self.savage
    }

    fn slot(&mut self, category: VoteCategory) -> &mut u32 {
        match category {
            VoteCategory::Funny => &mut self.funny,
            VoteCategory::Mid => &mut self.mid,
            VoteCategory::Savage => &mut self.savage,
        }
    }
}

/// State of a (roast, voter) slot after an upsert, read inside the same
/// atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteUpsert {
    /// Category held before the call, `None` if this call created the vote.
    pub previous: Option<VoteCategory>,
    /// Category held after the call.
    pub stored: VoteCategory,
}

/// What a store upsert did to the (roast, voter) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChange {
    Created,
    Changed { from: VoteCategory },
    Unchanged,
}

/// Result of an accepted vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub roast_id: uuid::Uuid,
    pub category: VoteCategory,
    pub change: VoteChange,
    pub counts: VoteCounts,
}
