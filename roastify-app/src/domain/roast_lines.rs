use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoastCategory {
    SentenceLogic,
    Overconfidence,
    CommonLies,
    DailyHabits,
    SelfClaims,
    Targeted,
}

impl RoastCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SentenceLogic => "sentence_logic",
            Self::Overconfidence => "overconfidence",
            Self::CommonLies => "common_lies",
            Self::DailyHabits => "daily_habits",
            Self::SelfClaims => "self_claims",
            Self::Targeted => "targeted",
        }
    }
}

impl fmt::Display for RoastCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two lines drawn on a roast card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastLines {
    pub category: RoastCategory,
    pub primary: String,
    pub secondary: String,
}
