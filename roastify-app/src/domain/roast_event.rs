use serde::{Deserialize, Serialize};

const MAX_STORED_TEXT: usize = 500;

/// One successfully rendered roast. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastEvent {
    pub id: uuid::Uuid,
    pub author_id: i64,
    pub target_id: Option<i64>,
    pub chat_id: Option<i64>,
    pub template_id: String,
    pub input_text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RoastEvent {
    pub fn new(
        author_id: i64,
        target_id: Option<i64>,
        template_id: String,
        input_text: &str,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            author_id,
            target_id,
            chat_id: None,
            template_id,
            input_text: input_text.chars().take(MAX_STORED_TEXT).collect(),
            created_at,
        }
    }

    pub fn with_chat_id(mut self, chat_id: Option<i64>) -> Self {
        self.chat_id = chat_id;
        self
    }

    /// The user this roast counts against on the leaderboard. Untargeted
    /// roasts ("roast me") land on their author.
    pub fn roasted_user(&self) -> i64 {
        self.target_id.unwrap_or(self.author_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roasted_user_defaults_to_author() {
        let now = chrono::Utc::now();
        let self_roast = RoastEvent::new(7, None, "neon_1".into(), "roast me", now);
        assert_eq!(self_roast.roasted_user(), 7);

        let targeted = RoastEvent::new(7, Some(9), "neon_1".into(), "roast him", now);
        assert_eq!(targeted.roasted_user(), 9);
    }

    #[test]
    fn test_input_text_is_capped() {
        let long = "a".repeat(800);
        let event = RoastEvent::new(1, None, "dark_1".into(), &long, chrono::Utc::now());
        assert_eq!(event.input_text.chars().count(), MAX_STORED_TEXT);
    }
}
