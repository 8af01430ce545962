use crate::infrastructure::security::ReactionLimiter;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

/// Reaction emoji per topic. Only emoji Telegram accepts as bot reactions.
const TOPICS: &[(&[&str], &[&str])] = &[
    // funny
    (
        &["মজা", "হাসি", "কমেডি", "জোক", "ঠাট্টা", "lol", "haha", "joke"],
        &["🤣", "👏", "😁"],
    ),
    // sad
    (
        &["দুঃখ", "একাকী", "কষ্ট", "অভিমান", "কান্না", "বিরহ", "sad", "cry"],
        &["😢", "🤗", "💔"],
    ),
    // love
    (
        &["ভালোবাসা", "প্রেম", "হৃদয়", "love", "crush"],
        &["❤", "😍", "🥰"],
    ),
    // motivation
    (
        &["সফলতা", "উদ্যোগ", "চেষ্টা", "লক্ষ্য", "স্বপ্ন", "dream", "goal"],
        &["🔥", "🏆", "💯"],
    ),
    // attitude
    (
        &["বস", "হিরো", "সেরা", "কিং", "রাজা", "boss", "king"],
        &["😎", "🗿", "😈"],
    ),
];

const NEUTRAL: &[&str] = &["👍", "👀", "👌"];

/// Decides whether an ordinary chat message gets an automatic reaction.
pub struct AutoReactor {
    limiter: ReactionLimiter,
    min_length: usize,
}

impl AutoReactor {
    pub fn new(limiter: ReactionLimiter, min_length: usize) -> Self {
        Self { limiter, min_length }
    }

    pub fn limiter(&self) -> &ReactionLimiter {
        &self.limiter
    }

    /// An emoji to react with, or `None` when the text is too short or the
    /// user has used up their reaction budget.
    pub fn reaction_for(&self, user_id: i64, text: &str, now: DateTime<Utc>) -> Option<&'static str> {
        if text.trim().chars().count() < self.min_length {
            return None;
        }
        if !self.limiter.try_acquire(user_id, now) {
            return None;
        }
        topic_emojis(text).choose(&mut rand::thread_rng()).copied()
    }
}

fn topic_emojis(text: &str) -> &'static [&'static str] {
    let lower = text.to_lowercase();
    TOPICS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, emojis)| *emojis)
        .unwrap_or(NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReactionConfig;
    use chrono::TimeZone;

    fn reactor() -> AutoReactor {
        AutoReactor::new(ReactionLimiter::new(ReactionConfig::default()), 4)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap() + chrono::Duration::seconds(secs)
    }

    #[test]
    fn test_topic_picks_emoji_set() {
        assert_eq!(topic_emojis("haha that joke"), &["🤣", "👏", "😁"]);
        assert_eq!(topic_emojis("আজ খুব কষ্ট"), &["😢", "🤗", "💔"]);
        assert_eq!(topic_emojis("the weather today"), NEUTRAL);
    }

    #[test]
    fn test_reacts_within_budget() {
        let reactor = reactor();
        let emoji = reactor.reaction_for(1, "I am the boss here", at(0)).unwrap();
        assert!(["😎", "🗿", "😈"].contains(&emoji));
        assert!(reactor.reaction_for(1, "still the boss", at(5)).is_none());
        assert!(reactor.reaction_for(1, "still the boss", at(15)).is_some());
    }

    #[test]
    fn test_short_text_is_ignored_without_spending_budget() {
        let reactor = reactor();
        assert!(reactor.reaction_for(1, "ok", at(0)).is_none());
        assert!(reactor.reaction_for(1, "okay then", at(1)).is_some());
    }
}
