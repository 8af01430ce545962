use crate::domain::{RoastCategory, RoastLines};
use rand::seq::SliceRandom;
use rand::Rng;

const MAX_INTENSITY: usize = 10;

fn table(category: RoastCategory) -> (&'static [&'static str], &'static [&'static str]) {
    match category {
        RoastCategory::SentenceLogic => (
            &[
                "এই লজিক তো আগে কখনো শুনি নাই!",
                "বুঝলাম... মানে কিছুই বুঝলাম না!",
                "এই কথার কোনো মানে হয় নাকি?",
            ],
            &[
                "আবার চেষ্টা করো হয়তো একদিন পারবে!",
                "লজিকের থেকে ফ্যান্টাসি বেশি মনে হয়!",
                "একটু সোজা করে বলো বুঝি না!",
            ],
        ),
        RoastCategory::Overconfidence => (
            &["আহা কত বড় হইয়া গেছস!", "এই আত্মবিশ্বাসের ঠিকানা কি?"],
            &[
                "থামো, পৃথিবীটা ঘুরছে না তোমার চারপাশে!",
                "একটু নিচে নেমে আসো, উপরে ঠান্ডা লাগবে!",
            ],
        ),
        RoastCategory::CommonLies => (
            &["এই গল্পটা আগেও শুনেছি!", "সত্যি বলতে এতটাও বিশ্বাসযোগ্য না!"],
            &["চলো আরেকটা গল্প বলো!", "এই এপিসোড আগেই দেখেছি!"],
        ),
        RoastCategory::DailyHabits => (
            &["এটা তো তোমার ডেইলি রুটিন!", "নতুন কিছু করলে হতো!"],
            &["বদলাও, জীবন বদলে যাবে!", "একঘেয়েমি দূর করো!"],
        ),
        RoastCategory::SelfClaims => (
            &["হুম, ঠিক বলেছ! (না)", "নিজেকে কত বড় ভাবস!"],
            &["বাস্তবতার মুখোমুখি হও!", "আয়নায় একবার দেখো!"],
        ),
        RoastCategory::Targeted => (
            &[
                "{target} এর অবস্থা কী?",
                "{target} কে ডাকাডাকি কেন?",
                "এই যে {target} এসেছে!",
            ],
            &["কিছু বলার আছে নাকি?", "নিজের কাজ দেখো!", "কী বলবে বলো!"],
        ),
    }
}

/// Checked in order, first hit wins.
const CATEGORY_KEYWORDS: &[(RoastCategory, &[&str])] = &[
    (
        RoastCategory::Overconfidence,
        &["হবে", "করব", "পারব", "জানি", "বুঝি", "i will", "i can", "i know"],
    ),
    (
        RoastCategory::CommonLies,
        &["মিথ্যা", "মিথ্যে", "লাই", "ভুল", "lying", "liar", "trust me"],
    ),
    (
        RoastCategory::DailyHabits,
        &["রোজ", "প্রতিদিন", "সকাল", "রাত", "every day", "everyday", "every night"],
    ),
    (
        RoastCategory::SelfClaims,
        &["আমি", "আমার", "আমাকে", "i am", "i'm", "myself"],
    ),
];

/// Picks the roast lines for a request from fixed per-category tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoastWriter;

impl RoastWriter {
    pub fn detect_category(text: &str) -> RoastCategory {
        let lower = text.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(RoastCategory::SentenceLogic)
    }

    /// Targeted roasts name their target instead of answering the text.
    pub fn write(&self, text: &str, target_name: Option<&str>) -> RoastLines {
        self.write_with(&mut rand::thread_rng(), text, target_name)
    }

    fn write_with<R: Rng>(&self, rng: &mut R, text: &str, target_name: Option<&str>) -> RoastLines {
        let category = match target_name {
            Some(_) => RoastCategory::Targeted,
            None => Self::detect_category(text),
        };
        let (primaries, secondaries) = table(category);
        let primary = primaries.choose(rng).copied().unwrap_or_default();
        let secondary = secondaries.choose(rng).copied().unwrap_or_default();

        let primary = match target_name {
            Some(name) => primary.replace("{target}", name),
            None => primary.to_string(),
        };

        RoastLines {
            category,
            primary: format!("{primary} {}", mood_emoji(text)),
            secondary: secondary.to_string(),
        }
    }
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1F5FF | 0x1F600..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F1E0..=0x1F1FF
    )
}

/// Louder input earns a harsher emoji.
fn mood_emoji(text: &str) -> &'static str {
    let emojis = text.chars().filter(|c| is_emoji(*c)).count();
    let exclamations = text.matches('!').count();
    let intensity = (exclamations * 2 + emojis).min(MAX_INTENSITY);

    if intensity > 7 {
        "💀"
    } else if intensity > 4 {
        "🔥"
    } else if emojis > 0 {
        "😏"
    } else {
        "😂"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_category_in_keyword_order() {
        assert_eq!(RoastWriter::detect_category("আমি কালকে সব করব"), RoastCategory::Overconfidence);
        assert_eq!(RoastWriter::detect_category("ও মিথ্যা বলে"), RoastCategory::CommonLies);
        assert_eq!(RoastWriter::detect_category("আমি প্রতিদিন দেরিতে উঠি"), RoastCategory::DailyHabits);
        assert_eq!(RoastWriter::detect_category("আমি সবচেয়ে বুদ্ধিমান"), RoastCategory::SelfClaims);
        assert_eq!(RoastWriter::detect_category("I am the king here"), RoastCategory::SelfClaims);
        assert_eq!(RoastWriter::detect_category("roast my haircut"), RoastCategory::SentenceLogic);
    }

    #[test]
    fn test_lines_come_from_the_category_table() {
        let lines = RoastWriter.write("I know everything", None);
        assert_eq!(lines.category, RoastCategory::Overconfidence);

        let (primaries, secondaries) = table(RoastCategory::Overconfidence);
        assert!(primaries.iter().any(|p| lines.primary == format!("{p} 😂")));
        assert!(secondaries.contains(&lines.secondary.as_str()));
    }

    #[test]
    fn test_targeted_lines_name_the_target() {
        let lines = RoastWriter.write("roast my haircut", Some("Bob"));
        assert_eq!(lines.category, RoastCategory::Targeted);
        assert!(lines.primary.contains("Bob"));
        assert!(!lines.primary.contains("{target}"));
    }

    #[test]
    fn test_mood_emoji_follows_intensity() {
        assert_eq!(mood_emoji("calm words"), "😂");
        assert_eq!(mood_emoji("nice 😎"), "😏");
        assert_eq!(mood_emoji("wow!!!"), "🔥");
        assert_eq!(mood_emoji("what!!!! really"), "💀");
    }
}
