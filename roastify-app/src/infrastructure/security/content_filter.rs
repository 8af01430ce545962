use crate::config::FilterConfig;
use regex_lite::Regex;
use std::fmt;

const MAX_INPUT_LENGTH: usize = 500;
const SPAM_THRESHOLD: usize = 3;
const EMOJI_SPAM_THRESHOLD: usize = 10;

const BLOCKED_WORDS: &[&str] = &[
    "fuck",
    "shit",
    "asshole",
    "bastard",
    "retard",
    "kill",
    "die",
    "abuse",
    "গালি",
    "অশ্লীল",
    "হুমকি",
    "গালাগালি",
    "অসভ্য",
    "অপবাদ",
];

const PERSONAL_INFO_PATTERNS: &[(&str, &str)] = &[
    ("phone number", r"\+?(88)?01[3-9]\d{8}"),
    ("phone number", r"\d{4}[-. ]?\d{4}[-. ]?\d{4}"),
    ("email address", r"\S+@\S+\.\S+"),
    ("ID number", r"\b\d{10,17}\b"),
];

const URL_PATTERN: &str = r"https?://\S+";
const MENTION_PATTERN: &str = r"@\w+";
const EMOJI_CLASS: &str = r"[\x{1F300}-\x{1F5FF}\x{1F600}-\x{1F64F}]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    TooShort,
    TooLong,
    NoContent,
    DisallowedWord(String),
    PersonalInfo(&'static str),
    Spam(&'static str),
    Pattern(String),
    PolicyUnavailable,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => f.write_str("text too short"),
            Self::TooLong => f.write_str("text too long"),
            Self::NoContent => f.write_str("nothing to roast"),
            Self::DisallowedWord(_) => f.write_str("disallowed word"),
            Self::PersonalInfo(kind) => write!(f, "contains a {kind}"),
            Self::Spam(kind) => write!(f, "too many {kind}"),
            Self::Pattern(_) => f.write_str("blocked pattern"),
            Self::PolicyUnavailable => f.write_str("filter unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked(BlockReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Stateless text policy. Built once from configuration; `classify` is a
/// pure function of its input.
pub struct ContentFilter {
    min_input_length: usize,
    words: Vec<String>,
    personal_info: Vec<(&'static str, Regex)>,
    urls: Option<Regex>,
    mentions: Option<Regex>,
    emoji_runs: Option<Regex>,
    extra: Vec<(String, Regex)>,
    unavailable: bool,
}

impl ContentFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let mut broken = 0usize;
        let mut compile = |pattern: &str| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Skipping invalid filter pattern {:?}: {}", pattern, e);
                broken += 1;
                None
            }
        };

        let personal_info = PERSONAL_INFO_PATTERNS
            .iter()
            .filter_map(|(kind, pattern)| compile(pattern).map(|re| (*kind, re)))
            .collect();
        let urls = compile(URL_PATTERN);
        let mentions = compile(MENTION_PATTERN);
        let emoji_runs = compile(&format!("{EMOJI_CLASS}{{{EMOJI_SPAM_THRESHOLD},}}"));
        let extra = config
            .blocked_patterns
            .iter()
            .filter_map(|pattern| compile(pattern).map(|re| (pattern.clone(), re)))
            .collect();

        let words = BLOCKED_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.disallowed_words.iter().cloned())
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let unavailable = config.fail_closed && broken > 0;
        if unavailable {
            tracing::error!("Content filter is fail-closed with {} broken patterns", broken);
        }

        Self {
            min_input_length: config.min_input_length,
            words,
            personal_info,
            urls,
            mentions,
            emoji_runs,
            extra,
            unavailable,
        }
    }

    pub fn classify(&self, text: &str) -> Verdict {
        match self.first_violation(text) {
            Some(reason) => Verdict::Blocked(reason),
            None => Verdict::Allowed,
        }
    }

    fn first_violation(&self, text: &str) -> Option<BlockReason> {
        if self.unavailable {
            return Some(BlockReason::PolicyUnavailable);
        }

        let text = text.trim();
        let length = text.chars().count();
        if length < self.min_input_length {
            return Some(BlockReason::TooShort);
        }
        if length > MAX_INPUT_LENGTH {
            return Some(BlockReason::TooLong);
        }

        let digits_only = text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());
        if digits_only || !text.chars().any(char::is_alphanumeric) {
            return Some(BlockReason::NoContent);
        }

        let lower = text.to_lowercase();
        if let Some(word) = self.words.iter().find(|w| lower.contains(w.as_str())) {
            return Some(BlockReason::DisallowedWord(word.clone()));
        }

        if let Some((kind, _)) = self.personal_info.iter().find(|(_, re)| re.is_match(text)) {
            return Some(BlockReason::PersonalInfo(kind));
        }

        if count_matches(self.urls.as_ref(), text) >= SPAM_THRESHOLD {
            return Some(BlockReason::Spam("links"));
        }
        if count_matches(self.mentions.as_ref(), text) >= SPAM_THRESHOLD {
            return Some(BlockReason::Spam("mentions"));
        }
        if self.emoji_runs.as_ref().is_some_and(|re| re.is_match(text)) {
            return Some(BlockReason::Spam("emoji"));
        }
        if longest_repeat(&lower) >= SPAM_THRESHOLD {
            return Some(BlockReason::Spam("repeated words"));
        }

        self.extra
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(pattern, _)| BlockReason::Pattern(pattern.clone()))
    }

    /// Normalises text before it is rendered or stored.
    pub fn sanitize(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn count_matches(re: Option<&Regex>, text: &str) -> usize {
    re.map(|re| re.find_iter(text).count()).unwrap_or(0)
}

/// Longest run of the same word back to back ("lol lol lol" is 3).
fn longest_repeat(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut previous = None;
    for word in text.split_whitespace() {
        run = if previous == Some(word) { run + 1 } else { 1 };
        longest = longest.max(run);
        previous = Some(word);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> ContentFilter {
        ContentFilter::new(&FilterConfig::default())
    }

    fn reason(text: &str) -> Option<BlockReason> {
        match filter().classify(text) {
            Verdict::Allowed => None,
            Verdict::Blocked(reason) => Some(reason),
        }
    }

    #[test]
    fn test_allows_ordinary_roast_requests() {
        assert!(filter().classify("roast me").is_allowed());
        assert!(filter().classify("I am the king of this group").is_allowed());
        assert!(filter().classify("আমি সবচেয়ে বুদ্ধিমান").is_allowed());
        assert!(filter().classify("lol lol what a day").is_allowed());
    }

    #[test]
    fn test_length_limits() {
        assert_eq!(reason("hey"), Some(BlockReason::TooShort));
        assert_eq!(reason("   hi   "), Some(BlockReason::TooShort));
        assert_eq!(reason(&"a".repeat(501)), Some(BlockReason::TooLong));
    }

    #[test]
    fn test_meaningless_input() {
        assert_eq!(reason("1234 5678"), Some(BlockReason::NoContent));
        assert_eq!(reason("😂😂😂😂😂"), Some(BlockReason::NoContent));
        assert_eq!(reason("!!!???"), Some(BlockReason::NoContent));
    }

    #[test]
    fn test_disallowed_words() {
        assert_eq!(
            reason("go and DIE already"),
            Some(BlockReason::DisallowedWord("die".into()))
        );

        let custom = ContentFilter::new(&FilterConfig {
            disallowed_words: vec!["Pineapple".into()],
            ..FilterConfig::default()
        });
        assert!(!custom.classify("pineapple on pizza").is_allowed());
    }

    #[test]
    fn test_disallowed_words_match_inside_longer_words() {
        assert_eq!(
            reason("you are fucking useless"),
            Some(BlockReason::DisallowedWord("fuck".into()))
        );
        assert_eq!(
            reason("what a shitty haircut"),
            Some(BlockReason::DisallowedWord("shit".into()))
        );
        assert_eq!(
            reason("তোমার গালিগালাজ শুনলাম"),
            Some(BlockReason::DisallowedWord("গালি".into()))
        );
        assert_eq!(
            reason("killer looks bro"),
            Some(BlockReason::DisallowedWord("kill".into()))
        );
    }

    #[test]
    fn test_personal_info() {
        assert_eq!(
            reason("call me at 01712345678"),
            Some(BlockReason::PersonalInfo("phone number"))
        );
        assert_eq!(
            reason("mail me: someone@example.com"),
            Some(BlockReason::PersonalInfo("email address"))
        );
        assert_eq!(
            reason("my account is 1234567890"),
            Some(BlockReason::PersonalInfo("ID number"))
        );
    }

    #[test]
    fn test_spam() {
        assert_eq!(
            reason("see http://a.io http://b.io http://c.io"),
            Some(BlockReason::Spam("links"))
        );
        assert_eq!(
            reason("hey @one @two @three"),
            Some(BlockReason::Spam("mentions"))
        );
        assert!(filter().classify("hey @one and @two").is_allowed());
        assert_eq!(
            reason(&format!("look {}", "😂".repeat(10))),
            Some(BlockReason::Spam("emoji"))
        );
        assert_eq!(
            reason("roast me roast me ha ha ha"),
            Some(BlockReason::Spam("repeated words"))
        );
    }

    #[test]
    fn test_configured_patterns_fail_open_by_default() {
        let config = FilterConfig {
            blocked_patterns: vec!["(unclosed".into(), "^spam".into()],
            ..FilterConfig::default()
        };
        let filter = ContentFilter::new(&config);
        assert!(filter.classify("roast me please").is_allowed());
        assert_eq!(
            filter.classify("spam spam spam"),
            Verdict::Blocked(BlockReason::Pattern("^spam".into()))
        );
    }

    #[test]
    fn test_fail_closed_blocks_everything_when_policy_is_broken() {
        let config = FilterConfig {
            blocked_patterns: vec!["(unclosed".into()],
            fail_closed: true,
            ..FilterConfig::default()
        };
        assert_eq!(
            ContentFilter::new(&config).classify("roast me please"),
            Verdict::Blocked(BlockReason::PolicyUnavailable)
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(ContentFilter::sanitize("  roast\n\tme \u{7}now "), "roast me now");
    }
}
