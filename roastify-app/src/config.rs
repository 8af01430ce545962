use crate::domain::{User, UserRole};
use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_UTC_OFFSET_HOURS: i32 = 6;

#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub min_input_length: usize,
    pub disallowed_words: Vec<String>,
    pub blocked_patterns: Vec<String>,
    pub fail_closed: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_input_length: 4,
            disallowed_words: Vec::new(),
            blocked_patterns: Vec::new(),
            fail_closed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CooldownConfig {
    pub window: Duration,
    pub admin_bypass: bool,
    /// Accepted roasts per user per local calendar day; 0 disables the quota.
    pub daily_limit: u32,
    pub utc_offset: FixedOffset,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            admin_bypass: true,
            daily_limit: 20,
            utc_offset: default_offset(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VotePolicy {
    /// `None` keeps voting open forever.
    pub window: Option<chrono::Duration>,
    pub allow_self_vote: bool,
    pub allow_vote_change: bool,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            window: Some(chrono::Duration::seconds(300)),
            allow_self_vote: false,
            allow_vote_change: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub service_url: String,
    pub timeout: Duration,
    pub templates_path: Option<PathBuf>,
    pub utc_offset: FixedOffset,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8090".to_string(),
            timeout: Duration::from_secs(15),
            templates_path: None,
            utc_offset: default_offset(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReactionConfig {
    pub enabled: bool,
    pub cooldown: Duration,
    pub max_per_hour: u32,
    /// Shorter messages never get a reaction.
    pub min_text_chars: usize,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown: Duration::from_secs(15),
            max_per_hour: 20,
            min_text_chars: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WelcomeConfig {
    pub enabled: bool,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProtectionConfig {
    pub owner_id: Option<i64>,
    pub admin_ids: Vec<i64>,
    pub opt_out_ids: Vec<i64>,
}

impl ProtectionConfig {
    pub fn role_of(&self, user_id: i64) -> UserRole {
        if self.owner_id == Some(user_id) {
            UserRole::Owner
        } else if self.admin_ids.contains(&user_id) {
            UserRole::Admin
        } else {
            UserRole::Regular
        }
    }

    /// Builds the user record as configuration sees it.
    pub fn profile(&self, user_id: i64, display_name: String, username: Option<String>) -> User {
        User::new(user_id, display_name, username)
            .with_role(self.role_of(user_id))
            .with_protection_opt_out(self.opt_out_ids.contains(&user_id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub cooldown: CooldownConfig,
    pub votes: VotePolicy,
    pub render: RenderConfig,
    pub protection: ProtectionConfig,
    pub reactions: ReactionConfig,
    pub welcome: WelcomeConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let utc_offset = FixedOffset::east_opt(
            env_parse("TIMEZONE_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS) * 3600,
        )
        .unwrap_or_else(default_offset);

        let filter = FilterConfig {
            min_input_length: env_parse("MIN_INPUT_LENGTH", 4),
            disallowed_words: env_list("DISALLOWED_WORDS"),
            blocked_patterns: env_list("BLOCKED_PATTERNS"),
            fail_closed: env_parse("FILTER_FAIL_CLOSED", false),
        };

        let cooldown = CooldownConfig {
            window: Duration::from_secs(env_parse("ROAST_COOLDOWN_SECS", 30)),
            admin_bypass: env_parse("ADMIN_BYPASS_COOLDOWN", true),
            daily_limit: env_parse("DAILY_ROAST_LIMIT", 20),
            utc_offset,
        };

        let vote_window_secs: i64 = env_parse("VOTE_WINDOW_SECS", 300);
        let votes = VotePolicy {
            window: (vote_window_secs > 0).then(|| chrono::Duration::seconds(vote_window_secs)),
            allow_self_vote: env_parse("ALLOW_SELF_VOTE", false),
            allow_vote_change: env_parse("ALLOW_VOTE_CHANGE", true),
        };

        let render = RenderConfig {
            service_url: std::env::var("RENDER_SERVICE_URL")
                .unwrap_or_else(|_| RenderConfig::default().service_url),
            timeout: Duration::from_secs(env_parse("RENDER_TIMEOUT_SECS", 15)),
            templates_path: std::env::var("TEMPLATES_PATH").ok().map(PathBuf::from),
            utc_offset,
        };

        let protection = ProtectionConfig {
            owner_id: std::env::var("OWNER_ID").ok().and_then(|v| v.trim().parse().ok()),
            admin_ids: env_list("ADMIN_IDS")
                .iter()
                .filter_map(|id| id.parse().ok())
                .collect(),
            opt_out_ids: env_list("PROTECTION_OPT_OUT_IDS")
                .iter()
                .filter_map(|id| id.parse().ok())
                .collect(),
        };

        let reactions = ReactionConfig {
            enabled: env_parse("AUTO_REACTIONS", true),
            cooldown: Duration::from_secs(env_parse("REACTION_COOLDOWN", 15)),
            max_per_hour: env_parse("MAX_REACTIONS_PER_HOUR", 20),
            min_text_chars: env_parse("REACTION_MIN_LENGTH", 2),
        };

        let welcome = WelcomeConfig {
            enabled: env_parse("WELCOME_NEW_MEMBERS", true),
        };

        Self {
            filter,
            cooldown,
            votes,
            render,
            protection,
            reactions,
            welcome,
        }
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or(Utc.fix())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Comma separated, blanks dropped.
fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|raw| split_list(&raw))
        .unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
