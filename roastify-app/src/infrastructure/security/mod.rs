mod content_filter;
mod cooldown_tracker;
mod reaction_limiter;

pub use content_filter::{BlockReason, ContentFilter, Verdict};
pub use cooldown_tracker::{CooldownDecision, CooldownTracker, DenialKind};
pub use reaction_limiter::ReactionLimiter;
