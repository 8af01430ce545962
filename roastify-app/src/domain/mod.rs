mod leaderboard;
mod roast_event;
mod roast_lines;
mod template;
mod user;
mod vote;

pub use leaderboard::{LeaderboardEntry, LeaderboardWindow};
pub use roast_event::RoastEvent;
pub use roast_lines::{RoastCategory, RoastLines};
pub use template::{Template, Theme, IMAGE_HEIGHT, IMAGE_WIDTH};
pub use user::{User, UserRole};
pub use vote::{ParseCategoryError, Vote, VoteCategory, VoteChange, VoteCounts, VoteReceipt, VoteUpsert};
