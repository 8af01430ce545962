mod auto_react;
mod create_roast;
mod leaderboard;
mod roast_writer;
mod vote_ledger;
mod welcome;

pub use auto_react::AutoReactor;
pub use create_roast::{AdmittedRoast, RoastOutcome, RoastRequest, RoastService};
pub use leaderboard::{rank_roasted, LeaderboardAggregator};
pub use roast_writer::RoastWriter;
pub use vote_ledger::VoteLedger;
pub use welcome::welcome_message;
