use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Roastify turns your words into roast cards.")]
pub enum Command {
    #[command(description = "say hello")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "roast some text; reply to a message to roast its author")]
    Roast(String),
    #[command(description = "most roasted users: all, week or day")]
    Leaderboard(String),
    #[command(description = "reply to a roast to see its votes")]
    Votes,
}

pub const WELCOME: &str = "🔥 Welcome to Roastify!\n\
Send /roast <text> to roast yourself, or reply to someone's message with /roast <text> to roast them.\n\
Vote on roasts with the buttons under each card.";
