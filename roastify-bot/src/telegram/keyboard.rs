use roastify_app::domain::{LeaderboardEntry, LeaderboardWindow, VoteCategory, VoteChange, VoteCounts, VoteReceipt};
use roastify_errors::AppError;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup};
use uuid::Uuid;

const CALLBACK_PREFIX: &str = "vote";

/// `vote:<roast uuid>:<category>`
pub fn callback_data(roast_id: Uuid, category: VoteCategory) -> String {
    format!("{CALLBACK_PREFIX}:{roast_id}:{category}")
}

pub fn parse_callback(data: &str) -> Result<(Uuid, VoteCategory), AppError> {
    let mut parts = data.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(CALLBACK_PREFIX), Some(roast_id), Some(category)) => {
            let roast_id =
                Uuid::parse_str(roast_id).map_err(|e| AppError::InvalidVote(e.to_string()))?;
            let category = category
                .parse::<VoteCategory>()
                .map_err(|e| AppError::InvalidVote(e.to_string()))?;
            Ok((roast_id, category))
        }
        _ => Err(AppError::InvalidVote(format!("unrecognised callback {data:?}"))),
    }
}

pub fn vote_keyboard(roast_id: Uuid, counts: Option<&VoteCounts>) -> InlineKeyboardMarkup {
    let row = VoteCategory::ALL
        .iter()
        .map(|category| {
            let label = match counts {
                Some(counts) => format!("{} {}", category.label(), counts.get(*category)),
                None => category.label().to_string(),
            };
            InlineKeyboardButton::callback(label, callback_data(roast_id, *category))
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row])
}

/// Recovers the roast a card belongs to from its vote buttons.
pub fn roast_id_from_markup(markup: &InlineKeyboardMarkup) -> Option<Uuid> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .find_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => {
                parse_callback(data).ok().map(|(roast_id, _)| roast_id)
            }
            _ => None,
        })
}

pub fn format_counts(counts: &VoteCounts) -> String {
    VoteCategory::ALL
        .iter()
        .map(|category| format!("{} {}", category.label(), counts.get(*category)))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn vote_ack(receipt: &VoteReceipt) -> String {
    let verb = match receipt.change {
        VoteChange::Created => "Voted",
        VoteChange::Changed { .. } => "Changed to",
        VoteChange::Unchanged => "Still",
    };
    format!(
        "{verb} {}\n{}",
        receipt.category.label(),
        format_counts(&receipt.counts)
    )
}

pub fn format_leaderboard(entries: &[LeaderboardEntry], window: LeaderboardWindow) -> String {
    if entries.is_empty() {
        return format!("🏆 Most roasted ({})\nNobody has been roasted yet.", window.title());
    }

    let mut text = format!("🏆 Most roasted ({})", window.title());
    for (rank, entry) in entries.iter().enumerate() {
        let name = entry
            .display_name
            .clone()
            .unwrap_or_else(|| format!("user {}", entry.user_id));
        text.push_str(&format!(
            "\n{}. {} · {} votes in {} roasts ({})",
            rank + 1,
            name,
            entry.total_votes,
            entry.roast_count,
            format_counts(&entry.breakdown)
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_data_parses_back() {
        let roast_id = Uuid::new_v4();
        let data = callback_data(roast_id, VoteCategory::Savage);
        assert_eq!(data, format!("vote:{roast_id}:savage"));
        assert_eq!(parse_callback(&data).unwrap(), (roast_id, VoteCategory::Savage));
    }

    #[test]
    fn test_malformed_callbacks_are_invalid_votes() {
        let roast_id = Uuid::new_v4();
        for data in [
            "".to_string(),
            "vote".to_string(),
            format!("vote:{roast_id}"),
            format!("vote:{roast_id}:fire"),
            "vote:not-a-uuid:funny".to_string(),
            format!("approve:{roast_id}:funny"),
        ] {
            assert!(matches!(parse_callback(&data), Err(AppError::InvalidVote(_))), "{data}");
        }
    }

    #[test]
    fn test_keyboard_carries_roast_id() {
        let roast_id = Uuid::new_v4();
        let counts = VoteCounts {
            funny: 2,
            mid: 0,
            savage: 5,
        };
        let keyboard = vote_keyboard(roast_id, Some(&counts));

        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0].len(), 3);
        assert_eq!(keyboard.inline_keyboard[0][2].text, "💀 Savage 5");
        assert_eq!(roast_id_from_markup(&keyboard), Some(roast_id));
    }

    #[test]
    fn test_leaderboard_text() {
        let empty = format_leaderboard(&[], LeaderboardWindow::Week);
        assert!(empty.contains("This week"));
        assert!(empty.contains("Nobody"));

        let entry = LeaderboardEntry {
            user_id: 42,
            display_name: None,
            total_votes: 12,
            breakdown: VoteCounts {
                funny: 3,
                mid: 2,
                savage: 7,
            },
            roast_count: 2,
            last_roasted_at: chrono::Utc::now(),
        };
        let text = format_leaderboard(&[entry], LeaderboardWindow::All);
        assert!(text.contains("1. user 42 · 12 votes in 2 roasts"));
    }
}
