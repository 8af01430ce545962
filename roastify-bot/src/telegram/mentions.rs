use roastify_app::Mention;
use teloxide::types::{MessageEntityKind, UserId};

/// The first person a message names, skipping bots and the author.
pub fn first_mention<'a>(
    entities: impl IntoIterator<Item = (&'a MessageEntityKind, &'a str)>,
    author_id: UserId,
    author_username: Option<&str>,
) -> Option<Mention> {
    entities
        .into_iter()
        .find_map(|(kind, text)| mention_from(kind, text, author_id, author_username))
}

fn mention_from(
    kind: &MessageEntityKind,
    text: &str,
    author_id: UserId,
    author_username: Option<&str>,
) -> Option<Mention> {
    match kind {
        MessageEntityKind::TextMention { user } if !user.is_bot && user.id != author_id => Some(Mention::User {
            id: user.id.0 as i64,
            display_name: user.full_name(),
            username: user.username.clone(),
        }),
        MessageEntityKind::Mention => {
            let name = text.trim_start_matches('@');
            let is_author = author_username.is_some_and(|own| own.eq_ignore_ascii_case(name));
            (!name.is_empty() && !is_author).then(|| Mention::Username(name.to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_mention_drops_the_at_sign() {
        let entities = [
            (&MessageEntityKind::BotCommand, "/roast"),
            (&MessageEntityKind::Mention, "@TheMod"),
        ];
        assert_eq!(
            first_mention(entities, UserId(10), Some("alice")),
            Some(Mention::Username("TheMod".into()))
        );
    }

    #[test]
    fn test_own_username_is_not_a_target() {
        let own = [(&MessageEntityKind::Mention, "@Alice")];
        assert_eq!(first_mention(own, UserId(10), Some("alice")), None);

        let both = [
            (&MessageEntityKind::Mention, "@alice"),
            (&MessageEntityKind::Mention, "@bob"),
        ];
        assert_eq!(
            first_mention(both, UserId(10), Some("alice")),
            Some(Mention::Username("bob".into()))
        );
        assert_eq!(first_mention([(&MessageEntityKind::Bold, "hey")], UserId(10), None), None);
    }
}
