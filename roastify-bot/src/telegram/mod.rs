mod commands;
mod keyboard;
mod mentions;

pub use commands::Command;

use chrono::Utc;
use keyboard::{format_counts, format_leaderboard, parse_callback, roast_id_from_markup, vote_ack, vote_keyboard};
use mentions::first_mention;
use roastify_app::application::{welcome_message, RoastRequest};
use roastify_app::domain::{LeaderboardWindow, User, VoteChange, VoteReceipt};
use roastify_app::AppContext;
use roastify_errors::AppError;
use std::time::Duration;
use teloxide::{
    dispatching::{Dispatcher, HandlerExt, UpdateFilterExt},
    dptree,
    net::Download,
    payloads::{
        AnswerCallbackQuerySetters, EditMessageReplyMarkupSetters, GetUserProfilePhotosSetters, SendPhotoSetters,
        SetMessageReactionSetters,
    },
    prelude::*,
    types::{CallbackQuery, InputFile, ReactionType, Update, UserId},
    utils::command::BotCommands,
    Bot,
};

const LEADERBOARD_SIZE: usize = 10;
const PHOTO_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(bot: Bot, ctx: AppContext) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Could not register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.new_chat_members().is_some())
                .endpoint(handle_new_members),
        )
        .branch(Update::filter_message().endpoint(handle_chat_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, ctx: AppContext) -> ResponseResult<()> {
    let reply = match cmd {
        Command::Start => Some(commands::WELCOME.to_string()),
        Command::Help => Some(Command::descriptions().to_string()),
        Command::Roast(text) => roast(&bot, &msg, text, &ctx).await?,
        Command::Leaderboard(window) => Some(leaderboard(&ctx, &window).await),
        Command::Votes => Some(votes(&msg, &ctx).await),
    };

    if let Some(text) = reply {
        bot.send_message(msg.chat.id, text).await?;
    }
    Ok(())
}

/// Sends the card itself on success; otherwise returns the text to reply with.
async fn roast(bot: &Bot, msg: &Message, text: String, ctx: &AppContext) -> ResponseResult<Option<String>> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(Some(
            "Usage: /roast <text>. Reply to someone's message to roast them.".to_string(),
        ));
    }

    let replied_to = msg
        .reply_to_message()
        .and_then(|m| m.from.as_ref())
        .filter(|u| !u.is_bot);
    let target = match replied_to {
        Some(user) => Some(profile(ctx, user)),
        None => match mentioned(msg, from) {
            Some(mention) => match ctx.resolve_mention(mention).await {
                Ok(user) => Some(user),
                Err(e) => return Ok(Some(reply_for(&e))),
            },
            None => None,
        },
    };

    let request = RoastRequest {
        author: profile(ctx, from),
        target,
        chat_id: Some(msg.chat.id.0),
        text,
        now: Utc::now(),
    };
    let admitted = match ctx.roasts.admit(request).await {
        Ok(admitted) => admitted,
        Err(e) => return Ok(Some(reply_for(&e))),
    };

    let roasted = UserId(admitted.roasted_user_id() as u64);
    let photo = match tokio::time::timeout(PHOTO_FETCH_TIMEOUT, fetch_profile_photo(bot, roasted)).await {
        Ok(photo) => photo,
        Err(_) => {
            tracing::warn!("Profile photo of {} took too long, rendering without it", roasted.0);
            None
        }
    };

    match ctx.roasts.render_and_persist(admitted, photo).await {
        Ok(outcome) => {
            bot.send_photo(msg.chat.id, InputFile::memory(outcome.image))
                .reply_markup(vote_keyboard(outcome.event.id, None))
                .await?;
            Ok(None)
        }
        Err(e) => Ok(Some(reply_for(&e))),
    }
}

fn mentioned(msg: &Message, from: &teloxide::types::User) -> Option<roastify_app::Mention> {
    let entities = msg.parse_entities()?;
    first_mention(
        entities.iter().map(|e| (e.kind(), e.text())),
        from.id,
        from.username.as_deref(),
    )
}

async fn handle_new_members(bot: Bot, msg: Message, ctx: AppContext) -> ResponseResult<()> {
    let Some(members) = msg.new_chat_members() else {
        return Ok(());
    };

    for member in members.iter().filter(|u| !u.is_bot) {
        if let Err(e) = ctx
            .observe_user(user_key(member.id), member.full_name(), member.username.clone())
            .await
        {
            tracing::warn!("Could not record new member {}: {}", member.id.0, e);
        }
        if ctx.config.welcome.enabled {
            bot.send_message(msg.chat.id, welcome_message(&member.full_name())).await?;
        }
    }
    Ok(())
}

async fn handle_chat_message(bot: Bot, msg: Message, ctx: AppContext) -> ResponseResult<()> {
    let (Some(from), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    if from.is_bot || text.starts_with('/') {
        return Ok(());
    }

    let Some(emoji) = ctx.reactor.reaction_for(user_key(from.id), text, Utc::now()) else {
        return Ok(());
    };
    let result = bot
        .set_message_reaction(msg.chat.id, msg.id)
        .reaction(vec![ReactionType::Emoji {
            emoji: emoji.to_string(),
        }])
        .await;
    if let Err(e) = result {
        tracing::debug!("Could not react to message {}: {}", msg.id.0, e);
    }
    Ok(())
}

async fn leaderboard(ctx: &AppContext, window: &str) -> String {
    let Ok(window) = window.parse::<LeaderboardWindow>() else {
        return "Usage: /leaderboard [all|week|day]".to_string();
    };

    match ctx.leaderboard.top_roasted(LEADERBOARD_SIZE, window, Utc::now()).await {
        Ok(entries) => format_leaderboard(&entries, window),
        Err(e) => reply_for(&e),
    }
}

async fn votes(msg: &Message, ctx: &AppContext) -> String {
    let Some(roast_id) = msg
        .reply_to_message()
        .and_then(|m| m.reply_markup())
        .and_then(roast_id_from_markup)
    else {
        return "Reply to a roast card with /votes to see its score.".to_string();
    };

    match ctx.votes.get_counts(roast_id).await {
        Ok(counts) => format!("📊 {}", format_counts(&counts)),
        Err(e) => reply_for(&e),
    }
}

async fn handle_callback(bot: Bot, q: CallbackQuery, ctx: AppContext) -> ResponseResult<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let answer = match cast_vote(&ctx, &q, data).await {
        Ok(receipt) => {
            if receipt.change != VoteChange::Unchanged {
                refresh_counts(&bot, &q, &receipt).await;
            }
            vote_ack(&receipt)
        }
        Err(e) => reply_for(&e),
    };

    bot.answer_callback_query(q.id.clone()).text(answer).await?;
    Ok(())
}

async fn cast_vote(ctx: &AppContext, q: &CallbackQuery, data: &str) -> Result<VoteReceipt, AppError> {
    let (roast_id, category) = parse_callback(data)?;
    let voter = ctx
        .observe_user(user_key(q.from.id), q.from.full_name(), q.from.username.clone())
        .await?;
    ctx.votes.cast_vote(roast_id, voter.id, category, Utc::now()).await
}

async fn refresh_counts(bot: &Bot, q: &CallbackQuery, receipt: &VoteReceipt) {
    let Some(message) = q.message.as_ref() else {
        return;
    };
    let result = bot
        .edit_message_reply_markup(message.chat().id, message.id())
        .reply_markup(vote_keyboard(receipt.roast_id, Some(&receipt.counts)))
        .await;
    if let Err(e) = result {
        tracing::debug!("Could not refresh vote counts on {}: {}", receipt.roast_id, e);
    }
}

/// Best effort, any failure yields `None`.
async fn fetch_profile_photo(bot: &Bot, user_id: UserId) -> Option<Vec<u8>> {
    let photos = bot
        .get_user_profile_photos(user_id)
        .limit(1)
        .await
        .map_err(|e| tracing::debug!("No profile photos for {}: {}", user_id.0, e))
        .ok()?;
    let largest = photos
        .photos
        .first()?
        .iter()
        .max_by_key(|size| size.width * size.height)?;

    let file = bot
        .get_file(largest.file.id.clone())
        .await
        .map_err(|e| tracing::warn!("Could not resolve profile photo of {}: {}", user_id.0, e))
        .ok()?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| tracing::warn!("Could not download profile photo of {}: {}", user_id.0, e))
        .ok()?;
    Some(buf)
}

fn profile(ctx: &AppContext, user: &teloxide::types::User) -> User {
    ctx.config
        .protection
        .profile(user_key(user.id), user.full_name(), user.username.clone())
}

fn user_key(id: UserId) -> i64 {
    id.0 as i64
}

fn reply_for(err: &AppError) -> String {
    if !err.is_user_error() {
        tracing::error!("Request failed: {}", err);
    }
    err.user_message()
}
