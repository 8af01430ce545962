use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Cooldown active, retry in {retry_after_secs}s")]
    CooldownActive { retry_after_secs: u64 },

    #[error("Daily roast limit reached, retry in {retry_after_secs}s")]
    DailyLimitReached { retry_after_secs: u64 },

    #[error("Target is a protected user")]
    ProtectedTarget,

    #[error("Render failed: {0}")]
    RenderFailure(String),

    #[error("Roast not found or voting closed")]
    UnknownRoast,

    #[error("Self-vote rejected")]
    SelfVoteRejected,

    #[error("Vote already cast")]
    AlreadyVoted,

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn database(err: impl Display) -> Self {
        Self::Database(err.to_string())
    }

    /// Errors the caller caused, as opposed to failures on our side.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::RenderFailure(_) | Self::Timeout | Self::Database(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Blocked(reason) => format!("⚠️ Content blocked ({reason}). Keep it clean!"),
            Self::CooldownActive { retry_after_secs } => {
                format!("⏳ Slow down! Next roast in {retry_after_secs} seconds.")
            }
            Self::DailyLimitReached { retry_after_secs } => format!(
                "📊 Daily limit reached. Come back in {} hours.",
                retry_after_secs.div_ceil(3600)
            ),
            Self::ProtectedTarget => "🛡️ Owner and admins are off limits!".to_string(),
            Self::RenderFailure(_) => {
                "🖼️ Could not draw that roast. Try again in a moment.".to_string()
            }
            Self::UnknownRoast => "⏰ Voting on this roast is closed.".to_string(),
            Self::SelfVoteRejected => "🙅 You can't vote on your own roast!".to_string(),
            Self::AlreadyVoted => "❌ You already voted on this roast!".to_string(),
            Self::InvalidVote(_) => "🤔 That vote button is broken.".to_string(),
            Self::BadRequest(reason) => format!("🤔 {reason}"),
            Self::Timeout => "⌛ That took too long. Try again.".to_string(),
            Self::Database(_) => "❌ Something went wrong on our side. Try again later.".to_string(),
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = match &self {
                AppError::Blocked(_) | AppError::InvalidVote(_) | AppError::BadRequest(_) => {
                    StatusCode::BAD_REQUEST
                }
                AppError::CooldownActive { .. } | AppError::DailyLimitReached { .. } => {
                    StatusCode::TOO_MANY_REQUESTS
                }
                AppError::ProtectedTarget | AppError::SelfVoteRejected => StatusCode::FORBIDDEN,
                AppError::AlreadyVoted => StatusCode::CONFLICT,
                AppError::UnknownRoast => StatusCode::NOT_FOUND,
                AppError::RenderFailure(_) => StatusCode::BAD_GATEWAY,
                AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = self.to_string();
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
