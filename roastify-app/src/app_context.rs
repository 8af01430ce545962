use crate::application::{AutoReactor, LeaderboardAggregator, RoastService, VoteLedger};
use crate::config::AppConfig;
use crate::domain::User;
use crate::infrastructure::render::{ImageCompositor, RenderServiceClient, RoastRenderer, TemplateStore};
use crate::infrastructure::security::{ContentFilter, CooldownTracker, ReactionLimiter};
use crate::infrastructure::store::RoastStore;
use chrono::{DateTime, Utc};
use roastify_errors::AppError;
use std::sync::Arc;

/// Someone named in a message instead of replied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mention {
    /// A text mention, which carries the user.
    User {
        id: i64,
        display_name: String,
        username: Option<String>,
    },
    /// A plain `@username`, without the `@`.
    Username(String),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RoastStore>,
    pub roasts: Arc<RoastService>,
    pub votes: Arc<VoteLedger>,
    pub leaderboard: Arc<LeaderboardAggregator>,
    pub reactor: Arc<AutoReactor>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RoastStore>,
        compositor: Arc<dyn ImageCompositor>,
    ) -> Self {
        let templates = TemplateStore::load(config.render.templates_path.as_deref());
        let renderer = RoastRenderer::new(templates, compositor, config.render.timeout);
        let roasts = RoastService::new(
            store.clone(),
            ContentFilter::new(&config.filter),
            CooldownTracker::new(config.cooldown.clone()),
            renderer,
            config.render.utc_offset,
        );

        let reactor = AutoReactor::new(
            ReactionLimiter::new(config.reactions.clone()),
            config.reactions.min_text_chars,
        );

        Self {
            votes: Arc::new(VoteLedger::new(store.clone(), config.votes.clone())),
            reactor: Arc::new(reactor),
            leaderboard: Arc::new(LeaderboardAggregator::new(store.clone())),
            roasts: Arc::new(roasts),
            store,
            config: Arc::new(config),
        }
    }

    pub fn with_render_service(config: AppConfig, store: Arc<dyn RoastStore>) -> Self {
        tracing::info!("Using render service at {}", config.render.service_url);
        let compositor = Arc::new(RenderServiceClient::new(&config.render.service_url));
        Self::new(config, store, compositor)
    }

    /// Records a user seen in an update, with the role configuration assigns.
    pub async fn observe_user(
        &self,
        id: i64,
        display_name: String,
        username: Option<String>,
    ) -> Result<User, AppError> {
        let profile = self.config.protection.profile(id, display_name, username);
        self.store.upsert_user(&profile).await
    }

    /// Turns a mention into the stored user. A username nobody has seen yet
    /// is a bad request rather than an untargeted roast.
    pub async fn resolve_mention(&self, mention: Mention) -> Result<User, AppError> {
        match mention {
            Mention::User {
                id,
                display_name,
                username,
            } => self.observe_user(id, display_name, username).await,
            Mention::Username(name) => {
                let known = self.store.find_user_by_username(&name).await?.ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "I don't know @{name} yet. Reply to one of their messages instead."
                    ))
                })?;
                Ok(self
                    .config
                    .protection
                    .profile(known.id, known.display_name, known.username))
            }
        }
    }

    /// Periodic cleanup of in-memory per-user state.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.roasts.sweep(now) + self.reactor.limiter().sweep(now)
    }
}
