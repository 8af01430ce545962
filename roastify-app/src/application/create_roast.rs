use super::RoastWriter;
use crate::domain::{RoastEvent, Theme, User};
use crate::infrastructure::render::{RenderInput, RoastRenderer};
use crate::infrastructure::security::{ContentFilter, CooldownDecision, CooldownTracker, DenialKind, Verdict};
use crate::infrastructure::store::RoastStore;
use chrono::{DateTime, FixedOffset, Utc};
use roastify_errors::AppError;
use std::sync::Arc;

const COOLDOWN_RESTORE_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct RoastRequest {
    pub author: User,
    /// Replied-to or mentioned user, if any.
    pub target: Option<User>,
    pub chat_id: Option<i64>,
    pub text: String,
    pub now: DateTime<Utc>,
}

/// A request that passed every gate and holds the author's cooldown slot.
#[derive(Debug, Clone)]
pub struct AdmittedRoast {
    author: User,
    target: Option<User>,
    chat_id: Option<i64>,
    text: String,
    now: DateTime<Utc>,
}

impl AdmittedRoast {
    /// Whose face goes on the card.
    pub fn roasted_user_id(&self) -> i64 {
        self.target.as_ref().map_or(self.author.id, |t| t.id)
    }
}

#[derive(Debug, Clone)]
pub struct RoastOutcome {
    pub event: RoastEvent,
    pub image: Vec<u8>,
}

pub struct RoastService {
    store: Arc<dyn RoastStore>,
    filter: ContentFilter,
    cooldowns: CooldownTracker,
    renderer: RoastRenderer,
    writer: RoastWriter,
    utc_offset: FixedOffset,
}

impl RoastService {
    pub fn new(
        store: Arc<dyn RoastStore>,
        filter: ContentFilter,
        cooldowns: CooldownTracker,
        renderer: RoastRenderer,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            filter,
            cooldowns,
            renderer,
            writer: RoastWriter,
            utc_offset,
        }
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Upserts the users, then applies protection, the content filter and
    /// the cooldown, in that order. Only a request that passes all of them
    /// takes the author's cooldown slot.
    pub async fn admit(&self, request: RoastRequest) -> Result<AdmittedRoast, AppError> {
        let author = self.store.upsert_user(&request.author).await?;

        // Replying to yourself is a plain "roast me".
        let target = match request.target.filter(|t| t.id != author.id) {
            Some(target) => Some(self.store.upsert_user(&target).await?),
            None => None,
        };

        if let Some(target) = target.as_ref().filter(|t| t.is_protected()) {
            tracing::warn!("User {} tried to roast protected user {}", author.id, target.id);
            return Err(AppError::ProtectedTarget);
        }

        let text = ContentFilter::sanitize(&request.text);
        if let Verdict::Blocked(reason) = self.filter.classify(&text) {
            tracing::warn!("Blocked roast from user {}: {}", author.id, reason);
            return Err(AppError::Blocked(reason.to_string()));
        }

        match self.cooldowns.check_and_record(&author, request.now) {
            CooldownDecision::Permitted => {}
            denied @ CooldownDecision::Denied { kind, .. } => {
                let retry_after_secs = denied.retry_after_secs();
                return Err(match kind {
                    DenialKind::Cooldown => AppError::CooldownActive { retry_after_secs },
                    DenialKind::DailyLimit => AppError::DailyLimitReached { retry_after_secs },
                });
            }
        }

        Ok(AdmittedRoast {
            author,
            target,
            chat_id: request.chat_id,
            text,
            now: request.now,
        })
    }

    /// Writes the lines, renders the card and records the event.
    pub async fn render_and_persist(
        &self,
        admitted: AdmittedRoast,
        photo: Option<Vec<u8>>,
    ) -> Result<RoastOutcome, AppError> {
        let AdmittedRoast {
            author,
            target,
            chat_id,
            text,
            now,
        } = admitted;

        let lines = self
            .writer
            .write(&text, target.as_ref().map(|t| t.display_name.as_str()));
        let category = lines.category;

        let rendered = self
            .renderer
            .render(RenderInput {
                author_id: author.id,
                text: text.clone(),
                lines,
                photo,
                theme: Theme::for_time(now, self.utc_offset),
                now,
            })
            .await?;

        let event = RoastEvent::new(
            author.id,
            target.as_ref().map(|t| t.id),
            rendered.template_id,
            &text,
            now,
        )
        .with_chat_id(chat_id);
        self.store.insert_roast(&event).await?;

        if let Some(last_roast_at) = self.cooldowns.last_roast_at(author.id) {
            if let Err(e) = self.store.save_cooldown(author.id, last_roast_at).await {
                tracing::warn!("Cooldown write-through failed for user {}: {}", author.id, e);
            }
        }

        tracing::info!(
            "Roast {} by user {} on {} with {} ({}{})",
            event.id,
            author.id,
            event.roasted_user(),
            event.template_id,
            category,
            if rendered.used_fallback { ", fallback" } else { "" }
        );

        Ok(RoastOutcome {
            event,
            image: rendered.image,
        })
    }

    /// Reloads persisted cooldown timestamps so a restart does not reset them.
    pub async fn restore_cooldowns(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let since = now - chrono::Duration::hours(COOLDOWN_RESTORE_HOURS);
        let states = self.store.load_cooldowns(since).await?;
        for (user_id, last_roast_at) in &states {
            self.cooldowns.restore(*user_id, *last_roast_at);
        }
        Ok(states.len())
    }

    /// Drops per-user state nobody has touched for a day.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.cooldowns.sweep(now) + self.renderer.sweep(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CooldownConfig, FilterConfig};
    use crate::domain::UserRole;
    use crate::infrastructure::render::{ScriptedCompositor, TemplateStore};
    use crate::infrastructure::store::MemoryStore;
    use chrono::TimeZone;
    use std::time::Duration;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn service_with(store: Arc<MemoryStore>, compositor: Arc<ScriptedCompositor>) -> RoastService {
        RoastService::new(
            store,
            ContentFilter::new(&FilterConfig::default()),
            CooldownTracker::new(CooldownConfig {
                daily_limit: 0,
                utc_offset: utc(),
                ..CooldownConfig::default()
            }),
            RoastRenderer::new(TemplateStore::builtin(), compositor, Duration::from_secs(1)),
            utc(),
        )
    }

    fn service(store: Arc<MemoryStore>) -> RoastService {
        service_with(store, Arc::new(ScriptedCompositor::ok()))
    }

    fn request(author: User, target: Option<User>, text: &str, now: DateTime<Utc>) -> RoastRequest {
        RoastRequest {
            author,
            target,
            chat_id: Some(-42),
            text: text.to_string(),
            now,
        }
    }

    async fn roast(service: &RoastService, request: RoastRequest) -> Result<RoastOutcome, AppError> {
        let admitted = service.admit(request).await?;
        service.render_and_persist(admitted, None).await
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_roast_is_persisted_and_rendered() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone());
        let alice = User::new(1, "Alice".into(), Some("alice".into()));
        let bob = User::new(2, "Bob".into(), None);

        let outcome = roast(&service, request(alice, Some(bob), "your code   looks like spaghetti", noon()))
            .await
            .unwrap();

        let stored = store.find_roast(outcome.event.id).await.unwrap().unwrap();
        assert_eq!(stored, outcome.event);
        assert_eq!(stored.target_id, Some(2));
        assert_eq!(stored.chat_id, Some(-42));
        assert_eq!(stored.input_text, "your code looks like spaghetti");
        assert!(TemplateStore::builtin()
            .for_theme(Theme::Day)
            .iter()
            .any(|t| t.id == stored.template_id));
        assert_eq!(outcome.image, format!("png:{}", stored.template_id).into_bytes());

        assert!(store.find_user(2).await.unwrap().is_some());
        let cooldowns = store.load_cooldowns(noon() - chrono::Duration::hours(1)).await.unwrap();
        assert_eq!(cooldowns, vec![(1, noon())]);
    }

    #[tokio::test]
    async fn test_double_submit_hits_cooldown() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone());
        let alice = User::new(1, "Alice".into(), None);

        roast(&service, request(alice.clone(), None, "roast me please", noon()))
            .await
            .unwrap();
        let err = roast(
            &service,
            request(alice, None, "roast me again", noon() + chrono::Duration::seconds(1)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, AppError::CooldownActive { retry_after_secs: 29 });
        assert_eq!(store.roasts_since(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_protected_target_is_refused() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone());
        let alice = User::new(1, "Alice".into(), None);
        let admin = User::new(9, "Mod".into(), None).with_role(UserRole::Admin);

        let err = service
            .admit(request(alice.clone(), Some(admin.clone()), "you are too strict", noon()))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::ProtectedTarget);
        assert!(store.roasts_since(None).await.unwrap().is_empty());

        // refused requests do not burn the cooldown
        let opted_out = admin.with_protection_opt_out(true);
        assert!(roast(&service, request(alice, Some(opted_out), "you are too strict", noon()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_blocked_text_does_not_consume_cooldown() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store.clone());
        let alice = User::new(1, "Alice".into(), None);

        let err = service
            .admit(request(alice.clone(), None, "12345", noon()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Blocked(_)));
        assert!(service.cooldowns().last_roast_at(1).is_none());

        assert!(roast(&service, request(alice, None, "roast my haircut", noon()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_admission_picks_whose_photo_to_use() {
        let service = service(Arc::new(MemoryStore::new()));
        let alice = User::new(1, "Alice".into(), None);
        let bob = User::new(2, "Bob".into(), None);

        let targeted = service
            .admit(request(alice.clone(), Some(bob), "roast his shoes", noon()))
            .await
            .unwrap();
        assert_eq!(targeted.roasted_user_id(), 2);

        let roast_me = service
            .admit(request(alice, None, "roast my shoes", noon() + chrono::Duration::seconds(30)))
            .await
            .unwrap();
        assert_eq!(roast_me.roasted_user_id(), 1);
    }

    #[tokio::test]
    async fn test_photo_reaches_the_compositor() {
        let compositor = Arc::new(ScriptedCompositor::ok());
        let service = service_with(Arc::new(MemoryStore::new()), compositor.clone());

        let admitted = service
            .admit(request(User::new(1, "Alice".into(), None), None, "roast my haircut", noon()))
            .await
            .unwrap();
        service
            .render_and_persist(admitted, Some(vec![9, 9, 9]))
            .await
            .unwrap();

        let jobs = compositor.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].1);
    }

    #[tokio::test]
    async fn test_replying_to_self_is_untargeted() {
        let store = Arc::new(MemoryStore::new());
        let service = service(store);
        let owner = User::new(1, "Boss".into(), None).with_role(UserRole::Owner);

        let outcome = roast(&service, request(owner.clone(), Some(owner), "roast me, I can take it", noon()))
            .await
            .unwrap();
        assert_eq!(outcome.event.target_id, None);
        assert_eq!(outcome.event.roasted_user(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_is_reported_and_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        let all = ["cartoon_1", "cartoon_2", "minimal_1", "neon_1", "dark_1", "poster_1"];
        let service = service_with(store.clone(), Arc::new(ScriptedCompositor::failing(&all)));

        let err = roast(
            &service,
            request(User::new(1, "Alice".into(), None), None, "roast my haircut", noon()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::RenderFailure(_)));
        assert!(store.roasts_since(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restore_cooldowns_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let alice = User::new(1, "Alice".into(), None);
        roast(&service(store.clone()), request(alice.clone(), None, "roast my haircut", noon()))
            .await
            .unwrap();

        let restarted = service(store);
        assert_eq!(restarted.restore_cooldowns(noon()).await.unwrap(), 1);
        let err = restarted
            .admit(request(alice, None, "roast my shoes", noon() + chrono::Duration::seconds(10)))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::CooldownActive { retry_after_secs: 20 });
    }

    #[tokio::test]
    async fn test_sweep_clears_idle_state() {
        let service = service(Arc::new(MemoryStore::new()));
        roast(&service, request(User::new(1, "Alice".into(), None), None, "roast my haircut", noon()))
            .await
            .unwrap();

        // one cooldown entry plus one template history
        assert_eq!(service.sweep(noon() + chrono::Duration::hours(25)), 2);
        assert_eq!(service.cooldowns().tracked_users(), 0);
    }
}
