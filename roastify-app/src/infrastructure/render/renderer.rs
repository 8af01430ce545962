use super::client::ImageCompositor;
use super::templates::TemplateStore;
use super::types::CompositeJob;
use crate::domain::{RoastLines, Template, Theme};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::seq::SliceRandom;
use roastify_errors::AppError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

const RECENT_TEMPLATES_PER_USER: usize = 5;
const RECENT_RETENTION_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct RenderInput {
    pub author_id: i64,
    pub text: String,
    pub lines: RoastLines,
    pub photo: Option<Vec<u8>>,
    pub theme: Theme,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RenderedRoast {
    pub template_id: String,
    pub image: Vec<u8>,
    pub used_fallback: bool,
}

#[derive(Debug, Default)]
struct RecentTemplates {
    ids: VecDeque<String>,
    last_used: Option<DateTime<Utc>>,
}

/// Picks a template and hands the drawing to the compositor, with one
/// bounded retry on a fallback template.
pub struct RoastRenderer {
    templates: TemplateStore,
    compositor: Arc<dyn ImageCompositor>,
    timeout: Duration,
    recent: DashMap<i64, RecentTemplates>,
}

impl RoastRenderer {
    pub fn new(templates: TemplateStore, compositor: Arc<dyn ImageCompositor>, timeout: Duration) -> Self {
        Self {
            templates,
            compositor,
            timeout,
            recent: DashMap::new(),
        }
    }

    /// Random template of the hinted theme, skipping the author's last few.
    pub fn select_template(
        &self,
        author_id: i64,
        theme: Theme,
        now: DateTime<Utc>,
    ) -> Result<Template, AppError> {
        let mut candidates = self.templates.for_theme(theme);
        if candidates.is_empty() {
            candidates = self.templates.all().iter().collect();
        }

        let mut recent = self.recent.entry(author_id).or_default();
        let mut fresh: Vec<&Template> = candidates
            .iter()
            .copied()
            .filter(|t| !recent.ids.contains(&t.id))
            .collect();
        if fresh.is_empty() {
            recent.ids.clear();
            fresh = candidates;
        }

        let chosen = fresh
            .choose(&mut rand::thread_rng())
            .map(|t| (*t).clone())
            .ok_or_else(|| AppError::RenderFailure("no templates available".to_string()))?;

        recent.ids.push_back(chosen.id.clone());
        while recent.ids.len() > RECENT_TEMPLATES_PER_USER {
            recent.ids.pop_front();
        }
        recent.last_used = Some(now);

        Ok(chosen)
    }

    /// Forgets the template history of authors idle for a day.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let keep_for = chrono::Duration::hours(RECENT_RETENTION_HOURS);
        let before = self.recent.len();
        self.recent
            .retain(|_, recent| recent.last_used.is_some_and(|at| now - at <= keep_for));
        before.saturating_sub(self.recent.len())
    }

    pub async fn render(&self, input: RenderInput) -> Result<RenderedRoast, AppError> {
        let primary = self.select_template(input.author_id, input.theme, input.now)?;

        let first_error = match self.attempt(&primary, &input, input.photo.clone()).await {
            Ok(image) => {
                return Ok(RenderedRoast {
                    template_id: primary.id,
                    image,
                    used_fallback: false,
                })
            }
            Err(e) => e,
        };
        tracing::warn!("Render with {} failed: {}, retrying with fallback", primary.id, first_error);

        let Some(fallback) = self.templates.fallback_for(&primary.id).cloned() else {
            return Err(AppError::RenderFailure(first_error.to_string()));
        };

        // retry without the photo
        match self.attempt(&fallback, &input, None).await {
            Ok(image) => Ok(RenderedRoast {
                template_id: fallback.id,
                image,
                used_fallback: true,
            }),
            Err(e) => {
                tracing::error!("Fallback render with {} failed: {}", fallback.id, e);
                Err(AppError::RenderFailure(e.to_string()))
            }
        }
    }

    async fn attempt(
        &self,
        template: &Template,
        input: &RenderInput,
        photo: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, AppError> {
        let job = CompositeJob {
            template: template.clone(),
            text: input.text.clone(),
            lines: input.lines.clone(),
            photo,
            theme: input.theme,
        };

        tokio::time::timeout(self.timeout, self.compositor.composite(&job))
            .await
            .map_err(|_| AppError::Timeout)?
    }
}
