use crate::domain::{RoastLines, Template, Theme, IMAGE_HEIGHT, IMAGE_WIDTH};
use base64::Engine;
use serde::Serialize;

/// Everything the compositor needs to draw one roast.
#[derive(Debug, Clone)]
pub struct CompositeJob {
    pub template: Template,
    pub text: String,
    pub lines: RoastLines,
    pub photo: Option<Vec<u8>>,
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct RenderRequest {
    pub template_id: String,
    pub background: String,
    pub font: String,
    pub primary_color: [u8; 3],
    pub secondary_color: [u8; 3],
    pub font_size: u32,
    pub sub_font_size: u32,
    /// Headline, drawn in the primary colour.
    pub primary: String,
    /// Punchline under it, in the secondary colour.
    pub secondary: String,
    /// The user's own words, quoted on the card.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
    pub theme: Theme,
    pub width: u32,
    pub height: u32,
}

impl RenderRequest {
    pub fn new(job: &CompositeJob) -> Self {
        let template = &job.template;
        Self {
            template_id: template.id.clone(),
            background: template.background.clone(),
            font: template.font.clone(),
            primary_color: template.primary_color,
            secondary_color: template.secondary_color,
            font_size: template.font_size,
            sub_font_size: template.sub_font_size,
            primary: job.lines.primary.clone(),
            secondary: job.lines.secondary.clone(),
            text: job.text.clone(),
            photo_base64: job
                .photo
                .as_ref()
                .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes)),
            theme: job.theme,
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
        }
    }
}
