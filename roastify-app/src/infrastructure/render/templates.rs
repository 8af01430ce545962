use crate::domain::{Template, Theme};
use serde::Deserialize;
use std::path::Path;

const TEMPLATES_FILE: &str = "templates.json";
const DEFAULT_FALLBACK: &str = "minimal_1";

#[derive(Debug, Deserialize)]
struct TemplateFile {
    fallback: Option<String>,
    templates: Vec<Template>,
}

/// Static template metadata. Loaded once at startup.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: Vec<Template>,
    fallback: String,
}

impl TemplateStore {
    pub fn new(templates: Vec<Template>, fallback: impl Into<String>) -> Self {
        Self {
            templates,
            fallback: fallback.into(),
        }
    }

    /// Reads `templates.json` from `dir`, falling back to the built-in set
    /// when the file is missing, unreadable or empty.
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::builtin();
        };
        let path = dir.join(TEMPLATES_FILE);

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<TemplateFile>(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(file) if !file.templates.is_empty() => {
                tracing::info!("Loaded {} templates from {}", file.templates.len(), path.display());
                Self::new(
                    file.templates,
                    file.fallback.unwrap_or_else(|| DEFAULT_FALLBACK.to_string()),
                )
            }
            Ok(_) => {
                tracing::warn!("{} has no templates, using built-in set", path.display());
                Self::builtin()
            }
            Err(e) => {
                tracing::warn!("Could not load {}: {}, using built-in set", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_templates(), DEFAULT_FALLBACK)
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn for_theme(&self, theme: Theme) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.theme == theme).collect()
    }

    /// A template other than `failed_id`, preferring the designated fallback.
    pub fn fallback_for(&self, failed_id: &str) -> Option<&Template> {
        self.get(&self.fallback)
            .filter(|t| t.id != failed_id)
            .or_else(|| self.templates.iter().find(|t| t.id != failed_id))
    }
}

fn template(
    id: &str,
    name: &str,
    theme: Theme,
    colors: ([u8; 3], [u8; 3]),
    sizes: (u32, u32),
) -> Template {
    let prefix = id.split('_').next().unwrap_or(id);
    Template {
        id: id.to_string(),
        name: name.to_string(),
        theme,
        background: format!("{id}_bg.png"),
        font: format!("{prefix}.ttf"),
        primary_color: colors.0,
        secondary_color: colors.1,
        font_size: sizes.0,
        sub_font_size: sizes.1,
    }
}

fn builtin_templates() -> Vec<Template> {
    vec![
        template("cartoon_1", "Cartoon Funny", Theme::Day, ([255, 105, 180], [0, 0, 0]), (60, 30)),
        template("cartoon_2", "Cartoon Bubble", Theme::Day, ([41, 128, 185], [255, 255, 255]), (55, 28)),
        template("minimal_1", "Minimal Mock", Theme::Day, ([33, 33, 33], [120, 120, 120]), (56, 28)),
        template("neon_1", "Neon Red", Theme::Night, ([255, 0, 100], [0, 255, 255]), (65, 32)),
        template("dark_1", "Dark Humor", Theme::Night, ([200, 200, 200], [100, 100, 100]), (58, 29)),
        template("poster_1", "Poster Savage", Theme::Night, ([255, 214, 0], [240, 240, 240]), (62, 30)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_both_themes() {
        let store = TemplateStore::builtin();
        assert_eq!(store.for_theme(Theme::Day).len(), 3);
        assert_eq!(store.for_theme(Theme::Night).len(), 3);
        assert_eq!(store.get("neon_1").map(|t| t.theme), Some(Theme::Night));
    }

    #[test]
    fn test_fallback_never_returns_failed_template() {
        let store = TemplateStore::builtin();
        assert_eq!(store.fallback_for("neon_1").map(|t| t.id.as_str()), Some("minimal_1"));
        let other = store.fallback_for("minimal_1").unwrap();
        assert_ne!(other.id, "minimal_1");

        let single = TemplateStore::new(vec![store.get("dark_1").unwrap().clone()], "dark_1");
        assert!(single.fallback_for("dark_1").is_none());
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let store = TemplateStore::load(Some(Path::new("/nonexistent/roastify")));
        assert_eq!(store.all().len(), builtin_templates().len());
    }

    #[test]
    fn test_parses_template_file() {
        let raw = r#"{
            "fallback": "only",
            "templates": [{
                "id": "only", "name": "Only", "theme": "day",
                "background": "bg.png", "font": "f.ttf",
                "primary_color": [1, 2, 3], "secondary_color": [4, 5, 6],
                "font_size": 50, "sub_font_size": 25
            }]
        }"#;
        let file: TemplateFile = serde_json::from_str(raw).unwrap();
        assert_eq!(file.fallback.as_deref(), Some("only"));
        assert_eq!(file.templates[0].theme, Theme::Day);
    }
}
