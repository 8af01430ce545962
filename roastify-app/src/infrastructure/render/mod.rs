mod client;
mod renderer;
mod templates;
mod types;

pub use client::{ImageCompositor, RenderServiceClient};
pub use renderer::{RenderInput, RenderedRoast, RoastRenderer};
pub use templates::TemplateStore;
pub use types::{CompositeJob, RenderRequest};

#[cfg(test)]
pub(crate) use renderer::tests::ScriptedCompositor;
