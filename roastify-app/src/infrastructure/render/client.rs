use super::types::{CompositeJob, RenderRequest};
use async_trait::async_trait;
use roastify_errors::AppError;

const RENDER_PATH: &str = "/render";

/// The pixel work happens behind this seam.
#[async_trait]
pub trait ImageCompositor: Send + Sync {
    async fn composite(&self, job: &CompositeJob) -> Result<Vec<u8>, AppError>;
}

pub struct RenderServiceClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl RenderServiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), RENDER_PATH),
        }
    }
}

#[async_trait]
impl ImageCompositor for RenderServiceClient {
    async fn composite(&self, job: &CompositeJob) -> Result<Vec<u8>, AppError> {
        let request = RenderRequest::new(job);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Accept", "image/png")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Render service error: {} - {}", status, body);
            return Err(AppError::RenderFailure(format!("render service: {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;

        if bytes.is_empty() {
            return Err(AppError::RenderFailure("empty image".to_string()));
        }

        Ok(bytes.to_vec())
    }
}
