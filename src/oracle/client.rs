//! HTTP client for the analysis endpoint (`POST {base}/api/ai`).
//!
//! Regenerating an analysis issues a fresh request without cancelling the
//! previous one. Every request carries a generation number and only the
//! newest generation's answer is delivered; older answers come back as
//! [`OracleError::Superseded`] so a slow first reply can never overwrite a
//! newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::{Client, StatusCode};

use crate::models::{AnalysisRequest, AnalysisResponse, ErrorBody};

use super::OracleError;

/// Shown when a failure carries no detail of its own.
pub const FALLBACK_MESSAGE: &str = "AI分析失败，请稍后重试或配置密钥。";

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: Client,
    generation: Arc<AtomicU64>,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generation of the most recently issued request.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Request commentary. Issuing another request before this one returns
    /// makes this one resolve to `Superseded`.
    pub async fn analyse(&self, request: &AnalysisRequest) -> Result<String, OracleError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.send(request).await;

        if self.current_generation() != generation {
            tracing::debug!(generation, "discarding superseded analysis");
            return Err(OracleError::Superseded);
        }
        result
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<String, OracleError> {
        let response = self
            .client
            .post(format!("{}/api/ai", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(OracleError::from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            let body: AnalysisResponse = response.json().await.map_err(OracleError::from_reqwest)?;
            return Ok(body.content);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|b| b.detail)
            .unwrap_or_else(|_| FALLBACK_MESSAGE.to_string());

        Err(match status {
            StatusCode::GATEWAY_TIMEOUT => OracleError::Timeout,
            StatusCode::BAD_REQUEST => OracleError::Rejected(detail),
            _ => OracleError::Upstream(detail),
        })
    }
}
