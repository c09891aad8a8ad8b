//! AI commentary: the request payload, the upstream model client used by
//! the server, and the client used to reach the server's analysis endpoint.

mod client;
mod prompt;
mod upstream;

pub use client::{AnalysisClient, FALLBACK_MESSAGE};
pub use prompt::{user_prompt, SYSTEM_PROMPT};
pub use upstream::{UpstreamClient, EMPTY_CONTENT};

use thiserror::Error;

/// AI analysis errors. None of these invalidate the casting itself.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("缺少环境变量 SILICONFLOW_API_KEY")]
    NotConfigured,

    #[error("AI 服务响应超时，请稍后重试")]
    Timeout,

    #[error("AI 服务请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Upstream(String),

    #[error("superseded by a newer analysis request")]
    Superseded,
}

impl OracleError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream(detail) | Self::Rejected(detail) if detail.is_empty() => {
                FALLBACK_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}
