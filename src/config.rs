//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Upstream chat-completions endpoint used by the AI proxy.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";

/// Where the CLI finds the analysis endpoint.
pub const DEFAULT_API_BASE: &str = "http://localhost:8001";

pub const DEFAULT_DATA_PATH: &str = "data/iching_basic.json";

const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Keys accepted for the upstream API, first match wins.
const API_KEY_VARS: [&str; 3] = [
    "SILICONFLOW_API_KEY",
    "SILICONFLOW_TOKEN",
    "SILICONFLOW_KEY",
];

/// Service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Upstream API key (from SILICONFLOW_API_KEY). Without it `/api/ai` refuses.
    pub api_key: Option<String>,
    /// Chat-completions URL (from ICHING_UPSTREAM_URL)
    pub upstream_url: String,
    /// Upstream request timeout (from ICHING_AI_TIMEOUT_SECS)
    pub ai_timeout: Duration,
    /// Interpretation data file (from ICHING_DATA)
    pub data_path: PathBuf,
    /// Analysis endpoint base for clients (from ICHING_API_BASE)
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));

        let upstream_url = std::env::var("ICHING_UPSTREAM_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string());

        let ai_timeout = std::env::var("ICHING_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS));

        let data_path = std::env::var("ICHING_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let api_base =
            std::env::var("ICHING_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Self {
            api_key,
            upstream_url,
            ai_timeout,
            data_path,
            api_base,
        }
    }

    /// Config with no upstream key (for local development/testing).
    pub fn offline() -> Self {
        Self {
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the AI proxy at a specific upstream (for testing).
    pub fn with_upstream(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            upstream_url: url.into(),
            ..Self::offline()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Timing of the round sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastingConfig {
    /// Pause between a line landing and the next toss.
    pub inter_round_delay: Duration,
    /// Fallback after which an unacknowledged round counts as finished.
    pub ack_timeout: Duration,
}

impl Default for CastingConfig {
    fn default() -> Self {
        Self {
            inter_round_delay: Duration::from_millis(600),
            ack_timeout: Duration::from_millis(1400),
        }
    }
}
