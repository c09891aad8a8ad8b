//! Client for the upstream chat-completions API behind `/api/ai`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::AnalysisRequest;

use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::OracleError;

const TEMPERATURE: f32 = 0.7;

/// Returned when the model answers with nothing.
pub const EMPTY_CONTENT: &str = "（无返回内容）";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: Client,
}

impl UpstreamClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.ai_timeout,
            client: Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model for commentary on a casting.
    pub async fn analyse(&self, request: &AnalysisRequest) -> Result<String, OracleError> {
        let api_key = self.api_key.as_deref().ok_or(OracleError::NotConfigured)?;

        let user = user_prompt(request);
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %request.model, "calling upstream model");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(OracleError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OracleError::Upstream(format!("{}: {}", status, text)));
        }

        let parsed: ChatResponse = response.json().await.map_err(OracleError::from_reqwest)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty());

        Ok(content.unwrap_or_else(|| EMPTY_CONTENT.to_string()))
    }
}
