use serde::{Deserialize, Serialize};

use super::{InterpretationRecord, ResolvedHexagram};

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "Qwen/QwQ-32B";

/// Question substituted when the caller leaves it blank.
pub const DEFAULT_QUESTION: &str = "综合运势";

/// Body posted to the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub question: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub hexagram: AnalysisHexagram,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Hexagram context forwarded for commentary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHexagram {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sequence: u8,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub judgement: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub change_list: Vec<String>,
}

impl AnalysisRequest {
    /// Assemble the payload for a resolved casting. A blank question becomes
    /// [`DEFAULT_QUESTION`].
    pub fn new(
        question: &str,
        model: Option<&str>,
        hexagram: &ResolvedHexagram,
        record: Option<&InterpretationRecord>,
    ) -> Self {
        let question = match question.trim() {
            "" => DEFAULT_QUESTION.to_string(),
            q => q.to_string(),
        };

        Self {
            question,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            hexagram: AnalysisHexagram::new(hexagram, record),
        }
    }
}

impl AnalysisHexagram {
    pub fn new(hexagram: &ResolvedHexagram, record: Option<&InterpretationRecord>) -> Self {
        Self {
            name: record
                .map(|r| r.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| hexagram.name.clone()),
            sequence: hexagram.sequence,
            full_name: hexagram.full_name.clone(),
            judgement: record
                .and_then(|r| r.judgement.clone())
                .unwrap_or_default(),
            image: record.and_then(|r| r.image.clone()).unwrap_or_default(),
            lines: record
                .map(|r| r.lines.iter().map(|l| l.text().to_string()).collect())
                .unwrap_or_default(),
            change_list: hexagram.changing_line_labels.clone(),
        }
    }
}

/// Successful analysis: the generated commentary (Markdown).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponse {
    pub content: String,
}

/// Failure body returned by the analysis endpoint and the rest of the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}
