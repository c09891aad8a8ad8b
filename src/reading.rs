//! Traditional reading: a short templated interpretation built only from the
//! interpretation library, no model involved.

use serde::{Deserialize, Serialize};

use crate::interpretation::IchingLibrary;
use crate::models::DEFAULT_QUESTION;

/// Moving-line texts quoted in a reading.
const MAX_QUOTED_LINES: usize = 2;

const ADVICE: &str = "结合卦意与现实资源，小步快跑、持续验证；与关键人保持顺畅沟通。";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub summary: String,
    pub details: Vec<String>,
    pub advice: String,
}

/// Judgement used when the library has none for `name`.
pub fn default_judgement(name: &str) -> String {
    format!("{}：利于正道与循序渐进。", name)
}

/// Compose a reading for a primary hexagram, its moving lines (bottom
/// first) and the hexagram it changes into.
pub fn traditional_reading(
    library: &IchingLibrary,
    primary: &str,
    moving: &[bool],
    changed: &str,
    question: Option<&str>,
) -> Reading {
    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUESTION);
    let moving_count = moving.iter().filter(|m| **m).count();

    let record = library.lookup_by_name(primary);
    let changed_record = library.lookup_by_name(changed);

    let judgement = record
        .and_then(|r| r.judgement.clone())
        .filter(|j| !j.is_empty())
        .unwrap_or_else(|| default_judgement(primary));

    let summary = format!(
        "卦名：{}。针对「{}」，{} 动爻{}。若推进受阻，可参考变卦「{}」。",
        primary, question, judgement, moving_count, changed
    );

    let mut details = Vec::new();
    if let Some(image) = record.and_then(|r| r.image.as_deref()).filter(|i| !i.is_empty()) {
        details.push(format!("象传：{}", image));
    }
    if let Some(record) = record {
        details.extend(
            moving
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .take(MAX_QUOTED_LINES)
                .filter_map(|(i, _)| record.lines.get(i))
                .map(|line| format!("动爻·{}", line.text())),
        );
    }
    if let Some(judgement) = changed_record
        .and_then(|r| r.judgement.as_deref())
        .filter(|j| !j.is_empty())
    {
        details.push(format!("变卦启示：{}", judgement));
    }

    Reading {
        summary,
        details,
        advice: ADVICE.to_string(),
    }
}
