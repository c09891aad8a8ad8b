//! Read-only view of a finished casting for renderers.
//!
//! Nothing here fails: absent interpretation data turns into placeholder
//! text field by field.

use serde::Serialize;

use crate::models::{InterpretationRecord, ResolvedHexagram};

const NO_TEXT: &str = "暂无";
const NO_CHANGING_LINES: &str = "无变爻，可依卦辞、象辞为断。";
const EMPTY_FIELD: &str = "—";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultView {
    /// `乾卦 (乾为天) 乾上乾下`
    pub header: String,
    /// `乾卦 (1)`
    pub title: String,
    /// The change summary.
    pub subtitle: String,
    pub link: String,
    pub judgement: String,
    pub image: String,
    /// Texts of the changing lines, or the single no-changing-lines notice.
    pub line_texts: Vec<String>,
    pub details: HexagramDetails,
}

/// Secondary facts shown in the expanded result panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HexagramDetails {
    pub name: String,
    pub aliases: String,
    pub primary_element: String,
    pub fortune_overall: String,
    pub fortune_general: String,
    pub fortune_advice: String,
}

impl ResultView {
    pub fn new(hexagram: &ResolvedHexagram, record: Option<&InterpretationRecord>) -> Self {
        let display_name = record
            .map(|r| r.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(hexagram.name.as_str());

        Self {
            header: format!(
                "{}卦 ({}) {}",
                hexagram.name, hexagram.full_name, hexagram.position_description
            ),
            title: format!("{}卦 ({})", display_name, hexagram.sequence),
            subtitle: hexagram.change_summary.clone(),
            link: hexagram.external_link.clone(),
            judgement: text_or(record.and_then(|r| r.judgement.as_deref()), NO_TEXT),
            image: text_or(record.and_then(|r| r.image.as_deref()), NO_TEXT),
            line_texts: changing_line_texts(hexagram, record),
            details: HexagramDetails::new(display_name, record),
        }
    }
}

impl HexagramDetails {
    fn new(name: &str, record: Option<&InterpretationRecord>) -> Self {
        let fortune = record.and_then(|r| r.fortune.as_ref());
        Self {
            name: name.to_string(),
            aliases: match record.map(|r| r.alias.as_slice()) {
                Some(aliases) if !aliases.is_empty() => aliases.join("、"),
                _ => EMPTY_FIELD.to_string(),
            },
            primary_element: text_or(
                record
                    .and_then(|r| r.five_elements_enhanced.as_ref())
                    .and_then(|e| e.primary.as_deref()),
                EMPTY_FIELD,
            ),
            fortune_overall: text_or(fortune.and_then(|f| f.overall.as_deref()), EMPTY_FIELD),
            fortune_general: text_or(fortune.and_then(|f| f.general.as_deref()), EMPTY_FIELD),
            fortune_advice: text_or(fortune.and_then(|f| f.advice.as_deref()), EMPTY_FIELD),
        }
    }
}

/// Match each changing-line label against the record's line texts by its
/// first two characters (`初九`, `六二`, ...).
pub fn changing_line_texts(
    hexagram: &ResolvedHexagram,
    record: Option<&InterpretationRecord>,
) -> Vec<String> {
    if !hexagram.has_changing_lines() {
        return vec![NO_CHANGING_LINES.to_string()];
    }

    hexagram
        .changing_line_labels
        .iter()
        .map(|label| {
            let head: String = label.chars().take(2).collect();
            record
                .and_then(|r| r.lines.iter().find(|l| l.text().starts_with(&head)))
                .map(|l| l.text().to_string())
                .unwrap_or_else(|| format!("{}：暂无爻辞", label))
        })
        .collect()
}

fn text_or(text: Option<&str>, placeholder: &str) -> String {
    match text {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => placeholder.to_string(),
    }
}
