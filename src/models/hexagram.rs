use serde::{Deserialize, Serialize};

/// A fully resolved hexagram.
///
/// Computed fresh from six lines every time a casting completes; nothing
/// about it is updated incrementally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHexagram {
    /// Short hexagram name, e.g. `乾`.
    pub name: String,
    /// King Wen sequence number, 1..=64.
    pub sequence: u8,
    /// Composite name, e.g. `乾为天` or `水雷屯`.
    pub full_name: String,
    /// e.g. `坎上震下`.
    pub position_description: String,
    /// Labels of the moving lines, bottom to top (e.g. `初九`, `六四`).
    pub changing_line_labels: Vec<String>,
    /// `变爻: ...` or `无变爻`.
    pub change_summary: String,
    pub external_link: String,
    /// Binary-weighted index of the upper trigram.
    pub upper: u8,
    /// Binary-weighted index of the lower trigram.
    pub lower: u8,
}

impl ResolvedHexagram {
    pub fn has_changing_lines(&self) -> bool {
        !self.changing_line_labels.is_empty()
    }
}
