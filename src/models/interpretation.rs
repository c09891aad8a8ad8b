use serde::{Deserialize, Serialize};

/// Traditional text for one hexagram, as stored in the interpretation data.
///
/// Every field except the name may be absent; renderers substitute
/// placeholders rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InterpretationRecord {
    #[serde(default)]
    pub name: String,
    /// 卦辞
    #[serde(default)]
    pub judgement: Option<String>,
    /// 象辞
    #[serde(default)]
    pub image: Option<String>,
    /// 爻辞, bottom to top. Entries start with the line label (e.g. `初九：...`).
    #[serde(default)]
    pub lines: Vec<LineText>,
    #[serde(default)]
    pub alias: Vec<String>,
    #[serde(default)]
    pub five_elements_enhanced: Option<FiveElements>,
    #[serde(default)]
    pub fortune: Option<Fortune>,
}

/// A line text is either a bare string or an object with a modern gloss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LineText {
    Plain(String),
    Annotated {
        text: String,
        #[serde(default)]
        modern: Option<String>,
    },
}

impl LineText {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Annotated { text, .. } => text,
        }
    }

    pub fn modern(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Annotated { modern, .. } => modern.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FiveElements {
    #[serde(default)]
    pub primary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Fortune {
    #[serde(default)]
    pub overall: Option<String>,
    #[serde(default)]
    pub general: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
}
