//! The interpretation library: traditional texts for the 64 hexagrams.
//!
//! Data lives in a JSON object keyed by stringified sequence numbers
//! (`"1"` .. `"64"`). A missing or unreadable file yields an empty library;
//! callers fall back to placeholder text.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::InterpretationRecord;

#[derive(Debug, Clone, Default)]
pub struct IchingLibrary {
    records: HashMap<u8, InterpretationRecord>,
}

impl IchingLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from disk, logging and returning an empty library on failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(library) => {
                tracing::info!(
                    "Loaded {} interpretation records from {}",
                    library.len(),
                    path.display()
                );
                library
            }
            Err(e) => {
                tracing::warn!("Interpretation data unavailable, using placeholders: {:#}", e);
                Self::empty()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse the keyed JSON object. Keys that are not 1..=64 are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, InterpretationRecord> =
            serde_json::from_str(json).context("Failed to parse interpretation data")?;

        let records = raw
            .into_iter()
            .filter_map(|(key, record)| match key.trim().parse::<u8>() {
                Ok(seq @ 1..=64) => Some((seq, record)),
                _ => {
                    tracing::warn!("Skipping interpretation record with key {:?}", key);
                    None
                }
            })
            .collect();

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, sequence: u8) -> Option<&InterpretationRecord> {
        self.records.get(&sequence)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&InterpretationRecord> {
        let mut keys: Vec<&u8> = self.records.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| self.records.get(k))
            .find(|record| record.name == name)
    }

    /// Sequence number first, then name.
    pub fn find(&self, sequence: u8, name: &str) -> Option<&InterpretationRecord> {
        self.lookup(sequence).or_else(|| self.lookup_by_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "1": { "name": "乾", "judgement": "元亨利贞。", "lines": ["初九：潜龙勿用。"] },
        "99": { "name": "不存在" },
        "12": { "name": "否", "image": "天地不交，否。" }
    }"#;

    #[test]
    fn parses_keyed_records_and_skips_bad_keys() {
        let library = IchingLibrary::from_json(SAMPLE).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.lookup(1).unwrap().name, "乾");
        assert!(library.lookup(99).is_none());
    }

    #[test]
    fn find_prefers_sequence_then_falls_back_to_name() {
        let library = IchingLibrary::from_json(SAMPLE).unwrap();
        assert_eq!(library.find(1, "否").unwrap().name, "乾");
        assert_eq!(library.find(2, "否").unwrap().name, "否");
        assert!(library.find(2, "坤").is_none());
    }

    #[test]
    fn missing_file_gives_empty_library() {
        let library = IchingLibrary::load(Path::new("/nonexistent/iching_basic.json"));
        assert!(library.is_empty());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let library = IchingLibrary::load(file.path());
        assert_eq!(library.len(), 2);
    }
}
