use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed casting, as kept by the statistics store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastingRecord {
    pub id: Uuid,
    pub name: String,
    pub sequence: u8,
    pub full_name: String,
    pub question: Option<String>,
    /// Calendar day the casting counts towards.
    pub cast_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters shown alongside the casting UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastingStats {
    pub total: u64,
    pub today: u64,
    pub by_hexagram: BTreeMap<String, u64>,
}

impl CastingStats {
    /// The hexagram drawn most often. Ties go to the name that sorts first.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.by_hexagram
            .iter()
            .fold(None, |best: Option<(&str, u64)>, (name, &count)| match best {
                Some((_, max)) if max >= count => best,
                _ => Some((name.as_str(), count)),
            })
    }

    /// `名（N次）`, or `—` before anything has been cast.
    pub fn most_frequent_label(&self) -> String {
        match self.most_frequent() {
            Some((name, count)) => format!("{}（{}次）", name, count),
            None => "—".to_string(),
        }
    }
}
