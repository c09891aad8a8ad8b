mod schema;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

/// Statistics store: one row per completed casting.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "iching-cast")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::open(dirs.data_dir().join("iching.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Castings
    // ============================================================

    /// Record a completed casting against the given calendar day.
    pub fn record_casting(
        &self,
        hexagram: &ResolvedHexagram,
        question: Option<&str>,
        cast_on: NaiveDate,
    ) -> Result<CastingRecord> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let question = question.map(str::trim).filter(|q| !q.is_empty());

        conn.execute(
            "INSERT INTO castings (id, name, sequence, full_name, question, changing_lines, cast_on, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &hexagram.name,
                hexagram.sequence,
                &hexagram.full_name,
                question,
                serde_json::to_string(&hexagram.changing_line_labels)?,
                cast_on.to_string(),
                now.to_rfc3339(),
            ),
        )?;

        tracing::debug!(id = %id, name = %hexagram.name, "recorded casting");

        Ok(CastingRecord {
            id,
            name: hexagram.name.clone(),
            sequence: hexagram.sequence,
            full_name: hexagram.full_name.clone(),
            question: question.map(str::to_string),
            cast_on,
            created_at: now,
        })
    }

    /// Most recent castings first.
    pub fn recent_castings(&self, limit: u32) -> Result<Vec<CastingRecord>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, sequence, full_name, question, cast_on, created_at
             FROM castings ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )?;

        let records = stmt
            .query_map([limit], |row| {
                Ok(CastingRecord {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    sequence: row.get(2)?,
                    full_name: row.get(3)?,
                    question: row.get(4)?,
                    cast_on: parse_date(row.get::<_, String>(5)?),
                    created_at: parse_datetime(row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    // ============================================================
    // Statistics
    // ============================================================

    pub fn get_stats(&self, today: NaiveDate) -> Result<CastingStats> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let total: u64 = conn.query_row("SELECT COUNT(*) FROM castings", [], |row| row.get(0))?;
        let today_count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM castings WHERE cast_on = ?",
            [today.to_string()],
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare("SELECT name, COUNT(*) FROM castings GROUP BY name")?;
        let by_hexagram = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(CastingStats {
            total,
            today: today_count,
            by_hexagram,
        })
    }
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_date(s: String) -> NaiveDate {
    s.parse().unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
